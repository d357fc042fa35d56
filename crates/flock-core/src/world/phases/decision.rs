use super::super::World;
use crate::decision::{Choice, DecisionInput};

impl World {
    /// Evaluate the decision tree for every boid. Reads only; nothing is consumed here.
    pub(in crate::world) fn step_decision_phase(&mut self) {
        let choices = &mut self.choice_buffer;
        let tree = &self.tree;
        let food = &self.food;
        choices.clear();
        for (boid, &position) in self.boids.iter().zip(self.snapshot.positions()) {
            if boid.entrance.is_active() {
                choices.push(Choice::FLOCK);
                continue;
            }
            let input = DecisionInput::for_boid(boid, position);
            choices.push(tree.evaluate(&input, food));
        }
    }
}
