//! Static binary decision tree choosing between foraging and flocking.
//!
//! Evaluation is pure: it only reads the boid's state and the food source. The chosen
//! [`Behavior`] is executed separately by [`crate::behavior`].

use crate::boid::Boid;
use crate::food::{FoodId, FoodSource};
use glam::DVec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Behavior {
    Forage,
    Flock,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    /// `hunger > hunger_threshold`.
    IsHungry,
    /// A live food item lies within the food perception radius.
    FoodNearby,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecisionNode {
    Decision {
        test: Condition,
        when_true: Box<DecisionNode>,
        when_false: Box<DecisionNode>,
    },
    Action(Behavior),
}

impl DecisionNode {
    pub fn decision(test: Condition, when_true: DecisionNode, when_false: DecisionNode) -> Self {
        DecisionNode::Decision {
            test,
            when_true: Box::new(when_true),
            when_false: Box::new(when_false),
        }
    }

    pub fn action(behavior: Behavior) -> Self {
        DecisionNode::Action(behavior)
    }
}

/// Everything a decision may look at for one boid.
#[derive(Clone, Copy, Debug)]
pub struct DecisionInput {
    pub position: DVec3,
    pub hunger: f64,
    pub hunger_threshold: f64,
    pub food_perception_radius: f64,
}

impl DecisionInput {
    /// Read the decision inputs from a boid, using `position` from the tick snapshot.
    pub fn for_boid(boid: &Boid, position: DVec3) -> Self {
        Self {
            position,
            hunger: boid.hunger.value(),
            hunger_threshold: boid.params.hunger_threshold,
            food_perception_radius: boid.params.food_perception_radius,
        }
    }
}

/// Outcome of one evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Choice {
    pub behavior: Behavior,
    /// Food discovered by `FoodNearby`; only set when the behavior is `Forage`.
    pub target: Option<FoodId>,
}

impl Choice {
    pub const FLOCK: Choice = Choice {
        behavior: Behavior::Flock,
        target: None,
    };
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecisionTree {
    root: DecisionNode,
}

impl DecisionTree {
    pub fn new(root: DecisionNode) -> Self {
        Self { root }
    }

    /// `IsHungry ? (FoodNearby ? Forage : Flock) : Flock`.
    pub fn foraging() -> Self {
        Self::new(DecisionNode::decision(
            Condition::IsHungry,
            DecisionNode::decision(
                Condition::FoodNearby,
                DecisionNode::action(Behavior::Forage),
                DecisionNode::action(Behavior::Flock),
            ),
            DecisionNode::action(Behavior::Flock),
        ))
    }

    pub fn root(&self) -> &DecisionNode {
        &self.root
    }

    pub fn evaluate<F: FoodSource + ?Sized>(&self, input: &DecisionInput, food: &F) -> Choice {
        evaluate_node(&self.root, input, food, None)
    }
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::foraging()
    }
}

fn evaluate_node<F: FoodSource + ?Sized>(
    node: &DecisionNode,
    input: &DecisionInput,
    food: &F,
    found: Option<FoodId>,
) -> Choice {
    match node {
        DecisionNode::Action(Behavior::Forage) => Choice {
            behavior: Behavior::Forage,
            target: found,
        },
        DecisionNode::Action(Behavior::Flock) => Choice::FLOCK,
        DecisionNode::Decision {
            test,
            when_true,
            when_false,
        } => {
            let (passed, found) = match test {
                Condition::IsHungry => (input.hunger > input.hunger_threshold, found),
                Condition::FoodNearby => {
                    match food.any_within(input.position, input.food_perception_radius) {
                        Some(id) => (true, Some(id)),
                        None => (false, found),
                    }
                }
            };
            let next = if passed { when_true } else { when_false };
            evaluate_node(next, input, food, found)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::FoodRegistry;

    fn input(hunger: f64) -> DecisionInput {
        DecisionInput {
            position: DVec3::ZERO,
            hunger,
            hunger_threshold: 0.7,
            food_perception_radius: 5.0,
        }
    }

    fn registry_with_food_at(x: f64) -> (FoodRegistry, FoodId) {
        let mut registry = FoodRegistry::new();
        let id = registry.spawn(DVec3::new(x, 0.0, 0.0), 0.3);
        (registry, id)
    }

    #[test]
    fn hungry_with_food_nearby_forages() {
        let (registry, id) = registry_with_food_at(3.0);
        let choice = DecisionTree::foraging().evaluate(&input(0.8), &registry);
        assert_eq!(
            choice,
            Choice {
                behavior: Behavior::Forage,
                target: Some(id),
            }
        );
    }

    #[test]
    fn hunger_gate_dominates_nearby_food() {
        let (registry, _) = registry_with_food_at(3.0);
        let choice = DecisionTree::foraging().evaluate(&input(0.5), &registry);
        assert_eq!(choice, Choice::FLOCK);
    }

    #[test]
    fn hungry_without_food_in_range_flocks() {
        let (registry, _) = registry_with_food_at(50.0);
        let choice = DecisionTree::foraging().evaluate(&input(0.9), &registry);
        assert_eq!(choice, Choice::FLOCK);
    }

    #[test]
    fn threshold_equality_is_not_hungry() {
        let (registry, _) = registry_with_food_at(1.0);
        let choice = DecisionTree::foraging().evaluate(&input(0.7), &registry);
        assert_eq!(choice, Choice::FLOCK);
    }

    #[test]
    fn evaluation_leaves_registry_untouched() {
        let (registry, id) = registry_with_food_at(1.0);
        let tree = DecisionTree::foraging();
        let first = tree.evaluate(&input(0.9), &registry);
        let second = tree.evaluate(&input(0.9), &registry);
        assert_eq!(first, second);
        assert!(registry.is_alive(id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn foraging_tree_has_expected_shape() {
        let expected = DecisionNode::decision(
            Condition::IsHungry,
            DecisionNode::decision(
                Condition::FoodNearby,
                DecisionNode::action(Behavior::Forage),
                DecisionNode::action(Behavior::Flock),
            ),
            DecisionNode::action(Behavior::Flock),
        );
        assert_eq!(DecisionTree::default().root(), &expected);
    }
}
