//! Executes the behavior picked by the decision tree.

use crate::boid::Boid;
use crate::decision::{Behavior, Choice};
use crate::food::{FoodId, FoodItem, FoodSource};
use glam::DVec3;

/// What a boid actually did this tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Executed {
    /// Steer with the flocking forces.
    Flock,
    /// Steer toward food with `force`; `meal` is set when the item was eaten this tick.
    Forage {
        force: DVec3,
        meal: Option<FoodItem>,
    },
}

impl Executed {
    pub fn behavior(&self) -> Behavior {
        match self {
            Executed::Flock => Behavior::Flock,
            Executed::Forage { .. } => Behavior::Forage,
        }
    }
}

/// Unit direction from `position` to `target` scaled by `weight`.
pub fn seek_force(position: DVec3, target: DVec3, weight: f64) -> DVec3 {
    (target - position).normalize_or_zero() * weight
}

/// Run `choice` for `boid`, whose snapshot position is `position`.
///
/// Foraging a target that is no longer alive degrades to flocking. Eating removes the
/// item from `food`; if another boid got there first the removal is a no-op and no
/// hunger is restored.
pub fn execute<F: FoodSource + ?Sized>(
    boid: &mut Boid,
    choice: Choice,
    position: DVec3,
    food: &mut F,
) -> Executed {
    boid.forage_target = choice.target;
    if choice.behavior == Behavior::Flock {
        return Executed::Flock;
    }

    let Some((target, target_position)) = boid
        .forage_target
        .and_then(|id| food.position(id).map(|p| (id, p)))
    else {
        boid.forage_target = None;
        return Executed::Flock;
    };

    let force = seek_force(position, target_position, boid.params.food_seek_weight);
    let mut meal = None;
    if position.distance(target_position) < boid.params.eating_distance {
        meal = eat(boid, target, food);
    }
    Executed::Forage { force, meal }
}

/// Consume `target` and feed `boid` if it is still there. Always clears the forage target.
pub fn eat<F: FoodSource + ?Sized>(
    boid: &mut Boid,
    target: FoodId,
    food: &mut F,
) -> Option<FoodItem> {
    boid.forage_target = None;
    let item = food.remove(target)?;
    boid.hunger.eat(boid.params.feeding_rate);
    Some(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoidParams;
    use crate::food::FoodRegistry;

    fn hungry_boid() -> Boid {
        Boid::new(0, DVec3::ZERO, DVec3::X, BoidParams::default()).with_hunger(0.8)
    }

    #[test]
    fn flock_choice_has_no_force() {
        let mut registry = FoodRegistry::new();
        let mut boid = hungry_boid();
        let executed = execute(&mut boid, Choice::FLOCK, DVec3::ZERO, &mut registry);
        assert_eq!(executed, Executed::Flock);
        assert_eq!(boid.forage_target, None);
    }

    #[test]
    fn forage_steers_toward_target() {
        let mut registry = FoodRegistry::new();
        let id = registry.spawn(DVec3::new(0.0, 0.0, 4.0), 0.3);
        let mut boid = hungry_boid();
        let choice = Choice {
            behavior: Behavior::Forage,
            target: Some(id),
        };
        let executed = execute(&mut boid, choice, DVec3::ZERO, &mut registry);
        assert_eq!(
            executed,
            Executed::Forage {
                force: DVec3::new(0.0, 0.0, 2.0),
                meal: None,
            }
        );
        assert_eq!(boid.forage_target, Some(id));
        assert!(registry.is_alive(id));
    }

    #[test]
    fn forage_within_eating_distance_eats() {
        let mut registry = FoodRegistry::new();
        let id = registry.spawn(DVec3::new(0.3, 0.0, 0.0), 0.3);
        let mut boid = hungry_boid();
        let choice = Choice {
            behavior: Behavior::Forage,
            target: Some(id),
        };
        let executed = execute(&mut boid, choice, DVec3::ZERO, &mut registry);
        let Executed::Forage { meal, .. } = executed else {
            panic!("expected forage");
        };
        assert_eq!(meal.map(|m| m.id), Some(id));
        assert!((boid.hunger.value() - 0.6).abs() < 1e-12);
        assert_eq!(boid.forage_target, None);
        assert!(!registry.is_alive(id));
    }

    #[test]
    fn vanished_target_degrades_to_flock() {
        let mut registry = FoodRegistry::new();
        let id = registry.spawn(DVec3::new(1.0, 0.0, 0.0), 0.3);
        let _ = registry.remove(id);
        let mut boid = hungry_boid();
        let choice = Choice {
            behavior: Behavior::Forage,
            target: Some(id),
        };
        let executed = execute(&mut boid, choice, DVec3::ZERO, &mut registry);
        assert_eq!(executed, Executed::Flock);
        assert_eq!(boid.forage_target, None);
        assert!((boid.hunger.value() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn second_eat_on_same_item_is_noop() {
        let mut registry = FoodRegistry::new();
        let id = registry.spawn(DVec3::ZERO, 0.3);
        let mut first = hungry_boid();
        let mut second = hungry_boid();
        assert!(eat(&mut first, id, &mut registry).is_some());
        assert!(eat(&mut second, id, &mut registry).is_none());
        assert!((first.hunger.value() - 0.6).abs() < 1e-12);
        assert!((second.hunger.value() - 0.8).abs() < 1e-12);
        assert_eq!(registry.total_consumed(), 1);
    }
}
