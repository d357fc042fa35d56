use crate::arena::Arena;
use crate::boid::Boid;
use crate::decision::Behavior;
use crate::food::FoodRegistry;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StepMetrics {
    pub step: usize,
    pub boid_count: usize,
    pub hunger_mean: f64,
    pub hunger_max: f64,
    /// Boids whose hunger exceeds their threshold.
    pub hungry_count: usize,
    pub foraging_count: usize,
    pub independent_count: usize,
    pub entering_count: usize,
    pub meals: usize,
    pub food_remaining: usize,
    pub speed_mean: f64,
    pub center_distance_mean: f64,
    pub center_distance_max: f64,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub sample_every: usize,
    pub final_boid_count: usize,
    #[serde(default)]
    pub total_meals: usize,
    pub samples: Vec<StepMetrics>,
}

/// Per-step counters the world tracks while ticking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepCounters {
    pub meals: usize,
    pub independent: usize,
    pub emergency: usize,
}

pub fn collect_step_metrics(
    step: usize,
    boids: &[Boid],
    behaviors: &[Behavior],
    arena: &Arena,
    food: &FoodRegistry,
    counters: StepCounters,
) -> StepMetrics {
    let mut metrics = StepMetrics {
        step,
        boid_count: boids.len(),
        meals: counters.meals,
        independent_count: counters.independent,
        food_remaining: food.len(),
        foraging_count: behaviors
            .iter()
            .filter(|&&b| b == Behavior::Forage)
            .count(),
        ..StepMetrics::default()
    };
    if boids.is_empty() {
        return metrics;
    }

    let mut hunger_sum = 0.0;
    let mut speed_sum = 0.0;
    let mut distance_sum = 0.0;
    for boid in boids {
        let hunger = boid.hunger.value();
        hunger_sum += hunger;
        metrics.hunger_max = metrics.hunger_max.max(hunger);
        if boid.hunger.exceeds(boid.params.hunger_threshold) {
            metrics.hungry_count += 1;
        }
        if boid.entrance.is_active() {
            metrics.entering_count += 1;
        }
        speed_sum += boid.speed();
        let distance = arena.distance_to_center(boid.position);
        distance_sum += distance;
        metrics.center_distance_max = metrics.center_distance_max.max(distance);
    }
    let n = boids.len() as f64;
    metrics.hunger_mean = hunger_sum / n;
    metrics.speed_mean = speed_sum / n;
    metrics.center_distance_mean = distance_sum / n;
    metrics
}
