use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Per-boid steering and survival parameters.
///
/// These are the spawn-time defaults; individual boids may carry jittered copies.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoidParams {
    /// Lower speed clamp applied after integration.
    pub min_speed: f64,
    /// Upper speed clamp applied after integration.
    pub max_speed: f64,
    /// Magnitude clamp for the composed steering acceleration.
    pub max_steer_force: f64,
    pub cohesion_radius: f64,
    pub separation_radius: f64,
    pub alignment_radius: f64,
    /// Radius within which food is noticed.
    pub food_perception_radius: f64,
    pub cohesion_weight: f64,
    pub separation_weight: f64,
    pub alignment_weight: f64,
    /// Base strength of the soft containment force.
    pub bounds_weight: f64,
    pub food_seek_weight: f64,
    /// Strength of the unweighted pull applied past 95% of the arena radius.
    pub bounds_emergency_force: f64,
    /// Per-tick probability of ignoring every computed force in favor of a random heading.
    pub independence_factor: f64,
    /// Magnitude of the random acceleration used by independent ticks.
    pub random_force_strength: f64,
    /// Hunger gained per second.
    pub hunger_rate: f64,
    /// Hunger strictly above this level makes a boid consider foraging.
    pub hunger_threshold: f64,
    /// Hunger removed by one meal.
    pub feeding_rate: f64,
    /// Distance to a food item below which the boid eats it.
    pub eating_distance: f64,
}

impl Default for BoidParams {
    fn default() -> Self {
        Self {
            min_speed: 2.0,
            max_speed: 5.0,
            max_steer_force: 3.0,
            cohesion_radius: 3.0,
            separation_radius: 3.0,
            alignment_radius: 3.0,
            food_perception_radius: 5.0,
            cohesion_weight: 0.5,
            separation_weight: 3.0,
            alignment_weight: 0.8,
            bounds_weight: 2.0,
            food_seek_weight: 2.0,
            bounds_emergency_force: 5.0,
            independence_factor: 0.2,
            random_force_strength: 3.0,
            hunger_rate: 0.01,
            hunger_threshold: 0.7,
            feeding_rate: 0.2,
            eating_distance: 0.5,
        }
    }
}

/// Optional flight-control passes layered on top of steering.
///
/// Both groups are off by default. Heights are world-space `y` values.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlightParams {
    /// Keep boids inside a vertical band and cap their vertical speed.
    pub height_keeping: bool,
    pub min_height: f64,
    pub max_height: f64,
    /// Base strength of the height correction forces.
    pub height_adjust_force: f64,
    /// Smoothing time of the damped height follower.
    pub vertical_smooth_time: f64,
    /// Speed cap of the damped height follower.
    pub max_vertical_speed: f64,
    /// Upward speed cap applied to every boid, entering or not.
    pub max_climb_speed: f64,
    /// Downward speed cap applied to every boid, entering or not.
    pub max_descent_speed: f64,
    /// Symmetric vertical speed cap for boids past their entrance.
    pub max_height_change_speed: f64,
    /// Boids below this height are lifted back to `min_height`.
    pub floor_height: f64,
    /// Push apart boids closer than `avoidance_radius`.
    pub avoidance: bool,
    pub avoidance_radius: f64,
    pub avoidance_force: f64,
}

impl Default for FlightParams {
    fn default() -> Self {
        Self {
            height_keeping: false,
            min_height: 5.0,
            max_height: 8.0,
            height_adjust_force: 8.0,
            vertical_smooth_time: 1.5,
            max_vertical_speed: 1.5,
            max_climb_speed: 3.0,
            max_descent_speed: 2.0,
            max_height_change_speed: 1.5,
            floor_height: 0.5,
            avoidance: false,
            avoidance_radius: 2.0,
            avoidance_force: 5.0,
        }
    }
}

impl FlightParams {
    pub fn validate(&self) -> Result<(), SimConfigError> {
        if !(self.min_height.is_finite()
            && self.max_height.is_finite()
            && self.min_height <= self.max_height)
        {
            return Err(SimConfigError::InvalidFlightHeight);
        }
        if !non_negative(self.height_adjust_force) {
            return Err(SimConfigError::InvalidHeightAdjustForce);
        }
        if !(positive(self.vertical_smooth_time) && non_negative(self.max_vertical_speed)) {
            return Err(SimConfigError::InvalidVerticalSmoothing);
        }
        let caps = [
            self.max_climb_speed,
            self.max_descent_speed,
            self.max_height_change_speed,
        ];
        if !caps.into_iter().all(non_negative) {
            return Err(SimConfigError::InvalidVerticalSpeedCap);
        }
        if !self.floor_height.is_finite() {
            return Err(SimConfigError::InvalidFloorHeight);
        }
        if !(non_negative(self.avoidance_radius) && non_negative(self.avoidance_force)) {
            return Err(SimConfigError::InvalidAvoidance);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible simulation runs.
    pub seed: u64,
    /// Simulation timestep (seconds in model time).
    pub dt: f64,
    /// Arena center in world units.
    pub arena_center: [f64; 3],
    /// Arena radius in world units.
    pub arena_radius: f64,
    /// Number of boids introduced by the entrance schedule.
    pub boid_count: usize,
    /// Seconds between two staggered spawns (0 spawns everything on the first step).
    pub spawn_interval: f64,
    /// Spawn distance from the center as a multiple of the arena radius.
    pub spawn_distance_factor: f64,
    /// Vertical component of the (pre-normalization) spawn direction.
    pub spawn_rise: f64,
    /// Seconds a newly spawned boid spends in its entrance phase.
    pub entrance_duration: f64,
    /// Linear damping during the first half of the entrance phase.
    pub entrance_damping_start: f64,
    /// Linear damping reached at the end of the entrance phase and kept afterwards.
    pub entrance_damping_end: f64,
    /// Freeze vertical motion in the reference integrator.
    pub freeze_vertical: bool,
    /// Half-width of the uniform jitter added to each boid's speed limits.
    pub speed_jitter: f64,
    /// Scale range applied to each boid's flocking radii.
    pub perception_scale_min: f64,
    pub perception_scale_max: f64,
    /// Scale range applied to each boid's food perception radius.
    pub food_perception_scale_min: f64,
    pub food_perception_scale_max: f64,
    /// Upper bound of the uniform initial hunger draw.
    pub initial_hunger_max: f64,
    /// Run the built-in food spawner.
    pub enable_food: bool,
    /// Cap on simultaneously alive food items.
    pub max_food: usize,
    /// Horizontal spawn radius for food around the arena center.
    pub food_spawn_radius: f64,
    /// Seconds between food spawn attempts.
    pub food_spawn_interval: f64,
    /// Height of food items above the arena center.
    pub food_height: f64,
    pub food_nutritional_value: f64,
    /// Default parameters for every spawned boid.
    pub boid: BoidParams,
    pub flight: FlightParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            dt: 1.0 / 60.0,
            arena_center: [0.0, 0.0, 0.0],
            arena_radius: 30.0,
            boid_count: 30,
            spawn_interval: 0.3,
            spawn_distance_factor: 1.5,
            spawn_rise: 0.3,
            entrance_duration: 2.0,
            entrance_damping_start: 2.0,
            entrance_damping_end: 0.5,
            freeze_vertical: false,
            speed_jitter: 1.0,
            perception_scale_min: 0.8,
            perception_scale_max: 1.2,
            food_perception_scale_min: 0.7,
            food_perception_scale_max: 1.3,
            initial_hunger_max: 0.5,
            enable_food: true,
            max_food: 20,
            food_spawn_radius: 15.0,
            food_spawn_interval: 5.0,
            food_height: 0.5,
            food_nutritional_value: 0.3,
            boid: BoidParams::default(),
            flight: FlightParams::default(),
        }
    }
}

macro_rules! define_sim_config_error {
    (
        $(
            $variant:ident $( { $($field:ident : $type:ty),* } )? => $fmt:literal $(, $arg:expr)*
        );* $(;)?
    ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum SimConfigError {
            $(
                $variant $( { $($field : $type),* } )?,
            )*
        }

        impl std::fmt::Display for SimConfigError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$variant $( { $($field),* } )? => write!(f, $fmt $(, $arg)*),
                    )*
                }
            }
        }
    };
}

define_sim_config_error! {
    InvalidDt => "dt must be positive and finite";
    InvalidArenaCenter => "arena_center must be finite";
    InvalidArenaRadius => "arena_radius must be positive and finite";
    TooManyBoids { max: usize, actual: usize } => "Too many boids: {} > max {}", actual, max;
    InvalidSpawnInterval => "spawn_interval must be finite and non-negative";
    InvalidSpawnDistanceFactor => "spawn_distance_factor must be finite and non-negative";
    InvalidSpawnRise => "spawn_rise must be finite";
    InvalidEntranceDuration => "entrance_duration must be finite and non-negative";
    InvalidEntranceDamping => "entrance_damping_start/entrance_damping_end must be finite and non-negative";
    InvalidSpeedJitter => "speed_jitter must be finite and non-negative";
    InvalidPerceptionScale => "perception_scale_min/perception_scale_max must be finite, positive, and ordered";
    InvalidFoodPerceptionScale => "food_perception_scale_min/food_perception_scale_max must be finite, positive, and ordered";
    InvalidInitialHungerMax => "initial_hunger_max must be finite and within [0,1]";
    InvalidFoodSpawnRadius => "food_spawn_radius must be finite and non-negative";
    InvalidFoodSpawnInterval => "food_spawn_interval must be positive and finite";
    InvalidFoodHeight => "food_height must be finite";
    InvalidFoodNutritionalValue => "food_nutritional_value must be finite and non-negative";
    InvalidMinSpeed => "min_speed must be finite and non-negative";
    InvalidMaxSpeed => "max_speed must be positive, finite, and at least min_speed";
    InvalidMaxSteerForce => "max_steer_force must be positive and finite";
    InvalidRadius => "cohesion/separation/alignment/food perception radii must be finite and non-negative";
    InvalidWeight => "behavior weights must be finite and non-negative";
    InvalidBoundsEmergencyForce => "bounds_emergency_force must be finite and non-negative";
    InvalidIndependenceFactor => "independence_factor must be finite and within [0,1]";
    InvalidRandomForceStrength => "random_force_strength must be finite and non-negative";
    InvalidHungerRate => "hunger_rate must be finite and non-negative";
    InvalidHungerThreshold => "hunger_threshold must be finite and within [0,1]";
    InvalidFeedingRate => "feeding_rate must be finite and non-negative";
    InvalidEatingDistance => "eating_distance must be finite and non-negative";
    InvalidFlightHeight => "flight.min_height/flight.max_height must be finite and ordered";
    InvalidHeightAdjustForce => "flight.height_adjust_force must be finite and non-negative";
    InvalidVerticalSmoothing => "flight.vertical_smooth_time must be positive and flight.max_vertical_speed non-negative";
    InvalidVerticalSpeedCap => "flight vertical speed caps must be finite and non-negative";
    InvalidFloorHeight => "flight.floor_height must be finite";
    InvalidAvoidance => "flight.avoidance_radius/flight.avoidance_force must be finite and non-negative";
}

impl std::error::Error for SimConfigError {}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

fn ordered_scale(min: f64, max: f64) -> bool {
    positive(min) && positive(max) && min <= max
}

impl BoidParams {
    pub fn validate(&self) -> Result<(), SimConfigError> {
        if !non_negative(self.min_speed) {
            return Err(SimConfigError::InvalidMinSpeed);
        }
        if !(positive(self.max_speed) && self.max_speed >= self.min_speed) {
            return Err(SimConfigError::InvalidMaxSpeed);
        }
        if !positive(self.max_steer_force) {
            return Err(SimConfigError::InvalidMaxSteerForce);
        }
        let radii = [
            self.cohesion_radius,
            self.separation_radius,
            self.alignment_radius,
            self.food_perception_radius,
        ];
        if !radii.into_iter().all(non_negative) {
            return Err(SimConfigError::InvalidRadius);
        }
        let weights = [
            self.cohesion_weight,
            self.separation_weight,
            self.alignment_weight,
            self.bounds_weight,
            self.food_seek_weight,
        ];
        if !weights.into_iter().all(non_negative) {
            return Err(SimConfigError::InvalidWeight);
        }
        if !non_negative(self.bounds_emergency_force) {
            return Err(SimConfigError::InvalidBoundsEmergencyForce);
        }
        if !unit_interval(self.independence_factor) {
            return Err(SimConfigError::InvalidIndependenceFactor);
        }
        if !non_negative(self.random_force_strength) {
            return Err(SimConfigError::InvalidRandomForceStrength);
        }
        if !non_negative(self.hunger_rate) {
            return Err(SimConfigError::InvalidHungerRate);
        }
        if !unit_interval(self.hunger_threshold) {
            return Err(SimConfigError::InvalidHungerThreshold);
        }
        if !non_negative(self.feeding_rate) {
            return Err(SimConfigError::InvalidFeedingRate);
        }
        if !non_negative(self.eating_distance) {
            return Err(SimConfigError::InvalidEatingDistance);
        }
        Ok(())
    }
}

impl SimConfig {
    /// Upper bound on boids; the neighbor pass is quadratic in this number.
    pub const MAX_BOIDS: usize = 10_000;

    pub fn arena_center(&self) -> DVec3 {
        DVec3::from_array(self.arena_center)
    }

    pub fn validate(&self) -> Result<(), SimConfigError> {
        self.validate_world()?;
        self.validate_entrance()?;
        self.validate_individuality()?;
        self.validate_food()?;
        self.boid.validate()?;
        self.flight.validate()?;
        Ok(())
    }

    fn validate_world(&self) -> Result<(), SimConfigError> {
        if !positive(self.dt) {
            return Err(SimConfigError::InvalidDt);
        }
        if !self.arena_center.iter().all(|c| c.is_finite()) {
            return Err(SimConfigError::InvalidArenaCenter);
        }
        if !positive(self.arena_radius) {
            return Err(SimConfigError::InvalidArenaRadius);
        }
        if self.boid_count > Self::MAX_BOIDS {
            return Err(SimConfigError::TooManyBoids {
                max: Self::MAX_BOIDS,
                actual: self.boid_count,
            });
        }
        Ok(())
    }

    fn validate_entrance(&self) -> Result<(), SimConfigError> {
        if !non_negative(self.spawn_interval) {
            return Err(SimConfigError::InvalidSpawnInterval);
        }
        if !non_negative(self.spawn_distance_factor) {
            return Err(SimConfigError::InvalidSpawnDistanceFactor);
        }
        if !self.spawn_rise.is_finite() {
            return Err(SimConfigError::InvalidSpawnRise);
        }
        if !non_negative(self.entrance_duration) {
            return Err(SimConfigError::InvalidEntranceDuration);
        }
        if !(non_negative(self.entrance_damping_start) && non_negative(self.entrance_damping_end))
        {
            return Err(SimConfigError::InvalidEntranceDamping);
        }
        Ok(())
    }

    fn validate_individuality(&self) -> Result<(), SimConfigError> {
        if !non_negative(self.speed_jitter) {
            return Err(SimConfigError::InvalidSpeedJitter);
        }
        if !ordered_scale(self.perception_scale_min, self.perception_scale_max) {
            return Err(SimConfigError::InvalidPerceptionScale);
        }
        if !ordered_scale(
            self.food_perception_scale_min,
            self.food_perception_scale_max,
        ) {
            return Err(SimConfigError::InvalidFoodPerceptionScale);
        }
        if !unit_interval(self.initial_hunger_max) {
            return Err(SimConfigError::InvalidInitialHungerMax);
        }
        Ok(())
    }

    fn validate_food(&self) -> Result<(), SimConfigError> {
        if !non_negative(self.food_spawn_radius) {
            return Err(SimConfigError::InvalidFoodSpawnRadius);
        }
        if !positive(self.food_spawn_interval) {
            return Err(SimConfigError::InvalidFoodSpawnInterval);
        }
        if !self.food_height.is_finite() {
            return Err(SimConfigError::InvalidFoodHeight);
        }
        if !non_negative(self.food_nutritional_value) {
            return Err(SimConfigError::InvalidFoodNutritionalValue);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn legacy_config_json_deserializes_with_defaults() {
        let legacy_json = r#"{
            "seed": 7,
            "arena_radius": 50.0,
            "boid_count": 12,
            "boid": { "max_speed": 6.0 }
        }"#;
        let cfg: SimConfig = serde_json::from_str(legacy_json).expect("legacy config should parse");
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.boid_count, 12);
        assert_eq!(cfg.boid.max_speed, 6.0);
        assert_eq!(cfg.boid.min_speed, 2.0);
        assert_eq!(cfg.max_food, 20);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn rejects_non_positive_arena_radius() {
        let cfg = SimConfig {
            arena_radius: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(SimConfigError::InvalidArenaRadius));
    }

    #[test]
    fn rejects_nan_arena_center() {
        let cfg = SimConfig {
            arena_center: [0.0, f64::NAN, 0.0],
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(SimConfigError::InvalidArenaCenter));
    }

    #[test]
    fn rejects_too_many_boids() {
        let cfg = SimConfig {
            boid_count: SimConfig::MAX_BOIDS + 1,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimConfigError::TooManyBoids { .. })
        ));
    }

    #[test]
    fn rejects_inverted_speed_limits() {
        let params = BoidParams {
            min_speed: 6.0,
            max_speed: 5.0,
            ..BoidParams::default()
        };
        assert_eq!(params.validate(), Err(SimConfigError::InvalidMaxSpeed));
    }

    #[test]
    fn rejects_independence_outside_unit_interval() {
        let params = BoidParams {
            independence_factor: 1.5,
            ..BoidParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(SimConfigError::InvalidIndependenceFactor)
        );
    }

    #[test]
    fn rejects_negative_radius() {
        let params = BoidParams {
            separation_radius: -1.0,
            ..BoidParams::default()
        };
        assert_eq!(params.validate(), Err(SimConfigError::InvalidRadius));
    }

    #[test]
    fn nested_boid_errors_surface_from_sim_config() {
        let cfg = SimConfig {
            boid: BoidParams {
                hunger_threshold: 2.0,
                ..BoidParams::default()
            },
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(SimConfigError::InvalidHungerThreshold));
    }

    #[test]
    fn flight_is_off_by_default_and_parses_partially() {
        let json = r#"{ "flight": { "height_keeping": true, "min_height": 2.0 } }"#;
        let cfg: SimConfig = serde_json::from_str(json).expect("flight config should parse");
        assert!(!SimConfig::default().flight.height_keeping);
        assert!(!SimConfig::default().flight.avoidance);
        assert!(cfg.flight.height_keeping);
        assert_eq!(cfg.flight.min_height, 2.0);
        assert_eq!(cfg.flight.max_height, 8.0);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_flight_band() {
        let cfg = SimConfig {
            flight: FlightParams {
                min_height: 9.0,
                max_height: 8.0,
                ..FlightParams::default()
            },
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(SimConfigError::InvalidFlightHeight));
    }

    #[test]
    fn rejects_zero_vertical_smooth_time() {
        let flight = FlightParams {
            vertical_smooth_time: 0.0,
            ..FlightParams::default()
        };
        assert_eq!(flight.validate(), Err(SimConfigError::InvalidVerticalSmoothing));
    }

    #[test]
    fn error_messages_are_stable() {
        let cases = [
            (SimConfigError::InvalidDt, "dt must be positive and finite"),
            (
                SimConfigError::InvalidArenaRadius,
                "arena_radius must be positive and finite",
            ),
            (
                SimConfigError::TooManyBoids {
                    max: 10_000,
                    actual: 20_000,
                },
                "Too many boids: 20000 > max 10000",
            ),
            (
                SimConfigError::InvalidIndependenceFactor,
                "independence_factor must be finite and within [0,1]",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }
}
