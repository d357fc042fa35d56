use crate::arena::Arena;
use crate::boid::Boid;
use crate::config::{SimConfig, SimConfigError};
use crate::decision::{Behavior, Choice, DecisionTree};
use crate::flocking::{FlockForces, Snapshot};
use crate::food::{FoodRegistry, FoodSpawner};
use crate::metrics::{RunSummary, StepCounters};
use crate::physics::{EulerIntegrator, PhysicsIntegrator};
use crate::rng::{self, FOOD_STREAM, SPAWN_STREAM, STEERING_STREAM};
use crate::spawn::EntranceSchedule;
use glam::DVec3;
use rand_chacha::ChaCha12Rng;
use std::collections::HashSet;
use std::time::Instant;
use std::{error::Error, fmt};

#[derive(Clone, Debug)]
pub struct StepTimings {
    pub aggregate_us: u64,
    pub decide_us: u64,
    pub apply_us: u64,
    pub total_us: u64,
}

pub struct World {
    pub boids: Vec<Boid>,
    // Keep config private to preserve constructor invariants.
    config: SimConfig,
    arena: Arena,
    food: FoodRegistry,
    tree: DecisionTree,
    integrator: Box<dyn PhysicsIntegrator + Send>,
    rng: ChaCha12Rng,
    spawn_rng: ChaCha12Rng,
    food_rng: ChaCha12Rng,
    entrance_schedule: Option<EntranceSchedule>,
    food_spawner: Option<FoodSpawner>,
    next_boid_id: u32,
    step_index: usize,
    elapsed: f64,
    counters: StepCounters,
    total_meals: usize,

    // Buffers for avoiding allocation in simulation steps
    snapshot: Snapshot,
    flock_buffer: Vec<FlockForces>,
    boundary_buffer: Vec<DVec3>,
    avoidance_buffer: Vec<DVec3>,
    choice_buffer: Vec<Choice>,
    behavior_buffer: Vec<Behavior>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldInitError {
    Config(SimConfigError),
    TooManyBoids { max: usize, actual: usize },
    InvalidBoid { id: u32, source: SimConfigError },
    NonFiniteBoid { id: u32 },
    DuplicateBoidId { id: u32 },
}

impl fmt::Display for WorldInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldInitError::Config(e) => write!(f, "{}", e),
            WorldInitError::TooManyBoids { max, actual } => {
                write!(f, "boid count ({actual}) exceeds supported maximum ({max})")
            }
            WorldInitError::InvalidBoid { id, source } => {
                write!(f, "boid {id} has invalid parameters: {source}")
            }
            WorldInitError::NonFiniteBoid { id } => {
                write!(f, "boid {id} has a non-finite position or velocity")
            }
            WorldInitError::DuplicateBoidId { id } => write!(f, "duplicate boid id {id}"),
        }
    }
}

impl From<SimConfigError> for WorldInitError {
    fn from(err: SimConfigError) -> Self {
        WorldInitError::Config(err)
    }
}

impl Error for WorldInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorldInitError::Config(e) => Some(e),
            WorldInitError::InvalidBoid { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    InvalidSampleEvery,
    TooManySteps { max: usize, actual: usize },
    TooManySamples { max: usize, actual: usize },
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            ExperimentError::TooManySteps { max, actual } => {
                write!(f, "steps ({actual}) exceed supported maximum ({max})")
            }
            ExperimentError::TooManySamples { max, actual } => {
                write!(
                    f,
                    "sample count ({actual}) exceeds supported maximum ({max})"
                )
            }
        }
    }
}

impl Error for ExperimentError {}

fn validate_boid(boid: &Boid) -> Result<(), WorldInitError> {
    boid.params
        .validate()
        .map_err(|source| WorldInitError::InvalidBoid {
            id: boid.id,
            source,
        })?;
    if !(boid.position.is_finite() && boid.velocity.is_finite()) {
        return Err(WorldInitError::NonFiniteBoid { id: boid.id });
    }
    Ok(())
}

impl World {
    pub const MAX_EXPERIMENT_STEPS: usize = 1_000_000;
    pub const MAX_EXPERIMENT_SAMPLES: usize = 50_000;

    /// Build a world around an explicit roster. No boids are spawned and no food is
    /// placed; use [`World::food_mut`] and [`World::add_boid`] for that.
    pub fn new(boids: Vec<Boid>, config: SimConfig) -> Result<Self, WorldInitError> {
        config.validate()?;
        if boids.len() > SimConfig::MAX_BOIDS {
            return Err(WorldInitError::TooManyBoids {
                max: SimConfig::MAX_BOIDS,
                actual: boids.len(),
            });
        }
        let mut seen = HashSet::with_capacity(boids.len());
        for boid in &boids {
            validate_boid(boid)?;
            if !seen.insert(boid.id) {
                return Err(WorldInitError::DuplicateBoidId { id: boid.id });
            }
        }

        let arena = Arena::new(config.arena_center(), config.arena_radius);
        let boid_count = boids.len();
        let next_boid_id = boids
            .iter()
            .map(|b| b.id)
            .max()
            .map_or(0, |id| id.saturating_add(1));
        Ok(Self {
            boids,
            arena,
            food: FoodRegistry::new(),
            tree: DecisionTree::foraging(),
            integrator: Box::new(EulerIntegrator::new(config.freeze_vertical)),
            rng: rng::derive_stream_rng(config.seed, STEERING_STREAM),
            spawn_rng: rng::derive_stream_rng(config.seed, SPAWN_STREAM),
            food_rng: rng::derive_stream_rng(config.seed, FOOD_STREAM),
            entrance_schedule: None,
            food_spawner: None,
            next_boid_id,
            step_index: 0,
            elapsed: 0.0,
            counters: StepCounters::default(),
            total_meals: 0,
            snapshot: Snapshot::with_capacity(boid_count),
            flock_buffer: Vec::with_capacity(boid_count),
            boundary_buffer: Vec::with_capacity(boid_count),
            avoidance_buffer: Vec::with_capacity(boid_count),
            choice_buffer: Vec::with_capacity(boid_count),
            behavior_buffer: Vec::with_capacity(boid_count),
            config,
        })
    }

    /// Build an empty world that introduces `boid_count` boids over time and runs the
    /// food spawner when `enable_food` is set.
    pub fn staggered(config: SimConfig) -> Result<Self, WorldInitError> {
        let mut world = Self::new(Vec::new(), config)?;
        world.entrance_schedule = Some(EntranceSchedule::new(
            world.config.boid_count,
            world.config.spawn_interval,
        ));
        if world.config.enable_food {
            let spawner = FoodSpawner::new(
                world.config.max_food,
                world.config.food_spawn_interval,
                world.config.food_spawn_radius,
                world.config.food_height,
                world.config.food_nutritional_value,
            );
            spawner.prefill(&mut world.food, world.arena.center, &mut world.food_rng);
            world.food_spawner = Some(spawner);
        }
        Ok(world)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn food(&self) -> &FoodRegistry {
        &self.food
    }

    pub fn food_mut(&mut self) -> &mut FoodRegistry {
        &mut self.food
    }

    pub fn decision_tree(&self) -> &DecisionTree {
        &self.tree
    }

    pub fn set_integrator(&mut self, integrator: Box<dyn PhysicsIntegrator + Send>) {
        self.integrator = integrator;
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Simulated seconds since the world was created.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn total_meals(&self) -> usize {
        self.total_meals
    }

    pub fn last_step_counters(&self) -> StepCounters {
        self.counters
    }

    /// Behavior each boid executed in the most recent tick, in boid order.
    pub fn last_behaviors(&self) -> &[Behavior] {
        &self.behavior_buffer
    }

    /// Add a boid to the roster between ticks.
    pub fn add_boid(&mut self, boid: Boid) -> Result<(), WorldInitError> {
        validate_boid(&boid)?;
        if self.boids.len() >= SimConfig::MAX_BOIDS {
            return Err(WorldInitError::TooManyBoids {
                max: SimConfig::MAX_BOIDS,
                actual: self.boids.len() + 1,
            });
        }
        if self.boids.iter().any(|b| b.id == boid.id) {
            return Err(WorldInitError::DuplicateBoidId { id: boid.id });
        }
        self.next_boid_id = self.next_boid_id.max(boid.id.saturating_add(1));
        self.boids.push(boid);
        Ok(())
    }

    /// One full simulation step with the configured `dt`: staggered spawning and food
    /// placement, then [`World::tick`].
    pub fn step(&mut self) -> StepTimings {
        let dt = self.config.dt;
        self.step_spawn_phase(dt);
        self.tick(dt)
    }

    /// Advance every boid by `dt`.
    ///
    /// Order: snapshot, flocking and boundary forces for all boids, decisions for all
    /// boids, behavior execution and integration for all boids, hunger for all boids.
    pub fn tick(&mut self, dt: f64) -> StepTimings {
        let total_start = Instant::now();
        self.step_index = self.step_index.saturating_add(1);
        self.elapsed += dt;
        self.counters = StepCounters::default();

        let t0 = Instant::now();
        self.step_snapshot_phase();
        self.step_forces_phase();
        let aggregate_us = t0.elapsed().as_micros() as u64;

        let t1 = Instant::now();
        self.step_decision_phase();
        let decide_us = t1.elapsed().as_micros() as u64;

        let t2 = Instant::now();
        self.step_apply_phase(dt);
        self.step_hunger_phase(dt);
        let apply_us = t2.elapsed().as_micros() as u64;

        self.total_meals += self.counters.meals;
        tracing::trace!(
            step = self.step_index,
            boids = self.boids.len(),
            meals = self.counters.meals,
            independent = self.counters.independent,
            emergency = self.counters.emergency,
            "tick complete"
        );

        StepTimings {
            aggregate_us,
            decide_us,
            apply_us,
            total_us: total_start.elapsed().as_micros() as u64,
        }
    }

    pub fn run_experiment(&mut self, steps: usize, sample_every: usize) -> RunSummary {
        self.try_run_experiment(steps, sample_every)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_run_experiment(
        &mut self,
        steps: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if steps > Self::MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_EXPERIMENT_STEPS,
                actual: steps,
            });
        }
        let estimated_samples = if steps == 0 {
            0
        } else {
            ((steps - 1) / sample_every) + 1
        };
        if estimated_samples > Self::MAX_EXPERIMENT_SAMPLES {
            return Err(ExperimentError::TooManySamples {
                max: Self::MAX_EXPERIMENT_SAMPLES,
                actual: estimated_samples,
            });
        }

        let meals_before = self.total_meals;
        let mut samples = Vec::with_capacity(estimated_samples);
        for step in 1..=steps {
            self.step();
            if step % sample_every == 0 || step == steps {
                samples.push(crate::metrics::collect_step_metrics(
                    self.step_index,
                    &self.boids,
                    &self.behavior_buffer,
                    &self.arena,
                    &self.food,
                    self.counters,
                ));
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            steps,
            sample_every,
            final_boid_count: self.boids.len(),
            total_meals: self.total_meals - meals_before,
            samples,
        })
    }
}

mod phases;
