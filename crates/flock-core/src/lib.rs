pub mod arena;
pub mod behavior;
pub mod boid;
pub mod boundary;
pub mod config;
pub mod constants;
pub mod decision;
pub mod flocking;
pub mod food;
pub mod height;
pub mod hunger;
pub mod metrics;
pub mod physics;
pub mod rng;
pub mod spawn;
pub mod steering;
pub mod world;

pub use arena::Arena;
pub use boid::Boid;
pub use config::{BoidParams, FlightParams, SimConfig, SimConfigError};
pub use metrics::{RunSummary, StepMetrics};
pub use world::{ExperimentError, StepTimings, World, WorldInitError};
