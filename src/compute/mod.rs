//! Compute module - Population search engine and its building blocks.

mod bounds;
mod evaluator;
mod functions;
mod optimizer;
mod parallel;
mod rng;
mod selection;

pub mod strategy;

pub use bounds::*;
pub use evaluator::*;
pub use functions::*;
pub use optimizer::*;
pub use parallel::*;
pub use rng::*;
pub use selection::*;

use crate::schema::ConfigError;

/// Error type for optimization runs.
#[derive(Debug, thiserror::Error)]
pub enum OptimizerError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Objective evaluation failed for candidate {index}: {message}")]
    Evaluation { index: usize, message: String },

    #[error("Failed to build evaluation thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Optimizer has no population; call initialize first")]
    EmptyPopulation,
}
