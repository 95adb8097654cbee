//! Metasearch - Population-based metaheuristic optimization.
//!
//! This crate provides a population manager for black-box continuous
//! optimization over box-bounded domains, with two interchangeable search
//! strategies: a herd-immunity (coronavirus herd immunity) optimizer and a
//! continuous ant-colony optimizer.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, solutions, history and result types
//! - `compute`: Bounds, evaluation, parallel execution, the optimizer loop
//!   and the strategies
//!
//! # Example
//!
//! ```rust,no_run
//! use metasearch::{
//!     compute::{Bounds, Optimizer},
//!     schema::{OptimizerConfig, StrategyConfig, AntColonyConfig},
//! };
//!
//! let config = OptimizerConfig {
//!     epoch: 200,
//!     pop_size: 30,
//!     strategy: StrategyConfig::AntColony(AntColonyConfig::default()),
//!     ..Default::default()
//! };
//! let bounds = Bounds::uniform(5, -10.0, 10.0).unwrap();
//!
//! let objective = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
//! let mut optimizer = Optimizer::new(config, bounds, objective).unwrap();
//! let result = optimizer.run().unwrap();
//!
//! println!("Best target: {}", result.best.target());
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{Bounds, Optimizer, OptimizerError, Strategy};
pub use schema::{
    EvaluationMode, Fitness, History, OptimizationResult, OptimizerConfig, Sense, Solution,
    StrategyConfig,
};
