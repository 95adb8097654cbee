//! Concrete search strategies.
//!
//! # Strategies
//!
//! - `HerdImmunity`: status-driven moves relative to infected, susceptible
//!   and immune peers, with fatality and respawn of stale infected slots
//! - `AntColony`: Gaussian sampling around a rank-weighted solution archive
//!
//! Both implement [`Strategy`](super::Strategy) and are interchangeable
//! inside the [`Optimizer`](super::Optimizer).

mod ant_colony;
mod herd_immunity;

pub use ant_colony::AntColony;
pub use herd_immunity::{HerdImmunity, ImmuneStatus};

use crate::schema::StrategyConfig;

use super::Strategy;

/// Build the strategy described by `config`.
pub fn build_strategy(config: &StrategyConfig) -> Box<dyn Strategy> {
    match config {
        StrategyConfig::HerdImmunity(config) => Box::new(HerdImmunity::new(config.clone())),
        StrategyConfig::AntColony(config) => Box::new(AntColony::new(config.clone())),
    }
}
