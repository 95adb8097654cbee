//! Schema module - Configuration, solution and result types for search runs.

mod config;
mod history;
mod problem;
mod result;
mod solution;

pub use config::*;
pub use history::*;
pub use problem::*;
pub use result::*;
pub use solution::*;
