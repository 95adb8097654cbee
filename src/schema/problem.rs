//! Benchmark problem definitions for the CLI and demos.

use serde::{Deserialize, Serialize};

use super::OptimizerConfig;

/// Standard test functions with known global minima at the origin
/// (rosenbrock: at `(1, ..., 1)`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkFunction {
    #[default]
    Sphere,
    Rastrigin,
    Rosenbrock,
    Ackley,
    Griewank,
}

impl BenchmarkFunction {
    /// Conventional symmetric search domain `(lower, upper)`.
    pub fn default_domain(self) -> (f64, f64) {
        match self {
            BenchmarkFunction::Sphere => (-10.0, 10.0),
            BenchmarkFunction::Rastrigin => (-5.12, 5.12),
            BenchmarkFunction::Rosenbrock => (-30.0, 30.0),
            BenchmarkFunction::Ackley => (-32.0, 32.0),
            BenchmarkFunction::Griewank => (-600.0, 600.0),
        }
    }
}

/// Box-bounded benchmark problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemConfig {
    /// Objective function.
    #[serde(default)]
    pub function: BenchmarkFunction,
    /// Number of dimensions.
    #[serde(default = "default_n_dims")]
    pub n_dims: usize,
    /// Lower bound per dimension. If None, uses the function's domain.
    #[serde(default)]
    pub lower: Option<Vec<f64>>,
    /// Upper bound per dimension. If None, uses the function's domain.
    #[serde(default)]
    pub upper: Option<Vec<f64>>,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            function: BenchmarkFunction::default(),
            n_dims: default_n_dims(),
            lower: None,
            upper: None,
        }
    }
}

fn default_n_dims() -> usize {
    5
}

impl ProblemConfig {
    /// Resolve per-dimension bounds, filling gaps from the function domain.
    pub fn resolved_bounds(&self) -> (Vec<f64>, Vec<f64>) {
        let (lo, hi) = self.function.default_domain();
        let lower = self
            .lower
            .clone()
            .unwrap_or_else(|| vec![lo; self.n_dims]);
        let upper = self
            .upper
            .clone()
            .unwrap_or_else(|| vec![hi; self.n_dims]);
        (lower, upper)
    }
}

/// A complete run description: problem plus optimizer settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub problem: ProblemConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}
