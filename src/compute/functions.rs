//! Benchmark objective functions.

use std::f64::consts::{E, PI};

use crate::schema::BenchmarkFunction;

/// Sphere: `sum x_i^2`. Global minimum 0 at the origin.
pub fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|xi| xi * xi).sum()
}

/// Rastrigin: highly multimodal, minimum 0 at the origin.
pub fn rastrigin(x: &[f64]) -> f64 {
    let n = x.len() as f64;
    10.0 * n
        + x.iter()
            .map(|xi| xi * xi - 10.0 * (2.0 * PI * xi).cos())
            .sum::<f64>()
}

/// Rosenbrock: narrow curved valley, minimum 0 at `(1, ..., 1)`.
pub fn rosenbrock(x: &[f64]) -> f64 {
    x.windows(2)
        .map(|w| {
            let a = w[1] - w[0] * w[0];
            let b = 1.0 - w[0];
            100.0 * a * a + b * b
        })
        .sum()
}

/// Ackley: nearly flat outer region, minimum 0 at the origin.
pub fn ackley(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let n = x.len() as f64;
    let sum_sq: f64 = x.iter().map(|xi| xi * xi).sum();
    let sum_cos: f64 = x.iter().map(|xi| (2.0 * PI * xi).cos()).sum();

    -20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E
}

/// Griewank: product term couples dimensions, minimum 0 at the origin.
pub fn griewank(x: &[f64]) -> f64 {
    let sum: f64 = x.iter().map(|xi| xi * xi).sum::<f64>() / 4000.0;
    let prod: f64 = x
        .iter()
        .enumerate()
        .map(|(i, xi)| (xi / ((i + 1) as f64).sqrt()).cos())
        .product();
    sum - prod + 1.0
}

impl BenchmarkFunction {
    /// Evaluate the function at `x`.
    pub fn evaluate(self, x: &[f64]) -> f64 {
        match self {
            BenchmarkFunction::Sphere => sphere(x),
            BenchmarkFunction::Rastrigin => rastrigin(x),
            BenchmarkFunction::Rosenbrock => rosenbrock(x),
            BenchmarkFunction::Ackley => ackley(x),
            BenchmarkFunction::Griewank => griewank(x),
        }
    }

    /// Plain function pointer, usable directly as an objective.
    pub fn as_fn(self) -> fn(&[f64]) -> f64 {
        match self {
            BenchmarkFunction::Sphere => sphere,
            BenchmarkFunction::Rastrigin => rastrigin,
            BenchmarkFunction::Rosenbrock => rosenbrock,
            BenchmarkFunction::Ackley => ackley,
            BenchmarkFunction::Griewank => griewank,
        }
    }
}
