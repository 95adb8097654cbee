//! Fitness evaluation: objective invocation, weighting and batch modes.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::schema::{ConfigError, Fitness, Position};

use super::{BatchExecutor, OptimizerError};

/// Values an objective function may return.
pub trait IntoObjectives {
    /// Raw objective vector, or an error message.
    fn into_objectives(self) -> Result<Vec<f64>, String>;
}

impl IntoObjectives for f64 {
    fn into_objectives(self) -> Result<Vec<f64>, String> {
        Ok(vec![self])
    }
}

impl IntoObjectives for Vec<f64> {
    fn into_objectives(self) -> Result<Vec<f64>, String> {
        Ok(self)
    }
}

impl<const N: usize> IntoObjectives for [f64; N] {
    fn into_objectives(self) -> Result<Vec<f64>, String> {
        Ok(self.to_vec())
    }
}

impl<T, E> IntoObjectives for Result<T, E>
where
    T: IntoObjectives,
    E: fmt::Display,
{
    fn into_objectives(self) -> Result<Vec<f64>, String> {
        self.map_err(|e| e.to_string())?.into_objectives()
    }
}

/// A black-box objective over positions.
///
/// Implemented for every `Fn(&[f64]) -> R` where `R` is a scalar, a vector,
/// a fixed-size array or a `Result` of those.
pub trait Objective: Send + Sync {
    fn objectives(&self, position: &[f64]) -> Result<Vec<f64>, String>;
}

impl<F, R> Objective for F
where
    F: Fn(&[f64]) -> R + Send + Sync,
    R: IntoObjectives,
{
    fn objectives(&self, position: &[f64]) -> Result<Vec<f64>, String> {
        self(position).into_objectives()
    }
}

/// Evaluates positions and returns weighted fitness.
pub struct FitnessEvaluator {
    objective: Box<dyn Objective>,
    weights: Option<Vec<f64>>,
    executor: BatchExecutor,
    evaluations: AtomicU64,
}

impl fmt::Debug for FitnessEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FitnessEvaluator")
            .field("weights", &self.weights)
            .field("executor", &self.executor)
            .field("evaluations", &self.evaluations)
            .finish_non_exhaustive()
    }
}

impl FitnessEvaluator {
    /// Create a new fitness evaluator.
    pub fn new<O>(objective: O, weights: Option<Vec<f64>>, executor: BatchExecutor) -> Self
    where
        O: Objective + 'static,
    {
        Self {
            objective: Box::new(objective),
            weights,
            executor,
            evaluations: AtomicU64::new(0),
        }
    }

    /// Evaluate a single position.
    pub fn evaluate(&self, position: &[f64]) -> Result<Fitness, OptimizerError> {
        self.evaluate_at(0, position)
    }

    /// Evaluate a position that sits at `index` of some batch; the index
    /// is carried into the error on failure.
    pub fn evaluate_at(&self, index: usize, position: &[f64]) -> Result<Fitness, OptimizerError> {
        self.evaluations.fetch_add(1, Ordering::Relaxed);

        let objectives = self
            .objective
            .objectives(position)
            .map_err(|message| OptimizerError::Evaluation { index, message })?;
        if objectives.is_empty() {
            return Err(OptimizerError::Evaluation {
                index,
                message: "objective returned no values".to_string(),
            });
        }

        let target = self.combine(&objectives)?;
        Ok(Fitness { target, objectives })
    }

    /// Evaluate a batch in the configured mode.
    ///
    /// Results line up with `positions`. If several evaluations fail, the
    /// error of the lowest index is returned.
    pub fn evaluate_batch(&self, positions: &[Position]) -> Result<Vec<Fitness>, OptimizerError> {
        self.executor
            .map(positions, |index, position| self.evaluate_at(index, position))
            .into_iter()
            .collect()
    }

    /// Weighted sum of the objectives.
    pub fn combine(&self, objectives: &[f64]) -> Result<f64, ConfigError> {
        match &self.weights {
            Some(weights) if weights.len() != objectives.len() => {
                Err(ConfigError::WeightCountMismatch {
                    expected: weights.len(),
                    actual: objectives.len(),
                })
            }
            Some(weights) => Ok(weights.iter().zip(objectives).map(|(w, o)| w * o).sum()),
            None => Ok(objectives.iter().sum()),
        }
    }

    pub fn executor(&self) -> &BatchExecutor {
        &self.executor
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Objective invocations so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }
}
