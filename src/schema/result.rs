//! Progress and result types reported by the optimizer.

use serde::{Deserialize, Serialize};

use super::{History, Sense, Solution};

/// Progress update emitted after every epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochProgress {
    /// Epochs completed so far.
    pub epoch: usize,
    /// Epoch budget.
    pub total_epochs: usize,
    /// Target of the global best.
    pub best_target: f64,
    /// Best target in the current population.
    pub current_best: f64,
    /// Average target of the current population.
    pub avg_target: f64,
    /// Epochs since the global best last improved.
    pub stagnation_count: usize,
    /// Objective evaluations so far.
    pub evaluations: u64,
}

/// Fitness curves for plotting, one entry per epoch.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FitnessHistory {
    /// Global best target after each epoch.
    pub global_best: Vec<f64>,
    /// Best target in the population after each epoch.
    pub current_best: Vec<f64>,
    /// Average target after each epoch.
    pub average: Vec<f64>,
    /// Standard deviation of targets after each epoch.
    pub std_dev: Vec<f64>,
}

impl FitnessHistory {
    /// Append statistics for one epoch.
    pub fn record(&mut self, sense: Sense, global_best: f64, population: &[Solution]) {
        let n = population.len().max(1) as f64;
        let current_best = sense
            .best_index(population)
            .map_or(f64::NAN, |i| population[i].target());
        let average = population.iter().map(Solution::target).sum::<f64>() / n;
        let variance = population
            .iter()
            .map(|s| (s.target() - average).powi(2))
            .sum::<f64>()
            / n;

        self.global_best.push(global_best);
        self.current_best.push(current_best);
        self.average.push(average);
        self.std_dev.push(variance.sqrt());
    }

    pub fn len(&self) -> usize {
        self.global_best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global_best.is_empty()
    }
}

/// Final result of an optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Best solution found.
    pub best: Solution,
    /// Statistics from the run.
    pub stats: RunStats,
    /// Per-epoch fitness curves.
    pub curves: FitnessHistory,
    /// Population snapshots (empty when history recording is off).
    pub history: History,
}

/// Statistics from an optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Epochs completed.
    pub epochs: usize,
    /// Total objective evaluations.
    pub evaluations: u64,
    /// Target of the best solution.
    pub best_target: f64,
    /// Average target of the final population.
    pub final_avg_target: f64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Reason for stopping.
    pub stop_reason: StopReason,
}

/// Reason a run stopped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Reached the epoch budget.
    MaxEpochs,
    /// Global best reached the configured target.
    TargetReached,
    /// Stagnation limit hit.
    Stagnation,
    /// User cancelled.
    Cancelled,
    /// The strategy could not continue.
    StrategyHalted(String),
}

impl StopReason {
    /// True for every reason except exhausting the epoch budget.
    pub fn terminated_early(&self) -> bool {
        !matches!(self, StopReason::MaxEpochs)
    }
}
