//! Solution and fitness types shared by every search strategy.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A point in the search space, one coordinate per dimension.
pub type Position = Vec<f64>;

/// Optimization direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    /// Lower target is better.
    #[default]
    Min,
    /// Higher target is better.
    Max,
}

impl Sense {
    /// Order two targets so that `Less` means `a` is better than `b`.
    ///
    /// `NaN` ranks worst under either sense, which keeps the ordering total.
    pub fn cmp_targets(self, a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
                match self {
                    Sense::Min => ord,
                    Sense::Max => ord.reverse(),
                }
            }
        }
    }

    /// True iff target `a` is at least as good as target `b`.
    pub fn target_at_least_as_good(self, a: f64, b: f64) -> bool {
        self.cmp_targets(a, b) != Ordering::Greater
    }

    /// True iff `a` is at least as good as `b`, comparing only targets.
    ///
    /// Every replacement and promotion decision goes through this predicate.
    pub fn compare(self, a: &Solution, b: &Solution) -> bool {
        self.target_at_least_as_good(a.fitness.target, b.fitness.target)
    }

    /// True iff `a` is strictly better than `b`.
    pub fn is_better(self, a: &Solution, b: &Solution) -> bool {
        self.cmp_targets(a.fitness.target, b.fitness.target) == Ordering::Less
    }

    /// Index of the best solution; the first one wins ties.
    pub fn best_index(self, population: &[Solution]) -> Option<usize> {
        population
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| self.cmp_targets(a.fitness.target, b.fitness.target))
            .map(|(i, _)| i)
    }

    /// Stable sort, best first.
    pub fn sort_best_first(self, population: &mut [Solution]) {
        population.sort_by(|a, b| self.cmp_targets(a.fitness.target, b.fitness.target));
    }
}

/// Fitness of a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    /// Weighted scalar used for every comparison.
    pub target: f64,
    /// Raw objective values, in objective order.
    pub objectives: Vec<f64>,
}

impl Fitness {
    /// Single-objective fitness where the target is the objective itself.
    pub fn scalar(value: f64) -> Self {
        Self {
            target: value,
            objectives: vec![value],
        }
    }
}

/// A position together with its evaluated fitness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub position: Position,
    pub fitness: Fitness,
}

impl Solution {
    pub fn new(position: Position, fitness: Fitness) -> Self {
        Self { position, fitness }
    }

    /// Shorthand for `self.fitness.target`.
    pub fn target(&self) -> f64 {
        self.fitness.target
    }
}
