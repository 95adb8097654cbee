//! Per-epoch population history for trajectory visualization.
//!
//! The history is append-only. Consumers (chart exporters, notebooks) read
//! snapshots or pull per-agent coordinate trajectories out of it.

use serde::{Deserialize, Serialize};

use super::Solution;

/// Deep copy of the population at the end of one epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    /// Epoch that produced this population (1-based).
    pub epoch: usize,
    /// Solutions in population order.
    pub solutions: Vec<Solution>,
}

/// Ordered sequence of population snapshots, one per epoch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    snapshots: Vec<PopulationSnapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot of `population` for `epoch`.
    pub fn record(&mut self, epoch: usize, population: &[Solution]) {
        self.snapshots.push(PopulationSnapshot {
            epoch,
            solutions: population.to_vec(),
        });
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[PopulationSnapshot] {
        &self.snapshots
    }

    /// Snapshot recorded for `epoch`, if any.
    pub fn get(&self, epoch: usize) -> Option<&PopulationSnapshot> {
        self.snapshots.iter().find(|s| s.epoch == epoch)
    }

    /// Coordinate `dim` of population slot `agent` across all epochs.
    ///
    /// Epochs where the slot or dimension does not exist are skipped.
    pub fn trajectory(&self, agent: usize, dim: usize) -> Vec<f64> {
        self.snapshots
            .iter()
            .filter_map(|s| s.solutions.get(agent))
            .filter_map(|sol| sol.position.get(dim).copied())
            .collect()
    }

    /// Trajectories of several agents along the same dimension.
    pub fn trajectories(&self, agents: &[usize], dim: usize) -> Vec<Vec<f64>> {
        agents
            .iter()
            .map(|&agent| self.trajectory(agent, dim))
            .collect()
    }

    /// Target of population slot `agent` across all epochs.
    pub fn target_trajectory(&self, agent: usize) -> Vec<f64> {
        self.snapshots
            .iter()
            .filter_map(|s| s.solutions.get(agent))
            .map(Solution::target)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Fitness;

    fn population(offset: f64) -> Vec<Solution> {
        (0..3)
            .map(|i| {
                let x = offset + i as f64;
                Solution::new(vec![x, -x], Fitness::scalar(x * x))
            })
            .collect()
    }

    #[test]
    fn test_record_is_deep_copy() {
        let mut history = History::new();
        let mut pop = population(0.0);
        history.record(1, &pop);

        pop[0].position[0] = 100.0;
        assert_eq!(history.snapshots()[0].solutions[0].position[0], 0.0);
    }

    #[test]
    fn test_trajectory_extraction() {
        let mut history = History::new();
        for epoch in 1..=4 {
            history.record(epoch, &population(epoch as f64));
        }

        assert_eq!(history.len(), 4);
        assert_eq!(history.trajectory(0, 0), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(history.trajectory(2, 1), vec![-3.0, -4.0, -5.0, -6.0]);
        assert_eq!(history.target_trajectory(0), vec![1.0, 4.0, 9.0, 16.0]);

        let both = history.trajectories(&[0, 1], 0);
        assert_eq!(both.len(), 2);
        assert_eq!(both[1], vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_missing_agent_skipped() {
        let mut history = History::new();
        history.record(1, &population(0.0));
        assert!(history.trajectory(10, 0).is_empty());
        assert!(history.trajectory(0, 5).is_empty());
        assert!(history.get(1).is_some());
        assert!(history.get(2).is_none());
    }
}
