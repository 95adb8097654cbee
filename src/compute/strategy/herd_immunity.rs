//! Coronavirus herd-immunity search.
//!
//! Every individual carries an immune status and an age. Coordinates are
//! pulled toward infected, susceptible or the best immune peers at a
//! rate set by the basic reproduction rate `brr`. Statuses then evolve
//! against the population's mean target, and infected individuals that stay
//! unimproved for `max_age` epochs die and are respawned at random.

use serde::{Deserialize, Serialize};

use crate::compute::{
    EvolveOutcome, OptimizerError, SearchContext, Strategy, filtered_random_index,
    sample_distinct_indices,
};
use crate::schema::{HerdImmunityConfig, HerdImmunityVariant, Position, Sense, Solution};

/// Share of the population reclassified when a peer group is empty.
const RECLASSIFY_FRACTION: f64 = 0.33;

/// Immune status of an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImmuneStatus {
    Susceptible,
    Infected,
    Immune,
}

impl ImmuneStatus {
    const ALL: [ImmuneStatus; 3] = [
        ImmuneStatus::Susceptible,
        ImmuneStatus::Infected,
        ImmuneStatus::Immune,
    ];
}

/// Herd-immunity strategy state.
#[derive(Debug, Clone)]
pub struct HerdImmunity {
    config: HerdImmunityConfig,
    statuses: Vec<ImmuneStatus>,
    ages: Vec<usize>,
}

impl HerdImmunity {
    pub fn new(config: HerdImmunityConfig) -> Self {
        Self {
            config,
            statuses: Vec::new(),
            ages: Vec::new(),
        }
    }

    pub fn config(&self) -> &HerdImmunityConfig {
        &self.config
    }

    /// Status per population slot.
    pub fn statuses(&self) -> &[ImmuneStatus] {
        &self.statuses
    }

    /// Age per population slot.
    pub fn ages(&self) -> &[usize] {
        &self.ages
    }

    /// Replace the individual in `slot` with a fresh random solution.
    ///
    /// Triggered when an infected individual reaches `max_age`. The slot
    /// becomes susceptible with age 0.
    pub fn respawn(
        &mut self,
        slot: usize,
        population: &mut [Solution],
        ctx: &mut SearchContext<'_>,
    ) -> Result<(), OptimizerError> {
        population[slot] = ctx.random_solution()?;
        self.statuses[slot] = ImmuneStatus::Susceptible;
        self.ages[slot] = 0;
        Ok(())
    }

    /// Random peer with `status`, applying the variant's fallback when the
    /// group is empty. `None` means the run cannot continue.
    fn random_peer(&mut self, status: ImmuneStatus, ctx: &mut SearchContext<'_>) -> Option<usize> {
        if let Some(idx) = filtered_random_index(ctx.rng, &self.statuses, &status) {
            return Some(idx);
        }

        match self.config.variant {
            HerdImmunityVariant::Original => None,
            HerdImmunityVariant::Improved => {
                let n = self.statuses.len();
                let count = ((RECLASSIFY_FRACTION * n as f64).ceil() as usize).max(1);
                log::warn!(
                    "No {:?} individuals left; reclassifying {} of {}",
                    status,
                    count,
                    n
                );
                for idx in sample_distinct_indices(ctx.rng, n, count) {
                    self.statuses[idx] = status;
                }
                filtered_random_index(ctx.rng, &self.statuses, &status)
            }
        }
    }

    /// Immune individual with the best target; first one wins ties.
    fn best_immune(&self, population: &[Solution], sense: Sense) -> Option<usize> {
        self.statuses
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == ImmuneStatus::Immune)
            .map(|(i, _)| i)
            .min_by(|&a, &b| sense.cmp_targets(population[a].target(), population[b].target()))
    }
}

impl Strategy for HerdImmunity {
    fn name(&self) -> &'static str {
        "herd-immunity"
    }

    fn initialize(
        &mut self,
        population: &[Solution],
        ctx: &mut SearchContext<'_>,
    ) -> Result<(), OptimizerError> {
        self.statuses = (0..population.len())
            .map(|_| ImmuneStatus::ALL[ctx.rng.index(ImmuneStatus::ALL.len())])
            .collect();
        self.ages = vec![0; population.len()];
        Ok(())
    }

    fn evolve(
        &mut self,
        epoch: usize,
        population: &[Solution],
        _global_best: &Solution,
        ctx: &mut SearchContext<'_>,
    ) -> Result<EvolveOutcome, OptimizerError> {
        let n = population.len();
        if self.statuses.len() != n {
            self.initialize(population, ctx)?;
        }
        let third = self.config.brr / 3.0;
        let mut exposed = vec![false; n];
        let mut positions: Vec<Position> = Vec::with_capacity(n);

        for i in 0..n {
            let current = &population[i].position;
            let mut position = current.clone();

            for j in 0..current.len() {
                let r = ctx.rng.unit();
                let peer = if r < third {
                    exposed[i] = true;
                    match self.random_peer(ImmuneStatus::Infected, ctx) {
                        Some(idx) => Some(idx),
                        None => {
                            return Ok(EvolveOutcome::Halt(format!(
                                "no infected individuals at epoch {}",
                                epoch
                            )));
                        }
                    }
                } else if r < 2.0 * third {
                    match self.random_peer(ImmuneStatus::Susceptible, ctx) {
                        Some(idx) => Some(idx),
                        None => {
                            return Ok(EvolveOutcome::Halt(format!(
                                "no susceptible individuals at epoch {}",
                                epoch
                            )));
                        }
                    }
                } else if r < self.config.brr {
                    self.best_immune(population, ctx.sense)
                } else {
                    None
                };

                if let Some(c) = peer {
                    let peer_x = population[c].position[j];
                    position[j] = current[j] + ctx.rng.unit() * (peer_x - current[j]);
                }
            }
            positions.push(position);
        }

        let candidates = ctx.evaluate_candidates(positions)?;
        let candidate_targets: Vec<f64> = candidates.iter().map(Solution::target).collect();

        // Acceptance: keep the better of occupant and candidate.
        let mut next = population.to_vec();
        for (i, candidate) in candidates.into_iter().enumerate() {
            if ctx.sense.compare(&candidate, &next[i]) {
                next[i] = candidate;
            } else {
                self.ages[i] += 1;
            }
        }

        // Mean after every acceptance, fixed for all slots in this epoch.
        // Respawns below do not shift it.
        let delta = next.iter().map(Solution::target).sum::<f64>() / n.max(1) as f64;

        for i in 0..n {
            let target = candidate_targets[i];
            match self.statuses[i] {
                ImmuneStatus::Susceptible
                    if exposed[i] && ctx.sense.target_at_least_as_good(target, delta) =>
                {
                    self.statuses[i] = ImmuneStatus::Infected;
                    self.ages[i] = 1;
                }
                ImmuneStatus::Infected if ctx.sense.target_at_least_as_good(delta, target) => {
                    self.statuses[i] = ImmuneStatus::Immune;
                    self.ages[i] = 0;
                }
                _ => {}
            }

            if self.statuses[i] == ImmuneStatus::Infected && self.ages[i] >= self.config.max_age {
                log::debug!("Fatality in slot {} at epoch {}", i, epoch);
                self.respawn(i, &mut next, ctx)?;
            }
        }

        Ok(EvolveOutcome::Continue(next))
    }
}
