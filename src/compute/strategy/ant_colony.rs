//! Ant colony optimization for continuous domains.
//!
//! The ranked population acts as a solution archive. Each new sample picks,
//! per coordinate, a parent by rank-weighted roulette and draws from a
//! Gaussian centred on that parent with a spread equal to the parent's mean
//! distance to the rest of the archive.

use std::f64::consts::PI;

use crate::compute::{
    Bounds, EvolveOutcome, OptimizerError, PopulationOrder, SearchContext, SearchRng, Strategy,
    roulette_wheel_select,
};
use crate::schema::{AntColonyConfig, Position, Solution};

/// Continuous ant-colony strategy. Stateless across epochs.
#[derive(Debug, Clone)]
pub struct AntColony {
    config: AntColonyConfig,
}

impl AntColony {
    pub fn new(config: AntColonyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AntColonyConfig {
        &self.config
    }

    /// Selection probability per rank (index 0 = best) for an archive of `n`.
    pub fn rank_probabilities(&self, n: usize) -> Vec<f64> {
        let qn = self.config.q * n as f64;
        let weights: Vec<f64> = (0..n)
            .map(|k| {
                let k = k as f64;
                (-0.5 * (k / qn).powi(2)).exp() / (qn * (2.0 * PI).sqrt())
            })
            .collect();
        let total: f64 = weights.iter().sum();
        weights.into_iter().map(|w| w / total).collect()
    }

    /// Per-individual, per-coordinate sampling deviation:
    /// `zeta * mean |x_ij - x_mj|` over the other archive members.
    pub fn deviations(&self, archive: &[Solution]) -> Vec<Vec<f64>> {
        let n = archive.len();
        if n < 2 {
            return archive
                .iter()
                .map(|s| vec![0.0; s.position.len()])
                .collect();
        }

        let scale = self.config.zeta / (n - 1) as f64;
        archive
            .iter()
            .map(|si| {
                si.position
                    .iter()
                    .enumerate()
                    .map(|(j, &xij)| {
                        scale
                            * archive
                                .iter()
                                .map(|sm| (xij - sm.position[j]).abs())
                                .sum::<f64>()
                    })
                    .collect()
            })
            .collect()
    }
}

/// Draw one repaired sample from the archive.
fn sample_position(
    rng: &mut SearchRng,
    archive: &[Solution],
    probabilities: &[f64],
    sigma: &[Vec<f64>],
    bounds: &Bounds,
) -> Position {
    let n_dims = bounds.n_dims();
    let mut position = Vec::with_capacity(n_dims);
    for j in 0..n_dims {
        let parent = roulette_wheel_select(rng, probabilities).unwrap_or(0);
        position.push(rng.gaussian(archive[parent].position[j], sigma[parent][j]));
    }
    bounds.repair(&position)
}

impl Strategy for AntColony {
    fn name(&self) -> &'static str {
        "ant-colony"
    }

    fn ordering(&self) -> PopulationOrder {
        PopulationOrder::Ranked
    }

    fn initialize(
        &mut self,
        _population: &[Solution],
        _ctx: &mut SearchContext<'_>,
    ) -> Result<(), OptimizerError> {
        Ok(())
    }

    fn evolve(
        &mut self,
        _epoch: usize,
        population: &[Solution],
        _global_best: &Solution,
        ctx: &mut SearchContext<'_>,
    ) -> Result<EvolveOutcome, OptimizerError> {
        // Keep-best truncation: last epoch's samples compete for the archive.
        let mut archive = population.to_vec();
        ctx.sense.sort_best_first(&mut archive);
        archive.truncate(ctx.pop_size);

        let probabilities = self.rank_probabilities(archive.len());
        let sigma = self.deviations(&archive);

        // One child seed per sample keeps results independent of the mode.
        let seeds: Vec<u64> = (0..self.config.sample_count)
            .map(|_| ctx.rng.next_seed())
            .collect();

        let bounds = ctx.bounds;
        let evaluator = ctx.evaluator;
        let children = evaluator
            .executor()
            .map(&seeds, |index, &seed| {
                let mut rng = SearchRng::new(seed);
                let position = sample_position(&mut rng, &archive, &probabilities, &sigma, bounds);
                evaluator
                    .evaluate_at(index, &position)
                    .map(|fitness| Solution::new(position, fitness))
            })
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        archive.extend(children);
        Ok(EvolveOutcome::Continue(archive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{BatchExecutor, FitnessEvaluator, sphere};
    use crate::schema::{EvaluationMode, Fitness, Sense};

    fn ctx<'a>(
        bounds: &'a Bounds,
        evaluator: &'a FitnessEvaluator,
        rng: &'a mut SearchRng,
        pop_size: usize,
    ) -> SearchContext<'a> {
        SearchContext {
            bounds,
            evaluator,
            rng,
            sense: Sense::Min,
            pop_size,
        }
    }

    fn solution(position: Vec<f64>) -> Solution {
        let target = sphere(&position);
        Solution::new(position, Fitness::scalar(target))
    }

    #[test]
    fn test_rank_probabilities() {
        let colony = AntColony::new(AntColonyConfig::default());
        let p = colony.rank_probabilities(10);

        assert_eq!(p.len(), 10);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        for pair in p.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn test_two_member_deviation() {
        let colony = AntColony::new(AntColonyConfig {
            zeta: 0.85,
            ..Default::default()
        });
        let archive = vec![solution(vec![1.0, -2.0]), solution(vec![4.0, 3.0])];
        let sigma = colony.deviations(&archive);

        for (j, expected) in [3.0, 5.0].into_iter().enumerate() {
            assert!((sigma[0][j] - 0.85 * expected).abs() < 1e-12);
            assert!((sigma[1][j] - 0.85 * expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_single_member_has_zero_deviation() {
        let colony = AntColony::new(AntColonyConfig::default());
        let sigma = colony.deviations(&[solution(vec![1.0, 2.0])]);
        assert_eq!(sigma, vec![vec![0.0, 0.0]]);
    }

    #[test]
    fn test_zero_samples_keeps_population() {
        let bounds = Bounds::uniform(3, -10.0, 10.0).unwrap();
        let evaluator = FitnessEvaluator::new(sphere, None, BatchExecutor::sequential());
        let mut rng = SearchRng::new(42);
        let mut ctx = ctx(&bounds, &evaluator, &mut rng, 6);

        let mut population = ctx.random_population(6).unwrap();
        Sense::Min.sort_best_first(&mut population);

        let mut colony = AntColony::new(AntColonyConfig {
            sample_count: 0,
            ..Default::default()
        });
        let best = population[0].clone();
        match colony.evolve(1, &population, &best, &mut ctx).unwrap() {
            EvolveOutcome::Continue(next) => assert_eq!(next, population),
            EvolveOutcome::Halt(reason) => panic!("unexpected halt: {}", reason),
        }
    }

    #[test]
    fn test_population_grows_and_truncates() {
        let bounds = Bounds::uniform(2, -5.0, 5.0).unwrap();
        let evaluator = FitnessEvaluator::new(sphere, None, BatchExecutor::sequential());
        let mut rng = SearchRng::new(7);
        let mut ctx = ctx(&bounds, &evaluator, &mut rng, 8);
        let mut colony = AntColony::new(AntColonyConfig {
            sample_count: 5,
            ..Default::default()
        });

        let mut population = ctx.random_population(8).unwrap();
        let best = population[0].clone();
        for epoch in 1..=3 {
            population = match colony.evolve(epoch, &population, &best, &mut ctx).unwrap() {
                EvolveOutcome::Continue(next) => next,
                EvolveOutcome::Halt(reason) => panic!("unexpected halt: {}", reason),
            };
            // Top pop_size archive plus this epoch's samples.
            assert_eq!(population.len(), 8 + 5);
            assert!(population.iter().all(|s| bounds.contains(&s.position)));
        }
    }

    #[test]
    fn test_samples_identical_across_modes() {
        let bounds = Bounds::uniform(4, -3.0, 3.0).unwrap();
        let sample = |mode: EvaluationMode| {
            let evaluator =
                FitnessEvaluator::new(sphere, None, BatchExecutor::new(mode, Some(3)).unwrap());
            let mut rng = SearchRng::new(99);
            let mut ctx = ctx(&bounds, &evaluator, &mut rng, 10);
            let population = ctx.random_population(10).unwrap();
            let mut colony = AntColony::new(AntColonyConfig {
                sample_count: 20,
                ..Default::default()
            });
            let best = population[0].clone();
            match colony.evolve(1, &population, &best, &mut ctx).unwrap() {
                EvolveOutcome::Continue(next) => next,
                EvolveOutcome::Halt(reason) => panic!("unexpected halt: {}", reason),
            }
        };

        let reference = sample(EvaluationMode::Sequential);
        assert_eq!(sample(EvaluationMode::Thread), reference);
        assert_eq!(sample(EvaluationMode::Process), reference);
    }
}
