//! Population manager that drives a pluggable search strategy.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::schema::{
    EpochProgress, FitnessHistory, History, OptimizationResult, OptimizerConfig, Position,
    RunStats, Sense, Solution, StopReason,
};

use super::strategy::build_strategy;
use super::{BatchExecutor, Bounds, FitnessEvaluator, Objective, OptimizerError, SearchRng};

/// Population order a strategy expects between epochs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulationOrder {
    /// Slots keep their identity across epochs.
    Insertion,
    /// Sorted best first after every epoch.
    Ranked,
}

/// Outcome of one evolve step.
#[derive(Debug, Clone)]
pub enum EvolveOutcome {
    /// The next population.
    Continue(Vec<Solution>),
    /// The strategy cannot proceed; the run ends with the best so far.
    Halt(String),
}

/// Services the optimizer lends to a strategy for the duration of a call.
pub struct SearchContext<'a> {
    pub bounds: &'a Bounds,
    pub evaluator: &'a FitnessEvaluator,
    pub rng: &'a mut SearchRng,
    pub sense: Sense,
    pub pop_size: usize,
}

impl SearchContext<'_> {
    /// Fresh random solution, evaluated.
    pub fn random_solution(&mut self) -> Result<Solution, OptimizerError> {
        let position = self.bounds.random_position(self.rng);
        let fitness = self.evaluator.evaluate(&position)?;
        Ok(Solution::new(position, fitness))
    }

    /// `n` random solutions, evaluated as one batch.
    pub fn random_population(&mut self, n: usize) -> Result<Vec<Solution>, OptimizerError> {
        let positions: Vec<Position> = (0..n)
            .map(|_| self.bounds.random_position(self.rng))
            .collect();
        self.evaluate_candidates(positions)
    }

    /// Repair candidate positions and evaluate them as one batch.
    pub fn evaluate_candidates(
        &self,
        positions: Vec<Position>,
    ) -> Result<Vec<Solution>, OptimizerError> {
        let repaired: Vec<Position> = positions.iter().map(|p| self.bounds.repair(p)).collect();
        let fitness = self.evaluator.evaluate_batch(&repaired)?;
        Ok(repaired
            .into_iter()
            .zip(fitness)
            .map(|(position, fitness)| Solution::new(position, fitness))
            .collect())
    }
}

/// A search strategy: one-time setup plus a per-epoch evolve step.
///
/// Strategies read the population and return the next one; only the
/// optimizer installs it. Auxiliary per-slot state belongs to the strategy.
pub trait Strategy: Send {
    /// Strategy name for logging.
    fn name(&self) -> &'static str;

    /// Order the optimizer maintains between epochs.
    fn ordering(&self) -> PopulationOrder {
        PopulationOrder::Insertion
    }

    /// Set up auxiliary state for the initial population.
    fn initialize(
        &mut self,
        population: &[Solution],
        ctx: &mut SearchContext<'_>,
    ) -> Result<(), OptimizerError>;

    /// Produce the population for `epoch` (1-based).
    fn evolve(
        &mut self,
        epoch: usize,
        population: &[Solution],
        global_best: &Solution,
        ctx: &mut SearchContext<'_>,
    ) -> Result<EvolveOutcome, OptimizerError>;
}

/// Optimizer that owns the population and runs the search.
pub struct Optimizer {
    config: OptimizerConfig,
    bounds: Bounds,
    evaluator: FitnessEvaluator,
    strategy: Box<dyn Strategy>,
    rng: SearchRng,
    population: Vec<Solution>,
    global_best: Option<Solution>,
    curves: FitnessHistory,
    history: History,
    epoch: usize,
    stagnation_count: usize,
    cancelled: Arc<AtomicBool>,
}

impl Optimizer {
    /// Create an optimizer running the strategy named in `config`.
    pub fn new<O>(config: OptimizerConfig, bounds: Bounds, objective: O) -> Result<Self, OptimizerError>
    where
        O: Objective + 'static,
    {
        let strategy = build_strategy(&config.strategy);
        Self::with_strategy(config, bounds, objective, strategy)
    }

    /// Create an optimizer with a caller-supplied strategy.
    /// `config.strategy` is ignored.
    pub fn with_strategy<O>(
        config: OptimizerConfig,
        bounds: Bounds,
        objective: O,
        strategy: Box<dyn Strategy>,
    ) -> Result<Self, OptimizerError>
    where
        O: Objective + 'static,
    {
        config.validate()?;

        let bounds = bounds.with_policy(config.repair);
        let executor = BatchExecutor::new(config.mode, config.workers)?;
        let evaluator = FitnessEvaluator::new(objective, config.weights.clone(), executor);
        let rng = match config.random_seed {
            Some(seed) => SearchRng::new(seed),
            None => SearchRng::random(),
        };

        Ok(Self {
            config,
            bounds,
            evaluator,
            strategy,
            rng,
            population: Vec::new(),
            global_best: None,
            curves: FitnessHistory::default(),
            history: History::new(),
            epoch: 0,
            stagnation_count: 0,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get cancellation handle.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn population(&self) -> &[Solution] {
        &self.population
    }

    pub fn global_best(&self) -> Option<&Solution> {
        self.global_best.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn curves(&self) -> &FitnessHistory {
        &self.curves
    }

    /// Epochs completed.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluator.evaluations()
    }

    /// Build and evaluate the initial population and let the strategy set
    /// up its auxiliary state.
    pub fn initialize(&mut self) -> Result<(), OptimizerError> {
        self.epoch = 0;
        self.stagnation_count = 0;
        self.curves = FitnessHistory::default();
        self.history = History::new();

        let sense = self.config.sense;
        let mut ctx = SearchContext {
            bounds: &self.bounds,
            evaluator: &self.evaluator,
            rng: &mut self.rng,
            sense,
            pop_size: self.config.pop_size,
        };

        let mut population = ctx.random_population(self.config.pop_size)?;
        if self.strategy.ordering() == PopulationOrder::Ranked {
            sense.sort_best_first(&mut population);
        }
        self.strategy.initialize(&population, &mut ctx)?;

        self.global_best = sense.best_index(&population).map(|i| population[i].clone());
        self.population = population;

        if let Some(best) = &self.global_best {
            log::debug!(
                "Initialized {} individuals, best target {:.6e}",
                self.population.len(),
                best.target()
            );
        }
        Ok(())
    }

    /// Run one epoch. Returns `Some` if the strategy halted the run.
    pub fn step(&mut self) -> Result<Option<StopReason>, OptimizerError> {
        let Some(global_best) = self.global_best.as_ref() else {
            return Err(OptimizerError::EmptyPopulation);
        };

        let epoch = self.epoch + 1;
        let sense = self.config.sense;
        let mut ctx = SearchContext {
            bounds: &self.bounds,
            evaluator: &self.evaluator,
            rng: &mut self.rng,
            sense,
            pop_size: self.config.pop_size,
        };

        let mut population =
            match self
                .strategy
                .evolve(epoch, &self.population, global_best, &mut ctx)?
            {
                EvolveOutcome::Continue(population) => population,
                EvolveOutcome::Halt(reason) => {
                    log::warn!(
                        "{} halted at epoch {}: {}",
                        self.strategy.name(),
                        epoch,
                        reason
                    );
                    return Ok(Some(StopReason::StrategyHalted(reason)));
                }
            };

        if self.strategy.ordering() == PopulationOrder::Ranked {
            sense.sort_best_first(&mut population);
        }
        let Some(best_idx) = sense.best_index(&population) else {
            return Err(OptimizerError::EmptyPopulation);
        };

        // The global best never worsens: keep the prior record unless beaten.
        let improved = match &self.global_best {
            Some(best) => sense.is_better(&population[best_idx], best),
            None => true,
        };
        if improved {
            self.global_best = Some(population[best_idx].clone());
            self.stagnation_count = 0;
        } else {
            self.stagnation_count += 1;
        }

        self.population = population;
        self.epoch = epoch;

        let best_target = self.global_best.as_ref().map_or(f64::NAN, Solution::target);
        self.curves.record(sense, best_target, &self.population);
        if self.config.record_history {
            self.history.record(epoch, &self.population);
        }

        log::debug!(
            "Epoch {}: best = {:.6e}, current = {:.6e}, stagnation = {}",
            epoch,
            best_target,
            self.curves.current_best.last().copied().unwrap_or(f64::NAN),
            self.stagnation_count
        );
        Ok(None)
    }

    /// Get current progress.
    pub fn progress(&self) -> EpochProgress {
        EpochProgress {
            epoch: self.epoch,
            total_epochs: self.config.epoch,
            best_target: self.global_best.as_ref().map_or(f64::NAN, Solution::target),
            current_best: self
                .config
                .sense
                .best_index(&self.population)
                .map_or(f64::NAN, |i| self.population[i].target()),
            avg_target: average_target(&self.population),
            stagnation_count: self.stagnation_count,
            evaluations: self.evaluator.evaluations(),
        }
    }

    /// Check if the search should stop.
    fn should_stop(&self) -> Option<StopReason> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Some(StopReason::Cancelled);
        }

        if let Some(target) = self.config.target_fitness
            && let Some(best) = &self.global_best
            && self.config.sense.target_at_least_as_good(best.target(), target)
        {
            return Some(StopReason::TargetReached);
        }

        if let Some(limit) = self.config.stagnation_limit
            && self.stagnation_count >= limit
        {
            return Some(StopReason::Stagnation);
        }

        if self.epoch >= self.config.epoch {
            return Some(StopReason::MaxEpochs);
        }

        None
    }

    /// Run the search with a progress callback after every epoch.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<OptimizationResult, OptimizerError>
    where
        F: FnMut(&EpochProgress),
    {
        let start_time = Instant::now();

        if self.population.is_empty() {
            self.initialize()?;
        }

        log::info!(
            "Starting {} search: {} epochs, population {}, {:?} evaluation",
            self.strategy.name(),
            self.config.epoch,
            self.config.pop_size,
            self.config.mode
        );

        let stop_reason = loop {
            if let Some(reason) = self.should_stop() {
                break reason;
            }
            if let Some(reason) = self.step()? {
                break reason;
            }
            callback(&self.progress());
        };

        let elapsed = start_time.elapsed().as_secs_f64();
        let best = self
            .global_best
            .clone()
            .ok_or(OptimizerError::EmptyPopulation)?;

        log::info!(
            "Finished after {} epochs ({:?}): best target {:.6e}, {} evaluations",
            self.epoch,
            stop_reason,
            best.target(),
            self.evaluator.evaluations()
        );

        Ok(OptimizationResult {
            stats: RunStats {
                epochs: self.epoch,
                evaluations: self.evaluator.evaluations(),
                best_target: best.target(),
                final_avg_target: average_target(&self.population),
                elapsed_seconds: elapsed,
                stop_reason,
            },
            best,
            curves: self.curves.clone(),
            history: self.history.clone(),
        })
    }

    /// Run the search (blocking).
    pub fn run(&mut self) -> Result<OptimizationResult, OptimizerError> {
        self.run_with_callback(|_| {})
    }
}

fn average_target(population: &[Solution]) -> f64 {
    if population.is_empty() {
        0.0
    } else {
        population.iter().map(Solution::target).sum::<f64>() / population.len() as f64
    }
}
