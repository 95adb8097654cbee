//! Run configuration for population-based search.

use serde::{Deserialize, Serialize};

use super::Sense;

/// Top-level optimizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Iteration budget (number of epochs).
    #[serde(default = "default_epoch")]
    pub epoch: usize,
    /// Number of individuals in the population.
    #[serde(default = "default_pop_size")]
    pub pop_size: usize,
    /// Optimization direction.
    #[serde(default)]
    pub sense: Sense,
    /// How batches of candidates are evaluated.
    #[serde(default)]
    pub mode: EvaluationMode,
    /// Worker count for the parallel modes.
    /// If None, uses the available parallelism of the host.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Objective weights for multi-objective problems.
    /// If None, every objective is weighted 1.0.
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    /// How out-of-bounds coordinates are mapped back into the box.
    #[serde(default)]
    pub repair: RepairPolicy,
    /// Keep a deep copy of the population after every epoch.
    #[serde(default = "default_record_history")]
    pub record_history: bool,
    /// Stop after this many epochs without improving the global best.
    #[serde(default)]
    pub stagnation_limit: Option<usize>,
    /// Stop once the global best is at least as good as this target.
    #[serde(default)]
    pub target_fitness: Option<f64>,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Search strategy and its parameters.
    #[serde(default)]
    pub strategy: StrategyConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            epoch: default_epoch(),
            pop_size: default_pop_size(),
            sense: Sense::default(),
            mode: EvaluationMode::default(),
            workers: None,
            weights: None,
            repair: RepairPolicy::default(),
            record_history: default_record_history(),
            stagnation_limit: None,
            target_fitness: None,
            random_seed: None,
            strategy: StrategyConfig::default(),
        }
    }
}

fn default_epoch() -> usize {
    1000
}
fn default_pop_size() -> usize {
    100
}
fn default_record_history() -> bool {
    true
}

/// Batch evaluation mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    /// Evaluate in order on the calling thread. Best for cheap objectives.
    #[default]
    Sequential,
    /// Work-stealing thread pool. Best for I/O-bound or light objectives.
    Thread,
    /// Isolated workers, each owning a contiguous chunk of the batch.
    /// Best for heavy CPU-bound objectives.
    Process,
}

/// Boundary repair policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RepairPolicy {
    /// Mirror about the violated bound, folding until inside the box.
    #[default]
    Reflect,
    /// Saturate to the violated bound.
    Clamp,
}

/// Search strategy selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StrategyConfig {
    /// Coronavirus herd-immunity search.
    HerdImmunity(HerdImmunityConfig),
    /// Ant colony optimization for continuous domains.
    AntColony(AntColonyConfig),
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::HerdImmunity(HerdImmunityConfig::default())
    }
}

impl StrategyConfig {
    /// Strategy name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            StrategyConfig::HerdImmunity(_) => "herd-immunity",
            StrategyConfig::AntColony(_) => "ant-colony",
        }
    }
}

/// Herd-immunity strategy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HerdImmunityConfig {
    /// Basic reproduction rate (0.0-1.0).
    #[serde(default = "default_brr")]
    pub brr: f64,
    /// Age at which an infected individual dies and is respawned.
    #[serde(default = "default_max_age")]
    pub max_age: usize,
    /// Behavior when a required status group is empty.
    #[serde(default)]
    pub variant: HerdImmunityVariant,
}

impl Default for HerdImmunityConfig {
    fn default() -> Self {
        Self {
            brr: default_brr(),
            max_age: default_max_age(),
            variant: HerdImmunityVariant::default(),
        }
    }
}

fn default_brr() -> f64 {
    0.06
}
fn default_max_age() -> usize {
    150
}

/// Herd-immunity fallback policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum HerdImmunityVariant {
    /// Halt the run when no infected (or susceptible) peer exists.
    Original,
    /// Reclassify a third of the population so the peer group is never empty.
    #[default]
    Improved,
}

/// Continuous ant-colony strategy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntColonyConfig {
    /// Number of new samples generated per epoch.
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
    /// Intensification factor (selection pressure).
    #[serde(default = "default_q")]
    pub q: f64,
    /// Deviation-distance ratio.
    #[serde(default = "default_zeta")]
    pub zeta: f64,
}

impl Default for AntColonyConfig {
    fn default() -> Self {
        Self {
            sample_count: default_sample_count(),
            q: default_q(),
            zeta: default_zeta(),
        }
    }
}

fn default_sample_count() -> usize {
    50
}
fn default_q() -> f64 {
    0.5
}
fn default_zeta() -> f64 {
    1.0
}

// ============================================================================
// Validation
// ============================================================================

/// Configuration validation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Epoch budget must be positive")]
    ZeroEpoch,
    #[error("Population size must be positive")]
    ZeroPopulation,
    #[error("Worker count must be positive")]
    ZeroWorkers,
    #[error("Bounds must have at least one dimension")]
    EmptyBounds,
    #[error("Lower bound has {lower} dimensions but upper bound has {upper}")]
    BoundsLengthMismatch { lower: usize, upper: usize },
    #[error("Invalid bounds on dimension {dim}: lower {lower} must be finite and below upper {upper}")]
    InvalidBound { dim: usize, lower: f64, upper: f64 },
    #[error("Weight vector must not be empty")]
    EmptyWeights,
    #[error("Weight {index} is {value}; weights must be finite and non-negative")]
    InvalidWeight { index: usize, value: f64 },
    #[error("Objective returned {actual} values but {expected} weights are configured")]
    WeightCountMismatch { expected: usize, actual: usize },
    #[error("Invalid strategy parameter: {0}")]
    InvalidParameter(String),
}

impl OptimizerConfig {
    /// Validate optimizer configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.epoch == 0 {
            return Err(ConfigError::ZeroEpoch);
        }
        if self.pop_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if self.workers == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }

        if let Some(weights) = &self.weights {
            if weights.is_empty() {
                return Err(ConfigError::EmptyWeights);
            }
            for (index, &value) in weights.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidWeight { index, value });
                }
            }
        }

        if let Some(target) = self.target_fitness
            && !target.is_finite()
        {
            return Err(ConfigError::InvalidParameter(format!(
                "target_fitness {} must be finite",
                target
            )));
        }

        self.strategy.validate()
    }
}

impl StrategyConfig {
    /// Validate strategy parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            StrategyConfig::HerdImmunity(config) => {
                if !(0.0..=1.0).contains(&config.brr) {
                    return Err(ConfigError::InvalidParameter(format!(
                        "brr {} must lie in [0, 1]",
                        config.brr
                    )));
                }
            }
            StrategyConfig::AntColony(config) => {
                if !config.q.is_finite() || config.q <= 0.0 {
                    return Err(ConfigError::InvalidParameter(format!(
                        "q {} must be positive",
                        config.q
                    )));
                }
                if !config.zeta.is_finite() || config.zeta < 0.0 {
                    return Err(ConfigError::InvalidParameter(format!(
                        "zeta {} must be non-negative",
                        config.zeta
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = OptimizerConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let config = OptimizerConfig {
            epoch: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroEpoch));

        let config = OptimizerConfig {
            pop_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroPopulation));

        let config = OptimizerConfig {
            workers: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroWorkers));
    }

    #[test]
    fn test_weights_validated() {
        let config = OptimizerConfig {
            weights: Some(vec![0.2, -0.5]),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidWeight {
                index: 1,
                value: -0.5
            })
        );

        let config = OptimizerConfig {
            weights: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyWeights));
    }

    #[test]
    fn test_strategy_parameters_validated() {
        let config = OptimizerConfig {
            strategy: StrategyConfig::HerdImmunity(HerdImmunityConfig {
                brr: 1.5,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter(_))
        ));

        let config = OptimizerConfig {
            strategy: StrategyConfig::AntColony(AntColonyConfig {
                q: 0.0,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_serialization() {
        let config = OptimizerConfig {
            strategy: StrategyConfig::AntColony(AntColonyConfig::default()),
            mode: EvaluationMode::Thread,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: OptimizerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.pop_size, config.pop_size);
        assert_eq!(parsed.mode, EvaluationMode::Thread);
        assert!(matches!(parsed.strategy, StrategyConfig::AntColony(_)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "epoch": 20,
            "sense": "max",
            "strategy": { "type": "HerdImmunity", "brr": 0.1 }
        }"#;
        let parsed: OptimizerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.epoch, 20);
        assert_eq!(parsed.pop_size, 100);
        assert_eq!(parsed.sense, Sense::Max);
        match parsed.strategy {
            StrategyConfig::HerdImmunity(config) => {
                assert_eq!(config.brr, 0.1);
                assert_eq!(config.max_age, 150);
                assert_eq!(config.variant, HerdImmunityVariant::Improved);
            }
            other => panic!("unexpected strategy {:?}", other),
        }
    }
}
