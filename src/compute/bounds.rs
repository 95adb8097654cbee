//! Search-space bounds and boundary repair.

use crate::schema::{ConfigError, Position, RepairPolicy};

use super::SearchRng;

/// Axis-aligned box `[lower_i, upper_i]` with a repair policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
    policy: RepairPolicy,
}

impl Bounds {
    /// Create bounds, validating every dimension.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, ConfigError> {
        if lower.len() != upper.len() {
            return Err(ConfigError::BoundsLengthMismatch {
                lower: lower.len(),
                upper: upper.len(),
            });
        }
        if lower.is_empty() {
            return Err(ConfigError::EmptyBounds);
        }
        for (dim, (&lb, &ub)) in lower.iter().zip(&upper).enumerate() {
            // The width must be finite as well.
            if !lb.is_finite() || !ub.is_finite() || lb >= ub || !(ub - lb).is_finite() {
                return Err(ConfigError::InvalidBound {
                    dim,
                    lower: lb,
                    upper: ub,
                });
            }
        }

        Ok(Self {
            lower,
            upper,
            policy: RepairPolicy::default(),
        })
    }

    /// Same interval on every dimension.
    pub fn uniform(n_dims: usize, lower: f64, upper: f64) -> Result<Self, ConfigError> {
        Self::new(vec![lower; n_dims], vec![upper; n_dims])
    }

    /// Set the repair policy.
    pub fn with_policy(mut self, policy: RepairPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn n_dims(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    pub fn policy(&self) -> RepairPolicy {
        self.policy
    }

    /// True if every coordinate lies inside its interval.
    pub fn contains(&self, position: &[f64]) -> bool {
        position.len() == self.n_dims()
            && position
                .iter()
                .zip(self.lower.iter().zip(&self.upper))
                .all(|(&x, (&lb, &ub))| (lb..=ub).contains(&x))
    }

    /// Map a position back into the box.
    ///
    /// In-range coordinates are untouched, so repair is idempotent.
    pub fn repair(&self, position: &[f64]) -> Position {
        let mut repaired = position.to_vec();
        self.repair_in_place(&mut repaired);
        repaired
    }

    /// In-place variant of [`Bounds::repair`].
    pub fn repair_in_place(&self, position: &mut [f64]) {
        for (x, (&lb, &ub)) in position.iter_mut().zip(self.lower.iter().zip(&self.upper)) {
            *x = match self.policy {
                RepairPolicy::Reflect => reflect(*x, lb, ub),
                RepairPolicy::Clamp => clamp(*x, lb, ub),
            };
        }
    }

    /// Uniform random position inside the box.
    pub fn random_position(&self, rng: &mut SearchRng) -> Position {
        self.lower
            .iter()
            .zip(&self.upper)
            .map(|(&lb, &ub)| rng.uniform(lb, ub))
            .collect()
    }
}

/// Saturate to the interval; NaN goes to the midpoint.
fn clamp(x: f64, lb: f64, ub: f64) -> f64 {
    if x.is_nan() {
        return lb + 0.5 * (ub - lb);
    }
    x.clamp(lb, ub)
}

/// Fold `x` back into `[lb, ub]` by mirroring about the bounds.
fn reflect(x: f64, lb: f64, ub: f64) -> f64 {
    if !x.is_finite() || (lb..=ub).contains(&x) {
        return clamp(x, lb, ub);
    }

    let width = ub - lb;
    let period = 2.0 * width;
    let t = (x - lb).rem_euclid(period);
    if !t.is_finite() {
        // x - lb overflowed
        return clamp(x, lb, ub);
    }
    let folded = if t > width { period - t } else { t };
    (lb + folded).clamp(lb, ub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_invalid_bounds_rejected() {
        assert_eq!(
            Bounds::new(vec![0.0, 1.0], vec![1.0]),
            Err(ConfigError::BoundsLengthMismatch { lower: 2, upper: 1 })
        );
        assert_eq!(
            Bounds::new(Vec::new(), Vec::new()),
            Err(ConfigError::EmptyBounds)
        );
        assert_eq!(
            Bounds::new(vec![0.0, 2.0], vec![1.0, 2.0]),
            Err(ConfigError::InvalidBound {
                dim: 1,
                lower: 2.0,
                upper: 2.0
            })
        );
        assert!(Bounds::new(vec![f64::NEG_INFINITY], vec![0.0]).is_err());
        assert_eq!(
            Bounds::new(vec![0.0, -f64::MAX], vec![1.0, f64::MAX]),
            Err(ConfigError::InvalidBound {
                dim: 1,
                lower: -f64::MAX,
                upper: f64::MAX
            })
        );
    }

    #[test]
    fn test_widest_finite_bounds_sample() {
        let bounds = Bounds::new(vec![-f64::MAX / 2.0], vec![f64::MAX / 2.0]).unwrap();
        let mut rng = SearchRng::new(3);
        for _ in 0..100 {
            assert!(bounds.contains(&bounds.random_position(&mut rng)));
        }
    }

    #[test]
    fn test_reflect_examples() {
        let bounds = Bounds::uniform(1, 0.0, 10.0).unwrap();
        assert_eq!(bounds.repair(&[5.0]), vec![5.0]);
        assert_eq!(bounds.repair(&[-3.0]), vec![3.0]);
        assert_eq!(bounds.repair(&[12.0]), vec![8.0]);
        // Two widths out folds back to the lower side.
        assert_eq!(bounds.repair(&[25.0]), vec![5.0]);
        assert_eq!(bounds.repair(&[f64::NAN]), vec![5.0]);
        assert_eq!(bounds.repair(&[f64::INFINITY]), vec![10.0]);
        assert_eq!(bounds.repair(&[f64::NEG_INFINITY]), vec![0.0]);
    }

    #[test]
    fn test_clamp_examples() {
        let bounds = Bounds::uniform(2, -1.0, 1.0)
            .unwrap()
            .with_policy(RepairPolicy::Clamp);
        assert_eq!(bounds.repair(&[-5.0, 0.5]), vec![-1.0, 0.5]);
        assert_eq!(bounds.repair(&[7.0, f64::NAN]), vec![1.0, 0.0]);
    }

    #[test]
    fn test_random_position_inside() {
        let bounds = Bounds::new(vec![-1.0, 10.0, -100.0], vec![1.0, 20.0, -99.0]).unwrap();
        let mut rng = SearchRng::new(42);
        for _ in 0..100 {
            assert!(bounds.contains(&bounds.random_position(&mut rng)));
        }
    }

    fn bounded_case() -> impl Strategy<Value = (Vec<(f64, f64)>, Vec<f64>)> {
        (1usize..8).prop_flat_map(|n| {
            (
                prop::collection::vec((-1e3f64..1e3, 1e-3f64..1e3), n)
                    .prop_map(|v| v.into_iter().map(|(lb, w)| (lb, lb + w)).collect()),
                prop::collection::vec(-1e6f64..1e6, n),
            )
        })
    }

    fn policy() -> impl Strategy<Value = RepairPolicy> {
        prop_oneof![Just(RepairPolicy::Reflect), Just(RepairPolicy::Clamp)]
    }

    proptest! {
        #[test]
        fn prop_repair_in_bounds((intervals, x) in bounded_case(), policy in policy()) {
            let (lower, upper): (Vec<f64>, Vec<f64>) = intervals.into_iter().unzip();
            let bounds = Bounds::new(lower, upper).unwrap().with_policy(policy);
            let repaired = bounds.repair(&x);
            prop_assert!(bounds.contains(&repaired));
        }

        #[test]
        fn prop_repair_idempotent((intervals, x) in bounded_case(), policy in policy()) {
            let (lower, upper): (Vec<f64>, Vec<f64>) = intervals.into_iter().unzip();
            let bounds = Bounds::new(lower, upper).unwrap().with_policy(policy);
            let once = bounds.repair(&x);
            prop_assert_eq!(bounds.repair(&once), once);
        }
    }
}
