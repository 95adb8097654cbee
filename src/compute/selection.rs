//! Stochastic selection operators shared by strategies.

use super::SearchRng;

/// Draw an index from a categorical distribution.
///
/// The vector is renormalized by its actual sum, so weights need not add up
/// to exactly one. Negative or non-finite entries count as zero, and an
/// all-zero vector falls back to a uniform draw. Returns `None` only for an
/// empty vector.
pub fn roulette_wheel_select(rng: &mut SearchRng, probabilities: &[f64]) -> Option<usize> {
    if probabilities.is_empty() {
        return None;
    }

    let weight = |p: f64| if p.is_finite() && p > 0.0 { p } else { 0.0 };
    let total: f64 = probabilities.iter().map(|&p| weight(p)).sum();
    if !total.is_finite() || total <= 0.0 {
        return Some(rng.index(probabilities.len()));
    }

    let target = rng.unit() * total;
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (i, &p) in probabilities.iter().enumerate() {
        let w = weight(p);
        if w == 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = i;
        if target < cumulative {
            return Some(i);
        }
    }
    // Rounding left target just past the final cumulative sum.
    Some(last_positive)
}

/// Uniform draw among the indices whose status equals `value`.
///
/// Returns `None` when nothing matches; callers decide the fallback.
pub fn filtered_random_index<T: PartialEq>(
    rng: &mut SearchRng,
    statuses: &[T],
    value: &T,
) -> Option<usize> {
    let matching: Vec<usize> = statuses
        .iter()
        .enumerate()
        .filter(|(_, s)| *s == value)
        .map(|(i, _)| i)
        .collect();

    if matching.is_empty() {
        None
    } else {
        Some(matching[rng.index(matching.len())])
    }
}

/// `min(k, n)` distinct indices from `0..n`, without replacement.
pub fn sample_distinct_indices(rng: &mut SearchRng, n: usize, k: usize) -> Vec<usize> {
    rand::seq::index::sample(rng.inner_mut(), n, k.min(n)).into_vec()
}
