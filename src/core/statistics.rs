//! Mean and median over an age frequency distribution.
//!
//! The distribution is treated as a run-length encoded sorted sequence: each
//! age occupies `counts[age]` consecutive ranks, in ascending age order. The
//! individual records are never materialized.

use crate::domain::model::{AggregateState, Median, Statistics};
use std::collections::BTreeMap;

pub fn compute(state: &AggregateState) -> Statistics {
    let total_records = state.total_records();
    let (Some(mean), Some(median)) = (mean(&state.counts), median(&state.counts, &state.names))
    else {
        return Statistics::NoData;
    };

    Statistics::Summary {
        total_records,
        mean,
        median,
    }
}

/// `Σ(age × count) / Σ(count)`, or `None` for an empty distribution.
pub fn mean(counts: &BTreeMap<i64, u64>) -> Option<f64> {
    let (sum, total) = counts
        .iter()
        .fold((0i128, 0u128), |(sum, total), (age, count)| {
            (sum + *age as i128 * *count as i128, total + *count as u128)
        });

    if total == 0 {
        return None;
    }
    Some(sum as f64 / total as f64)
}

/// The age at zero-based `rank` in the expanded ascending sequence.
pub fn select(counts: &BTreeMap<i64, u64>, rank: u64) -> Option<i64> {
    let mut running = 0u64;
    for (age, count) in counts {
        running += count;
        if running > rank {
            return Some(*age);
        }
    }
    None
}

pub fn median(counts: &BTreeMap<i64, u64>, names: &BTreeMap<i64, String>) -> Option<Median> {
    let total: u64 = counts.values().sum();
    if total == 0 {
        return None;
    }

    let (low, high) = if total % 2 == 1 {
        let mid = select(counts, total / 2)?;
        (mid, mid)
    } else {
        (select(counts, total / 2 - 1)?, select(counts, total / 2)?)
    };

    // Integer division truncates toward zero: (21 + 30) / 2 == 25.
    let age = if low == high {
        low
    } else {
        ((low as i128 + high as i128) / 2) as i64
    };

    Some(Median {
        age,
        exact: (low as f64 + high as f64) / 2.0,
        low,
        high,
        name: names.get(&age).cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(i64, u64)]) -> BTreeMap<i64, u64> {
        pairs.iter().copied().collect()
    }

    fn names_for(counts: &BTreeMap<i64, u64>) -> BTreeMap<i64, String> {
        counts.keys().map(|age| (*age, format!("Person {}", age))).collect()
    }

    fn state(pairs: &[(i64, u64)]) -> AggregateState {
        let counts = counts(pairs);
        AggregateState {
            names: names_for(&counts),
            counts,
            ..Default::default()
        }
    }

    #[test]
    fn test_mean_is_weighted() {
        let c = counts(&[(20, 1), (30, 3)]);
        assert_eq!(mean(&c), Some(27.5));
        assert_eq!(mean(&BTreeMap::new()), None);
    }

    #[test]
    fn test_select_walks_runs() {
        let c = counts(&[(10, 2), (20, 3), (30, 1)]);
        let expanded: Vec<i64> = (0..6).map(|r| select(&c, r).unwrap()).collect();
        assert_eq!(expanded, vec![10, 10, 20, 20, 20, 30]);
        assert_eq!(select(&c, 6), None);
    }

    #[test]
    fn test_odd_total_median() {
        let s = state(&[(20, 1), (25, 1), (30, 1)]);
        let median = median(&s.counts, &s.names).unwrap();
        assert_eq!(median.age, 25);
        assert_eq!(median.name.as_deref(), Some("Person 25"));
    }

    #[test]
    fn test_even_total_truncates_average() {
        let s = state(&[(21, 1), (30, 1)]);
        let median = median(&s.counts, &s.names).unwrap();
        assert_eq!((median.low, median.high), (21, 30));
        assert_eq!(median.age, 25);
        assert_eq!(median.exact, 25.5);
        assert_eq!(median.name, None);
    }

    #[test]
    fn test_even_total_name_when_truncated_average_is_a_key() {
        let s = state(&[(25, 1), (26, 1)]);
        let median = median(&s.counts, &s.names).unwrap();
        assert_eq!(median.age, 25);
        assert_eq!(median.exact, 25.5);
        assert_eq!(median.name.as_deref(), Some("Person 25"));
    }

    #[test]
    fn test_even_total_same_age_boundary() {
        let s = state(&[(25, 2)]);
        let median = median(&s.counts, &s.names).unwrap();
        assert_eq!((median.low, median.high, median.age), (25, 25, 25));
        assert_eq!(median.name.as_deref(), Some("Person 25"));
    }

    #[test]
    fn test_negative_average_truncates_toward_zero() {
        let c = counts(&[(-21, 1), (-30, 1)]);
        let median = median(&c, &BTreeMap::new()).unwrap();
        assert_eq!(median.age, -25);
        assert_eq!(median.exact, -25.5);
    }

    #[test]
    fn test_scaling_counts_keeps_mean_and_median() {
        let base = [(18, 2), (22, 1), (35, 4), (61, 1)];
        let unscaled = compute(&state(&base));
        for factor in [2u64, 3, 10] {
            let scaled: Vec<(i64, u64)> = base.iter().map(|(a, c)| (*a, c * factor)).collect();
            let Statistics::Summary { mean: m1, median: d1, .. } = &unscaled else {
                panic!("expected summary");
            };
            let Statistics::Summary { mean: m2, median: d2, .. } = compute(&state(&scaled)) else {
                panic!("expected summary");
            };
            assert!((m1 - m2).abs() < 1e-9);
            assert_eq!(d1.age, d2.age);
        }
    }

    #[test]
    fn test_empty_distribution_is_no_data() {
        assert_eq!(compute(&AggregateState::default()), Statistics::NoData);
    }

    #[test]
    fn test_summary_counts_records() {
        match compute(&state(&[(20, 2), (40, 2)])) {
            Statistics::Summary {
                total_records,
                mean,
                median,
            } => {
                assert_eq!(total_records, 4);
                assert_eq!(mean, 30.0);
                assert_eq!(median.age, 30);
                assert_eq!(median.name, None);
            }
            Statistics::NoData => panic!("expected summary"),
        }
    }
}
