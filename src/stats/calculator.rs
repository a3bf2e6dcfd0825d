//! Statistics Calculator Module
//! Grouped sums and means, top-N ranking, positional tails and Pearson correlation.

use statrs::statistics::Statistics;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Aggregated value for one group key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupValue {
    pub key: String,
    pub value: f64,
}

impl GroupValue {
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Running sum and count for one group.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

/// Handles the aggregation arithmetic behind every query routine.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Accumulate values per key. Rows without a key are dropped; rows without a
    /// value still create their group but add nothing to it.
    fn accumulate<'a, I>(rows: I) -> HashMap<&'a str, Accumulator>
    where
        I: IntoIterator<Item = (Option<&'a str>, Option<f64>)>,
    {
        let mut groups: HashMap<&'a str, Accumulator> = HashMap::new();
        for (key, value) in rows {
            let Some(key) = key else {
                continue;
            };
            let acc = groups.entry(key).or_default();
            if let Some(v) = value {
                acc.sum += v;
                acc.count += 1;
            }
        }
        groups
    }

    /// Sum values per key, returned in the order given by `order`.
    pub fn group_sum<'a, I, F>(rows: I, order: F) -> Vec<GroupValue>
    where
        I: IntoIterator<Item = (Option<&'a str>, Option<f64>)>,
        F: Fn(&str, &str) -> Ordering,
    {
        let mut groups: Vec<GroupValue> = Self::accumulate(rows)
            .into_iter()
            .map(|(key, acc)| GroupValue::new(key, acc.sum))
            .collect();
        groups.sort_by(|a, b| order(&a.key, &b.key));
        groups
    }

    /// Mean of values per key, returned in the order given by `order`.
    /// Groups without any numeric value are omitted.
    pub fn group_mean<'a, I, F>(rows: I, order: F) -> Vec<GroupValue>
    where
        I: IntoIterator<Item = (Option<&'a str>, Option<f64>)>,
        F: Fn(&str, &str) -> Ordering,
    {
        let mut groups: Vec<GroupValue> = Self::accumulate(rows)
            .into_iter()
            .filter(|(_, acc)| acc.count > 0)
            .map(|(key, acc)| GroupValue::new(key, acc.sum / acc.count as f64))
            .collect();
        groups.sort_by(|a, b| order(&a.key, &b.key));
        groups
    }

    /// The `n` largest groups, descending. The sort is stable, so equal values
    /// keep their incoming order.
    pub fn top_n(mut groups: Vec<GroupValue>, n: usize) -> Vec<GroupValue> {
        groups.retain(|g| !g.value.is_nan());
        groups.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
        groups.truncate(n);
        groups
    }

    /// Last `n` items in their current order.
    pub fn tail<T>(mut items: Vec<T>, n: usize) -> Vec<T> {
        let start = items.len().saturating_sub(n);
        items.split_off(start)
    }

    /// Pearson correlation coefficient of two paired series.
    ///
    /// Returns `None` for fewer than two pairs, mismatched lengths, or when either
    /// series has zero variance.
    pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return None;
        }

        let covariance = xs.iter().covariance(ys.iter());
        let std_x = xs.iter().std_dev();
        let std_y = ys.iter().std_dev();

        let r = covariance / (std_x * std_y);
        if r.is_finite() {
            Some(r.clamp(-1.0, 1.0))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows<'a>(data: &'a [(&'a str, Option<f64>)]) -> Vec<(Option<&'a str>, Option<f64>)> {
        data.iter().map(|(k, v)| (Some(*k), *v)).collect()
    }

    #[test]
    fn test_group_sum_skips_missing_values() {
        let data = [("b", Some(1.0)), ("a", Some(2.0)), ("b", None), ("b", Some(3.0))];
        let groups = StatsCalculator::group_sum(rows(&data), |a, b| a.cmp(b));
        assert_eq!(groups, vec![GroupValue::new("a", 2.0), GroupValue::new("b", 4.0)]);
    }

    #[test]
    fn test_group_sum_keeps_valueless_group_and_drops_missing_key() {
        let input = vec![(Some("a"), None), (None, Some(5.0))];
        let groups = StatsCalculator::group_sum(input, |a, b| a.cmp(b));
        assert_eq!(groups, vec![GroupValue::new("a", 0.0)]);
    }

    #[test]
    fn test_group_mean() {
        let data = [("x", Some(1.0)), ("x", Some(3.0)), ("y", None), ("z", Some(5.0))];
        let groups = StatsCalculator::group_mean(rows(&data), |a, b| a.cmp(b));
        assert_eq!(groups, vec![GroupValue::new("x", 2.0), GroupValue::new("z", 5.0)]);
    }

    #[test]
    fn test_top_n_descending_and_stable_on_ties() {
        let groups = vec![
            GroupValue::new("a", 10.0),
            GroupValue::new("b", 30.0),
            GroupValue::new("c", 10.0),
            GroupValue::new("d", 20.0),
        ];
        let top = StatsCalculator::top_n(groups, 3);
        let keys: Vec<&str> = top.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "d", "a"]);
    }

    #[test]
    fn test_tail() {
        let years: Vec<i32> = (1..=12).collect();
        assert_eq!(StatsCalculator::tail(years, 10), (3..=12).collect::<Vec<i32>>());
        assert_eq!(StatsCalculator::tail(vec![1, 2], 10), vec![1, 2]);
    }

    #[test]
    fn test_pearson() {
        let r = StatsCalculator::pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!((r - 1.0).abs() < 1e-12);

        let r = StatsCalculator::pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);

        let r = StatsCalculator::pearson(&[1.0, 2.0, 3.0, 4.0], &[1.0, 3.0, 2.0, 4.0]).unwrap();
        assert!((r - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_undefined() {
        assert_eq!(StatsCalculator::pearson(&[1.0], &[2.0]), None);
        assert_eq!(StatsCalculator::pearson(&[1.0, 1.0], &[2.0, 3.0]), None);
        assert_eq!(StatsCalculator::pearson(&[1.0, 2.0], &[2.0]), None);
    }
}
