// file: src/analyzer/descriptive.rs
// description: per-column descriptive statistics
// reference: exploratory data analysis pass

use crate::models::{
    ColumnData, ColumnDescriptor, ColumnStats, ColumnType, Dataset, ValueFrequency,
};
use std::collections::HashMap;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation; 0.0 for fewer than two values.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

fn numeric_stats(values: &[f64]) -> ColumnStats {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    ColumnStats::Numeric {
        mean: mean(values),
        median: median(values),
        min: if min.is_finite() { min } else { 0.0 },
        max: if max.is_finite() { max } else { 0.0 },
        std_dev: std_dev(values),
    }
}

fn categorical_stats(values: &[Option<String>], top_k: usize) -> ColumnStats {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    let mut present = 0usize;

    for value in values.iter().flatten() {
        present += 1;
        let entry = counts.entry(value.as_str()).or_insert(0);
        if *entry == 0 {
            first_seen.push(value.as_str());
        }
        *entry += 1;
    }

    // Ties broken by first appearance so results are deterministic.
    let mut ranked: Vec<&str> = first_seen.clone();
    ranked.sort_by(|a, b| counts[b].cmp(&counts[a]));

    let top_values = ranked
        .into_iter()
        .take(top_k)
        .map(|value| ValueFrequency {
            value: value.to_string(),
            count: counts[value],
            share: if present == 0 {
                0.0
            } else {
                counts[value] as f64 / present as f64
            },
        })
        .collect();

    ColumnStats::Categorical {
        distinct: first_seen.len(),
        top_values,
    }
}

/// Builds a descriptor for every column of the dataset, in column order.
pub fn describe(dataset: &Dataset, top_k: usize) -> Vec<ColumnDescriptor> {
    dataset
        .columns()
        .iter()
        .map(|column| {
            let stats = match &column.data {
                ColumnData::Numeric(_) => numeric_stats(&column.numeric_values()),
                ColumnData::DateTime(values) => {
                    let present: Vec<_> = values.iter().flatten().collect();
                    ColumnStats::DateTime {
                        earliest: present.iter().min().map(|t| **t),
                        latest: present.iter().max().map(|t| **t),
                    }
                }
                ColumnData::Categorical(values) => categorical_stats(values, top_k),
            };

            ColumnDescriptor {
                name: column.name.clone(),
                column_type: column.column_type(),
                missing: column.data.missing_count(),
                stats,
            }
        })
        .collect()
}

/// Dataset-level counts used by the overview table and synthesis prompt.
pub fn type_counts(dataset: &Dataset) -> (usize, usize) {
    let numeric = dataset.numeric_columns().len();
    let categorical = dataset
        .columns()
        .iter()
        .filter(|c| c.column_type() == ColumnType::Categorical)
        .count();
    (numeric, categorical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;

    #[test]
    fn test_mean_median_std() {
        let values = [100.0, 150.0, 200.0, 250.0, 300.0];
        assert_eq!(mean(&values), 200.0);
        assert_eq!(median(&values), 200.0);
        assert!((std_dev(&values) - 79.0569).abs() < 0.001);
    }

    #[test]
    fn test_median_even_length() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn test_empty_slices() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(median(&[]), 0.0);
        assert_eq!(std_dev(&[5.0]), 0.0);
    }

    #[test]
    fn test_categorical_top_values_with_tie() {
        let values: Vec<Option<String>> = ["A", "B", "A", "C", "B"]
            .iter()
            .map(|v| Some(v.to_string()))
            .collect();

        match categorical_stats(&values, 5) {
            ColumnStats::Categorical {
                distinct,
                top_values,
            } => {
                assert_eq!(distinct, 3);
                // A and B tie with 2 each; A was seen first.
                assert_eq!(top_values[0].value, "A");
                assert_eq!(top_values[0].count, 2);
                assert!((top_values[0].share - 0.4).abs() < 1e-9);
                assert_eq!(top_values[1].value, "B");
                assert_eq!(top_values[1].count, 2);
                assert_eq!(top_values[2].value, "C");
            }
            other => panic!("unexpected stats: {:?}", other),
        }
    }

    #[test]
    fn test_describe_reports_missing_counts() {
        let dataset = Dataset::new(vec![Column::new(
            "x",
            ColumnData::Numeric(vec![Some(1.0), None, Some(3.0)]),
        )])
        .unwrap();

        let descriptors = describe(&dataset, 5);
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].missing, 1);
        match &descriptors[0].stats {
            ColumnStats::Numeric { min, max, .. } => {
                assert_eq!(*min, 1.0);
                assert_eq!(*max, 3.0);
            }
            other => panic!("unexpected stats: {:?}", other),
        }
    }
}
