// file: src/analyzer/trends.rs
// description: per-column trend direction and volatility classification
// reference: exploratory data analysis pass

use crate::analyzer::correlation::pearson;
use crate::analyzer::descriptive::{mean, std_dev};
use crate::models::{Dataset, TrendDirection, TrendSummary, Volatility};

/// Directions with |r| below this are reported as flat.
const FLAT_EPSILON: f64 = 0.1;

/// Volatility is high when std-dev exceeds this fraction of |mean|.
const VOLATILITY_RATIO: f64 = 0.5;

fn classify_direction(values: &[f64]) -> TrendDirection {
    let index: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    match pearson(values, &index) {
        Some(r) if r > FLAT_EPSILON => TrendDirection::Increasing,
        Some(r) if r < -FLAT_EPSILON => TrendDirection::Decreasing,
        _ => TrendDirection::Flat,
    }
}

fn classify_volatility(values: &[f64]) -> Volatility {
    let m = mean(values).abs();
    let s = std_dev(values);

    if m == 0.0 {
        return if s > 0.0 {
            Volatility::High
        } else {
            Volatility::Low
        };
    }

    if s > m * VOLATILITY_RATIO {
        Volatility::High
    } else {
        Volatility::Low
    }
}

/// Classifies every numeric column: direction from the sign of its
/// correlation against the row index, volatility by comparing standard
/// deviation against mean magnitude.
pub fn analyze_trends(dataset: &Dataset) -> Vec<TrendSummary> {
    dataset
        .numeric_columns()
        .iter()
        .map(|column| {
            let values = column.numeric_values();
            TrendSummary {
                column: column.name.clone(),
                direction: classify_direction(&values),
                volatility: classify_volatility(&values),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Column, ColumnData};

    fn dataset_of(name: &str, values: &[f64]) -> Dataset {
        Dataset::new(vec![Column::new(
            name,
            ColumnData::Numeric(values.iter().map(|v| Some(*v)).collect()),
        )])
        .unwrap()
    }

    #[test]
    fn test_increasing_trend() {
        let trends = analyze_trends(&dataset_of("sales", &[100.0, 150.0, 200.0, 250.0, 300.0]));
        assert_eq!(trends[0].direction, TrendDirection::Increasing);
        assert_eq!(trends[0].volatility, Volatility::Low);
    }

    #[test]
    fn test_decreasing_trend() {
        let trends = analyze_trends(&dataset_of("churn", &[50.0, 40.0, 30.0, 20.0]));
        assert_eq!(trends[0].direction, TrendDirection::Decreasing);
    }

    #[test]
    fn test_constant_column_is_flat_low() {
        let trends = analyze_trends(&dataset_of("k", &[7.0, 7.0, 7.0]));
        assert_eq!(trends[0].direction, TrendDirection::Flat);
        assert_eq!(trends[0].volatility, Volatility::Low);
    }

    #[test]
    fn test_high_volatility() {
        let trends = analyze_trends(&dataset_of("noisy", &[1.0, 100.0, 2.0, 90.0, 3.0]));
        assert_eq!(trends[0].volatility, Volatility::High);
    }

    #[test]
    fn test_zero_mean_nonzero_spread_is_high() {
        let trends = analyze_trends(&dataset_of("centered", &[-10.0, 10.0, -10.0, 10.0]));
        assert_eq!(trends[0].volatility, Volatility::High);
    }
}
