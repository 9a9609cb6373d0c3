// file: src/analyzer/correlation.rs
// description: pairwise Pearson correlation over numeric columns
// reference: exploratory data analysis pass

use crate::models::{CorrelationMatrix, Dataset, StrongCorrelation};

/// Pearson correlation coefficient of two equal-length series.
///
/// Returns `None` when either series has zero variance or fewer than two
/// points, where the coefficient is undefined.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }

    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Builds the full correlation matrix over the dataset's numeric columns.
///
/// The matrix is symmetric with 1.0 pinned on the diagonal; undefined pairs
/// are stored as 0.0. Pairwise coefficients use rows where both columns are
/// non-missing.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let numeric = dataset.numeric_columns();
    let labels: Vec<String> = numeric.iter().map(|c| c.name.clone()).collect();
    let series: Vec<Vec<Option<f64>>> = numeric
        .iter()
        .map(|c| match &c.data {
            crate::models::ColumnData::Numeric(v) => v.clone(),
            _ => unreachable!("numeric_columns returned a non-numeric column"),
        })
        .collect();

    let n = labels.len();
    let mut values = vec![vec![0.0; n]; n];

    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let mut xs = Vec::new();
            let mut ys = Vec::new();
            for row in 0..series[i].len() {
                if let (Some(x), Some(y)) = (series[i][row], series[j][row]) {
                    xs.push(x);
                    ys.push(y);
                }
            }
            let r = pearson(&xs, &ys).unwrap_or(0.0);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix { labels, values }
}

/// Pairs whose absolute coefficient exceeds the threshold, each pair once.
pub fn strong_pairs(matrix: &CorrelationMatrix, threshold: f64) -> Vec<StrongCorrelation> {
    let mut pairs = Vec::new();
    for i in 0..matrix.labels.len() {
        for j in (i + 1)..matrix.labels.len() {
            let r = matrix.values[i][j];
            if r.abs() > threshold {
                pairs.push(StrongCorrelation {
                    first: matrix.labels[i].clone(),
                    second: matrix.labels[j].clone(),
                    coefficient: r,
                });
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Column, ColumnData};

    fn numeric(name: &str, values: &[f64]) -> Column {
        Column::new(
            name,
            ColumnData::Numeric(values.iter().map(|v| Some(*v)).collect()),
        )
    }

    #[test]
    fn test_perfect_positive_correlation() {
        let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_negative_correlation() {
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_undefined() {
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_none());
        assert!(pearson(&[1.0], &[2.0]).is_none());
    }

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let dataset = Dataset::new(vec![
            numeric("a", &[1.0, 2.0, 3.0, 4.0]),
            numeric("b", &[2.0, 4.0, 6.0, 8.0]),
            numeric("c", &[4.0, 3.0, 2.0, 1.0]),
        ])
        .unwrap();

        let matrix = correlation_matrix(&dataset);
        let n = matrix.labels.len();
        assert_eq!(n, 3);

        for i in 0..n {
            assert_eq!(matrix.values[i][i], 1.0);
            for j in 0..n {
                assert!((matrix.values[i][j] - matrix.values[j][i]).abs() < 1e-12);
                assert!(matrix.values[i][j].abs() <= 1.0);
            }
        }
    }

    #[test]
    fn test_missing_rows_excluded_pairwise() {
        let dataset = Dataset::new(vec![
            Column::new(
                "a",
                ColumnData::Numeric(vec![Some(1.0), None, Some(3.0), Some(4.0)]),
            ),
            Column::new(
                "b",
                ColumnData::Numeric(vec![Some(2.0), Some(9.0), Some(6.0), Some(8.0)]),
            ),
        ])
        .unwrap();

        let matrix = correlation_matrix(&dataset);
        // Based on rows 0, 2, 3 only: exact linear relation b = 2a.
        assert!((matrix.get("a", "b").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_strong_pairs_threshold() {
        let matrix = CorrelationMatrix {
            labels: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            values: vec![
                vec![1.0, 0.9, 0.2],
                vec![0.9, 1.0, -0.6],
                vec![0.2, -0.6, 1.0],
            ],
        };

        let pairs = strong_pairs(&matrix, 0.5);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].first, "a");
        assert_eq!(pairs[0].second, "b");
        assert_eq!(pairs[1].coefficient, -0.6);
    }
}
