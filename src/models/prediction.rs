// file: src/models/prediction.rs
// description: classifier evaluation output from the predictive pass
// reference: internal data structures

use serde::{Deserialize, Serialize};

/// Held-out evaluation of the optional classifier.
///
/// `predictions` and `actual` are encoded with indices into `classes`;
/// the encoding order is first-seen over the training rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub target_column: String,
    pub feature_columns: Vec<String>,
    pub classes: Vec<String>,
    pub predictions: Vec<usize>,
    pub actual: Vec<usize>,
    pub accuracy: f64,
    /// Square matrix: `confusion_matrix[actual][predicted]`.
    pub confusion_matrix: Vec<Vec<usize>>,
}

impl PredictionResult {
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn test_size(&self) -> usize {
        self.actual.len()
    }

    /// Decodes an encoded label back to its class name.
    pub fn decode(&self, label: usize) -> Option<&str> {
        self.classes.get(label).map(|s| s.as_str())
    }

    /// Per-class (correct, total-actual) counts in class order.
    pub fn class_breakdown(&self) -> Vec<(String, usize, usize)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, class)| {
                let total: usize = self.confusion_matrix[i].iter().sum();
                let correct = self.confusion_matrix[i][i];
                (class.clone(), correct, total)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PredictionResult {
        PredictionResult {
            target_column: "label".to_string(),
            feature_columns: vec!["x".to_string()],
            classes: vec!["a".to_string(), "b".to_string()],
            predictions: vec![0, 1, 1],
            actual: vec![0, 1, 0],
            accuracy: 2.0 / 3.0,
            confusion_matrix: vec![vec![1, 1], vec![0, 1]],
        }
    }

    #[test]
    fn test_confusion_matrix_sums_to_test_size() {
        let result = sample();
        let total: usize = result
            .confusion_matrix
            .iter()
            .flat_map(|row| row.iter())
            .sum();
        assert_eq!(total, result.test_size());
    }

    #[test]
    fn test_decode_labels() {
        let result = sample();
        assert_eq!(result.decode(0), Some("a"));
        assert_eq!(result.decode(1), Some("b"));
        assert_eq!(result.decode(2), None);
    }

    #[test]
    fn test_class_breakdown() {
        let result = sample();
        let breakdown = result.class_breakdown();
        assert_eq!(breakdown[0], ("a".to_string(), 1, 2));
        assert_eq!(breakdown[1], ("b".to_string(), 1, 1));
    }
}
