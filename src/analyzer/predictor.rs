// file: src/analyzer/predictor.rs
// description: optional classifier training over numeric features
// reference: random forest on a deterministic train/test split

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::models::{ColumnData, Dataset, PredictionResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

const MAX_DEPTH: usize = 12;
const MIN_SAMPLES_SPLIT: usize = 2;
/// Cap on candidate thresholds evaluated per feature at one split.
const MAX_THRESHOLDS: usize = 32;

/// Trains an ensemble classifier when the dataset offers a suitable target.
///
/// Target selection: the first categorical column (in dataset order) with at
/// least 2 and fewer than `max_target_cardinality` distinct values. Features
/// are all numeric columns. Returns `Ok(None)` when no target or no feature
/// qualifies, or too few complete rows remain to split.
pub fn train_predictor(
    dataset: &Dataset,
    config: &AnalysisConfig,
) -> Result<Option<PredictionResult>> {
    let target = match select_target(dataset, config.max_target_cardinality) {
        Some(name) => name,
        None => {
            debug!("No categorical column qualifies as a prediction target");
            return Ok(None);
        }
    };

    let feature_columns: Vec<String> = dataset
        .numeric_columns()
        .iter()
        .map(|c| c.name.clone())
        .collect();
    if feature_columns.is_empty() {
        debug!("No numeric feature columns available for prediction");
        return Ok(None);
    }

    let (rows, labels, classes) = assemble_training_rows(dataset, &target, &feature_columns);
    if rows.len() < 2 || classes.len() < 2 {
        debug!("Too few complete rows or classes to train a classifier");
        return Ok(None);
    }

    // Deterministic shuffled split; held-out size is ceil(n * fraction),
    // clamped so both partitions stay non-empty.
    let mut rng = StdRng::seed_from_u64(config.random_seed);
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    indices.shuffle(&mut rng);

    let test_size = ((rows.len() as f64 * config.test_fraction).ceil() as usize)
        .clamp(1, rows.len() - 1);
    let (test_idx, train_idx) = indices.split_at(test_size);

    let train_x: Vec<&[f64]> = train_idx.iter().map(|&i| rows[i].as_slice()).collect();
    let train_y: Vec<usize> = train_idx.iter().map(|&i| labels[i]).collect();

    let forest = RandomForest::fit(
        &train_x,
        &train_y,
        classes.len(),
        config.tree_count,
        &mut rng,
    );

    let actual: Vec<usize> = test_idx.iter().map(|&i| labels[i]).collect();
    let predictions: Vec<usize> = test_idx
        .iter()
        .map(|&i| forest.predict(&rows[i]))
        .collect();

    let mut confusion_matrix = vec![vec![0usize; classes.len()]; classes.len()];
    let mut correct = 0usize;
    for (a, p) in actual.iter().zip(predictions.iter()) {
        confusion_matrix[*a][*p] += 1;
        if a == p {
            correct += 1;
        }
    }
    let accuracy = correct as f64 / actual.len() as f64;

    info!(
        "Trained {}-tree classifier on target '{}' ({} features, {} train / {} test rows, accuracy {:.2}%)",
        config.tree_count,
        target,
        feature_columns.len(),
        train_idx.len(),
        test_idx.len(),
        accuracy * 100.0
    );

    Ok(Some(PredictionResult {
        target_column: target,
        feature_columns,
        classes,
        predictions,
        actual,
        accuracy,
        confusion_matrix,
    }))
}

fn select_target(dataset: &Dataset, max_cardinality: usize) -> Option<String> {
    dataset.categorical_columns().iter().find_map(|column| {
        let values = match &column.data {
            ColumnData::Categorical(v) => v,
            _ => return None,
        };
        let mut distinct: Vec<&str> = Vec::new();
        for value in values.iter().flatten() {
            if !distinct.contains(&value.as_str()) {
                distinct.push(value.as_str());
            }
        }
        if distinct.len() >= 2 && distinct.len() < max_cardinality {
            Some(column.name.clone())
        } else {
            None
        }
    })
}

/// Keeps rows where the target and every feature are present; labels are
/// encoded in first-seen order so predictions can be decoded later.
fn assemble_training_rows(
    dataset: &Dataset,
    target: &str,
    feature_columns: &[String],
) -> (Vec<Vec<f64>>, Vec<usize>, Vec<String>) {
    let target_values = match &dataset.column(target).map(|c| &c.data) {
        Some(ColumnData::Categorical(v)) => v.clone(),
        _ => return (Vec::new(), Vec::new(), Vec::new()),
    };

    let feature_series: Vec<Vec<Option<f64>>> = feature_columns
        .iter()
        .filter_map(|name| match dataset.column(name).map(|c| &c.data) {
            Some(ColumnData::Numeric(v)) => Some(v.clone()),
            _ => None,
        })
        .collect();

    let mut classes: Vec<String> = Vec::new();
    let mut rows = Vec::new();
    let mut labels = Vec::new();

    for row in 0..dataset.row_count() {
        let label = match &target_values[row] {
            Some(v) => v,
            None => continue,
        };
        let features: Option<Vec<f64>> =
            feature_series.iter().map(|series| series[row]).collect();
        let features = match features {
            Some(f) => f,
            None => continue,
        };

        let encoded = match classes.iter().position(|c| c == label) {
            Some(idx) => idx,
            None => {
                classes.push(label.clone());
                classes.len() - 1
            }
        };

        rows.push(features);
        labels.push(encoded);
    }

    (rows, labels, classes)
}

enum Node {
    Leaf(usize),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, row: &[f64]) -> usize {
        match self {
            Node::Leaf(class) => *class,
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] <= *threshold {
                    left.predict(row)
                } else {
                    right.predict(row)
                }
            }
        }
    }
}

struct RandomForest {
    trees: Vec<Node>,
    class_count: usize,
}

impl RandomForest {
    fn fit(
        rows: &[&[f64]],
        labels: &[usize],
        class_count: usize,
        tree_count: usize,
        rng: &mut StdRng,
    ) -> Self {
        let feature_count = rows.first().map(|r| r.len()).unwrap_or(0);
        let features_per_split = ((feature_count as f64).sqrt().ceil() as usize)
            .clamp(1, feature_count.max(1));

        let trees = (0..tree_count)
            .map(|_| {
                // Bootstrap sample with replacement.
                let sample: Vec<usize> =
                    (0..rows.len()).map(|_| rng.gen_range(0..rows.len())).collect();
                build_tree(
                    rows,
                    labels,
                    &sample,
                    class_count,
                    features_per_split,
                    0,
                    rng,
                )
            })
            .collect();

        Self { trees, class_count }
    }

    fn predict(&self, row: &[f64]) -> usize {
        let mut votes = vec![0usize; self.class_count];
        for tree in &self.trees {
            votes[tree.predict(row)] += 1;
        }
        votes
            .iter()
            .enumerate()
            .max_by_key(|(_, v)| **v)
            .map(|(class, _)| class)
            .unwrap_or(0)
    }
}

fn majority_class(labels: &[usize], sample: &[usize], class_count: usize) -> usize {
    let mut counts = vec![0usize; class_count];
    for &idx in sample {
        counts[labels[idx]] += 1;
    }
    counts
        .iter()
        .enumerate()
        .max_by_key(|(_, c)| **c)
        .map(|(class, _)| class)
        .unwrap_or(0)
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let mut impurity = 1.0;
    for &count in counts {
        let p = count as f64 / total as f64;
        impurity -= p * p;
    }
    impurity
}

fn is_pure(labels: &[usize], sample: &[usize]) -> bool {
    sample
        .windows(2)
        .all(|w| labels[w[0]] == labels[w[1]])
}

#[allow(clippy::too_many_arguments)]
fn build_tree(
    rows: &[&[f64]],
    labels: &[usize],
    sample: &[usize],
    class_count: usize,
    features_per_split: usize,
    depth: usize,
    rng: &mut StdRng,
) -> Node {
    if sample.len() < MIN_SAMPLES_SPLIT || depth >= MAX_DEPTH || is_pure(labels, sample) {
        return Node::Leaf(majority_class(labels, sample, class_count));
    }

    let feature_count = rows[0].len();
    let mut candidate_features: Vec<usize> = (0..feature_count).collect();
    candidate_features.shuffle(rng);
    candidate_features.truncate(features_per_split);

    let mut best: Option<(usize, f64, f64)> = None; // (feature, threshold, impurity)

    for &feature in &candidate_features {
        let mut values: Vec<f64> = sample.iter().map(|&i| rows[i][feature]).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        values.dedup();
        if values.len() < 2 {
            continue;
        }

        let stride = (values.len() / MAX_THRESHOLDS).max(1);
        for pair in values.windows(2).step_by(stride) {
            let threshold = (pair[0] + pair[1]) / 2.0;

            let mut left_counts = vec![0usize; class_count];
            let mut right_counts = vec![0usize; class_count];
            let mut left_total = 0usize;
            let mut right_total = 0usize;

            for &idx in sample {
                if rows[idx][feature] <= threshold {
                    left_counts[labels[idx]] += 1;
                    left_total += 1;
                } else {
                    right_counts[labels[idx]] += 1;
                    right_total += 1;
                }
            }

            if left_total == 0 || right_total == 0 {
                continue;
            }

            let total = (left_total + right_total) as f64;
            let impurity = (left_total as f64 / total) * gini(&left_counts, left_total)
                + (right_total as f64 / total) * gini(&right_counts, right_total);

            if best.map_or(true, |(_, _, current)| impurity < current) {
                best = Some((feature, threshold, impurity));
            }
        }
    }

    let (feature, threshold, _) = match best {
        Some(split) => split,
        None => return Node::Leaf(majority_class(labels, sample, class_count)),
    };

    let (left_sample, right_sample): (Vec<usize>, Vec<usize>) = sample
        .iter()
        .partition(|&&idx| rows[idx][feature] <= threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_tree(
            rows,
            labels,
            &left_sample,
            class_count,
            features_per_split,
            depth + 1,
            rng,
        )),
        right: Box::new(build_tree(
            rows,
            labels,
            &right_sample,
            class_count,
            features_per_split,
            depth + 1,
            rng,
        )),
    }
}
