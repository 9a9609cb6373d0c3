// file: src/cleaner/mod.rs
// description: missing-value repair via per-column forward fill
// reference: dataset cleaning stage

use crate::error::Result;
use crate::models::{Column, ColumnData, Dataset};

pub struct DataCleaner;

impl DataCleaner {
    pub fn new() -> Self {
        Self
    }

    /// Fills each missing value with the nearest preceding non-missing value
    /// of the same column.
    ///
    /// A leading missing run has no prior value and stays missing; downstream
    /// consumers must treat remaining `None` entries as missing, never as
    /// zero. Row count, column count, order, names, and all non-missing
    /// values are preserved.
    pub fn clean(&self, dataset: Dataset) -> Result<Dataset> {
        let columns = dataset
            .columns()
            .iter()
            .map(|column| {
                let data = match &column.data {
                    ColumnData::Numeric(values) => ColumnData::Numeric(forward_fill(values)),
                    ColumnData::DateTime(values) => ColumnData::DateTime(forward_fill(values)),
                    ColumnData::Categorical(values) => {
                        ColumnData::Categorical(forward_fill(values))
                    }
                };
                Column::new(column.name.clone(), data)
            })
            .collect();

        Dataset::new(columns)
    }
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new()
    }
}

fn forward_fill<T: Clone>(values: &[Option<T>]) -> Vec<Option<T>> {
    let mut filled = Vec::with_capacity(values.len());
    let mut last: Option<T> = None;

    for value in values {
        match value {
            Some(v) => {
                last = Some(v.clone());
                filled.push(Some(v.clone()));
            }
            None => filled.push(last.clone()),
        }
    }

    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numeric(name: &str, values: Vec<Option<f64>>) -> Column {
        Column::new(name, ColumnData::Numeric(values))
    }

    #[test]
    fn test_forward_fill_carries_preceding_value() {
        let dataset = Dataset::new(vec![numeric(
            "x",
            vec![Some(1.0), None, None, Some(4.0), None],
        )])
        .unwrap();

        let cleaned = DataCleaner::new().clean(dataset).unwrap();
        match &cleaned.column("x").unwrap().data {
            ColumnData::Numeric(values) => {
                assert_eq!(
                    values,
                    &vec![Some(1.0), Some(1.0), Some(1.0), Some(4.0), Some(4.0)]
                );
            }
            other => panic!("unexpected column data: {:?}", other),
        }
    }

    #[test]
    fn test_leading_missing_run_stays_missing() {
        let dataset =
            Dataset::new(vec![numeric("x", vec![None, None, Some(3.0), None])]).unwrap();

        let cleaned = DataCleaner::new().clean(dataset).unwrap();
        match &cleaned.column("x").unwrap().data {
            ColumnData::Numeric(values) => {
                assert_eq!(values, &vec![None, None, Some(3.0), Some(3.0)]);
            }
            other => panic!("unexpected column data: {:?}", other),
        }
    }

    #[test]
    fn test_shape_and_names_preserved() {
        let dataset = Dataset::new(vec![
            numeric("a", vec![Some(1.0), None]),
            Column::new(
                "b",
                ColumnData::Categorical(vec![None, Some("x".to_string())]),
            ),
        ])
        .unwrap();

        let cleaned = DataCleaner::new().clean(dataset.clone()).unwrap();
        assert_eq!(cleaned.row_count(), dataset.row_count());
        assert_eq!(cleaned.column_count(), dataset.column_count());
        assert_eq!(cleaned.column_names(), dataset.column_names());
    }

    #[test]
    fn test_non_missing_values_untouched() {
        let dataset =
            Dataset::new(vec![numeric("x", vec![Some(1.5), Some(2.5), Some(3.5)])]).unwrap();
        let cleaned = DataCleaner::new().clean(dataset.clone()).unwrap();
        assert_eq!(cleaned, dataset);
    }

    #[test]
    fn test_categorical_fill() {
        let dataset = Dataset::new(vec![Column::new(
            "c",
            ColumnData::Categorical(vec![Some("a".to_string()), None, Some("b".to_string())]),
        )])
        .unwrap();

        let cleaned = DataCleaner::new().clean(dataset).unwrap();
        match &cleaned.column("c").unwrap().data {
            ColumnData::Categorical(values) => {
                assert_eq!(values[1].as_deref(), Some("a"));
            }
            other => panic!("unexpected column data: {:?}", other),
        }
    }
}
