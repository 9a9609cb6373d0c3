// file: src/extractor/mod.rs
// description: extraction module exports
// reference: csv ingestion

mod csv;
mod infer;

pub use self::csv::CsvExtractor;
pub use infer::{infer_column, is_missing};
