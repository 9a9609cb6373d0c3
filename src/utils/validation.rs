// file: src/utils/validation.rs
// description: input validation utilities and helpers
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            PipelineError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(PipelineError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    pub fn validate_csv_extension(path: &Path) -> Result<()> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(()),
            _ => Err(PipelineError::Validation(format!(
                "File is not a CSV file: {}",
                path.display()
            ))),
        }
    }

    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PipelineError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }
}

/// Truncates display text on a character boundary, appending an ellipsis.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_validate_file_path() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("data.csv");
        fs::write(&file, "a,b\n1,2\n").unwrap();

        assert!(Validator::validate_file_path(&file).is_ok());
        assert!(Validator::validate_file_path(dir.path()).is_err());
        assert!(Validator::validate_file_path(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_validate_csv_extension() {
        assert!(Validator::validate_csv_extension(Path::new("data.csv")).is_ok());
        assert!(Validator::validate_csv_extension(Path::new("data.CSV")).is_ok());
        assert!(Validator::validate_csv_extension(Path::new("data.txt")).is_err());
        assert!(Validator::validate_csv_extension(Path::new("data")).is_err());
    }

    #[test]
    fn test_validate_directory() {
        let dir = tempdir().unwrap();
        assert!(Validator::validate_directory(dir.path()).is_ok());
        assert!(Validator::validate_directory(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a longer piece of text", 10), "a longe...");
    }
}
