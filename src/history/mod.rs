// file: src/history/mod.rs
// description: sqlite-backed store of past report runs
// reference: https://docs.rs/rusqlite

use crate::error::Result;
use crate::models::ReportRecord;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Persists one row per generated report so past runs can be listed and
/// inspected from the CLI.
pub struct HistoryStore {
    conn: Connection,
}

impl HistoryStore {
    /// Opens (or creates) the database and ensures the schema exists.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL,
                report_path TEXT NOT NULL,
                report_type TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                analysis_results TEXT,
                metadata TEXT
            )",
            [],
        )?;
        debug!("History store ready at {}", db_path.display());

        Ok(Self { conn })
    }

    /// In-memory store for tests.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL,
                report_path TEXT NOT NULL,
                report_type TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                analysis_results TEXT,
                metadata TEXT
            )",
            [],
        )?;
        Ok(Self { conn })
    }

    /// Inserts a run record and returns its row id.
    pub fn save(
        &self,
        filename: &str,
        report_path: &str,
        report_type: &str,
        analysis_results: &Value,
        metadata: &Value,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO reports (filename, report_path, report_type, analysis_results, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                filename,
                report_path,
                report_type,
                serde_json::to_string(analysis_results)?,
                serde_json::to_string(metadata)?,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!("Saved report history entry {} for {}", id, filename);
        Ok(id)
    }

    /// Most recent runs, newest first.
    pub fn get_recent(&self, limit: usize) -> Result<Vec<ReportRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, filename, report_path, report_type, created_at,
                    analysis_results, metadata
             FROM reports
             ORDER BY created_at DESC, id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], row_to_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    pub fn get_details(&self, id: i64) -> Result<Option<ReportRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, filename, report_path, report_type, created_at,
                    analysis_results, metadata
             FROM reports
             WHERE id = ?1",
        )?;

        let record = stmt.query_row(params![id], row_to_record).optional()?;
        Ok(record)
    }
}

fn row_to_record(row: &Row) -> rusqlite::Result<ReportRecord> {
    let analysis_text: Option<String> = row.get(5)?;
    let metadata_text: Option<String> = row.get(6)?;

    Ok(ReportRecord {
        id: row.get(0)?,
        filename: row.get(1)?,
        report_path: row.get(2)?,
        report_type: row.get(3)?,
        created_at: row.get(4)?,
        analysis_results: parse_json_field(analysis_text),
        metadata: parse_json_field(metadata_text),
    })
}

// Older rows may hold NULL or malformed text; both degrade to JSON null.
fn parse_json_field(text: Option<String>) -> Value {
    text.and_then(|t| serde_json::from_str(&t).ok())
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested/data/reports.db");
        HistoryStore::open(&db_path).unwrap();
        assert!(db_path.exists());
    }

    #[test]
    fn test_save_and_fetch_details() {
        let store = HistoryStore::open_in_memory().unwrap();
        let analysis = json!({"rows": 10, "columns": 3});
        let metadata = json!({"mode": "detailed"});

        let id = store
            .save("sales.csv", "/out/report.pdf", "detailed", &analysis, &metadata)
            .unwrap();

        let record = store.get_details(id).unwrap().expect("record must exist");
        assert_eq!(record.filename, "sales.csv");
        assert_eq!(record.report_path, "/out/report.pdf");
        assert_eq!(record.report_type, "detailed");
        assert_eq!(record.analysis_results["rows"], 10);
        assert_eq!(record.metadata["mode"], "detailed");
    }

    #[test]
    fn test_get_details_missing_id() {
        let store = HistoryStore::open_in_memory().unwrap();
        assert!(store.get_details(99).unwrap().is_none());
    }

    #[test]
    fn test_get_recent_orders_newest_first() {
        let store = HistoryStore::open_in_memory().unwrap();
        for name in ["first.csv", "second.csv", "third.csv"] {
            store
                .save(name, "/out/r.pdf", "basic", &json!({}), &json!({}))
                .unwrap();
        }

        let records = store.get_recent(2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].filename, "third.csv");
        assert_eq!(records[1].filename, "second.csv");
    }

    #[test]
    fn test_malformed_json_degrades_to_null() {
        let store = HistoryStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO reports (filename, report_path, report_type, analysis_results, metadata)
                 VALUES ('x.csv', '/r.pdf', 'basic', 'not json', NULL)",
                [],
            )
            .unwrap();

        let records = store.get_recent(1).unwrap();
        assert_eq!(records[0].analysis_results, Value::Null);
        assert_eq!(records[0].metadata, Value::Null);
    }
}
