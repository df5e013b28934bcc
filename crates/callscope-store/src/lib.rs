//! Callscope Storage Layer
//!
//! Implements the `AnalysisStore` trait on SQLite.
//!
//! # Architecture
//!
//! - `transcripts`: submitted text and its processing status
//! - `analyses`: one merged analysis per transcript, stored as JSON, removed
//!   with its transcript
//!
//! # Examples
//!
//! ```no_run
//! use callscope_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! store.health_check().unwrap();
//! ```

#![warn(missing_docs)]

use callscope_domain::traits::AnalysisStore;
use callscope_domain::{
    AnalysisId, StoredAnalysis, StructuredAnalysis, TranscriptRecord, TranscriptStatus,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Transcript not found
    #[error("Transcript not found: {0}")]
    NotFound(AnalysisId),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Analysis JSON could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// SQLite-based implementation of AnalysisStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use callscope_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("callscope.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Verify the database answers queries
    pub fn health_check(&self) -> Result<(), StoreError> {
        self.conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    /// Fetch a submitted transcript
    pub fn get_transcript(&self, id: AnalysisId) -> Result<Option<TranscriptRecord>, StoreError> {
        let record = self
            .conn
            .query_row(
                "SELECT id, title, transcript, source, status, created_at
                 FROM transcripts WHERE id = ?1",
                params![id_to_bytes(id)],
                transcript_from_row,
            )
            .optional()?;

        Ok(record)
    }

    /// All submitted transcripts, including failed and in-flight ones, newest first
    pub fn list_transcripts(&self) -> Result<Vec<TranscriptRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, transcript, source, status, created_at
             FROM transcripts ORDER BY created_at DESC, id DESC",
        )?;
        let records = stmt
            .query_map([], transcript_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Number of stored analyses
    pub fn count_analyses(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM analyses", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn transcript_from_row(row: &Row<'_>) -> rusqlite::Result<TranscriptRecord> {
    let status: String = row.get(4)?;
    let status = TranscriptStatus::parse(&status).ok_or_else(|| {
        conversion_error(
            4,
            rusqlite::types::Type::Text,
            StoreError::InvalidData(format!("Unknown status: {}", status)),
        )
    })?;

    Ok(TranscriptRecord {
        id: id_column(row, 0)?,
        title: row.get(1)?,
        transcript: row.get(2)?,
        source: row.get(3)?,
        status,
        created_at: row.get::<_, i64>(5)? as u64,
    })
}

/// Convert AnalysisId to bytes for storage; big-endian keeps UUIDv7 order
fn id_to_bytes(id: AnalysisId) -> Vec<u8> {
    id.value().to_be_bytes().to_vec()
}

/// Convert bytes to AnalysisId
fn bytes_to_id(bytes: &[u8]) -> Result<AnalysisId, StoreError> {
    let arr: [u8; 16] = bytes.try_into().map_err(|_| {
        StoreError::InvalidData(format!("Expected 16 bytes for AnalysisId, got {}", bytes.len()))
    })?;
    Ok(AnalysisId::from_value(u128::from_be_bytes(arr)))
}

fn conversion_error(idx: usize, ty: rusqlite::types::Type, e: StoreError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(e))
}

fn id_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<AnalysisId> {
    let bytes: Vec<u8> = row.get(idx)?;
    bytes_to_id(&bytes).map_err(|e| conversion_error(idx, rusqlite::types::Type::Blob, e))
}

fn analysis_from_row(row: &Row<'_>) -> rusqlite::Result<StoredAnalysis> {
    let json: String = row.get(3)?;
    let analysis: StructuredAnalysis = serde_json::from_str(&json).map_err(|e| {
        conversion_error(3, rusqlite::types::Type::Text, StoreError::Serialization(e))
    })?;

    Ok(StoredAnalysis {
        id: id_column(row, 0)?,
        title: row.get(1)?,
        source: row.get(2)?,
        created_at: row.get::<_, i64>(4)? as u64,
        analysis,
    })
}

impl AnalysisStore for SqliteStore {
    type Error = StoreError;

    fn insert_transcript(&mut self, transcript: &TranscriptRecord) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO transcripts (id, title, transcript, source, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id_to_bytes(transcript.id),
                &transcript.title,
                &transcript.transcript,
                &transcript.source,
                transcript.status.as_str(),
                transcript.created_at as i64,
            ],
        )?;
        Ok(())
    }

    fn set_status(&mut self, id: AnalysisId, status: TranscriptStatus) -> Result<(), Self::Error> {
        let updated = self.conn.execute(
            "UPDATE transcripts SET status = ?2 WHERE id = ?1",
            params![id_to_bytes(id), status.as_str()],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    /// Stores the analysis and marks its transcript `complete` in one transaction
    fn save_analysis(&mut self, analysis: &StoredAnalysis) -> Result<(), Self::Error> {
        let json = serde_json::to_string(&analysis.analysis)?;
        let id_bytes = id_to_bytes(analysis.id);

        let tx = self.conn.transaction()?;
        let updated = tx.execute(
            "UPDATE transcripts SET status = ?2 WHERE id = ?1",
            params![&id_bytes, TranscriptStatus::Complete.as_str()],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(analysis.id));
        }
        tx.execute(
            "INSERT INTO analyses (id, title, source, summary, analysis, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
             title = excluded.title, source = excluded.source,
             summary = excluded.summary, analysis = excluded.analysis",
            params![
                &id_bytes,
                &analysis.title,
                &analysis.source,
                &analysis.analysis.summary,
                json,
                analysis.created_at as i64,
            ],
        )?;
        tx.commit()?;

        Ok(())
    }

    fn get_analysis(&self, id: AnalysisId) -> Result<Option<StoredAnalysis>, Self::Error> {
        let analysis = self
            .conn
            .query_row(
                "SELECT id, title, source, analysis, created_at FROM analyses WHERE id = ?1",
                params![id_to_bytes(id)],
                analysis_from_row,
            )
            .optional()?;
        Ok(analysis)
    }

    fn list_analyses(&self) -> Result<Vec<StoredAnalysis>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, source, analysis, created_at
             FROM analyses ORDER BY created_at DESC, id DESC",
        )?;
        let analyses = stmt
            .query_map([], analysis_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(analyses)
    }

    fn delete(&mut self, id: AnalysisId) -> Result<bool, Self::Error> {
        let removed = self.conn.execute(
            "DELETE FROM transcripts WHERE id = ?1",
            params![id_to_bytes(id)],
        )?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_bytes_round_trip() {
        let id = AnalysisId::new();
        assert_eq!(bytes_to_id(&id_to_bytes(id)).unwrap(), id);
        assert!(matches!(bytes_to_id(&[1, 2, 3]), Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_health_check() {
        let store = SqliteStore::new(":memory:").unwrap();
        assert!(store.health_check().is_ok());
    }
}
