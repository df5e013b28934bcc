//! Persisted transcripts and their analyses

use crate::analysis::StructuredAnalysis;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier shared by a transcript and its analysis, based on UUIDv7
///
/// UUIDv7 ids sort chronologically, so newer transcripts compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnalysisId(u128);

impl AnalysisId {
    /// Generate a new UUIDv7-based id
    ///
    /// # Examples
    ///
    /// ```
    /// use callscope_domain::AnalysisId;
    ///
    /// let id = AnalysisId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an id from its raw value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an id from its hyphenated UUID form
    ///
    /// # Examples
    ///
    /// ```
    /// use callscope_domain::AnalysisId;
    ///
    /// let id = AnalysisId::new();
    /// let parsed = AnalysisId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s.trim())
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid analysis id: {}", e))
    }

    /// Raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Creation time embedded in the id (milliseconds since Unix epoch)
    pub fn timestamp_millis(&self) -> u64 {
        (self.0 >> 80) as u64
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl Serialize for AnalysisId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AnalysisId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        AnalysisId::from_string(&raw).map_err(serde::de::Error::custom)
    }
}

/// Processing state of a submitted transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptStatus {
    /// Submitted, pipeline running
    Analyzing,
    /// Analysis stored
    Complete,
    /// Pipeline gave up
    Failed,
}

impl TranscriptStatus {
    /// Storage label
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptStatus::Analyzing => "analyzing",
            TranscriptStatus::Complete => "complete",
            TranscriptStatus::Failed => "failed",
        }
    }

    /// Parse a storage label
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "analyzing" => Some(TranscriptStatus::Analyzing),
            "complete" => Some(TranscriptStatus::Complete),
            "failed" => Some(TranscriptStatus::Failed),
            _ => None,
        }
    }
}

/// A submitted transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    /// Identifier, reused by the analysis
    pub id: AnalysisId,

    /// Display title
    pub title: String,

    /// Raw transcript text
    pub transcript: String,

    /// Where it came from (`manual`, `upload`, ...)
    pub source: String,

    /// Processing state
    pub status: TranscriptStatus,

    /// Creation time (Unix seconds)
    pub created_at: u64,
}

impl TranscriptRecord {
    /// Create a transcript in the `analyzing` state
    ///
    /// An empty title becomes `Transcript {unix_millis}`.
    pub fn new(
        title: impl Into<String>,
        transcript: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        let id = AnalysisId::new();
        let title = title.into();
        let title = if title.trim().is_empty() {
            format!("Transcript {}", id.timestamp_millis())
        } else {
            title
        };

        Self {
            id,
            title,
            transcript: transcript.into(),
            source: source.into(),
            status: TranscriptStatus::Analyzing,
            created_at: id.timestamp_millis() / 1000,
        }
    }
}

/// A persisted analysis with its bookkeeping fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAnalysis {
    /// Identifier of the transcript it belongs to
    pub id: AnalysisId,

    /// Transcript title
    pub title: String,

    /// Transcript source
    pub source: String,

    /// Creation time (Unix seconds)
    pub created_at: u64,

    /// The merged analysis
    #[serde(flatten)]
    pub analysis: StructuredAnalysis,
}
