//! Outcome and report types shared by the dispatch and synthesis stages

use crate::specialist::Payload;
use crate::types::CapabilityTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Success or failure of one specialist invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Specialist returned a result
    Success {
        /// The specialist's payload
        data: Payload,
    },
    /// Specialist failed, timed out or was not available
    Error {
        /// Description of the failure
        reason: String,
    },
}

impl OutcomeStatus {
    /// Whether this is a success
    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeStatus::Success { .. })
    }
}

/// Result of dispatching one tag for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    /// Tag that was dispatched
    pub tag: CapabilityTag,
    /// What the specialist produced
    #[serde(flatten)]
    pub status: OutcomeStatus,
    /// Wall time of the invocation in milliseconds
    pub elapsed_ms: u64,
}

impl Outcome {
    /// Create a successful outcome
    pub fn success(tag: CapabilityTag, data: Payload) -> Self {
        Self {
            tag,
            status: OutcomeStatus::Success { data },
            elapsed_ms: 0,
        }
    }

    /// Create a failed outcome
    pub fn failure(tag: CapabilityTag, reason: impl Into<String>) -> Self {
        Self {
            tag,
            status: OutcomeStatus::Error {
                reason: reason.into(),
            },
            elapsed_ms: 0,
        }
    }

    /// Set the elapsed time
    pub fn with_elapsed(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    /// Whether the specialist succeeded
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Payload, present iff the specialist succeeded
    pub fn payload(&self) -> Option<&Payload> {
        match &self.status {
            OutcomeStatus::Success { data } => Some(data),
            OutcomeStatus::Error { .. } => None,
        }
    }

    /// Failure reason, present iff the specialist failed
    pub fn reason(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Success { .. } => None,
            OutcomeStatus::Error { reason } => Some(reason),
        }
    }
}

/// Qualitative label of a synthesized report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// Every dispatched specialist succeeded
    Complete,
    /// Some, but not all, specialists succeeded
    Partial,
    /// No specialist succeeded
    Failed,
}

impl AnalysisStatus {
    /// Label for a dispatched/succeeded pair
    pub fn from_counts(dispatched: usize, succeeded: usize) -> Self {
        if succeeded == 0 {
            AnalysisStatus::Failed
        } else if succeeded == dispatched {
            AnalysisStatus::Complete
        } else {
            AnalysisStatus::Partial
        }
    }

    /// Lower-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Complete => "complete",
            AnalysisStatus::Partial => "partial",
            AnalysisStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-tag projection of an outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagView {
    /// Display name of the specialist
    pub name: String,
    /// `success` with data, or `error` with reason
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

/// Final merged view of all outcomes for a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizedReport {
    /// Executive summary sentence
    pub summary: String,
    /// Qualitative label
    pub status: AnalysisStatus,
    /// Number of specialists dispatched
    pub dispatched: usize,
    /// Number of specialists that succeeded
    pub succeeded: usize,
    /// Outcome views keyed by tag, in canonical order
    pub per_tag: BTreeMap<CapabilityTag, TagView>,
    /// Combined insights
    pub insights: Vec<String>,
    /// Recommendations
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(AnalysisStatus::from_counts(3, 3), AnalysisStatus::Complete);
        assert_eq!(AnalysisStatus::from_counts(3, 1), AnalysisStatus::Partial);
        assert_eq!(AnalysisStatus::from_counts(2, 0), AnalysisStatus::Failed);
        assert_eq!(AnalysisStatus::from_counts(0, 0), AnalysisStatus::Failed);
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = Outcome::success(CapabilityTag::Literature, Payload::Opaque(serde_json::json!(1)));
        assert!(ok.is_success());
        assert!(ok.payload().is_some());
        assert!(ok.reason().is_none());

        let failed = Outcome::failure(CapabilityTag::Literature, "down").with_elapsed(12);
        assert!(!failed.is_success());
        assert!(failed.payload().is_none());
        assert_eq!(failed.reason(), Some("down"));
        assert_eq!(failed.elapsed_ms, 12);
    }

    #[test]
    fn test_tag_view_serializes_flat() {
        let view = TagView {
            name: "Papers".to_string(),
            status: OutcomeStatus::Error {
                reason: "offline".to_string(),
            },
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "Papers", "status": "error", "reason": "offline" })
        );
    }
}
