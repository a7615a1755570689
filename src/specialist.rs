//! Specialist trait and result payloads

use crate::error::Result;
use crate::render::DetailRenderer;
use crate::specialists::{DataAnalysis, LiteratureAnalysis, MissionAnalysis};
use crate::types::CapabilityTag;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Structured result of a specialist invocation.
///
/// One variant per capability, plus [`Payload::Opaque`] for specialists whose
/// schema the engine does not know. Opaque payloads are passed through to the
/// per-tag view but never contribute detail blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum Payload {
    /// Result of tabular data analysis
    StructuredData(DataAnalysis),
    /// Result of literature mining
    Literature(LiteratureAnalysis),
    /// Result of mission planning
    MissionPlanning(MissionAnalysis),
    /// Schema-less result from an external specialist
    Opaque(serde_json::Value),
}

impl Payload {
    /// Detail rendering capability, if this payload offers one
    pub fn detail_renderer(&self) -> Option<&dyn DetailRenderer> {
        match self {
            Payload::StructuredData(analysis) => Some(analysis),
            Payload::Literature(analysis) => Some(analysis),
            Payload::MissionPlanning(analysis) => Some(analysis),
            Payload::Opaque(_) => None,
        }
    }
}

/// A capability-tagged analyzer invoked by the dispatcher
#[async_trait]
pub trait Specialist: Send + Sync {
    /// Capability this specialist serves
    fn tag(&self) -> CapabilityTag;

    /// Human-readable name for logging
    fn name(&self) -> &str;

    /// Analyze an adapted request
    async fn invoke(&self, request: &str) -> Result<Payload>;
}

/// Specialists available to the dispatcher, at most one per tag
#[derive(Clone, Default)]
pub struct SpecialistSet {
    specialists: BTreeMap<CapabilityTag, Arc<dyn Specialist>>,
}

impl SpecialistSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a specialist, replacing any previous one for the same tag
    pub fn with(mut self, specialist: Arc<dyn Specialist>) -> Self {
        self.insert(specialist);
        self
    }

    /// Register a specialist, returning the one it replaced
    pub fn insert(&mut self, specialist: Arc<dyn Specialist>) -> Option<Arc<dyn Specialist>> {
        self.specialists.insert(specialist.tag(), specialist)
    }

    /// Specialist serving a tag
    pub fn get(&self, tag: CapabilityTag) -> Option<Arc<dyn Specialist>> {
        self.specialists.get(&tag).cloned()
    }

    /// Number of registered specialists
    pub fn len(&self) -> usize {
        self.specialists.len()
    }

    /// Whether no specialist is registered
    pub fn is_empty(&self) -> bool {
        self.specialists.is_empty()
    }
}

impl std::fmt::Debug for SpecialistSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.specialists.values().map(|s| s.name()))
            .finish()
    }
}
