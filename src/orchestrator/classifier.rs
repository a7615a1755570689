//! Intent classification
//!
//! Maps raw query text to the capabilities it needs by lower-case substring
//! matching against each registry profile's keyword list. When nothing
//! matches, every registered capability is selected (fail-open).

use crate::registry::SpecialistRegistry;
use crate::types::TagSet;
use std::sync::Arc;
use tracing::debug;

/// Keyword-based intent classifier
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    registry: Arc<SpecialistRegistry>,
}

impl IntentClassifier {
    /// Create a classifier over a registry
    pub fn new(registry: Arc<SpecialistRegistry>) -> Self {
        Self { registry }
    }

    /// Capabilities required by `text`; never empty for a non-empty registry
    pub fn classify(&self, text: &str) -> TagSet {
        let lowered = text.to_lowercase();

        let matched: TagSet = self
            .registry
            .profiles()
            .filter(|profile| {
                profile
                    .keywords
                    .iter()
                    .any(|keyword| lowered.contains(keyword.as_str()))
            })
            .map(|profile| profile.tag)
            .collect();

        if matched.is_empty() {
            debug!("no intent keyword matched, consulting every specialist");
            return self.registry.profiles().map(|profile| profile.tag).collect();
        }

        debug!(tags = %matched, "classified query intent");
        matched
    }
}
