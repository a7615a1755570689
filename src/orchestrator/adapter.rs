//! Query adaptation - specialist-specific framing of the raw query

use crate::error::{Error, Result};
use crate::registry::SpecialistRegistry;
use crate::types::CapabilityTag;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Placeholder replaced by the raw query inside a prompt template
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Request handed to a single specialist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptedRequest {
    /// Target capability
    pub tag: CapabilityTag,
    /// Framed request text
    pub text: String,
}

/// Applies each capability's prompt template to the raw query
#[derive(Debug, Clone)]
pub struct QueryAdapter {
    registry: Arc<SpecialistRegistry>,
}

impl QueryAdapter {
    /// Create an adapter over a registry
    pub fn new(registry: Arc<SpecialistRegistry>) -> Self {
        Self { registry }
    }

    /// Frame `text` for the specialist serving `tag`.
    ///
    /// Fails only if `tag` has no registry entry, which a validated registry
    /// rules out.
    pub fn adapt(&self, text: &str, tag: CapabilityTag) -> Result<AdaptedRequest> {
        let profile = self
            .registry
            .profile(tag)
            .ok_or(Error::UnknownCapability(tag))?;

        let template = &profile.prompt_template;
        let text = if template.contains(QUERY_PLACEHOLDER) {
            template.replace(QUERY_PLACEHOLDER, text)
        } else {
            format!("{}{}", template, text)
        };

        Ok(AdaptedRequest { tag, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{default_profiles, SpecialistProfile};

    fn adapter() -> QueryAdapter {
        QueryAdapter::new(Arc::new(SpecialistRegistry::default()))
    }

    #[test]
    fn test_prefix_template() {
        let request = adapter()
            .adapt("radiation shielding", CapabilityTag::Literature)
            .unwrap();
        assert_eq!(request.tag, CapabilityTag::Literature);
        assert_eq!(
            request.text,
            "Search the scientific literature for information about: radiation shielding"
        );
    }

    #[test]
    fn test_placeholder_template() {
        let profiles: Vec<SpecialistProfile> = default_profiles()
            .into_iter()
            .map(|mut p| {
                if p.tag == CapabilityTag::MissionPlanning {
                    p.prompt_template = "Plan a mission for {query}, then list risks".to_string();
                }
                p
            })
            .collect();
        let adapter = QueryAdapter::new(Arc::new(SpecialistRegistry::from_profiles(profiles).unwrap()));

        let request = adapter.adapt("the Moon", CapabilityTag::MissionPlanning).unwrap();
        assert_eq!(request.text, "Plan a mission for the Moon, then list risks");
    }

    #[test]
    fn test_adapt_is_idempotent() {
        let adapter = adapter();
        for tag in CapabilityTag::ALL {
            let first = adapter.adapt("mars habitats", tag).unwrap();
            let second = adapter.adapt("mars habitats", tag).unwrap();
            assert_eq!(first, second);
        }
    }
}
