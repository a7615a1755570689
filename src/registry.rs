//! Specialist registry
//!
//! Static mapping from [`CapabilityTag`] to the profile of the specialist that
//! serves it: display name, intent keywords, prompt template and the canned
//! insight/recommendation lines used during synthesis. The registry is built
//! once at startup (defaults or YAML) and shared by reference.

use crate::error::{Error, Result};
use crate::types::CapabilityTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Profile of one specialist domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialistProfile {
    /// Capability served by this specialist
    pub tag: CapabilityTag,
    /// Human-readable name
    pub name: String,
    /// Intent keywords (matched as lower-case substrings)
    pub keywords: Vec<String>,
    /// Instruction template; `{query}` is replaced by the raw text, otherwise
    /// the template is used as a prefix
    pub prompt_template: String,
    /// Insight emitted when this specialist succeeds
    #[serde(default)]
    pub insight: Option<String>,
    /// Recommendation emitted when this specialist succeeds
    #[serde(default)]
    pub recommendation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    specialists: Vec<SpecialistProfile>,
}

/// Validated set of specialist profiles, one per known tag
#[derive(Debug, Clone)]
pub struct SpecialistRegistry {
    profiles: BTreeMap<CapabilityTag, SpecialistProfile>,
}

impl SpecialistRegistry {
    /// Build a registry, checking that every known tag appears exactly once
    pub fn from_profiles(profiles: Vec<SpecialistProfile>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for mut profile in profiles {
            let tag = profile.tag;
            profile.keywords = profile
                .keywords
                .into_iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            if map.insert(tag, profile).is_some() {
                return Err(Error::config(format!(
                    "duplicate registry entry for capability '{}'",
                    tag
                )));
            }
        }

        if let Some(missing) = CapabilityTag::ALL.iter().find(|t| !map.contains_key(t)) {
            return Err(Error::config(format!(
                "registry has no entry for capability '{}'",
                missing
            )));
        }

        Ok(Self { profiles: map })
    }

    /// Load a registry from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: RegistryFile = serde_yaml::from_str(yaml)?;
        Self::from_profiles(file.specialists)
    }

    /// Load a registry from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::config(format!("Failed to read registry file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Profile for a tag
    pub fn profile(&self, tag: CapabilityTag) -> Option<&SpecialistProfile> {
        self.profiles.get(&tag)
    }

    /// Display name for a tag, falling back to the tag identifier
    pub fn display_name(&self, tag: CapabilityTag) -> &str {
        self.profile(tag)
            .map(|p| p.name.as_str())
            .unwrap_or_else(|| tag.as_str())
    }

    /// All profiles in canonical order
    pub fn profiles(&self) -> impl Iterator<Item = &SpecialistProfile> {
        self.profiles.values()
    }

    /// Number of registered specialists
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for SpecialistRegistry {
    fn default() -> Self {
        Self {
            profiles: default_profiles().into_iter().map(|p| (p.tag, p)).collect(),
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Built-in profiles for the three reference specialists
pub fn default_profiles() -> Vec<SpecialistProfile> {
    vec![
        SpecialistProfile {
            tag: CapabilityTag::StructuredData,
            name: "Structured Data Specialist (Data Analyst)".to_string(),
            keywords: words(&[
                "data", "csv", "statistic", "analysis", "chart", "table", "trend", "pattern",
                "number", "dataset", "spreadsheet", "visualization", "correlation", "average",
                "distribution",
            ]),
            prompt_template: "Analyze the CSV data related to: ".to_string(),
            insight: Some("Patterns and trends identified in structured data.".to_string()),
            recommendation: Some(
                "Deepen the analysis of the patterns identified in the datasets.".to_string(),
            ),
        },
        SpecialistProfile {
            tag: CapabilityTag::Literature,
            name: "Literature Specialist (Research Analyst)".to_string(),
            keywords: words(&[
                "article", "research", "literature", "paper", "study", "publication",
                "abstract", "conclusion", "hypothes", "consensus", "gap", "knowledge",
                "scientific", "journal", "author", "citation",
            ]),
            prompt_template: "Search the scientific literature for information about: "
                .to_string(),
            insight: Some("Knowledge gaps and scientific consensus mapped.".to_string()),
            recommendation: Some(
                "Explore the knowledge gaps identified in the scientific literature.".to_string(),
            ),
        },
        SpecialistProfile {
            tag: CapabilityTag::MissionPlanning,
            name: "Mission Specialist (Mission Planner)".to_string(),
            keywords: words(&[
                "mission", "planning", "risk", "opportunit", "investment", "technolog",
                "lunar", "martian", "space", "nasa", "exploration", "rocket", "satellite",
                "astronaut", "rover",
            ]),
            prompt_template: "Provide mission planning insights for: ".to_string(),
            insight: Some("Opportunities and risks for space missions assessed.".to_string()),
            recommendation: Some(
                "Consider investing in promising technologies for space exploration.".to_string(),
            ),
        },
    ]
}
