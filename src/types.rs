//! Core type definitions for the routing engine

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Capability of a specialist domain.
///
/// The set is closed: adding a domain means adding a variant here and an entry
/// to the registry. Declaration order is the canonical dispatch order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityTag {
    /// Tabular/structured data analysis
    StructuredData,
    /// Scientific literature mining
    Literature,
    /// Mission planning insights
    MissionPlanning,
}

impl CapabilityTag {
    /// Every known tag, in canonical order
    pub const ALL: [CapabilityTag; 3] = [
        CapabilityTag::StructuredData,
        CapabilityTag::Literature,
        CapabilityTag::MissionPlanning,
    ];

    /// Stable identifier used on the wire and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityTag::StructuredData => "structured_data",
            CapabilityTag::Literature => "literature",
            CapabilityTag::MissionPlanning => "mission_planning",
        }
    }
}

impl fmt::Display for CapabilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapabilityTag {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CapabilityTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| crate::error::Error::invalid_input(format!("unknown capability: {}", s)))
    }
}

/// Duplicate-free set of tags, always iterated in canonical order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<CapabilityTag>);

impl TagSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Set containing every known tag
    pub fn all() -> Self {
        CapabilityTag::ALL.into_iter().collect()
    }

    /// Insert a tag; returns false if it was already present
    pub fn insert(&mut self, tag: CapabilityTag) -> bool {
        self.0.insert(tag)
    }

    /// Whether the set contains a tag
    pub fn contains(&self, tag: CapabilityTag) -> bool {
        self.0.contains(&tag)
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in canonical order
    pub fn iter(&self) -> impl Iterator<Item = CapabilityTag> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<CapabilityTag> for TagSet {
    fn from_iter<I: IntoIterator<Item = CapabilityTag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.iter().map(|t| t.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Identifier of a recorded query, strictly increasing within a process.
///
/// Serialized in its display form (`q-3`), the same text the logs carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct QueryId(u64);

impl QueryId {
    /// Create a query ID from its sequence number
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Get the underlying sequence number
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q-{}", self.0)
    }
}

impl FromStr for QueryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("q-")
            .and_then(|seq| seq.parse().ok())
            .map(Self)
            .ok_or_else(|| format!("invalid query id '{}'", s))
    }
}

impl From<QueryId> for String {
    fn from(id: QueryId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for QueryId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_set_is_canonically_ordered_and_deduplicated() {
        let set: TagSet = [
            CapabilityTag::MissionPlanning,
            CapabilityTag::StructuredData,
            CapabilityTag::MissionPlanning,
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 2);
        let order: Vec<_> = set.iter().collect();
        assert_eq!(
            order,
            vec![CapabilityTag::StructuredData, CapabilityTag::MissionPlanning]
        );
    }

    #[test]
    fn test_tag_round_trips_through_str() {
        for tag in CapabilityTag::ALL {
            assert_eq!(tag.as_str().parse::<CapabilityTag>().unwrap(), tag);
        }
        assert!("astrology".parse::<CapabilityTag>().is_err());
    }

    #[test]
    fn test_tag_serializes_snake_case() {
        let json = serde_json::to_string(&CapabilityTag::MissionPlanning).unwrap();
        assert_eq!(json, "\"mission_planning\"");
    }

    #[test]
    fn test_query_id_serializes_as_display_form() {
        let id = QueryId::new(3);
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!("q-3"));

        let back: QueryId = serde_json::from_str("\"q-3\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<QueryId>("3").is_err());
        assert!("query-3".parse::<QueryId>().is_err());
    }
}
