//! Synthesis - merges specialist outcomes into one report
//!
//! Pure and deterministic: the same outcomes always give the same report.

use crate::orchestrator::outcome::{AnalysisStatus, Outcome, SynthesizedReport, TagView};
use crate::registry::SpecialistRegistry;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Insights appended when more than one specialist succeeded
pub const CROSS_CUTTING_INSIGHTS: [&str; 2] = [
    "Multi-dimensional analysis performed successfully.",
    "Potential correlations observed across different types of data.",
];

/// Sole recommendation when no specialist succeeded
pub const NO_RESULTS_RECOMMENDATION: &str =
    "Recommendations could not be generated because no specialist returned results.";

/// Sole recommendation when specialists succeeded but none has a recommendation rule
pub const GENERIC_RECOMMENDATION: &str =
    "No specific recommendation was generated, but the data is available for deeper analysis.";

/// Builds [`SynthesizedReport`]s from outcome sequences
#[derive(Debug, Clone)]
pub struct Synthesizer {
    registry: Arc<SpecialistRegistry>,
}

impl Synthesizer {
    /// Create a synthesizer over a registry
    pub fn new(registry: Arc<SpecialistRegistry>) -> Self {
        Self { registry }
    }

    /// Merge outcomes into a report
    pub fn synthesize(&self, mut outcomes: Vec<Outcome>) -> SynthesizedReport {
        outcomes.sort_by_key(|o| o.tag);

        let dispatched = outcomes.len();
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        let status = AnalysisStatus::from_counts(dispatched, succeeded);

        let insights = self.insights(&outcomes, succeeded);
        let recommendations = self.recommendations(&outcomes, succeeded);
        let summary = summary(dispatched, succeeded, status);

        let per_tag: BTreeMap<_, _> = outcomes
            .into_iter()
            .map(|outcome| {
                let view = TagView {
                    name: self.registry.display_name(outcome.tag).to_string(),
                    status: outcome.status,
                };
                (outcome.tag, view)
            })
            .collect();

        SynthesizedReport {
            summary,
            status,
            dispatched,
            succeeded,
            per_tag,
            insights,
            recommendations,
        }
    }

    fn insights(&self, outcomes: &[Outcome], succeeded: usize) -> Vec<String> {
        let mut insights: Vec<String> = outcomes
            .iter()
            .filter(|o| o.is_success())
            .filter_map(|o| self.registry.profile(o.tag)?.insight.clone())
            .collect();

        if succeeded > 1 {
            insights.extend(CROSS_CUTTING_INSIGHTS.iter().map(|s| s.to_string()));
        }
        insights
    }

    fn recommendations(&self, outcomes: &[Outcome], succeeded: usize) -> Vec<String> {
        if succeeded == 0 {
            return vec![NO_RESULTS_RECOMMENDATION.to_string()];
        }

        let recommendations: Vec<String> = outcomes
            .iter()
            .filter(|o| o.is_success())
            .filter_map(|o| self.registry.profile(o.tag)?.recommendation.clone())
            .collect();

        if recommendations.is_empty() {
            vec![GENERIC_RECOMMENDATION.to_string()]
        } else {
            recommendations
        }
    }
}

fn summary(dispatched: usize, succeeded: usize, status: AnalysisStatus) -> String {
    let detail = match status {
        AnalysisStatus::Complete => "full analysis performed successfully",
        AnalysisStatus::Partial => "some results are available",
        AnalysisStatus::Failed => "the analysis could not be completed due to specialist errors",
    };
    format!(
        "Analysis executed by {} specialist agents; {} returned results successfully. Status: {} ({}).",
        dispatched, succeeded, status, detail
    )
}
