//! Markdown rendering of synthesized reports
//!
//! The renderer knows nothing about individual specialists. Payloads that want
//! extra output implement [`DetailRenderer`]; the renderer asks each payload for
//! that capability and prints whatever blocks come back.

use crate::orchestrator::{OutcomeStatus, SynthesizedReport};

/// Single entry of a detail section
#[derive(Debug, Clone, PartialEq)]
pub enum DetailItem {
    /// Plain line of text
    Text(String),
    /// Reference to a generated artifact (file path or URL)
    Artifact(String),
}

/// Titled list of detail items
#[derive(Debug, Clone, PartialEq)]
pub struct DetailSection {
    /// Section heading
    pub title: String,
    /// Entries, rendered in order
    pub items: Vec<DetailItem>,
}

impl DetailSection {
    /// Section made of plain text lines
    pub fn text<I, S>(title: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            items: lines.into_iter().map(|l| DetailItem::Text(l.into())).collect(),
        }
    }

    /// Section made of artifact references
    pub fn artifacts<I, S>(title: impl Into<String>, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            items: refs.into_iter().map(|r| DetailItem::Artifact(r.into())).collect(),
        }
    }

    /// Whether the section has nothing to show
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Titled group of sections contributed by one payload
#[derive(Debug, Clone, PartialEq)]
pub struct DetailBlock {
    /// Block heading
    pub title: String,
    /// Sections of the block
    pub sections: Vec<DetailSection>,
}

impl DetailBlock {
    /// Create a block
    pub fn new(title: impl Into<String>, sections: Vec<DetailSection>) -> Self {
        Self {
            title: title.into(),
            sections,
        }
    }

    /// Whether every section is empty
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(DetailSection::is_empty)
    }
}

/// Capability of a result type to contribute nested detail blocks to a report
pub trait DetailRenderer {
    /// Detail blocks for this result; empty blocks and sections are skipped
    fn detail_blocks(&self) -> Vec<DetailBlock>;
}

/// Renders a [`SynthesizedReport`] as a Markdown document
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    title: String,
}

impl ReportRenderer {
    /// Create a renderer with the default title
    pub fn new() -> Self {
        Self {
            title: "Multi-Specialist Analysis Report".to_string(),
        }
    }

    /// Set the document title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Render the report
    pub fn render(&self, report: &SynthesizedReport) -> String {
        let mut out = String::new();

        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str("## Executive Summary\n");
        out.push_str(&format!("{}\n\n", report.summary));

        out.push_str("## Specialist Status\n\n");
        for (tag, view) in &report.per_tag {
            let marker = if view.status.is_success() { "✅" } else { "❌" };
            out.push_str(&format!(
                "- **{}** {} {}\n",
                tag.as_str().to_uppercase(),
                marker,
                view.name
            ));

            match &view.status {
                OutcomeStatus::Success { data } => {
                    if let Some(details) = data.detail_renderer() {
                        for block in details.detail_blocks() {
                            render_block(&mut out, &block);
                        }
                    }
                }
                OutcomeStatus::Error { reason } => {
                    out.push_str(&format!("  Reason: {}\n", reason));
                }
            }
        }

        if !report.insights.is_empty() {
            out.push_str("\n## Combined Insights\n");
            for insight in &report.insights {
                out.push_str(&format!("- {}\n", insight));
            }
        }

        out.push_str("\n## Recommendations\n");
        for recommendation in &report.recommendations {
            out.push_str(&format!("- {}\n", recommendation));
        }

        out
    }
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_block(out: &mut String, block: &DetailBlock) {
    if block.is_empty() {
        return;
    }
    out.push_str(&format!("  {}:\n", block.title));
    for section in block.sections.iter().filter(|s| !s.is_empty()) {
        out.push_str(&format!("    {}:\n", section.title));
        for item in &section.items {
            match item {
                DetailItem::Text(text) => out.push_str(&format!("      - {}\n", text)),
                DetailItem::Artifact(path) => out.push_str(&format!("      - ![]({})\n", path)),
            }
        }
    }
}
