//! Structured-data specialist

use super::read_source;
use crate::error::{Error, Result};
use crate::render::{DetailBlock, DetailRenderer, DetailSection};
use crate::specialist::{Payload, Specialist};
use crate::types::CapabilityTag;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, info};

/// Summary statistics of a numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Column name
    pub column: String,
    /// Non-empty cells
    pub count: usize,
    /// Arithmetic mean of the non-empty cells
    pub mean: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

/// Exploratory analysis of a CSV table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataAnalysis {
    /// Where the table came from
    pub source: String,
    /// Header names, in file order
    pub columns: Vec<String>,
    /// Number of data rows
    pub row_count: usize,
    /// Empty cells per column
    pub missing_values: BTreeMap<String, usize>,
    /// Rows identical to an earlier row
    pub duplicate_rows: usize,
    /// Statistics for columns whose non-empty cells are all numeric
    pub numeric_summaries: Vec<ColumnSummary>,
    /// Files written alongside the analysis
    #[serde(default)]
    pub artifacts: Vec<String>,
}

/// Analyze CSV text with a header row
pub fn analyze_csv(source: &str, content: &str) -> Result<DataAnalysis> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if columns.is_empty() {
        return Err(Error::specialist(
            CapabilityTag::StructuredData,
            format!("{} has no header row", source),
        ));
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.trim().to_string()).collect());
    }

    let mut seen = HashSet::new();
    let duplicate_rows = rows.iter().filter(|row| !seen.insert(row.as_slice())).count();

    let mut missing_values = BTreeMap::new();
    let mut numeric_summaries = Vec::new();
    for (index, column) in columns.iter().enumerate() {
        let cells: Vec<&str> = rows.iter().map(|row| row[index].as_str()).collect();
        missing_values.insert(column.clone(), cells.iter().filter(|c| c.is_empty()).count());

        let values: Option<Vec<f64>> = cells
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| c.parse::<f64>().ok())
            .collect();
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            numeric_summaries.push(summarize(column, &values));
        }
    }

    Ok(DataAnalysis {
        source: source.to_string(),
        columns,
        row_count: rows.len(),
        missing_values,
        duplicate_rows,
        numeric_summaries,
        artifacts: Vec::new(),
    })
}

fn summarize(column: &str, values: &[f64]) -> ColumnSummary {
    let count = values.len();
    let sum: f64 = values.iter().sum();
    ColumnSummary {
        column: column.to_string(),
        count,
        mean: sum / count as f64,
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

impl DetailRenderer for DataAnalysis {
    fn detail_blocks(&self) -> Vec<DetailBlock> {
        let overview = vec![
            format!("Rows: {}", self.row_count),
            format!("Columns: {}", self.columns.join(", ")),
            format!("Duplicate rows: {}", self.duplicate_rows),
        ];
        let numeric = self.numeric_summaries.iter().map(|s| {
            format!(
                "{}: count {}, mean {:.2}, min {:.2}, max {:.2}",
                s.column, s.count, s.mean, s.min, s.max
            )
        });
        let missing = self
            .columns
            .iter()
            .filter_map(|c| match self.missing_values.get(c) {
                Some(&n) if n > 0 => Some(format!("{}: {}", c, n)),
                _ => None,
            });

        vec![DetailBlock::new(
            "Data Analysis",
            vec![
                DetailSection::text("Overview", overview),
                DetailSection::text("Numeric summaries", numeric),
                DetailSection::text("Missing values", missing),
                DetailSection::artifacts("Generated artifacts", self.artifacts.iter().cloned()),
            ],
        )]
    }
}

/// Analyzes the configured CSV source
pub struct StructuredDataSpecialist {
    source: Option<String>,
    artifact_dir: Option<PathBuf>,
    client: Client,
}

impl StructuredDataSpecialist {
    /// Create a specialist over a CSV file path or URL
    pub fn new(source: Option<String>) -> Self {
        Self {
            source,
            artifact_dir: None,
            client: Client::new(),
        }
    }

    /// Write each analysis as JSON into `dir`
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(dir.into());
        self
    }

    /// Use a shared HTTP client
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    async fn write_artifact(&self, analysis: &DataAnalysis) -> Result<Option<String>> {
        let Some(dir) = &self.artifact_dir else {
            return Ok(None);
        };
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!(
            "structured_data_{}.json",
            Utc::now().format("%Y%m%dT%H%M%S%3f")
        ));
        tokio::fs::write(&path, serde_json::to_vec_pretty(analysis)?).await?;
        Ok(Some(path.display().to_string()))
    }
}

#[async_trait]
impl Specialist for StructuredDataSpecialist {
    fn tag(&self) -> CapabilityTag {
        CapabilityTag::StructuredData
    }

    fn name(&self) -> &str {
        "structured-data"
    }

    async fn invoke(&self, request: &str) -> Result<Payload> {
        let source = self
            .source
            .as_deref()
            .ok_or_else(|| Error::specialist(self.tag(), "no CSV source configured"))?;
        debug!(source, request, "loading CSV");

        let content = read_source(&self.client, source).await?;
        let mut analysis = analyze_csv(source, &content)?;
        if let Some(path) = self.write_artifact(&analysis).await? {
            analysis.artifacts.push(path);
        }

        info!(
            rows = analysis.row_count,
            columns = analysis.columns.len(),
            "structured data analyzed"
        );
        Ok(Payload::StructuredData(analysis))
    }
}
