//! Built-in specialists
//!
//! - [`StructuredDataSpecialist`]: tabular analysis of a CSV source
//! - [`LiteratureSpecialist`]: theme, gap and conclusion mining over abstracts
//! - [`MissionPlanningSpecialist`]: rule-based risk and planning insights

mod literature;
mod missions;
mod structured_data;

pub use literature::{analyze_articles, Article, LiteratureAnalysis, LiteratureSpecialist};
pub use missions::{analyze_mission, MissionAnalysis, MissionPlan, MissionPlanningSpecialist};
pub use structured_data::{analyze_csv, ColumnSummary, DataAnalysis, StructuredDataSpecialist};

use crate::config::DataConfig;
use crate::error::{Error, Result};
use crate::specialist::SpecialistSet;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// One instance of every built-in specialist, wired to the configured data sources
pub fn builtin_specialists(data: &DataConfig) -> SpecialistSet {
    let client = Client::new();

    let mut structured = StructuredDataSpecialist::new(data.csv_source.clone()).with_client(client.clone());
    if let Some(dir) = &data.artifact_dir {
        structured = structured.with_artifact_dir(dir.clone());
    }

    let mut literature = LiteratureSpecialist::new().with_client(client);
    if let Some(catalog) = &data.catalog_source {
        literature = literature.with_catalog(catalog.clone());
    }

    SpecialistSet::new()
        .with(Arc::new(structured))
        .with(Arc::new(literature))
        .with(Arc::new(MissionPlanningSpecialist::new()))
}

/// Read a text source: `http(s)` URLs are fetched, anything else is a file path
pub(crate) async fn read_source(client: &Client, source: &str) -> Result<String> {
    match Url::parse(source) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(Error::other(format!("fetching {} failed: HTTP {}", source, status)));
            }
            Ok(response.text().await?)
        }
        _ => Ok(tokio::fs::read_to_string(source).await?),
    }
}
