//! Coordinator - runs the full query pipeline

use crate::config::RouterConfig;
use crate::error::{Error, Result};
use crate::history::{Query, QueryLog};
use crate::orchestrator::adapter::QueryAdapter;
use crate::orchestrator::classifier::IntentClassifier;
use crate::orchestrator::dispatcher::Dispatcher;
use crate::orchestrator::outcome::SynthesizedReport;
use crate::orchestrator::synthesizer::Synthesizer;
use crate::registry::SpecialistRegistry;
use crate::render::ReportRenderer;
use crate::specialist::SpecialistSet;
use crate::specialists::builtin_specialists;
use crate::types::TagSet;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, Span};

/// Everything produced for one query
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    /// The recorded query
    pub query: Query,
    /// Capabilities selected by the classifier
    pub tags: TagSet,
    /// Synthesized report
    pub report: SynthesizedReport,
    /// Rendered Markdown document
    pub document: String,
}

/// Ties the pipeline stages together and owns the query log
#[derive(Debug)]
pub struct Coordinator {
    registry: Arc<SpecialistRegistry>,
    classifier: IntentClassifier,
    adapter: QueryAdapter,
    dispatcher: Dispatcher,
    synthesizer: Synthesizer,
    renderer: ReportRenderer,
    specialists: SpecialistSet,
    log: QueryLog,
}

impl Coordinator {
    /// Create a coordinator with the default dispatcher and an unbounded log
    pub fn new(registry: SpecialistRegistry, specialists: SpecialistSet) -> Self {
        let registry = Arc::new(registry);
        Self {
            classifier: IntentClassifier::new(Arc::clone(&registry)),
            adapter: QueryAdapter::new(Arc::clone(&registry)),
            synthesizer: Synthesizer::new(Arc::clone(&registry)),
            registry,
            dispatcher: Dispatcher::default(),
            renderer: ReportRenderer::default(),
            specialists,
            log: QueryLog::new(),
        }
    }

    /// Build the registry, built-in specialists, dispatcher and log from configuration
    pub fn from_config(config: &RouterConfig) -> Result<Self> {
        let registry = config.registry()?;
        let specialists = builtin_specialists(&config.data);
        Ok(Self::new(registry, specialists)
            .with_dispatcher(config.dispatcher())
            .with_query_log(config.query_log()))
    }

    /// Replace the dispatcher
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Replace the (empty) query log
    pub fn with_query_log(mut self, log: QueryLog) -> Self {
        self.log = log;
        self
    }

    /// Replace the renderer
    pub fn with_renderer(mut self, renderer: ReportRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Specialist registry
    pub fn registry(&self) -> &SpecialistRegistry {
        &self.registry
    }

    /// Registered specialists
    pub fn specialists(&self) -> &SpecialistSet {
        &self.specialists
    }

    /// Query log
    pub fn query_log(&self) -> &QueryLog {
        &self.log
    }

    /// Process one query: record, classify, dispatch, synthesize and render.
    ///
    /// Blank text is rejected before anything is recorded. Specialist
    /// failures are reported inside the document, never as `Err`.
    #[instrument(skip(self, text), fields(query_id = tracing::field::Empty))]
    pub async fn process(&self, text: &str) -> Result<QueryResponse> {
        if text.trim().is_empty() {
            return Err(Error::invalid_input("query text must not be empty"));
        }

        let start = Instant::now();
        let query = self.log.record(text);
        Span::current().record("query_id", query.id.value());

        let tags = self.classifier.classify(&query.text);
        info!(tags = %tags, "processing query");

        let outcomes = self
            .dispatcher
            .dispatch(
                &tags,
                |tag| self.adapter.adapt(&query.text, tag),
                &self.specialists,
            )
            .await?;

        let report = self.synthesizer.synthesize(outcomes);
        let document = self.renderer.render(&report);

        info!(
            status = %report.status,
            succeeded = report.succeeded,
            dispatched = report.dispatched,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "query processed"
        );

        Ok(QueryResponse {
            query,
            tags,
            report,
            document,
        })
    }
}
