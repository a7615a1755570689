//! Query routing pipeline
//!
//! A query flows through five stages:
//!
//! - **Classify**: [`IntentClassifier`] picks the capabilities a query needs
//! - **Adapt**: [`QueryAdapter`] frames the query for each specialist
//! - **Dispatch**: [`Dispatcher`] invokes specialists with failure isolation
//! - **Synthesize**: [`Synthesizer`] merges outcomes into a [`SynthesizedReport`]
//! - **Render**: [`crate::render::ReportRenderer`] produces the Markdown document
//!
//! [`Coordinator`] runs the whole pipeline and records every query.
//!
//! # Example
//!
//! ```rust,ignore
//! use spectra::{Coordinator, RouterConfig};
//!
//! let config = RouterConfig::load(None)?;
//! let coordinator = Coordinator::from_config(&config)?;
//! let response = coordinator.process("Mars habitat risks").await?;
//! println!("{}", response.document);
//! ```

pub mod adapter;
pub mod classifier;
pub mod coordinator;
pub mod dispatcher;
pub mod outcome;
pub mod synthesizer;

// Re-exports
pub use adapter::{AdaptedRequest, QueryAdapter, QUERY_PLACEHOLDER};
pub use classifier::IntentClassifier;
pub use coordinator::{Coordinator, QueryResponse};
pub use dispatcher::{DispatchMode, Dispatcher, DEFAULT_MAX_IN_FLIGHT};
pub use outcome::{AnalysisStatus, Outcome, OutcomeStatus, SynthesizedReport, TagView};
pub use synthesizer::{
    Synthesizer, CROSS_CUTTING_INSIGHTS, GENERIC_RECOMMENDATION, NO_RESULTS_RECOMMENDATION,
};
