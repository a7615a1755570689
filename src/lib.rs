//! # Spectra
//!
//! Query routing and result synthesis over a fixed set of domain specialists.
//!
//! A free-text query is classified into the capabilities it needs, adapted
//! for each selected specialist, dispatched with per-specialist failure
//! isolation, and merged into one report with a qualitative status
//! (`complete`, `partial` or `failed`) that renders to Markdown.
//!
//! ## Features
//!
//! - **Fail-open classification**: a query no keyword recognizes goes to every specialist
//! - **Isolated dispatch**: errors, timeouts and panics become failure outcomes
//! - **Deterministic synthesis**: canonical ordering regardless of completion order
//! - **Pluggable details**: payloads render their own sections via [`DetailRenderer`]
//! - **Query log**: every query recorded with a unique, increasing id
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spectra::{Coordinator, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = RouterConfig::load(None)?;
//!     let coordinator = Coordinator::from_config(&config)?;
//!
//!     let response = coordinator.process("Risks of a crewed Mars mission").await?;
//!     println!("{}", response.document);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod history;
pub mod orchestrator;
pub mod registry;
pub mod render;
pub mod specialist;
pub mod specialists;
pub mod types;

#[cfg(feature = "server")]
pub mod http;

// Re-exports for convenience
pub use config::{DataConfig, DispatchConfig, HistoryConfig, RouterConfig, ServerConfig};
pub use error::{Error, Result};
pub use history::{Query, QueryLog};
pub use orchestrator::{
    AdaptedRequest, AnalysisStatus, Coordinator, DispatchMode, Dispatcher, IntentClassifier,
    Outcome, OutcomeStatus, QueryAdapter, QueryResponse, SynthesizedReport, Synthesizer, TagView,
};
pub use registry::{SpecialistProfile, SpecialistRegistry};
pub use render::{DetailBlock, DetailItem, DetailRenderer, DetailSection, ReportRenderer};
pub use specialist::{Payload, Specialist, SpecialistSet};
pub use specialists::builtin_specialists;
pub use types::{CapabilityTag, QueryId, TagSet};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::orchestrator::{Coordinator, QueryResponse};
    pub use crate::specialist::{Payload, Specialist, SpecialistSet};
    pub use crate::types::{CapabilityTag, TagSet};
    pub use crate::RouterConfig;
}
