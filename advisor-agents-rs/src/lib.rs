//! # Advisor Agents
//!
//! LLM-backed advisors for read-only SQL queries.
//!
//! - [`advisors`]: query optimizer, cost advisor, schema advisor and data
//!   validator, each a prompt template plus a field table
//! - [`agent::run_advisor`]: the shared prompt / call / normalize cycle that
//!   turns every outcome into an [`AgentRecord`]
//! - [`AdvisoryPanel`]: runs all four concurrently over one gateway
//! - [`assembler::assemble`]: projects the records into an [`AnalysisResponse`]

pub mod advisors;
pub mod agent;
pub mod assembler;
pub mod context;
pub mod fields;
pub mod panel;
pub mod record;

pub use agent::{run_advisor, Advisor, AgentError, Diversion, Sampling};
pub use assembler::{assemble, AnalysisResponse};
pub use context::{ContextData, QueryContext, Shape};
pub use fields::{FieldDefault, FieldSpec};
pub use panel::{AdvisoryPanel, PanelReport};
pub use record::{AgentKind, AgentRecord, AgentStatus};
