//! The four advisors of the panel.
//!
//! Each one is a zero-sized type carrying its prompt template, field table
//! and sampling; the shared cycle lives in [`crate::agent::run_advisor`].

pub mod cost;
pub mod optimizer;
pub mod schema;
pub mod validator;

pub use cost::CostAdvisor;
pub use optimizer::QueryOptimizer;
pub use schema::SchemaAdvisor;
pub use validator::DataValidator;

use crate::agent::Advisor;
use crate::record::AgentKind;

/// Advisor implementation for a panel slot
pub fn advisor_for(kind: AgentKind) -> Box<dyn Advisor> {
    match kind {
        AgentKind::QueryOptimizer => Box::new(QueryOptimizer),
        AgentKind::CostAdvisor => Box::new(CostAdvisor),
        AgentKind::SchemaAdvisor => Box::new(SchemaAdvisor),
        AgentKind::DataValidator => Box::new(DataValidator),
    }
}
