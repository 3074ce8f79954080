// advisor-agents-rs/src/panel.rs
//
// Advisory panel: runs the four advisors concurrently against one shared
// gateway and collects their records in a fixed order.

use std::sync::Arc;

use llm_gateway::LlmGateway;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::advisors::advisor_for;
use crate::agent::run_advisor;
use crate::context::QueryContext;
use crate::record::{AgentKind, AgentRecord};

/// One record per advisor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelReport {
    pub optimizer: AgentRecord,
    pub cost: AgentRecord,
    pub schema: AgentRecord,
    pub validator: AgentRecord,
}

impl PanelReport {
    pub fn records(&self) -> [&AgentRecord; 4] {
        [&self.optimizer, &self.cost, &self.schema, &self.validator]
    }

    pub fn error_count(&self) -> usize {
        self.records().iter().filter(|r| r.is_error()).count()
    }
}

#[derive(Clone)]
pub struct AdvisoryPanel {
    gateway: Arc<dyn LlmGateway>,
}

impl AdvisoryPanel {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self { gateway }
    }

    fn spawn(&self, kind: AgentKind, ctx: &Arc<QueryContext>) -> JoinHandle<AgentRecord> {
        let gateway = Arc::clone(&self.gateway);
        let ctx = Arc::clone(ctx);
        let span = tracing::info_span!("advisor", agent = %kind);

        tokio::spawn(
            async move {
                let advisor = advisor_for(kind);
                let record = run_advisor(advisor.as_ref(), gateway.as_ref(), &ctx).await;
                tracing::info!(status = ?record.status, "advisor finished");
                record
            }
            .instrument(span),
        )
    }

    /// Run every advisor and wait for all of them. Never fails: a panicked
    /// or cancelled task becomes an error record for its slot.
    pub async fn consult(&self, ctx: Arc<QueryContext>) -> PanelReport {
        let optimizer = self.spawn(AgentKind::QueryOptimizer, &ctx);
        let cost = self.spawn(AgentKind::CostAdvisor, &ctx);
        let schema = self.spawn(AgentKind::SchemaAdvisor, &ctx);
        let validator = self.spawn(AgentKind::DataValidator, &ctx);

        let (optimizer, cost, schema, validator) = tokio::join!(optimizer, cost, schema, validator);

        let report = PanelReport {
            optimizer: settle(AgentKind::QueryOptimizer, &ctx, optimizer),
            cost: settle(AgentKind::CostAdvisor, &ctx, cost),
            schema: settle(AgentKind::SchemaAdvisor, &ctx, schema),
            validator: settle(AgentKind::DataValidator, &ctx, validator),
        };
        tracing::info!(errors = report.error_count(), "advisory panel complete");
        report
    }
}

fn settle(
    kind: AgentKind,
    ctx: &QueryContext,
    joined: Result<AgentRecord, tokio::task::JoinError>,
) -> AgentRecord {
    match joined {
        Ok(record) => record,
        Err(err) => {
            tracing::error!(agent = %kind, "advisor task did not complete: {}", err);
            let message = if err.is_panic() {
                format!("{} panicked", kind)
            } else {
                format!("{} was cancelled", kind)
            };
            AgentRecord::failed(kind, &ctx.sql, advisor_for(kind).fields(), &message)
        }
    }
}
