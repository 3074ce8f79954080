//! Panel + assembler flow against a stub gateway

mod common;

use std::sync::Arc;

use advisor_agents::{assemble, AdvisoryPanel, AgentKind, AgentStatus, ContextData, QueryContext};
use common::StubGateway;
use llm_gateway::FailureKind;
use serde_json::json;

fn context(sql: &str) -> Arc<QueryContext> {
    Arc::new(
        QueryContext::new(sql)
            .with_explain(ContextData::Available(json!([{"table": "users", "type": "ALL"}])))
            .with_sample_rows(ContextData::unavailable("sandbox disabled")),
    )
}

fn routed_gateway() -> StubGateway {
    StubGateway::routed(|owner| {
        let reply = match owner {
            Some(AgentKind::QueryOptimizer) => {
                r#"```json
{"optimized_query": "SELECT id, email FROM users WHERE active = 1", "why_faster": "narrower projection", "recommendations": ["a", "b", "c", "d"], "warnings": [], "estimated_impact": "high", "engine_advice": [], "materialization_advice": []}
```"#
            }
            Some(AgentKind::CostAdvisor) => r#"{"estimated_cost": "high", "cost_saving_tips": ["add index on active"], "warnings": []}"#,
            Some(AgentKind::SchemaAdvisor) => r#"Sure. {"recommended_indexes": ["CREATE INDEX idx_active ON users(active)"], "schema_changes": [], "warnings": []}"#,
            Some(AgentKind::DataValidator) => r#"{"issues": [], "confidence": "medium", "reasoning": "no rows"}"#,
            None => r#"{"safe_preview": "SELECT * FROM users", "explanation": "writes"}"#,
        };
        reply.to_string()
    })
}

#[tokio::test]
async fn test_rate_limited_gateway_still_produces_response() {
    let gateway = Arc::new(StubGateway::failing(
        FailureKind::RateLimited,
        "Rate limited - quota exceeded",
    ));
    let panel = AdvisoryPanel::new(gateway.clone());
    let ctx = context("SELECT * FROM users");

    let report = panel.consult(Arc::clone(&ctx)).await;
    assert_eq!(report.error_count(), 4);
    assert_eq!(gateway.calls(), 4);

    let response = serde_json::to_value(assemble("shop", &ctx, &report)).unwrap();
    assert_eq!(response["status"], "success");
    assert_eq!(response["summary"], json!({"status": "error", "message": "Rate limited - quota exceeded"}));
    for section in ["optimization", "cost_analysis", "schema_improvements", "data_quality"] {
        assert_eq!(response[section]["status"], "error", "section {}", section);
        assert_eq!(response[section]["error"], "Rate limited - quota exceeded");
    }
}

#[tokio::test]
async fn test_successful_panel_assembles_every_section() {
    let gateway = Arc::new(routed_gateway());
    let panel = AdvisoryPanel::new(gateway.clone());
    let ctx = context("SELECT * FROM users WHERE active = 1");

    let report = panel.consult(Arc::clone(&ctx)).await;
    assert_eq!(report.error_count(), 0);
    assert_eq!(report.optimizer.agent, AgentKind::QueryOptimizer);
    assert_eq!(report.validator.agent, AgentKind::DataValidator);

    let response = serde_json::to_value(assemble("shop", &ctx, &report)).unwrap();
    assert_eq!(response["database"], "shop");
    assert_eq!(response["original_query"], "SELECT * FROM users WHERE active = 1");
    assert_eq!(response["summary"]["performance_impact"], "high");
    assert_eq!(response["summary"]["key_recommendations"], json!(["a", "b", "c"]));
    assert_eq!(response["optimization"]["recommendations"], json!(["a", "b", "c", "d"]));
    assert_eq!(response["cost_analysis"]["estimated_cost"], "high");
    assert_eq!(
        response["schema_improvements"]["recommended_indexes"],
        json!(["CREATE INDEX idx_active ON users(active)"])
    );
    assert_eq!(response["data_quality"]["confidence"], "medium");
    assert_eq!(
        response["technical_details"],
        json!({
            "explain_plan": [{"table": "users", "type": "ALL"}],
            "sample_rows": {"error": "sandbox disabled"},
            "schema_context": {"error": "schema not collected"}
        })
    );
}

#[tokio::test]
async fn test_unsafe_query_reaches_schema_section_as_unsafe() {
    let gateway = Arc::new(routed_gateway());
    let panel = AdvisoryPanel::new(gateway.clone());
    let ctx = context("UPDATE users SET active = 0");

    let report = panel.consult(Arc::clone(&ctx)).await;
    assert_eq!(report.schema.status, AgentStatus::Unsafe);
    // The unsafe branch replaces the schema call rather than adding one.
    assert_eq!(gateway.calls(), 4);

    let response = serde_json::to_value(assemble("shop", &ctx, &report)).unwrap();
    assert_eq!(
        response["schema_improvements"],
        json!({
            "status": "unsafe",
            "message": "Query contains unsafe operations",
            "safe_query": "SELECT * FROM users",
            "reasoning": "writes"
        })
    );
}

#[tokio::test]
async fn test_identical_runs_are_byte_identical() {
    let ctx = context("SELECT * FROM users WHERE active = 1");

    let first = AdvisoryPanel::new(Arc::new(routed_gateway()))
        .consult(Arc::clone(&ctx))
        .await;
    let second = AdvisoryPanel::new(Arc::new(routed_gateway()))
        .consult(Arc::clone(&ctx))
        .await;

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&assemble("shop", &ctx, &first)).unwrap(),
        serde_json::to_string(&assemble("shop", &ctx, &second)).unwrap()
    );
}
