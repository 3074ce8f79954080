//! Single-advisor behavior against a stub gateway

mod common;

use advisor_agents::advisors::{CostAdvisor, DataValidator, QueryOptimizer, SchemaAdvisor};
use advisor_agents::{run_advisor, AgentKind, AgentStatus, ContextData, QueryContext};
use common::StubGateway;
use llm_gateway::{FailureKind, GatewayError};
use serde_json::json;

fn ctx(sql: &str) -> QueryContext {
    QueryContext::new(sql)
        .with_explain(ContextData::Available(json!([{"table": "orders", "type": "ALL", "rows": 120000}])))
        .with_sample_rows(ContextData::Available(json!({"rows": [{"id": 1, "total": "19.99"}]})))
        .with_schema(ContextData::Available(json!({"orders": {"columns": ["id", "total"]}})))
}

#[tokio::test]
async fn test_optimizer_missing_warnings_defaults_to_empty_list() {
    let gateway = StubGateway::replying(
        r#"```json
{"optimized_query": "SELECT id, total FROM orders", "why_faster": "fewer columns", "recommendations": ["index total"], "estimated_impact": "high"}
```"#,
    );

    let record = run_advisor(&QueryOptimizer, &gateway, &ctx("SELECT * FROM orders")).await;

    assert_eq!(record.status, AgentStatus::Success);
    assert_eq!(record.agent, AgentKind::QueryOptimizer);
    assert_eq!(record.details["warnings"], json!([]));
    assert_eq!(record.details["optimized_query"], json!("SELECT id, total FROM orders"));
    assert_eq!(record.details["engine_advice"], json!(["Use InnoDB for better concurrent access"]));
    assert_eq!(record.details["materialization_advice"], json!([]));
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn test_optimizer_defaults_when_model_returns_empty_object() {
    let gateway = StubGateway::replying("Here you go: {}");
    let record = run_advisor(&QueryOptimizer, &gateway, &ctx("SELECT * FROM orders")).await;

    assert_eq!(record.status, AgentStatus::Success);
    assert_eq!(record.details["optimized_query"], json!("SELECT * FROM orders"));
    assert_eq!(record.details["estimated_impact"], json!("medium"));
    assert_eq!(
        record.details["why_faster"],
        json!("Performance optimization analysis complete")
    );
    assert_eq!(record.details["recommendations"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_gateway_failure_yields_error_record_with_placeholders() {
    let gateway = StubGateway::failing(FailureKind::Unauthorized, "Unauthorized - Check your API key");
    let record = run_advisor(&QueryOptimizer, &gateway, &ctx("SELECT * FROM orders")).await;

    assert_eq!(record.status, AgentStatus::Error);
    assert_eq!(record.error_message(), Some("Unauthorized - Check your API key"));
    assert_eq!(record.details["optimized_query"], json!("SELECT * FROM orders"));
    assert_eq!(record.details["estimated_impact"], json!("unknown"));
    assert_eq!(record.details["warnings"], json!(["Unable to optimize query"]));
    assert_eq!(record.details["recommendations"], json!([]));
}

#[tokio::test]
async fn test_parse_failure_yields_error_record() {
    let gateway = StubGateway::new(|_| {
        Err(GatewayError::parse("Failed to parse JSON response", "I cannot help with that"))
    });
    let record = run_advisor(&CostAdvisor, &gateway, &ctx("SELECT 1")).await;

    assert_eq!(record.status, AgentStatus::Error);
    assert_eq!(record.error_message(), Some("Failed to parse JSON response"));
    assert_eq!(record.details["estimated_cost"], json!("unknown"));
    assert_eq!(record.details["cost_saving_tips"], json!([]));
}

#[tokio::test]
async fn test_model_error_key_is_not_a_failure() {
    let gateway = StubGateway::replying(r#"{"error": "none found", "issues": []}"#);
    let record = run_advisor(&DataValidator, &gateway, &ctx("SELECT 1")).await;

    assert_eq!(record.status, AgentStatus::Success);
    assert!(record.details.get("error").is_none());
    assert_eq!(record.details["confidence"], json!("low"));
    assert_eq!(record.details["reasoning"], json!("Validation complete"));
}

#[tokio::test]
async fn test_each_advisor_uses_its_sampling() {
    let gateway = StubGateway::replying("{}");
    let context = ctx("SELECT 1");

    run_advisor(&QueryOptimizer, &gateway, &context).await;
    run_advisor(&CostAdvisor, &gateway, &context).await;
    run_advisor(&SchemaAdvisor, &gateway, &context).await;
    run_advisor(&DataValidator, &gateway, &context).await;

    let budgets: Vec<_> = gateway
        .requests()
        .iter()
        .map(|r| (r.max_tokens(), r.temperature(), r.model().to_string()))
        .collect();
    assert_eq!(
        budgets,
        vec![
            (2000, 0.3, "stub-model".to_string()),
            (800, 0.3, "stub-model".to_string()),
            (1000, 0.3, "stub-model".to_string()),
            (600, 0.3, "stub-model".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_schema_advisor_unsafe_branch() {
    let gateway = StubGateway::replying(
        r#"{"safe_preview": "SELECT * FROM orders WHERE id = 4", "explanation": "DELETE removes rows"}"#,
    );
    let record = run_advisor(&SchemaAdvisor, &gateway, &ctx("DELETE FROM orders WHERE id = 4")).await;

    assert_eq!(record.status, AgentStatus::Unsafe);
    assert_eq!(record.details["safe_query"], json!("SELECT * FROM orders WHERE id = 4"));
    assert_eq!(record.details["reasoning"], json!("DELETE removes rows"));
    assert!(record.details.get("recommended_indexes").is_none());

    let requests = gateway.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].max_tokens(), 400);
    assert_eq!(requests[0].temperature(), 0.1);
    assert!(common::prompt_owner(requests[0].prompt()).is_none());
}

#[tokio::test]
async fn test_schema_advisor_unsafe_branch_survives_gateway_failure() {
    let gateway = StubGateway::failing(FailureKind::RateLimited, "Rate limited - quota exceeded");
    let record = run_advisor(&SchemaAdvisor, &gateway, &ctx("DROP TABLE orders")).await;

    assert_eq!(record.status, AgentStatus::Unsafe);
    assert_eq!(record.details["safe_query"], json!(""));
    assert_eq!(record.details["reasoning"], json!("Query contains unsafe operations"));
    assert!(record.error_message().is_none());
}

#[tokio::test]
async fn test_identical_inputs_serialize_identically() {
    let reply = r#"{"recommended_indexes": ["CREATE INDEX idx_total ON orders(total)"], "warnings": "wide rows", "schema_changes": []}"#;
    let context = ctx("SELECT total FROM orders");

    let first = run_advisor(&SchemaAdvisor, &StubGateway::replying(reply), &context).await;
    let second = run_advisor(&SchemaAdvisor, &StubGateway::replying(reply), &context).await;

    assert_eq!(first.details["warnings"], json!(["wide rows"]));
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
