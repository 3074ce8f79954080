//! Response assembler.
//!
//! Pure projection of the panel's four records and the raw context into the
//! caller-facing [`AnalysisResponse`]. Each section is tagged by `status`;
//! records with status `unknown` render like successes with defaults.

use serde::Serialize;
use serde_json::Value;

use crate::advisors::schema::UNSAFE_REASONING;
use crate::context::QueryContext;
use crate::panel::PanelReport;
use crate::record::{AgentRecord, AgentStatus};

const KEY_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Summary {
    Success {
        performance_impact: String,
        optimization_reason: String,
        key_recommendations: Vec<Value>,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OptimizationSection {
    Success {
        optimized_query: String,
        performance_impact: String,
        why_faster: String,
        recommendations: Vec<Value>,
        warnings: Vec<Value>,
        engine_advice: Vec<Value>,
        materialization_advice: Vec<Value>,
    },
    Error {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CostSection {
    Success {
        estimated_cost: String,
        cost_saving_tips: Vec<Value>,
        warnings: Vec<Value>,
    },
    Error {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SchemaSection {
    Success {
        recommended_indexes: Vec<Value>,
        schema_changes: Vec<Value>,
        warnings: Vec<Value>,
    },
    Unsafe {
        message: String,
        safe_query: String,
        reasoning: String,
    },
    Error {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DataQualitySection {
    Success {
        issues: Vec<Value>,
        confidence: String,
        reasoning: String,
    },
    Error {
        error: String,
    },
}

/// Raw context echoed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalDetails {
    pub explain_plan: Value,
    pub sample_rows: Value,
    pub schema_context: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResponse {
    pub status: &'static str,
    pub database: String,
    pub original_query: String,
    pub summary: Summary,
    pub optimization: OptimizationSection,
    pub cost_analysis: CostSection,
    pub schema_improvements: SchemaSection,
    pub data_quality: DataQualitySection,
    pub technical_details: TechnicalDetails,
}

fn error_text(record: &AgentRecord, default: &str) -> String {
    record.error_message().unwrap_or(default).to_string()
}

/// Summary comes from the optimizer alone
pub fn summarize(optimizer: &AgentRecord) -> Summary {
    if optimizer.is_error() {
        return Summary::Error {
            message: error_text(optimizer, "Unknown error"),
        };
    }
    let mut key_recommendations = optimizer.detail_list("recommendations");
    key_recommendations.truncate(KEY_RECOMMENDATIONS);
    Summary::Success {
        performance_impact: optimizer.detail_str("estimated_impact", "unknown"),
        optimization_reason: optimizer.detail_str("why_faster", "Analysis in progress"),
        key_recommendations,
    }
}

pub fn optimization_section(record: &AgentRecord) -> OptimizationSection {
    if record.is_error() {
        return OptimizationSection::Error {
            error: error_text(record, "Unknown error"),
        };
    }
    OptimizationSection::Success {
        optimized_query: record.detail_str("optimized_query", "No optimization available"),
        performance_impact: record.detail_str("estimated_impact", "unknown"),
        why_faster: record.detail_str("why_faster", ""),
        recommendations: record.detail_list("recommendations"),
        warnings: record.detail_list("warnings"),
        engine_advice: record.detail_list("engine_advice"),
        materialization_advice: record.detail_list("materialization_advice"),
    }
}

pub fn cost_section(record: &AgentRecord) -> CostSection {
    if record.is_error() {
        return CostSection::Error {
            error: error_text(record, "Unable to estimate cost"),
        };
    }
    CostSection::Success {
        estimated_cost: record.detail_str("estimated_cost", "unknown"),
        cost_saving_tips: record.detail_list("cost_saving_tips"),
        warnings: record.detail_list("warnings"),
    }
}

pub fn schema_section(record: &AgentRecord) -> SchemaSection {
    match record.status {
        AgentStatus::Error => SchemaSection::Error {
            error: error_text(record, "Unable to analyze schema"),
        },
        AgentStatus::Unsafe => SchemaSection::Unsafe {
            message: UNSAFE_REASONING.to_string(),
            safe_query: record.detail_str("safe_query", ""),
            reasoning: record.detail_str("reasoning", ""),
        },
        AgentStatus::Success | AgentStatus::Unknown => SchemaSection::Success {
            recommended_indexes: record.detail_list("recommended_indexes"),
            schema_changes: record.detail_list("schema_changes"),
            warnings: record.detail_list("warnings"),
        },
    }
}

pub fn data_quality_section(record: &AgentRecord) -> DataQualitySection {
    if record.is_error() {
        return DataQualitySection::Error {
            error: error_text(record, "Unable to validate data"),
        };
    }
    DataQualitySection::Success {
        issues: record.detail_list("issues"),
        confidence: record.detail_str("confidence", "unknown"),
        reasoning: record.detail_str("reasoning", ""),
    }
}

/// Build the full response. Never fails.
pub fn assemble(database: &str, ctx: &QueryContext, report: &PanelReport) -> AnalysisResponse {
    AnalysisResponse {
        status: "success",
        database: database.to_string(),
        original_query: ctx.sql.clone(),
        summary: summarize(&report.optimizer),
        optimization: optimization_section(&report.optimizer),
        cost_analysis: cost_section(&report.cost),
        schema_improvements: schema_section(&report.schema),
        data_quality: data_quality_section(&report.validator),
        technical_details: TechnicalDetails {
            explain_plan: ctx.explain.to_value(),
            sample_rows: ctx.sample_rows.to_value(),
            schema_context: ctx.schema.to_value(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AgentKind;
    use llm_gateway::JsonObject;
    use serde_json::json;

    fn record(kind: AgentKind, status: AgentStatus, details: Value) -> AgentRecord {
        let details: JsonObject = details.as_object().cloned().unwrap_or_default();
        AgentRecord::new(kind, status, "SELECT * FROM t", details)
    }

    #[test]
    fn test_summary_keeps_three_recommendations() {
        let optimizer = record(
            AgentKind::QueryOptimizer,
            AgentStatus::Success,
            json!({
                "estimated_impact": "high",
                "why_faster": "uses index",
                "recommendations": ["a", "b", "c", "d"]
            }),
        );
        let summary = serde_json::to_value(summarize(&optimizer)).unwrap();
        assert_eq!(
            summary,
            json!({
                "status": "success",
                "performance_impact": "high",
                "optimization_reason": "uses index",
                "key_recommendations": ["a", "b", "c"]
            })
        );
    }

    #[test]
    fn test_error_sections_use_record_message_or_default() {
        let failed = record(AgentKind::CostAdvisor, AgentStatus::Error, json!({"error": "Bad Request"}));
        assert_eq!(
            serde_json::to_value(cost_section(&failed)).unwrap(),
            json!({"status": "error", "error": "Bad Request"})
        );

        let bare = record(AgentKind::DataValidator, AgentStatus::Error, json!({}));
        assert_eq!(
            serde_json::to_value(data_quality_section(&bare)).unwrap(),
            json!({"status": "error", "error": "Unable to validate data"})
        );
        let bare_schema = record(AgentKind::SchemaAdvisor, AgentStatus::Error, json!({}));
        assert_eq!(
            schema_section(&bare_schema),
            SchemaSection::Error {
                error: "Unable to analyze schema".into()
            }
        );
        assert_eq!(
            summarize(&record(AgentKind::QueryOptimizer, AgentStatus::Error, json!({}))),
            Summary::Error {
                message: "Unknown error".into()
            }
        );
    }

    #[test]
    fn test_unsafe_schema_section() {
        let schema = record(
            AgentKind::SchemaAdvisor,
            AgentStatus::Unsafe,
            json!({"safe_query": "SELECT * FROM t WHERE id = 1", "reasoning": "DELETE modifies rows"}),
        );
        assert_eq!(
            serde_json::to_value(schema_section(&schema)).unwrap(),
            json!({
                "status": "unsafe",
                "message": "Query contains unsafe operations",
                "safe_query": "SELECT * FROM t WHERE id = 1",
                "reasoning": "DELETE modifies rows"
            })
        );
    }

    #[test]
    fn test_unknown_status_renders_as_success_with_defaults() {
        let optimizer = record(AgentKind::QueryOptimizer, AgentStatus::Unknown, json!({}));
        assert_eq!(
            optimization_section(&optimizer),
            OptimizationSection::Success {
                optimized_query: "No optimization available".into(),
                performance_impact: "unknown".into(),
                why_faster: String::new(),
                recommendations: vec![],
                warnings: vec![],
                engine_advice: vec![],
                materialization_advice: vec![],
            }
        );
        let validator = record(AgentKind::DataValidator, AgentStatus::Unknown, json!({}));
        assert_eq!(
            serde_json::to_value(data_quality_section(&validator)).unwrap(),
            json!({"status": "success", "issues": [], "confidence": "unknown", "reasoning": ""})
        );
    }
}
