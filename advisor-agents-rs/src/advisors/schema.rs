// advisor-agents-rs/src/advisors/schema.rs
//
// Schema Advisor: index, partitioning and column-type suggestions.
//
// Queries that fail the read-only gate never reach the main prompt. The
// advisor asks instead for a safe SELECT preview and an explanation, and
// reports `unsafe` whatever that call returns.

use crate::agent::{Advisor, AgentError, Diversion, Sampling};
use crate::context::{QueryContext, Shape};
use crate::fields::{FieldDefault, FieldSpec};
use crate::record::{AgentKind, AgentStatus};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("recommended_indexes", FieldDefault::List(&[]), FieldDefault::List(&[])),
    FieldSpec::new("schema_changes", FieldDefault::List(&[]), FieldDefault::List(&[])),
    FieldSpec::new("warnings", FieldDefault::List(&[]), FieldDefault::List(&[])),
];

pub const UNSAFE_REASONING: &str = "Query contains unsafe operations";

const UNSAFE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("safe_query", FieldDefault::Text(""), FieldDefault::Text(""))
        .from_source("safe_preview"),
    FieldSpec::new(
        "reasoning",
        FieldDefault::Text(UNSAFE_REASONING),
        FieldDefault::Text(UNSAFE_REASONING),
    )
    .from_source("explanation"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaAdvisor;

impl SchemaAdvisor {
    fn unsafe_prompt(sql: &str) -> String {
        format!(
            r#"This query modifies data or schema and will not be run: {sql}

Propose a read-only SELECT that previews the rows it would touch, and explain what makes the original unsafe.
Reply with a single JSON object and nothing else:
{{ "safe_preview": "SELECT ...", "explanation": "why the original is unsafe" }}"#
        )
    }
}

impl Advisor for SchemaAdvisor {
    fn kind(&self) -> AgentKind {
        AgentKind::SchemaAdvisor
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn sampling(&self) -> Sampling {
        Sampling::new(1000, 0.3)
    }

    fn build_prompt(&self, ctx: &QueryContext) -> Result<String, AgentError> {
        let schema = ctx.schema.render(Shape::ObjectWithoutError, "Schema unavailable")?;

        Ok(format!(
            r#"You advise on {engine} schema design for query performance.

QUERY:
{sql}

SCHEMA:
{schema}

Suggest indexes (BTREE on InnoDB), partitioning for large tables and better column types (VARCHAR vs TEXT, DECIMAL precision). Mention denormalization where joins are costly.

Reply with a single JSON object and nothing else; use empty arrays when nothing needs to change:
{{
  "recommended_indexes": ["CREATE INDEX idx_name ON table(col1, col2)"],
  "schema_changes": ["ALTER TABLE ..."],
  "warnings": ["issue"]
}}"#,
            engine = ctx.engine,
            sql = ctx.sql,
        ))
    }

    fn pre_check(&self, ctx: &QueryContext) -> Option<Diversion> {
        if sql_safety::is_read_only(&ctx.sql) {
            return None;
        }
        Some(Diversion {
            prompt: Self::unsafe_prompt(&ctx.sql),
            sampling: Sampling::new(400, 0.1),
            fields: UNSAFE_FIELDS,
            status: AgentStatus::Unsafe,
        })
    }
}
