// advisor-agents-rs/src/advisors/optimizer.rs
//
// Query Optimizer: rewrites the query and lists index, column and engine
// advice from schema, EXPLAIN plan and sample rows.

use crate::agent::{Advisor, AgentError, Sampling};
use crate::context::{QueryContext, Shape};
use crate::fields::{FieldDefault, FieldSpec};
use crate::record::AgentKind;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "optimized_query",
        FieldDefault::OriginalQuery,
        FieldDefault::OriginalQuery,
    ),
    FieldSpec::new(
        "why_faster",
        FieldDefault::Text("Performance optimization analysis complete"),
        FieldDefault::Text(""),
    ),
    FieldSpec::new(
        "recommendations",
        FieldDefault::List(&[
            "Add indexes on JOIN and WHERE columns",
            "Consider using explicit columns instead of SELECT *",
            "Implement covering indexes for better query efficiency",
        ]),
        FieldDefault::List(&[]),
    ),
    FieldSpec::new(
        "warnings",
        FieldDefault::List(&[]),
        FieldDefault::List(&["Unable to optimize query"]),
    ),
    FieldSpec::new(
        "estimated_impact",
        FieldDefault::Text("medium"),
        FieldDefault::Text("unknown"),
    ),
    FieldSpec::new(
        "engine_advice",
        FieldDefault::List(&["Use InnoDB for better concurrent access"]),
        FieldDefault::List(&[]),
    ),
    FieldSpec::new(
        "materialization_advice",
        FieldDefault::List(&[]),
        FieldDefault::List(&[]),
    ),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOptimizer;

impl Advisor for QueryOptimizer {
    fn kind(&self) -> AgentKind {
        AgentKind::QueryOptimizer
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn sampling(&self) -> Sampling {
        Sampling::new(2000, 0.3)
    }

    fn build_prompt(&self, ctx: &QueryContext) -> Result<String, AgentError> {
        let schema = ctx.schema.render(Shape::ObjectWithoutError, "Schema unavailable")?;
        let explain = ctx.explain.render(Shape::Array, "Explain plan unavailable")?;
        let samples = ctx.sample_rows.render(Shape::Object, "Sample rows unavailable")?;

        Ok(format!(
            r#"You are a SQL performance tuning specialist for {engine}.
Your only job is to make the query below run faster.

QUERY:
{sql}

SCHEMA:
{schema}

EXPLAIN PLAN:
{explain}

SAMPLE ROWS:
{samples}

Guidelines:
- Rewrite the query with at least one concrete improvement.
- Replace SELECT * with the columns actually needed.
- Propose indexes for JOIN, WHERE, ORDER BY and GROUP BY columns, composite where several columns filter together.
- Put the most selective predicates first and add LIMIT where results are unbounded.
- Prefer covering indexes that avoid table lookups.
- Call out full scans (type=ALL), filesort, temporary tables and cross joins.
- Base the impact estimate on the row counts and access types in the plan.

Reply with a single JSON object and nothing else:
{{
  "optimized_query": "SELECT ...",
  "why_faster": "short explanation",
  "recommendations": ["at least three specific actions"],
  "warnings": ["risk"],
  "estimated_impact": "low|medium|high",
  "engine_advice": ["{engine}-specific advice"],
  "materialization_advice": ["views, summary tables or caching"]
}}"#,
            engine = ctx.engine,
            sql = ctx.sql,
        ))
    }
}
