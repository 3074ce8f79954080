use crate::agent::{Advisor, AgentError, Sampling};
use crate::context::{QueryContext, Shape};
use crate::fields::{FieldDefault, FieldSpec};
use crate::record::AgentKind;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "estimated_cost",
        FieldDefault::Text("medium"),
        FieldDefault::Text("unknown"),
    ),
    FieldSpec::new("cost_saving_tips", FieldDefault::List(&[]), FieldDefault::List(&[])),
    FieldSpec::new("warnings", FieldDefault::List(&[]), FieldDefault::List(&[])),
];

/// Estimates IO and runtime cost from the EXPLAIN plan
#[derive(Debug, Clone, Copy, Default)]
pub struct CostAdvisor;

impl Advisor for CostAdvisor {
    fn kind(&self) -> AgentKind {
        AgentKind::CostAdvisor
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn sampling(&self) -> Sampling {
        Sampling::new(800, 0.3)
    }

    fn build_prompt(&self, ctx: &QueryContext) -> Result<String, AgentError> {
        let explain = ctx.explain.render(Shape::Array, "No explain data")?;

        Ok(format!(
            r#"You estimate query cost for {engine}: IO volume and expected runtime.

QUERY:
{sql}

EXPLAIN PLAN:
{explain}

Judge the cost from the plan and suggest concrete ways to lower it. Consider buffer pool usage, index coverage, temporary tables and filesort.

Reply with a single JSON object and nothing else, even when the plan is missing:
{{
  "estimated_cost": "low|medium|high",
  "cost_saving_tips": ["tip"],
  "warnings": ["warning"]
}}"#,
            engine = ctx.engine,
            sql = ctx.sql,
        ))
    }
}
