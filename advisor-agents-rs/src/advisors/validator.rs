use crate::agent::{Advisor, AgentError, Sampling};
use crate::context::{QueryContext, Shape};
use crate::fields::{FieldDefault, FieldSpec};
use crate::record::AgentKind;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("issues", FieldDefault::List(&[]), FieldDefault::List(&[])),
    FieldSpec::new("confidence", FieldDefault::Text("low"), FieldDefault::Text("unknown")),
    FieldSpec::new(
        "reasoning",
        FieldDefault::Text("Validation complete"),
        FieldDefault::Text(""),
    ),
];

/// Looks for data-quality problems in sample result rows
#[derive(Debug, Clone, Copy, Default)]
pub struct DataValidator;

impl Advisor for DataValidator {
    fn kind(&self) -> AgentKind {
        AgentKind::DataValidator
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn sampling(&self) -> Sampling {
        Sampling::new(600, 0.3)
    }

    fn build_prompt(&self, ctx: &QueryContext) -> Result<String, AgentError> {
        let samples = ctx.sample_rows.render(Shape::Object, "No sample data")?;

        Ok(format!(
            r#"You check {engine} query results for data-quality problems.

QUERY:
{sql}

SAMPLE ROWS:
{samples}

Look for missing values, wrong types, outliers, DECIMAL precision loss, malformed or future dates, unexpected ENUM values and NULLs in columns that should not have them.

Reply with a single JSON object and nothing else. With no issues, return an empty list and high confidence:
{{
  "issues": ["issue"],
  "confidence": "high|medium|low",
  "reasoning": "summary"
}}"#,
            engine = ctx.engine,
            sql = ctx.sql,
        ))
    }
}
