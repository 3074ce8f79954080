// sql-safety-rs/src/read_only.rs
// Read-only gate for SQL text submitted for analysis.
// This is a denylist, not a parser: a forbidden keyword anywhere in the text
// rejects the statement, including keywords inside string literals and
// comments (e.g. `SELECT 'update' AS label`). Over-blocking is accepted.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Keywords that mark a statement as data- or schema-modifying
pub const FORBIDDEN_KEYWORDS: [&str; 8] = [
    "insert", "update", "delete", "drop", "truncate", "alter", "create", "replace",
];

/// Statements allowed to lead a read-only query
pub const ALLOWED_LEADING_TOKENS: [&str; 2] = ["select", "with"];

lazy_static! {
    static ref FORBIDDEN_PATTERN: Regex = Regex::new(&format!(
        r"\b({})\b",
        FORBIDDEN_KEYWORDS.join("|")
    ))
    .expect("forbidden keyword pattern is valid");

    static ref LEADING_TOKEN: Regex =
        Regex::new(r"^\s*([a-z_][a-z0-9_]*)").expect("leading token pattern is valid");
}

/// Why a statement was refused by the read-only gate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SafetyViolation {
    #[error("SQL query cannot be empty")]
    Empty,

    #[error("query contains forbidden keyword '{keyword}'")]
    ForbiddenKeyword { keyword: String },

    #[error("only SELECT/CTE queries are allowed, found '{found}'")]
    NotSelect { found: String },
}

/// Classify `sql` as read-only, reporting the first reason it is not.
///
/// The keyword scan runs before the leading-token check, so
/// `"delete from t"` reports the keyword rather than the statement type.
pub fn check_read_only(sql: &str) -> Result<(), SafetyViolation> {
    let lowered = sql.trim().to_lowercase();
    if lowered.is_empty() {
        return Err(SafetyViolation::Empty);
    }

    if let Some(m) = FORBIDDEN_PATTERN.find(&lowered) {
        tracing::debug!(keyword = m.as_str(), "read-only gate matched forbidden keyword");
        return Err(SafetyViolation::ForbiddenKeyword {
            keyword: m.as_str().to_string(),
        });
    }

    let leading = LEADING_TOKEN
        .captures(&lowered)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or("");

    if ALLOWED_LEADING_TOKENS.contains(&leading) {
        Ok(())
    } else {
        let found = if leading.is_empty() {
            lowered.chars().take(16).collect()
        } else {
            leading.to_string()
        };
        Err(SafetyViolation::NotSelect { found })
    }
}

/// True when `sql` passes the read-only gate
pub fn is_read_only(sql: &str) -> bool {
    check_read_only(sql).is_ok()
}
