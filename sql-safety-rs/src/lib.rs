//! # SQL Safety
//!
//! Shared read-only gate for SQL submitted to the query advisor. The request
//! entry point and the schema advisor both call [`is_read_only`] so the two
//! gates cannot drift apart.

pub mod read_only;

pub use read_only::{
    check_read_only, is_read_only, SafetyViolation, ALLOWED_LEADING_TOKENS, FORBIDDEN_KEYWORDS,
};
