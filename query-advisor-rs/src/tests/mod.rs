//! In-process route tests
