//! Integration-style tests for the gateway client
//!
//! These run the real reqwest client against WireMock servers.
