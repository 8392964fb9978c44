//! Crate-level test suites
//!
//! - `mocks`: backend doubles and lesson fixtures
//! - `unit`: provider tests against wiremock servers and pipeline scenarios
//! - `property`: proptest invariants for classification and composition
