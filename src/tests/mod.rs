//! Consolidated test modules.
//!
//! End-to-end tests that drive the production HTTP stack against a mock
//! directory server.
