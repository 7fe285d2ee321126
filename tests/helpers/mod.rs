//! Shared fixtures and offset helpers for the integration tests.

pub mod source_fixtures;
