//! Integration test entry point
//!
//! Compiles all integration test files as one binary so they share the
//! common fixtures and build once.

#[path = "../common/mod.rs"]
mod common;

mod build_lineage;
mod inheritance;
mod repositories;
mod validation;
