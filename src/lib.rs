//! athena-query - run SQL against AWS Athena and get back a normalized
//! tabular result.
//!
//! This library exposes the core modules for the binary and for
//! integration tests.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod query;
