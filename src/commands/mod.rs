//! Command handlers. Each handler receives the per-invocation context by
//! reference and renders through its output formatter.

pub mod ai;
pub mod config;
pub mod github;
pub mod grafana;
