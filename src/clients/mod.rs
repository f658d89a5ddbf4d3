//! Non-AI service integrations, one module per external system. All of them
//! are reached through the context's lazy cells.

/// GitHub REST client (source control).
pub mod github;
/// Grafana HTTP API client (observability).
pub mod grafana;
