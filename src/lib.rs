//! Runtime core for the `aictl` CLI.
//!
//! The interesting pieces are the provider-agnostic AI client ([`ai`]) and
//! the lazy, concurrency-safe client registry ([`registry`]) that every
//! external integration is reached through. The rest is CLI glue:
//! configuration, logging, output rendering, and command handlers.

/// Provider-agnostic AI client and its backend adapters.
pub mod ai;
/// Non-AI service integrations.
pub mod clients;
/// Command handlers.
pub mod commands;
/// Application configuration.
pub mod config;
/// Per-invocation application context.
pub mod context;
/// Log subscriber setup.
pub mod logging;
/// Output formatting.
pub mod output;
/// Lazy client cells.
pub mod registry;
