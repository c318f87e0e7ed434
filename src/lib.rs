//! Core library for the `mealbench` CLI.
//!
//! This crate provides the internal building blocks used by the binary: CLI
//! argument types, configuration parsing, the staged virtual-user scheduler,
//! request execution with response checks, metrics aggregation, and the
//! threshold-gated JSON summary. The primary user-facing interface is the
//! `mealbench` command-line application; library APIs may evolve as the CLI
//! grows.
pub mod app;
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod report;
pub mod scenario;
pub mod sched;
pub mod shutdown;
