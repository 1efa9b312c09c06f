//! Core domain model for the message-size analyzer.
//!
//! Holds the per-format statistics, the grouped aggregates, the payload
//! shape analyzer and the comparative ranker. Nothing in here touches the
//! filesystem; records are supplied by `msgsize-data` and consumed by
//! `msgsize-report`.

pub mod aggregate;
pub mod error;
pub mod export;
pub mod formatting;
pub mod models;
pub mod ranker;
pub mod settings;
pub mod shape;
pub mod stats;
pub mod summary;

pub use error::{AnalyzerError, Result};
