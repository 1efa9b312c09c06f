//! Record supplier for the message-size analyzer.
//!
//! Discovers and reads the JSONL logs written by the message logger,
//! validates each line into a record, folds each file into its own
//! aggregate partition and merges the partitions for the report layer.

pub mod analysis;
pub mod reader;

pub use msgsize_core as core;
