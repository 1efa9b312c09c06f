//! Text report and JSON export for the message-size analyzer.
//!
//! Every section is rendered into plain lines from already computed
//! aggregates; nothing here mutates analysis state.

pub mod export;
pub mod layout;
pub mod ranking;
pub mod report;
pub mod summary;
pub mod table;

pub use msgsize_core as core;
pub use report::render_report;
