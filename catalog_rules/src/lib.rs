//! # Catalog Rules
//!
//! Data crate for the reminder engine. It holds the in-memory shape of a
//! parsed catalog or rules document, the game phases reminders are sorted
//! into, roster-derived unit selections, and the editable heuristics table
//! that drives classification and aggregation.
//!
//! Nothing in here resolves cross-document references; that is the job of
//! `reminder_core`.

pub mod config;
pub mod document;
pub mod error;
pub mod phases;
pub mod roster;

pub use config::*;
pub use document::*;
pub use error::*;
pub use phases::*;
pub use roster::*;
