//! # Reminder Core
//!
//! The engine that turns loaded catalog documents into phase-organized
//! "things to remember" for a unit or a whole roster.
//!
//! ## Core Components
//!
//! - **catalog_index**: merges a primary catalog, its imports and the base
//!   rules into one precedence-resolved lookup, and resolves unit names
//! - **classifier**: ordered keyword table mapping ability text to a phase
//! - **aggregator**: gathers, filters, classifies and deduplicates a unit's
//!   abilities into phase buckets
//! - **report**: batch reports for a whole roster
//! - **render**: text, paged and JSON output of the aggregated results
//!
//! ## Design Philosophy
//!
//! - **Immutable index**: built once per set of documents and passed to every
//!   query; switching armies builds a new index
//! - **Typed outcomes**: not-found and ambiguous lookups are values, not panics
//! - **Single bucket**: every reminder lands in exactly one phase

pub mod aggregator;
pub mod catalog_index;
pub mod classifier;
pub mod error;
pub mod render;
pub mod report;

pub use aggregator::*;
pub use catalog_index::*;
pub use classifier::*;
pub use error::*;
pub use render::{create_renderer, JsonRenderer, PagedRenderer, Renderer, Style, TextRenderer};
pub use report::*;
