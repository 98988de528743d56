//! Renderer module - trait-based format dispatch.
//!
//! Renderers only format what the aggregator produced. They never classify
//! or deduplicate; they walk the buckets in canonical phase order.

pub mod json;
pub mod paged;
pub mod text;

pub use json::JsonRenderer;
pub use paged::PagedRenderer;
pub use text::TextRenderer;

use catalog_rules::{Phase, RenderConfig, ReminderConfig};

use crate::aggregator::ReminderSet;
use crate::error::RenderError;
use crate::report::RosterReport;

/// Formats aggregated reminders for one output sink.
pub trait Renderer {
    fn render_unit(&self, set: &ReminderSet) -> Result<String, RenderError>;

    fn render_roster(&self, report: &RosterReport) -> Result<String, RenderError>;

    /// The indexed unit names, already sorted.
    fn render_unit_list(&self, names: &[&str]) -> Result<String, RenderError>;

    fn format_name(&self) -> &str;
}

/// Layout settings together with the markup stripped from descriptions.
/// The markers are the classifier's, so both sides agree on what is markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub render: RenderConfig,
    pub emphasis_markers: Vec<String>,
}

impl Style {
    pub fn new(config: &ReminderConfig) -> Self {
        Self {
            render: config.render.clone(),
            emphasis_markers: config.classifier.emphasis_markers.clone(),
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(&ReminderConfig::default())
    }
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str, config: &ReminderConfig) -> Result<Box<dyn Renderer>, RenderError> {
    match format.trim().to_lowercase().as_str() {
        "text" | "txt" => Ok(Box::new(TextRenderer::new(config))),
        "paged" | "page" => Ok(Box::new(PagedRenderer::new(config))),
        "json" => Ok(Box::new(JsonRenderer)),
        _ => Err(RenderError::UnknownFormat(format.to_string())),
    }
}

/// Strip emphasis markup and collapse newlines and runs of spaces.
pub fn clean_description(text: &str, markers: &[String]) -> String {
    let mut stripped = text.to_string();
    for marker in markers.iter().filter(|m| !m.is_empty()) {
        stripped = stripped.replace(marker.as_str(), "");
    }
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut to at most `max` characters, ending in "..." when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Display length for a description in this bucket.
pub fn display_len(phase: Phase, config: &RenderConfig) -> usize {
    if phase.is_turn_phase() {
        config.phase_description_len
    } else {
        config.passive_description_len
    }
}

/// Whole numbers print without a decimal part.
pub fn format_cost(cost: f64) -> String {
    if cost.fract() == 0.0 {
        format!("{:.0}", cost)
    } else {
        format!("{}", cost)
    }
}
