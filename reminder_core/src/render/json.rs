//! JSON renderer - structured output for tooling integration.
//!
//! Serializes the aggregated results directly. Phase keys use their display
//! labels and every bucket keeps the aggregator's order.

use serde::Serialize;

use super::Renderer;
use crate::aggregator::ReminderSet;
use crate::error::RenderError;
use crate::report::RosterReport;

pub struct JsonRenderer;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    let mut out = serde_json::to_string_pretty(value).map_err(|e| RenderError::Serialize(e.to_string()))?;
    out.push('\n');
    Ok(out)
}

impl Renderer for JsonRenderer {
    fn render_unit(&self, set: &ReminderSet) -> Result<String, RenderError> {
        to_json(set)
    }

    fn render_roster(&self, report: &RosterReport) -> Result<String, RenderError> {
        to_json(report)
    }

    fn render_unit_list(&self, names: &[&str]) -> Result<String, RenderError> {
        to_json(names)
    }

    fn format_name(&self) -> &str {
        "json"
    }
}
