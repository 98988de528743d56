//! Plain text renderer - the terminal report.
//!
//! The layout is built as a list of lines so the paged renderer can reuse it
//! with ASCII markers before wrapping and paginating.

use catalog_rules::{Phase, Provenance, ReminderConfig};

use super::{clean_description, display_len, format_cost, truncate, Renderer, Style};
use crate::aggregator::{Reminder, ReminderSet};
use crate::error::RenderError;
use crate::report::{RosterReport, UnitReport};

const WIDTH: usize = 70;

/// Markers drawn in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub heavy_rule: char,
    pub light_rule: char,
    pub phase: &'static str,
    pub unit: &'static str,
    pub army: &'static str,
    pub detachment: &'static str,
    pub passive: &'static str,
    pub roster_unit: &'static str,
    pub composition: &'static str,
    pub warning: &'static str,
}

impl Glyphs {
    pub const EMOJI: Glyphs = Glyphs {
        heavy_rule: '=',
        light_rule: '─',
        phase: "📍",
        unit: "⚡",
        army: "🔹",
        detachment: "🔷",
        passive: "📌",
        roster_unit: "📋",
        composition: "└─",
        warning: "⚠",
    };

    pub const ASCII: Glyphs = Glyphs {
        heavy_rule: '=',
        light_rule: '-',
        phase: "#",
        unit: "*",
        army: "+",
        detachment: "~",
        passive: "-",
        roster_unit: ">",
        composition: "`-",
        warning: "!",
    };

    pub fn icon(&self, source: Provenance) -> &'static str {
        match source {
            Provenance::Unit => self.unit,
            Provenance::ArmyRule | Provenance::ArmyAbility => self.army,
            Provenance::Detachment => self.detachment,
        }
    }

    fn heavy(&self) -> String {
        self.heavy_rule.to_string().repeat(WIDTH)
    }

    fn light(&self) -> String {
        self.light_rule.to_string().repeat(WIDTH)
    }
}

fn phase_heading(glyphs: &Glyphs, phase: Phase) -> String {
    format!("{} {}", glyphs.phase, phase.label().to_uppercase())
}

fn shown(reminder: &Reminder, style: &Style) -> String {
    truncate(
        &clean_description(&reminder.description, &style.emphasis_markers),
        display_len(reminder.phase, &style.render),
    )
}

/// Lines of the single-unit report.
pub fn unit_lines(set: &ReminderSet, style: &Style, glyphs: &Glyphs) -> Vec<String> {
    let mut lines = vec![
        glyphs.heavy(),
        format!("UNIT REMINDERS: {}", set.unit_name),
        glyphs.heavy(),
        format!("Type: {} | Cost: {} pts", set.unit_kind, format_cost(set.cost)),
    ];

    if !set.stats.is_empty() {
        let stats: Vec<String> = set
            .stats
            .iter()
            .map(|c| format!("{}: {}", c.name, c.value))
            .collect();
        lines.push(format!("Stats: {}", stats.join(" | ")));
    }
    if let Some(detachment) = &set.detachment {
        lines.push(format!("Detachment: {}", detachment));
    }
    lines.push(String::new());
    lines.push(glyphs.heavy());

    if set.is_empty() {
        lines.push(String::new());
        lines.push("  No abilities to remember.".to_string());
        lines.push(String::new());
    }

    for (phase, bucket) in set.phases() {
        lines.push(String::new());
        lines.push(phase_heading(glyphs, phase));
        lines.push("-".repeat(WIDTH));
        for reminder in bucket {
            lines.push(format!("  {} {}", glyphs.icon(reminder.source), reminder.ability));
            lines.push(format!("     {}", shown(reminder, style)));
            lines.push(String::new());
        }
    }

    lines.push(glyphs.heavy());
    lines
}

/// Lines of the whole-roster report.
pub fn roster_lines(report: &RosterReport, style: &Style, glyphs: &Glyphs) -> Vec<String> {
    let mut lines = vec![glyphs.heavy(), "ROSTER REMINDERS".to_string()];
    if let Some(title) = &report.title {
        lines.push(format!("Roster: {}", title));
    }
    if let Some(army) = &report.army {
        lines.push(format!("Army: {}", army));
    }
    if let Some(detachment) = &report.detachment {
        lines.push(format!("DETACHMENT: {}", detachment));
    }
    lines.push(glyphs.heavy());
    lines.push(String::new());

    if !report.army_wide.is_empty() {
        lines.push("ARMY-WIDE RULES".to_string());
        lines.push(glyphs.light());
        lines.push(String::new());

        let mut passive = Vec::new();
        for (phase, bucket) in &report.army_wide {
            if !phase.is_turn_phase() {
                passive.extend(bucket.iter().map(|r| r.ability.as_str()));
                continue;
            }
            lines.push(format!("  {}", phase_heading(glyphs, *phase)));
            for reminder in bucket {
                lines.push(format!(
                    "    {} {}: {}",
                    glyphs.icon(reminder.source),
                    reminder.ability,
                    shown(reminder, style)
                ));
            }
            lines.push(String::new());
        }
        if !passive.is_empty() {
            lines.push(format!("  {} Passive: {}", glyphs.passive, passive.join(", ")));
            lines.push(String::new());
        }

        lines.push(glyphs.heavy());
        lines.push(String::new());
    }

    for unit in &report.units {
        unit_section(&mut lines, unit, style, glyphs);
    }

    lines.push(String::new());
    lines.push(glyphs.heavy());

    if !report.unresolved.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "{} Not found in catalog: {}",
            glyphs.warning,
            report.unresolved.join(", ")
        ));
    }

    lines
}

fn unit_section(lines: &mut Vec<String>, unit: &UnitReport, style: &Style, glyphs: &Glyphs) {
    lines.push(String::new());
    lines.push(glyphs.light());
    if unit.count > 1 {
        lines.push(format!("{} {}x {}", glyphs.roster_unit, unit.count, unit.label));
    } else {
        lines.push(format!("{} {}", glyphs.roster_unit, unit.label));
    }
    if !unit.composition.is_empty() {
        lines.push(format!("   {} {}", glyphs.composition, unit.composition.join(", ")));
    }
    lines.push(glyphs.light());

    let mut has_phases = false;
    for (phase, bucket) in unit.turn_phases() {
        has_phases = true;
        lines.push(String::new());
        lines.push(format!("  {}", phase_heading(glyphs, phase)));
        for reminder in bucket {
            lines.push(format!(
                "    {} {}: {}",
                glyphs.unit,
                reminder.ability,
                shown(reminder, style)
            ));
        }
    }

    let passive = unit.passive();
    if !passive.is_empty() {
        if has_phases {
            lines.push(String::new());
        }
        lines.push(format!("  {} Passive: {}", glyphs.passive, passive.join(", ")));
    }

    if unit.is_empty() {
        lines.push("  No unit-specific abilities".to_string());
    }
}

/// Lines of the unit listing.
pub fn list_lines(names: &[&str]) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("Available Units ({}):", names.len()),
        "-".repeat(50),
    ];
    for (i, name) in names.iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, name));
    }
    lines
}

fn join(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Terminal report with emoji markers.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    style: Style,
}

impl TextRenderer {
    pub fn new(config: &ReminderConfig) -> Self {
        Self {
            style: Style::new(config),
        }
    }
}

impl Renderer for TextRenderer {
    fn render_unit(&self, set: &ReminderSet) -> Result<String, RenderError> {
        Ok(join(unit_lines(set, &self.style, &Glyphs::EMOJI)))
    }

    fn render_roster(&self, report: &RosterReport) -> Result<String, RenderError> {
        Ok(join(roster_lines(report, &self.style, &Glyphs::EMOJI)))
    }

    fn render_unit_list(&self, names: &[&str]) -> Result<String, RenderError> {
        Ok(join(list_lines(names)))
    }

    fn format_name(&self) -> &str {
        "text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_rules::{Characteristic, EntryKind};
    use std::collections::BTreeMap;

    fn set() -> ReminderSet {
        let mut reminders = BTreeMap::new();
        reminders.insert(
            Phase::Shooting,
            vec![Reminder::new(
                "Bolter Discipline",
                "Each time this unit is **selected to shoot**,\nre-roll 1s.",
                Phase::Shooting,
                Provenance::Unit,
            )],
        );
        reminders.insert(
            Phase::Command,
            vec![Reminder::new("Oath of Moment", "x".repeat(200), Phase::Command, Provenance::ArmyRule)],
        );
        ReminderSet {
            unit_name: "Intercessor Squad".to_string(),
            unit_kind: EntryKind::Unit,
            cost: 80.0,
            stats: vec![Characteristic::new("M", "6\""), Characteristic::new("T", "4")],
            detachment: Some("Gladius Task Force".to_string()),
            reminders,
        }
    }

    #[test]
    fn test_unit_report_layout() {
        let out = TextRenderer::default().render_unit(&set()).unwrap();
        assert!(out.contains("UNIT REMINDERS: Intercessor Squad"));
        assert!(out.contains("Type: unit | Cost: 80 pts"));
        assert!(out.contains("Stats: M: 6\" | T: 4"));
        assert!(out.contains("Detachment: Gladius Task Force"));
        assert!(out.contains("  ⚡ Bolter Discipline"));
        assert!(out.contains("     Each time this unit is selected to shoot, re-roll 1s."));
        assert!(out.contains("  🔹 Oath of Moment"));
    }

    #[test]
    fn test_phases_in_canonical_order() {
        let out = TextRenderer::default().render_unit(&set()).unwrap();
        let command = out.find("📍 COMMAND PHASE").unwrap();
        let shooting = out.find("📍 SHOOTING PHASE").unwrap();
        assert!(command < shooting);
        assert!(!out.contains("FIGHT PHASE"));
    }

    #[test]
    fn test_descriptions_truncated() {
        let out = TextRenderer::default().render_unit(&set()).unwrap();
        let expected = format!("     {}...", "x".repeat(147));
        assert!(out.lines().any(|l| l == expected));
    }

    #[test]
    fn test_configured_emphasis_markers_stripped() {
        let mut config = ReminderConfig::default();
        config.classifier.emphasis_markers = vec!["__".to_string()];
        let mut custom = set();
        custom.reminders.insert(
            Phase::Fight,
            vec![Reminder::new("Shock Assault", "Add 1 to __Attacks__.", Phase::Fight, Provenance::Unit)],
        );

        let out = TextRenderer::new(&config).render_unit(&custom).unwrap();
        assert!(out.contains("     Add 1 to Attacks."));
        assert!(out.contains("**selected to shoot**"));
    }

    #[test]
    fn test_empty_unit() {
        let mut empty = set();
        empty.reminders.clear();
        let out = TextRenderer::default().render_unit(&empty).unwrap();
        assert!(out.contains("No abilities to remember."));
    }

    #[test]
    fn test_roster_layout() {
        let report = RosterReport {
            title: Some("Strike Force".to_string()),
            detachment: Some("Gladius Task Force".to_string()),
            army_wide: set().army_wide(),
            units: vec![UnitReport {
                label: "Telion's Boys".to_string(),
                unit_name: "Intercessor Squad".to_string(),
                count: 2,
                composition: vec!["Sergeant".to_string(), "4x Intercessor".to_string()],
                cost: 80.0,
                reminders: set().unit_specific(),
            }],
            unresolved: vec!["Ghost Squad".to_string()],
            ..Default::default()
        };
        let out = TextRenderer::default().render_roster(&report).unwrap();
        assert!(out.contains("DETACHMENT: Gladius Task Force"));
        assert!(out.contains("ARMY-WIDE RULES"));
        assert!(out.contains("    🔹 Oath of Moment: xxx"));
        assert!(out.contains("📋 2x Telion's Boys"));
        assert!(out.contains("   └─ Sergeant, 4x Intercessor"));
        assert!(out.contains("    ⚡ Bolter Discipline: Each time"));
        assert!(out.contains("⚠ Not found in catalog: Ghost Squad"));
    }

    #[test]
    fn test_unit_list() {
        let out = TextRenderer::default()
            .render_unit_list(&["Captain", "Intercessor Squad"])
            .unwrap();
        assert!(out.contains("Available Units (2):"));
        assert!(out.contains("  2. Intercessor Squad"));
    }
}
