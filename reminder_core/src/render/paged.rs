//! Paged renderer - a printable ASCII document.
//!
//! Reuses the text layout with ASCII markers, transliterates typographic
//! punctuation, wraps to the page width and splits into fixed-height pages.
//! Each page ends with a footer; pages are separated by a form feed.

use catalog_rules::ReminderConfig;

use super::text::{list_lines, roster_lines, unit_lines, Glyphs};
use super::{Renderer, Style};
use crate::aggregator::ReminderSet;
use crate::error::RenderError;
use crate::report::RosterReport;

pub const PAGE_BREAK: char = '\u{000C}';

/// Lines reserved at the bottom of every page: a blank line and the footer.
const FOOTER_LINES: usize = 2;

/// Replace non-ASCII punctuation with ASCII equivalents. Anything without
/// an equivalent becomes '?'.
pub fn to_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' | '\u{2500}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{2022}' | '\u{00B7}' => out.push('*'),
            '\u{00A0}' | '\u{2009}' | '\u{202F}' => out.push(' '),
            '\u{00D7}' => out.push('x'),
            c if c.is_ascii() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn width_of(text: &str) -> usize {
    text.chars().count()
}

/// Greedy word wrap. Continuation lines keep the original indent plus two.
pub fn wrap(line: &str, width: usize) -> Vec<String> {
    if width_of(line) <= width {
        return vec![line.to_string()];
    }

    let body = line.trim_start();
    let indent = width_of(line) - width_of(body);
    let hanging = " ".repeat((indent + 2).min(width / 2));
    let mut wrapped = Vec::new();
    let mut current = " ".repeat(indent);
    let mut current_has_word = false;

    for word in body.split_whitespace() {
        let mut word = word;
        loop {
            let sep = usize::from(current_has_word);
            if width_of(&current) + sep + width_of(word) <= width {
                if current_has_word {
                    current.push(' ');
                }
                current.push_str(word);
                current_has_word = true;
                break;
            }
            if current_has_word {
                wrapped.push(std::mem::replace(&mut current, hanging.clone()));
                current_has_word = false;
                continue;
            }
            // A single word longer than the line: hard split.
            let room = width.saturating_sub(width_of(&current)).max(1);
            let cut = word.char_indices().nth(room).map_or(word.len(), |(i, _)| i);
            let (head, tail) = word.split_at(cut);
            current.push_str(head);
            wrapped.push(std::mem::replace(&mut current, hanging.clone()));
            word = tail;
            if word.is_empty() {
                break;
            }
        }
    }

    if current_has_word {
        wrapped.push(current);
    }
    wrapped
}

/// Split lines into pages with a "Page i of n" footer.
pub fn paginate(lines: &[String], lines_per_page: usize) -> Vec<String> {
    let body = lines_per_page.saturating_sub(FOOTER_LINES).max(1);
    let chunks: Vec<&[String]> = if lines.is_empty() {
        vec![lines]
    } else {
        lines.chunks(body).collect()
    };
    let total = chunks.len();

    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let mut page = String::new();
            for line in chunk.iter() {
                page.push_str(line);
                page.push('\n');
            }
            page.push('\n');
            page.push_str(&format!("Page {} of {}\n", i + 1, total));
            page
        })
        .collect()
}

/// Printable document for roster sheets.
#[derive(Debug, Clone, Default)]
pub struct PagedRenderer {
    style: Style,
}

impl PagedRenderer {
    pub fn new(config: &ReminderConfig) -> Self {
        Self {
            style: Style::new(config),
        }
    }

    fn document(&self, lines: Vec<String>) -> String {
        let wrapped: Vec<String> = lines
            .iter()
            .flat_map(|line| wrap(&to_ascii(line), self.style.render.page_width))
            .collect();
        let separator = PAGE_BREAK.to_string();
        paginate(&wrapped, self.style.render.lines_per_page).join(&separator)
    }
}

impl Renderer for PagedRenderer {
    fn render_unit(&self, set: &ReminderSet) -> Result<String, RenderError> {
        Ok(self.document(unit_lines(set, &self.style, &Glyphs::ASCII)))
    }

    fn render_roster(&self, report: &RosterReport) -> Result<String, RenderError> {
        Ok(self.document(roster_lines(report, &self.style, &Glyphs::ASCII)))
    }

    fn render_unit_list(&self, names: &[&str]) -> Result<String, RenderError> {
        Ok(self.document(list_lines(names)))
    }

    fn format_name(&self) -> &str {
        "paged"
    }
}
