//! Table rendering utilities for CLI outputs.

use regex::Regex;
use std::sync::OnceLock;
use unicode_width::UnicodeWidthStr;

pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn ansi_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static regex"))
}

/// Display width of a cell, ignoring ANSI color sequences.
pub fn visible_width(s: &str) -> usize {
    UnicodeWidthStr::width(ansi_re().replace_all(s, "").as_ref())
}

impl Table {
    pub fn new<S: Into<String>>(headers: Vec<S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self, separator: char) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| visible_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(visible_width(cell));
            }
        }

        let mut out = String::new();

        // Header
        for (i, h) in self.headers.iter().enumerate() {
            out.push_str(&pad_cell(h, widths[i]));
        }
        out.push('\n');
        let total: usize = widths.iter().map(|w| w + 1).sum();
        out.push_str(&separator.to_string().repeat(total));
        out.push('\n');

        // Rows
        for row in &self.rows {
            for (i, w) in widths.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                out.push_str(&pad_cell(cell, *w));
            }
            out.push('\n');
        }

        out
    }
}

fn pad_cell(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_width(s));
    format!("{s}{} ", " ".repeat(pad))
}
