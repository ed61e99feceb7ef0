//! Simple line-based CLI output utilities.

use unicode_width::UnicodeWidthStr;

use crate::views::{Flash, FlashKind};

/// Line width for separators.
const LINE_WIDTH: usize = 60;

/// Gap between table columns.
const COLUMN_GAP: &str = "  ";

/// Print the section header.
///
/// ```text
/// INVENTARIO
/// ════════════════════════════════════════════════════════════
/// ```
pub fn print_header(title: &str) {
    println!();
    println!("{}", title);
    println!("{}", "═".repeat(LINE_WIDTH));
}

/// Print a labelled value.
///
/// ```text
///   Usuario:   ana
/// ```
pub fn print_field(label: &str, value: &str) {
    println!("  {} {}", pad(&format!("{}:", label), 11), value);
}

/// Print an icon-prefixed line.
pub fn print_line(icon: &str, message: &str) {
    println!("  {} {}", icon, message);
}

/// Print a flash to stdout, or stderr for warnings and errors.
pub fn print_flash(flash: &Flash) {
    let icon = flash_icon(flash.kind);
    match flash.kind {
        FlashKind::Success | FlashKind::Info => println!("{} {}", icon, flash.message),
        FlashKind::Warning | FlashKind::Danger => eprintln!("{} {}", icon, flash.message),
    }
}

pub fn flash_icon(kind: FlashKind) -> &'static str {
    match kind {
        FlashKind::Success => icons::SUCCESS,
        FlashKind::Info => icons::INFO,
        FlashKind::Warning => icons::WARNING,
        FlashKind::Danger => icons::FAILURE,
    }
}

/// Render rows as left-aligned columns sized to the widest cell.
///
/// Widths are measured in terminal columns, so accented text lines up.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.width());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let last = cells.len().saturating_sub(1);
        let mut out = String::new();
        for (i, cell) in cells.into_iter().enumerate() {
            if i == last {
                out.push_str(cell);
            } else {
                out.push_str(&pad(cell, widths[i]));
                out.push_str(COLUMN_GAP);
            }
        }
        out.trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(headers.to_vec()));
    let rule_width = widths.iter().sum::<usize>() + COLUMN_GAP.len() * widths.len().saturating_sub(1);
    lines.push("─".repeat(rule_width));
    for row in rows {
        lines.push(line(row.iter().take(widths.len()).map(String::as_str).collect()));
    }
    lines
}

/// Print a table, or `empty` when there are no rows.
pub fn print_table(headers: &[&str], rows: &[Vec<String>], empty: &str) {
    if rows.is_empty() {
        println!("  {}", empty);
        return;
    }
    for line in render_table(headers, rows) {
        println!("{}", line);
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

/// Status icons
pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const FAILURE: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const INFO: &str = "ℹ";
}
