//! Grid table rendering for search results.

use crate::types::SearchResult;
use colored::Colorize;
use unicode_width::UnicodeWidthStr;

pub const HEADERS: [&str; 4] = ["Input Name", "Normalized Name", "Status", "Message"];

const STATUS_COLUMN: usize = 2;

/// Text shown in the Status column.
pub fn status_label(exists: Option<bool>) -> &'static str {
    match exists {
        Some(true) => "True",
        Some(false) => "False",
        None => "Unknown",
    }
}

fn colorize_status(label: &str) -> String {
    match label {
        "True" => label.red().to_string(),
        "False" => label.green().to_string(),
        _ => label.yellow().to_string(),
    }
}

/// Render results as a grid table, one row per result.
///
/// Widths are terminal display widths of the plain text, so wide characters
/// and color codes do not skew alignment.
pub fn render_grid(results: &[SearchResult], color: bool) -> String {
    let rows: Vec<[&str; 4]> = results
        .iter()
        .map(|r| {
            [
                r.input_name.as_str(),
                r.display_name(),
                status_label(r.exists),
                r.message.as_str(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(UnicodeWidthStr::width);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.width());
        }
    }

    let border = |fill: char| -> String {
        let mut line = String::from("+");
        for width in &widths {
            line.extend(std::iter::repeat(fill).take(width + 2));
            line.push('+');
        }
        line
    };

    let format_row = |cells: &[&str; 4]| -> String {
        let mut line = String::from("|");
        for (i, (cell, width)) in cells.iter().zip(widths.iter()).enumerate() {
            let padding = " ".repeat(width - cell.width());
            let text = if color && i == STATUS_COLUMN {
                colorize_status(cell)
            } else {
                cell.to_string()
            };
            line.push_str(&format!(" {}{} |", text, padding));
        }
        line
    };

    let mut lines = vec![border('-'), format_row(&HEADERS), border('=')];
    for row in &rows {
        lines.push(format_row(row));
        lines.push(border('-'));
    }
    if rows.is_empty() {
        lines.pop();
        lines.push(border('-'));
    }

    lines.join("\n")
}
