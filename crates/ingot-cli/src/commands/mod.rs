//! CLI command implementations.

pub mod convert;
pub mod preview;

use colored::Colorize;
use ingot::PreviewTable;

/// Render a preview as an aligned two-space-separated table.
pub(crate) fn print_preview_table(preview: &PreviewTable) {
    let headers = preview.headers();
    if headers.is_empty() {
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &preview.rows {
        for (i, value) in row.values().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(value.len());
            }
        }
    }

    let header_line = headers
        .iter()
        .zip(widths.iter().copied())
        .map(|(header, width)| format!("{:<width$}", header))
        .collect::<Vec<_>>()
        .join("  ");
    println!("  {}", header_line.bold());

    for row in &preview.rows {
        let line = row
            .values()
            .zip(widths.iter().copied())
            .map(|(value, width)| format!("{:<width$}", value))
            .collect::<Vec<_>>()
            .join("  ");
        println!("  {}", line);
    }
}
