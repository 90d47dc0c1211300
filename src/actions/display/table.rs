use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::report::{CellValue, TabularResult, column_key, render::format_cell};

const DEFAULT_WIDTH: usize = 120;
const MIN_COLUMN_WIDTH: usize = 6;

/// A table ready for the terminal: headers plus already formatted cells
pub struct DisplayTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Right aligned columns
    pub numeric: Vec<bool>,
}

impl DisplayTable {
    pub fn from_result(result: &TabularResult, currency: &str) -> Self {
        let keys: Vec<String> = result.columns().iter().map(|c| column_key(c)).collect();
        let rows: Vec<Vec<String>> = result
            .rows()
            .iter()
            .map(|row| {
                keys.iter()
                    .map(|key| row.get(key).map(|v| format_cell(key, v, currency)).unwrap_or_default())
                    .collect()
            })
            .collect();
        let numeric = keys
            .iter()
            .map(|key| {
                result
                    .rows()
                    .first()
                    .and_then(|row| row.get(key))
                    .is_some_and(|v| matches!(v, CellValue::Integer(_) | CellValue::Decimal(_)))
            })
            .collect();

        Self {
            headers: result.columns().to_vec(),
            rows,
            numeric,
        }
    }

    /// Column widths that fit `max_width`, shrinking the widest columns first
    fn column_widths(&self, max_width: usize) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }

        // borders and padding: "| " + " | " between + " |"
        let chrome = 3 * widths.len() + 1;
        while widths.iter().sum::<usize>() + chrome > max_width {
            let Some((widest, width)) = widths.iter().copied().enumerate().max_by_key(|(_, w)| *w) else {
                break;
            };
            if width <= MIN_COLUMN_WIDTH {
                break;
            }
            widths[widest] = width - 1;
        }
        widths
    }

    pub fn render(&self, max_width: usize) -> Vec<String> {
        let widths = self.column_widths(max_width);
        let border = format!(
            "+{}+",
            widths.iter().map(|w| "-".repeat(w + 2)).collect::<Vec<_>>().join("+")
        );

        let line = |cells: &[String], align: &[bool]| -> String {
            let parts: Vec<String> = cells
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, width))| pad(&truncate(cell, *width), *width, align.get(i).copied().unwrap_or(false)))
                .collect();
            format!("| {} |", parts.join(" | "))
        };

        let mut lines = vec![border.clone(), line(&self.headers, &[]), border.clone()];
        for row in &self.rows {
            lines.push(line(row, &self.numeric));
        }
        lines.push(border);
        lines
    }
}

/// Cut text to a display width, marking the cut with ".."
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 2 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str("..");
    out
}

fn pad(text: &str, width: usize, right: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    if right { format!("{}{}", fill, text) } else { format!("{}{}", text, fill) }
}

pub fn terminal_width() -> usize {
    match terminal_size() {
        Some((Width(w), _)) => w as usize,
        None => DEFAULT_WIDTH,
    }
}

pub fn print_table(table: &DisplayTable) {
    for line in table.render(terminal_width()) {
        println!("{}", line);
    }
}
