//! Results Grid Module for influxcli
//!
//! This module renders a titled table of values as bordered text for the terminal,
//! in the familiar `+---+` / `| a | b |` style.
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

/// The data handed to a [`TableRenderer`]: one series worth of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: String,
    pub headings: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Turns a [`Table`] into printable text.
///
/// The tabulator only decides what goes into the table; alignment, borders
/// and wrapping belong to the renderer.
pub trait TableRenderer {
    fn render(&self, table: &Table) -> String;
}

/// Default renderer drawing box-style tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultsGrid;

impl ResultsGrid {
    pub fn new() -> Self {
        ResultsGrid
    }
}

/// Text shown for a single cell. Nulls are blank and strings are unquoted.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Display columns taken by `text`; wide CJK and emoji characters count as two.
fn width_of(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn pad_right(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(width_of(text));
    format!("{}{}", text, " ".repeat(fill))
}

fn center(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(width_of(text));
    let left = fill / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
}

impl TableRenderer for ResultsGrid {
    fn render(&self, table: &Table) -> String {
        let cells: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        let columns = table
            .headings
            .len()
            .max(cells.iter().map(Vec::len).max().unwrap_or(0));
        if columns == 0 {
            return format!("| {} |", table.title);
        }

        let mut widths = vec![0usize; columns];
        for (i, heading) in table.headings.iter().enumerate() {
            widths[i] = widths[i].max(width_of(heading));
        }
        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(width_of(cell));
            }
        }

        // Interior width between the outer borders, one space padding per side.
        let inner = |widths: &[usize]| widths.iter().map(|w| w + 2).sum::<usize>() + widths.len() - 1;
        let title_width = width_of(&table.title) + 2;
        if title_width > inner(widths.as_slice()) {
            let deficit = title_width - inner(widths.as_slice());
            widths[columns - 1] += deficit;
        }

        let rule = format!(
            "+{}+",
            widths
                .iter()
                .map(|w| "-".repeat(w + 2))
                .collect::<Vec<_>>()
                .join("+")
        );
        let line = |values: &[String]| {
            let padded: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| pad_right(values.get(i).map(String::as_str).unwrap_or(""), *w))
                .collect();
            format!("| {} |", padded.join(" | "))
        };

        let mut output = vec![
            rule.clone(),
            format!("| {} |", center(&table.title, inner(widths.as_slice()) - 2)),
            rule.clone(),
        ];
        if !table.headings.is_empty() {
            output.push(line(table.headings.as_slice()));
            output.push(rule.clone());
        }
        if !cells.is_empty() {
            for row in &cells {
                output.push(line(row.as_slice()));
            }
            output.push(rule);
        }
        output.join("\n")
    }
}
