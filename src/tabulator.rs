//! Result tabulation.
//!
//! Converts a multi-series [`QueryResult`] into rendered tables plus a
//! pluralized summary line per series, written to an [`OutputSink`].

use serde_json::Value;
use std::io::Write;
use tracing::{debug, warn};

use crate::core::Result;
use crate::results_grid::{Table, TableRenderer};
use crate::series::{QueryResult, Series};
use crate::timestamp::{format_time_value, TimePrecision, TIME_COLUMN};

/// Per-call display settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabulateOptions {
    /// Humanize `time` columns.
    pub pretty: bool,
    pub precision: TimePrecision,
}

impl TabulateOptions {
    pub fn new(pretty: bool, precision: TimePrecision) -> Self {
        TabulateOptions { pretty, precision }
    }
}

/// Row counts per series, in output order.
pub type SeriesCounts = Vec<(String, usize)>;

/// A line-oriented output destination.
pub trait OutputSink {
    fn write_line(&mut self, line: &str) -> std::io::Result<()>;

    fn write_blank(&mut self) -> std::io::Result<()> {
        self.write_line("")
    }
}

impl<W: Write> OutputSink for W {
    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self, "{}", line)
    }
}

/// Returns `singular` for exactly one, otherwise the `s`-suffixed plural.
pub fn pluralize(count: usize, singular: &str) -> String {
    if count == 1 {
        singular.to_string()
    } else {
        format!("{}s", singular)
    }
}

/// Column headings for a series: the first row's keys in order, then any key
/// first seen in a later row.
fn headings_for(series: &Series) -> Vec<String> {
    let mut headings: Vec<String> = match series.rows.first() {
        Some(first) => first.keys().cloned().collect(),
        None => return Vec::new(),
    };
    let expected = headings.len();

    for (index, row) in series.rows.iter().enumerate().skip(1) {
        let same_order = row.len() == expected && row.keys().eq(headings[..expected].iter());
        if !same_order {
            warn!(
                "row {} of series '{}' does not match the first row's columns",
                index, series.name
            );
        }
        for key in row.keys() {
            if !headings.contains(key) {
                headings.push(key.clone());
            }
        }
    }
    headings
}

/// Builds the table for a non-empty series. Cells are looked up by heading,
/// so rows with missing or reordered keys still line up; missing keys are null.
pub fn build_table(series: &Series, options: &TabulateOptions) -> Table {
    let headings = headings_for(series);
    let rows = series
        .rows
        .iter()
        .map(|row| {
            headings
                .iter()
                .map(|heading| {
                    let value = row.get(heading).unwrap_or(&Value::Null);
                    if options.pretty && heading == TIME_COLUMN {
                        format_time_value(value, options.precision)
                    } else {
                        value.clone()
                    }
                })
                .collect()
        })
        .collect();

    Table {
        title: series.name.clone(),
        headings,
        rows,
    }
}

/// Writes every series of `result` as a table followed by a summary line.
///
/// - A missing or empty result writes the single line `No results found`.
/// - A series without rows writes `No results found for <series>`.
/// - Otherwise the rendered table is written, then `<N> result(s) found for <series>`.
///
/// Each series is followed by one blank line. Returns the row count of every
/// series in output order; only a failing sink produces an error.
pub fn print_tabularize(
    result: Option<&QueryResult>,
    options: &TabulateOptions,
    renderer: &dyn TableRenderer,
    output: &mut dyn OutputSink,
) -> Result<SeriesCounts> {
    let series_list = match result {
        Some(result) if !result.is_empty() => &result.series,
        _ => {
            output.write_line("No results found")?;
            return Ok(Vec::new());
        }
    };

    let mut counts = Vec::with_capacity(series_list.len());
    for series in series_list {
        let count = series.rows.len();
        if count == 0 {
            output.write_line(&format!("No results found for {}", series.name))?;
        } else {
            debug!("rendering {} rows for series '{}'", count, series.name);
            let table = build_table(series, options);
            output.write_line(&renderer.render(&table))?;
            output.write_line(&format!(
                "{} {} found for {}",
                count,
                pluralize(count, "result"),
                series.name
            ))?;
        }
        output.write_blank()?;
        counts.push((series.name.clone(), count));
    }
    Ok(counts)
}
