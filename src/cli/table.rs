//! Table formatting for the CLI list commands
//!
//! One small rendering layer shared by the storage-tier and division `list`
//! commands, so every listing responds to `-f tsv|csv|md|id` the same way.

use chrono::{DateTime, Local, Utc};
use console::style;

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;

/// A typed cell value; the type decides padding, color, and escaping
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Entity ID, shortened and cyan in terminal output
    Id(String),
    /// Free text, truncated to the column width
    Text(String),
    /// Timestamp, shown as a local calendar date
    Date(DateTime<Utc>),
    /// Placeholder for absent data
    Empty,
}

impl CellValue {
    /// Plain rendering, shared by the csv and md paths
    fn raw(&self) -> String {
        match self {
            CellValue::Id(id) => id.clone(),
            CellValue::Text(s) => s.clone(),
            CellValue::Date(dt) => dt.with_timezone(&Local).format("%Y-%m-%d").to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => {
                let short = if id.len() > 16 {
                    format!("{}...", &id[..13])
                } else {
                    id.clone()
                };
                format!("{:<width$}", style(&short).cyan(), width = width)
            }
            CellValue::Text(s) => {
                let fitted = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", fitted, width = width)
            }
            CellValue::Date(_) => format!("{:<width$}", self.raw(), width = width),
            CellValue::Empty => format!("{:<width$}", "-", width = width),
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        escape_csv(&self.raw())
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        match self {
            CellValue::Empty => "-".to_string(),
            other => other.raw().replace('|', "\\|"),
        }
    }
}

/// Column definition with header label and width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// One listed entity: the untruncated id plus keyed cells
pub struct TableRow {
    pub full_id: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(full_id: String) -> Self {
        Self {
            full_id,
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Renders rows against a fixed column set in the selected format
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
        }
    }

    pub fn output(&self, rows: Vec<TableRow>, format: OutputFormat) {
        match format {
            OutputFormat::Csv => self.render_csv(&rows),
            OutputFormat::Md => self.render_md(&rows),
            OutputFormat::Id => {
                for row in &rows {
                    println!("{}", row.full_id);
                }
            }
            _ => self.render_tsv(&rows),
        }
    }

    fn render_tsv(&self, rows: &[TableRow]) {
        let header = self
            .columns
            .iter()
            .map(|c| format!("{:<w$}", style(c.header).bold(), w = c.width))
            .collect::<Vec<_>>()
            .join(" ");
        println!("{}", header);

        let rule_width: usize =
            self.columns.iter().map(|c| c.width + 1).sum::<usize>() - 1;
        println!("{}", "-".repeat(rule_width));

        for row in rows {
            let line = self
                .columns
                .iter()
                .map(|c| match row.get(c.key) {
                    Some(value) => value.format_tsv(c.width),
                    None => format!("{:<w$}", "-", w = c.width),
                })
                .collect::<Vec<_>>()
                .join(" ");
            println!("{}", line);
        }

        println!();
        println!(
            "{} {}(s) found.",
            style(rows.len()).cyan(),
            self.entity_name
        );
    }

    // The full id leads every csv row; the id column (if any) is dropped
    // since it would repeat it truncated.
    fn render_csv(&self, rows: &[TableRow]) {
        let data_cols: Vec<&ColumnDef> =
            self.columns.iter().filter(|c| c.key != "id").collect();

        let header: Vec<&str> = std::iter::once("id")
            .chain(data_cols.iter().map(|c| c.key))
            .collect();
        println!("{}", header.join(","));

        for row in rows {
            let fields: Vec<String> = std::iter::once(escape_csv(&row.full_id))
                .chain(data_cols.iter().map(|c| {
                    row.get(c.key).map(CellValue::format_csv).unwrap_or_default()
                }))
                .collect();
            println!("{}", fields.join(","));
        }
    }

    fn render_md(&self, rows: &[TableRow]) {
        let headers: Vec<&str> = self.columns.iter().map(|c| c.header).collect();
        println!("| {} |", headers.join(" | "));
        println!("|{}|", vec!["---"; headers.len()].join("|"));

        for row in rows {
            let fields: Vec<String> = self
                .columns
                .iter()
                .map(|c| {
                    row.get(c.key)
                        .map(CellValue::format_md)
                        .unwrap_or_else(|| "-".to_string())
                })
                .collect();
            println!("| {} |", fields.join(" | "));
        }
    }
}
