//! Output formatting for report results.
//!
//! Three formats are supported:
//! - Table (default, pretty-printed for the console)
//! - CSV
//! - JSON Lines (newline-delimited JSON)

use std::fmt;
use std::io::Write;

use prettytable::format::consts::FORMAT_BOX_CHARS;
use prettytable::{Cell, Row as PtRow, Table as PtTable};
use serde::Serialize;

use crate::error::{Result, ScourError};
use crate::reports::{
    CustomerValue, DiscountBand, InventoryProfit, LowStockProduct, MonthlyRevenue,
    ProductRevenue, ProductSatisfaction, ProvinceRevenue,
};
use crate::view::SalesSummaryRow;

/// Output format for report results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed table (default)
    #[default]
    Table,
    /// Comma-separated values
    Csv,
    /// JSON Lines (newline-delimited JSON)
    Json,
}

impl OutputFormat {
    /// Parse an output format from its name.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" | "jsonl" | "ndjson" => Ok(Self::Json),
            _ => Err(ScourError::execution(format!(
                "unknown output format {s:?}; valid formats: table, csv, json"
            ))),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ScourError;

    fn from_str(s: &str) -> Result<Self> {
        OutputFormat::parse(s)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Row types that can be rendered column-wise.
pub trait Tabular {
    /// Column headers, in output order.
    fn headers() -> &'static [&'static str];
    /// One rendered cell per header.
    fn cells(&self) -> Vec<String>;
}

/// Write rows to `out` in the requested format.
pub fn write_rows<T: Tabular + Serialize>(
    out: &mut dyn Write,
    rows: &[T],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(out, rows),
        OutputFormat::Csv => write_csv(out, rows),
        OutputFormat::Json => write_json(out, rows),
    }
}

fn write_table<T: Tabular>(mut out: &mut dyn Write, rows: &[T]) -> Result<()> {
    let mut table = PtTable::new();
    table.set_format(*FORMAT_BOX_CHARS);
    table.set_titles(PtRow::new(
        T::headers().iter().map(|h| Cell::new(h)).collect(),
    ));
    for row in rows {
        table.add_row(PtRow::new(
            row.cells().iter().map(|c| Cell::new(c)).collect(),
        ));
    }
    table.print(&mut out)?;
    Ok(())
}

fn write_csv<T: Tabular>(out: &mut dyn Write, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(T::headers())?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<T: Serialize>(out: &mut dyn Write, rows: &[T]) -> Result<()> {
    for row in rows {
        serde_json::to_writer(&mut *out, row)?;
        writeln!(out)?;
    }
    Ok(())
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tabular implementations
// ---------------------------------------------------------------------------

impl Tabular for ProductRevenue {
    fn headers() -> &'static [&'static str] {
        &["product_name", "total_revenue"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.product_name.clone(), money(self.total_revenue)]
    }
}

impl Tabular for ProvinceRevenue {
    fn headers() -> &'static [&'static str] {
        &["province", "total_revenue"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.province.clone(), money(self.total_revenue)]
    }
}

impl Tabular for MonthlyRevenue {
    fn headers() -> &'static [&'static str] {
        &["month", "total_revenue"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.month.format("%Y-%m").to_string(),
            money(self.total_revenue),
        ]
    }
}

impl Tabular for InventoryProfit {
    fn headers() -> &'static [&'static str] {
        &["product_id", "product_name", "projected_profit"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.product_id.to_string(),
            self.product_name.clone(),
            money(self.projected_profit),
        ]
    }
}

impl Tabular for CustomerValue {
    fn headers() -> &'static [&'static str] {
        &["customer_id", "city", "age_group", "lifetime_value"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.customer_id.to_string(),
            optional(&self.city),
            optional(&self.age_group),
            money(self.lifetime_value),
        ]
    }
}

impl Tabular for DiscountBand {
    fn headers() -> &'static [&'static str] {
        &["discount", "num_sales", "total_revenue"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format!("{:.2}", self.discount),
            self.num_sales.to_string(),
            money(self.total_revenue),
        ]
    }
}

impl Tabular for LowStockProduct {
    fn headers() -> &'static [&'static str] {
        &["product_id", "product_name", "stock_available", "units_sold"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.product_id.to_string(),
            self.product_name.clone(),
            self.stock_available.to_string(),
            self.units_sold.to_string(),
        ]
    }
}

impl Tabular for ProductSatisfaction {
    fn headers() -> &'static [&'static str] {
        &["product_name", "avg_satisfaction", "num_ratings"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.product_name.clone(),
            format!("{:.2}", self.avg_satisfaction),
            self.num_ratings.to_string(),
        ]
    }
}

impl Tabular for SalesSummaryRow {
    fn headers() -> &'static [&'static str] {
        &[
            "product_id",
            "product_name",
            "province",
            "total_sales",
            "avg_satisfaction",
            "num_sales",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.product_id.to_string(),
            self.product_name.clone(),
            self.province.clone(),
            money(self.total_sales),
            self.avg_satisfaction
                .map(|avg| format!("{avg:.2}"))
                .unwrap_or_default(),
            self.num_sales.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<ProductRevenue> {
        vec![
            ProductRevenue {
                product_name: "Widget".to_string(),
                total_revenue: 600.0,
            },
            ProductRevenue {
                product_name: "Gadget".to_string(),
                total_revenue: 125.5,
            },
        ]
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::parse("table").unwrap(), OutputFormat::Table);
        assert_eq!(OutputFormat::parse("CSV").unwrap(), OutputFormat::Csv);
        assert_eq!(OutputFormat::parse("jsonl").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::parse("xml").is_err());
    }

    #[test]
    fn test_csv_output() {
        let mut buf = Vec::new();
        write_rows(&mut buf, &sample_rows(), OutputFormat::Csv).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "product_name,total_revenue\nWidget,600.00\nGadget,125.50\n"
        );
    }

    #[test]
    fn test_json_output() {
        let mut buf = Vec::new();
        write_rows(&mut buf, &sample_rows(), OutputFormat::Json).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "{\"product_name\":\"Widget\",\"total_revenue\":600.0}"
        );
    }

    #[test]
    fn test_table_output_contains_headers_and_cells() {
        let mut buf = Vec::new();
        write_rows(&mut buf, &sample_rows(), OutputFormat::Table).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("product_name"));
        assert!(text.contains("Widget"));
        assert!(text.contains("600.00"));
    }
}
