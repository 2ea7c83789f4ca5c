//! On-demand re-cleaning of the sales table.
//!
//! [`refresh_clean_sales_data`] re-applies the sales-table cleanup rules:
//! duplicate collapse and a lenient date repair. Unlike the strict
//! normalization in the cleaning pass, the repair here is best-effort:
//! it only looks at values that do not already have the `YYYY-MM-DD`
//! shape, converts the ones a fallback format accepts, and silently
//! leaves the rest alone. It does not re-validate its own output.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::info;

use crate::model::{Sale, SaleDate};
use crate::table::Table;
use crate::Dataset;

/// Shape of an already-normalized textual date.
static ISO_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static pattern compiles")
});

/// Fallback formats the repair will try, in order.
const REPAIR_FORMATS: &[&str] = &["%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%B %d, %Y"];

/// Best-effort conversion of textual sale dates that do not look like
/// `YYYY-MM-DD`.
///
/// Values already matching that shape are not touched, and values no
/// fallback format accepts are left in place without error. Returns the
/// number of values converted.
pub fn repair_sale_dates(sales: &Table<Sale>) -> usize {
    let mut repaired = 0;
    sales.for_each_mut(|sale| {
        if let SaleDate::Text(raw) = &sale.sale_date {
            if !ISO_SHAPE.is_match(raw) {
                let parsed = REPAIR_FORMATS
                    .iter()
                    .find_map(|format| NaiveDate::parse_from_str(raw, format).ok());
                if let Some(date) = parsed {
                    sale.sale_date = SaleDate::Date(date);
                    repaired += 1;
                }
            }
        }
    });
    repaired
}

/// Re-apply the sales-table cleanup rules on demand.
///
/// Deduplicates the sales table, repairs what textual dates it can, and
/// emits one informational completion event. Safe to call repeatedly:
/// once the data is clean, subsequent invocations change nothing.
pub fn refresh_clean_sales_data(dataset: &Dataset) {
    let duplicates_removed = dataset.sales().deduplicate();
    let dates_repaired = repair_sale_dates(dataset.sales());
    info!(duplicates_removed, dates_repaired, "sales data cleanup complete");
}
