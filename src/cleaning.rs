//! The cleaning pass.
//!
//! Four idempotent transformations bring the raw tables into their clean
//! state: duplicate-row collapse, gender standardization, strict date
//! normalization, and age-group backfill. Each operation reports how many
//! rows it changed; [`clean`] runs all of them and aggregates the counts.

use chrono::NaiveDate;

use crate::error::{Result, ScourError};
use crate::model::{AgeGroup, Customer, Gender, Sale, SaleDate};
use crate::table::Table;
use crate::Dataset;

/// The one date format the strict normalization accepts.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Counts of changes made by a full cleaning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningReport {
    /// Duplicate customer rows deleted.
    pub duplicate_customers_removed: usize,
    /// Duplicate sale rows deleted.
    pub duplicate_sales_removed: usize,
    /// Gender values rewritten to a canonical form.
    pub genders_standardized: usize,
    /// Textual sale dates converted to typed dates.
    pub dates_normalized: usize,
    /// Age groups filled in from numeric age.
    pub age_groups_backfilled: usize,
}

impl CleaningReport {
    /// Total rows changed across all operations.
    pub fn total_changes(&self) -> usize {
        self.duplicate_customers_removed
            + self.duplicate_sales_removed
            + self.genders_standardized
            + self.dates_normalized
            + self.age_groups_backfilled
    }

    /// True when the pass changed nothing, as a re-run over clean data does.
    pub fn is_noop(&self) -> bool {
        self.total_changes() == 0
    }
}

/// Rewrite every customer's gender to its canonical value.
///
/// Returns the number of rows whose stored value changed. Already-canonical
/// values are left alone, so a second run changes nothing.
pub fn standardize_gender(customers: &Table<Customer>) -> usize {
    let mut changed = 0;
    customers.for_each_mut(|customer| {
        let canonical = Gender::from_raw(customer.gender.as_deref());
        if customer.gender.as_deref() != Some(canonical.as_str()) {
            customer.gender = Some(canonical.as_str().to_string());
            changed += 1;
        }
    });
    changed
}

/// Convert every textual sale_date to a typed date, parsing exactly
/// `YYYY-MM-DD`.
///
/// All-or-nothing: every pending value is validated before any row is
/// mutated, so a single malformed value aborts the conversion and leaves
/// the table untouched. Returns the number of values converted.
pub fn normalize_sale_dates(sales: &Table<Sale>) -> Result<usize> {
    sales.write_with(|rows| {
        let mut parsed = Vec::new();
        for (idx, row) in rows.iter().enumerate() {
            if let SaleDate::Text(raw) = &row.record.sale_date {
                let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
                    .map_err(|_| ScourError::invalid_date(raw.clone()))?;
                parsed.push((idx, date));
            }
        }

        let converted = parsed.len();
        for (idx, date) in parsed {
            rows[idx].record.sale_date = SaleDate::Date(date);
        }
        Ok(converted)
    })
}

/// Fill `age_group` from `age` where it is currently unset.
///
/// Existing values are never overwritten, and rows with no age stay unset.
/// Returns the number of rows filled.
pub fn backfill_age_groups(customers: &Table<Customer>) -> usize {
    let mut filled = 0;
    customers.for_each_mut(|customer| {
        if customer.age_group.is_none() {
            if let Some(age) = customer.age {
                customer.age_group = Some(AgeGroup::from_age(age).as_str().to_string());
                filled += 1;
            }
        }
    });
    filled
}

/// Run the full cleaning pass over a dataset.
pub fn clean(dataset: &Dataset) -> Result<CleaningReport> {
    let duplicate_customers_removed = dataset.customers().deduplicate();
    let duplicate_sales_removed = dataset.sales().deduplicate();
    let genders_standardized = standardize_gender(dataset.customers());
    let dates_normalized = normalize_sale_dates(dataset.sales())?;
    let age_groups_backfilled = backfill_age_groups(dataset.customers());

    Ok(CleaningReport {
        duplicate_customers_removed,
        duplicate_sales_removed,
        genders_standardized,
        dates_normalized,
        age_groups_backfilled,
    })
}
