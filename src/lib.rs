//! Scour - Embedded cleaning and reporting engine for retail sales data
//!
//! Scour loads a retail dataset (customers, sales, inventory) into typed
//! in-memory tables, repairs the usual data-quality problems in place, and
//! answers a fixed set of business reports over the cleaned data.
//!
//! # Features
//!
//! - **Cleaning pass**: duplicate-row collapse, gender standardization,
//!   strict date normalization, age-group backfill - all idempotent
//! - **Reports**: eight read-only aggregations (top products/provinces,
//!   monthly trend, inventory profit, customer lifetime value, discount
//!   impact, low-stock items, satisfaction ratings)
//! - **Summary view**: product/region sales summary, recomputed on read
//! - **Maintenance**: on-demand re-cleaning of the sales table
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scour::{Dataset, Result};
//!
//! fn main() -> Result<()> {
//!     let dataset = Dataset::new();
//!
//!     // Load the raw tables
//!     dataset.load_customers_csv("data/customers.csv")?;
//!     dataset.load_sales_csv("data/sales.csv")?;
//!     dataset.load_inventory_csv("data/inventory.csv")?;
//!
//!     // Fix the data in place
//!     let report = dataset.clean()?;
//!     println!("removed {} duplicate customers", report.duplicate_customers_removed);
//!
//!     // Query the cleaned data
//!     for row in dataset.top_products(5) {
//!         println!("{}: {:.2}", row.product_name, row.total_revenue);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cleaning;
pub mod error;
pub mod ingest;
pub mod maintenance;
pub mod model;
pub mod output;
pub mod reports;
pub mod table;
pub mod view;

// Re-export commonly used types
pub use cleaning::CleaningReport;
pub use error::{Result, ScourError};
pub use ingest::CsvOptions;
pub use model::{Customer, InventoryItem, Sale};

use std::path::Path;

use table::Table;
use view::SalesSummaryRow;

/// The in-memory retail dataset.
///
/// `Dataset` is the main entry point: it owns the three tables and exposes
/// loading, cleaning, reporting, the summary view, and the maintenance
/// procedure.
#[derive(Debug, Default)]
pub struct Dataset {
    customers: Table<Customer>,
    sales: Table<Sale>,
    inventory: Table<InventoryItem>,
}

impl Dataset {
    /// Create an empty dataset.
    ///
    /// # Example
    ///
    /// ```rust
    /// use scour::Dataset;
    ///
    /// let dataset = Dataset::new();
    /// assert!(dataset.customers().is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// The customers table.
    pub fn customers(&self) -> &Table<Customer> {
        &self.customers
    }

    /// The sales table.
    pub fn sales(&self) -> &Table<Sale> {
        &self.sales
    }

    /// The inventory table.
    pub fn inventory(&self) -> &Table<InventoryItem> {
        &self.inventory
    }

    /// Row counts per table, for introspection.
    pub fn table_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("customers", self.customers.len()),
            ("sales", self.sales.len()),
            ("inventory", self.inventory.len()),
        ]
    }

    // -- loading ------------------------------------------------------------

    /// Load customer rows from a CSV file, returning how many were added.
    pub fn load_customers_csv(&self, path: impl AsRef<Path>) -> Result<usize> {
        self.load_customers_csv_with_options(path, &CsvOptions::default())
    }

    /// Load customer rows from a CSV file with custom options.
    pub fn load_customers_csv_with_options(
        &self,
        path: impl AsRef<Path>,
        options: &CsvOptions,
    ) -> Result<usize> {
        let records = ingest::customers_from_path(path, options)?;
        Ok(self.customers.extend(records))
    }

    /// Load sale rows from a CSV file, returning how many were added.
    pub fn load_sales_csv(&self, path: impl AsRef<Path>) -> Result<usize> {
        self.load_sales_csv_with_options(path, &CsvOptions::default())
    }

    /// Load sale rows from a CSV file with custom options.
    pub fn load_sales_csv_with_options(
        &self,
        path: impl AsRef<Path>,
        options: &CsvOptions,
    ) -> Result<usize> {
        let records = ingest::sales_from_path(path, options)?;
        Ok(self.sales.extend(records))
    }

    /// Load inventory rows from a CSV file, returning how many were added.
    pub fn load_inventory_csv(&self, path: impl AsRef<Path>) -> Result<usize> {
        self.load_inventory_csv_with_options(path, &CsvOptions::default())
    }

    /// Load inventory rows from a CSV file with custom options.
    pub fn load_inventory_csv_with_options(
        &self,
        path: impl AsRef<Path>,
        options: &CsvOptions,
    ) -> Result<usize> {
        let records = ingest::inventory_from_path(path, options)?;
        Ok(self.inventory.extend(records))
    }

    // -- cleaning -----------------------------------------------------------

    /// Run the full cleaning pass, returning what changed.
    ///
    /// Idempotent: a second run over clean data reports zero changes.
    pub fn clean(&self) -> Result<CleaningReport> {
        cleaning::clean(self)
    }

    /// Re-apply the sales-table cleanup rules (dedup plus lenient date
    /// repair) and emit a completion event.
    pub fn refresh_clean_sales_data(&self) {
        maintenance::refresh_clean_sales_data(self)
    }

    // -- reports ------------------------------------------------------------

    /// Top products by total revenue.
    pub fn top_products(&self, limit: usize) -> Vec<reports::ProductRevenue> {
        reports::top_products(self, limit)
    }

    /// Top provinces by total revenue.
    pub fn top_provinces(&self, limit: usize) -> Vec<reports::ProvinceRevenue> {
        reports::top_provinces(self, limit)
    }

    /// Revenue per calendar month. Requires normalized sale dates.
    pub fn monthly_trend(&self) -> Result<Vec<reports::MonthlyRevenue>> {
        reports::monthly_trend(self)
    }

    /// Inventory items ranked by projected profit.
    pub fn inventory_profit(&self, limit: usize) -> Vec<reports::InventoryProfit> {
        reports::inventory_profit(self, limit)
    }

    /// Lifetime spend per customer.
    pub fn customer_lifetime_value(&self) -> Vec<reports::CustomerValue> {
        reports::customer_lifetime_value(self)
    }

    /// Sales count and revenue per rounded discount rate.
    pub fn discount_impact(&self) -> Vec<reports::DiscountBand> {
        reports::discount_impact(self)
    }

    /// Low-stock items that are still selling.
    pub fn low_stock_high_demand(&self) -> Vec<reports::LowStockProduct> {
        reports::low_stock_high_demand(self)
    }

    /// Average satisfaction per product with enough ratings.
    pub fn satisfaction_by_product(&self) -> Vec<reports::ProductSatisfaction> {
        reports::satisfaction_by_product(self)
    }

    // -- view ---------------------------------------------------------------

    /// The product/region sales summary, recomputed from current sales.
    pub fn sales_summary_by_product_region(&self) -> Vec<SalesSummaryRow> {
        view::sales_summary_by_product_region(self)
    }
}

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::cleaning::CleaningReport;
    pub use crate::error::{Result, ScourError};
    pub use crate::ingest::CsvOptions;
    pub use crate::model::{AgeGroup, Customer, Gender, InventoryItem, Sale, SaleDate};
    pub use crate::output::OutputFormat;
    pub use crate::Dataset;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dataset_is_empty() {
        let dataset = Dataset::new();
        assert_eq!(
            dataset.table_counts(),
            vec![("customers", 0), ("sales", 0), ("inventory", 0)]
        );
    }

    #[test]
    fn test_clean_on_empty_dataset_is_noop() {
        let dataset = Dataset::new();
        let report = dataset.clean().unwrap();
        assert!(report.is_noop());
    }
}
