//! Reporting queries over the dataset.
//!
//! Every report is a pure aggregation: it reads the current table
//! contents, groups and orders in memory, and returns typed rows. Nothing
//! here mutates a table. Where the source leaves tie-break order
//! unspecified, ties are broken by the grouping key ascending so results
//! are deterministic.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{Result, ScourError};
use crate::Dataset;

/// Default row cap for the top-products and top-provinces reports.
pub const DEFAULT_TOP_LIMIT: usize = 5;
/// Default row cap for the inventory-profit report.
pub const DEFAULT_PROFIT_LIMIT: usize = 10;
/// Row cap for the satisfaction report.
pub const SATISFACTION_LIMIT: usize = 5;
/// A product needs strictly more ratings than this to appear in the
/// satisfaction report.
pub const MIN_RATING_COUNT: usize = 10;
/// Stock level below which an item counts as low-stock.
pub const LOW_STOCK_THRESHOLD: i64 = 50;

// ---------------------------------------------------------------------------
// Report rows
// ---------------------------------------------------------------------------

/// Revenue total for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRevenue {
    pub product_name: String,
    pub total_revenue: f64,
}

/// Revenue total for one province.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvinceRevenue {
    pub province: String,
    pub total_revenue: f64,
}

/// Revenue total for one calendar month (keyed by its first day).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub month: NaiveDate,
    pub total_revenue: f64,
}

/// Projected profit for one inventory item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryProfit {
    pub product_id: i64,
    pub product_name: String,
    pub projected_profit: f64,
}

/// Lifetime spend for one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerValue {
    pub customer_id: i64,
    pub city: Option<String>,
    pub age_group: Option<String>,
    pub lifetime_value: f64,
}

/// Sales volume at one discount rate (rounded to two decimals).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountBand {
    pub discount: f64,
    pub num_sales: usize,
    pub total_revenue: f64,
}

/// An item low on stock despite selling well.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockProduct {
    pub product_id: i64,
    pub product_name: String,
    pub stock_available: i64,
    pub units_sold: i64,
}

/// Average satisfaction rating for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSatisfaction {
    pub product_name: String,
    pub avg_satisfaction: f64,
    pub num_ratings: usize,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Top products by total revenue, descending.
pub fn top_products(dataset: &Dataset, limit: usize) -> Vec<ProductRevenue> {
    let mut revenue: HashMap<String, f64> = HashMap::new();
    dataset.sales().read_with(|rows| {
        for row in rows {
            *revenue.entry(row.record.product_name.clone()).or_default() +=
                row.record.total_sale;
        }
    });

    let mut out: Vec<ProductRevenue> = revenue
        .into_iter()
        .map(|(product_name, total_revenue)| ProductRevenue {
            product_name,
            total_revenue,
        })
        .collect();
    out.sort_by(|a, b| {
        b.total_revenue
            .total_cmp(&a.total_revenue)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    out.truncate(limit);
    out
}

/// Top provinces by total revenue, descending.
pub fn top_provinces(dataset: &Dataset, limit: usize) -> Vec<ProvinceRevenue> {
    let mut revenue: HashMap<String, f64> = HashMap::new();
    dataset.sales().read_with(|rows| {
        for row in rows {
            *revenue.entry(row.record.province.clone()).or_default() += row.record.total_sale;
        }
    });

    let mut out: Vec<ProvinceRevenue> = revenue
        .into_iter()
        .map(|(province, total_revenue)| ProvinceRevenue {
            province,
            total_revenue,
        })
        .collect();
    out.sort_by(|a, b| {
        b.total_revenue
            .total_cmp(&a.total_revenue)
            .then_with(|| a.province.cmp(&b.province))
    });
    out.truncate(limit);
    out
}

/// Revenue per calendar month, ascending by month.
///
/// Requires normalized sale dates; a remaining textual date is an error,
/// just as date-truncating a text column would be.
pub fn monthly_trend(dataset: &Dataset) -> Result<Vec<MonthlyRevenue>> {
    let mut revenue: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    dataset.sales().read_with(|rows| {
        for row in rows {
            let date = row.record.sale_date.as_date().ok_or_else(|| {
                ScourError::execution(format!(
                    "sale {} has an unnormalized sale_date; run the cleaning pass first",
                    row.record.sale_id
                ))
            })?;
            let month = date.with_day(1).ok_or_else(|| {
                ScourError::execution(format!("cannot truncate {date} to month"))
            })?;
            *revenue.entry(month).or_default() += row.record.total_sale;
        }
        Ok::<(), ScourError>(())
    })?;

    Ok(revenue
        .into_iter()
        .map(|(month, total_revenue)| MonthlyRevenue {
            month,
            total_revenue,
        })
        .collect())
}

/// Inventory items ranked by projected profit (per-unit expected profit
/// times units sold to date), descending.
pub fn inventory_profit(dataset: &Dataset, limit: usize) -> Vec<InventoryProfit> {
    let mut out: Vec<InventoryProfit> = dataset.inventory().read_with(|rows| {
        rows.iter()
            .map(|row| InventoryProfit {
                product_id: row.record.product_id,
                product_name: row.record.product_name.clone(),
                projected_profit: row.record.expected_profit * row.record.sold_stock as f64,
            })
            .collect()
    });
    out.sort_by(|a, b| {
        b.projected_profit
            .total_cmp(&a.projected_profit)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    out.truncate(limit);
    out
}

/// Lifetime spend per customer, descending.
///
/// Inner join: sales whose customer is missing from the customers table
/// are dropped, as a relational join would drop them.
pub fn customer_lifetime_value(dataset: &Dataset) -> Vec<CustomerValue> {
    let profiles: HashMap<i64, (Option<String>, Option<String>)> =
        dataset.customers().read_with(|rows| {
            rows.iter()
                .map(|row| {
                    (
                        row.record.customer_id,
                        (row.record.city.clone(), row.record.age_group.clone()),
                    )
                })
                .collect()
        });

    let mut totals: HashMap<i64, f64> = HashMap::new();
    dataset.sales().read_with(|rows| {
        for row in rows {
            if profiles.contains_key(&row.record.customer_id) {
                *totals.entry(row.record.customer_id).or_default() += row.record.total_sale;
            }
        }
    });

    let mut out = Vec::with_capacity(totals.len());
    for (customer_id, lifetime_value) in totals {
        if let Some((city, age_group)) = profiles.get(&customer_id) {
            out.push(CustomerValue {
                customer_id,
                city: city.clone(),
                age_group: age_group.clone(),
                lifetime_value,
            });
        }
    }
    out.sort_by(|a, b| {
        b.lifetime_value
            .total_cmp(&a.lifetime_value)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    });
    out
}

/// Sales count and revenue per discount rate, ascending by rate.
///
/// Rates are rounded to two decimals before grouping; the integer
/// hundredths key keeps the grouping exact under float inputs.
pub fn discount_impact(dataset: &Dataset) -> Vec<DiscountBand> {
    let mut bands: BTreeMap<i64, (usize, f64)> = BTreeMap::new();
    dataset.sales().read_with(|rows| {
        for row in rows {
            let hundredths = (row.record.discount * 100.0).round() as i64;
            let band = bands.entry(hundredths).or_default();
            band.0 += 1;
            band.1 += row.record.total_sale;
        }
    });

    bands
        .into_iter()
        .map(|(hundredths, (num_sales, total_revenue))| DiscountBand {
            discount: hundredths as f64 / 100.0,
            num_sales,
            total_revenue,
        })
        .collect()
}

/// Items with stock below [`LOW_STOCK_THRESHOLD`] that are still selling,
/// descending by units sold.
///
/// Inner join against per-product unit sums: items with no recorded sales
/// do not appear.
pub fn low_stock_high_demand(dataset: &Dataset) -> Vec<LowStockProduct> {
    let mut units: HashMap<i64, i64> = HashMap::new();
    dataset.sales().read_with(|rows| {
        for row in rows {
            *units.entry(row.record.product_id).or_default() += row.record.quantity;
        }
    });

    let mut out: Vec<LowStockProduct> = dataset.inventory().read_with(|rows| {
        rows.iter()
            .filter(|row| row.record.stock_available < LOW_STOCK_THRESHOLD)
            .filter_map(|row| {
                units.get(&row.record.product_id).map(|&units_sold| LowStockProduct {
                    product_id: row.record.product_id,
                    product_name: row.record.product_name.clone(),
                    stock_available: row.record.stock_available,
                    units_sold,
                })
            })
            .collect()
    });
    out.sort_by(|a, b| {
        b.units_sold
            .cmp(&a.units_sold)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    out
}

/// Average satisfaction per product over rated sales, descending.
///
/// Only products with strictly more than [`MIN_RATING_COUNT`] ratings
/// qualify; unrated sales do not count toward the threshold.
pub fn satisfaction_by_product(dataset: &Dataset) -> Vec<ProductSatisfaction> {
    let mut ratings: HashMap<String, (f64, usize)> = HashMap::new();
    dataset.sales().read_with(|rows| {
        for row in rows {
            if let Some(rating) = row.record.satisfaction {
                let entry = ratings.entry(row.record.product_name.clone()).or_default();
                entry.0 += rating;
                entry.1 += 1;
            }
        }
    });

    let mut out: Vec<ProductSatisfaction> = ratings
        .into_iter()
        .filter(|(_, (_, count))| *count > MIN_RATING_COUNT)
        .map(|(product_name, (sum, num_ratings))| ProductSatisfaction {
            product_name,
            avg_satisfaction: sum / num_ratings as f64,
            num_ratings,
        })
        .collect();
    out.sort_by(|a, b| {
        b.avg_satisfaction
            .total_cmp(&a.avg_satisfaction)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    out.truncate(SATISFACTION_LIMIT);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Customer, InventoryItem, Sale, SaleDate};

    fn sale(
        sale_id: i64,
        customer_id: i64,
        product_id: i64,
        product_name: &str,
        province: &str,
        date: &str,
        quantity: i64,
        discount: f64,
        total_sale: f64,
        satisfaction: Option<f64>,
    ) -> Sale {
        Sale {
            sale_id,
            customer_id,
            product_id,
            product_name: product_name.to_string(),
            province: province.to_string(),
            sale_date: SaleDate::Text(date.to_string()),
            quantity,
            discount,
            total_sale,
            satisfaction,
        }
    }

    fn test_dataset() -> Dataset {
        let dataset = Dataset::new();

        dataset.customers().insert(Customer {
            customer_id: 1,
            city: Some("Toronto".to_string()),
            age: Some(30),
            age_group: Some("Adult".to_string()),
            gender: Some("Male".to_string()),
        });
        dataset.customers().insert(Customer {
            customer_id: 2,
            city: Some("Halifax".to_string()),
            age: Some(52),
            age_group: Some("Senior".to_string()),
            gender: Some("Female".to_string()),
        });

        dataset.sales().extend([
            sale(1, 1, 100, "Widget", "East", "2024-01-10", 2, 0.10, 100.0, Some(4.0)),
            sale(2, 1, 100, "Widget", "East", "2024-01-20", 4, 0.101, 200.0, Some(5.0)),
            sale(3, 2, 100, "Widget", "East", "2024-02-05", 6, 0.104, 300.0, None),
            sale(4, 2, 101, "Gadget", "West", "2024-02-14", 1, 0.25, 50.0, Some(3.0)),
            // Orphan sale: customer 99 is not in the customers table.
            sale(5, 99, 101, "Gadget", "West", "2024-03-01", 2, 0.00, 75.0, None),
        ]);

        dataset.inventory().extend([
            InventoryItem {
                product_id: 100,
                product_name: "Widget".to_string(),
                expected_profit: 10.0,
                sold_stock: 50,
                stock_available: 20,
            },
            InventoryItem {
                product_id: 101,
                product_name: "Gadget".to_string(),
                expected_profit: 25.0,
                sold_stock: 10,
                stock_available: 120,
            },
            InventoryItem {
                product_id: 102,
                product_name: "Sprocket".to_string(),
                expected_profit: 5.0,
                sold_stock: 0,
                stock_available: 5,
            },
        ]);

        dataset
    }

    #[test]
    fn test_top_products_sums_and_orders() {
        let dataset = test_dataset();
        let report = top_products(&dataset, DEFAULT_TOP_LIMIT);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].product_name, "Widget");
        assert_eq!(report[0].total_revenue, 600.0);
        assert_eq!(report[1].product_name, "Gadget");
        assert_eq!(report[1].total_revenue, 125.0);
    }

    #[test]
    fn test_top_products_limit_and_ties() {
        let dataset = Dataset::new();
        dataset.sales().extend([
            sale(1, 1, 1, "B", "East", "2024-01-01", 1, 0.0, 100.0, None),
            sale(2, 1, 2, "A", "East", "2024-01-01", 1, 0.0, 100.0, None),
            sale(3, 1, 3, "C", "East", "2024-01-01", 1, 0.0, 50.0, None),
        ]);
        let report = top_products(&dataset, 2);
        // Equal revenue ties break on the product name.
        assert_eq!(report[0].product_name, "A");
        assert_eq!(report[1].product_name, "B");
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_top_provinces() {
        let dataset = test_dataset();
        let report = top_provinces(&dataset, DEFAULT_TOP_LIMIT);
        assert_eq!(report[0].province, "East");
        assert_eq!(report[0].total_revenue, 600.0);
        assert_eq!(report[1].province, "West");
        assert_eq!(report[1].total_revenue, 125.0);
    }

    #[test]
    fn test_monthly_trend_requires_normalized_dates() {
        let dataset = test_dataset();
        assert!(monthly_trend(&dataset).is_err());

        crate::cleaning::normalize_sale_dates(dataset.sales()).unwrap();
        let report = monthly_trend(&dataset).unwrap();
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].month, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(report[0].total_revenue, 300.0);
        assert_eq!(report[1].month, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(report[1].total_revenue, 350.0);
        assert_eq!(report[2].total_revenue, 75.0);
    }

    #[test]
    fn test_inventory_profit_ranking() {
        let dataset = test_dataset();
        let report = inventory_profit(&dataset, DEFAULT_PROFIT_LIMIT);
        assert_eq!(report.len(), 3);
        // Widget: 10.0 * 50 = 500; Gadget: 25.0 * 10 = 250; Sprocket: 0.
        assert_eq!(report[0].product_name, "Widget");
        assert_eq!(report[0].projected_profit, 500.0);
        assert_eq!(report[1].projected_profit, 250.0);
        assert_eq!(report[2].projected_profit, 0.0);
    }

    #[test]
    fn test_customer_lifetime_value_inner_join() {
        let dataset = test_dataset();
        let report = customer_lifetime_value(&dataset);
        // Customer 99 has no profile row and is dropped by the join.
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].customer_id, 2);
        assert_eq!(report[0].lifetime_value, 350.0);
        assert_eq!(report[0].city.as_deref(), Some("Halifax"));
        assert_eq!(report[1].customer_id, 1);
        assert_eq!(report[1].lifetime_value, 300.0);
    }

    #[test]
    fn test_discount_impact_rounds_to_two_decimals() {
        let dataset = test_dataset();
        let report = discount_impact(&dataset);
        // 0.10, 0.101, 0.104 collapse into the 0.10 band.
        let band = report.iter().find(|b| b.discount == 0.10).unwrap();
        assert_eq!(band.num_sales, 3);
        assert_eq!(band.total_revenue, 600.0);

        // Ascending by rate.
        let rates: Vec<f64> = report.iter().map(|b| b.discount).collect();
        assert_eq!(rates, vec![0.0, 0.10, 0.25]);
    }

    #[test]
    fn test_low_stock_high_demand() {
        let dataset = test_dataset();
        let report = low_stock_high_demand(&dataset);
        // Widget: 20 on hand, 12 units sold. Gadget has plenty of stock;
        // Sprocket is low but has no sales rows to join against.
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].product_name, "Widget");
        assert_eq!(report[0].units_sold, 12);
        assert_eq!(report[0].stock_available, 20);
    }

    #[test]
    fn test_satisfaction_threshold_is_strict() {
        let dataset = Dataset::new();
        // "Popular" gets 11 ratings, "Borderline" exactly 10.
        for i in 0..11 {
            dataset.sales().insert(sale(
                i, 1, 1, "Popular", "East", "2024-01-01", 1, 0.0, 10.0,
                Some(4.2),
            ));
        }
        for i in 11..21 {
            dataset.sales().insert(sale(
                i, 1, 2, "Borderline", "East", "2024-01-01", 1, 0.0, 10.0,
                Some(5.0),
            ));
        }

        let report = satisfaction_by_product(&dataset);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].product_name, "Popular");
        assert!((report[0].avg_satisfaction - 4.2).abs() < 1e-9);
        assert_eq!(report[0].num_ratings, 11);
    }

    #[test]
    fn test_reports_tolerate_empty_dataset() {
        let dataset = Dataset::new();
        assert!(top_products(&dataset, DEFAULT_TOP_LIMIT).is_empty());
        assert!(top_provinces(&dataset, DEFAULT_TOP_LIMIT).is_empty());
        assert!(monthly_trend(&dataset).unwrap().is_empty());
        assert!(inventory_profit(&dataset, DEFAULT_PROFIT_LIMIT).is_empty());
        assert!(customer_lifetime_value(&dataset).is_empty());
        assert!(discount_impact(&dataset).is_empty());
        assert!(low_stock_high_demand(&dataset).is_empty());
        assert!(satisfaction_by_product(&dataset).is_empty());
    }
}
