//! Sales summary view.
//!
//! A derived grouping of sales by product and province. Nothing is cached:
//! every call re-derives from the current sales table, so the view is
//! always fresh.

use std::collections::HashMap;

use serde::Serialize;

use crate::Dataset;

/// One row of the product/region sales summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummaryRow {
    pub product_id: i64,
    pub product_name: String,
    pub province: String,
    pub total_sales: f64,
    /// Average over rated sales only; `None` when the group has no ratings.
    pub avg_satisfaction: Option<f64>,
    pub num_sales: usize,
}

#[derive(Default)]
struct Accumulator {
    total_sales: f64,
    rating_sum: f64,
    rating_count: usize,
    num_sales: usize,
}

/// Group current sales by (product_id, product_name, province), computing
/// total revenue, average satisfaction, and row count per group.
///
/// Output is ordered by (product_id, province) so repeated reads compare
/// equal.
pub fn sales_summary_by_product_region(dataset: &Dataset) -> Vec<SalesSummaryRow> {
    let mut groups: HashMap<(i64, String, String), Accumulator> = HashMap::new();
    dataset.sales().read_with(|rows| {
        for row in rows {
            let key = (
                row.record.product_id,
                row.record.product_name.clone(),
                row.record.province.clone(),
            );
            let acc = groups.entry(key).or_default();
            acc.total_sales += row.record.total_sale;
            acc.num_sales += 1;
            if let Some(rating) = row.record.satisfaction {
                acc.rating_sum += rating;
                acc.rating_count += 1;
            }
        }
    });

    let mut out: Vec<SalesSummaryRow> = groups
        .into_iter()
        .map(|((product_id, product_name, province), acc)| SalesSummaryRow {
            product_id,
            product_name,
            province,
            total_sales: acc.total_sales,
            avg_satisfaction: (acc.rating_count > 0)
                .then(|| acc.rating_sum / acc.rating_count as f64),
            num_sales: acc.num_sales,
        })
        .collect();
    out.sort_by(|a, b| {
        a.product_id
            .cmp(&b.product_id)
            .then_with(|| a.province.cmp(&b.province))
    });
    out
}
