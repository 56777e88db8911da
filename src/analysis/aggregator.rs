//! Sales aggregation and statistics.
//!
//! This module scans the sales records once to find the top-revenue model,
//! the best-selling model and the most popular model year, and turns the
//! records into the table shown in the PDF report.
//!
//! Tie policy: for revenue and sales the first record seen keeps the lead
//! (a later record must be strictly greater). For the popular year the
//! smallest year wins among equal totals.

use super::price::{parse_price, PriceFormat};
use crate::error::ReportError;
use crate::models::{CarInfo, ReportTable, RevenueLeader, SalesRecord, SalesSummary, TableRow};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

/// Format a car as `"{make} {model} ({year})"`.
pub fn format_car(car: &CarInfo) -> String {
    car.to_string()
}

/// Compute the sales summary in a single pass over `records`.
pub fn process_data(
    records: &[SalesRecord],
    format: &PriceFormat,
) -> Result<SalesSummary, ReportError> {
    let mut max_revenue: Option<RevenueLeader> = None;
    let mut max_sales: Option<&SalesRecord> = None;
    let mut sales_by_year: BTreeMap<i32, u64> = BTreeMap::new();

    for record in records {
        let price = parse_price(&record.price, format)?;
        let revenue = price
            .checked_mul(Decimal::from(record.total_sales))
            .ok_or_else(|| ReportError::Format {
                origin: format!("record {}", record.id),
                reason: "revenue overflows a decimal".to_string(),
            })?;

        if max_revenue
            .as_ref()
            .map_or(true, |leader| revenue > leader.revenue)
        {
            max_revenue = Some(RevenueLeader {
                record: record.clone(),
                revenue,
            });
        }

        if max_sales.map_or(true, |leader| record.total_sales > leader.total_sales) {
            max_sales = Some(record);
        }

        let year_total = sales_by_year.entry(record.car.car_year).or_default();
        *year_total = year_total
            .checked_add(record.total_sales)
            .ok_or_else(|| ReportError::Format {
                origin: format!("year {}", record.car.car_year),
                reason: "sales total overflows".to_string(),
            })?;
    }

    let (Some(max_revenue), Some(max_sales)) = (max_revenue, max_sales) else {
        return Err(ReportError::EmptyInput);
    };
    let (most_popular_year, popular_year_sales) =
        most_popular_year(&sales_by_year).ok_or(ReportError::EmptyInput)?;

    debug!(
        "Summary: revenue leader id={}, sales leader id={}, popular year {}",
        max_revenue.record.id, max_sales.id, most_popular_year
    );

    Ok(SalesSummary {
        max_revenue,
        max_sales: max_sales.clone(),
        most_popular_year,
        popular_year_sales,
        sales_by_year,
    })
}

/// Pick the year with the highest total; the smallest year wins ties.
pub fn most_popular_year(sales_by_year: &BTreeMap<i32, u64>) -> Option<(i32, u64)> {
    sales_by_year
        .iter()
        .fold(None, |best, (&year, &total)| match best {
            Some((_, best_total)) if total <= best_total => best,
            _ => Some((year, total)),
        })
}

/// Build the report table: one row per record, in input order.
pub fn cars_to_table(records: &[SalesRecord]) -> ReportTable {
    ReportTable {
        rows: records
            .iter()
            .map(|record| TableRow {
                id: record.id,
                car: format_car(&record.car),
                price: record.price.clone(),
                total_sales: record.total_sales,
            })
            .collect(),
    }
}
