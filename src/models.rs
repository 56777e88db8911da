//! Data models for the sales report.
//!
//! This module contains the records read from the sales JSON file and the
//! values derived from them for the summary, the PDF table and the email.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Column titles of the report table, in order.
pub const TABLE_HEADER: [&str; 4] = ["ID", "Car", "Price", "Total Sales"];

/// Make, model and year of a car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarInfo {
    /// Manufacturer, e.g. "Toyota".
    pub car_make: String,
    /// Model name, e.g. "Corolla".
    pub car_model: String,
    /// Model year.
    pub car_year: i32,
}

impl fmt::Display for CarInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.car_make, self.car_model, self.car_year)
    }
}

/// One entry of the sales data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Record identifier.
    pub id: u64,
    /// The car this record describes.
    pub car: CarInfo,
    /// Unit price as written in the file, currency symbol included (e.g. "$18731.76").
    pub price: String,
    /// Number of units sold.
    pub total_sales: u64,
}

/// The record that produced the highest revenue, with that revenue.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueLeader {
    /// The winning record.
    pub record: SalesRecord,
    /// `total_sales * price` for the record.
    pub revenue: Decimal,
}

/// Statistics computed from one pass over the sales records.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesSummary {
    /// Record with the greatest revenue (first seen wins ties).
    pub max_revenue: RevenueLeader,
    /// Record with the greatest `total_sales` (first seen wins ties).
    pub max_sales: SalesRecord,
    /// Year with the highest accumulated sales (smallest year wins ties).
    pub most_popular_year: i32,
    /// Accumulated sales for [`Self::most_popular_year`].
    pub popular_year_sales: u64,
    /// Summed `total_sales` per `car_year`.
    pub sales_by_year: BTreeMap<i32, u64>,
}

impl SalesSummary {
    /// The three human-readable summary lines.
    pub fn lines(&self, currency_symbol: &str) -> Vec<String> {
        vec![
            format!(
                "The {} generated the most revenue: {}{}",
                self.max_revenue.record.car, currency_symbol, self.max_revenue.revenue
            ),
            format!(
                "The {} had the most sales: {}",
                self.max_sales.car, self.max_sales.total_sales
            ),
            format!(
                "The most popular year was {} with {} sales.",
                self.most_popular_year, self.popular_year_sales
            ),
        ]
    }
}

/// One data row of the report table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: u64,
    pub car: String,
    pub price: String,
    pub total_sales: u64,
}

impl TableRow {
    /// Cell texts in column order.
    pub fn cells(&self) -> [String; 4] {
        [
            self.id.to_string(),
            self.car.clone(),
            self.price.clone(),
            self.total_sales.to_string(),
        ]
    }
}

/// Tabular view of the sales data: a fixed header followed by one row per record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTable {
    /// Data rows in input order.
    pub rows: Vec<TableRow>,
}

impl ReportTable {
    /// All rows as text, header first.
    pub fn to_cells(&self) -> Vec<[String; 4]> {
        std::iter::once(TABLE_HEADER.map(String::from))
            .chain(self.rows.iter().map(TableRow::cells))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn corolla() -> CarInfo {
        CarInfo {
            car_make: "Toyota".to_string(),
            car_model: "Corolla".to_string(),
            car_year: 2020,
        }
    }

    #[test]
    fn test_car_display() {
        assert_eq!(corolla().to_string(), "Toyota Corolla (2020)");
    }

    #[test]
    fn test_record_deserialize() {
        let json = r#"{
            "id": 7,
            "car": {"car_make": "Toyota", "car_model": "Corolla", "car_year": 2020},
            "price": "$18731.76",
            "total_sales": 1062,
            "color": "red"
        }"#;

        let record: SalesRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.car, corolla());
        assert_eq!(record.price, "$18731.76");
        assert_eq!(record.total_sales, 1062);
    }

    #[test]
    fn test_record_missing_key_is_rejected() {
        let json = r#"{"id": 1, "price": "$1.00", "total_sales": 1}"#;
        assert!(serde_json::from_str::<SalesRecord>(json).is_err());
    }

    #[test]
    fn test_summary_lines() {
        let record = SalesRecord {
            id: 1,
            car: corolla(),
            price: "$100.00".to_string(),
            total_sales: 5,
        };
        let summary = SalesSummary {
            max_revenue: RevenueLeader {
                record: record.clone(),
                revenue: Decimal::from_str("500.00").unwrap(),
            },
            max_sales: record,
            most_popular_year: 2020,
            popular_year_sales: 5,
            sales_by_year: [(2020, 5)].into_iter().collect(),
        };

        assert_eq!(
            summary.lines("$"),
            vec![
                "The Toyota Corolla (2020) generated the most revenue: $500.00",
                "The Toyota Corolla (2020) had the most sales: 5",
                "The most popular year was 2020 with 5 sales.",
            ]
        );
    }

    #[test]
    fn test_table_cells_start_with_header() {
        let table = ReportTable {
            rows: vec![TableRow {
                id: 1,
                car: "Toyota Corolla (2020)".to_string(),
                price: "$100.00".to_string(),
                total_sales: 5,
            }],
        };

        let cells = table.to_cells();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0], ["ID", "Car", "Price", "Total Sales"]);
        assert_eq!(cells[1], ["1", "Toyota Corolla (2020)", "$100.00", "5"]);
    }
}
