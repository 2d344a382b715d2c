//! Request DTOs for quote operations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::models::Currency;

/// Request to open a new quote
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuoteRequest {
    pub id: String,
    pub country: String,
    pub currency: Currency,
    pub risk_level: String,
    /// Administration markup percentage (10 = 10%)
    #[serde(default, with = "rust_decimal::serde::str")]
    pub administration_pct: Decimal,
    /// Unforeseen-costs markup percentage
    #[serde(default, with = "rust_decimal::serde::str")]
    pub unforeseen_pct: Decimal,
}

/// Request to price and append a service line
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceLineRequest {
    pub offering: String,
    pub service_class: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub unit_cost_usd: Decimal,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub unit_cost_local: Decimal,
}

/// Request to price and append a labor line
#[derive(Debug, Clone, Deserialize)]
pub struct LaborLineRequest {
    pub category: String,
    pub hours: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn default_quantity() -> u32 {
    1
}
