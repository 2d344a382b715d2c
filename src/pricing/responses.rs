//! Presentation DTOs for computed quotes.
//!
//! The only place two-decimal rounding happens: internal arithmetic stays at
//! full precision and these types are built last, from the canonical figures.

use rust_decimal::Decimal;
use serde::Serialize;

use super::models::{Currency, LineDetail, LineKind};

/// Money value for presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Money {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl Money {
    pub fn usd(amount: Decimal) -> Self {
        Money {
            amount,
            currency: "USD".to_string(),
        }
    }

    pub fn local(amount: Decimal) -> Self {
        Money {
            amount,
            currency: "Local".to_string(),
        }
    }

    pub fn in_currency(amount: Decimal, currency: Currency) -> Self {
        match currency {
            Currency::Usd => Money::usd(amount),
            Currency::Local => Money::local(amount),
        }
    }
}

/// One priced line: kind, resolved inputs and totals in both currencies
#[derive(Debug, Clone, Serialize)]
pub struct QuoteLineResponse {
    pub kind: LineKind,
    pub detail: LineDetail,
    pub duration_months: u32,
    pub total_usd: Money,
    pub total_local: Money,
    /// Total in the quote's display currency
    pub total_display: Money,
}

/// Full quote summary: per-line figures plus the markup breakdown, all in the
/// requested display currency
#[derive(Debug, Clone, Serialize)]
pub struct QuoteSummaryResponse {
    pub quote_id: String,
    pub country: String,
    pub currency: Currency,
    pub risk_level: String,
    pub lines: Vec<QuoteLineResponse>,
    pub direct_cost: Money,
    pub administration: Money,
    pub contingency: Money,
    pub unforeseen: Money,
    pub grand_total: Money,
}
