//! Quotation pricing module.
//!
//! Pure calculators plus the service layer that resolves reference data and
//! maintains the quote's line ledger. Consumed by the caller-side UI, which
//! supplies structured requests and renders the structured responses.

pub mod calculators;
pub mod models;
pub mod requests;
pub mod responses;
pub mod services;

// Re-export commonly used items
pub use calculators::{months_between, round_money, to_local, to_usd};
pub use models::{Currency, MarkupRates, Quote, QuoteLine};
pub use responses::{Money, QuoteLineResponse, QuoteSummaryResponse};
pub use services::QuoteEngine;
