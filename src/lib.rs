//! Quotation pricing engine.
//!
//! Computes per-line and aggregate totals for service proposals: reference
//! tables (exchange rates, risk contingencies, service level classes, labor
//! rates) feed currency conversion, duration arithmetic and the per-line cost
//! formulas, and an aggregator applies AIU-style markups to reach the grand
//! total. This crate is the computation core only; the consuming UI layer
//! supplies structured inputs and renders the structured outputs.

pub mod error;
pub mod pricing;
pub mod refdata;

pub use error::{EngineError, Result};
pub use pricing::round_money;
pub use pricing::services::QuoteEngine;
pub use refdata::repository::{Repository, RepositoryConfig, RepositoryHandle};
