//! Quote aggregate and line-item ledger.
//!
//! The quote is an explicit value owned by the caller; the engine never holds
//! ambient session state. Lines are immutable once priced and totals are
//! always recomputed from the full line sequence, so there is no cached or
//! partially-committed aggregate to go stale.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display currency requested for a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "Local")]
    Local,
}

/// AIU markup percentages applied on top of the direct cost
/// (e.g. `administration = 10` means 10%)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkupRates {
    #[serde(default)]
    pub administration: Decimal,
    #[serde(default)]
    pub contingency: Decimal,
    #[serde(default)]
    pub unforeseen: Decimal,
}

/// Kind discriminator for a priced line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Service,
    Labor,
}

/// The resolved inputs that produced a line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineDetail {
    Service {
        offering: String,
        classification: String,
        service_class: String,
        uplift: Decimal,
        quantity: u32,
        unit_cost_usd: Decimal,
        unit_cost_local: Decimal,
    },
    Labor {
        category: String,
        /// Resolved hourly rate in local currency; zero when uncovered
        rate_local: Decimal,
        /// False when the (category, country) pair had no rate on file and
        /// the line priced to zero — surfaced so the caller can flag it
        covered: bool,
        hours: u32,
    },
}

/// One priced item in the ledger, immutable once computed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteLine {
    #[serde(flatten)]
    pub detail: LineDetail,
    pub duration_months: u32,
    pub total_usd: Decimal,
    pub total_local: Decimal,
}

impl QuoteLine {
    pub fn kind(&self) -> LineKind {
        match self.detail {
            LineDetail::Service { .. } => LineKind::Service,
            LineDetail::Labor { .. } => LineKind::Labor,
        }
    }
}

/// A quotation under construction: identity, pricing context, the ordered
/// line ledger and the markup percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub id: String,
    pub country: String,
    pub currency: Currency,
    pub risk_level: String,
    pub markups: MarkupRates,
    lines: Vec<QuoteLine>,
}

impl Quote {
    pub fn new(
        id: impl Into<String>,
        country: impl Into<String>,
        currency: Currency,
        risk_level: impl Into<String>,
        markups: MarkupRates,
    ) -> Self {
        Quote {
            id: id.into(),
            country: country.into(),
            currency,
            risk_level: risk_level.into(),
            markups,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[QuoteLine] {
        &self.lines
    }

    /// Append a priced line to the ledger
    pub fn push_line(&mut self, line: QuoteLine) {
        self.lines.push(line);
    }

    /// Remove a whole line by position, preserving the order of the rest
    pub fn remove_line(&mut self, index: usize) -> Option<QuoteLine> {
        if index < self.lines.len() {
            Some(self.lines.remove(index))
        } else {
            None
        }
    }

    pub fn set_markups(&mut self, markups: MarkupRates) {
        self.markups = markups;
    }
}
