//! Core pricing calculation functions.
//!
//! Pure functions for the quotation math - no repository access. Everything
//! here is a function of its inputs; resolution of rates, uplifts and
//! categories happens in the service layer before these are called.

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::models::MarkupRates;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
/// Rounding is presentation-only: internal totals keep full precision.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use lacost_engine::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Billable months between two dates, floored at 1.
///
/// `(end.year - start.year) * 12 + (end.month - start.month)` with
/// day-of-month ignored. The floor is a billing rule, not input validation:
/// a same-month or inverted range still bills one month.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let span =
        (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);
    span.max(1) as u32
}

/// Convert a USD amount to local currency.
pub fn to_local(amount_usd: Decimal, exchange_rate: Decimal) -> Decimal {
    amount_usd * exchange_rate
}

/// Convert a local-currency amount to USD.
///
/// Guarded division: a zero rate returns the amount unchanged instead of
/// raising, so a missing/degenerate rate never blocks a quote.
pub fn to_usd(amount_local: Decimal, exchange_rate: Decimal) -> Decimal {
    if exchange_rate.is_zero() {
        return amount_local;
    }
    amount_local / exchange_rate
}

/// A priced line in both currencies. The local figure is always derived from
/// the canonical USD total (or vice versa for labor), never accumulated
/// separately, so repeated conversion cannot drift.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCost {
    pub total_usd: Decimal,
    pub total_local: Decimal,
}

/// Input for a service line cost calculation
#[derive(Debug, Clone)]
pub struct ServiceCostInput {
    pub unit_cost_usd: Decimal,
    pub unit_cost_local: Decimal,
    pub quantity: u32,
    pub duration_months: u32,
    pub uplift: Decimal,
    pub exchange_rate: Decimal,
}

/// Service line total. Unit costs compose natively in USD:
///
/// ```text
/// cost_base_usd  = unit_usd + unit_local / rate      (guarded division)
/// line_total_usd = cost_base_usd * duration * quantity * uplift
/// ```
pub fn service_line_cost(input: &ServiceCostInput) -> LineCost {
    let cost_base_usd = input.unit_cost_usd + to_usd(input.unit_cost_local, input.exchange_rate);
    let total_usd = cost_base_usd
        * Decimal::from(input.duration_months)
        * Decimal::from(input.quantity)
        * input.uplift;
    LineCost {
        total_usd,
        total_local: to_local(total_usd, input.exchange_rate),
    }
}

/// Input for a labor line cost calculation
#[derive(Debug, Clone)]
pub struct LaborCostInput {
    /// Rate from the labor tables, in local currency; zero when the
    /// (category, country) pair has no coverage
    pub rate_local: Decimal,
    pub hours: u32,
    pub duration_months: u32,
    pub exchange_rate: Decimal,
}

/// Labor line total. Note the asymmetry with service lines: labor rates are
/// natively local-currency, so USD is the derived figure here.
///
/// ```text
/// base_total_local = rate * hours * duration
/// line_total_usd   = base_total_local / rate_er      (guarded division)
/// ```
pub fn labor_line_cost(input: &LaborCostInput) -> LineCost {
    let total_local =
        input.rate_local * Decimal::from(input.hours) * Decimal::from(input.duration_months);
    LineCost {
        total_usd: to_usd(total_local, input.exchange_rate),
        total_local,
    }
}

/// Aggregate totals for a quote, in one consistent currency
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteTotals {
    pub direct_cost: Decimal,
    pub administration: Decimal,
    pub contingency: Decimal,
    pub unforeseen: Decimal,
    pub grand_total: Decimal,
}

/// Sum line totals and apply the AIU markups.
///
/// Each markup is `direct_cost * pct / 100`; the grand total is the direct
/// cost plus all markup amounts. An empty line sequence yields all zeros.
pub fn aggregate(line_totals: &[Decimal], markups: &MarkupRates) -> QuoteTotals {
    let direct_cost: Decimal = line_totals.iter().copied().sum();
    let administration = direct_cost * markups.administration / Decimal::ONE_HUNDRED;
    let contingency = direct_cost * markups.contingency / Decimal::ONE_HUNDRED;
    let unforeseen = direct_cost * markups.unforeseen / Decimal::ONE_HUNDRED;
    QuoteTotals {
        direct_cost,
        administration,
        contingency,
        unforeseen,
        grand_total: direct_cost + administration + contingency + unforeseen,
    }
}
