//! Tolerant numeric parsing for reference-table cells.
//!
//! Spreadsheet exports arrive with inconsistent formatting: thousands
//! separators ("1,234.5"), surrounding quotes ("\"4,000\""), stray whitespace
//! and trailing percent signs ("3%"). Every loader path goes through this one
//! grammar so no table gets its own ad-hoc cleansing.

use rust_decimal::Decimal;

/// Strip surrounding whitespace and one matching pair of quotes.
fn unquote(raw: &str) -> &str {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')));
    stripped.unwrap_or(trimmed).trim()
}

/// Parse a decimal that may carry thousands separators.
///
/// Grammar: optional surrounding quotes, optional `,` group separators and
/// interior spaces, then a plain decimal literal. Returns `None` when the
/// remainder is empty or not a number; the caller picks the fallback policy.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = unquote(raw)
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<Decimal>().ok()
}

/// Parse a percentage cell ("3%", "12.5", "'10 %'") into a fraction.
///
/// A single trailing `%` is accepted and the value is divided by 100 either
/// way, so "3%" and "3" both yield 0.03.
pub fn parse_percent(raw: &str) -> Option<Decimal> {
    let unquoted = unquote(raw);
    let body = unquoted.strip_suffix('%').unwrap_or(unquoted);
    parse_decimal(body).map(|v| v / Decimal::ONE_HUNDRED)
}
