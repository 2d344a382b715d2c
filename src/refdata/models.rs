//! Reference-data records.
//!
//! Raw `*Record` types mirror the incoming table rows (whatever the caller
//! read them from: CSV export, API payload, test fixture) and deserialize
//! with serde. The remaining types are the loaded, already-parsed forms the
//! repository hands out.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Raw row of the countries table
#[derive(Debug, Clone, Deserialize)]
pub struct CountryRecord {
    pub country: String,
    /// Exchange rate as exported: may be quoted and comma-formatted
    pub exchange_rate: String,
}

/// Raw row of the risk table
#[derive(Debug, Clone, Deserialize)]
pub struct RiskRecord {
    pub risk: String,
    /// Contingency percentage string, e.g. "3%"
    pub contingency: String,
}

/// Raw row of the offering table
#[derive(Debug, Clone, Deserialize)]
pub struct OfferingRecord {
    pub offering: String,
    pub classification: String,
}

/// Raw row of the SLC table
#[derive(Debug, Clone, Deserialize)]
pub struct SlcRecord {
    pub slc: String,
    pub uplift: String,
    /// Country name this class is restricted to; absent means offered everywhere
    #[serde(default)]
    pub scope: Option<String>,
}

/// Raw row of the labor-categories table
#[derive(Debug, Clone, Deserialize)]
pub struct LaborCategoryRecord {
    pub category: String,
}

/// Raw row of a labor rate table: a selector key plus one numeric column per
/// country. The per-country columns are captured by the flattened map so the
/// country set never has to be declared up front.
#[derive(Debug, Clone, Deserialize)]
pub struct LaborRateRecord {
    pub selector: String,
    #[serde(flatten)]
    pub rates: BTreeMap<String, String>,
}

/// Country with its resolved exchange rate (local units per USD)
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub name: String,
    pub exchange_rate: Decimal,
}

/// Risk level with its contingency stored as a fraction in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct RiskLevel {
    pub name: String,
    pub contingency: Decimal,
}

/// Service offering reference entry
#[derive(Debug, Clone, PartialEq)]
pub struct Offering {
    pub name: String,
    pub classification: String,
}

/// Where a service level class may be sold
#[derive(Debug, Clone, PartialEq)]
pub enum CountryScope {
    /// Offered everywhere (the default set)
    Global,
    /// Offered only when the active country matches
    Country(String),
}

impl CountryScope {
    pub fn matches(&self, country: &str) -> bool {
        match self {
            CountryScope::Global => true,
            CountryScope::Country(name) => name == country,
        }
    }
}

/// Service level class: a named uplift multiplier for service costs
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceLevelClass {
    pub name: String,
    pub uplift: Decimal,
    pub scope: CountryScope,
}

/// Which labor rate table a category draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateTable {
    /// Machine/platform rates
    Machine,
    /// Band/default rates
    Band,
}

/// Labor category with its table selector resolved at load time
#[derive(Debug, Clone, PartialEq)]
pub struct LaborCategory {
    pub name: String,
    pub table: RateTable,
}

impl LaborCategory {
    /// Resolve the rate table from the category name. Machine and platform
    /// categories draw from the machine table; everything else uses the band
    /// table. Resolved once here, never re-derived during calculation.
    pub fn from_name(name: &str) -> Self {
        let lowered = name.to_lowercase();
        let table = if lowered.contains("machine") || lowered.contains("platform") {
            RateTable::Machine
        } else {
            RateTable::Band
        };
        LaborCategory {
            name: name.to_string(),
            table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_scope_global_matches_everything() {
        assert!(CountryScope::Global.matches("Colombia"));
        assert!(CountryScope::Global.matches("Brazil"));
    }

    #[test]
    fn test_country_scope_restricted() {
        let scope = CountryScope::Country("Brazil".to_string());
        assert!(scope.matches("Brazil"));
        assert!(!scope.matches("Colombia"));
        assert!(!scope.matches("brazil")); // case-sensitive like all lookups
    }

    #[test]
    fn test_labor_category_table_resolution() {
        assert_eq!(
            LaborCategory::from_name("Machine Operator").table,
            RateTable::Machine
        );
        assert_eq!(
            LaborCategory::from_name("Platform Support").table,
            RateTable::Machine
        );
        assert_eq!(
            LaborCategory::from_name("Project Manager").table,
            RateTable::Band
        );
    }

    #[test]
    fn test_labor_rate_record_flattens_country_columns() {
        let json = r#"{"selector": "B7", "Colombia": "4,500", "Peru": "3.70"}"#;
        let record: LaborRateRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.selector, "B7");
        assert_eq!(record.rates.get("Colombia").unwrap(), "4,500");
        assert_eq!(record.rates.get("Peru").unwrap(), "3.70");
    }
}
