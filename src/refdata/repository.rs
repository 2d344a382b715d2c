//! Reference-data repository: table loading and lookups.
//!
//! `Repository::load` turns raw table rows into fully-parsed, immutable
//! lookup maps. The load is all-or-nothing: a hard parse error (malformed
//! contingency or uplift) aborts it and no partial repository exists.
//! Exchange rates follow the opposite policy and fail open to 1.0 so a
//! session can always quote something; every fallback is logged.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{EngineError, Result};

use super::models::{
    Country, CountryRecord, CountryScope, LaborCategory, LaborCategoryRecord, LaborRateRecord,
    Offering, OfferingRecord, RateTable, RiskLevel, RiskRecord, ServiceLevelClass, SlcRecord,
};
use super::parse;

/// The full set of raw reference tables for one load
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTables {
    #[serde(default)]
    pub countries: Vec<CountryRecord>,
    #[serde(default)]
    pub risk: Vec<RiskRecord>,
    #[serde(default)]
    pub offerings: Vec<OfferingRecord>,
    #[serde(default)]
    pub slc: Vec<SlcRecord>,
    #[serde(default)]
    pub labor_categories: Vec<LaborCategoryRecord>,
    #[serde(default)]
    pub machine_rates: Vec<LaborRateRecord>,
    #[serde(default)]
    pub band_rates: Vec<LaborRateRecord>,
}

/// Load-time policy knobs
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Countries whose exchange rate is pinned to 1.0 regardless of the
    /// table value (USD-pegged economies)
    pub usd_pegged: HashSet<String>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        let mut usd_pegged = HashSet::new();
        usd_pegged.insert("Ecuador".to_string());
        RepositoryConfig { usd_pegged }
    }
}

/// Immutable reference-data snapshot
///
/// Lookups are exact-match and case-sensitive on the stored key. Unknown keys
/// are hard errors except where a fallback is documented on the method.
#[derive(Debug, Clone)]
pub struct Repository {
    countries: HashMap<String, Country>,
    risk_levels: HashMap<String, RiskLevel>,
    offerings: HashMap<String, Offering>,
    service_classes: HashMap<String, ServiceLevelClass>,
    labor_categories: HashMap<String, LaborCategory>,
    machine_rates: HashMap<(String, String), Decimal>,
    band_rates: HashMap<(String, String), Decimal>,
}

impl Repository {
    /// Build a repository from raw tables. Either every table parses into
    /// place or an error is returned and nothing is retained.
    pub fn load(tables: &RawTables, config: &RepositoryConfig) -> Result<Repository> {
        let mut countries = HashMap::new();
        for record in &tables.countries {
            let rate = if config.usd_pegged.contains(&record.country) {
                debug!(country = %record.country, "USD-pegged country, exchange rate pinned to 1.0");
                Decimal::ONE
            } else {
                match parse::parse_decimal(&record.exchange_rate) {
                    Some(rate) => rate,
                    None => {
                        warn!(
                            country = %record.country,
                            raw = %record.exchange_rate,
                            "unparseable exchange rate, defaulting to 1.0"
                        );
                        Decimal::ONE
                    }
                }
            };
            countries.insert(
                record.country.clone(),
                Country {
                    name: record.country.clone(),
                    exchange_rate: rate,
                },
            );
        }

        let mut risk_levels = HashMap::new();
        for record in &tables.risk {
            let contingency = parse::parse_percent(&record.contingency)
                .filter(|f| *f >= Decimal::ZERO && *f <= Decimal::ONE)
                .ok_or_else(|| EngineError::MalformedPercent {
                    field: format!("risk[{}].contingency", record.risk),
                    value: record.contingency.clone(),
                })?;
            risk_levels.insert(
                record.risk.clone(),
                RiskLevel {
                    name: record.risk.clone(),
                    contingency,
                },
            );
        }

        let mut offerings = HashMap::new();
        for record in &tables.offerings {
            offerings.insert(
                record.offering.clone(),
                Offering {
                    name: record.offering.clone(),
                    classification: record.classification.clone(),
                },
            );
        }

        let mut service_classes = HashMap::new();
        for record in &tables.slc {
            let uplift = parse::parse_decimal(&record.uplift).ok_or_else(|| {
                EngineError::MalformedNumber {
                    field: format!("slc[{}].uplift", record.slc),
                    value: record.uplift.clone(),
                }
            })?;
            let scope = match record.scope.as_deref().map(str::trim) {
                Some(country) if !country.is_empty() => {
                    CountryScope::Country(country.to_string())
                }
                _ => CountryScope::Global,
            };
            service_classes.insert(
                record.slc.clone(),
                ServiceLevelClass {
                    name: record.slc.clone(),
                    uplift,
                    scope,
                },
            );
        }

        let mut labor_categories = HashMap::new();
        for record in &tables.labor_categories {
            labor_categories.insert(
                record.category.clone(),
                LaborCategory::from_name(&record.category),
            );
        }

        let machine_rates = Self::load_rate_table(&tables.machine_rates, "machine");
        let band_rates = Self::load_rate_table(&tables.band_rates, "band");

        info!(
            countries = countries.len(),
            risk_levels = risk_levels.len(),
            offerings = offerings.len(),
            service_classes = service_classes.len(),
            labor_categories = labor_categories.len(),
            "reference data loaded"
        );

        Ok(Repository {
            countries,
            risk_levels,
            offerings,
            service_classes,
            labor_categories,
            machine_rates,
            band_rates,
        })
    }

    fn load_rate_table(
        records: &[LaborRateRecord],
        table_name: &str,
    ) -> HashMap<(String, String), Decimal> {
        let mut rates = HashMap::new();
        for record in records {
            for (country, raw) in &record.rates {
                match parse::parse_decimal(raw) {
                    Some(rate) => {
                        rates.insert((record.selector.clone(), country.clone()), rate);
                    }
                    None => {
                        // Unparseable cell becomes a coverage gap, not a load failure
                        warn!(
                            table = table_name,
                            selector = %record.selector,
                            country = %country,
                            raw = %raw,
                            "unparseable labor rate cell, skipping"
                        );
                    }
                }
            }
        }
        rates
    }

    pub fn country(&self, name: &str) -> Result<&Country> {
        self.countries
            .get(name)
            .ok_or_else(|| EngineError::UnknownCountry(name.to_string()))
    }

    pub fn risk_level(&self, name: &str) -> Result<&RiskLevel> {
        self.risk_levels
            .get(name)
            .ok_or_else(|| EngineError::UnknownRiskLevel(name.to_string()))
    }

    pub fn offering(&self, name: &str) -> Result<&Offering> {
        self.offerings
            .get(name)
            .ok_or_else(|| EngineError::UnknownOffering(name.to_string()))
    }

    /// Resolve a service level class for the active country, applying the
    /// scope rule: unscoped classes are offered everywhere, scoped ones only
    /// where the country matches.
    pub fn service_class(&self, name: &str, country: &str) -> Result<&ServiceLevelClass> {
        let class = self
            .service_classes
            .get(name)
            .ok_or_else(|| EngineError::UnknownServiceClass(name.to_string()))?;
        if !class.scope.matches(country) {
            return Err(EngineError::ServiceClassNotOffered {
                name: name.to_string(),
                country: country.to_string(),
            });
        }
        Ok(class)
    }

    pub fn labor_category(&self, name: &str) -> Result<&LaborCategory> {
        self.labor_categories
            .get(name)
            .ok_or_else(|| EngineError::UnknownLaborCategory(name.to_string()))
    }

    /// Exchange rate for a country, fail-open: an unknown country resolves to
    /// 1.0 rather than blocking the session.
    pub fn exchange_rate(&self, country: &str) -> Decimal {
        match self.countries.get(country) {
            Some(c) => c.exchange_rate,
            None => {
                warn!(country, "no exchange rate on file, defaulting to 1.0");
                Decimal::ONE
            }
        }
    }

    /// Labor rate for a (category, country) pair. `Ok(None)` is a coverage
    /// gap — the category's table has no column for that country — and prices
    /// to zero downstream. Only an unknown category is an error.
    pub fn labor_rate(&self, category: &str, country: &str) -> Result<Option<Decimal>> {
        let cat = self.labor_category(category)?;
        let table = match cat.table {
            RateTable::Machine => &self.machine_rates,
            RateTable::Band => &self.band_rates,
        };
        let rate = table.get(&(cat.name.clone(), country.to_string())).copied();
        if rate.is_none() {
            debug!(category, country, "labor rate coverage gap, pricing as zero");
        }
        Ok(rate)
    }

    /// Service classes offered in the given country, for selection lists
    pub fn service_classes_for(&self, country: &str) -> Vec<&ServiceLevelClass> {
        let mut classes: Vec<_> = self
            .service_classes
            .values()
            .filter(|c| c.scope.matches(country))
            .collect();
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        classes
    }

    pub fn country_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.countries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn risk_level_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.risk_levels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn offering_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.offerings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Shared handle over the current repository snapshot.
///
/// Readers take an `Arc` and keep computing against a consistent table set
/// even while a reload is in flight. `reload` builds the new repository
/// completely before swapping, and a failed reload leaves the prior snapshot
/// in place.
pub struct RepositoryHandle {
    current: RwLock<Arc<Repository>>,
}

impl RepositoryHandle {
    pub fn new(repository: Repository) -> Self {
        RepositoryHandle {
            current: RwLock::new(Arc::new(repository)),
        }
    }

    pub fn snapshot(&self) -> Arc<Repository> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn reload(&self, tables: &RawTables, config: &RepositoryConfig) -> Result<()> {
        let fresh = Repository::load(tables, config)?;
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(fresh);
        Ok(())
    }
}
