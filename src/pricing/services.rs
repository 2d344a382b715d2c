//! Quote engine: resolution plus pricing over a repository snapshot.
//!
//! These functions resolve reference data (offerings, service classes, labor
//! rates, exchange rates) and feed the pure calculators. The quote aggregate
//! is owned by the caller and passed in explicitly; the engine itself holds
//! no session state beyond its repository reference.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::Result;
use crate::refdata::Repository;

use super::calculators::{
    self, aggregate, labor_line_cost, months_between, round_money, service_line_cost, to_local,
    LaborCostInput, ServiceCostInput,
};
use super::models::{Currency, LineDetail, MarkupRates, Quote, QuoteLine};
use super::requests::{LaborLineRequest, NewQuoteRequest, ServiceLineRequest};
use super::responses::{Money, QuoteLineResponse, QuoteSummaryResponse};

/// Pricing operations over one repository snapshot
pub struct QuoteEngine<'a> {
    repo: &'a Repository,
}

impl<'a> QuoteEngine<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        QuoteEngine { repo }
    }

    /// Open a quote. Country and risk level must exist; the risk level's
    /// contingency seeds the markup rates (stored as a percentage, so a 0.03
    /// fraction becomes 3).
    pub fn create_quote(&self, request: &NewQuoteRequest) -> Result<Quote> {
        let country = self.repo.country(&request.country)?;
        let risk = self.repo.risk_level(&request.risk_level)?;
        let markups = MarkupRates {
            administration: request.administration_pct,
            contingency: risk.contingency * Decimal::ONE_HUNDRED,
            unforeseen: request.unforeseen_pct,
        };
        Ok(Quote::new(
            request.id.clone(),
            country.name.clone(),
            request.currency,
            risk.name.clone(),
            markups,
        ))
    }

    /// Price a service line and append it to the quote's ledger.
    ///
    /// Hard failures: unknown offering, unknown service class, or a class
    /// scoped to a different country. Returns the priced line.
    pub fn add_service_line(
        &self,
        quote: &mut Quote,
        request: &ServiceLineRequest,
    ) -> Result<QuoteLine> {
        let offering = self.repo.offering(&request.offering)?;
        let class = self.repo.service_class(&request.service_class, &quote.country)?;
        let exchange_rate = self.repo.exchange_rate(&quote.country);
        let duration_months = months_between(request.start_date, request.end_date);

        let cost = service_line_cost(&ServiceCostInput {
            unit_cost_usd: request.unit_cost_usd,
            unit_cost_local: request.unit_cost_local,
            quantity: request.quantity,
            duration_months,
            uplift: class.uplift,
            exchange_rate,
        });
        debug!(
            quote = %quote.id,
            offering = %offering.name,
            total_usd = %cost.total_usd,
            "service line priced"
        );

        let line = QuoteLine {
            detail: LineDetail::Service {
                offering: offering.name.clone(),
                classification: offering.classification.clone(),
                service_class: class.name.clone(),
                uplift: class.uplift,
                quantity: request.quantity,
                unit_cost_usd: request.unit_cost_usd,
                unit_cost_local: request.unit_cost_local,
            },
            duration_months,
            total_usd: cost.total_usd,
            total_local: cost.total_local,
        };
        quote.push_line(line.clone());
        Ok(line)
    }

    /// Price a labor line and append it to the quote's ledger.
    ///
    /// A missing rate for the (category, country) pair is a coverage gap and
    /// prices to zero with `covered: false`; only an unknown category fails.
    pub fn add_labor_line(
        &self,
        quote: &mut Quote,
        request: &LaborLineRequest,
    ) -> Result<QuoteLine> {
        let category = self.repo.labor_category(&request.category)?;
        let resolved = self.repo.labor_rate(&category.name, &quote.country)?;
        let rate_local = resolved.unwrap_or(Decimal::ZERO);
        let exchange_rate = self.repo.exchange_rate(&quote.country);
        let duration_months = months_between(request.start_date, request.end_date);

        let cost = labor_line_cost(&LaborCostInput {
            rate_local,
            hours: request.hours,
            duration_months,
            exchange_rate,
        });
        debug!(
            quote = %quote.id,
            category = %category.name,
            covered = resolved.is_some(),
            total_usd = %cost.total_usd,
            "labor line priced"
        );

        let line = QuoteLine {
            detail: LineDetail::Labor {
                category: category.name.clone(),
                rate_local,
                covered: resolved.is_some(),
                hours: request.hours,
            },
            duration_months,
            total_usd: cost.total_usd,
            total_local: cost.total_local,
        };
        quote.push_line(line.clone());
        Ok(line)
    }

    /// Recompute the full summary from the line sequence.
    ///
    /// Direct cost and markups are computed in canonical USD and converted to
    /// the display currency once, at the end; the display figures are never
    /// accumulated per currency.
    pub fn summarize(&self, quote: &Quote) -> QuoteSummaryResponse {
        let exchange_rate = self.repo.exchange_rate(&quote.country);
        let usd_totals: Vec<Decimal> = quote.lines().iter().map(|l| l.total_usd).collect();
        let totals = aggregate(&usd_totals, &quote.markups);

        let display = |amount_usd: Decimal| -> Money {
            let amount = match quote.currency {
                Currency::Usd => amount_usd,
                Currency::Local => to_local(amount_usd, exchange_rate),
            };
            Money::in_currency(round_money(amount, 2), quote.currency)
        };

        let lines = quote
            .lines()
            .iter()
            .map(|line| {
                let total_display = match quote.currency {
                    Currency::Usd => line.total_usd,
                    Currency::Local => line.total_local,
                };
                QuoteLineResponse {
                    kind: line.kind(),
                    detail: line.detail.clone(),
                    duration_months: line.duration_months,
                    total_usd: Money::usd(round_money(line.total_usd, 2)),
                    total_local: Money::local(round_money(line.total_local, 2)),
                    total_display: Money::in_currency(
                        round_money(total_display, 2),
                        quote.currency,
                    ),
                }
            })
            .collect();

        QuoteSummaryResponse {
            quote_id: quote.id.clone(),
            country: quote.country.clone(),
            currency: quote.currency,
            risk_level: quote.risk_level.clone(),
            lines,
            direct_cost: display(totals.direct_cost),
            administration: display(totals.administration),
            contingency: display(totals.contingency),
            unforeseen: display(totals.unforeseen),
            grand_total: display(totals.grand_total),
        }
    }

    /// Aggregate totals in canonical USD, without presentation rounding
    pub fn totals(&self, quote: &Quote) -> calculators::QuoteTotals {
        let usd_totals: Vec<Decimal> = quote.lines().iter().map(|l| l.total_usd).collect();
        aggregate(&usd_totals, &quote.markups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::refdata::{RawTables, RepositoryConfig};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn repo() -> Repository {
        let tables: RawTables = serde_json::from_value(serde_json::json!({
            "countries": [
                {"country": "Colombia", "exchange_rate": "4,000"},
                {"country": "Ecuador", "exchange_rate": "7000"},
                {"country": "Brazil", "exchange_rate": "5.25"}
            ],
            "risk": [
                {"risk": "Low", "contingency": "3%"},
                {"risk": "High", "contingency": "12%"}
            ],
            "offerings": [
                {"offering": "Managed Hosting", "classification": "A1"},
                {"offering": "Monitoring", "classification": "B2"}
            ],
            "slc": [
                {"slc": "Standard", "uplift": "1.0"},
                {"slc": "Premium", "uplift": "1.1"},
                {"slc": "Enterprise-BR", "uplift": "1.5", "scope": "Brazil"}
            ],
            "labor_categories": [
                {"category": "Machine Operator"},
                {"category": "Project Manager"}
            ],
            "machine_rates": [
                {"selector": "Machine Operator", "Colombia": "50,000"}
            ],
            "band_rates": [
                {"selector": "Project Manager", "Colombia": "8,000,000"}
            ]
        }))
        .unwrap();
        Repository::load(&tables, &RepositoryConfig::default()).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_quote(repo: &Repository, currency: Currency) -> Quote {
        QuoteEngine::new(repo)
            .create_quote(&NewQuoteRequest {
                id: "COT-001".to_string(),
                country: "Colombia".to_string(),
                currency,
                risk_level: "Low".to_string(),
                administration_pct: Decimal::ZERO,
                unforeseen_pct: Decimal::ZERO,
            })
            .unwrap()
    }

    #[test]
    fn test_create_quote_seeds_contingency_from_risk() {
        let repo = repo();
        let quote = new_quote(&repo, Currency::Usd);
        assert_eq!(quote.markups.contingency, dec!(3.00));
        assert_eq!(quote.markups.administration, Decimal::ZERO);
    }

    #[test]
    fn test_create_quote_unknown_country_fails() {
        let repo = repo();
        let err = QuoteEngine::new(&repo)
            .create_quote(&NewQuoteRequest {
                id: "COT-002".to_string(),
                country: "Atlantis".to_string(),
                currency: Currency::Usd,
                risk_level: "Low".to_string(),
                administration_pct: Decimal::ZERO,
                unforeseen_pct: Decimal::ZERO,
            })
            .unwrap_err();
        assert_eq!(err, EngineError::UnknownCountry("Atlantis".to_string()));
    }

    #[test]
    fn test_service_line_scenario_660() {
        // unit_usd=100, qty=2, 3 months, uplift=1.1 => 660 USD
        let repo = repo();
        let engine = QuoteEngine::new(&repo);
        let mut quote = new_quote(&repo, Currency::Usd);

        let line = engine
            .add_service_line(
                &mut quote,
                &ServiceLineRequest {
                    offering: "Managed Hosting".to_string(),
                    service_class: "Premium".to_string(),
                    quantity: 2,
                    start_date: date(2024, 1, 10),
                    end_date: date(2024, 4, 20),
                    unit_cost_usd: dec!(100),
                    unit_cost_local: Decimal::ZERO,
                },
            )
            .unwrap();

        assert_eq!(line.duration_months, 3);
        assert_eq!(line.total_usd, dec!(660.0));
        assert_eq!(quote.lines().len(), 1);
    }

    #[test]
    fn test_service_line_unknown_offering() {
        let repo = repo();
        let engine = QuoteEngine::new(&repo);
        let mut quote = new_quote(&repo, Currency::Usd);
        let err = engine
            .add_service_line(
                &mut quote,
                &ServiceLineRequest {
                    offering: "Time Travel".to_string(),
                    service_class: "Standard".to_string(),
                    quantity: 1,
                    start_date: date(2024, 1, 1),
                    end_date: date(2024, 2, 1),
                    unit_cost_usd: dec!(10),
                    unit_cost_local: Decimal::ZERO,
                },
            )
            .unwrap_err();
        assert_eq!(err, EngineError::UnknownOffering("Time Travel".to_string()));
        assert!(quote.lines().is_empty());
    }

    #[test]
    fn test_service_line_scoped_class_rejected_elsewhere() {
        let repo = repo();
        let engine = QuoteEngine::new(&repo);
        let mut quote = new_quote(&repo, Currency::Usd);
        let err = engine
            .add_service_line(
                &mut quote,
                &ServiceLineRequest {
                    offering: "Monitoring".to_string(),
                    service_class: "Enterprise-BR".to_string(),
                    quantity: 1,
                    start_date: date(2024, 1, 1),
                    end_date: date(2024, 2, 1),
                    unit_cost_usd: dec!(10),
                    unit_cost_local: Decimal::ZERO,
                },
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::ServiceClassNotOffered { .. }));
    }

    #[test]
    fn test_labor_line_scenario_200_usd() {
        // rate=50000 local, 8 hours, 2 months => 800000 local, 200 USD at 4000
        let repo = repo();
        let engine = QuoteEngine::new(&repo);
        let mut quote = new_quote(&repo, Currency::Usd);

        let line = engine
            .add_labor_line(
                &mut quote,
                &LaborLineRequest {
                    category: "Machine Operator".to_string(),
                    hours: 8,
                    start_date: date(2024, 3, 1),
                    end_date: date(2024, 5, 1),
                },
            )
            .unwrap();

        assert_eq!(line.total_local, dec!(800000));
        assert_eq!(line.total_usd, dec!(200));
        match &line.detail {
            LineDetail::Labor { covered, rate_local, .. } => {
                assert!(*covered);
                assert_eq!(*rate_local, dec!(50000));
            }
            other => panic!("expected labor detail, got {other:?}"),
        }
    }

    #[test]
    fn test_labor_line_coverage_gap_prices_zero() {
        // Machine Operator has no Brazil column in either table
        let repo = repo();
        let engine = QuoteEngine::new(&repo);
        let mut quote = QuoteEngine::new(&repo)
            .create_quote(&NewQuoteRequest {
                id: "COT-003".to_string(),
                country: "Brazil".to_string(),
                currency: Currency::Usd,
                risk_level: "Low".to_string(),
                administration_pct: Decimal::ZERO,
                unforeseen_pct: Decimal::ZERO,
            })
            .unwrap();

        let line = engine
            .add_labor_line(
                &mut quote,
                &LaborLineRequest {
                    category: "Machine Operator".to_string(),
                    hours: 40,
                    start_date: date(2024, 1, 1),
                    end_date: date(2024, 7, 1),
                },
            )
            .unwrap();

        assert_eq!(line.total_usd, Decimal::ZERO);
        match &line.detail {
            LineDetail::Labor { covered, .. } => assert!(!covered),
            other => panic!("expected labor detail, got {other:?}"),
        }
    }

    #[test]
    fn test_summarize_recomputes_after_removal() {
        let repo = repo();
        let engine = QuoteEngine::new(&repo);
        let mut quote = new_quote(&repo, Currency::Usd);
        quote.set_markups(MarkupRates::default());

        for cost in [dec!(100), dec!(200)] {
            engine
                .add_service_line(
                    &mut quote,
                    &ServiceLineRequest {
                        offering: "Monitoring".to_string(),
                        service_class: "Standard".to_string(),
                        quantity: 1,
                        start_date: date(2024, 1, 1),
                        end_date: date(2024, 1, 20),
                        unit_cost_usd: cost,
                        unit_cost_local: Decimal::ZERO,
                    },
                )
                .unwrap();
        }
        assert_eq!(engine.totals(&quote).direct_cost, dec!(300));

        quote.remove_line(0);
        assert_eq!(engine.totals(&quote).direct_cost, dec!(200));
    }

    #[test]
    fn test_summarize_display_derived_from_canonical_usd() {
        let repo = repo();
        let engine = QuoteEngine::new(&repo);
        let mut quote = new_quote(&repo, Currency::Local);
        quote.set_markups(MarkupRates {
            administration: dec!(10),
            contingency: dec!(5),
            unforeseen: Decimal::ZERO,
        });

        engine
            .add_service_line(
                &mut quote,
                &ServiceLineRequest {
                    offering: "Managed Hosting".to_string(),
                    service_class: "Standard".to_string(),
                    quantity: 1,
                    start_date: date(2024, 1, 1),
                    end_date: date(2024, 2, 1),
                    unit_cost_usd: dec!(250),
                    unit_cost_local: Decimal::ZERO,
                },
            )
            .unwrap();

        let summary = engine.summarize(&quote);
        // 250 USD * 4000 = 1,000,000 local; markups on top of that
        assert_eq!(summary.direct_cost.amount, dec!(1000000.00));
        assert_eq!(summary.direct_cost.currency, "Local");
        assert_eq!(summary.administration.amount, dec!(100000.00));
        assert_eq!(summary.contingency.amount, dec!(50000.00));
        assert_eq!(summary.grand_total.amount, dec!(1150000.00));
        assert_eq!(summary.lines[0].total_display.currency, "Local");
    }

    #[test]
    fn test_summarize_empty_quote_is_all_zero() {
        let repo = repo();
        let engine = QuoteEngine::new(&repo);
        let quote = new_quote(&repo, Currency::Usd);
        let summary = engine.summarize(&quote);
        assert_eq!(summary.direct_cost.amount, Decimal::ZERO);
        assert_eq!(summary.contingency.amount, Decimal::ZERO);
        assert_eq!(summary.grand_total.amount, Decimal::ZERO);
        assert!(summary.lines.is_empty());
    }
}
