//! Reference-data layer: raw table rows, tolerant parsing, and the
//! immutable repository the pricing layer resolves against.

pub mod models;
pub mod parse;
pub mod repository;

pub use models::{
    Country, CountryScope, LaborCategory, Offering, RateTable, RiskLevel, ServiceLevelClass,
};
pub use repository::{RawTables, Repository, RepositoryConfig, RepositoryHandle};
