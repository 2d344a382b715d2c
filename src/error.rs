//! Error handling for the pricing engine

/// Engine error type
///
/// Lookup variants carry the offending key so the caller can report exactly
/// which reference-data entry was missing. Parse variants are raised only
/// where the load policy is fail-closed (risk contingency, SLC uplift);
/// exchange rates and labor cells recover in-band and never surface here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Unknown country: {0}")]
    UnknownCountry(String),

    #[error("Unknown risk level: {0}")]
    UnknownRiskLevel(String),

    #[error("Unknown offering: {0}")]
    UnknownOffering(String),

    #[error("Unknown service level class: {0}")]
    UnknownServiceClass(String),

    #[error("Service level class '{name}' is not offered in {country}")]
    ServiceClassNotOffered { name: String, country: String },

    #[error("Unknown labor category: {0}")]
    UnknownLaborCategory(String),

    #[error("Malformed percentage in {field}: {value:?}")]
    MalformedPercent { field: String, value: String },

    #[error("Malformed number in {field}: {value:?}")]
    MalformedNumber { field: String, value: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
