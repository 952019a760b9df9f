use thiserror::Error;

/// Per-record failures raised by the engine.
///
/// Malformed values never surface here: the normalizer falls back to each
/// field's default instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("missing required field: {field}")]
    MissingRequiredField { field: &'static str },
}

/// Failure while loading layered configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid hour basis {0:?}; expected \"local\", \"utc\" or an offset like \"+02:00\"")]
    HourBasis(String),

    #[error("pipeline.workers must be at least 1")]
    NoWorkers,
}

pub type Result<T> = std::result::Result<T, EngineError>;
