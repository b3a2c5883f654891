use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum PaddockError {
    #[error("{0}")]
    Error(String),
    #[error("Interval between readings must be positive, got {days} days")]
    InvalidInterval { days: i64 },
    #[error("No historical data for month {month}")]
    MissingHistoricalData { month: u32 },
    #[error("Invalid month {0}, expected a value between 1 and 12")]
    InvalidMonth(u32),
    #[error("Wrong series length. Expected {expected} values, got {actual}")]
    InvalidSeriesLength { expected: usize, actual: usize },
    #[error("Unknown plot {0}")]
    UnknownPlot(String),
    #[error("{service} request failed: {message}")]
    Service { service: String, message: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PaddockError {
    /// Wrap a collaborator failure with the name of the service that produced it.
    pub fn service(service: impl Into<String>, message: impl ToString) -> Self {
        PaddockError::Service {
            service: service.into(),
            message: message.to_string(),
        }
    }
}

/// Convenience type for `Result<T, PaddockError>`.
pub type PaddockResult<T> = Result<T, PaddockError>;
