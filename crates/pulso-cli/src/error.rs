use pulso_core::{ConfigError, DashboardError, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid symbol or no data available for '{symbol}'")]
    UnknownSymbol { symbol: String },

    #[error("could not load initial market data: {reason}")]
    MarketDataUnavailable { reason: String },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<DashboardError> for CliError {
    fn from(error: DashboardError) -> Self {
        match error {
            DashboardError::Validation(error) => Self::Validation(error),
            DashboardError::UnknownSymbol { symbol } => Self::UnknownSymbol { symbol },
            DashboardError::MarketDataUnavailable { reason } => {
                Self::MarketDataUnavailable { reason }
            }
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 2,
            Self::UnknownSymbol { .. } => 3,
            Self::Serialization(_) => 4,
            Self::MarketDataUnavailable { .. } => 6,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_errors_keep_their_exit_codes() {
        let unknown: CliError = DashboardError::UnknownSymbol {
            symbol: String::from("ZZZZ3.SA"),
        }
        .into();
        assert_eq!(unknown.exit_code(), 3);

        let unavailable: CliError = DashboardError::MarketDataUnavailable {
            reason: String::from("down"),
        }
        .into();
        assert_eq!(unavailable.exit_code(), 6);
        assert_eq!(
            unavailable.to_string(),
            "could not load initial market data: down"
        );

        let invalid: CliError = DashboardError::Validation(ValidationError::EmptySymbol).into();
        assert_eq!(invalid.exit_code(), 2);
    }
}
