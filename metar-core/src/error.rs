use thiserror::Error;

/// Reasons a METAR observation can fail to decode.
///
/// Every variant is fatal to the decode call: no partial record is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Invalid METAR string, not enough parts ({found} < {required}) to be valid.")]
    TooFewTokens { found: usize, required: usize },

    #[error("Invalid station ID '{token}', should be {expected}.")]
    InvalidStation { token: String, expected: &'static str },

    #[error("Invalid date/time '{token}', should be {expected}.")]
    InvalidDateTime { token: String, expected: &'static str },

    #[error("Invalid wind speed/direction '{token}', should be {expected}.")]
    InvalidWind { token: String, expected: &'static str },

    #[error("Invalid visibility '{token}', should be {expected}.")]
    InvalidVisibility { token: String, expected: &'static str },

    #[error("Invalid altimeter '{token}', should be {expected}.")]
    InvalidAltimeter { token: String, expected: &'static str },

    #[error("Invalid temperature/dew point '{token}', should be {expected}.")]
    InvalidTemperature { token: String, expected: &'static str },
}

impl DecodeError {
    /// Name of the observation field that failed to decode.
    pub fn field(&self) -> &'static str {
        match self {
            DecodeError::TooFewTokens { .. } => "report",
            DecodeError::InvalidStation { .. } => "station_id",
            DecodeError::InvalidDateTime { .. } => "date_time",
            DecodeError::InvalidWind { .. } => "wind",
            DecodeError::InvalidVisibility { .. } => "visibility",
            DecodeError::InvalidAltimeter { .. } => "altimeter",
            DecodeError::InvalidTemperature { .. } => "temperature",
        }
    }

    /// The offending token, if the failure concerns a single token.
    pub fn token(&self) -> Option<&str> {
        match self {
            DecodeError::TooFewTokens { .. } => None,
            DecodeError::InvalidStation { token, .. }
            | DecodeError::InvalidDateTime { token, .. }
            | DecodeError::InvalidWind { token, .. }
            | DecodeError::InvalidVisibility { token, .. }
            | DecodeError::InvalidAltimeter { token, .. }
            | DecodeError::InvalidTemperature { token, .. } => Some(token),
        }
    }
}
