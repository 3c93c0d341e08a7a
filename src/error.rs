use std::num::{ParseFloatError, ParseIntError};

use crate::config::ConfigBuilderError;
use crate::features::FeatureError;
use crate::stationboard::error::StationboardError;

#[derive(thiserror::Error, Debug)]
pub enum OevError {
    #[error("Stationboard error: {0}")]
    Stationboard(#[from] StationboardError),

    #[error("Feature data error: {0}")]
    Features(#[from] FeatureError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ParseIntError> for OevError {
    fn from(value: ParseIntError) -> Self {
        OevError::Config(value.to_string())
    }
}

impl From<ParseFloatError> for OevError {
    fn from(value: ParseFloatError) -> Self {
        OevError::Config(value.to_string())
    }
}

impl From<ConfigBuilderError> for OevError {
    fn from(value: ConfigBuilderError) -> Self {
        OevError::Config(value.to_string())
    }
}

impl From<OevError> for std::io::Error {
    fn from(e: OevError) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::Other, e)
    }
}

pub type OevResult<T> = Result<T, OevError>;
