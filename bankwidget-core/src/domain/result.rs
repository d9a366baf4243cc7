//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Every pure operation fails with [`Error::InvalidInput`]; the message
/// carries the context (digit count, missing numeric tail, bad date...).
/// [`Error::Config`] only comes out of parsing setting values (card mask
/// style, parse mode, display format). File I/O and JSON failures while
/// loading settings are reported by `Config::load` through `anyhow`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors caused by the caller's data rather than settings
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let err = Error::invalid_input("card number must have 16 digits, got 3");
        assert!(err.is_invalid_input());
        assert_eq!(
            err.to_string(),
            "Invalid input: card number must have 16 digits, got 3"
        );
    }

    #[test]
    fn test_config_error_is_not_invalid_input() {
        let err = Error::config("unknown card mask style 'dots'");
        assert!(!err.is_invalid_input());
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_setting_values_fail_with_config_errors() {
        use crate::services::{CardMaskStyle, DateFormatter, ParseMode};

        let errors = [
            "dots".parse::<CardMaskStyle>().unwrap_err(),
            "lenient".parse::<ParseMode>().unwrap_err(),
            DateFormatter::new("%Y-%m-%d %z").unwrap_err(),
        ];
        for err in errors {
            assert!(matches!(err, Error::Config(_)), "unexpected {:?}", err);
        }
    }
}
