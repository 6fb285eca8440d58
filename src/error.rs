//! Engine error type
//!
//! Deliberately small: the weather tiers degrade instead of failing, so the
//! fallible surface is trip-input validation and configuration loading.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackcastError {
    /// Rejected configuration file or threshold combination
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Rejected trip input (empty segment list, reversed dates)
    #[error("invalid input: {message}")]
    Validation { message: String },

    /// Failed filesystem access, e.g. a missing config file
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PackcastError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_message() {
        let err = PackcastError::validation("end date precedes start date");
        assert_eq!(err.to_string(), "invalid input: end date precedes start date");

        let err = PackcastError::config("heavy_rain_chance below rain_chance");
        assert!(err.to_string().starts_with("configuration error:"));
    }

    #[test]
    fn test_io_errors_convert() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: PackcastError = io_err.into();
        assert!(matches!(err, PackcastError::Io { .. }));
        assert!(err.to_string().contains("no such file"));
    }
}
