//! Error types for the tax engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine can report: missing or malformed tax-year
//! configuration, and monthly incomes the pipeline refuses to process.

use thiserror::Error;

/// The main error type for the tax engine.
///
/// All fallible operations in the engine return this error type. Every
/// variant is terminal for the current operation; no partial breakdown is
/// ever produced alongside one.
///
/// # Example
///
/// ```
/// use colombia_tax_engine::error::EngineError;
///
/// let error = EngineError::ConfigurationNotFound { year: 2019 };
/// assert_eq!(error.to_string(), "No tax configuration found for year 2019");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// No tax-year record exists for the requested year.
    #[error("No tax configuration found for year {year}")]
    ConfigurationNotFound {
        /// The year that was requested.
        year: i32,
    },

    /// Configuration file or directory was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A tax-year record parsed but breaks one of the table invariants.
    #[error("Invalid tax configuration for year {year}: {message}")]
    InvalidConfiguration {
        /// The year of the offending record.
        year: i32,
        /// A description of the broken invariant.
        message: String,
    },

    /// The monthly income is not a positive amount the pipeline can process.
    #[error("Invalid income '{input}': {message}")]
    InvalidIncome {
        /// The rejected input, as given by the caller.
        input: String,
        /// Why the input was rejected.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_not_found_displays_year() {
        let error = EngineError::ConfigurationNotFound { year: 2030 };
        assert_eq!(error.to_string(), "No tax configuration found for year 2030");
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/tax_years".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/tax_years"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/2025.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/2025.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_configuration_displays_year_and_message() {
        let error = EngineError::InvalidConfiguration {
            year: 2025,
            message: "brackets must start at 0".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid tax configuration for year 2025: brackets must start at 0"
        );
    }

    #[test]
    fn test_invalid_income_displays_input_and_message() {
        let error = EngineError::InvalidIncome {
            input: "-5".to_string(),
            message: "must be greater than zero".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid income '-5': must be greater than zero"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_configuration_not_found() -> EngineResult<()> {
            Err(EngineError::ConfigurationNotFound { year: 1999 })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_configuration_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
