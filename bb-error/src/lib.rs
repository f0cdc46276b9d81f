//! Unified error handling for the BeBoPr board layer
//!
//! This crate provides a single error type used across all board components.
//! It uses thiserror for ergonomic error definitions with proper Display and Error trait impls.

use std::io;
use std::path::PathBuf;

/// Result type alias using BoardError
pub type Result<T> = std::result::Result<T, BoardError>;

/// Unified error type for all board operations
#[derive(thiserror::Error, Debug)]
pub enum BoardError {
    // ============================================================================
    // I/O and File System Errors
    // ============================================================================
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: io::Error,
    },

    #[error("File too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    // ============================================================================
    // Platform Errors (fatal during pre_init)
    // ============================================================================
    #[error("Board is not compatible with running on kernel version '{release}'")]
    IncompatibleKernel { release: String },

    #[error("Unsupported hardware combination: {0}")]
    UnsupportedHardwareCombination(String),

    // ============================================================================
    // Subsystem Registration Errors (fatal during pre_init, first failure wins)
    // ============================================================================
    #[error("analog_config failed: {source}")]
    AnalogConfigFailed {
        source: Box<BoardError>,
    },

    #[error("temp_config failed: {source}")]
    TempConfigFailed {
        source: Box<BoardError>,
    },

    #[error("pwm_config failed: {source}")]
    PwmConfigFailed {
        source: Box<BoardError>,
    },

    #[error("heater_config failed: {source}")]
    HeaterConfigFailed {
        source: Box<BoardError>,
    },

    #[error("Subsystem rejected configuration: {0}")]
    Subsystem(String),

    // ============================================================================
    // Board Configuration Store Errors (non-fatal)
    // ============================================================================
    #[error("Failed to read stepper driver family from {path}: {reason}")]
    DriverFamilyRead {
        path: PathBuf,
        reason: String,
    },

    // ============================================================================
    // GPIO Errors
    // ============================================================================
    #[error("Failed to write GPIO file {path}: {source}")]
    GpioWrite {
        path: PathBuf,
        source: io::Error,
    },

    #[error(
        "I/O power sequence finished with {failures} failed GPIO write(s), first: {first}"
    )]
    PowerSequence {
        failures: usize,
        first: String,
    },

    // ============================================================================
    // Configuration and Profile Errors
    // ============================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid hardware profile: {0}")]
    InvalidProfile(String),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Generic(String),
}

impl BoardError {
    /// Create a generic error from a string
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }

    /// Create a config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a subsystem rejection error from a string
    pub fn subsystem(msg: impl Into<String>) -> Self {
        Self::Subsystem(msg.into())
    }

    /// Create an invalid profile error from a string
    pub fn invalid_profile(msg: impl Into<String>) -> Self {
        Self::InvalidProfile(msg.into())
    }

    /// Create an unsupported hardware combination error from a string
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedHardwareCombination(msg.into())
    }

    /// Create a driver family read error
    pub fn driver_family_read(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DriverFamilyRead {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors that must halt board start-up
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::IncompatibleKernel { .. }
                | Self::UnsupportedHardwareCombination(_)
                | Self::AnalogConfigFailed { .. }
                | Self::TempConfigFailed { .. }
                | Self::PwmConfigFailed { .. }
                | Self::HeaterConfigFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_errors_are_fatal() {
        let inner = BoardError::subsystem("no such device");
        let err = BoardError::PwmConfigFailed { source: Box::new(inner) };
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "pwm_config failed: Subsystem rejected configuration: no such device"
        );
    }

    #[test]
    fn test_driver_family_read_is_not_fatal() {
        let err = BoardError::driver_family_read("/tmp/eeprom", "unrecognized");
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("/tmp/eeprom"));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;
        let err = BoardError::AnalogConfigFailed {
            source: Box::new(BoardError::subsystem("bad")),
        };
        assert!(err.source().is_some());
    }
}
