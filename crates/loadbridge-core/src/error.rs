use thiserror::Error;

/// Errors surfaced by loadbridge operations.
///
/// Device SDK failures carry only the SDK's own description text, looked
/// up from the failing status code at the call site and passed through
/// verbatim. Validation failures are raised before any SDK call is made.
#[derive(Error, Debug)]
pub enum Error {
    /// A device SDK call returned a failure status.
    #[error("{0}")]
    Sdk(String),

    /// A raw gain value reported by the SDK is not one of the supported steps.
    #[error("Invalid gain value: {0}")]
    InvalidGain(i32),

    /// A raw attachment status reported by the SDK is neither detached nor attached.
    #[error("Invalid device status: {0}")]
    InvalidStatus(i32),
}

impl Error {
    /// Create an SDK failure from the SDK's description text.
    pub fn sdk(description: impl Into<String>) -> Self {
        Self::Sdk(description.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdk_error_passes_description_through() {
        let error = Error::sdk("Device not attached");
        assert!(matches!(error, Error::Sdk(_)));
        assert_eq!(error.to_string(), "Device not attached");
    }

    #[test]
    fn test_invalid_gain_display() {
        let error = Error::InvalidGain(7);
        assert_eq!(error.to_string(), "Invalid gain value: 7");
    }

    #[test]
    fn test_invalid_status_display() {
        let error = Error::InvalidStatus(3);
        assert_eq!(error.to_string(), "Invalid device status: 3");
    }
}
