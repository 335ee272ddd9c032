//! Error types for ddcvolume
//!
//! All modules use `DdcVolumeResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ddcvolume operations
pub type DdcVolumeResult<T> = Result<T, DdcVolumeError>;

/// All errors that can occur in ddcvolume
#[derive(Error, Debug)]
pub enum DdcVolumeError {
    // Input errors
    #[error("Invalid volume: {0}")]
    InvalidInput(String),

    // Device errors
    #[error("Failed to find i2c device: {name}")]
    DeviceNotFound { name: String },

    #[error("Failed to read volume from monitor: {0}")]
    HardwareRead(String),

    #[error("Failed to write volume to monitor: {0}")]
    HardwareWrite(String),

    // Notification errors
    #[error("Notification failed: {0}")]
    Notification(String),

    // State errors
    #[error("Timed out after {waited_ms}ms waiting for {key} lock")]
    LockTimeout { key: String, waited_ms: u64 },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl DdcVolumeError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidInput(_) => {
                Some("Use an absolute value like 40 or a relative change like +5 / -5")
            }
            Self::DeviceNotFound { .. } => {
                Some("Set device.bus in the config file or pass --bus <N>")
            }
            Self::HardwareRead(_) | Self::HardwareWrite(_) => {
                Some("Check that ddcutil is installed (or pass --ddcutil) and i2c-dev is loaded")
            }
            Self::LockTimeout { .. } => Some("Another ddcvolume process is holding the lock"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DdcVolumeError::DeviceNotFound {
            name: "Radeon i2c bit bus 0x92".to_string(),
        };
        assert!(err.to_string().contains("Failed to find i2c device"));
        assert!(err.to_string().contains("0x92"));
    }

    #[test]
    fn error_hint() {
        let err = DdcVolumeError::InvalidInput("abc".to_string());
        assert!(err.hint().unwrap().contains("+5"));

        let err = DdcVolumeError::Notification("no bus".to_string());
        assert_eq!(err.hint(), None);
    }

    #[test]
    fn lock_timeout_display() {
        let err = DdcVolumeError::LockTimeout {
            key: "volume".to_string(),
            waited_ms: 250,
        };
        assert_eq!(
            err.to_string(),
            "Timed out after 250ms waiting for volume lock"
        );
    }
}
