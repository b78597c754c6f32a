//! Error types for the ideal-led-ble crate.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Bluetooth-related error from the underlying BLE library.
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),

    /// Bluetooth is not available or is disabled on this system.
    #[error("Bluetooth not available or disabled")]
    BluetoothUnavailable,

    /// Establishing the physical connection did not complete in time.
    #[error("Timeout on connect")]
    ConnectTimeout,

    /// Reading the status characteristic did not complete in time.
    #[error("Timeout on read")]
    ReadTimeout,

    /// Writing a command did not complete in time.
    #[error("Timeout on write")]
    WriteTimeout,

    /// Operation requires a connection but the device is not connected.
    #[error("Device not connected")]
    NotConnected,

    /// Characteristic not found on the device.
    #[error("Characteristic not found: {uuid}")]
    CharacteristicNotFound {
        /// The UUID of the characteristic that was not found.
        uuid: String,
    },

    /// A characteristic payload did not carry the expected keycode prefix.
    ///
    /// This is not a fatal condition: callers log the payload and drop it,
    /// leaving the previous state untouched.
    #[error("Wrong keycode in characteristic data")]
    KeycodeMismatch,

    /// A characteristic payload carried malformed ASCII where fixed-width
    /// decimal digits were expected. Unlike out-of-range values (which fall
    /// back to the previous reading) this indicates a protocol or firmware
    /// mismatch and is surfaced to the caller.
    #[error("Malformed characteristic data: {context}")]
    DecodeFormat {
        /// Description of what was malformed about the data.
        context: String,
    },
}

impl Error {
    /// Check whether this error is one of the bounded-wait timeouts.
    ///
    /// Timeouts are retryable by the caller; the crate itself never retries.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectTimeout | Self::ReadTimeout | Self::WriteTimeout
        )
    }
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_timeout() {
        assert!(Error::ConnectTimeout.is_timeout());
        assert!(Error::ReadTimeout.is_timeout());
        assert!(Error::WriteTimeout.is_timeout());
        assert!(!Error::NotConnected.is_timeout());
        assert!(!Error::KeycodeMismatch.is_timeout());
    }

    #[test]
    fn test_display() {
        let err = Error::DecodeFormat {
            context: "non-digit fan speed".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Malformed characteristic data: non-digit fan speed"
        );
    }
}
