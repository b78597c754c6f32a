//! Status characteristic parsing.
//!
//! The payload read (or notified) from the control characteristic is a
//! keycode-prefixed, mostly ASCII-encoded record:
//!
//! - bytes 0..4: 4-byte keycode (format/authenticity check, not security)
//! - byte 4: fan speed as an ASCII digit
//! - byte 5: `'L'` when the light is on
//! - byte 6: `'N'` when after-cooking ventilation is running
//! - byte 7: `'C'` when a carbon filter is fitted
//! - byte 8: `'F'` when the grease filter needs cleaning
//! - byte 9: `'K'` when the carbon filter needs replacing
//! - bytes 10..13: dim level as 3 ASCII decimal digits
//! - bytes 13..15: periodic venting interval as 2 ASCII decimal digits
//!
//! The ASCII encoding here versus the raw bytes in the advertisement frame
//! is an asymmetry dictated by the device firmware.

use crate::error::{Error, Result};

/// Minimum length of a status payload.
const MIN_SIZE: usize = 15;

/// Fields decoded from a status characteristic payload.
///
/// Numeric values are raw as decoded; range validation against the previous
/// state happens when the update is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacteristicData {
    /// Current fan speed (single digit).
    pub fan_speed: u8,
    /// Whether the LED light is on.
    pub light_on: bool,
    /// Whether after-cooking ventilation is running.
    pub after_cooking_on: bool,
    /// Whether a carbon filter is fitted.
    pub carbon_filter_available: bool,
    /// Whether the grease filter needs cleaning.
    pub grease_filter_full: bool,
    /// Whether the carbon filter needs replacing.
    pub carbon_filter_full: bool,
    /// Dim level as transmitted (valid range 0-100).
    pub dim_level: u16,
    /// Periodic venting interval as transmitted (valid range 0-59).
    pub periodic_venting: u8,
}

impl CharacteristicData {
    /// Parse a status payload, verifying the keycode prefix.
    ///
    /// # Errors
    ///
    /// - [`Error::KeycodeMismatch`] when the first 4 bytes do not equal
    ///   `keycode`; the caller should log and drop the payload.
    /// - [`Error::DecodeFormat`] when the payload is truncated or carries
    ///   non-digit bytes in a numeric field.
    pub fn parse(data: &[u8], keycode: &[u8; 4]) -> Result<Self> {
        if data.len() < 4 || &data[0..4] != keycode {
            return Err(Error::KeycodeMismatch);
        }

        if data.len() < MIN_SIZE {
            return Err(Error::DecodeFormat {
                context: format!(
                    "status payload too short: {} bytes (need at least {})",
                    data.len(),
                    MIN_SIZE
                ),
            });
        }

        Ok(Self {
            fan_speed: ascii_number(&data[4..5], "fan speed")? as u8,
            light_on: data[5] == b'L',
            after_cooking_on: data[6] == b'N',
            carbon_filter_available: data[7] == b'C',
            grease_filter_full: data[8] == b'F',
            carbon_filter_full: data[9] == b'K',
            dim_level: ascii_number(&data[10..13], "dim level")? as u16,
            periodic_venting: ascii_number(&data[13..15], "periodic venting")? as u8,
        })
    }
}

/// Decode a fixed-width ASCII decimal field.
fn ascii_number(digits: &[u8], field: &str) -> Result<u32> {
    let mut value = 0u32;
    for &byte in digits {
        match byte {
            b'0'..=b'9' => value = value * 10 + u32::from(byte - b'0'),
            _ => {
                return Err(Error::DecodeFormat {
                    context: format!("non-digit byte {byte:#04x} in {field}"),
                })
            }
        }
    }
    Ok(value)
}
