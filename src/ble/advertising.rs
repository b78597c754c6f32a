//! Advertising data parsing.
//!
//! Parses the manufacturer-specific advertisement frame the hood broadcasts.
//! Unlike the status characteristic, all values here are raw bytes:
//!
//! - bytes 0..8: fixed announce tag `HOODFJAR`
//! - byte 8: fan speed
//! - byte 9: after-cooking fan speed
//! - byte 10: bit 0 light on, bit 1 after-cooking on, bit 2 periodic venting on
//! - byte 11: bit 0 grease filter full, bit 1 carbon filter full,
//!   bit 2 carbon filter available
//! - byte 13: dim level (valid range 0-100)
//! - byte 14: periodic venting interval (valid range 0-59)

use crate::ble::uuids::ANNOUNCE_PREFIX;

/// Minimum length of a full advertisement frame, announce tag included.
const MIN_SIZE: usize = 15;

/// Fields decoded from a hood advertisement frame.
///
/// Numeric values are raw as broadcast; range validation against the
/// previous state happens when the update is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvertisementData {
    /// Current fan speed.
    pub fan_speed: u8,
    /// Fan speed used for the after-cooking run-on.
    pub after_cooking_fan_speed: u8,
    /// Whether the LED light is on.
    pub light_on: bool,
    /// Whether after-cooking ventilation is running.
    pub after_cooking_on: bool,
    /// Whether periodic venting is enabled.
    pub periodic_venting_on: bool,
    /// Whether the grease filter needs cleaning.
    pub grease_filter_full: bool,
    /// Whether the carbon filter needs replacing.
    pub carbon_filter_full: bool,
    /// Whether a carbon filter is fitted.
    pub carbon_filter_available: bool,
    /// Dim level as broadcast.
    pub dim_level: u8,
    /// Periodic venting interval as broadcast.
    pub periodic_venting: u8,
}

impl AdvertisementData {
    /// Parse a full advertisement frame.
    ///
    /// Returns `None` when the frame is too short or does not start with the
    /// announce tag; a foreign frame is not an error, merely not applicable.
    pub fn parse(frame: &[u8]) -> Option<Self> {
        if frame.len() < MIN_SIZE || frame[0..8] != ANNOUNCE_PREFIX {
            return None;
        }

        Some(Self {
            fan_speed: frame[8],
            after_cooking_fan_speed: frame[9],
            light_on: bit_test(frame[10], 0),
            after_cooking_on: bit_test(frame[10], 1),
            periodic_venting_on: bit_test(frame[10], 2),
            grease_filter_full: bit_test(frame[11], 0),
            carbon_filter_full: bit_test(frame[11], 1),
            carbon_filter_available: bit_test(frame[11], 2),
            dim_level: frame[13],
            periodic_venting: frame[14],
        })
    }
}

/// Recover a full advertisement frame from a manufacturer data payload.
///
/// The hood breaks the BLE standard by letting the first two bytes of the
/// announce tag be consumed as the manufacturer identifier, so the payload
/// handed over by the platform starts at the third tag byte. This prepends
/// them again so [`AdvertisementData::parse`] sees the whole frame.
pub fn reconstruct_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(2 + payload.len());
    frame.extend_from_slice(&ANNOUNCE_PREFIX[0..2]);
    frame.extend_from_slice(payload);
    frame
}

fn bit_test(value: u8, bit: u8) -> bool {
    value & (1 << bit) != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frame(bytes: &[u8]) -> Vec<u8> {
        let mut data = b"HOODFJAR".to_vec();
        data.extend_from_slice(bytes);
        data
    }

    #[test]
    fn test_parse_full_frame() {
        //                    fan ac  b10   b11   --  dim per
        let data = frame(&[2, 1, 0b101, 0b110, 0, 35, 10]);
        let parsed = AdvertisementData::parse(&data).unwrap();

        assert_eq!(
            parsed,
            AdvertisementData {
                fan_speed: 2,
                after_cooking_fan_speed: 1,
                light_on: true,
                after_cooking_on: false,
                periodic_venting_on: true,
                grease_filter_full: false,
                carbon_filter_full: true,
                carbon_filter_available: true,
                dim_level: 35,
                periodic_venting: 10,
            }
        );
    }

    #[test]
    fn test_parse_wrong_prefix() {
        let mut data = frame(&[2, 1, 0, 0, 0, 35, 10]);
        data[0] = b'X';
        assert_eq!(AdvertisementData::parse(&data), None);
    }

    #[test]
    fn test_parse_too_short() {
        assert_eq!(AdvertisementData::parse(b"HOODFJAR"), None);
        assert_eq!(AdvertisementData::parse(b""), None);
    }

    #[test]
    fn test_reconstruct_frame() {
        let payload = b"ODFJAR\x02\x01\x00\x00\x00\x23\x0a";
        let full = reconstruct_frame(payload);
        assert!(full.starts_with(b"HOODFJAR"));
        assert!(AdvertisementData::parse(&full).is_some());
    }

    #[test]
    fn test_bit_test() {
        assert!(bit_test(0b0000_0001, 0));
        assert!(bit_test(0b0000_0100, 2));
        assert!(!bit_test(0b0000_0100, 0));
    }
}
