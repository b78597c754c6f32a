//! BLE identity constants for IDEAL LED hoods.
//!
//! Contains the service and characteristic UUIDs plus the advertisement
//! identity used to recognize and talk to the hood controller.

use uuid::Uuid;

/// IDEAL LED hood control service UUID.
pub const SERVICE_UUID: Uuid = Uuid::from_u128(0xd44bc438_abfd_45a2_b575_925416129600);

/// Status/command characteristic UUID (Read, Write, Notify).
///
/// The same endpoint carries the keycode-prefixed status payload and accepts
/// command writes.
pub const CHARACTERISTIC_RX_UUID: Uuid = Uuid::from_u128(0xd44bc439_abfd_45a2_b575_925416129600);

/// Local name the hood advertises.
pub const DEVICE_NAME: &str = "IDEAL_LED";

/// Fixed 8-byte tag prefixing every manufacturer advertisement frame.
pub const ANNOUNCE_PREFIX: [u8; 8] = *b"HOODFJAR";

/// Manufacturer ID the hood advertises under.
///
/// The firmware bends the standard here: the first two bytes of
/// [`ANNOUNCE_PREFIX`] end up as the little-endian manufacturer identifier,
/// so the payload delivered by the platform is missing them.
pub const ANNOUNCE_MANUFACTURER_ID: u16 =
    u16::from_le_bytes([ANNOUNCE_PREFIX[0], ANNOUNCE_PREFIX[1]]);

/// Default 4-byte keycode prefixing characteristic payloads.
pub const DEFAULT_KEYCODE: [u8; 4] = *b"1234";

/// Check if a service UUID indicates an IDEAL LED hood.
pub fn is_hood_service(uuid: &Uuid) -> bool {
    *uuid == SERVICE_UUID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_format() {
        let service = SERVICE_UUID.to_string();
        assert!(service.starts_with("d44bc438"));

        let characteristic = CHARACTERISTIC_RX_UUID.to_string();
        assert!(characteristic.starts_with("d44bc439"));
    }

    #[test]
    fn test_manufacturer_id_derived_from_prefix() {
        // "HO" little-endian
        assert_eq!(ANNOUNCE_MANUFACTURER_ID, 0x4F48);
        assert_eq!(
            ANNOUNCE_MANUFACTURER_ID.to_le_bytes(),
            [ANNOUNCE_PREFIX[0], ANNOUNCE_PREFIX[1]]
        );
    }

    #[test]
    fn test_is_hood_service() {
        assert!(is_hood_service(&SERVICE_UUID));
        assert!(!is_hood_service(&CHARACTERISTIC_RX_UUID));
    }
}
