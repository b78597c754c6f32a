//! Device filter.
//!
//! Classifies a discovered peripheral's advertised identity as an IDEAL LED
//! hood or not. Used both for active scan filtering and for classifying
//! unsolicited advertisement callbacks.

use std::collections::HashMap;

use uuid::Uuid;

use crate::ble::uuids::{is_hood_service, ANNOUNCE_MANUFACTURER_ID, ANNOUNCE_PREFIX, DEVICE_NAME};

/// Check whether an advertised identity belongs to an IDEAL LED hood.
///
/// Any one of three signals is sufficient: the hood service UUID is
/// advertised, the local name matches, or the manufacturer data entry for
/// the hood's manufacturer ID starts with the announce tag tail (the first
/// two tag bytes are the manufacturer ID itself).
pub fn device_filter(
    service_uuids: &[Uuid],
    local_name: Option<&str>,
    manufacturer_data: &HashMap<u16, Vec<u8>>,
) -> bool {
    if service_uuids.iter().any(is_hood_service) {
        return true;
    }

    if local_name == Some(DEVICE_NAME) {
        return true;
    }

    if let Some(data) = manufacturer_data.get(&ANNOUNCE_MANUFACTURER_ID) {
        if data.starts_with(&ANNOUNCE_PREFIX[2..]) {
            return true;
        }
    }

    false
}
