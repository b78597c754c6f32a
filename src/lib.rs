// Allow unusual byte groupings for UUIDs which have standard format
#![allow(clippy::unusual_byte_groupings)]

//! # ideal-led-ble
//!
//! A cross-platform Rust library for communicating with IDEAL LED kitchen
//! hood controllers (LED light, exhaust fan, filter sensors) via Bluetooth
//! Low Energy.
//!
//! The hood reports its state over two independent channels that this
//! library merges into one [`State`] snapshot:
//!
//! - a keycode-prefixed status characteristic, readable (and notifying)
//!   only while connected
//! - a `HOODFJAR`-tagged manufacturer advertisement frame, broadcast
//!   passively and decodable without a connection
//!
//! The physical connection is shared: any number of logical operations can
//! hold it at once, the first holder opens it and the last release closes
//! it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ideal_led_ble::{BleScanner, Command, Device, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Discover hoods
//!     let scanner = BleScanner::new().await?;
//!     scanner.start_scanning().await?;
//!     let mut discoveries = scanner.subscribe();
//!
//!     let discovery = discoveries.recv().await.expect("no hood found");
//!     scanner.stop_scanning().await?;
//!
//!     let device = Device::new(discovery.identifier.clone(), discovery.peripheral);
//!
//!     // Connect, refresh state, switch the light on
//!     let connection = device.connect().await?;
//!     let state = device.update(&connection).await?;
//!     println!("Fan speed: {}, light on: {}", state.fan_speed, state.light_on);
//!
//!     device.send_command(&connection, Command::LightOn).await?;
//!     connection.release().await;
//!
//!     Ok(())
//! }
//! ```
//!
//! Passive updates need no connection at all: feed advertisement frames to
//! [`Device::handle_manufacturer_data`] as the platform delivers them.
//!
//! ## Platform Notes
//!
//! ### macOS
//! Requires Bluetooth permission. Add `NSBluetoothAlwaysUsageDescription`
//! to your Info.plist for bundled apps.
//!
//! ### Linux
//! Requires BlueZ. User may need to be in the `bluetooth` group.
//!
//! ### Windows
//! Requires Windows 10 or later with Bluetooth LE support.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for data types

// Public modules
pub mod ble;
pub mod device;
pub mod error;
pub mod protocol;
pub mod state;

// Re-exports for convenience
pub use ble::connection::{ConnectionGuard, ConnectionManager};
pub use ble::filter::device_filter;
pub use ble::link::{BleLink, RadioLink};
pub use ble::scanner::{BleScanner, DiscoveryEvent};
pub use device::Device;
pub use error::{Error, Result};
pub use protocol::Command;
pub use state::State;

// Re-export commonly used types from submodules
pub use ble::advertising::AdvertisementData;
pub use ble::uuids::{
    ANNOUNCE_MANUFACTURER_ID, ANNOUNCE_PREFIX, CHARACTERISTIC_RX_UUID, DEVICE_NAME, SERVICE_UUID,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that key types are exported
        let _ = std::any::TypeId::of::<Device>();
        let _ = std::any::TypeId::of::<State>();
        let _ = std::any::TypeId::of::<Error>();
        let _ = std::any::TypeId::of::<Command>();
        let _ = std::any::TypeId::of::<AdvertisementData>();
    }

    #[test]
    fn test_default_state_is_zeroed() {
        let state = State::default();
        assert!(!state.light_on);
        assert_eq!(state.fan_speed, 0);
        assert_eq!(state.dim_level, 0);
        assert_eq!(state.rssi, 0);
    }
}
