//! BLE communication module.
//!
//! This module provides low-level Bluetooth Low Energy functionality
//! for discovering and communicating with IDEAL LED hoods.

pub mod advertising;
pub mod connection;
pub mod filter;
pub mod link;
pub mod scanner;
pub mod uuids;

pub use advertising::AdvertisementData;
pub use connection::{ConnectionGuard, ConnectionManager};
pub use filter::device_filter;
pub use link::{BleLink, RadioLink};
pub use scanner::BleScanner;
pub use uuids::*;
