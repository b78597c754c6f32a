//! Device state snapshot.
//!
//! [`State`] is an immutable value: every update decodes a payload and
//! derives a fresh snapshot from the previous one, so the published state is
//! replaced atomically and never mutated in place. The default value (all
//! zero/false) stands in until the first payload arrives.

use crate::ble::advertising::AdvertisementData;
use crate::error::Result;
use crate::protocol::characteristic::CharacteristicData;

/// Snapshot of the hood's state, merged from both payload sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State {
    /// Whether the LED light is on.
    pub light_on: bool,
    /// Fan speed used for the after-cooking run-on (advertisement only).
    pub after_cooking_fan_speed: u8,
    /// Whether after-cooking ventilation is running.
    pub after_cooking_on: bool,
    /// Whether a carbon filter is fitted.
    pub carbon_filter_available: bool,
    /// Current fan speed.
    pub fan_speed: u8,
    /// Whether the grease filter needs cleaning.
    pub grease_filter_full: bool,
    /// Whether the carbon filter needs replacing.
    pub carbon_filter_full: bool,
    /// Dim level, always within 0-100.
    pub dim_level: u8,
    /// Periodic venting interval in minutes, always within 0-59.
    pub periodic_venting: u8,
    /// Whether periodic venting is enabled (advertisement only).
    pub periodic_venting_on: bool,
    /// Signal strength in dBm, meaningful only from the advertisement source.
    pub rssi: i16,
}

impl State {
    /// Derive a new state from a status characteristic payload.
    ///
    /// Fields the payload does not carry (`after_cooking_fan_speed`,
    /// `periodic_venting_on`, `rssi`) keep their previous values.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::Error::KeycodeMismatch`] and
    /// [`crate::Error::DecodeFormat`] from parsing; the previous state is
    /// still valid in that case.
    pub fn apply_characteristic_update(&self, data: &[u8], keycode: &[u8; 4]) -> Result<Self> {
        let decoded = CharacteristicData::parse(data, keycode)?;

        Ok(Self {
            fan_speed: decoded.fan_speed,
            light_on: decoded.light_on,
            after_cooking_on: decoded.after_cooking_on,
            carbon_filter_available: decoded.carbon_filter_available,
            grease_filter_full: decoded.grease_filter_full,
            carbon_filter_full: decoded.carbon_filter_full,
            dim_level: range_check_dim(decoded.dim_level, self.dim_level),
            periodic_venting: range_check_period(decoded.periodic_venting, self.periodic_venting),
            ..*self
        })
    }

    /// Derive a new state from a broadcast advertisement frame.
    ///
    /// Returns `None` (state unchanged) for frames without the announce tag.
    ///
    /// A light-on reading is overridden back to off when the light was
    /// previously off and the dim level decreased at the same time: a low,
    /// falling dim reading alongside an off-to-on transition indicates a
    /// stale or partial broadcast rather than a genuine switch-on. This is a
    /// heuristic inferred from observed hardware behavior, not a protocol
    /// guarantee.
    pub fn apply_advertisement_update(&self, frame: &[u8], rssi: i16) -> Option<Self> {
        let decoded = AdvertisementData::parse(frame)?;

        let dim_level = range_check_dim(u16::from(decoded.dim_level), self.dim_level);
        let mut light_on = decoded.light_on;
        if light_on && !self.light_on && dim_level < self.dim_level {
            light_on = false;
        }

        Some(Self {
            fan_speed: decoded.fan_speed,
            after_cooking_fan_speed: decoded.after_cooking_fan_speed,
            light_on,
            after_cooking_on: decoded.after_cooking_on,
            periodic_venting_on: decoded.periodic_venting_on,
            grease_filter_full: decoded.grease_filter_full,
            carbon_filter_full: decoded.carbon_filter_full,
            carbon_filter_available: decoded.carbon_filter_available,
            dim_level,
            periodic_venting: range_check_period(decoded.periodic_venting, self.periodic_venting),
            rssi,
        })
    }

    /// Derive a new state with the light flag replaced.
    ///
    /// Used for the optimistic update after a successful light command.
    pub(crate) fn with_light_on(&self, light_on: bool) -> Self {
        Self { light_on, ..*self }
    }
}

/// Accept a dim level within 0-100, otherwise keep the previous value.
fn range_check_dim(value: u16, fallback: u8) -> u8 {
    if value <= 100 {
        value as u8
    } else {
        fallback
    }
}

/// Accept a venting interval within 0-59, otherwise keep the previous value.
fn range_check_period(value: u8, fallback: u8) -> u8 {
    if value < 60 {
        value
    } else {
        fallback
    }
}
