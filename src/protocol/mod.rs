//! Protocol module for parsing and constructing payloads.
//!
//! This module contains the implementations for:
//! - Status characteristic parsing (keycode-prefixed ASCII record)
//! - Command payload constants

pub mod characteristic;
pub mod commands;

pub use characteristic::CharacteristicData;
pub use commands::{Command, COMMAND_LIGHT_OFF, COMMAND_LIGHT_ON};
