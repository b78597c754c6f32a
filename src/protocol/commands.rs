//! Command encoding.
//!
//! The hood accepts a small closed set of commands, each a fixed opaque
//! 16-byte payload written to the control characteristic. The payloads are
//! protocol constants captured from the device firmware; they are not
//! derived from the keycode or any other state.

/// Payload switching the LED light on.
pub const COMMAND_LIGHT_ON: [u8; 16] = [
    0x84, 0xdd, 0x50, 0x42, 0x37, 0x41, 0x50, 0x89, 0x7a, 0xc8, 0x2f, 0x39, 0x11, 0x09, 0x68, 0xa8,
];

/// Payload switching the LED light off.
pub const COMMAND_LIGHT_OFF: [u8; 16] = [
    0x79, 0xd1, 0xdb, 0xa4, 0x09, 0x19, 0xc2, 0x46, 0xa8, 0x58, 0x0a, 0xe7, 0xd1, 0x1b, 0x78, 0x84,
];

/// Commands understood by the hood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Switch the LED light on.
    LightOn,
    /// Switch the LED light off.
    LightOff,
}

impl Command {
    /// Get the wire payload for this command.
    pub fn payload(&self) -> &'static [u8; 16] {
        match self {
            Self::LightOn => &COMMAND_LIGHT_ON,
            Self::LightOff => &COMMAND_LIGHT_OFF,
        }
    }

    /// The light state this command implies, if it is a light command.
    ///
    /// Used for the optimistic local update after a successful write; the
    /// device does not echo command results back.
    pub fn light_state(&self) -> Option<bool> {
        match self {
            Self::LightOn => Some(true),
            Self::LightOff => Some(false),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LightOn => write!(f, "LightOn"),
            Self::LightOff => write!(f, "LightOff"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_lengths() {
        assert_eq!(Command::LightOn.payload().len(), 16);
        assert_eq!(Command::LightOff.payload().len(), 16);
    }

    #[test]
    fn test_payloads_distinct() {
        assert_ne!(Command::LightOn.payload(), Command::LightOff.payload());
    }

    #[test]
    fn test_payload_bytes() {
        // Spot-check against the captured hex strings.
        assert_eq!(Command::LightOn.payload()[0], 0x84);
        assert_eq!(Command::LightOn.payload()[15], 0xa8);
        assert_eq!(Command::LightOff.payload()[0], 0x79);
        assert_eq!(Command::LightOff.payload()[15], 0x84);
    }

    #[test]
    fn test_light_state() {
        assert_eq!(Command::LightOn.light_state(), Some(true));
        assert_eq!(Command::LightOff.light_state(), Some(false));
    }
}
