//! Unit ids and action codes.
//!
//! Channel action codes live in the low nibble of the action byte; the high
//! nibble carries the channel magic of the addressing mode.

use std::fmt;

use crate::error::{FrameError, Result};
use crate::protocol::{ACTION_CODE_MASK, BROADCAST_UNIT_ID};

/// Address of a controller unit on the bus.
pub type UnitId = u8;

/// Returns true if the unit id addresses every unit.
pub fn is_broadcast(unit: UnitId) -> bool {
    unit == BROADCAST_UNIT_ID
}

/// Action applied to one or more channels of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelAction(u8);

impl ChannelAction {
    /// Turn the channels fully on.
    pub const ON: Self = Self(0x01);
    /// Set the channels to a brightness.
    pub const SET_BRIGHTNESS: Self = Self(0x03);
    /// Fade the channels between two brightnesses.
    pub const FADE: Self = Self(0x04);
    /// Start the shimmer effect.
    pub const SET_SHIMMER: Self = Self(0x06);
    /// Start the twinkle effect.
    pub const SET_TWINKLE: Self = Self(0x07);

    /// Wrap a device-defined action code.
    ///
    /// Codes using any bit outside [`ACTION_CODE_MASK`] would collide with the
    /// channel magic and are rejected.
    pub fn new(code: u8) -> Result<Self> {
        if code & !ACTION_CODE_MASK != 0 {
            return Err(FrameError::InvalidAction { code });
        }
        Ok(Self(code))
    }

    pub const fn code(self) -> u8 {
        self.0
    }

    /// The action byte for a channel with the given magic.
    pub const fn with_magic(self, magic: u8) -> u8 {
        magic | self.0
    }

    /// Name of a well-known action, if this is one.
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::ON => Some("on"),
            Self::SET_BRIGHTNESS => Some("set-brightness"),
            Self::FADE => Some("fade"),
            Self::SET_SHIMMER => Some("shimmer"),
            Self::SET_TWINKLE => Some("twinkle"),
            _ => None,
        }
    }

    /// Look up a well-known action by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "on" => Some(Self::ON),
            "set-brightness" => Some(Self::SET_BRIGHTNESS),
            "fade" => Some(Self::FADE),
            "shimmer" => Some(Self::SET_SHIMMER),
            "twinkle" => Some(Self::SET_TWINKLE),
            _ => None,
        }
    }
}

impl TryFrom<u8> for ChannelAction {
    type Error = FrameError;

    fn try_from(code: u8) -> Result<Self> {
        Self::new(code)
    }
}

impl fmt::Display for ChannelAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{:02X}", self.0),
        }
    }
}

/// Action applied to a whole unit. Opaque and written verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitAction(pub u8);

impl UnitAction {
    pub const fn code(self) -> u8 {
        self.0
    }
}

impl From<u8> for UnitAction {
    fn from(code: u8) -> Self {
        Self(code)
    }
}
