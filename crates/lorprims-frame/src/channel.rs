//! Channel addressing.
//!
//! A channel selects one or more outputs on a unit, either by id or by an
//! 8- or 16-bit mask. A non-zero chain index selects one device inside a
//! daisy-chained group and is written ahead of the address bytes.

use std::fmt;
use std::num::NonZeroU8;

use crate::error::{FrameError, Result};
use crate::protocol::{CHANNEL_MAGIC_ID, CHANNEL_MAGIC_MASK16, CHANNEL_MAGIC_MASK8};

/// How a channel's bits are interpreted and laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// A single channel id, one byte.
    Id,
    /// Up to 8 channels, one mask byte.
    Mask8,
    /// Up to 16 channels, two mask bytes (big-endian).
    Mask16,
}

impl AddressingMode {
    /// Channel magic merged into the action byte for this mode.
    pub const fn magic(self) -> u8 {
        match self {
            AddressingMode::Id => CHANNEL_MAGIC_ID,
            AddressingMode::Mask8 => CHANNEL_MAGIC_MASK8,
            AddressingMode::Mask16 => CHANNEL_MAGIC_MASK16,
        }
    }

    /// Largest `bits` value this mode can carry.
    pub const fn max_bits(self) -> u16 {
        match self {
            AddressingMode::Id | AddressingMode::Mask8 => u8::MAX as u16,
            AddressingMode::Mask16 => u16::MAX,
        }
    }

    /// Number of address bytes, excluding the chain index.
    pub const fn address_width(self) -> usize {
        match self {
            AddressingMode::Id | AddressingMode::Mask8 => 1,
            AddressingMode::Mask16 => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            AddressingMode::Id => "id",
            AddressingMode::Mask8 => "mask8",
            AddressingMode::Mask16 => "mask16",
        }
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One or more output channels on a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel {
    /// Addressing mode, which also selects the channel magic.
    pub mode: AddressingMode,
    /// Channel id or mask. Must fit `mode.max_bits()`.
    pub bits: u16,
    /// Chained sub-unit, or `None` when not chained.
    pub chain_index: Option<NonZeroU8>,
}

impl Channel {
    /// Create a channel without checking that `bits` fits `mode`.
    ///
    /// Out-of-range bits are reported by [`Channel::validate`] when encoding.
    pub const fn new(mode: AddressingMode, bits: u16) -> Self {
        Self {
            mode,
            bits,
            chain_index: None,
        }
    }

    /// A single channel addressed by id.
    pub const fn id(id: u8) -> Self {
        Self::new(AddressingMode::Id, id as u16)
    }

    /// Up to 8 channels addressed by mask.
    pub const fn mask8(mask: u8) -> Self {
        Self::new(AddressingMode::Mask8, mask as u16)
    }

    /// Up to 16 channels addressed by mask.
    pub const fn mask16(mask: u16) -> Self {
        Self::new(AddressingMode::Mask16, mask)
    }

    /// Select a chained sub-unit. `0` means "not chained".
    pub const fn with_chain_index(mut self, index: u8) -> Self {
        self.chain_index = NonZeroU8::new(index);
        self
    }

    /// Channel magic for this channel's addressing mode.
    pub const fn magic(&self) -> u8 {
        self.mode.magic()
    }

    /// Bytes written by the channel address encoding.
    pub const fn wire_size(&self) -> usize {
        let chain = if self.chain_index.is_some() { 1 } else { 0 };
        chain + self.mode.address_width()
    }

    /// Check that `bits` fits the addressing mode.
    pub fn validate(&self) -> Result<()> {
        let max = self.mode.max_bits();
        if self.bits > max {
            return Err(FrameError::InvalidChannelBits {
                mode: self.mode,
                bits: self.bits,
                max,
            });
        }
        Ok(())
    }
}
