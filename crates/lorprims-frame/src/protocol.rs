//! Protocol constants.
//!
//! Magic values are reserved bytes (or nibbles) that mark continuation,
//! heartbeat framing, and channel addressing. Sizes are the largest number
//! of bytes each command can occupy on the wire.

/// Unit id addressing every unit on the bus.
pub const BROADCAST_UNIT_ID: u8 = 0xFF;

/// Joins two command segments into one transmission.
pub const AND_MAGIC: u8 = 0x81;

/// Marks a keep-alive after the broadcast id.
pub const HEARTBEAT_MAGIC: u8 = 0x56;

/// OR'd into the single address byte of an id-addressed channel.
pub const CHANNEL_ID_MASK_MAGIC: u8 = 0x80;

/// Channel magic for id addressing.
pub const CHANNEL_MAGIC_ID: u8 = 0x00;

/// Channel magic for 16-bit mask addressing.
pub const CHANNEL_MAGIC_MASK16: u8 = 0x10;

/// Channel magic for 8-bit mask addressing.
pub const CHANNEL_MAGIC_MASK8: u8 = 0x30;

/// Bits a channel action code may occupy. The rest belong to the channel magic.
pub const ACTION_CODE_MASK: u8 = 0x0F;

pub const HEARTBEAT_SIZE: usize = 3;
pub const BRIGHTNESS_SIZE: usize = 1;
pub const DURATION_SIZE: usize = 2;
pub const UNIT_ACTION_SIZE: usize = 2;

/// Chain byte + two mask bytes.
pub const MAX_CHANNEL_SIZE: usize = 3;

/// unit + magic|action + channel.
pub const MAX_CHANNEL_ACTION_SIZE: usize = 2 + MAX_CHANNEL_SIZE;

/// unit + magic|FADE + from + to + duration + channel.
pub const MAX_CHANNEL_FADE_SIZE: usize =
    2 + 2 * BRIGHTNESS_SIZE + DURATION_SIZE + MAX_CHANNEL_SIZE;

/// Channel action segment + AND + fade tail.
pub const MAX_CHANNEL_FADE_WITH_SIZE: usize =
    MAX_CHANNEL_ACTION_SIZE + 1 + 1 + 2 * BRIGHTNESS_SIZE + DURATION_SIZE;

/// unit + magic|SET_BRIGHTNESS + to + channel.
pub const MAX_CHANNEL_SET_BRIGHTNESS_SIZE: usize = 2 + BRIGHTNESS_SIZE + MAX_CHANNEL_SIZE;

/// Largest encoding of any single command.
pub const MAX_COMMAND_SIZE: usize = MAX_CHANNEL_FADE_WITH_SIZE;
