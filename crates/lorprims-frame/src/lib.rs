//! Protocol-exact command encoding for the LOR serial lighting protocol.
//!
//! Every command is written into a caller-owned buffer and the number of
//! bytes written is returned. Encoding is stateless:
//! - Channel addressing by id, 8-bit mask, or 16-bit mask, with an optional
//!   chain index prefix
//! - Channel actions merged with a per-addressing-mode magic value
//! - Fades, including the compound "action AND fade" form
//!
//! Sizes are checked before the first byte is written, so a failed encode
//! never leaves a partial command behind.

pub mod action;
pub mod channel;
pub mod codec;
pub mod error;
pub mod level;
pub mod protocol;
pub mod writer;

pub use action::{ChannelAction, UnitAction, UnitId};
pub use channel::{AddressingMode, Channel};
pub use codec::{
    write_brightness, write_brightness_with, write_channel, write_channel_action,
    write_channel_fade, write_channel_fade_with, write_channel_set_brightness, write_duration,
    write_duration_secs, write_heartbeat, write_unit_action, Command,
};
pub use error::{FrameError, Result};
pub use level::{Brightness, BrightnessCurve, DeviceDuration, DurationConversion};
pub use protocol::{AND_MAGIC, BROADCAST_UNIT_ID, HEARTBEAT_MAGIC, MAX_COMMAND_SIZE};
pub use writer::FrameWriter;
