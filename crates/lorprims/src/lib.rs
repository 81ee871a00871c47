//! Command encoding for LOR serial lighting controllers.
//!
//! lorprims turns heartbeats, channel actions, fades, and unit actions into
//! the exact bytes a controller expects on its serial bus. Writing those
//! bytes to a port is left to the caller.
//!
//! # Crate Structure
//!
//! - [`frame`]: channel addressing, action codes, and the command encoder
//!
//! # Example
//!
//! ```
//! use lorprims::frame::{Channel, ChannelAction, Command};
//!
//! let command = Command::ChannelAction {
//!     unit: 5,
//!     action: ChannelAction::ON,
//!     channel: Channel::mask16(0x00FF),
//! };
//! let mut buf = [0u8; lorprims::frame::MAX_COMMAND_SIZE];
//! let len = command.encode(&mut buf).unwrap();
//! assert_eq!(&buf[..len], &[0x05, 0x11, 0x00, 0xFF]);
//! ```

/// Re-export frame types.
pub mod frame {
    pub use lorprims_frame::*;
}
