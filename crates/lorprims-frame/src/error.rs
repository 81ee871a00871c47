use crate::channel::AddressingMode;

/// Errors that can occur while encoding a command.
///
/// All of them are raised before the first byte is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The channel bits do not fit the width of the addressing mode.
    #[error("channel bits 0x{bits:04X} out of range for {mode} addressing (max 0x{max:04X})")]
    InvalidChannelBits {
        mode: AddressingMode,
        bits: u16,
        max: u16,
    },

    /// The channel action code overlaps the channel magic nibble.
    #[error("channel action code 0x{code:02X} overlaps the channel magic bits")]
    InvalidAction { code: u8 },

    /// The destination buffer cannot hold the whole command.
    #[error("buffer too small ({available} bytes available, {needed} needed)")]
    BufferTooSmall { needed: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
