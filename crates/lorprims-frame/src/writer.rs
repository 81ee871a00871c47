use bytes::BufMut;

use crate::error::{FrameError, Result};

/// Writes protocol bytes into a caller-owned buffer.
///
/// Tracks the write position and refuses any write that would run past the
/// end of the buffer. Encoders call [`FrameWriter::ensure`] with the full
/// command size first, so a command is either written whole or not at all.
#[derive(Debug)]
pub struct FrameWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> FrameWriter<'a> {
    /// Create a writer positioned at the start of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Fail unless `needed` more bytes fit.
    pub fn ensure(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if needed > available {
            return Err(FrameError::BufferTooSmall { needed, available });
        }
        Ok(())
    }

    /// Write one byte.
    pub fn put_u8(&mut self, value: u8) -> Result<()> {
        self.put_slice(&[value])
    }

    /// Write a big-endian 16-bit value.
    pub fn put_u16(&mut self, value: u16) -> Result<()> {
        self.put_slice(&value.to_be_bytes())
    }

    /// Write raw bytes.
    pub fn put_slice(&mut self, src: &[u8]) -> Result<()> {
        self.ensure(src.len())?;
        let mut dst = &mut self.buf[self.pos..];
        dst.put_slice(src);
        self.pos += src.len();
        Ok(())
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Capacity left after the current position.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Consume the writer and return the number of bytes written.
    pub fn finish(self) -> usize {
        self.pos
    }
}
