//! Bounded scratch space for short-lived formatting.
//!
//! A [`ScratchBuffer`] holds at most [`THREAD_BUFFER_SIZE`] bytes. Writes that
//! do not fit keep the prefix that does and report
//! [`Error::ScratchOverflow`]. Each thread owns one buffer, reachable only
//! through [`with_thread_scratch`], and contents never outlive that call.

use std::cell::RefCell;
use std::fmt;

use crate::types::{Error, Result};

/// Capacity of a scratch buffer in bytes.
pub const THREAD_BUFFER_SIZE: usize = 1024;

thread_local! {
    static THREAD_SCRATCH: RefCell<ScratchBuffer> = RefCell::new(ScratchBuffer::new());
}

/// Lend the calling thread's scratch buffer, cleared, to `f`.
///
/// Fails with [`Error::ScratchBusy`] if called again from inside `f`.
pub fn with_thread_scratch<R>(f: impl FnOnce(&mut ScratchBuffer) -> R) -> Result<R> {
    THREAD_SCRATCH.with(|cell| {
        let mut buf = cell.try_borrow_mut().map_err(|_| Error::ScratchBusy)?;
        buf.clear();
        Ok(f(&mut buf))
    })
}

#[derive(Clone)]
pub struct ScratchBuffer {
    bytes: [u8; THREAD_BUFFER_SIZE],
    len: usize,
}

impl ScratchBuffer {
    pub fn new() -> Self {
        Self {
            bytes: [0u8; THREAD_BUFFER_SIZE],
            len: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        THREAD_BUFFER_SIZE
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn remaining(&self) -> usize {
        THREAD_BUFFER_SIZE - self.len
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The contents as text, if only valid UTF-8 has been written.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// Append raw bytes, truncating on overflow.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        let take = data.len().min(self.remaining());
        self.append(&data[..take]);
        if take < data.len() {
            return Err(Error::overflow(
                THREAD_BUFFER_SIZE,
                self.len - take + data.len(),
            ));
        }
        Ok(())
    }

    /// Append text, truncating on a character boundary on overflow.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        if s.len() <= self.remaining() {
            self.append(s.as_bytes());
            return Ok(());
        }

        let mut cut = self.remaining();
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        let attempted = self.len + s.len();
        self.append(&s.as_bytes()[..cut]);
        Err(Error::overflow(THREAD_BUFFER_SIZE, attempted))
    }

    /// Replace the contents with formatted text.
    ///
    /// On overflow the buffer keeps the truncated prefix and the error
    /// reports the full length the text would have needed.
    pub fn format(&mut self, args: fmt::Arguments<'_>) -> Result<&str> {
        self.clear();
        let mut sink = CountingSink {
            buf: self,
            attempted: 0,
            overflowed: false,
        };
        fmt::write(&mut sink, args)?;
        let (attempted, overflowed) = (sink.attempted, sink.overflowed);

        if overflowed {
            return Err(Error::overflow(THREAD_BUFFER_SIZE, attempted));
        }
        Ok(self.as_str().unwrap_or_default())
    }

    fn append(&mut self, data: &[u8]) {
        let end = self.len + data.len();
        self.bytes[self.len..end].copy_from_slice(data);
        self.len = end;
    }
}

impl Default for ScratchBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScratchBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchBuffer")
            .field("len", &self.len)
            .field("capacity", &THREAD_BUFFER_SIZE)
            .finish()
    }
}

/// `write!` support. Overflow truncates and surfaces as `fmt::Error`.
impl fmt::Write for ScratchBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        ScratchBuffer::write_str(self, s).map_err(|_| fmt::Error)
    }
}

/// Keeps counting after the buffer fills so the error can report the full size.
struct CountingSink<'a> {
    buf: &'a mut ScratchBuffer,
    attempted: usize,
    overflowed: bool,
}

impl fmt::Write for CountingSink<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.attempted += s.len();
        if !self.overflowed && self.buf.write_str(s).is_err() {
            self.overflowed = true;
        }
        Ok(())
    }
}
