// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frame boundary detection.
//!
//! RTU frames carry no delimiters: a frame ends when the line stays
//! silent for the idle threshold (t3.5).

use crate::{
    error::Error,
    transport::{Timestamp, Transport},
};
use core::time::Duration;

/// Receive buffer that accumulates bytes until the line falls silent.
///
/// A frame that outgrows the capacity is dropped as a whole: the buffer
/// is emptied, the overflow is reported once, and the rest of the
/// burst is discarded until the next silence.
#[derive(Debug, Clone)]
pub struct FrameBuffer<const N: usize> {
    buf: [u8; N],
    len: usize,
    last_rx: Option<Timestamp>,
    overflowed: bool,
}

impl<const N: usize> Default for FrameBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameBuffer<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
            last_rx: None,
            overflowed: false,
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bytes received so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Forget everything received, including a pending overflow.
    pub fn reset(&mut self) {
        self.len = 0;
        self.last_rx = None;
        self.overflowed = false;
    }

    /// Drain every byte the transport has available right now.
    ///
    /// Returns the number of bytes read, or [`Error::BufferOverflow`]
    /// the moment the current frame exceeds the capacity.
    pub fn feed<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        now: Timestamp,
    ) -> Result<usize, Error> {
        let mut count = 0;
        let mut overflow = false;
        while let Some(byte) = transport.read_byte() {
            count += 1;
            if self.overflowed {
                continue;
            }
            if self.len == N {
                self.len = 0;
                self.overflowed = true;
                overflow = true;
                continue;
            }
            self.buf[self.len] = byte;
            self.len += 1;
        }
        if count > 0 {
            self.last_rx = Some(now);
        }
        if overflow {
            #[cfg(feature = "log")]
            log::warn!("Frame exceeds {} bytes, dropping it", N);
            return Err(Error::BufferOverflow);
        }
        Ok(count)
    }

    /// Hand out the buffered frame once the line has been silent for
    /// `idle` since the last byte.
    ///
    /// The frame stays readable until the next [`FrameBuffer::feed`]; the
    /// buffer itself starts over. The silence after an overflowed burst
    /// only re-arms the buffer.
    pub fn take_frame(&mut self, now: Timestamp, idle: Duration) -> Option<&[u8]> {
        let last_rx = self.last_rx?;
        if now.saturating_sub(last_rx) < idle {
            return None;
        }
        if self.overflowed {
            self.reset();
            return None;
        }
        let len = self.len;
        self.reset();
        if len == 0 {
            return None;
        }
        Some(&self.buf[..len])
    }
}
