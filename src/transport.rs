// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborators of the protocol engine: the serial line and the clock.

use core::time::Duration;

/// A point in time, measured from an arbitrary but fixed origin.
pub type Timestamp = Duration;

/// Byte oriented serial line.
///
/// Reads never block. Writes may block until the bytes are queued;
/// [`Transport::flush`] returns once they have physically left the line.
pub trait Transport {
    /// Take the next received byte if one is available right now.
    fn read_byte(&mut self) -> Option<u8>;

    fn write_bytes(&mut self, bytes: &[u8]);

    fn flush(&mut self);

    /// Drive the RS-485 transmitter enable line.
    ///
    /// Full-duplex lines keep the default no-op.
    fn set_driver_enable(&mut self, _enabled: bool) {}
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        (**self).write_bytes(bytes);
    }

    fn flush(&mut self) {
        (**self).flush();
    }

    fn set_driver_enable(&mut self, enabled: bool) {
        (**self).set_driver_enable(enabled);
    }
}

/// Monotonic clock used for idle and response timeout detection.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// [`Clock`] backed by [`std::time::Instant`].
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed()
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted line and hand-driven clock for tests.

    use super::*;
    use core::cell::Cell;
    use std::{collections::VecDeque, vec::Vec};

    /// Moves only when told to, or by `tick` on every reading.
    #[derive(Debug, Default)]
    pub struct ManualClock {
        now: Cell<Duration>,
        tick: Cell<Duration>,
    }

    impl ManualClock {
        pub fn set_tick(&self, tick: Duration) {
            self.tick.set(tick);
        }

        pub fn advance_ms(&self, ms: u64) {
            self.now.set(self.now.get() + Duration::from_millis(ms));
        }

        pub fn advance(&self, by: Duration) {
            self.now.set(self.now.get() + by);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Timestamp {
            let now = self.now.get();
            self.now.set(now + self.tick.get());
            now
        }
    }

    /// Every event the engine caused on the line, in order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum LineEvent {
        DriverEnable(bool),
        Write(Vec<u8>),
        Flush,
    }

    #[derive(Debug, Default)]
    pub struct MockLine {
        pub rx: VecDeque<u8>,
        pub events: Vec<LineEvent>,
    }

    impl MockLine {
        pub fn receive(&mut self, bytes: &[u8]) {
            self.rx.extend(bytes.iter().copied());
        }

        /// All bytes written so far, concatenated.
        pub fn sent(&self) -> Vec<u8> {
            self.events
                .iter()
                .filter_map(|ev| match ev {
                    LineEvent::Write(bytes) => Some(bytes.as_slice()),
                    _ => None,
                })
                .flatten()
                .copied()
                .collect()
        }

        pub fn take_sent(&mut self) -> Vec<u8> {
            let sent = self.sent();
            self.events.clear();
            sent
        }
    }

    impl Transport for MockLine {
        fn read_byte(&mut self) -> Option<u8> {
            self.rx.pop_front()
        }

        fn write_bytes(&mut self, bytes: &[u8]) {
            self.events.push(LineEvent::Write(bytes.to_vec()));
        }

        fn flush(&mut self) {
            self.events.push(LineEvent::Flush);
        }

        fn set_driver_enable(&mut self, enabled: bool) {
            self.events.push(LineEvent::DriverEnable(enabled));
        }
    }
}
