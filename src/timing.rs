// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serial line timing.

use core::time::Duration;

/// Silence that ends a frame unless a baud rate derived value is configured.
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_millis(5);

/// How long a master waits for a reply by default.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Start, 8 data, parity and stop bit.
const BITS_PER_CHAR: u64 = 11;

/// Above this baud rate the inter-frame delay is fixed.
const FIXED_DELAY_BAUD_RATE: u32 = 19_200;

// MODBUS over Serial Line V1.02, 2.5.1.1: "it is recommended to use a
// value of 1.750ms for inter-frame delay (t3.5)" above 19200 bps.
const FIXED_INTER_FRAME_DELAY: Duration = Duration::from_micros(1750);

/// Transmission time of a single character.
#[must_use]
pub const fn char_time(baud_rate: u32) -> Duration {
    let baud_rate = if baud_rate == 0 { 1 } else { baud_rate as u64 };
    Duration::from_micros((BITS_PER_CHAR * 1_000_000).div_ceil(baud_rate))
}

/// The 3.5 character silence (t3.5) that separates two frames.
#[must_use]
pub const fn inter_frame_delay(baud_rate: u32) -> Duration {
    if baud_rate > FIXED_DELAY_BAUD_RATE {
        return FIXED_INTER_FRAME_DELAY;
    }
    let baud_rate = if baud_rate == 0 { 1 } else { baud_rate as u64 };
    Duration::from_micros((BITS_PER_CHAR * 3_500_000).div_ceil(baud_rate))
}
