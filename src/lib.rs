// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

#![doc = include_str!("../README.md")]
#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

mod buffer;
mod codec;
mod device;
mod dispatch;
mod error;
mod frame;
pub mod timing;
mod transport;
mod util;
mod validate;

pub use buffer::FrameBuffer;
pub use codec::rtu;
pub use device::{Device, PollResult, State, Stats, Status};
pub use dispatch::{dispatch, execute};
pub use error::*;
pub use frame::*;
pub use rtu::{BROADCAST_ID, MAX_SLAVE_ID, SlaveId};
pub use transport::{Clock, Timestamp, Transport};
#[cfg(feature = "std")]
pub use transport::StdClock;
pub use util::*;
pub use validate::{
    MAX_READ_COILS, MAX_READ_REGISTERS, MAX_WRITE_COILS, MAX_WRITE_REGISTERS, validate_answer,
    validate_request, validate_request_within,
};
