// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::frame::{Exception, ExceptionResponse};
use core::fmt;

/// modbus-rtu Error
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A query was issued by a device that is not configured as master (id 0)
    NotMaster,
    /// A query was issued while another one is still waiting for its reply
    AlreadyWaiting,
    /// The telegram addresses an id outside of `1..=247`
    InvalidTargetId(u8),
    /// A slave id outside of `1..=247` was rejected
    InvalidSlaveId(u8),
    /// No valid answer: checksum failure or response timeout
    NoReply,
    /// The frame exceeded the buffer capacity before its end was detected
    BufferOverflow,
    /// The peer answered with an exception frame
    RemoteException(ExceptionResponse),
    /// A request was rejected locally and answered with an exception
    Exception(Exception),
    /// Invalid buffer size
    BufferSize,
    /// Invalid function code
    FnCode(u8),
    /// Invalid exception code
    ExceptionCode(u8),
    /// Invalid exception function code
    ExceptionFnCode(u8),
    /// Invalid CRC
    Crc(u16, u16),
    /// Invalid byte count
    ByteCount(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;

        match self {
            NotMaster => write!(f, "Device is not a master"),
            AlreadyWaiting => write!(f, "A query is already waiting for its reply"),
            InvalidTargetId(id) => write!(f, "Invalid target id: {id}"),
            InvalidSlaveId(id) => write!(f, "Invalid slave id: {id}"),
            NoReply => write!(f, "No reply"),
            BufferOverflow => write!(f, "Frame buffer overflow"),
            RemoteException(rsp) => write!(
                f,
                "Remote exception for function 0x{:0>2X}: {}",
                rsp.function.value(),
                rsp.exception
            ),
            Exception(ex) => write!(f, "Request rejected: {ex}"),
            BufferSize => write!(f, "Invalid buffer size"),
            FnCode(fn_code) => write!(f, "Invalid function code: 0x{fn_code:0>2X}"),
            ExceptionCode(code) => write!(f, "Invalid exception code: 0x{code:0>2X}"),
            ExceptionFnCode(code) => write!(f, "Invalid exception function code: 0x{code:0>2X}"),
            Crc(expected, actual) => write!(
                f,
                "Invalid CRC: expected = 0x{expected:0>4X}, actual = 0x{actual:0>4X}"
            ),
            ByteCount(cnt) => write!(f, "Invalid byte count: {cnt}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
