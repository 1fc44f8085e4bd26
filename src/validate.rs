// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checks applied to a complete frame before it is acted upon.

use crate::{
    codec::rtu::{MAX_FRAME_LEN, server::decode_request, verify_crc},
    error::Error,
    frame::{Exception, ExceptionResponse, FunctionCode, Request},
    util::packed_coils_len,
};

/// Most coils a single read may ask for.
pub const MAX_READ_COILS: usize = 2000;
/// Most registers a single read may ask for.
pub const MAX_READ_REGISTERS: usize = 125;
/// Most coils a single write may carry.
pub const MAX_WRITE_COILS: usize = 1968;
/// Most registers a single write may carry.
pub const MAX_WRITE_REGISTERS: usize = 123;

/// Check a reply received by the master.
///
/// A damaged frame counts as no reply at all. An exception reply is
/// passed on as [`Error::RemoteException`].
pub fn validate_answer(frame: &[u8]) -> Result<(), Error> {
    if !verify_crc(frame) {
        return Err(Error::NoReply);
    }
    let pdu = &frame[1..frame.len() - 2];
    if pdu[0] & 0x80 != 0 {
        let rsp = match ExceptionResponse::try_from(pdu) {
            Ok(rsp) => rsp,
            Err(Error::ExceptionCode(code)) => ExceptionResponse {
                function: FunctionCode::new(pdu[0] & 0x7F),
                exception: Exception::Other(code),
            },
            Err(err) => return Err(err),
        };
        return Err(Error::RemoteException(rsp));
    }
    if !FunctionCode::new(pdu[0]).is_supported() {
        return Err(Error::Exception(Exception::IllegalFunction));
    }
    Ok(())
}

/// Check a request received by a slave that holds `regsize` registers.
///
/// Failures other than [`Error::NoReply`] are [`Error::Exception`]s the
/// slave reports back to the master.
pub fn validate_request(frame: &[u8], regsize: usize) -> Result<(), Error> {
    validate_request_within(frame, regsize, MAX_FRAME_LEN)
}

/// Like [`validate_request`], additionally rejecting requests whose
/// response frame would exceed `capacity` bytes.
pub fn validate_request_within(frame: &[u8], regsize: usize, capacity: usize) -> Result<(), Error> {
    if !verify_crc(frame) {
        return Err(Error::NoReply);
    }
    if !FunctionCode::new(frame[1]).is_supported() {
        return Err(Error::Exception(Exception::IllegalFunction));
    }
    let request = decode_request(frame)
        .map_err(|_| Error::Exception(Exception::IllegalDataValue))?
        .pdu
        .0;
    check_quantity(&request)?;
    if response_frame_len(&request) > capacity {
        return Err(Error::Exception(Exception::IllegalDataValue));
    }
    check_range(&request, regsize)
}

fn check_quantity(request: &Request<'_>) -> Result<(), Error> {
    let within = |quantity: usize, max: usize| (1..=max).contains(&quantity);
    let valid = match *request {
        Request::ReadCoils(_, qty) | Request::ReadDiscreteInputs(_, qty) => {
            within(usize::from(qty), MAX_READ_COILS)
        }
        Request::ReadHoldingRegisters(_, qty) | Request::ReadInputRegisters(_, qty) => {
            within(usize::from(qty), MAX_READ_REGISTERS)
        }
        Request::WriteMultipleCoils(_, coils) => {
            within(coils.len(), MAX_WRITE_COILS)
                && coils.payload().len() == packed_coils_len(coils.len())
        }
        Request::WriteMultipleRegisters(_, words) => {
            within(words.len(), MAX_WRITE_REGISTERS) && words.payload().len() == words.len() * 2
        }
        Request::WriteSingleCoil(_, _) | Request::WriteSingleRegister(_, _) => true,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::Exception(Exception::IllegalDataValue))
    }
}

fn check_range(request: &Request<'_>, regsize: usize) -> Result<(), Error> {
    let last_coil_reg = |addr: u16, qty: usize| (usize::from(addr) + qty - 1) / 16;
    let valid = match *request {
        Request::ReadCoils(addr, qty) | Request::ReadDiscreteInputs(addr, qty) => {
            last_coil_reg(addr, usize::from(qty)) < regsize
        }
        Request::WriteMultipleCoils(addr, coils) => last_coil_reg(addr, coils.len()) < regsize,
        Request::WriteSingleCoil(addr, _) => usize::from(addr) / 16 < regsize,
        Request::ReadHoldingRegisters(addr, qty) | Request::ReadInputRegisters(addr, qty) => {
            usize::from(addr) + usize::from(qty) <= regsize
        }
        Request::WriteMultipleRegisters(addr, words) => usize::from(addr) + words.len() <= regsize,
        Request::WriteSingleRegister(addr, _) => usize::from(addr) < regsize,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::Exception(Exception::IllegalDataAddress))
    }
}

/// Length of the frame that answers `request`.
const fn response_frame_len(request: &Request<'_>) -> usize {
    match *request {
        Request::ReadCoils(_, qty) | Request::ReadDiscreteInputs(_, qty) => {
            5 + packed_coils_len(qty as usize)
        }
        Request::ReadHoldingRegisters(_, qty) | Request::ReadInputRegisters(_, qty) => {
            5 + qty as usize * 2
        }
        Request::WriteSingleCoil(_, _)
        | Request::WriteSingleRegister(_, _)
        | Request::WriteMultipleCoils(_, _)
        | Request::WriteMultipleRegisters(_, _) => 8,
    }
}
