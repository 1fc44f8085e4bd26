// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slave side execution of requests against a register image.

use crate::{
    codec::rtu::{Header, ResponseAdu, SlaveId, append_crc, server},
    error::Error,
    frame::{Coils, FunctionCode, Request, Response, ResponsePdu},
    util::set_coil_bit,
};
use byteorder::{BigEndian, ByteOrder};

/// Serve a validated request frame.
///
/// The request is executed against `registers` and the complete
/// response frame is written into `buf`. Returns the frame length.
pub fn dispatch(frame: &[u8], registers: &mut [u16], buf: &mut [u8]) -> Result<usize, Error> {
    let adu = match server::decode_request(frame) {
        Ok(adu) => adu,
        Err(err) => {
            #[cfg(feature = "log")]
            if let Error::FnCode(code) = err {
                log::error!("No handler for function code 0x{code:0>2X}");
            }
            return Err(err);
        }
    };
    execute(adu.hdr.slave, adu.pdu.0, registers, buf)
}

/// Execute `request` and write the response of slave `slave` into `buf`.
pub fn execute(
    slave: SlaveId,
    request: Request<'_>,
    registers: &mut [u16],
    buf: &mut [u8],
) -> Result<usize, Error> {
    use Request as R;

    let function = FunctionCode::from(request);
    let response = match request {
        R::ReadCoils(address, quantity) | R::ReadDiscreteInputs(address, quantity) => {
            return read_coils(slave, function, address, quantity, registers, buf);
        }
        R::ReadHoldingRegisters(address, quantity) | R::ReadInputRegisters(address, quantity) => {
            return read_registers(slave, function, address, quantity, registers, buf);
        }
        R::WriteSingleCoil(address, state) => {
            set_coil_bit(registers, usize::from(address), state)?;
            Response::WriteSingleCoil(address, state)
        }
        R::WriteSingleRegister(address, value) => {
            let reg = registers
                .get_mut(usize::from(address))
                .ok_or(Error::BufferSize)?;
            *reg = value;
            Response::WriteSingleRegister(address, value)
        }
        R::WriteMultipleCoils(address, coils) => {
            coils.copy_to_registers(registers, usize::from(address))?;
            Response::WriteMultipleCoils(address, quantity(coils.len())?)
        }
        R::WriteMultipleRegisters(address, words) => {
            words.copy_to_registers(registers, usize::from(address))?;
            Response::WriteMultipleRegisters(address, quantity(words.len())?)
        }
    };
    server::encode_response(
        ResponseAdu {
            hdr: Header { slave },
            pdu: ResponsePdu(Ok(response)),
        },
        buf,
    )
}

// `[id][fc][byte count][coils...][crc]`, packed straight into the frame
fn read_coils(
    slave: SlaveId,
    function: FunctionCode,
    address: u16,
    quantity: u16,
    registers: &[u16],
    buf: &mut [u8],
) -> Result<usize, Error> {
    let payload = buf.get_mut(3..).ok_or(Error::BufferSize)?;
    let coils = Coils::from_registers(
        registers,
        usize::from(address),
        usize::from(quantity),
        payload,
    )?;
    let byte_count = u8::try_from(coils.packed_len()).map_err(|_| Error::BufferSize)?;
    write_read_header(slave, function, byte_count, buf)
}

// `[id][fc][byte count][hi][lo]...[crc]`
fn read_registers(
    slave: SlaveId,
    function: FunctionCode,
    address: u16,
    quantity: u16,
    registers: &[u16],
    buf: &mut [u8],
) -> Result<usize, Error> {
    let first = usize::from(address);
    let words = registers
        .get(first..first + usize::from(quantity))
        .ok_or(Error::BufferSize)?;
    let byte_count = u8::try_from(words.len() * 2).map_err(|_| Error::BufferSize)?;
    let payload = buf
        .get_mut(3..3 + usize::from(byte_count))
        .ok_or(Error::BufferSize)?;
    BigEndian::write_u16_into(words, payload);
    write_read_header(slave, function, byte_count, buf)
}

fn write_read_header(
    slave: SlaveId,
    function: FunctionCode,
    byte_count: u8,
    buf: &mut [u8],
) -> Result<usize, Error> {
    buf[0] = slave;
    buf[1] = function.value();
    buf[2] = byte_count;
    append_crc(buf, 3 + usize::from(byte_count))
}

fn quantity(len: usize) -> Result<u16, Error> {
    u16::try_from(len).map_err(|_| Error::BufferSize)
}
