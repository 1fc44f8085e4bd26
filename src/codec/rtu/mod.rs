// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modbus RTU

use super::*;

pub mod client;
pub mod server;
pub use crate::frame::rtu::*;

// [MODBUS over Serial Line Specification and Implementation Guide V1.02](http://modbus.org/docs/Modbus_over_serial_line_V1_02.pdf), page 13
// "The maximum size of a MODBUS RTU frame is 256 bytes."
pub const MAX_FRAME_LEN: usize = 256;

/// Frame capacity of memory constrained devices.
pub const CONSTRAINED_FRAME_LEN: usize = 64;

/// Slave id, function code and CRC.
pub const MIN_FRAME_LEN: usize = 4;

/// `[id][function | 0x80][exception][crc][crc]`
pub const EXCEPTION_FRAME_LEN: usize = 5;

/// Bytes of an ADU that do not belong to the PDU (slave id and CRC).
const ADU_OVERHEAD: usize = 3;

/// An extracted RTU PDU frame.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedFrame<'a> {
    pub slave: SlaveId,
    pub pdu: &'a [u8],
}

/// Split a complete RTU frame into slave id and PDU after verifying its CRC.
///
/// The whole buffer is taken as one frame, the last two bytes being the CRC.
#[allow(clippy::similar_names)]
pub fn extract_frame(buf: &[u8]) -> Result<DecodedFrame<'_>> {
    if buf.len() < MIN_FRAME_LEN {
        return Err(Error::BufferSize);
    }
    let (adu_buf, crc_buf) = buf.split_at(buf.len() - 2);
    // Read trailing CRC and verify ADU
    let expected_crc = BigEndian::read_u16(crc_buf);
    let actual_crc = crc16(adu_buf);
    if expected_crc != actual_crc {
        return Err(Error::Crc(expected_crc, actual_crc));
    }
    let (slave_id, pdu_data) = adu_buf.split_at(1);
    Ok(DecodedFrame {
        slave: slave_id[0],
        pdu: pdu_data,
    })
}

/// Calculate the CRC (Cyclic Redundancy Check) sum.
///
/// The bytes of the result are swapped, so writing it big-endian
/// yields the wire order (low byte first).
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = 0xFFFF;
    for x in data {
        crc ^= u16::from(*x);
        for _ in 0..8 {
            // if we followed clippy's suggestion to move out the crc >>= 1, the condition may not be met any more
            // the recommended action therefore makes no sense and it is better to allow this lint
            #[allow(clippy::branches_sharing_code)]
            if (crc & 0x0001) != 0 {
                crc >>= 1;
                crc ^= 0xA001;
            } else {
                crc >>= 1;
            }
        }
    }
    crc.rotate_right(8)
}

/// Check the trailing CRC of a complete frame.
///
/// Frames shorter than [`MIN_FRAME_LEN`] never verify.
#[must_use]
pub fn verify_crc(frame: &[u8]) -> bool {
    if frame.len() < MIN_FRAME_LEN {
        return false;
    }
    let (adu_buf, crc_buf) = frame.split_at(frame.len() - 2);
    BigEndian::read_u16(crc_buf) == crc16(adu_buf)
}

/// Write the CRC of `buf[..len]` behind it and return the new frame length.
pub fn append_crc(buf: &mut [u8], len: usize) -> Result<usize> {
    if buf.len() < len + 2 {
        return Err(Error::BufferSize);
    }
    let crc = crc16(&buf[..len]);
    BigEndian::write_u16(&mut buf[len..], crc);
    Ok(len + 2)
}

/// Wrap an encoded PDU (`buf[1..=pdu_len]`) into an ADU.
fn finish_adu(slave: SlaveId, pdu_len: usize, buf: &mut [u8]) -> Result<usize> {
    if buf.len() < pdu_len + ADU_OVERHEAD {
        return Err(Error::BufferSize);
    }
    buf[0] = slave;
    append_crc(buf, pdu_len + 1)
}

/// Extract the PDU length out of the ADU request buffer.
pub const fn request_pdu_len(adu_buf: &[u8]) -> Result<Option<usize>> {
    if adu_buf.len() < 2 {
        return Ok(None);
    }
    let fn_code = adu_buf[1];
    let len = match fn_code {
        0x01..=0x06 => Some(5),
        0x0F | 0x10 => {
            if adu_buf.len() > 6 {
                Some(6 + adu_buf[6] as usize)
            } else {
                // incomplete frame
                None
            }
        }
        _ => {
            return Err(Error::FnCode(fn_code));
        }
    };
    Ok(len)
}

/// Extract the PDU length out of the ADU response buffer.
pub const fn response_pdu_len(adu_buf: &[u8]) -> Result<Option<usize>> {
    if adu_buf.len() < 2 {
        return Ok(None);
    }
    let fn_code = adu_buf[1];
    let len = match fn_code {
        0x01..=0x04 => {
            if adu_buf.len() > 2 {
                Some(2 + adu_buf[2] as usize)
            } else {
                // incomplete frame
                None
            }
        }
        0x05 | 0x06 | 0x0F | 0x10 => Some(5),
        0x81..=0x84 | 0x85 | 0x86 | 0x8F | 0x90 => Some(2),
        _ => return Err(Error::FnCode(fn_code)),
    };
    Ok(len)
}

/// Total frame length announced by a buffered request, if it is known yet.
pub const fn request_frame_len(adu_buf: &[u8]) -> Result<Option<usize>> {
    match request_pdu_len(adu_buf) {
        Ok(Some(len)) => Ok(Some(len + ADU_OVERHEAD)),
        other => other,
    }
}

/// Total frame length announced by a buffered response, if it is known yet.
pub const fn response_frame_len(adu_buf: &[u8]) -> Result<Option<usize>> {
    match response_pdu_len(adu_buf) {
        Ok(Some(len)) => Ok(Some(len + ADU_OVERHEAD)),
        other => other,
    }
}
