// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modbus RTU server (slave) specific functions.
use super::*;

/// Decode a complete RTU request frame.
pub fn decode_request(buf: &[u8]) -> Result<RequestAdu<'_>> {
    let DecodedFrame { slave, pdu } = extract_frame(buf)?;
    match request_frame_len(buf)? {
        Some(len) if len == buf.len() => {}
        _ => return Err(Error::BufferSize),
    }
    let hdr = Header { slave };
    // Decoding of the PDU is unlikely to fail due to transmission
    // errors, because the frame's bytes have already been verified
    // with the CRC.
    Request::try_from(pdu)
        .map(RequestPdu)
        .map(|pdu| RequestAdu { hdr, pdu })
        .inspect_err(|&_err| {
            #[cfg(feature = "log")]
            log::error!("Failed to decode request PDU: {_err}");
        })
}

/// Encode an RTU response (or exception).
pub fn encode_response(adu: ResponseAdu<'_>, buf: &mut [u8]) -> Result<usize> {
    let ResponseAdu { hdr, pdu } = adu;
    if buf.len() < 2 {
        return Err(Error::BufferSize);
    }
    let len = pdu.encode(&mut buf[1..])?;
    finish_adu(hdr.slave, len, buf)
}
