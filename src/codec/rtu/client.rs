// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modbus RTU client (master) specific functions.
use super::*;

/// Encode an RTU request.
pub fn encode_request(adu: RequestAdu<'_>, buf: &mut [u8]) -> Result<usize> {
    let RequestAdu { hdr, pdu } = adu;
    if buf.len() < 2 {
        return Err(Error::BufferSize);
    }
    let len = pdu.0.encode(&mut buf[1..])?;
    finish_adu(hdr.slave, len, buf)
}

/// Decode a complete RTU response frame.
pub fn decode_response(buf: &[u8]) -> Result<ResponseAdu<'_>> {
    let DecodedFrame { slave, pdu } = extract_frame(buf)?;
    match response_frame_len(buf)? {
        Some(len) if len == buf.len() => {}
        _ => return Err(Error::BufferSize),
    }
    let hdr = Header { slave };
    // Decoding of the PDU is unlikely to fail due to transmission
    // errors, because the frame's bytes have already been verified
    // with the CRC.
    let response = if pdu[0] & 0x80 != 0 {
        ExceptionResponse::try_from(pdu).map(|er| ResponsePdu(Err(er)))
    } else {
        Response::try_from(pdu).map(|r| ResponsePdu(Ok(r)))
    }
    .map(|pdu| ResponseAdu { hdr, pdu });
    #[cfg(feature = "log")]
    if let Err(err) = response {
        log::error!("Failed to decode response PDU: {err}");
    }
    response
}
