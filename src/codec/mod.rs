// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{error::*, frame::*, util::*};
use byteorder::{BigEndian, ByteOrder};
use core::convert::TryFrom;

pub mod rtu;

type Result<T> = core::result::Result<T, Error>;

impl TryFrom<u8> for Exception {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        use crate::frame::Exception::*;
        let ex = match code {
            0x01 => IllegalFunction,
            0x02 => IllegalDataAddress,
            0x03 => IllegalDataValue,
            0x04 => ServerDeviceFailure,
            0x05 => Acknowledge,
            0x06 => ServerDeviceBusy,
            0x08 => MemoryParityError,
            0x0A => GatewayPathUnavailable,
            0x0B => GatewayTargetDevice,
            _ => {
                return Err(Error::ExceptionCode(code));
            }
        };
        Ok(ex)
    }
}

impl From<ExceptionResponse> for [u8; 2] {
    fn from(ex: ExceptionResponse) -> [u8; 2] {
        let fn_code = ex.function.value();
        debug_assert!(fn_code < 0x80);
        [fn_code | 0x80, ex.exception.code()]
    }
}

impl TryFrom<&[u8]> for ExceptionResponse {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(Error::BufferSize);
        }
        let fn_err_code = bytes[0];
        if fn_err_code < 0x80 {
            return Err(Error::ExceptionFnCode(fn_err_code));
        }
        let function = FunctionCode::new(fn_err_code - 0x80);
        let exception = Exception::try_from(bytes[1])?;
        Ok(ExceptionResponse {
            function,
            exception,
        })
    }
}

impl<'r> TryFrom<&'r [u8]> for Request<'r> {
    type Error = Error;

    fn try_from(bytes: &'r [u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::BufferSize);
        }

        let fn_code = FunctionCode::new(bytes[0]);
        if let FunctionCode::Custom(code) = fn_code {
            return Err(Error::FnCode(code));
        }
        if bytes.len() < min_request_pdu_len(fn_code) {
            return Err(Error::BufferSize);
        }

        use crate::frame::Request::*;
        use FunctionCode as f;

        let addr = BigEndian::read_u16(&bytes[1..3]);
        let payload = BigEndian::read_u16(&bytes[3..5]);
        let req = match fn_code {
            f::ReadCoils => ReadCoils(addr, payload),
            f::ReadDiscreteInputs => ReadDiscreteInputs(addr, payload),
            f::ReadInputRegisters => ReadInputRegisters(addr, payload),
            f::ReadHoldingRegisters => ReadHoldingRegisters(addr, payload),
            f::WriteSingleRegister => WriteSingleRegister(addr, payload),
            f::WriteSingleCoil => WriteSingleCoil(addr, u16_coil_to_bool(payload)),
            f::WriteMultipleCoils => {
                let quantity = usize::from(payload);
                let byte_count = bytes[5];
                if bytes.len() < (6 + byte_count as usize) {
                    return Err(Error::ByteCount(byte_count));
                }
                let data = &bytes[6..6 + byte_count as usize];
                WriteMultipleCoils(addr, Coils { quantity, data })
            }
            f::WriteMultipleRegisters => {
                let quantity = usize::from(payload);
                let byte_count = bytes[5];
                if bytes.len() < (6 + byte_count as usize) {
                    return Err(Error::ByteCount(byte_count));
                }
                let data = Data {
                    quantity,
                    data: &bytes[6..6 + byte_count as usize],
                };
                WriteMultipleRegisters(addr, data)
            }
            f::Custom(code) => return Err(Error::FnCode(code)),
        };
        Ok(req)
    }
}

impl<'r> TryFrom<&'r [u8]> for Response<'r> {
    type Error = Error;

    fn try_from(bytes: &'r [u8]) -> Result<Self> {
        use crate::frame::Response::*;
        if bytes.is_empty() {
            return Err(Error::BufferSize);
        }
        let fn_code = FunctionCode::new(bytes[0]);
        if let FunctionCode::Custom(code) = fn_code {
            return Err(Error::FnCode(code));
        }
        if bytes.len() < min_response_pdu_len(fn_code) {
            return Err(Error::BufferSize);
        }
        use FunctionCode as f;
        let rsp = match fn_code {
            f::ReadCoils | f::ReadDiscreteInputs => {
                let byte_count = bytes[1] as usize;
                if byte_count + 2 > bytes.len() {
                    return Err(Error::BufferSize);
                }
                let data = &bytes[2..byte_count + 2];
                // Here we have not information about the exact requested quantity
                // therefore we just assume that the whole byte is meant.
                let quantity = byte_count * 8;

                match fn_code {
                    f::ReadCoils => ReadCoils(Coils { quantity, data }),
                    _ => ReadDiscreteInputs(Coils { quantity, data }),
                }
            }
            f::WriteSingleCoil => WriteSingleCoil(
                BigEndian::read_u16(&bytes[1..3]),
                u16_coil_to_bool(BigEndian::read_u16(&bytes[3..5])),
            ),
            f::WriteMultipleCoils | f::WriteSingleRegister | f::WriteMultipleRegisters => {
                let addr = BigEndian::read_u16(&bytes[1..3]);
                let payload = BigEndian::read_u16(&bytes[3..5]);
                match fn_code {
                    f::WriteMultipleCoils => WriteMultipleCoils(addr, payload),
                    f::WriteSingleRegister => WriteSingleRegister(addr, payload),
                    _ => WriteMultipleRegisters(addr, payload),
                }
            }
            f::ReadInputRegisters | f::ReadHoldingRegisters => {
                let byte_count = bytes[1] as usize;
                let quantity = byte_count / 2;
                if byte_count + 2 > bytes.len() {
                    return Err(Error::BufferSize);
                }
                let data = &bytes[2..2 + byte_count];
                let data = Data { quantity, data };

                match fn_code {
                    f::ReadInputRegisters => ReadInputRegisters(data),
                    _ => ReadHoldingRegisters(data),
                }
            }
            f::Custom(code) => return Err(Error::FnCode(code)),
        };
        Ok(rsp)
    }
}

impl Request<'_> {
    /// Serialize the PDU into `buf`, returning the number of bytes written.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let len = self.pdu_len();
        if buf.len() < len {
            return Err(Error::BufferSize);
        }
        buf[0] = FunctionCode::from(*self).value();
        match *self {
            Self::ReadCoils(address, quantity)
            | Self::ReadDiscreteInputs(address, quantity)
            | Self::ReadInputRegisters(address, quantity)
            | Self::ReadHoldingRegisters(address, quantity)
            | Self::WriteSingleRegister(address, quantity) => {
                BigEndian::write_u16(&mut buf[1..], address);
                BigEndian::write_u16(&mut buf[3..], quantity);
            }
            Self::WriteSingleCoil(address, state) => {
                BigEndian::write_u16(&mut buf[1..], address);
                BigEndian::write_u16(&mut buf[3..], bool_to_u16_coil(state));
            }
            Self::WriteMultipleCoils(address, coils) => {
                BigEndian::write_u16(&mut buf[1..], address);
                BigEndian::write_u16(&mut buf[3..], quantity_field(coils.len())?);
                let packed = coils.packed()?;
                buf[5] = byte_count_field(packed.len())?;
                buf[6..len].copy_from_slice(packed);
            }
            Self::WriteMultipleRegisters(address, words) => {
                BigEndian::write_u16(&mut buf[1..], address);
                BigEndian::write_u16(&mut buf[3..], quantity_field(words.len())?);
                buf[5] = byte_count_field(words.len() * 2)?;
                words.copy_to(&mut buf[6..len])?;
            }
        }
        Ok(len)
    }
}

impl Response<'_> {
    /// Serialize the PDU into `buf`, returning the number of bytes written.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let len = self.pdu_len();
        if buf.len() < len {
            return Err(Error::BufferSize);
        }
        buf[0] = FunctionCode::from(*self).value();
        match *self {
            Self::ReadCoils(coils) | Self::ReadDiscreteInputs(coils) => {
                let packed = coils.packed()?;
                buf[1] = byte_count_field(packed.len())?;
                buf[2..len].copy_from_slice(packed);
            }
            Self::ReadInputRegisters(words) | Self::ReadHoldingRegisters(words) => {
                buf[1] = byte_count_field(words.len() * 2)?;
                words.copy_to(&mut buf[2..len])?;
            }
            Self::WriteSingleCoil(address, state) => {
                BigEndian::write_u16(&mut buf[1..], address);
                BigEndian::write_u16(&mut buf[3..], bool_to_u16_coil(state));
            }
            Self::WriteMultipleCoils(address, payload)
            | Self::WriteSingleRegister(address, payload)
            | Self::WriteMultipleRegisters(address, payload) => {
                BigEndian::write_u16(&mut buf[1..], address);
                BigEndian::write_u16(&mut buf[3..], payload);
            }
        }
        Ok(len)
    }
}

impl ResponsePdu<'_> {
    /// Serialize the PDU (or the exception) into `buf`.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        match self.0 {
            Ok(rsp) => rsp.encode(buf),
            Err(ex) => {
                if buf.len() < 2 {
                    return Err(Error::BufferSize);
                }
                let bytes: [u8; 2] = ex.into();
                buf[..2].copy_from_slice(&bytes);
                Ok(2)
            }
        }
    }
}

impl Coils<'_> {
    fn packed(&self) -> Result<&[u8]> {
        self.data.get(..self.packed_len()).ok_or(Error::BufferSize)
    }
}

impl Data<'_> {
    fn copy_to(&self, buf: &mut [u8]) -> Result<()> {
        let cnt = self.quantity * 2;
        let src = self.data.get(..cnt).ok_or(Error::BufferSize)?;
        buf.get_mut(..cnt)
            .ok_or(Error::BufferSize)?
            .copy_from_slice(src);
        Ok(())
    }
}

fn quantity_field(quantity: usize) -> Result<u16> {
    u16::try_from(quantity).map_err(|_| Error::BufferSize)
}

fn byte_count_field(count: usize) -> Result<u8> {
    u8::try_from(count).map_err(|_| Error::BufferSize)
}

const fn min_request_pdu_len(fn_code: FunctionCode) -> usize {
    use FunctionCode::*;
    match fn_code {
        ReadCoils | ReadDiscreteInputs | ReadInputRegisters | WriteSingleCoil
        | ReadHoldingRegisters | WriteSingleRegister => 5,
        WriteMultipleCoils | WriteMultipleRegisters => 6,
        Custom(_) => 1,
    }
}

const fn min_response_pdu_len(fn_code: FunctionCode) -> usize {
    use FunctionCode::*;
    match fn_code {
        ReadCoils | ReadDiscreteInputs | ReadInputRegisters | ReadHoldingRegisters => 2,
        WriteSingleCoil | WriteMultipleCoils | WriteSingleRegister | WriteMultipleRegisters => 5,
        Custom(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exception_response_into_bytes() {
        let bytes: [u8; 2] = ExceptionResponse {
            function: FunctionCode::new(0x03),
            exception: Exception::IllegalDataAddress,
        }
        .into();
        assert_eq!(bytes[0], 0x83);
        assert_eq!(bytes[1], 0x02);
    }

    #[test]
    fn exception_response_from_bytes() {
        let data: &[u8] = &[0x79, 0x02];
        assert!(ExceptionResponse::try_from(data).is_err());

        let data: &[u8] = &[0x83];
        assert_eq!(
            ExceptionResponse::try_from(data).err().unwrap(),
            Error::BufferSize
        );

        let data: &[u8] = &[0x83, 0x0C];
        assert_eq!(
            ExceptionResponse::try_from(data).err().unwrap(),
            Error::ExceptionCode(0x0C)
        );

        let bytes: &[u8] = &[0x83, 0x02];
        let rsp = ExceptionResponse::try_from(bytes).unwrap();
        assert_eq!(
            rsp,
            ExceptionResponse {
                function: FunctionCode::ReadHoldingRegisters,
                exception: Exception::IllegalDataAddress,
            }
        );
    }

    #[test]
    fn test_min_request_pdu_len() {
        use FunctionCode::*;

        assert_eq!(min_request_pdu_len(ReadCoils), 5);
        assert_eq!(min_request_pdu_len(ReadDiscreteInputs), 5);
        assert_eq!(min_request_pdu_len(ReadInputRegisters), 5);
        assert_eq!(min_request_pdu_len(WriteSingleCoil), 5);
        assert_eq!(min_request_pdu_len(ReadHoldingRegisters), 5);
        assert_eq!(min_request_pdu_len(WriteSingleRegister), 5);
        assert_eq!(min_request_pdu_len(WriteMultipleCoils), 6);
        assert_eq!(min_request_pdu_len(WriteMultipleRegisters), 6);
    }

    #[test]
    fn test_min_response_pdu_len() {
        use FunctionCode::*;

        assert_eq!(min_response_pdu_len(ReadCoils), 2);
        assert_eq!(min_response_pdu_len(ReadDiscreteInputs), 2);
        assert_eq!(min_response_pdu_len(ReadInputRegisters), 2);
        assert_eq!(min_response_pdu_len(WriteSingleCoil), 5);
        assert_eq!(min_response_pdu_len(ReadHoldingRegisters), 2);
        assert_eq!(min_response_pdu_len(WriteSingleRegister), 5);
        assert_eq!(min_response_pdu_len(WriteMultipleCoils), 5);
        assert_eq!(min_response_pdu_len(WriteMultipleRegisters), 5);
    }

    mod serialize_requests {
        use super::*;

        #[test]
        fn read_coils() {
            let buf = &mut [0; 5];
            assert_eq!(Request::ReadCoils(0x12, 4).encode(buf).unwrap(), 5);
            assert_eq!(buf, &[0x01, 0x00, 0x12, 0x00, 0x04]);
        }

        #[test]
        fn buffer_too_small() {
            let buf = &mut [0; 4];
            assert_eq!(
                Request::ReadHoldingRegisters(0, 1).encode(buf).err().unwrap(),
                Error::BufferSize
            );
        }

        #[test]
        fn write_single_coil() {
            let buf = &mut [0; 5];
            Request::WriteSingleCoil(0x1234, true).encode(buf).unwrap();
            assert_eq!(buf, &[0x05, 0x12, 0x34, 0xFF, 0x00]);
            Request::WriteSingleCoil(0x1234, false).encode(buf).unwrap();
            assert_eq!(buf, &[0x05, 0x12, 0x34, 0x00, 0x00]);
        }

        #[test]
        fn write_multiple_coils() {
            let coil_buf = &mut [0; 2];
            let coils = Coils::from_registers(&[0b1_0000_1101], 0, 9, coil_buf).unwrap();
            let buf = &mut [0; 8];
            assert_eq!(Request::WriteMultipleCoils(0x3311, coils).encode(buf).unwrap(), 8);
            assert_eq!(buf, &[0x0F, 0x33, 0x11, 0x00, 0x09, 0x02, 0b0000_1101, 0b1]);
        }

        #[test]
        fn write_no_coils() {
            let coils = Coils::from_registers(&[], 0, 0, &mut []).unwrap();
            let buf = &mut [0xAA; 6];
            assert_eq!(Request::WriteMultipleCoils(7, coils).encode(buf).unwrap(), 6);
            assert_eq!(buf, &[0x0F, 0x00, 0x07, 0x00, 0x00, 0x00]);
        }

        #[test]
        fn write_multiple_registers() {
            let word_buf = &mut [0; 4];
            let data = Data::from_words(&[0xABCD, 0xEF12], word_buf).unwrap();
            let buf = &mut [0; 10];
            assert_eq!(Request::WriteMultipleRegisters(0x06, data).encode(buf).unwrap(), 10);
            assert_eq!(
                buf,
                &[0x10, 0x00, 0x06, 0x00, 0x02, 0x04, 0xAB, 0xCD, 0xEF, 0x12]
            );
        }
    }

    mod deserialize_requests {
        use super::*;

        #[test]
        fn empty_request() {
            let data: &[u8] = &[];
            assert!(Request::try_from(data).is_err());
        }

        #[test]
        fn unsupported_function() {
            let data: &[u8] = &[0x17, 0x00, 0x05, 0x00, 0x33];
            assert_eq!(Request::try_from(data).err().unwrap(), Error::FnCode(0x17));
        }

        #[test]
        fn read_coils() {
            let data: &[u8] = &[0x01];
            assert!(Request::try_from(data).is_err());
            let data: &[u8] = &[0x01, 0x0, 0x0, 0x22];
            assert!(Request::try_from(data).is_err());

            let data: &[u8] = &[0x01, 0x00, 0x12, 0x0, 0x4];
            let req = Request::try_from(data).unwrap();
            assert_eq!(req, Request::ReadCoils(0x12, 4));
        }

        #[test]
        fn read_discrete_inputs() {
            let data: &[u8] = &[2, 0x00, 0x03, 0x00, 19];
            let req = Request::try_from(data).unwrap();
            assert_eq!(req, Request::ReadDiscreteInputs(0x03, 19));
        }

        #[test]
        fn write_single_coil() {
            let bytes: &[u8] = &[5, 0x12, 0x34, 0xFF, 0x00];
            let req = Request::try_from(bytes).unwrap();
            assert_eq!(req, Request::WriteSingleCoil(0x1234, true));

            let bytes: &[u8] = &[5, 0x12, 0x34, 0xFF, 0x55];
            let req = Request::try_from(bytes).unwrap();
            assert_eq!(req, Request::WriteSingleCoil(0x1234, true));

            let bytes: &[u8] = &[5, 0x12, 0x34, 0x12, 0x34];
            let req = Request::try_from(bytes).unwrap();
            assert_eq!(req, Request::WriteSingleCoil(0x1234, false));
        }

        #[test]
        fn write_multiple_coils() {
            let data: &[u8] = &[0x0F, 0x33, 0x11, 0x00, 0x04, 0x02, 0b_0000_1101];
            assert!(Request::try_from(data).is_err());

            let data: &[u8] = &[
                0x0F, 0x33, 0x11, 0x00, 0x04, 0x00, // byte count == 0
            ];
            assert!(Request::try_from(data).is_ok());

            let bytes: &[u8] = &[0x0F, 0x33, 0x11, 0x00, 0x04, 0x01, 0b_0000_1101];
            let req = Request::try_from(bytes).unwrap();
            assert_eq!(
                req,
                Request::WriteMultipleCoils(
                    0x3311,
                    Coils {
                        quantity: 4,
                        data: &[0b1101]
                    }
                )
            );
        }

        #[test]
        fn read_input_registers() {
            let bytes: &[u8] = &[4, 0x00, 0x09, 0x00, 0x4D];
            let req = Request::try_from(bytes).unwrap();
            assert_eq!(req, Request::ReadInputRegisters(0x09, 77));
        }

        #[test]
        fn read_holding_registers() {
            let bytes: &[u8] = &[3, 0x00, 0x09, 0x00, 0x4D];
            let req = Request::try_from(bytes).unwrap();
            assert_eq!(req, Request::ReadHoldingRegisters(0x09, 77));
        }

        #[test]
        fn write_single_register() {
            let bytes: &[u8] = &[6, 0x00, 0x07, 0xAB, 0xCD];
            let req = Request::try_from(bytes).unwrap();
            assert_eq!(req, Request::WriteSingleRegister(0x07, 0xABCD));
        }

        #[test]
        fn write_multiple_registers() {
            let data: &[u8] = &[0x10, 0x00, 0x06, 0x00, 0x02, 0x05, 0xAB, 0xCD, 0xEF, 0x12];
            assert!(Request::try_from(data).is_err());

            let bytes: &[u8] = &[0x10, 0x00, 0x06, 0x00, 0x02, 0x04, 0xAB, 0xCD, 0xEF, 0x12];
            let req = Request::try_from(bytes).unwrap();
            assert_eq!(
                req,
                Request::WriteMultipleRegisters(
                    0x06,
                    Data {
                        quantity: 2,
                        data: &[0xAB, 0xCD, 0xEF, 0x12]
                    }
                )
            );
            if let Request::WriteMultipleRegisters(_, data) = req {
                assert_eq!(data.get(0), Some(0xABCD));
                assert_eq!(data.get(1), Some(0xEF12));
            } else {
                unreachable!()
            };
        }
    }

    mod serialize_responses {
        use super::*;

        #[test]
        fn read_coils() {
            let coil_buf = &mut [0; 2];
            let coils = Coils::from_registers(&[0b1001], 0, 4, coil_buf).unwrap();
            let buf = &mut [0; 3];
            assert_eq!(Response::ReadCoils(coils).encode(buf).unwrap(), 3);
            assert_eq!(buf, &[0x01, 0x01, 0b1001]);
        }

        #[test]
        fn read_holding_registers() {
            let word_buf = &mut [0; 4];
            let data = Data::from_words(&[0xAA00, 0x1111], word_buf).unwrap();
            let buf = &mut [0; 6];
            assert_eq!(Response::ReadHoldingRegisters(data).encode(buf).unwrap(), 6);
            assert_eq!(buf, &[0x03, 0x04, 0xAA, 0x00, 0x11, 0x11]);
        }

        #[test]
        fn write_multiple_coils_echoes_address_and_quantity() {
            let buf = &mut [0; 5];
            assert_eq!(Response::WriteMultipleCoils(0x3311, 5).encode(buf).unwrap(), 5);
            assert_eq!(buf, &[0x0F, 0x33, 0x11, 0x00, 0x05]);
        }

        #[test]
        fn exception() {
            let pdu = ResponsePdu(Err(ExceptionResponse {
                function: FunctionCode::WriteSingleCoil,
                exception: Exception::ServerDeviceFailure,
            }));
            let buf = &mut [0; 2];
            assert_eq!(pdu.encode(buf).unwrap(), 2);
            assert_eq!(buf, &[0x85, 0x04]);
        }
    }

    mod deserialize_responses {
        use super::*;

        #[test]
        fn read_coils() {
            let bytes: &[u8] = &[1, 1, 0b_0000_1001];
            let rsp = Response::try_from(bytes).unwrap();
            assert_eq!(
                rsp,
                Response::ReadCoils(Coils {
                    quantity: 8,
                    data: &[0b_0000_1001]
                })
            );
        }

        #[test]
        fn read_no_coils() {
            let bytes: &[u8] = &[1, 0];
            let rsp = Response::try_from(bytes).unwrap();
            assert_eq!(
                rsp,
                Response::ReadCoils(Coils {
                    quantity: 0,
                    data: &[]
                })
            );
        }

        #[test]
        fn read_coils_with_invalid_byte_count() {
            let bytes: &[u8] = &[1, 2, 0x6];
            assert!(Response::try_from(bytes).is_err());
        }

        #[test]
        fn write_single_coil() {
            let bytes: &[u8] = &[5, 0x00, 0x33, 0xFF, 0x00];
            let rsp = Response::try_from(bytes).unwrap();
            assert_eq!(rsp, Response::WriteSingleCoil(0x33, true));

            let broken_bytes: &[u8] = &[5, 0x00, 0x33];
            assert!(Response::try_from(broken_bytes).is_err());
        }

        #[test]
        fn write_multiple_coils() {
            let bytes: &[u8] = &[0x0F, 0x33, 0x11, 0x00, 0x05];
            let rsp = Response::try_from(bytes).unwrap();
            assert_eq!(rsp, Response::WriteMultipleCoils(0x3311, 5));
            let broken_bytes: &[u8] = &[0x0F, 0x33, 0x11, 0x00];
            assert!(Response::try_from(broken_bytes).is_err());
        }

        #[test]
        fn read_input_registers() {
            let bytes: &[u8] = &[4, 0x06, 0xAA, 0x00, 0xCC, 0xBB, 0xEE, 0xDD];
            let rsp = Response::try_from(bytes).unwrap();
            assert_eq!(
                rsp,
                Response::ReadInputRegisters(Data {
                    quantity: 3,
                    data: &[0xAA, 0x00, 0xCC, 0xBB, 0xEE, 0xDD]
                })
            );
        }

        #[test]
        fn write_single_register() {
            let bytes: &[u8] = &[6, 0x00, 0x07, 0xAB, 0xCD];
            let rsp = Response::try_from(bytes).unwrap();
            assert_eq!(rsp, Response::WriteSingleRegister(0x07, 0xABCD));
            let broken_bytes: &[u8] = &[6, 0x00, 0x07, 0xAB];
            assert!(Response::try_from(broken_bytes).is_err());
        }

        #[test]
        fn unsupported_function() {
            let bytes: &[u8] = &[0x55, 0xCC, 0x88, 0xAA, 0xFF];
            assert_eq!(Response::try_from(bytes).err().unwrap(), Error::FnCode(0x55));
        }
    }
}
