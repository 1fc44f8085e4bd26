// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{rtu::SlaveId, *};
use crate::error::Error;

/// A master-side description of one request, before encoding.
///
/// `registers` supplies the values of write requests. For coil writes
/// coil `n` is taken from register `n / 16`, bit `n % 16`.
/// Read requests leave it empty; their reply is decoded into the
/// register image of the polling device.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Telegram<'a> {
    /// Target slave (`1..=247`)
    pub slave: SlaveId,
    pub function: FunctionCode,
    /// Address of the first coil or register at the slave
    pub address: Address,
    /// Number of coils or registers
    pub quantity: Quantity,
    pub registers: &'a [u16],
}

impl<'a> Telegram<'a> {
    #[must_use]
    pub const fn read_coils(slave: SlaveId, address: Address, quantity: Quantity) -> Self {
        Self::read(slave, FunctionCode::ReadCoils, address, quantity)
    }

    #[must_use]
    pub const fn read_discrete_inputs(
        slave: SlaveId,
        address: Address,
        quantity: Quantity,
    ) -> Self {
        Self::read(slave, FunctionCode::ReadDiscreteInputs, address, quantity)
    }

    #[must_use]
    pub const fn read_holding_registers(
        slave: SlaveId,
        address: Address,
        quantity: Quantity,
    ) -> Self {
        Self::read(slave, FunctionCode::ReadHoldingRegisters, address, quantity)
    }

    #[must_use]
    pub const fn read_input_registers(
        slave: SlaveId,
        address: Address,
        quantity: Quantity,
    ) -> Self {
        Self::read(slave, FunctionCode::ReadInputRegisters, address, quantity)
    }

    /// Switch a single coil: on if `registers[0]` is nonzero.
    #[must_use]
    pub const fn write_single_coil(slave: SlaveId, address: Address, registers: &'a [u16]) -> Self {
        Self {
            slave,
            function: FunctionCode::WriteSingleCoil,
            address,
            quantity: 1,
            registers,
        }
    }

    /// Write `registers[0]` to a single register.
    #[must_use]
    pub const fn write_single_register(
        slave: SlaveId,
        address: Address,
        registers: &'a [u16],
    ) -> Self {
        Self {
            slave,
            function: FunctionCode::WriteSingleRegister,
            address,
            quantity: 1,
            registers,
        }
    }

    #[must_use]
    pub const fn write_multiple_coils(
        slave: SlaveId,
        address: Address,
        quantity: Quantity,
        registers: &'a [u16],
    ) -> Self {
        Self {
            slave,
            function: FunctionCode::WriteMultipleCoils,
            address,
            quantity,
            registers,
        }
    }

    /// Write all of `registers`, starting at `address`.
    ///
    /// The quantity saturates at `u16::MAX`; such a slice is rejected
    /// by [`Telegram::to_request`] instead of being cut short.
    #[must_use]
    pub const fn write_multiple_registers(
        slave: SlaveId,
        address: Address,
        registers: &'a [u16],
    ) -> Self {
        Self {
            slave,
            function: FunctionCode::WriteMultipleRegisters,
            address,
            quantity: if registers.len() > Quantity::MAX as usize {
                Quantity::MAX
            } else {
                registers.len() as Quantity
            },
            registers,
        }
    }

    const fn read(
        slave: SlaveId,
        function: FunctionCode,
        address: Address,
        quantity: Quantity,
    ) -> Self {
        Self {
            slave,
            function,
            address,
            quantity,
            registers: &[],
        }
    }

    /// Build the request PDU, packing write data into `buf`.
    pub fn to_request<'b>(&self, buf: &'b mut [u8]) -> Result<Request<'b>, Error> {
        use FunctionCode as F;

        let Self {
            function,
            address,
            quantity,
            registers,
            ..
        } = *self;
        let first = || registers.first().copied().ok_or(Error::BufferSize);
        let req = match function {
            F::ReadCoils => Request::ReadCoils(address, quantity),
            F::ReadDiscreteInputs => Request::ReadDiscreteInputs(address, quantity),
            F::ReadHoldingRegisters => Request::ReadHoldingRegisters(address, quantity),
            F::ReadInputRegisters => Request::ReadInputRegisters(address, quantity),
            F::WriteSingleCoil => Request::WriteSingleCoil(address, first()? != 0),
            F::WriteSingleRegister => Request::WriteSingleRegister(address, first()?),
            F::WriteMultipleCoils => Request::WriteMultipleCoils(
                address,
                Coils::from_registers(registers, 0, usize::from(quantity), buf)?,
            ),
            F::WriteMultipleRegisters => {
                if quantity == Quantity::MAX && registers.len() > usize::from(quantity) {
                    return Err(Error::BufferSize);
                }
                let words = registers
                    .get(..usize::from(quantity))
                    .ok_or(Error::BufferSize)?;
                Request::WriteMultipleRegisters(address, Data::from_words(words, buf)?)
            }
            F::Custom(code) => return Err(Error::FnCode(code)),
        };
        Ok(req)
    }
}
