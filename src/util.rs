// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common helpers

use crate::{error::Error, frame::Coil};

/// Turn a bool into a u16 coil value
#[must_use]
pub const fn bool_to_u16_coil(state: bool) -> u16 {
    if state { 0xFF00 } else { 0x0000 }
}

/// Turn a u16 coil value into a boolean value.
///
/// Any value with a high byte of `0xFF` switches the coil on,
/// every other value switches it off.
#[must_use]
pub const fn u16_coil_to_bool(coil: u16) -> bool {
    coil >> 8 == 0xFF
}

/// Calculate the number of bytes required for a given number of coils.
#[must_use]
pub const fn packed_coils_len(bitcount: usize) -> usize {
    bitcount.div_ceil(8)
}

/// Read coil `n` out of a register image (register `n / 16`, bit `n % 16`).
#[must_use]
pub fn coil_bit(registers: &[u16], coil: usize) -> Option<Coil> {
    registers
        .get(coil / 16)
        .map(|reg| (reg >> (coil % 16)) & 0b1 > 0)
}

/// Write coil `n` into a register image (register `n / 16`, bit `n % 16`).
pub fn set_coil_bit(registers: &mut [u16], coil: usize, state: Coil) -> Result<(), Error> {
    let reg = registers.get_mut(coil / 16).ok_or(Error::BufferSize)?;
    let mask = 1 << (coil % 16);
    if state {
        *reg |= mask;
    } else {
        *reg &= !mask;
    }
    Ok(())
}

/// Pack `quantity` coils of a register image, starting at coil `first`,
/// into a byte array (LSB first, unused trailing bits cleared).
///
/// It returns the number of bytes used to pack the coils.
pub fn pack_register_coils(
    registers: &[u16],
    first: usize,
    quantity: usize,
    bytes: &mut [u8],
) -> Result<usize, Error> {
    let packed_size = packed_coils_len(quantity);
    if bytes.len() < packed_size {
        return Err(Error::BufferSize);
    }
    if quantity > 0 && (first + quantity - 1) / 16 >= registers.len() {
        return Err(Error::BufferSize);
    }
    bytes[..packed_size].fill(0);
    for i in 0..quantity {
        if coil_bit(registers, first + i) == Some(true) {
            bytes[i / 8] |= 1 << (i % 8);
        }
    }
    Ok(packed_size)
}

/// Unpack `quantity` coils from a byte array into a register image,
/// starting at coil `first`. Bits outside of the range stay untouched.
pub fn unpack_register_coils(
    bytes: &[u8],
    quantity: usize,
    registers: &mut [u16],
    first: usize,
) -> Result<(), Error> {
    if bytes.len() < packed_coils_len(quantity) {
        return Err(Error::BufferSize);
    }
    if quantity > 0 && (first + quantity - 1) / 16 >= registers.len() {
        return Err(Error::BufferSize);
    }
    for i in 0..quantity {
        let state = (bytes[i / 8] >> (i % 8)) & 0b1 > 0;
        set_coil_bit(registers, first + i, state)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn convert_bool_to_coil() {
        assert_eq!(bool_to_u16_coil(true), 0xFF00);
        assert_eq!(bool_to_u16_coil(false), 0x0000);
    }

    #[test]
    fn convert_coil_to_bool() {
        assert!(u16_coil_to_bool(0xFF00));
        assert!(u16_coil_to_bool(0xFF12));
        assert!(!u16_coil_to_bool(0x0000));
        assert!(!u16_coil_to_bool(0x1234));
        assert!(!u16_coil_to_bool(0x00FF));
    }

    #[test]
    fn coil_bits_in_registers() {
        let regs = &mut [0u16; 2];
        set_coil_bit(regs, 0, true).unwrap();
        set_coil_bit(regs, 17, true).unwrap();
        assert_eq!(regs, &[0x0001, 0x0002]);
        assert_eq!(coil_bit(regs, 17), Some(true));
        assert_eq!(coil_bit(regs, 16), Some(false));
        assert_eq!(coil_bit(regs, 32), None);
        set_coil_bit(regs, 0, false).unwrap();
        assert_eq!(regs[0], 0);
        assert_eq!(set_coil_bit(regs, 32, true), Err(Error::BufferSize));
    }

    #[test]
    fn pack_coils_out_of_registers() {
        let regs = &[0b1010_0000_0000_1101u16, 0x0001];
        let buf = &mut [0xAA; 3];
        assert_eq!(pack_register_coils(regs, 0, 4, buf).unwrap(), 1);
        assert_eq!(buf[0], 0b1101);

        // first byte of the register is low byte on the wire
        assert_eq!(pack_register_coils(regs, 0, 17, buf).unwrap(), 3);
        assert_eq!(buf, &[0b0000_1101, 0b1010_0000, 0b1]);

        assert_eq!(pack_register_coils(regs, 2, 3, buf).unwrap(), 1);
        assert_eq!(buf[0], 0b011);

        assert_eq!(
            pack_register_coils(regs, 20, 13, buf).err().unwrap(),
            Error::BufferSize
        );
    }

    #[test]
    fn coil_packing_round_trip() {
        for quantity in 1..=2000usize {
            for first in [0usize, 1, 7, 15, 16, 33] {
                let mut source = [0u16; 130];
                for n in 0..quantity {
                    if (n * 7 + quantity) % 3 == 0 {
                        set_coil_bit(&mut source, first + n, true).unwrap();
                    }
                }
                let mut bytes = [0u8; 250];
                let len = pack_register_coils(&source, first, quantity, &mut bytes).unwrap();
                assert_eq!(len, quantity.div_ceil(8));
                if quantity % 8 != 0 {
                    assert_eq!(bytes[len - 1] >> (quantity % 8), 0);
                }

                let mut target = [0u16; 130];
                unpack_register_coils(&bytes[..len], quantity, &mut target, first).unwrap();
                assert_eq!(source, target);
            }
        }
    }
}
