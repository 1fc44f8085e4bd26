// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::*;
use crate::{error::*, util::*};

/// Packed coils
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coils<'c> {
    pub(crate) data: RawData<'c>,
    pub(crate) quantity: usize,
}

impl<'c> Coils<'c> {
    /// Pack `quantity` coils of a register image, starting at coil `first`,
    /// into a byte buffer.
    pub fn from_registers(
        registers: &[u16],
        first: usize,
        quantity: usize,
        target: &'c mut [u8],
    ) -> Result<Self, Error> {
        let len = pack_register_coils(registers, first, quantity, target)?;
        Ok(Coils {
            data: &target[..len],
            quantity,
        })
    }
    /// Unpack the coils into a register image, starting at coil `first`.
    pub fn copy_to_registers(&self, registers: &mut [u16], first: usize) -> Result<(), Error> {
        unpack_register_coils(self.data, self.quantity, registers, first)
    }
    /// Quantity of coils
    #[must_use]
    pub const fn len(&self) -> usize {
        self.quantity
    }
    ///  Returns `true` if the container has no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.quantity == 0
    }
    /// Number of bytes required to pack the coils.
    #[must_use]
    pub const fn packed_len(&self) -> usize {
        packed_coils_len(self.quantity)
    }
    /// Get a specific coil.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Coil> {
        if idx >= self.quantity {
            return None;
        }
        self.data.get(idx / 8).map(|byte| (byte >> (idx % 8)) & 0b1 > 0)
    }
    /// The packed bytes.
    #[must_use]
    pub const fn payload(&self) -> &[u8] {
        self.data
    }
}

/// Coils iterator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoilsIter<'c> {
    cnt: usize,
    coils: Coils<'c>,
}

impl Iterator for CoilsIter<'_> {
    type Item = Coil;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.coils.get(self.cnt);
        self.cnt += 1;
        result
    }
}

impl<'c> IntoIterator for Coils<'c> {
    type Item = Coil;
    type IntoIter = CoilsIter<'c>;

    fn into_iter(self) -> Self::IntoIter {
        CoilsIter {
            cnt: 0,
            coils: self,
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn iterate_packed_coils() {
        let buff: &mut [u8] = &mut [0, 0];
        let coils = Coils::from_registers(&[0b1101], 0, 4, buff).unwrap();
        assert_eq!(coils.len(), 4);
        assert_eq!(coils.payload(), &[0b1101]);
        let mut iter = coils.into_iter();
        assert_eq!(iter.next(), Some(true));
        assert_eq!(iter.next(), Some(false));
        assert_eq!(iter.next(), Some(true));
        assert_eq!(iter.next(), Some(true));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn from_register_image() {
        let regs = &[0x8001u16, 0x0001];
        let buff = &mut [0; 4];
        let coils = Coils::from_registers(regs, 15, 2, buff).unwrap();
        assert_eq!(coils.len(), 2);
        assert_eq!(coils.packed_len(), 1);
        assert_eq!(coils.payload(), &[0b11]);
    }

    #[test]
    fn copy_into_register_image() {
        let coils = Coils {
            data: &[0b0000_0101],
            quantity: 3,
        };
        let regs = &mut [0xFFFFu16, 0];
        coils.copy_to_registers(regs, 14).unwrap();
        // coil 14 = 1, coil 15 = 0, coil 16 = 1
        assert_eq!(regs, &[0x7FFF, 0x0001]);
        assert!(coils.copy_to_registers(&mut [0u16], 14).is_err());
    }

    #[test]
    fn coils_empty() {
        let coils = Coils {
            data: &[0, 1, 2],
            quantity: 0,
        };
        assert!(coils.is_empty());
        assert_eq!(coils.packed_len(), 0);
    }

    #[test]
    fn coils_get() {
        let coils = Coils {
            data: &[0b01],
            quantity: 2,
        };
        assert_eq!(coils.get(0), Some(true));
        assert_eq!(coils.get(1), Some(false));
        assert_eq!(coils.get(2), None);

        let coils = Coils {
            data: &[0xff, 0b11],
            quantity: 10,
        };
        for i in 0..10 {
            assert_eq!(coils.get(i), Some(true));
        }
        assert_eq!(coils.get(11), None);

        // the quantity claims more bits than there are bytes
        let coils = Coils {
            data: &[0xff],
            quantity: 12,
        };
        assert_eq!(coils.get(9), None);
    }

    #[test]
    fn coils_into_iter() {
        let coils = Coils {
            data: &[0b0101_0011],
            quantity: 5,
        };
        let mut coils_iter = coils.into_iter();
        assert_eq!(coils_iter.next(), Some(true));
        assert_eq!(coils_iter.next(), Some(true));
        assert_eq!(coils_iter.next(), Some(false));
        assert_eq!(coils_iter.next(), Some(false));
        assert_eq!(coils_iter.next(), Some(true));
        assert_eq!(coils_iter.next(), None);
    }
}
