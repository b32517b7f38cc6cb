/*
    MartyPC
    https://github.com/dbalsom/martypc

    Copyright 2022-2025 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    cpu_common::alu.rs

    Arithmetic primitives shared by the flag routines. Each returns the wrapped
    result together with carry, overflow and auxiliary carry.

*/

use std::ops::{BitAnd, BitOr, BitXor};

/// An operand width the ALU operates on: `u8` for byte instructions, `u16` for word.
pub trait AluWord:
    Copy + Eq + Default + BitAnd<Output = Self> + BitOr<Output = Self> + BitXor<Output = Self>
{
    const SIGN_BIT: Self;
    const ZERO: Self;

    fn low_byte(self) -> u8;
    fn from_u16(value: u16) -> Self;
    fn into_u16(self) -> u16;
}

pub trait AluNeg: Sized {
    fn alu_neg(self) -> (Self, bool, bool, bool);
}

pub trait AluSub<Rhs = Self>: Sized {
    fn alu_sub(self, rhs: Rhs) -> (Self, bool, bool, bool);
}

pub trait AluSbb<Rhs = Self>: Sized {
    fn alu_sbb(self, rhs: Rhs, carry: bool) -> (Self, bool, bool, bool);
}

pub trait AluAdd<Rhs = Self>: Sized {
    fn alu_add(self, rhs: Rhs) -> (Self, bool, bool, bool);
}

pub trait AluAdc<Rhs = Self>: Sized {
    fn alu_adc(self, rhs: Rhs, carry: bool) -> (Self, bool, bool, bool);
}

macro_rules! impl_alu {
    ($prim:ty) => {
        impl AluWord for $prim {
            const SIGN_BIT: Self = 1 << (<$prim>::BITS - 1);
            const ZERO: Self = 0;

            #[inline]
            fn low_byte(self) -> u8 {
                self as u8
            }
            #[inline]
            fn from_u16(value: u16) -> Self {
                value as Self
            }
            #[inline]
            fn into_u16(self) -> u16 {
                self as u16
            }
        }

        impl AluNeg for $prim {
            /// Negation, computed as 0 - self. Flags are those of the subtraction.
            fn alu_neg(self) -> (Self, bool, bool, bool) {
                (0 as $prim).alu_sub(self)
            }
        }

        impl AluSub for $prim {
            fn alu_sub(self, rhs: Self) -> (Self, bool, bool, bool) {
                self.alu_sbb(rhs, false)
            }
        }

        impl AluSbb for $prim {
            /// Subtraction with borrow. Carry is an unsigned borrow, overflow a signed one,
            /// aux carry a borrow out of the low nibble.
            fn alu_sbb(self, rhs: Self, carry_in: bool) -> (Self, bool, bool, bool) {
                let lhs_w = self as u32;
                let rhs_w = rhs as u32;
                let result = lhs_w.wrapping_sub(rhs_w + carry_in as u32);

                let carry = result & (0xFFFF_FFFF << <$prim>::BITS) != 0;
                let overflow = (lhs_w ^ rhs_w) & (lhs_w ^ result) & (1 << (<$prim>::BITS - 1)) != 0;
                let aux_carry = ((lhs_w ^ rhs_w ^ result) & 0x10) != 0;

                (result as Self, carry, overflow, aux_carry)
            }
        }

        impl AluAdd for $prim {
            fn alu_add(self, rhs: Self) -> (Self, bool, bool, bool) {
                self.alu_adc(rhs, false)
            }
        }

        impl AluAdc for $prim {
            /// Addition with carry. Carry is an unsigned overflow, overflow a signed one,
            /// aux carry a carry out of the low nibble.
            fn alu_adc(self, rhs: Self, carry_in: bool) -> (Self, bool, bool, bool) {
                let lhs_w = self as u32;
                let rhs_w = rhs as u32;
                let result = lhs_w + rhs_w + carry_in as u32;

                let carry = result & (0xFFFF_FFFF << <$prim>::BITS) != 0;
                let overflow = (lhs_w ^ result) & (rhs_w ^ result) & (1 << (<$prim>::BITS - 1)) != 0;
                let aux_carry = ((lhs_w ^ rhs_w ^ result) & 0x10) != 0;

                (result as Self, carry, overflow, aux_carry)
            }
        }
    };
}

impl_alu!(u8);
impl_alu!(u16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alu_add() {
        assert_eq!(0x7Fu8.alu_add(1), (0x80, false, true, true));
        assert_eq!(0xFFu8.alu_add(1), (0x00, true, false, true));
        assert_eq!(0x1234u16.alu_add(0x1111), (0x2345, false, false, false));
        assert_eq!(0x8000u16.alu_add(0x8000), (0x0000, true, true, false));
    }

    #[test]
    fn test_alu_adc() {
        assert_eq!(0xFEu8.alu_adc(0x01, true), (0x00, true, false, true));
        assert_eq!(0x05u8.alu_adc(0xFF, true), (0x05, true, false, true));
        assert_eq!(0x7FFFu16.alu_adc(0, true), (0x8000, false, true, true));
    }

    #[test]
    fn test_alu_sub() {
        assert_eq!(0x00u8.alu_sub(1), (0xFF, true, false, true));
        assert_eq!(0x80u8.alu_sub(1), (0x7F, false, true, true));
        assert_eq!(0x0010u16.alu_sub(0x0010), (0x0000, false, false, false));
    }

    #[test]
    fn test_alu_sbb() {
        assert_eq!(0x00u8.alu_sbb(0xFF, true), (0x00, true, false, true));
        assert_eq!(0x1000u16.alu_sbb(0x0FFF, true), (0x0000, false, false, true));
    }

    #[test]
    fn test_alu_neg() {
        assert_eq!(0x01u8.alu_neg(), (0xFF, true, false, true));
        assert_eq!(0x80u8.alu_neg(), (0x80, true, true, false));
        assert_eq!(0u16.alu_neg(), (0, false, false, false));
    }

    #[test]
    fn test_alu_word() {
        assert_eq!(<u8 as AluWord>::SIGN_BIT, 0x80);
        assert_eq!(<u16 as AluWord>::SIGN_BIT, 0x8000);
        assert_eq!(0x1234u16.low_byte(), 0x34);
        assert_eq!(<u8 as AluWord>::from_u16(0x1234), 0x34);
    }
}
