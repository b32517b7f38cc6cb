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

    cpu_8086::flags.rs

    Status flag computation for the 8086 arithmetic and logic instructions.

*/

use std::fmt;

use crate::cpu_common::{
    alu::{AluAdc, AluAdd, AluNeg, AluSbb, AluSub, AluWord},
    DataWidth,
    Mnemonic,
};

pub const CPU_FLAG_CARRY: u16 = 0b0000_0000_0000_0001;
pub const CPU_FLAG_PARITY: u16 = 0b0000_0000_0000_0100;
pub const CPU_FLAG_AUX_CARRY: u16 = 0b0000_0000_0001_0000;
pub const CPU_FLAG_ZERO: u16 = 0b0000_0000_0100_0000;
pub const CPU_FLAG_SIGN: u16 = 0b0000_0000_1000_0000;
pub const CPU_FLAG_OVERFLOW: u16 = 0b0000_1000_0000_0000;

// The parity flag is calculated from the lower 8 bits of an alu operation regardless
// of the operand width.  It is trivial to precalculate an 8-bit parity table.
pub const PARITY_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    let mut index = 0;
    while index < 256 {
        table[index] = index.count_ones() % 2 == 0;
        index += 1;
    }
    table
};

#[inline(always)]
pub fn is_parity8(value: u8) -> bool {
    PARITY_TABLE[value as usize]
}

#[inline(always)]
pub fn is_parity16(value: u16) -> bool {
    PARITY_TABLE[(value & 0xFF) as usize]
}

#[inline(always)]
pub fn is_zero<T: AluWord>(result: T) -> bool {
    result == T::ZERO
}

#[inline(always)]
pub fn is_sign<T: AluWord>(result: T) -> bool {
    result & T::SIGN_BIT != T::ZERO
}

/// Unsigned overflow of `lhs + rhs` with no carry in.
#[inline(always)]
pub fn is_carry_add<T: AluWord>(lhs: T, _rhs: T, result: T) -> bool {
    result.into_u16() < lhs.into_u16()
}

/// Unsigned borrow of `lhs - rhs` with no borrow in.
#[inline(always)]
pub fn is_carry_sub<T: AluWord>(lhs: T, rhs: T) -> bool {
    lhs.into_u16() < rhs.into_u16()
}

#[inline(always)]
pub fn is_overflow_add<T: AluWord>(lhs: T, rhs: T, result: T) -> bool {
    (lhs ^ result) & (rhs ^ result) & T::SIGN_BIT != T::ZERO
}

#[inline(always)]
pub fn is_overflow_sub<T: AluWord>(lhs: T, rhs: T, result: T) -> bool {
    (lhs ^ rhs) & (lhs ^ result) & T::SIGN_BIT != T::ZERO
}

/// Carry or borrow out of the low nibble. Identical for addition and subtraction.
#[inline(always)]
pub fn is_aux_carry<T: AluWord>(lhs: T, rhs: T, result: T) -> bool {
    (lhs ^ rhs ^ result).low_byte() & 0x10 != 0
}

/// The six arithmetic status flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    pub carry: bool,
    pub parity: bool,
    pub aux_carry: bool,
    pub zero: bool,
    pub sign: bool,
    pub overflow: bool,
}

impl Flags {
    /// Sign, zero and parity from a result. Carry, overflow and aux carry are clear.
    pub fn from_result<T: AluWord>(result: T) -> Self {
        Self {
            parity: is_parity8(result.low_byte()),
            zero: is_zero(result),
            sign: is_sign(result),
            ..Default::default()
        }
    }

    pub fn after_add<T: AluWord + AluAdc>(lhs: T, rhs: T, carry_in: bool) -> (T, Self) {
        let (result, carry, overflow, aux_carry) = lhs.alu_adc(rhs, carry_in);
        (
            result,
            Self {
                carry,
                overflow,
                aux_carry,
                ..Self::from_result(result)
            },
        )
    }

    pub fn after_sub<T: AluWord + AluSbb>(lhs: T, rhs: T, borrow_in: bool) -> (T, Self) {
        let (result, carry, overflow, aux_carry) = lhs.alu_sbb(rhs, borrow_in);
        (
            result,
            Self {
                carry,
                overflow,
                aux_carry,
                ..Self::from_result(result)
            },
        )
    }

    /// AND, OR, XOR and TEST clear carry, overflow and aux carry.
    pub fn after_logic<T: AluWord>(result: T) -> Self {
        Self::from_result(result)
    }

    pub fn to_word(&self) -> u16 {
        let mut word = 0;
        if self.carry {
            word |= CPU_FLAG_CARRY;
        }
        if self.parity {
            word |= CPU_FLAG_PARITY;
        }
        if self.aux_carry {
            word |= CPU_FLAG_AUX_CARRY;
        }
        if self.zero {
            word |= CPU_FLAG_ZERO;
        }
        if self.sign {
            word |= CPU_FLAG_SIGN;
        }
        if self.overflow {
            word |= CPU_FLAG_OVERFLOW;
        }
        word
    }

    pub fn from_word(word: u16) -> Self {
        Self {
            carry: word & CPU_FLAG_CARRY != 0,
            parity: word & CPU_FLAG_PARITY != 0,
            aux_carry: word & CPU_FLAG_AUX_CARRY != 0,
            zero: word & CPU_FLAG_ZERO != 0,
            sign: word & CPU_FLAG_SIGN != 0,
            overflow: word & CPU_FLAG_OVERFLOW != 0,
        }
    }
}

impl fmt::Display for Flags {
    /// Set flags as letters, in FLAGS bit order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (set, c) in [
            (self.carry, 'C'),
            (self.parity, 'P'),
            (self.aux_carry, 'A'),
            (self.zero, 'Z'),
            (self.sign, 'S'),
            (self.overflow, 'O'),
        ] {
            if set {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// The ALU operations whose flag effects are modelled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbb,
    Cmp,
    And,
    Or,
    Xor,
    Test,
    Neg,
    Inc,
    Dec,
}

impl AluOp {
    pub fn from_mnemonic(mnemonic: Mnemonic) -> Option<AluOp> {
        match mnemonic {
            Mnemonic::ADD => Some(AluOp::Add),
            Mnemonic::ADC => Some(AluOp::Adc),
            Mnemonic::SUB => Some(AluOp::Sub),
            Mnemonic::SBB => Some(AluOp::Sbb),
            Mnemonic::CMP => Some(AluOp::Cmp),
            Mnemonic::AND => Some(AluOp::And),
            Mnemonic::OR => Some(AluOp::Or),
            Mnemonic::XOR => Some(AluOp::Xor),
            Mnemonic::TEST => Some(AluOp::Test),
            Mnemonic::NEG => Some(AluOp::Neg),
            Mnemonic::INC => Some(AluOp::Inc),
            Mnemonic::DEC => Some(AluOp::Dec),
            _ => None,
        }
    }
}

fn alu_eval<T>(op: AluOp, lhs: T, rhs: T, carry_in: bool) -> (T, Flags)
where
    T: AluWord + AluAdd + AluAdc + AluSub + AluSbb + AluNeg,
{
    match op {
        AluOp::Add => Flags::after_add(lhs, rhs, false),
        AluOp::Adc => Flags::after_add(lhs, rhs, carry_in),
        AluOp::Sub | AluOp::Cmp => Flags::after_sub(lhs, rhs, false),
        AluOp::Sbb => Flags::after_sub(lhs, rhs, carry_in),
        AluOp::And | AluOp::Test => {
            let result = lhs & rhs;
            (result, Flags::after_logic(result))
        }
        AluOp::Or => {
            let result = lhs | rhs;
            (result, Flags::after_logic(result))
        }
        AluOp::Xor => {
            let result = lhs ^ rhs;
            (result, Flags::after_logic(result))
        }
        AluOp::Neg => {
            // Carry is set unless the operand was zero
            let (result, carry, overflow, aux_carry) = lhs.alu_neg();
            (
                result,
                Flags {
                    carry,
                    overflow,
                    aux_carry,
                    ..Flags::from_result(result)
                },
            )
        }
        AluOp::Inc | AluOp::Dec => {
            // INC and DEC leave carry untouched
            let (result, _carry, overflow, aux_carry) = if let AluOp::Inc = op {
                lhs.alu_add(T::from_u16(1))
            }
            else {
                lhs.alu_sub(T::from_u16(1))
            };
            (
                result,
                Flags {
                    carry: carry_in,
                    overflow,
                    aux_carry,
                    ..Flags::from_result(result)
                },
            )
        }
    }
}

/// Compute the result and resulting flags of `op` applied to `lhs` and `rhs` at the given
/// width. `carry_in` is the incoming carry flag, consumed by ADC, SBB, INC and DEC. The
/// result of CMP and TEST is returned even though the instructions discard it. NEG, INC
/// and DEC ignore `rhs`.
pub fn compute_flags(op: AluOp, width: DataWidth, lhs: u16, rhs: u16, carry_in: bool) -> (u16, Flags) {
    match width {
        DataWidth::Byte => {
            let (result, flags) = alu_eval(op, lhs as u8, rhs as u8, carry_in);
            (result as u16, flags)
        }
        _ => alu_eval(op, lhs, rhs, carry_in),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity() {
        assert!(is_parity8(0b0000_1010));
        assert!(!is_parity8(0b0001_1010));
        assert!(is_parity8(0));
        for v in 0..=255u8 {
            assert_eq!(is_parity8(v), is_parity16(v as u16));
            assert_eq!(is_parity8(v), v.count_ones() % 2 == 0);
        }
        // Only the low byte counts
        assert_eq!(is_parity16(0x0103), is_parity8(0x03));
    }

    #[test]
    fn test_predicates() {
        assert!(is_zero(0u8));
        assert!(!is_zero(0x0100u16));
        assert!(is_sign(0x80u8));
        assert!(!is_sign(0x0080u16));
        assert!(is_sign(0x8000u16));

        assert!(is_carry_add(0xFFu8, 0x01, 0x00));
        assert!(!is_carry_add(0x7Fu8, 0x01, 0x80));
        assert!(is_carry_sub(0x0001u16, 0x0002));
        assert!(!is_carry_sub(0x0002u16, 0x0002));

        assert!(is_overflow_add(0x7Fu8, 0x01, 0x80));
        assert!(!is_overflow_add(0xFFu8, 0x01, 0x00));
        assert!(is_overflow_sub(0x8000u16, 0x0001, 0x7FFF));
        assert!(!is_overflow_sub(0x0005u16, 0x0001, 0x0004));

        assert!(is_aux_carry(0x0Fu8, 0x01, 0x10));
        assert!(!is_aux_carry(0x1234u16, 0x1111, 0x2345));
    }

    #[test]
    fn test_predicates_agree_with_alu() {
        for lhs in (0..=255u8).step_by(7) {
            for rhs in (0..=255u8).step_by(11) {
                let (result, carry, overflow, aux_carry) = lhs.alu_add(rhs);
                assert_eq!(carry, is_carry_add(lhs, rhs, result));
                assert_eq!(overflow, is_overflow_add(lhs, rhs, result));
                assert_eq!(aux_carry, is_aux_carry(lhs, rhs, result));

                let (result, carry, overflow, aux_carry) = lhs.alu_sub(rhs);
                assert_eq!(carry, is_carry_sub(lhs, rhs));
                assert_eq!(overflow, is_overflow_sub(lhs, rhs, result));
                assert_eq!(aux_carry, is_aux_carry(lhs, rhs, result));
            }
        }
    }

    #[test]
    fn test_flags_word() {
        let flags = Flags {
            carry: true,
            zero: true,
            overflow: true,
            ..Default::default()
        };
        assert_eq!(flags.to_word(), CPU_FLAG_CARRY | CPU_FLAG_ZERO | CPU_FLAG_OVERFLOW);
        assert_eq!(Flags::from_word(flags.to_word()), flags);
        assert_eq!(flags.to_string(), "CZO");
        assert_eq!(Flags::default().to_word(), 0);
    }

    #[test]
    fn test_compute_flags() {
        // sub bx, cx with bx == cx
        let (result, flags) = compute_flags(AluOp::Sub, DataWidth::Word, 0xF802, 0xF802, false);
        assert_eq!(result, 0);
        assert_eq!(flags.to_string(), "PZ");

        // add al, 1 with al == 0x7F
        let (result, flags) = compute_flags(AluOp::Add, DataWidth::Byte, 0x7F, 0x01, false);
        assert_eq!(result, 0x80);
        assert_eq!(flags.to_string(), "ASO");

        // cmp leaves the operand alone but reports the borrow
        let (_, flags) = compute_flags(AluOp::Cmp, DataWidth::Word, 0x0001, 0x0002, false);
        assert!(flags.carry);
        assert!(flags.sign);

        let (result, flags) = compute_flags(AluOp::Xor, DataWidth::Word, 0x1234, 0x1234, true);
        assert_eq!(result, 0);
        assert!(!flags.carry);
        assert!(flags.zero);

        let (result, flags) = compute_flags(AluOp::Adc, DataWidth::Byte, 0xFF, 0x00, true);
        assert_eq!(result, 0);
        assert!(flags.carry && flags.zero);

        let (result, flags) = compute_flags(AluOp::Neg, DataWidth::Byte, 0x00, 0, false);
        assert_eq!(result, 0);
        assert!(!flags.carry);

        // inc preserves carry
        let (result, flags) = compute_flags(AluOp::Inc, DataWidth::Word, 0xFFFF, 0, true);
        assert_eq!(result, 0);
        assert!(flags.carry && flags.zero);
        let (_, flags) = compute_flags(AluOp::Dec, DataWidth::Byte, 0x01, 0, false);
        assert!(!flags.carry && flags.zero);
    }

    #[test]
    fn test_alu_op_from_mnemonic() {
        assert_eq!(AluOp::from_mnemonic(Mnemonic::SBB), Some(AluOp::Sbb));
        assert_eq!(AluOp::from_mnemonic(Mnemonic::MOV), None);
    }
}
