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

    cpu_common::operands.rs

    Decoded instruction operands: registers, immediates and memory references.

*/

use crate::cpu_common::{DataWidth, MemoryReference, Register};

/// How an immediate value should be interpreted when rendered or executed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImmediateFlag {
    #[default]
    None,
    /// A signed displacement relative to the address of the next instruction.
    RelativeJumpDisplacement,
    /// Port numbers, interrupt vectors, stack adjustments and ESC opcodes.
    Unsigned,
    FarSegment,
    FarOffset,
}

/// An immediate value, stored sign-extended to 16 bits. `width` records how many bits
/// the encoding actually carried.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Immediate {
    pub value: i16,
    pub width: DataWidth,
    pub flag: ImmediateFlag,
}

impl Immediate {
    pub const fn byte(value: u8) -> Self {
        Self {
            value: value as i8 as i16,
            width: DataWidth::Byte,
            flag: ImmediateFlag::None,
        }
    }

    pub const fn word(value: u16) -> Self {
        Self {
            value: value as i16,
            width: DataWidth::Word,
            flag: ImmediateFlag::None,
        }
    }

    /// An 8-bit immediate sign-extended to a word operand.
    pub const fn sign_extended(value: i8) -> Self {
        Self {
            value: value as i16,
            width: DataWidth::Word,
            flag: ImmediateFlag::None,
        }
    }

    pub const fn relative8(disp: i8) -> Self {
        Self {
            value: disp as i16,
            width: DataWidth::Byte,
            flag: ImmediateFlag::RelativeJumpDisplacement,
        }
    }

    pub const fn relative16(disp: i16) -> Self {
        Self {
            value: disp,
            width: DataWidth::Word,
            flag: ImmediateFlag::RelativeJumpDisplacement,
        }
    }

    pub const fn with_flag(mut self, flag: ImmediateFlag) -> Self {
        self.flag = flag;
        self
    }

    /// The encoded bits, zero-extended.
    pub const fn as_unsigned(&self) -> u16 {
        match self.width {
            DataWidth::Byte => self.value as u8 as u16,
            _ => self.value as u16,
        }
    }

    pub const fn is_relative(&self) -> bool {
        matches!(self.flag, ImmediateFlag::RelativeJumpDisplacement)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    Register(Register),
    Immediate(Immediate),
    Memory(MemoryReference),
}

impl Operand {
    pub fn is_register(&self) -> bool {
        matches!(self, Operand::Register(_))
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, Operand::Memory(_))
    }

    pub fn width(&self) -> DataWidth {
        match self {
            Operand::Register(reg) => reg.width(),
            Operand::Immediate(imm) => imm.width,
            Operand::Memory(mem) => mem.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_extension() {
        let imm = Immediate::byte(0xF4);
        assert_eq!(imm.value, -12);
        assert_eq!(imm.as_unsigned(), 0xF4);

        let imm = Immediate::sign_extended(-3);
        assert_eq!(imm.width, DataWidth::Word);
        assert_eq!(imm.as_unsigned(), 0xFFFD);

        let imm = Immediate::word(0xF003);
        assert_eq!(imm.value, -4093);
        assert_eq!(imm.as_unsigned(), 0xF003);
    }

    #[test]
    fn test_relative_flag() {
        let imm = Immediate::relative8(-20);
        assert!(imm.is_relative());
        assert!(!Immediate::byte(1).is_relative());
        assert_eq!(
            Immediate::word(4).with_flag(ImmediateFlag::Unsigned).flag,
            ImmediateFlag::Unsigned
        );
    }

    #[test]
    fn test_operand_width() {
        assert_eq!(Operand::Register(Register::AH).width(), DataWidth::Byte);
        assert_eq!(Operand::Immediate(Immediate::word(1)).width(), DataWidth::Word);
        assert!(Operand::Register(Register::ES).is_register());
    }
}
