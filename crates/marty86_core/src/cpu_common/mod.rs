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

    cpu_common::mod.rs

    Types shared by the 8086 decoder, renderer and flag routines: registers,
    segments, data widths and prefix masks.

*/

pub mod addressing;
pub mod alu;
pub mod display;
pub mod error;
pub mod instruction;
pub mod mnemonic;
pub mod operands;

pub use addressing::{AddressingMode, Displacement, MemoryReference};
pub use display::OutputValueMode;
pub use error::{AssemblyError, DecodeError};
pub use instruction::{Disassembly, Instruction};
pub use mnemonic::Mnemonic;
pub use operands::{Immediate, ImmediateFlag, Operand};

use strum_macros::{Display, IntoStaticStr};

// Instruction prefixes
pub const OPCODE_PREFIX_ES_OVERRIDE: u32 = 0b_0000_0000_0100;
pub const OPCODE_PREFIX_CS_OVERRIDE: u32 = 0b_0000_0000_1000;
pub const OPCODE_PREFIX_SS_OVERRIDE: u32 = 0b_0000_0001_0000;
pub const OPCODE_PREFIX_DS_OVERRIDE: u32 = 0b_0000_0010_0000;
pub const OPCODE_SEG_OVERRIDE_MASK: u32 = 0b_0000_0011_1100;
pub const OPCODE_PREFIX_LOCK: u32 = 0b_0000_1000_0000;
/// REPNE (0xF2)
pub const OPCODE_PREFIX_REP1: u32 = 0b_0001_0000_0000;
/// REP (0xF3)
pub const OPCODE_PREFIX_REP2: u32 = 0b_0010_0000_0000;
pub const OPCODE_PREFIX_REPMASK: u32 = 0b_0011_0000_0000;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DataWidth {
    #[default]
    None,
    Byte,
    Word,
}

impl DataWidth {
    /// Number of hex digits used to render a value of this width.
    pub const fn hex_digits(&self) -> usize {
        match self {
            DataWidth::Byte => 2,
            _ => 4,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum Register {
    AL,
    CL,
    DL,
    BL,
    AH,
    CH,
    DH,
    BH,
    AX,
    CX,
    DX,
    BX,
    SP,
    BP,
    SI,
    DI,
    ES,
    CS,
    SS,
    DS,
}

impl Register {
    pub const fn width(&self) -> DataWidth {
        match self {
            Register::AL
            | Register::CL
            | Register::DL
            | Register::BL
            | Register::AH
            | Register::CH
            | Register::DH
            | Register::BH => DataWidth::Byte,
            _ => DataWidth::Word,
        }
    }

    pub const fn is_segment(&self) -> bool {
        matches!(self, Register::ES | Register::CS | Register::SS | Register::DS)
    }
}

pub const REGISTER8_LUT: [Register; 8] = [
    Register::AL,
    Register::CL,
    Register::DL,
    Register::BL,
    Register::AH,
    Register::CH,
    Register::DH,
    Register::BH,
];

pub const REGISTER16_LUT: [Register; 8] = [
    Register::AX,
    Register::CX,
    Register::DX,
    Register::BX,
    Register::SP,
    Register::BP,
    Register::SI,
    Register::DI,
];

pub const SREGISTER_LUT: [Register; 4] = [Register::ES, Register::CS, Register::SS, Register::DS];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum Segment {
    ES,
    CS,
    SS,
    DS,
}

impl Segment {
    pub const fn register(&self) -> Register {
        match self {
            Segment::ES => Register::ES,
            Segment::CS => Register::CS,
            Segment::SS => Register::SS,
            Segment::DS => Register::DS,
        }
    }

    /// The prefix flag recorded in [Instruction::prefixes] for an override to this segment.
    pub const fn override_flag(&self) -> u32 {
        match self {
            Segment::ES => OPCODE_PREFIX_ES_OVERRIDE,
            Segment::CS => OPCODE_PREFIX_CS_OVERRIDE,
            Segment::SS => OPCODE_PREFIX_SS_OVERRIDE,
            Segment::DS => OPCODE_PREFIX_DS_OVERRIDE,
        }
    }

    pub const fn from_prefixes(prefixes: u32) -> Option<Segment> {
        match prefixes & OPCODE_SEG_OVERRIDE_MASK {
            OPCODE_PREFIX_ES_OVERRIDE => Some(Segment::ES),
            OPCODE_PREFIX_CS_OVERRIDE => Some(Segment::CS),
            OPCODE_PREFIX_SS_OVERRIDE => Some(Segment::SS),
            OPCODE_PREFIX_DS_OVERRIDE => Some(Segment::DS),
            _ => None,
        }
    }
}

/// Calculate a 20-bit linear address from a segment and offset.
#[inline]
pub fn calc_linear_address(segment: u16, offset: u16) -> u32 {
    (((segment as u32) << 4) + offset as u32) & 0xFFFFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_names() {
        assert_eq!(Register::AL.to_string(), "AL");
        assert_eq!(Register::DI.to_string(), "DI");
        let s: &'static str = Register::SS.into();
        assert_eq!(s, "SS");
    }

    #[test]
    fn test_register_luts() {
        assert!(REGISTER8_LUT.iter().all(|r| r.width() == DataWidth::Byte));
        assert!(REGISTER16_LUT.iter().all(|r| r.width() == DataWidth::Word && !r.is_segment()));
        assert!(SREGISTER_LUT.iter().all(|r| r.is_segment()));
    }

    #[test]
    fn test_segment_prefix_flags() {
        for seg in [Segment::ES, Segment::CS, Segment::SS, Segment::DS] {
            assert_eq!(Segment::from_prefixes(seg.override_flag() | OPCODE_PREFIX_LOCK), Some(seg));
        }
        assert_eq!(Segment::from_prefixes(OPCODE_PREFIX_REP2), None);
    }

    #[test]
    fn test_linear_address_wraps() {
        assert_eq!(calc_linear_address(0x1234, 0x0010), 0x12350);
        assert_eq!(calc_linear_address(0xFFFF, 0x0010), 0x00000);
    }
}
