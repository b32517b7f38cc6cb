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

    cpu_common::addressing.rs

    This module defines 8086 memory addressing modes, displacements and the
    memory operand reference.

*/

use crate::cpu_common::{calc_linear_address, DataWidth, Register, Segment};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Displacement {
    NoDisp,
    Disp8(i8),
    Disp16(i16),
}

impl Displacement {
    pub fn get_i16(&self) -> i16 {
        match self {
            Displacement::Disp8(disp) => *disp as i16,
            Displacement::Disp16(disp) => *disp,
            Displacement::NoDisp => 0,
        }
    }
    pub fn get_u16(&self) -> u16 {
        match self {
            Displacement::Disp8(disp) => (*disp as i16) as u16,
            Displacement::Disp16(disp) => *disp as u16,
            Displacement::NoDisp => 0,
        }
    }
    pub fn is_zero(&self) -> bool {
        self.get_i16() == 0
    }
    pub fn width(&self) -> DataWidth {
        match self {
            Displacement::NoDisp => DataWidth::None,
            Displacement::Disp8(_) => DataWidth::Byte,
            Displacement::Disp16(_) => DataWidth::Word,
        }
    }
}

/// The base/index combination selected by the r/m field of a ModRM byte. `Direct` is the
/// mod=00, r/m=110 form, where a 16-bit displacement is the whole address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    BxSi,
    BxDi,
    BpSi,
    BpDi,
    Si,
    Di,
    Bp,
    Bx,
    Direct,
}

impl AddressingMode {
    pub const fn from_rm(rm: u8) -> AddressingMode {
        match rm & 0x07 {
            0b000 => AddressingMode::BxSi,
            0b001 => AddressingMode::BxDi,
            0b010 => AddressingMode::BpSi,
            0b011 => AddressingMode::BpDi,
            0b100 => AddressingMode::Si,
            0b101 => AddressingMode::Di,
            0b110 => AddressingMode::Bp,
            _ => AddressingMode::Bx,
        }
    }

    /// Base and index registers summed to form the effective address.
    pub const fn registers(&self) -> (Option<Register>, Option<Register>) {
        match self {
            AddressingMode::BxSi => (Some(Register::BX), Some(Register::SI)),
            AddressingMode::BxDi => (Some(Register::BX), Some(Register::DI)),
            AddressingMode::BpSi => (Some(Register::BP), Some(Register::SI)),
            AddressingMode::BpDi => (Some(Register::BP), Some(Register::DI)),
            AddressingMode::Si => (Some(Register::SI), None),
            AddressingMode::Di => (Some(Register::DI), None),
            AddressingMode::Bp => (Some(Register::BP), None),
            AddressingMode::Bx => (Some(Register::BX), None),
            AddressingMode::Direct => (None, None),
        }
    }

    /// BP-based modes address the stack segment.
    pub const fn default_segment(&self) -> Segment {
        match self {
            AddressingMode::BpSi | AddressingMode::BpDi | AddressingMode::Bp => Segment::SS,
            _ => Segment::DS,
        }
    }
}

/// A memory operand as decoded from a ModRM byte or a direct offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemoryReference {
    pub mode: AddressingMode,
    pub displacement: Displacement,
    pub segment_override: Option<Segment>,
    pub size: DataWidth,
}

impl MemoryReference {
    pub fn new(mode: AddressingMode, displacement: Displacement, size: DataWidth) -> Self {
        Self {
            mode,
            displacement,
            segment_override: None,
            size,
        }
    }

    /// A direct address, as produced by mod=00 r/m=110 or the accumulator offset moves.
    pub fn direct(address: u16, size: DataWidth) -> Self {
        Self::new(AddressingMode::Direct, Displacement::Disp16(address as i16), size)
    }

    pub fn with_segment_override(mut self, segment_override: Option<Segment>) -> Self {
        self.segment_override = segment_override;
        self
    }

    pub fn default_segment(&self) -> Segment {
        self.mode.default_segment()
    }

    /// The segment actually used for the access: the override if present.
    pub fn segment(&self) -> Segment {
        self.segment_override.unwrap_or_else(|| self.default_segment())
    }

    /// Compute the 16-bit effective address given a register file lookup.
    pub fn offset(&self, read_reg: impl Fn(Register) -> u16) -> u16 {
        let (base, index) = self.mode.registers();
        let mut ea = self.displacement.get_u16();
        if let Some(base) = base {
            ea = ea.wrapping_add(read_reg(base));
        }
        if let Some(index) = index {
            ea = ea.wrapping_add(read_reg(index));
        }
        ea
    }

    /// Compute the 20-bit linear address given a register file lookup.
    pub fn linear_address(&self, read_reg: impl Fn(Register) -> u16) -> u32 {
        let segment = read_reg(self.segment().register());
        calc_linear_address(segment, self.offset(&read_reg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regs(reg: Register) -> u16 {
        match reg {
            Register::BX => 0x1000,
            Register::BP => 0x2000,
            Register::SI => 0x0010,
            Register::DI => 0x0020,
            Register::DS => 0x0100,
            Register::SS => 0x0200,
            Register::ES => 0x0300,
            _ => 0,
        }
    }

    #[test]
    fn test_default_segments() {
        assert_eq!(AddressingMode::Bp.default_segment(), Segment::SS);
        assert_eq!(AddressingMode::BpDi.default_segment(), Segment::SS);
        assert_eq!(AddressingMode::BxSi.default_segment(), Segment::DS);
        assert_eq!(AddressingMode::Direct.default_segment(), Segment::DS);

        let mem = MemoryReference::new(AddressingMode::Bp, Displacement::Disp8(0), DataWidth::Word);
        assert_eq!(mem.segment(), Segment::SS);
        let mem = mem.with_segment_override(Some(Segment::ES));
        assert_eq!(mem.segment(), Segment::ES);
        assert_eq!(mem.default_segment(), Segment::SS);
    }

    #[test]
    fn test_effective_address() {
        let mem = MemoryReference::new(AddressingMode::BxSi, Displacement::Disp8(-0x10), DataWidth::Byte);
        assert_eq!(mem.offset(regs), 0x1000);

        let mem = MemoryReference::new(AddressingMode::BpDi, Displacement::Disp16(0x0100), DataWidth::Word);
        assert_eq!(mem.offset(regs), 0x2120);
        assert_eq!(mem.linear_address(regs), 0x2000 + 0x2120);

        let mem = MemoryReference::direct(0xFFFF, DataWidth::Byte).with_segment_override(Some(Segment::ES));
        assert_eq!(mem.offset(regs), 0xFFFF);
        assert_eq!(mem.linear_address(regs), 0x3000 + 0xFFFF);
    }

    #[test]
    fn test_displacement_values() {
        assert_eq!(Displacement::Disp8(-1).get_u16(), 0xFFFF);
        assert_eq!(Displacement::Disp16(-4093).get_i16(), -4093);
        assert!(Displacement::NoDisp.is_zero());
        assert!(Displacement::Disp8(0).is_zero());
        assert_eq!(Displacement::Disp8(4).width(), DataWidth::Byte);
    }
}
