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

    cpu_8086::modrm.rs

    Decoding of the ModRM byte.

*/

//! Every possible ModRM byte is precomputed into a const table of [ModRmByte]. Reading a
//! ModRM returns a static reference into that table plus the displacement that followed it.

use crate::{
    bytequeue::ByteReader,
    cpu_common::{
        AddressingMode,
        DataWidth,
        DecodeError,
        Displacement,
        MemoryReference,
        Register,
        REGISTER16_LUT,
        REGISTER8_LUT,
        SREGISTER_LUT,
    },
};

pub const MODRM_ADDR_MASK: u8 = 0b11_000_111;

const MODRM_ADDR_DISP16: u8 = 0b00_000_110;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DispSize {
    None,
    Byte,
    Word,
}

#[derive(Copy, Clone, Debug)]
pub struct ModRmByte {
    byte: u8,
    b_mod: u8,
    b_reg: u8,
    b_rm: u8,
    disp: DispSize,
    addressing_mode: Option<AddressingMode>,
}

const MODRM_TABLE: [ModRmByte; 256] = {
    let mut table: [ModRmByte; 256] = [ModRmByte {
        byte: 0,
        b_mod: 0,
        b_reg: 0,
        b_rm: 0,
        disp: DispSize::None,
        addressing_mode: None,
    }; 256];
    let mut byte: usize = 0;

    while byte < 256 {
        let b = byte as u8;
        let b_mod = (b >> 6) & 0x03;

        let (disp, addressing_mode) = match b_mod {
            // [disp16] takes the place of [bp] when mod is 0b00
            0b00 if b & MODRM_ADDR_MASK == MODRM_ADDR_DISP16 => (DispSize::Word, Some(AddressingMode::Direct)),
            0b00 => (DispSize::None, Some(AddressingMode::from_rm(b))),
            0b01 => (DispSize::Byte, Some(AddressingMode::from_rm(b))),
            0b10 => (DispSize::Word, Some(AddressingMode::from_rm(b))),
            _ => (DispSize::None, None),
        };

        table[byte] = ModRmByte {
            byte: b,
            b_mod,
            // 'REG' is either a register operand or an opcode extension, depending on opcode
            b_reg: (b >> 3) & 0x07,
            b_rm: b & 0x07,
            disp,
            addressing_mode,
        };
        byte += 1;
    }

    table
};

impl ModRmByte {
    pub fn from_byte(byte: u8) -> &'static ModRmByte {
        &MODRM_TABLE[byte as usize]
    }

    /// Read the modrm byte and look up the appropriate value from the modrm table.
    /// Load any displacement, then return modrm struct and size of modrm + displacement.
    pub fn read(bytes: &mut impl ByteReader) -> Result<(&'static ModRmByte, Displacement, u32), DecodeError> {
        let modrm = ModRmByte::from_byte(bytes.read_u8()?);
        let (disp, disp_size) = modrm.read_displacement(bytes)?;
        Ok((modrm, disp, disp_size + 1))
    }

    /// Read any displacement the modrm might have. Return the Displacement and size of displacement.
    pub fn read_displacement(&self, bytes: &mut impl ByteReader) -> Result<(Displacement, u32), DecodeError> {
        match self.disp {
            DispSize::Byte => Ok((Displacement::Disp8(bytes.read_i8()?), 1)),
            DispSize::Word => Ok((Displacement::Disp16(bytes.read_i16()?), 2)),
            DispSize::None => Ok((Displacement::NoDisp, 0)),
        }
    }

    #[inline(always)]
    pub fn byte(&self) -> u8 {
        self.byte
    }
    // Interpret the 'R/M' field as an 8 bit register selector
    #[inline(always)]
    pub fn op1_reg8(&self) -> Register {
        REGISTER8_LUT[self.b_rm as usize]
    }
    // Interpret the 'R/M' field as a 16 bit register selector
    #[inline(always)]
    pub fn op1_reg16(&self) -> Register {
        REGISTER16_LUT[self.b_rm as usize]
    }
    // Interpret the 'REG' field as an 8 bit register selector
    #[inline(always)]
    pub fn op2_reg8(&self) -> Register {
        REGISTER8_LUT[self.b_reg as usize]
    }
    // Interpret the 'REG' field as a 16 bit register selector
    #[inline(always)]
    pub fn op2_reg16(&self) -> Register {
        REGISTER16_LUT[self.b_reg as usize]
    }
    /// Interpret the 'REG' field as a segment register selector. Only values 0-3 are valid.
    #[inline(always)]
    pub fn op2_segmentreg(&self) -> Option<Register> {
        SREGISTER_LUT.get(self.b_reg as usize).copied()
    }
    // Interpret the 'REG' field as a 3 bit opcode extension
    #[inline(always)]
    pub fn op_extension(&self) -> u8 {
        self.b_reg
    }
    #[inline(always)]
    pub fn is_addressing_mode(&self) -> bool {
        self.b_mod != 0b11
    }

    /// Build the memory operand this ModRM selects, or None in register mode.
    pub fn memory_reference(&self, displacement: Displacement, size: DataWidth) -> Option<MemoryReference> {
        self.addressing_mode
            .map(|mode| MemoryReference::new(mode, displacement, size))
    }

    /// Interpret the 'R/M' field as a register selector of the given width.
    pub fn rm_register(&self, width: DataWidth) -> Register {
        match width {
            DataWidth::Byte => self.op1_reg8(),
            _ => self.op1_reg16(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytequeue::ByteCursor;

    #[test]
    fn test_modrm_fields() {
        let modrm = ModRmByte::from_byte(0b11_011_001);
        assert!(!modrm.is_addressing_mode());
        assert_eq!(modrm.op1_reg16(), Register::CX);
        assert_eq!(modrm.op2_reg16(), Register::BX);
        assert_eq!(modrm.op1_reg8(), Register::CL);
        assert_eq!(modrm.op2_reg8(), Register::BL);
        assert_eq!(modrm.op_extension(), 3);
        assert_eq!(modrm.op2_segmentreg(), Some(Register::DS));
        assert_eq!(modrm.memory_reference(Displacement::NoDisp, DataWidth::Word), None);

        assert_eq!(ModRmByte::from_byte(0b00_100_000).op2_segmentreg(), None);
    }

    #[test]
    fn test_modrm_direct_address() {
        let bytes = [0x06, 0xD2, 0x04, 0xFF];
        let mut cursor = ByteCursor::new(&bytes);
        let (modrm, disp, size) = ModRmByte::read(&mut cursor).unwrap();

        assert_eq!(size, 3);
        assert_eq!(disp, Displacement::Disp16(1234));
        let mem = modrm.memory_reference(disp, DataWidth::Byte).unwrap();
        assert_eq!(mem.mode, AddressingMode::Direct);
        assert_eq!(cursor.tell(), 3);
    }

    #[test]
    fn test_modrm_displacements() {
        // mod=01 rm=110: [bp + disp8], sign-extended
        let bytes = [0x46, 0xF9];
        let mut cursor = ByteCursor::new(&bytes);
        let (modrm, disp, size) = ModRmByte::read(&mut cursor).unwrap();
        assert_eq!(size, 2);
        assert_eq!(disp, Displacement::Disp8(-7));
        assert_eq!(
            modrm.memory_reference(disp, DataWidth::Word).map(|m| m.mode),
            Some(AddressingMode::Bp)
        );

        // mod=10 rm=001: [bx + di + disp16]
        let bytes = [0x81, 0x87, 0x13];
        let mut cursor = ByteCursor::new(&bytes);
        let (_, disp, size) = ModRmByte::read(&mut cursor).unwrap();
        assert_eq!(size, 3);
        assert_eq!(disp, Displacement::Disp16(4999));
    }

    #[test]
    fn test_modrm_truncated_displacement() {
        let bytes = [0x80, 0x87];
        let mut cursor = ByteCursor::new(&bytes);
        assert!(matches!(
            ModRmByte::read(&mut cursor),
            Err(DecodeError::UnexpectedEndOfStream { .. })
        ));
    }
}
