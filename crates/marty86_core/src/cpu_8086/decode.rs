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

    cpu_8086::decode.rs

    Opcode dispatch and instruction decoding routines.

*/

//! Decoding is implemented as an associated function, [Intel8086::decode], which reads
//! from any [ByteReader]. Each opcode maps to an [InstTemplate] in a single const table;
//! group opcodes resolve to a second entry selected by the ModRM 'REG' field.

use crate::{
    bytequeue::ByteReader,
    cpu_8086::{modrm::ModRmByte, Intel8086},
    cpu_common::{
        DataWidth,
        DecodeError,
        Displacement,
        Immediate,
        ImmediateFlag,
        Instruction,
        MemoryReference,
        Mnemonic,
        Operand,
        Register,
        Segment,
        OPCODE_PREFIX_CS_OVERRIDE,
        OPCODE_PREFIX_DS_OVERRIDE,
        OPCODE_PREFIX_ES_OVERRIDE,
        OPCODE_PREFIX_LOCK,
        OPCODE_PREFIX_REP1,
        OPCODE_PREFIX_REP2,
        OPCODE_PREFIX_REPMASK,
        OPCODE_PREFIX_SS_OVERRIDE,
        OPCODE_SEG_OVERRIDE_MASK,
    },
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OperandTemplate {
    NoOperand,
    ModRM8,
    ModRM16,
    /// A ModRM operand that must address memory (LEA, LES, LDS, indirect far branches).
    ModRMMem,
    Register8,
    Register16,
    SegmentRegister,
    Immediate8,
    Immediate16,
    Immediate8SignExtended,
    Immediate8Unsigned,
    Immediate16Unsigned,
    Relative8,
    Relative16,
    Offset8,
    Offset16,
    FixedRegister(Register),
    /// An immediate implied by the opcode. Consumes no bytes.
    FixedImmediate8(u8),
    FarAddress,
    /// The external opcode of ESC, built from the low opcode bits and the ModRM 'REG' field.
    EscOpcode,
}

struct OperandContext {
    start: usize,
    opcode: u8,
    modrm: &'static ModRmByte,
    displacement: Displacement,
    segment_override: Option<Segment>,
}

impl OperandContext {
    fn invalid_encoding(&self) -> DecodeError {
        DecodeError::InvalidOperandEncoding {
            offset: self.start,
            opcode: self.opcode,
            modrm: self.modrm.byte(),
        }
    }

    fn rm_operand(&self, width: DataWidth) -> Operand {
        match self.modrm.memory_reference(self.displacement, width) {
            Some(mem) => Operand::Memory(mem.with_segment_override(self.segment_override)),
            None => Operand::Register(self.modrm.rm_register(width)),
        }
    }
}

impl OperandTemplate {
    pub const fn uses_modrm(&self) -> bool {
        matches!(
            self,
            OperandTemplate::ModRM8
                | OperandTemplate::ModRM16
                | OperandTemplate::ModRMMem
                | OperandTemplate::Register8
                | OperandTemplate::Register16
                | OperandTemplate::SegmentRegister
                | OperandTemplate::EscOpcode
        )
    }

    /// Resolve this template into zero, one or two operands, reading any immediate bytes.
    fn resolve_operand(
        &self,
        bytes: &mut impl ByteReader,
        ctx: &OperandContext,
        operands: &mut Vec<Operand>,
        size: &mut u32,
    ) -> Result<(), DecodeError> {
        let operand = match self {
            OperandTemplate::NoOperand => return Ok(()),
            OperandTemplate::ModRM8 => ctx.rm_operand(DataWidth::Byte),
            OperandTemplate::ModRM16 => ctx.rm_operand(DataWidth::Word),
            OperandTemplate::ModRMMem => match ctx.rm_operand(DataWidth::Word) {
                Operand::Register(_) => return Err(ctx.invalid_encoding()),
                mem => mem,
            },
            OperandTemplate::Register8 => Operand::Register(ctx.modrm.op2_reg8()),
            OperandTemplate::Register16 => Operand::Register(ctx.modrm.op2_reg16()),
            OperandTemplate::SegmentRegister => match ctx.modrm.op2_segmentreg() {
                Some(sreg) => Operand::Register(sreg),
                None => return Err(ctx.invalid_encoding()),
            },
            OperandTemplate::Immediate8 => {
                *size += 1;
                Operand::Immediate(Immediate::byte(bytes.read_u8()?))
            }
            OperandTemplate::Immediate16 => {
                *size += 2;
                Operand::Immediate(Immediate::word(bytes.read_u16()?))
            }
            OperandTemplate::Immediate8SignExtended => {
                *size += 1;
                Operand::Immediate(Immediate::sign_extended(bytes.read_i8()?))
            }
            OperandTemplate::Immediate8Unsigned => {
                *size += 1;
                Operand::Immediate(Immediate::byte(bytes.read_u8()?).with_flag(ImmediateFlag::Unsigned))
            }
            OperandTemplate::Immediate16Unsigned => {
                *size += 2;
                Operand::Immediate(Immediate::word(bytes.read_u16()?).with_flag(ImmediateFlag::Unsigned))
            }
            OperandTemplate::Relative8 => {
                *size += 1;
                Operand::Immediate(Immediate::relative8(bytes.read_i8()?))
            }
            OperandTemplate::Relative16 => {
                *size += 2;
                Operand::Immediate(Immediate::relative16(bytes.read_i16()?))
            }
            OperandTemplate::Offset8 | OperandTemplate::Offset16 => {
                let width = if let OperandTemplate::Offset8 = self {
                    DataWidth::Byte
                }
                else {
                    DataWidth::Word
                };
                *size += 2;
                let address = bytes.read_u16()?;
                Operand::Memory(MemoryReference::direct(address, width).with_segment_override(ctx.segment_override))
            }
            OperandTemplate::FixedRegister(reg) => Operand::Register(*reg),
            OperandTemplate::FixedImmediate8(value) => Operand::Immediate(Immediate::byte(*value)),
            OperandTemplate::FarAddress => {
                // Offset precedes segment in the encoding.
                let offset = bytes.read_u16()?;
                let segment = bytes.read_u16()?;
                *size += 4;
                operands.push(Operand::Immediate(
                    Immediate::word(segment).with_flag(ImmediateFlag::FarSegment),
                ));
                Operand::Immediate(Immediate::word(offset).with_flag(ImmediateFlag::FarOffset))
            }
            OperandTemplate::EscOpcode => {
                let external = ((ctx.opcode & 0x07) << 3) | ctx.modrm.op_extension();
                Operand::Immediate(Immediate::byte(external).with_flag(ImmediateFlag::Unsigned))
            }
        };
        operands.push(operand);
        Ok(())
    }
}

type Ot = OperandTemplate;

pub struct InstTemplate {
    pub grp: u8,
    pub width: DataWidth,
    pub mnemonic: Mnemonic,
    pub operand1: OperandTemplate,
    pub operand2: OperandTemplate,
}

impl InstTemplate {
    pub const fn has_modrm(&self) -> bool {
        self.grp != 0 || self.operand1.uses_modrm() || self.operand2.uses_modrm()
    }

    /// Register-direct forms of the `reg, r/m` opcodes list the r/m register first.
    const fn reverses_register_form(&self) -> bool {
        matches!(
            (self.operand1, self.operand2),
            (Ot::Register8, Ot::ModRM8) | (Ot::Register16, Ot::ModRM16)
        )
    }
}

macro_rules! inst {
    ($op:literal, $grp:literal, $w:ident, $m:ident, $o1:expr, $o2:expr) => {
        InstTemplate {
            grp: $grp,
            width: DataWidth::$w,
            mnemonic: Mnemonic::$m,
            operand1: $o1,
            operand2: $o2,
        }
    };
}

/// 256 primary opcodes followed by 15 groups of 8 extensions each.
#[rustfmt::skip]
pub const DECODE: [InstTemplate; 376] = [
    inst!( 0x00,  0, Byte, ADD,     Ot::ModRM8,                              Ot::Register8),
    inst!( 0x01,  0, Word, ADD,     Ot::ModRM16,                             Ot::Register16),
    inst!( 0x02,  0, Byte, ADD,     Ot::Register8,                           Ot::ModRM8),
    inst!( 0x03,  0, Word, ADD,     Ot::Register16,                          Ot::ModRM16),
    inst!( 0x04,  0, Byte, ADD,     Ot::FixedRegister(Register::AL),         Ot::Immediate8),
    inst!( 0x05,  0, Word, ADD,     Ot::FixedRegister(Register::AX),         Ot::Immediate16),
    inst!( 0x06,  0, Word, PUSH,    Ot::FixedRegister(Register::ES),         Ot::NoOperand),
    inst!( 0x07,  0, Word, POP,     Ot::FixedRegister(Register::ES),         Ot::NoOperand),
    inst!( 0x08,  0, Byte, OR,      Ot::ModRM8,                              Ot::Register8),
    inst!( 0x09,  0, Word, OR,      Ot::ModRM16,                             Ot::Register16),
    inst!( 0x0A,  0, Byte, OR,      Ot::Register8,                           Ot::ModRM8),
    inst!( 0x0B,  0, Word, OR,      Ot::Register16,                          Ot::ModRM16),
    inst!( 0x0C,  0, Byte, OR,      Ot::FixedRegister(Register::AL),         Ot::Immediate8),
    inst!( 0x0D,  0, Word, OR,      Ot::FixedRegister(Register::AX),         Ot::Immediate16),
    inst!( 0x0E,  0, Word, PUSH,    Ot::FixedRegister(Register::CS),         Ot::NoOperand),
    inst!( 0x0F,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x10,  0, Byte, ADC,     Ot::ModRM8,                              Ot::Register8),
    inst!( 0x11,  0, Word, ADC,     Ot::ModRM16,                             Ot::Register16),
    inst!( 0x12,  0, Byte, ADC,     Ot::Register8,                           Ot::ModRM8),
    inst!( 0x13,  0, Word, ADC,     Ot::Register16,                          Ot::ModRM16),
    inst!( 0x14,  0, Byte, ADC,     Ot::FixedRegister(Register::AL),         Ot::Immediate8),
    inst!( 0x15,  0, Word, ADC,     Ot::FixedRegister(Register::AX),         Ot::Immediate16),
    inst!( 0x16,  0, Word, PUSH,    Ot::FixedRegister(Register::SS),         Ot::NoOperand),
    inst!( 0x17,  0, Word, POP,     Ot::FixedRegister(Register::SS),         Ot::NoOperand),
    inst!( 0x18,  0, Byte, SBB,     Ot::ModRM8,                              Ot::Register8),
    inst!( 0x19,  0, Word, SBB,     Ot::ModRM16,                             Ot::Register16),
    inst!( 0x1A,  0, Byte, SBB,     Ot::Register8,                           Ot::ModRM8),
    inst!( 0x1B,  0, Word, SBB,     Ot::Register16,                          Ot::ModRM16),
    inst!( 0x1C,  0, Byte, SBB,     Ot::FixedRegister(Register::AL),         Ot::Immediate8),
    inst!( 0x1D,  0, Word, SBB,     Ot::FixedRegister(Register::AX),         Ot::Immediate16),
    inst!( 0x1E,  0, Word, PUSH,    Ot::FixedRegister(Register::DS),         Ot::NoOperand),
    inst!( 0x1F,  0, Word, POP,     Ot::FixedRegister(Register::DS),         Ot::NoOperand),
    inst!( 0x20,  0, Byte, AND,     Ot::ModRM8,                              Ot::Register8),
    inst!( 0x21,  0, Word, AND,     Ot::ModRM16,                             Ot::Register16),
    inst!( 0x22,  0, Byte, AND,     Ot::Register8,                           Ot::ModRM8),
    inst!( 0x23,  0, Word, AND,     Ot::Register16,                          Ot::ModRM16),
    inst!( 0x24,  0, Byte, AND,     Ot::FixedRegister(Register::AL),         Ot::Immediate8),
    inst!( 0x25,  0, Word, AND,     Ot::FixedRegister(Register::AX),         Ot::Immediate16),
    inst!( 0x26,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x27,  0, None, DAA,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x28,  0, Byte, SUB,     Ot::ModRM8,                              Ot::Register8),
    inst!( 0x29,  0, Word, SUB,     Ot::ModRM16,                             Ot::Register16),
    inst!( 0x2A,  0, Byte, SUB,     Ot::Register8,                           Ot::ModRM8),
    inst!( 0x2B,  0, Word, SUB,     Ot::Register16,                          Ot::ModRM16),
    inst!( 0x2C,  0, Byte, SUB,     Ot::FixedRegister(Register::AL),         Ot::Immediate8),
    inst!( 0x2D,  0, Word, SUB,     Ot::FixedRegister(Register::AX),         Ot::Immediate16),
    inst!( 0x2E,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x2F,  0, None, DAS,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x30,  0, Byte, XOR,     Ot::ModRM8,                              Ot::Register8),
    inst!( 0x31,  0, Word, XOR,     Ot::ModRM16,                             Ot::Register16),
    inst!( 0x32,  0, Byte, XOR,     Ot::Register8,                           Ot::ModRM8),
    inst!( 0x33,  0, Word, XOR,     Ot::Register16,                          Ot::ModRM16),
    inst!( 0x34,  0, Byte, XOR,     Ot::FixedRegister(Register::AL),         Ot::Immediate8),
    inst!( 0x35,  0, Word, XOR,     Ot::FixedRegister(Register::AX),         Ot::Immediate16),
    inst!( 0x36,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x37,  0, None, AAA,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x38,  0, Byte, CMP,     Ot::ModRM8,                              Ot::Register8),
    inst!( 0x39,  0, Word, CMP,     Ot::ModRM16,                             Ot::Register16),
    inst!( 0x3A,  0, Byte, CMP,     Ot::Register8,                           Ot::ModRM8),
    inst!( 0x3B,  0, Word, CMP,     Ot::Register16,                          Ot::ModRM16),
    inst!( 0x3C,  0, Byte, CMP,     Ot::FixedRegister(Register::AL),         Ot::Immediate8),
    inst!( 0x3D,  0, Word, CMP,     Ot::FixedRegister(Register::AX),         Ot::Immediate16),
    inst!( 0x3E,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x3F,  0, None, AAS,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x40,  0, Word, INC,     Ot::FixedRegister(Register::AX),         Ot::NoOperand),
    inst!( 0x41,  0, Word, INC,     Ot::FixedRegister(Register::CX),         Ot::NoOperand),
    inst!( 0x42,  0, Word, INC,     Ot::FixedRegister(Register::DX),         Ot::NoOperand),
    inst!( 0x43,  0, Word, INC,     Ot::FixedRegister(Register::BX),         Ot::NoOperand),
    inst!( 0x44,  0, Word, INC,     Ot::FixedRegister(Register::SP),         Ot::NoOperand),
    inst!( 0x45,  0, Word, INC,     Ot::FixedRegister(Register::BP),         Ot::NoOperand),
    inst!( 0x46,  0, Word, INC,     Ot::FixedRegister(Register::SI),         Ot::NoOperand),
    inst!( 0x47,  0, Word, INC,     Ot::FixedRegister(Register::DI),         Ot::NoOperand),
    inst!( 0x48,  0, Word, DEC,     Ot::FixedRegister(Register::AX),         Ot::NoOperand),
    inst!( 0x49,  0, Word, DEC,     Ot::FixedRegister(Register::CX),         Ot::NoOperand),
    inst!( 0x4A,  0, Word, DEC,     Ot::FixedRegister(Register::DX),         Ot::NoOperand),
    inst!( 0x4B,  0, Word, DEC,     Ot::FixedRegister(Register::BX),         Ot::NoOperand),
    inst!( 0x4C,  0, Word, DEC,     Ot::FixedRegister(Register::SP),         Ot::NoOperand),
    inst!( 0x4D,  0, Word, DEC,     Ot::FixedRegister(Register::BP),         Ot::NoOperand),
    inst!( 0x4E,  0, Word, DEC,     Ot::FixedRegister(Register::SI),         Ot::NoOperand),
    inst!( 0x4F,  0, Word, DEC,     Ot::FixedRegister(Register::DI),         Ot::NoOperand),
    inst!( 0x50,  0, Word, PUSH,    Ot::FixedRegister(Register::AX),         Ot::NoOperand),
    inst!( 0x51,  0, Word, PUSH,    Ot::FixedRegister(Register::CX),         Ot::NoOperand),
    inst!( 0x52,  0, Word, PUSH,    Ot::FixedRegister(Register::DX),         Ot::NoOperand),
    inst!( 0x53,  0, Word, PUSH,    Ot::FixedRegister(Register::BX),         Ot::NoOperand),
    inst!( 0x54,  0, Word, PUSH,    Ot::FixedRegister(Register::SP),         Ot::NoOperand),
    inst!( 0x55,  0, Word, PUSH,    Ot::FixedRegister(Register::BP),         Ot::NoOperand),
    inst!( 0x56,  0, Word, PUSH,    Ot::FixedRegister(Register::SI),         Ot::NoOperand),
    inst!( 0x57,  0, Word, PUSH,    Ot::FixedRegister(Register::DI),         Ot::NoOperand),
    inst!( 0x58,  0, Word, POP,     Ot::FixedRegister(Register::AX),         Ot::NoOperand),
    inst!( 0x59,  0, Word, POP,     Ot::FixedRegister(Register::CX),         Ot::NoOperand),
    inst!( 0x5A,  0, Word, POP,     Ot::FixedRegister(Register::DX),         Ot::NoOperand),
    inst!( 0x5B,  0, Word, POP,     Ot::FixedRegister(Register::BX),         Ot::NoOperand),
    inst!( 0x5C,  0, Word, POP,     Ot::FixedRegister(Register::SP),         Ot::NoOperand),
    inst!( 0x5D,  0, Word, POP,     Ot::FixedRegister(Register::BP),         Ot::NoOperand),
    inst!( 0x5E,  0, Word, POP,     Ot::FixedRegister(Register::SI),         Ot::NoOperand),
    inst!( 0x5F,  0, Word, POP,     Ot::FixedRegister(Register::DI),         Ot::NoOperand),
    inst!( 0x60,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x61,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x62,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x63,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x64,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x65,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x66,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x67,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x68,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x69,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x6A,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x6B,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x6C,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x6D,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x6E,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x6F,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x70,  0, None, JO,      Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x71,  0, None, JNO,     Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x72,  0, None, JB,      Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x73,  0, None, JAE,     Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x74,  0, None, JE,      Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x75,  0, None, JNE,     Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x76,  0, None, JBE,     Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x77,  0, None, JA,      Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x78,  0, None, JS,      Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x79,  0, None, JNS,     Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x7A,  0, None, JP,      Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x7B,  0, None, JNP,     Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x7C,  0, None, JL,      Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x7D,  0, None, JGE,     Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x7E,  0, None, JLE,     Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x7F,  0, None, JG,      Ot::Relative8,                           Ot::NoOperand),
    inst!( 0x80,  1, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x81,  2, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x82,  3, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x83,  4, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x84,  0, Byte, TEST,    Ot::ModRM8,                              Ot::Register8),
    inst!( 0x85,  0, Word, TEST,    Ot::ModRM16,                             Ot::Register16),
    inst!( 0x86,  0, Byte, XCHG,    Ot::Register8,                           Ot::ModRM8),
    inst!( 0x87,  0, Word, XCHG,    Ot::Register16,                          Ot::ModRM16),
    inst!( 0x88,  0, Byte, MOV,     Ot::ModRM8,                              Ot::Register8),
    inst!( 0x89,  0, Word, MOV,     Ot::ModRM16,                             Ot::Register16),
    inst!( 0x8A,  0, Byte, MOV,     Ot::Register8,                           Ot::ModRM8),
    inst!( 0x8B,  0, Word, MOV,     Ot::Register16,                          Ot::ModRM16),
    inst!( 0x8C,  0, Word, MOV,     Ot::ModRM16,                             Ot::SegmentRegister),
    inst!( 0x8D,  0, Word, LEA,     Ot::Register16,                          Ot::ModRMMem),
    inst!( 0x8E,  0, Word, MOV,     Ot::SegmentRegister,                     Ot::ModRM16),
    inst!( 0x8F,  5, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x90,  0, None, NOP,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x91,  0, Word, XCHG,    Ot::FixedRegister(Register::CX),         Ot::FixedRegister(Register::AX)),
    inst!( 0x92,  0, Word, XCHG,    Ot::FixedRegister(Register::DX),         Ot::FixedRegister(Register::AX)),
    inst!( 0x93,  0, Word, XCHG,    Ot::FixedRegister(Register::BX),         Ot::FixedRegister(Register::AX)),
    inst!( 0x94,  0, Word, XCHG,    Ot::FixedRegister(Register::SP),         Ot::FixedRegister(Register::AX)),
    inst!( 0x95,  0, Word, XCHG,    Ot::FixedRegister(Register::BP),         Ot::FixedRegister(Register::AX)),
    inst!( 0x96,  0, Word, XCHG,    Ot::FixedRegister(Register::SI),         Ot::FixedRegister(Register::AX)),
    inst!( 0x97,  0, Word, XCHG,    Ot::FixedRegister(Register::DI),         Ot::FixedRegister(Register::AX)),
    inst!( 0x98,  0, None, CBW,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x99,  0, None, CWD,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x9A,  0, None, CALLF,   Ot::FarAddress,                          Ot::NoOperand),
    inst!( 0x9B,  0, None, WAIT,    Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x9C,  0, None, PUSHF,   Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x9D,  0, None, POPF,    Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x9E,  0, None, SAHF,    Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x9F,  0, None, LAHF,    Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xA0,  0, Byte, MOV,     Ot::FixedRegister(Register::AL),         Ot::Offset8),
    inst!( 0xA1,  0, Word, MOV,     Ot::FixedRegister(Register::AX),         Ot::Offset16),
    inst!( 0xA2,  0, Byte, MOV,     Ot::Offset8,                             Ot::FixedRegister(Register::AL)),
    inst!( 0xA3,  0, Word, MOV,     Ot::Offset16,                            Ot::FixedRegister(Register::AX)),
    inst!( 0xA4,  0, Byte, MOVSB,   Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xA5,  0, Word, MOVSW,   Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xA6,  0, Byte, CMPSB,   Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xA7,  0, Word, CMPSW,   Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xA8,  0, Byte, TEST,    Ot::FixedRegister(Register::AL),         Ot::Immediate8),
    inst!( 0xA9,  0, Word, TEST,    Ot::FixedRegister(Register::AX),         Ot::Immediate16),
    inst!( 0xAA,  0, Byte, STOSB,   Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xAB,  0, Word, STOSW,   Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xAC,  0, Byte, LODSB,   Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xAD,  0, Word, LODSW,   Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xAE,  0, Byte, SCASB,   Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xAF,  0, Word, SCASW,   Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xB0,  0, Byte, MOV,     Ot::FixedRegister(Register::AL),         Ot::Immediate8),
    inst!( 0xB1,  0, Byte, MOV,     Ot::FixedRegister(Register::CL),         Ot::Immediate8),
    inst!( 0xB2,  0, Byte, MOV,     Ot::FixedRegister(Register::DL),         Ot::Immediate8),
    inst!( 0xB3,  0, Byte, MOV,     Ot::FixedRegister(Register::BL),         Ot::Immediate8),
    inst!( 0xB4,  0, Byte, MOV,     Ot::FixedRegister(Register::AH),         Ot::Immediate8),
    inst!( 0xB5,  0, Byte, MOV,     Ot::FixedRegister(Register::CH),         Ot::Immediate8),
    inst!( 0xB6,  0, Byte, MOV,     Ot::FixedRegister(Register::DH),         Ot::Immediate8),
    inst!( 0xB7,  0, Byte, MOV,     Ot::FixedRegister(Register::BH),         Ot::Immediate8),
    inst!( 0xB8,  0, Word, MOV,     Ot::FixedRegister(Register::AX),         Ot::Immediate16),
    inst!( 0xB9,  0, Word, MOV,     Ot::FixedRegister(Register::CX),         Ot::Immediate16),
    inst!( 0xBA,  0, Word, MOV,     Ot::FixedRegister(Register::DX),         Ot::Immediate16),
    inst!( 0xBB,  0, Word, MOV,     Ot::FixedRegister(Register::BX),         Ot::Immediate16),
    inst!( 0xBC,  0, Word, MOV,     Ot::FixedRegister(Register::SP),         Ot::Immediate16),
    inst!( 0xBD,  0, Word, MOV,     Ot::FixedRegister(Register::BP),         Ot::Immediate16),
    inst!( 0xBE,  0, Word, MOV,     Ot::FixedRegister(Register::SI),         Ot::Immediate16),
    inst!( 0xBF,  0, Word, MOV,     Ot::FixedRegister(Register::DI),         Ot::Immediate16),
    inst!( 0xC0,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC1,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC2,  0, None, RET,     Ot::Immediate16Unsigned,                 Ot::NoOperand),
    inst!( 0xC3,  0, None, RET,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC4,  0, Word, LES,     Ot::Register16,                          Ot::ModRMMem),
    inst!( 0xC5,  0, Word, LDS,     Ot::Register16,                          Ot::ModRMMem),
    inst!( 0xC6,  6, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC7,  7, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC8,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC9,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xCA,  0, None, RETF,    Ot::Immediate16Unsigned,                 Ot::NoOperand),
    inst!( 0xCB,  0, None, RETF,    Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xCC,  0, None, INT3,    Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xCD,  0, None, INT,     Ot::Immediate8Unsigned,                  Ot::NoOperand),
    inst!( 0xCE,  0, None, INTO,    Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xCF,  0, None, IRET,    Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xD0,  8, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xD1,  9, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xD2, 10, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xD3, 11, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xD4,  0, Byte, AAM,     Ot::Immediate8Unsigned,                  Ot::NoOperand),
    inst!( 0xD5,  0, Byte, AAD,     Ot::Immediate8Unsigned,                  Ot::NoOperand),
    inst!( 0xD6,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xD7,  0, Byte, XLAT,    Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xD8,  0, None, ESC,     Ot::EscOpcode,                           Ot::ModRM16),
    inst!( 0xD9,  0, None, ESC,     Ot::EscOpcode,                           Ot::ModRM16),
    inst!( 0xDA,  0, None, ESC,     Ot::EscOpcode,                           Ot::ModRM16),
    inst!( 0xDB,  0, None, ESC,     Ot::EscOpcode,                           Ot::ModRM16),
    inst!( 0xDC,  0, None, ESC,     Ot::EscOpcode,                           Ot::ModRM16),
    inst!( 0xDD,  0, None, ESC,     Ot::EscOpcode,                           Ot::ModRM16),
    inst!( 0xDE,  0, None, ESC,     Ot::EscOpcode,                           Ot::ModRM16),
    inst!( 0xDF,  0, None, ESC,     Ot::EscOpcode,                           Ot::ModRM16),
    inst!( 0xE0,  0, None, LOOPNZ,  Ot::Relative8,                           Ot::NoOperand),
    inst!( 0xE1,  0, None, LOOPZ,   Ot::Relative8,                           Ot::NoOperand),
    inst!( 0xE2,  0, None, LOOP,    Ot::Relative8,                           Ot::NoOperand),
    inst!( 0xE3,  0, None, JCXZ,    Ot::Relative8,                           Ot::NoOperand),
    inst!( 0xE4,  0, Byte, IN,      Ot::FixedRegister(Register::AL),         Ot::Immediate8Unsigned),
    inst!( 0xE5,  0, Word, IN,      Ot::FixedRegister(Register::AX),         Ot::Immediate8Unsigned),
    inst!( 0xE6,  0, Byte, OUT,     Ot::Immediate8Unsigned,                  Ot::FixedRegister(Register::AL)),
    inst!( 0xE7,  0, Word, OUT,     Ot::Immediate8Unsigned,                  Ot::FixedRegister(Register::AX)),
    inst!( 0xE8,  0, None, CALL,    Ot::Relative16,                          Ot::NoOperand),
    inst!( 0xE9,  0, None, JMP,     Ot::Relative16,                          Ot::NoOperand),
    inst!( 0xEA,  0, None, JMPF,    Ot::FarAddress,                          Ot::NoOperand),
    inst!( 0xEB,  0, None, JMP,     Ot::Relative8,                           Ot::NoOperand),
    inst!( 0xEC,  0, Byte, IN,      Ot::FixedRegister(Register::AL),         Ot::FixedRegister(Register::DX)),
    inst!( 0xED,  0, Word, IN,      Ot::FixedRegister(Register::AX),         Ot::FixedRegister(Register::DX)),
    inst!( 0xEE,  0, Byte, OUT,     Ot::FixedRegister(Register::DX),         Ot::FixedRegister(Register::AL)),
    inst!( 0xEF,  0, Word, OUT,     Ot::FixedRegister(Register::DX),         Ot::FixedRegister(Register::AX)),
    inst!( 0xF0,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xF1,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xF2,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xF3,  0, None, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xF4,  0, None, HLT,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xF5,  0, None, CMC,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xF6, 12, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xF7, 13, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xF8,  0, None, CLC,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xF9,  0, None, STC,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xFA,  0, None, CLI,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xFB,  0, None, STI,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xFC,  0, None, CLD,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xFD,  0, None, STD,     Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xFE, 14, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xFF, 15, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    // Group 1: 0x80
    inst!( 0x80,  0, Byte, ADD,     Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0x80,  0, Byte, OR,      Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0x80,  0, Byte, ADC,     Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0x80,  0, Byte, SBB,     Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0x80,  0, Byte, AND,     Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0x80,  0, Byte, SUB,     Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0x80,  0, Byte, XOR,     Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0x80,  0, Byte, CMP,     Ot::ModRM8,                              Ot::Immediate8),
    // Group 2: 0x81
    inst!( 0x81,  0, Word, ADD,     Ot::ModRM16,                             Ot::Immediate16),
    inst!( 0x81,  0, Word, OR,      Ot::ModRM16,                             Ot::Immediate16),
    inst!( 0x81,  0, Word, ADC,     Ot::ModRM16,                             Ot::Immediate16),
    inst!( 0x81,  0, Word, SBB,     Ot::ModRM16,                             Ot::Immediate16),
    inst!( 0x81,  0, Word, AND,     Ot::ModRM16,                             Ot::Immediate16),
    inst!( 0x81,  0, Word, SUB,     Ot::ModRM16,                             Ot::Immediate16),
    inst!( 0x81,  0, Word, XOR,     Ot::ModRM16,                             Ot::Immediate16),
    inst!( 0x81,  0, Word, CMP,     Ot::ModRM16,                             Ot::Immediate16),
    // Group 3: 0x82
    inst!( 0x82,  0, Byte, ADD,     Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0x82,  0, Byte, OR,      Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0x82,  0, Byte, ADC,     Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0x82,  0, Byte, SBB,     Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0x82,  0, Byte, AND,     Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0x82,  0, Byte, SUB,     Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0x82,  0, Byte, XOR,     Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0x82,  0, Byte, CMP,     Ot::ModRM8,                              Ot::Immediate8),
    // Group 4: 0x83
    inst!( 0x83,  0, Word, ADD,     Ot::ModRM16,                             Ot::Immediate8SignExtended),
    inst!( 0x83,  0, Word, OR,      Ot::ModRM16,                             Ot::Immediate8SignExtended),
    inst!( 0x83,  0, Word, ADC,     Ot::ModRM16,                             Ot::Immediate8SignExtended),
    inst!( 0x83,  0, Word, SBB,     Ot::ModRM16,                             Ot::Immediate8SignExtended),
    inst!( 0x83,  0, Word, AND,     Ot::ModRM16,                             Ot::Immediate8SignExtended),
    inst!( 0x83,  0, Word, SUB,     Ot::ModRM16,                             Ot::Immediate8SignExtended),
    inst!( 0x83,  0, Word, XOR,     Ot::ModRM16,                             Ot::Immediate8SignExtended),
    inst!( 0x83,  0, Word, CMP,     Ot::ModRM16,                             Ot::Immediate8SignExtended),
    // Group 5: 0x8F
    inst!( 0x8F,  0, Word, POP,     Ot::ModRM16,                             Ot::NoOperand),
    inst!( 0x8F,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x8F,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x8F,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x8F,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x8F,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x8F,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0x8F,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    // Group 6: 0xC6
    inst!( 0xC6,  0, Byte, MOV,     Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0xC6,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC6,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC6,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC6,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC6,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC6,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC6,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    // Group 7: 0xC7
    inst!( 0xC7,  0, Word, MOV,     Ot::ModRM16,                             Ot::Immediate16),
    inst!( 0xC7,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC7,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC7,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC7,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC7,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC7,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xC7,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    // Group 8: 0xD0
    inst!( 0xD0,  0, Byte, ROL,     Ot::ModRM8,                              Ot::FixedImmediate8(1)),
    inst!( 0xD0,  0, Byte, ROR,     Ot::ModRM8,                              Ot::FixedImmediate8(1)),
    inst!( 0xD0,  0, Byte, RCL,     Ot::ModRM8,                              Ot::FixedImmediate8(1)),
    inst!( 0xD0,  0, Byte, RCR,     Ot::ModRM8,                              Ot::FixedImmediate8(1)),
    inst!( 0xD0,  0, Byte, SHL,     Ot::ModRM8,                              Ot::FixedImmediate8(1)),
    inst!( 0xD0,  0, Byte, SHR,     Ot::ModRM8,                              Ot::FixedImmediate8(1)),
    inst!( 0xD0,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xD0,  0, Byte, SAR,     Ot::ModRM8,                              Ot::FixedImmediate8(1)),
    // Group 9: 0xD1
    inst!( 0xD1,  0, Word, ROL,     Ot::ModRM16,                             Ot::FixedImmediate8(1)),
    inst!( 0xD1,  0, Word, ROR,     Ot::ModRM16,                             Ot::FixedImmediate8(1)),
    inst!( 0xD1,  0, Word, RCL,     Ot::ModRM16,                             Ot::FixedImmediate8(1)),
    inst!( 0xD1,  0, Word, RCR,     Ot::ModRM16,                             Ot::FixedImmediate8(1)),
    inst!( 0xD1,  0, Word, SHL,     Ot::ModRM16,                             Ot::FixedImmediate8(1)),
    inst!( 0xD1,  0, Word, SHR,     Ot::ModRM16,                             Ot::FixedImmediate8(1)),
    inst!( 0xD1,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xD1,  0, Word, SAR,     Ot::ModRM16,                             Ot::FixedImmediate8(1)),
    // Group 10: 0xD2
    inst!( 0xD2,  0, Byte, ROL,     Ot::ModRM8,                              Ot::FixedRegister(Register::CL)),
    inst!( 0xD2,  0, Byte, ROR,     Ot::ModRM8,                              Ot::FixedRegister(Register::CL)),
    inst!( 0xD2,  0, Byte, RCL,     Ot::ModRM8,                              Ot::FixedRegister(Register::CL)),
    inst!( 0xD2,  0, Byte, RCR,     Ot::ModRM8,                              Ot::FixedRegister(Register::CL)),
    inst!( 0xD2,  0, Byte, SHL,     Ot::ModRM8,                              Ot::FixedRegister(Register::CL)),
    inst!( 0xD2,  0, Byte, SHR,     Ot::ModRM8,                              Ot::FixedRegister(Register::CL)),
    inst!( 0xD2,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xD2,  0, Byte, SAR,     Ot::ModRM8,                              Ot::FixedRegister(Register::CL)),
    // Group 11: 0xD3
    inst!( 0xD3,  0, Word, ROL,     Ot::ModRM16,                             Ot::FixedRegister(Register::CL)),
    inst!( 0xD3,  0, Word, ROR,     Ot::ModRM16,                             Ot::FixedRegister(Register::CL)),
    inst!( 0xD3,  0, Word, RCL,     Ot::ModRM16,                             Ot::FixedRegister(Register::CL)),
    inst!( 0xD3,  0, Word, RCR,     Ot::ModRM16,                             Ot::FixedRegister(Register::CL)),
    inst!( 0xD3,  0, Word, SHL,     Ot::ModRM16,                             Ot::FixedRegister(Register::CL)),
    inst!( 0xD3,  0, Word, SHR,     Ot::ModRM16,                             Ot::FixedRegister(Register::CL)),
    inst!( 0xD3,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xD3,  0, Word, SAR,     Ot::ModRM16,                             Ot::FixedRegister(Register::CL)),
    // Group 12: 0xF6
    inst!( 0xF6,  0, Byte, TEST,    Ot::ModRM8,                              Ot::Immediate8),
    inst!( 0xF6,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xF6,  0, Byte, NOT,     Ot::ModRM8,                              Ot::NoOperand),
    inst!( 0xF6,  0, Byte, NEG,     Ot::ModRM8,                              Ot::NoOperand),
    inst!( 0xF6,  0, Byte, MUL,     Ot::ModRM8,                              Ot::NoOperand),
    inst!( 0xF6,  0, Byte, IMUL,    Ot::ModRM8,                              Ot::NoOperand),
    inst!( 0xF6,  0, Byte, DIV,     Ot::ModRM8,                              Ot::NoOperand),
    inst!( 0xF6,  0, Byte, IDIV,    Ot::ModRM8,                              Ot::NoOperand),
    // Group 13: 0xF7
    inst!( 0xF7,  0, Word, TEST,    Ot::ModRM16,                             Ot::Immediate16),
    inst!( 0xF7,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xF7,  0, Word, NOT,     Ot::ModRM16,                             Ot::NoOperand),
    inst!( 0xF7,  0, Word, NEG,     Ot::ModRM16,                             Ot::NoOperand),
    inst!( 0xF7,  0, Word, MUL,     Ot::ModRM16,                             Ot::NoOperand),
    inst!( 0xF7,  0, Word, IMUL,    Ot::ModRM16,                             Ot::NoOperand),
    inst!( 0xF7,  0, Word, DIV,     Ot::ModRM16,                             Ot::NoOperand),
    inst!( 0xF7,  0, Word, IDIV,    Ot::ModRM16,                             Ot::NoOperand),
    // Group 14: 0xFE
    inst!( 0xFE,  0, Byte, INC,     Ot::ModRM8,                              Ot::NoOperand),
    inst!( 0xFE,  0, Byte, DEC,     Ot::ModRM8,                              Ot::NoOperand),
    inst!( 0xFE,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xFE,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xFE,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xFE,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xFE,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    inst!( 0xFE,  0, Byte, Invalid, Ot::NoOperand,                           Ot::NoOperand),
    // Group 15: 0xFF
    inst!( 0xFF,  0, Word, INC,     Ot::ModRM16,                             Ot::NoOperand),
    inst!( 0xFF,  0, Word, DEC,     Ot::ModRM16,                             Ot::NoOperand),
    inst!( 0xFF,  0, Word, CALL,    Ot::ModRM16,                             Ot::NoOperand),
    inst!( 0xFF,  0, Word, CALLF,   Ot::ModRMMem,                            Ot::NoOperand),
    inst!( 0xFF,  0, Word, JMP,     Ot::ModRM16,                             Ot::NoOperand),
    inst!( 0xFF,  0, Word, JMPF,    Ot::ModRMMem,                            Ot::NoOperand),
    inst!( 0xFF,  0, Word, PUSH,    Ot::ModRM16,                             Ot::NoOperand),
    inst!( 0xFF,  0, Word, Invalid, Ot::NoOperand,                           Ot::NoOperand),
];

impl Intel8086 {
    /// Decode one instruction from `bytes`, consuming exactly the bytes it occupies.
    pub fn decode(bytes: &mut impl ByteReader) -> Result<Instruction, DecodeError> {
        let start = bytes.tell();

        // Read an initial byte as our opcode or first prefix
        let mut opcode = bytes.read_u8().map_err(|e| e.in_instruction(start, None))?;
        let mut size: u32 = 1;
        let mut op_prefixes: u32 = 0;

        // Read in opcode prefixes until exhausted
        loop {
            let prefix = match opcode {
                0x26 => OPCODE_PREFIX_ES_OVERRIDE,
                0x2E => OPCODE_PREFIX_CS_OVERRIDE,
                0x36 => OPCODE_PREFIX_SS_OVERRIDE,
                0x3E => OPCODE_PREFIX_DS_OVERRIDE,
                0xF0 => OPCODE_PREFIX_LOCK,
                0xF2 => OPCODE_PREFIX_REP1,
                0xF3 => OPCODE_PREFIX_REP2,
                _ => {
                    break;
                }
            };
            // Only the last segment override and the last repeat prefix take effect
            if prefix & OPCODE_SEG_OVERRIDE_MASK != 0 {
                op_prefixes &= !OPCODE_SEG_OVERRIDE_MASK;
            }
            if prefix & OPCODE_PREFIX_REPMASK != 0 {
                op_prefixes &= !OPCODE_PREFIX_REPMASK;
            }
            op_prefixes |= prefix;

            opcode = bytes.read_u8().map_err(|e| e.in_instruction(start, None))?;
            size += 1;
        }

        let truncated = |e: DecodeError| e.in_instruction(start, Some(opcode));

        // Lookup the opcode in the decode table
        let mut op_lu = &DECODE[opcode as usize];

        // Prepare to read ModRm
        let mut modrm = ModRmByte::from_byte(0);
        let mut loaded_modrm = false;
        let mut displacement = Displacement::NoDisp;

        // Check if resolved first opcode is a group instruction
        if op_lu.grp != 0 {
            // All group instructions have a ModRm. Load it now.
            let modrm_len;
            (modrm, displacement, modrm_len) = ModRmByte::read(bytes).map_err(truncated)?;
            size += modrm_len;
            loaded_modrm = true;

            // Perform secondary lookup of opcode group + extension.
            op_lu = &DECODE[256 + ((op_lu.grp as usize - 1) * 8) + modrm.op_extension() as usize];
        }

        if let Mnemonic::Invalid = op_lu.mnemonic {
            return Err(DecodeError::UnknownOpcode { offset: start, opcode });
        }

        // Load the ModRm byte if required, and we didn't already load it to decode a group.
        if op_lu.has_modrm() && !loaded_modrm {
            let modrm_len;
            (modrm, displacement, modrm_len) = ModRmByte::read(bytes).map_err(truncated)?;
            size += modrm_len;
        }

        let ctx = OperandContext {
            start,
            opcode,
            modrm,
            displacement,
            segment_override: Segment::from_prefixes(op_prefixes),
        };

        // Resolve operand templates into operands
        let mut operands = Vec::with_capacity(2);
        op_lu
            .operand1
            .resolve_operand(bytes, &ctx, &mut operands, &mut size)
            .map_err(truncated)?;
        op_lu
            .operand2
            .resolve_operand(bytes, &ctx, &mut operands, &mut size)
            .map_err(truncated)?;

        // CS cannot be loaded by MOV
        if opcode == 0x8E && operands.first() == Some(&Operand::Register(Register::CS)) {
            return Err(ctx.invalid_encoding());
        }

        if op_lu.reverses_register_form() && !modrm.is_addressing_mode() {
            operands.swap(0, 1);
        }

        debug_assert_eq!(bytes.tell() - start, size as usize);

        let instruction =
            Instruction::new(opcode, size, op_lu.mnemonic, op_lu.width, operands).with_prefixes(op_prefixes);
        log::trace!("{:05X}: {}", start, instruction);
        Ok(instruction)
    }
}
