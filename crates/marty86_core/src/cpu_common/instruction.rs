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

    cpu_common::instruction.rs

    Defines the decoded Instruction and the Disassembly record produced when
    walking a byte stream.

*/

use crate::cpu_common::{
    DataWidth,
    Mnemonic,
    Operand,
    Segment,
    OPCODE_PREFIX_LOCK,
    OPCODE_PREFIX_REP1,
    OPCODE_PREFIX_REP2,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub opcode: u8,
    /// Bytes consumed, counting prefixes, opcode, ModRM, displacement and immediates.
    pub length: u32,
    pub mnemonic: Mnemonic,
    pub width: DataWidth,
    pub operands: Vec<Operand>,
    pub prefixes: u32,
}

impl Instruction {
    pub fn new(opcode: u8, length: u32, mnemonic: Mnemonic, width: DataWidth, operands: Vec<Operand>) -> Self {
        Self {
            opcode,
            length,
            mnemonic,
            width,
            operands,
            prefixes: 0,
        }
    }

    pub fn with_prefixes(mut self, prefixes: u32) -> Self {
        self.prefixes = prefixes;
        self
    }

    pub fn operand(&self, n: usize) -> Option<&Operand> {
        self.operands.get(n)
    }

    pub fn segment_override(&self) -> Option<Segment> {
        Segment::from_prefixes(self.prefixes)
    }

    pub fn has_lock(&self) -> bool {
        self.prefixes & OPCODE_PREFIX_LOCK != 0
    }

    pub fn has_rep(&self) -> bool {
        self.prefixes & OPCODE_PREFIX_REP2 != 0
    }

    pub fn has_repne(&self) -> bool {
        self.prefixes & OPCODE_PREFIX_REP1 != 0
    }

    pub fn has_memory_operand(&self) -> bool {
        self.operands.iter().any(Operand::is_memory)
    }

    /// Resolve the target of a relative branch located at `address`. The displacement is
    /// relative to the first byte after the instruction; offsets wrap at 16 bits.
    pub fn jump_target(&self, address: u16) -> Option<u16> {
        self.operands.iter().find_map(|op| match op {
            Operand::Immediate(imm) if imm.is_relative() => {
                Some(address.wrapping_add(self.length as u16).wrapping_add(imm.value as u16))
            }
            _ => None,
        })
    }
}

/// An instruction together with its position and encoding in the source stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Disassembly {
    pub offset: usize,
    pub bytes: Vec<u8>,
    pub instruction: Instruction,
}
