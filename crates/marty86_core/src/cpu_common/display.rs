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

    cpu_common::display.rs

    Renders decoded instructions as assembly text in the selected value mode.

*/

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer};

use crate::cpu_common::{
    AddressingMode,
    DataWidth,
    Immediate,
    ImmediateFlag,
    Instruction,
    MemoryReference,
    Mnemonic,
    Operand,
};

/// Controls how numeric values are written out.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputValueMode {
    #[default]
    AsInteger,
    AsHex,
}

impl FromStr for OutputValueMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, String>
    where
        Self: Sized,
    {
        match s.to_lowercase().as_str() {
            "integer" | "asinteger" | "decimal" => Ok(OutputValueMode::AsInteger),
            "hex" | "ashex" => Ok(OutputValueMode::AsHex),
            _ => Err(format!("Bad value for output value mode: '{}'", s)),
        }
    }
}

impl<'de> Deserialize<'de> for OutputValueMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OutputValueModeVisitor;

        impl serde::de::Visitor<'_> for OutputValueModeVisitor {
            type Value = OutputValueMode;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an output value mode string like 'Integer' or 'Hex'")
            }

            fn visit_str<E>(self, value: &str) -> Result<OutputValueMode, E>
            where
                E: serde::de::Error,
            {
                OutputValueMode::from_str(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(OutputValueModeVisitor)
    }
}

#[inline]
fn hex_string(value: u16, width: DataWidth) -> String {
    format!("{:#0w$X}", value, w = width.hex_digits() + 2)
}

pub fn immediate_to_string(imm: &Immediate, mode: OutputValueMode) -> String {
    match (imm.flag, mode) {
        (ImmediateFlag::RelativeJumpDisplacement, _) => format!("{}", imm.value),
        (ImmediateFlag::None, OutputValueMode::AsInteger) => format!("{}", imm.value),
        (_, OutputValueMode::AsInteger) => format!("{}", imm.as_unsigned()),
        (_, OutputValueMode::AsHex) => hex_string(imm.as_unsigned(), imm.width),
    }
}

fn base_to_str(mode: AddressingMode) -> &'static str {
    match mode {
        AddressingMode::BxSi => "BX + SI",
        AddressingMode::BxDi => "BX + DI",
        AddressingMode::BpSi => "BP + SI",
        AddressingMode::BpDi => "BP + DI",
        AddressingMode::Si => "SI",
        AddressingMode::Di => "DI",
        AddressingMode::Bp => "BP",
        AddressingMode::Bx => "BX",
        AddressingMode::Direct => "",
    }
}

pub fn memory_to_string(mem: &MemoryReference, mode: OutputValueMode) -> String {
    let mut mem_string = String::new();
    if let Some(segment) = mem.segment_override {
        mem_string.push_str(&format!("{}:", segment));
    }
    mem_string.push('[');

    if let AddressingMode::Direct = mem.mode {
        let address = mem.displacement.get_u16();
        match mode {
            OutputValueMode::AsInteger => mem_string.push_str(&address.to_string()),
            OutputValueMode::AsHex => mem_string.push_str(&hex_string(address, DataWidth::Word)),
        }
    }
    else {
        mem_string.push_str(base_to_str(mem.mode));
        let disp = mem.displacement.get_i16();
        if disp != 0 {
            let sign = if disp < 0 { '-' } else { '+' };
            let magnitude = (disp as i32).unsigned_abs();
            match mode {
                OutputValueMode::AsInteger => mem_string.push_str(&format!(" {} {}", sign, magnitude)),
                OutputValueMode::AsHex => mem_string.push_str(&format!(
                    " {} {}",
                    sign,
                    hex_string(magnitude as u16, mem.displacement.width())
                )),
            }
        }
    }
    mem_string.push(']');
    mem_string
}

fn size_prefix(i: &Instruction, mem: &MemoryReference) -> &'static str {
    if i.mnemonic.is_far_branch() {
        return "FAR ";
    }
    if matches!(i.mnemonic, Mnemonic::ESC) {
        return "";
    }
    // A register operand already fixes the operand size, except for shift counts in CL.
    if i.operands.iter().any(Operand::is_register) && !i.mnemonic.is_shift_rotate() {
        return "";
    }
    match mem.size {
        DataWidth::Byte => "BYTE ",
        DataWidth::Word => "WORD ",
        DataWidth::None => "",
    }
}

pub fn operand_to_string(i: &Instruction, op: &Operand, mode: OutputValueMode) -> String {
    match op {
        Operand::Register(reg) => reg.to_string(),
        Operand::Immediate(imm) => immediate_to_string(imm, mode),
        Operand::Memory(mem) => format!("{}{}", size_prefix(i, mem), memory_to_string(mem, mode)),
    }
}

fn prefix_to_string(i: &Instruction) -> Option<String> {
    let mut prefix_string = String::new();

    // Segment overrides attach to the memory operand when there is one.
    if !i.has_memory_operand() {
        if let Some(segment) = i.segment_override() {
            prefix_string.push_str(&format!("{} ", segment));
        }
    }
    if i.has_lock() {
        prefix_string.push_str("LOCK ");
    }
    if i.has_repne() {
        prefix_string.push_str("REPNE ");
    }
    else if i.has_rep() {
        prefix_string.push_str("REP ");
    }

    if prefix_string.is_empty() {
        None
    }
    else {
        Some(prefix_string)
    }
}

impl Instruction {
    /// Render this instruction as a single line of assembly.
    pub fn render(&self, mode: OutputValueMode) -> String {
        let mut instruction_string = String::new();

        if let Some(prefix) = prefix_to_string(self) {
            instruction_string.push_str(&prefix);
        }
        let mnemonic: &'static str = self.mnemonic.into();
        instruction_string.push_str(mnemonic);

        let mut last_was_far_segment = false;
        for (n, op) in self.operands.iter().enumerate() {
            if n == 0 {
                instruction_string.push(' ');
            }
            else if last_was_far_segment {
                instruction_string.push(':');
            }
            else {
                instruction_string.push_str(", ");
            }
            instruction_string.push_str(&operand_to_string(self, op, mode));
            last_was_far_segment = matches!(op, Operand::Immediate(imm) if imm.flag == ImmediateFlag::FarSegment);
        }

        instruction_string
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(OutputValueMode::AsInteger))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu_common::{
        Displacement,
        Register,
        Segment,
        OPCODE_PREFIX_CS_OVERRIDE,
        OPCODE_PREFIX_LOCK,
        OPCODE_PREFIX_REP1,
    };

    fn reg(r: Register) -> Operand {
        Operand::Register(r)
    }

    fn mem(mode: AddressingMode, displacement: Displacement, size: DataWidth) -> Operand {
        Operand::Memory(MemoryReference::new(mode, displacement, size))
    }

    #[test]
    fn test_value_mode_parse() {
        assert_eq!("Hex".parse::<OutputValueMode>(), Ok(OutputValueMode::AsHex));
        assert_eq!("integer".parse::<OutputValueMode>(), Ok(OutputValueMode::AsInteger));
        assert!("octal".parse::<OutputValueMode>().is_err());
    }

    #[test]
    fn test_immediates() {
        let add = Instruction::new(
            0x04,
            2,
            Mnemonic::ADD,
            DataWidth::Byte,
            vec![reg(Register::AL), Operand::Immediate(Immediate::byte(0x2A))],
        );
        assert_eq!(add.render(OutputValueMode::AsInteger), "ADD AL, 42");
        assert_eq!(add.render(OutputValueMode::AsHex), "ADD AL, 0x2A");

        let add = Instruction::new(
            0x05,
            3,
            Mnemonic::ADD,
            DataWidth::Word,
            vec![reg(Register::AX), Operand::Immediate(Immediate::word(0xF003))],
        );
        assert_eq!(add.to_string(), "ADD AX, -4093");
        assert_eq!(add.render(OutputValueMode::AsHex), "ADD AX, 0xF003");

        let out = Instruction::new(
            0xE6,
            2,
            Mnemonic::OUT,
            DataWidth::Byte,
            vec![
                Operand::Immediate(Immediate::byte(0xF0).with_flag(ImmediateFlag::Unsigned)),
                reg(Register::AL),
            ],
        );
        assert_eq!(out.to_string(), "OUT 240, AL");
    }

    #[test]
    fn test_relative_is_always_decimal() {
        let jge = Instruction::new(
            0x7D,
            2,
            Mnemonic::JGE,
            DataWidth::None,
            vec![Operand::Immediate(Immediate::relative8(-20))],
        );
        assert_eq!(jge.render(OutputValueMode::AsInteger), "JGE -20");
        assert_eq!(jge.render(OutputValueMode::AsHex), "JGE -20");
    }

    #[test]
    fn test_memory_operands() {
        let mov = Instruction::new(
            0x8A,
            3,
            Mnemonic::MOV,
            DataWidth::Byte,
            vec![reg(Register::AH), mem(AddressingMode::BxSi, Displacement::Disp8(4), DataWidth::Byte)],
        );
        assert_eq!(mov.to_string(), "MOV AH, [BX + SI + 4]");
        assert_eq!(mov.render(OutputValueMode::AsHex), "MOV AH, [BX + SI + 0x04]");

        let mov = Instruction::new(
            0x8B,
            3,
            Mnemonic::MOV,
            DataWidth::Word,
            vec![reg(Register::DX), mem(AddressingMode::Bp, Displacement::Disp8(0), DataWidth::Word)],
        );
        assert_eq!(mov.to_string(), "MOV DX, [BP]");

        let mov = Instruction::new(
            0x8B,
            4,
            Mnemonic::MOV,
            DataWidth::Word,
            vec![reg(Register::BP), mem(AddressingMode::Direct, Displacement::Disp16(1234), DataWidth::Word)],
        );
        assert_eq!(mov.to_string(), "MOV BP, [1234]");
        assert_eq!(mov.render(OutputValueMode::AsHex), "MOV BP, [0x04D2]");

        let mov = Instruction::new(
            0x8B,
            3,
            Mnemonic::MOV,
            DataWidth::Word,
            vec![reg(Register::BX), mem(AddressingMode::BxDi, Displacement::Disp8(-7), DataWidth::Word)],
        );
        assert_eq!(mov.to_string(), "MOV BX, [BX + DI - 7]");
        assert_eq!(mov.render(OutputValueMode::AsHex), "MOV BX, [BX + DI - 0x07]");
    }

    #[test]
    fn test_explicit_sizes() {
        let add = Instruction::new(
            0x80,
            3,
            Mnemonic::ADD,
            DataWidth::Byte,
            vec![
                mem(AddressingMode::Bx, Displacement::NoDisp, DataWidth::Byte),
                Operand::Immediate(Immediate::byte(34)),
            ],
        );
        assert_eq!(add.to_string(), "ADD BYTE [BX], 34");

        let shr = Instruction::new(
            0xD3,
            2,
            Mnemonic::SHR,
            DataWidth::Word,
            vec![mem(AddressingMode::Si, Displacement::NoDisp, DataWidth::Word), reg(Register::CL)],
        );
        assert_eq!(shr.to_string(), "SHR WORD [SI], CL");

        let jmp = Instruction::new(
            0xFF,
            2,
            Mnemonic::JMPF,
            DataWidth::Word,
            vec![mem(AddressingMode::Di, Displacement::NoDisp, DataWidth::Word)],
        );
        assert_eq!(jmp.to_string(), "JMP FAR [DI]");
    }

    #[test]
    fn test_prefixes() {
        let movsb =
            Instruction::new(0xA4, 2, Mnemonic::MOVSB, DataWidth::Byte, Vec::new()).with_prefixes(OPCODE_PREFIX_CS_OVERRIDE);
        assert_eq!(movsb.to_string(), "CS MOVSB");

        let scasw =
            Instruction::new(0xAF, 2, Mnemonic::SCASW, DataWidth::Word, Vec::new()).with_prefixes(OPCODE_PREFIX_REP1);
        assert_eq!(scasw.to_string(), "REPNE SCASW");

        let mem_op = MemoryReference::new(AddressingMode::Bx, Displacement::Disp8(4), DataWidth::Word)
            .with_segment_override(Some(Segment::ES));
        let inc = Instruction::new(0xFF, 4, Mnemonic::INC, DataWidth::Word, vec![Operand::Memory(mem_op)])
            .with_prefixes(OPCODE_PREFIX_LOCK | Segment::ES.override_flag());
        assert_eq!(inc.to_string(), "LOCK INC WORD ES:[BX + 4]");
    }

    #[test]
    fn test_far_pointer() {
        let call = Instruction::new(
            0x9A,
            5,
            Mnemonic::CALLF,
            DataWidth::None,
            vec![
                Operand::Immediate(Immediate::word(0x1234).with_flag(ImmediateFlag::FarSegment)),
                Operand::Immediate(Immediate::word(0xF678).with_flag(ImmediateFlag::FarOffset)),
            ],
        );
        assert_eq!(call.to_string(), "CALL 4660:63096");
        assert_eq!(call.render(OutputValueMode::AsHex), "CALL 0x1234:0xF678");
    }
}
