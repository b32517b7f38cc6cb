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

    cpu_common::mnemonic.rs

    Defines the mnemonic enum.

*/

use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Instruction types of the 8086. The `Display` text is the canonical assembler name; the
/// far forms of CALL and JMP share the near name and are distinguished by their operand.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum Mnemonic {
    #[default]
    #[strum(serialize = "INVALID")]
    Invalid,
    AAA,
    AAD,
    AAM,
    AAS,
    ADC,
    ADD,
    AND,
    CALL,
    #[strum(serialize = "CALL")]
    CALLF,
    CBW,
    CLC,
    CLD,
    CLI,
    CMC,
    CMP,
    CMPSB,
    CMPSW,
    CWD,
    DAA,
    DAS,
    DEC,
    DIV,
    ESC,
    HLT,
    IDIV,
    IMUL,
    IN,
    INC,
    INT,
    INT3,
    INTO,
    IRET,
    JO,
    JNO,
    JB,
    JAE,
    JE,
    JNE,
    JBE,
    JA,
    JS,
    JNS,
    JP,
    JNP,
    JL,
    JGE,
    JLE,
    JG,
    JCXZ,
    JMP,
    #[strum(serialize = "JMP")]
    JMPF,
    LAHF,
    LDS,
    LEA,
    LES,
    LODSB,
    LODSW,
    LOOP,
    LOOPZ,
    LOOPNZ,
    MOV,
    MOVSB,
    MOVSW,
    MUL,
    NEG,
    NOP,
    NOT,
    OR,
    OUT,
    POP,
    POPF,
    PUSH,
    PUSHF,
    RCL,
    RCR,
    RET,
    RETF,
    ROL,
    ROR,
    SAHF,
    SAR,
    SBB,
    SCASB,
    SCASW,
    SHL,
    SHR,
    STC,
    STD,
    STI,
    STOSB,
    STOSW,
    SUB,
    TEST,
    WAIT,
    XCHG,
    XLAT,
    XOR,
}

impl Mnemonic {
    pub fn is_shift_rotate(&self) -> bool {
        matches!(
            self,
            Mnemonic::ROL | Mnemonic::ROR | Mnemonic::RCL | Mnemonic::RCR | Mnemonic::SHL | Mnemonic::SHR | Mnemonic::SAR
        )
    }

    pub fn is_far_branch(&self) -> bool {
        matches!(self, Mnemonic::CALLF | Mnemonic::JMPF)
    }

    pub fn is_string_op(&self) -> bool {
        matches!(
            self,
            Mnemonic::MOVSB
                | Mnemonic::MOVSW
                | Mnemonic::CMPSB
                | Mnemonic::CMPSW
                | Mnemonic::STOSB
                | Mnemonic::STOSW
                | Mnemonic::LODSB
                | Mnemonic::LODSW
                | Mnemonic::SCASB
                | Mnemonic::SCASW
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_mnemonic_names() {
        assert_eq!(Mnemonic::JGE.to_string(), "JGE");
        assert_eq!(Mnemonic::CALLF.to_string(), "CALL");
        assert_eq!(Mnemonic::JMPF.to_string(), "JMP");
        assert_eq!(Mnemonic::LOOPNZ.to_string(), "LOOPNZ");
        let s: &'static str = Mnemonic::Invalid.into();
        assert_eq!(s, "INVALID");
    }

    #[test]
    fn test_mnemonic_names_are_upper_case() {
        for m in Mnemonic::iter() {
            let name = m.to_string();
            assert!(!name.is_empty());
            assert_eq!(name, name.to_ascii_uppercase(), "{:?}", m);
        }
    }

    #[test]
    fn test_mnemonic_classes() {
        assert!(Mnemonic::SAR.is_shift_rotate());
        assert!(!Mnemonic::SUB.is_shift_rotate());
        assert!(Mnemonic::JMPF.is_far_branch());
        assert!(Mnemonic::SCASW.is_string_op());
    }
}
