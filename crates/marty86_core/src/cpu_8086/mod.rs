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

    cpu_8086::mod.rs

    Implements the 8086 decoder front end: single-instruction decode, stream
    disassembly and listing generation.

*/

pub mod decode;
pub mod flags;
pub mod modrm;

use std::io::Read;

use crate::{
    bytequeue::{ByteCursor, ByteReader},
    cpu_common::{AssemblyError, DecodeError, Disassembly, Instruction, OutputValueMode},
};

/// The Intel 8086 instruction set. Stateless; decoding state lives in the [ByteReader].
#[derive(Copy, Clone, Debug, Default)]
pub struct Intel8086;

/// Decode exactly one instruction at the start of `bytes`. `label` identifies the stream
/// in log output.
pub fn decode_next(bytes: &[u8], label: &str) -> Result<Instruction, DecodeError> {
    let mut cursor = ByteCursor::new(bytes);
    Intel8086::decode(&mut cursor).inspect_err(|e| {
        log::debug!("{}: decode failed: {}", label, e);
    })
}

/// Decode `bytes` until exhausted and render each instruction on its own line.
/// Decoding stops at the first error.
pub fn get_assembly(bytes: &[u8], label: &str, mode: OutputValueMode) -> Result<String, DecodeError> {
    let mut lines = Vec::new();
    for disassembly in Disassembler::new(bytes, label) {
        lines.push(disassembly?.instruction.render(mode));
    }
    Ok(lines.join("\n"))
}

/// Read `reader` to the end, then disassemble its contents as [get_assembly] does.
pub fn get_assembly_from_reader(
    mut reader: impl Read,
    label: &str,
    mode: OutputValueMode,
) -> Result<String, AssemblyError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    log::debug!("{}: read {} bytes", label, bytes.len());
    Ok(get_assembly(&bytes, label, mode)?)
}

/// Walks a byte slice one instruction at a time. Yields a single `Err` and then ends if an
/// instruction cannot be decoded.
pub struct Disassembler<'a> {
    cursor: ByteCursor<'a>,
    label: &'a str,
    failed: bool,
}

impl<'a> Disassembler<'a> {
    pub fn new(bytes: &'a [u8], label: &'a str) -> Self {
        Self {
            cursor: ByteCursor::new(bytes),
            label,
            failed: false,
        }
    }

    /// Offset of the next instruction to be decoded.
    pub fn offset(&self) -> usize {
        self.cursor.tell()
    }
}

impl Iterator for Disassembler<'_> {
    type Item = Result<Disassembly, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.is_exhausted() {
            return None;
        }

        let offset = self.cursor.tell();
        match Intel8086::decode(&mut self.cursor) {
            Ok(instruction) => {
                let bytes = self.cursor.slice(offset, offset + instruction.length as usize).to_vec();
                Some(Ok(Disassembly {
                    offset,
                    bytes,
                    instruction,
                }))
            }
            Err(e) => {
                log::debug!("{}: decode failed: {}", self.label, e);
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Disassembler<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu_common::{Mnemonic, Operand, Register};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_decode_next_ignores_trailing_bytes() {
        let i = decode_next(&[0x00, 0xD8, 0xFF, 0xFF, 0xFF], "trailing").unwrap();
        assert_eq!(i.mnemonic, Mnemonic::ADD);
        assert_eq!(i.length, 2);
        assert_eq!(i.operands, vec![Operand::Register(Register::AL), Operand::Register(Register::BL)]);
    }

    #[test]
    fn test_decode_next_empty() {
        assert!(matches!(
            decode_next(&[], "empty"),
            Err(DecodeError::UnexpectedEndOfStream { offset: 0, opcode: None })
        ));
    }

    #[test]
    fn test_get_assembly() {
        let bytes = [0x89, 0xD9, 0x04, 0x2A, 0x7D, 0xEC];
        assert_eq!(
            get_assembly(&bytes, "test", OutputValueMode::AsInteger).unwrap(),
            "MOV CX, BX\nADD AL, 42\nJGE -20"
        );
        assert_eq!(
            get_assembly(&bytes, "test", OutputValueMode::AsHex).unwrap(),
            "MOV CX, BX\nADD AL, 0x2A\nJGE -20"
        );
        assert_eq!(get_assembly(&[], "test", OutputValueMode::AsInteger).unwrap(), "");
    }

    #[test]
    fn test_get_assembly_stops_at_error() {
        let bytes = [0x89, 0xD9, 0x0F, 0x89, 0xD9];
        assert_eq!(
            get_assembly(&bytes, "bad", OutputValueMode::AsInteger),
            Err(DecodeError::UnknownOpcode { offset: 2, opcode: 0x0F })
        );
    }

    #[test]
    fn test_get_assembly_from_reader() {
        let bytes: &[u8] = &[0x05, 0x03, 0xF0];
        assert_eq!(
            get_assembly_from_reader(bytes, "reader", OutputValueMode::AsInteger).unwrap(),
            "ADD AX, -4093"
        );

        let truncated: &[u8] = &[0x05, 0x03];
        assert!(matches!(
            get_assembly_from_reader(truncated, "reader", OutputValueMode::AsInteger),
            Err(AssemblyError::Decode(DecodeError::UnexpectedEndOfStream { .. }))
        ));
    }

    #[test]
    fn test_disassembler() {
        let bytes = [0x27, 0xB9, 0x0C, 0x00, 0xF3, 0xA4];
        let listing: Vec<Disassembly> = Disassembler::new(&bytes, "iter").collect::<Result<_, _>>().unwrap();

        assert_eq!(listing.len(), 3);
        assert_eq!(listing[0].offset, 0);
        assert_eq!(listing[0].bytes, vec![0x27]);
        assert_eq!(listing[1].offset, 1);
        assert_eq!(listing[1].bytes, vec![0xB9, 0x0C, 0x00]);
        assert_eq!(listing[2].offset, 4);
        assert_eq!(listing[2].bytes, vec![0xF3, 0xA4]);
        assert!(listing[2].instruction.has_rep());
    }

    #[test]
    fn test_disassembler_fuses_after_error() {
        let bytes = [0x90, 0xC0, 0x90];
        let mut d = Disassembler::new(&bytes, "fused");
        assert!(matches!(d.next(), Some(Ok(_))));
        assert!(matches!(d.next(), Some(Err(DecodeError::UnknownOpcode { offset: 1, .. }))));
        assert!(d.next().is_none());
        assert!(d.next().is_none());
    }

    #[test]
    fn test_decode_is_deterministic() {
        let bytes = [0x26, 0x89, 0x4F, 0x04];
        assert_eq!(decode_next(&bytes, "a").unwrap(), decode_next(&bytes, "b").unwrap());
    }

    #[test]
    fn test_random_streams() {
        let mut rng = StdRng::seed_from_u64(0x8086);

        for _ in 0..2000 {
            let len = rng.gen_range(0..16);
            let bytes: Vec<u8> = (0..len).map(|_| rng.gen::<u8>()).collect();

            let mut cursor = ByteCursor::new(&bytes);
            match Intel8086::decode(&mut cursor) {
                Ok(i) => {
                    assert_eq!(i.length as usize, cursor.tell());
                    assert!(i.length as usize <= bytes.len());
                    // Rendering never fails for a decoded instruction
                    let _ = i.render(OutputValueMode::AsHex);
                }
                Err(e) => assert!(e.offset() <= bytes.len()),
            }

            // Whole-stream walks terminate and never overrun
            let mut consumed = 0;
            for d in Disassembler::new(&bytes, "random") {
                match d {
                    Ok(d) => {
                        assert_eq!(d.offset, consumed);
                        consumed += d.bytes.len();
                    }
                    Err(_) => break,
                }
            }
            assert!(consumed <= bytes.len());
        }
    }

    #[test]
    fn test_truncated_instructions() {
        let mut rng = StdRng::seed_from_u64(37);

        for _ in 0..500 {
            let bytes: Vec<u8> = (0..8).map(|_| rng.gen::<u8>()).collect();
            let Ok(i) = decode_next(&bytes, "full")
            else {
                continue;
            };
            let len = i.length as usize;
            for cut in 0..len {
                assert!(
                    matches!(
                        decode_next(&bytes[..cut], "cut"),
                        Err(DecodeError::UnexpectedEndOfStream { .. })
                    ),
                    "{:02X?} truncated to {} bytes",
                    &bytes[..len],
                    cut
                );
            }
        }
    }
}
