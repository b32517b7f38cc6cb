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

    cpu_common::error.rs

    Error types returned by the decoder and the stream-oriented assembly entry
    points.

*/

use thiserror::Error;

/// A decode failure. `offset` is the stream offset of the first byte of the failing
/// instruction, including any prefixes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Unknown opcode {opcode:#04X} at offset {offset:#06X}")]
    UnknownOpcode { offset: usize, opcode: u8 },
    #[error("Unexpected end of stream decoding instruction at offset {offset:#06X}")]
    UnexpectedEndOfStream { offset: usize, opcode: Option<u8> },
    #[error("Invalid operand encoding (modrm {modrm:#04X}) for opcode {opcode:#04X} at offset {offset:#06X}")]
    InvalidOperandEncoding { offset: usize, opcode: u8, modrm: u8 },
}

impl DecodeError {
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::UnknownOpcode { offset, .. }
            | DecodeError::UnexpectedEndOfStream { offset, .. }
            | DecodeError::InvalidOperandEncoding { offset, .. } => *offset,
        }
    }

    pub fn opcode(&self) -> Option<u8> {
        match self {
            DecodeError::UnknownOpcode { opcode, .. } | DecodeError::InvalidOperandEncoding { opcode, .. } => {
                Some(*opcode)
            }
            DecodeError::UnexpectedEndOfStream { opcode, .. } => *opcode,
        }
    }

    /// Re-anchor a cursor error to the instruction being decoded.
    pub(crate) fn in_instruction(self, offset: usize, opcode: Option<u8>) -> Self {
        match self {
            DecodeError::UnexpectedEndOfStream { .. } => DecodeError::UnexpectedEndOfStream { offset, opcode },
            other => other,
        }
    }
}

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Failed to read instruction stream: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_text() {
        let err = DecodeError::UnknownOpcode { offset: 0x10, opcode: 0x0F };
        assert_eq!(err.to_string(), "Unknown opcode 0x0F at offset 0x0010");

        let err = DecodeError::InvalidOperandEncoding {
            offset: 0,
            opcode: 0x8D,
            modrm: 0xC0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid operand encoding (modrm 0xC0) for opcode 0x8D at offset 0x0000"
        );
        assert_eq!(err.opcode(), Some(0x8D));
    }

    #[test]
    fn test_in_instruction() {
        let err = DecodeError::UnexpectedEndOfStream { offset: 7, opcode: None };
        let err = err.in_instruction(4, Some(0x05));
        assert_eq!(err, DecodeError::UnexpectedEndOfStream { offset: 4, opcode: Some(0x05) });
        assert_eq!(err.offset(), 4);

        let unknown = DecodeError::UnknownOpcode { offset: 2, opcode: 0x60 };
        assert_eq!(unknown.in_instruction(0, None), unknown);
    }
}
