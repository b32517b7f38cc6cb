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

    bytequeue.rs

    Defines the ByteReader trait the decoder reads instruction bytes through,
    and ByteCursor, a bounds-checked reader over a borrowed byte slice.

*/

use crate::cpu_common::DecodeError;

/// A sequential source of instruction bytes.
///
/// Reads are bounds checked. A read that cannot be satisfied fails with
/// [DecodeError::UnexpectedEndOfStream] and does not move the cursor.
pub trait ByteReader {
    fn tell(&self) -> usize;
    fn peek_u8(&self) -> Option<u8>;

    fn read_u8(&mut self) -> Result<u8, DecodeError>;
    fn read_u16(&mut self) -> Result<u16, DecodeError>;

    fn read_i8(&mut self) -> Result<i8, DecodeError> {
        self.read_u8().map(|b| b as i8)
    }
    fn read_i16(&mut self) -> Result<i16, DecodeError> {
        self.read_u16().map(|w| w as i16)
    }
}

pub struct ByteCursor<'a> {
    buf: &'a [u8],
    cursor: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, cursor: 0 }
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.buf.len()
    }

    /// Return the bytes in `start..end`, clamped to the buffer.
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        let end = end.min(self.buf.len());
        let start = start.min(end);
        &self.buf[start..end]
    }

    fn out_of_bytes(&self) -> DecodeError {
        DecodeError::UnexpectedEndOfStream {
            offset: self.cursor,
            opcode: None,
        }
    }
}

impl ByteReader for ByteCursor<'_> {
    fn tell(&self) -> usize {
        self.cursor
    }

    fn peek_u8(&self) -> Option<u8> {
        self.buf.get(self.cursor).copied()
    }

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        match self.buf.get(self.cursor) {
            Some(&b) => {
                self.cursor += 1;
                Ok(b)
            }
            None => Err(self.out_of_bytes()),
        }
    }

    /// Read a u16 in little endian order.
    fn read_u16(&mut self) -> Result<u16, DecodeError> {
        if self.remaining() < 2 {
            return Err(self.out_of_bytes());
        }
        let w = u16::from_le_bytes([self.buf[self.cursor], self.buf[self.cursor + 1]]);
        self.cursor += 2;
        Ok(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_le() {
        let bytes = [0x34, 0x12, 0xFF, 0x80];
        let mut cursor = ByteCursor::new(&bytes);

        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_i8().unwrap(), -1);
        assert_eq!(cursor.tell(), 3);
        assert_eq!(cursor.peek_u8(), Some(0x80));
        assert_eq!(cursor.read_u8().unwrap(), 0x80);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.peek_u8(), None);
    }

    #[test]
    fn test_short_word_read_consumes_nothing() {
        let bytes = [0x90, 0x01];
        let mut cursor = ByteCursor::new(&bytes);
        cursor.read_u8().unwrap();

        let err = cursor.read_u16().unwrap_err();
        assert_eq!(err, DecodeError::UnexpectedEndOfStream { offset: 1, opcode: None });
        assert_eq!(cursor.tell(), 1);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn test_empty_cursor() {
        let mut cursor = ByteCursor::new(&[]);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.remaining(), 0);
        assert!(cursor.read_u8().is_err());
        assert_eq!(cursor.slice(0, 4), &[] as &[u8]);
    }
}
