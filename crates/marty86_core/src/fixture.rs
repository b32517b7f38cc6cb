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

    fixture.rs

    Retrieval of golden listings and comparison of rendered assembly against
    them.

*/

//! A listing fixture is a pair of files: `NAME`, the assembled machine code, and
//! `NAME.asm`, the reference source. Lines that are blank or begin with `;` are not
//! significant; the remaining lines are compared case-insensitively, in order.

use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Supplies fixture files by name.
pub trait FixtureSource {
    fn fetch(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Reads fixtures from a directory on the local filesystem.
pub struct DirFixtureSource {
    root: PathBuf,
}

impl DirFixtureSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl FixtureSource for DirFixtureSource {
    fn fetch(&self, name: &str) -> io::Result<Vec<u8>> {
        let path = self.root.join(name);
        log::trace!("fetching fixture: {}", path.display());
        std::fs::read(path)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ListingMismatch {
    #[error("Expected {expected} significant lines, got {actual}")]
    LineCount { expected: usize, actual: usize },
    #[error("Line {line}: expected \"{expected}\", got \"{actual}\"")]
    Line {
        line: usize,
        expected: String,
        actual: String,
    },
}

/// Fetch the machine code for listing `name` and its reference assembly text.
pub fn fetch_listing(source: &impl FixtureSource, name: &str) -> io::Result<(Vec<u8>, String)> {
    let bytes = source.fetch(name)?;
    let asm = source.fetch(&format!("{}.asm", name))?;
    let text = String::from_utf8(asm).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok((bytes, text))
}

pub fn significant_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(';'))
}

/// Compare two listings line by line, ignoring case and insignificant lines.
/// Line numbers in the result count significant lines from 1.
pub fn compare_listing(expected: &str, actual: &str) -> Result<(), ListingMismatch> {
    let expected: Vec<&str> = significant_lines(expected).collect();
    let actual: Vec<&str> = significant_lines(actual).collect();

    for (n, (e, a)) in expected.iter().zip(actual.iter()).enumerate() {
        if !e.eq_ignore_ascii_case(a) {
            return Err(ListingMismatch::Line {
                line: n + 1,
                expected: e.to_string(),
                actual: a.to_string(),
            });
        }
    }

    if expected.len() != actual.len() {
        return Err(ListingMismatch::LineCount {
            expected: expected.len(),
            actual: actual.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapSource(HashMap<String, Vec<u8>>);

    impl FixtureSource for MapSource {
        fn fetch(&self, name: &str) -> io::Result<Vec<u8>> {
            self.0
                .get(name)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        }
    }

    #[test]
    fn test_significant_lines() {
        let text = "; listing\n\nbits 16\n  ; indented comment\nmov cx, bx\r\n\n";
        let lines: Vec<&str> = significant_lines(text).collect();
        assert_eq!(lines, vec!["bits 16", "mov cx, bx"]);
    }

    #[test]
    fn test_compare_listing() {
        assert_eq!(compare_listing("; header\nmov cx, bx\n", "MOV CX, BX"), Ok(()));
        assert_eq!(
            compare_listing("mov cx, bx\nmov dx, bx", "MOV CX, BX"),
            Err(ListingMismatch::LineCount { expected: 2, actual: 1 })
        );
        assert_eq!(
            compare_listing("mov cx, bx\nmov dx, bx", "MOV CX, BX\nMOV DX, AX"),
            Err(ListingMismatch::Line {
                line: 2,
                expected: "mov dx, bx".to_string(),
                actual: "MOV DX, AX".to_string(),
            })
        );
    }

    #[test]
    fn test_fetch_listing() {
        let mut files = HashMap::new();
        files.insert("listing".to_string(), vec![0x89, 0xD9]);
        files.insert("listing.asm".to_string(), b"mov cx, bx\n".to_vec());
        let source = MapSource(files);

        let (bytes, text) = fetch_listing(&source, "listing").unwrap();
        assert_eq!(bytes, vec![0x89, 0xD9]);
        assert_eq!(text, "mov cx, bx\n");

        let err = fetch_listing(&source, "missing").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_dir_source_missing_file() {
        let source = DirFixtureSource::new("/nonexistent/marty86/fixtures");
        assert!(source.fetch("listing_0037").is_err());
    }
}
