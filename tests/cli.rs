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

    tests/cli.rs

    Runs the marty86 binary and checks its output and exit status.

*/

use std::path::{Path, PathBuf};

use assert_cmd::{assert::Assert, Command};
use predicates::prelude::*;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("crates/marty86_core/tests/fixtures")
        .join(name)
}

/// Run the binary from an empty working directory so no `marty86.toml` is picked up.
fn marty86(args: &[&str]) -> Assert {
    let work_dir = std::env::temp_dir().join(format!("marty86_cli_{}", std::process::id()));
    std::fs::create_dir_all(&work_dir).unwrap();

    Command::new(env!("CARGO_BIN_EXE_marty86"))
        .args(args)
        .current_dir(&work_dir)
        .env_remove("RUST_LOG")
        .assert()
}

fn failed(assert: Assert) -> Assert {
    let assert = assert.failure().stdout(predicate::str::is_empty());
    // exit(-1) surfaces as 255 on unix
    #[cfg(unix)]
    let assert = assert.code(255);
    assert
}

#[test]
fn test_missing_argument() {
    failed(marty86(&[])).stderr(predicate::str::contains("No input file specified"));
}

#[test]
fn test_disassemble_listing() {
    let path = fixture("listing_0037");
    marty86(&[path.to_str().unwrap()]).success().code(0).stdout("MOV CX, BX\n");
}

#[test]
fn test_hex_output() {
    let path = fixture("listing_0041");
    let assert = marty86(&["--hex", path.to_str().unwrap()]).success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "ADD BX, [BX + SI]");
    assert_eq!(lines[2], "ADD SI, 0x0002");
    assert_eq!(lines[17], "ADD AL, 0x09");
    assert_eq!(lines.last(), Some(&"JCXZ -38"));
}

#[test]
fn test_unknown_opcode() {
    let path = std::env::temp_dir().join(format!("marty86_cli_bad_opcode_{}", std::process::id()));
    std::fs::write(&path, [0x90, 0x0F]).unwrap();
    let assert = marty86(&[path.to_str().unwrap()]);
    let _ = std::fs::remove_file(&path);

    failed(assert).stderr(predicate::str::contains("Unknown opcode 0x0F at offset 0x0001"));
}

#[test]
fn test_missing_input_file() {
    let path = fixture("no_such_listing");
    failed(marty86(&[path.to_str().unwrap()])).stderr(predicate::str::contains("no_such_listing"));
}
