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

    lib.rs

    Command line disassembler frontend

*/

use std::path::Path;

use anyhow::Context;
use marty86_config::ConfigFileParams;
use marty86_core::{cpu_common::OutputValueMode, get_assembly};

const DEFAULT_CONFIG: &str = "./marty86.toml";

/// Read and disassemble `path`. I/O failures carry the path as context.
pub fn disassemble_file(path: &Path, mode: OutputValueMode) -> Result<String, anyhow::Error> {
    let bytes = std::fs::read(path).with_context(|| format!("Couldn't read {}", path.display()))?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());

    let label = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    Ok(get_assembly(&bytes, &label, mode)?)
}

fn init_logging(config: &ConfigFileParams) {
    let default_level = if config.log.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

pub fn run() {
    // Resolve configuration first, as it decides the logging level.
    let config = match marty86_config::read_config_file(DEFAULT_CONFIG) {
        Ok(config) => config,
        Err(e) => match e.downcast_ref::<std::io::Error>() {
            Some(e) if e.kind() == std::io::ErrorKind::NotFound => {
                eprintln!("Configuration file not found: {}", e);
                std::process::exit(-1);
            }
            Some(e) => {
                eprintln!("Unknown IO error reading configuration file:\n{}", e);
                std::process::exit(-1);
            }
            None => {
                eprintln!(
                    "Failed to parse configuration file. There may be a typo or otherwise invalid toml:\n{}",
                    e
                );
                std::process::exit(-1);
            }
        },
    };

    init_logging(&config);

    let Some(path) = config.input.file.as_ref()
    else {
        eprintln!("No input file specified. Usage: marty86 [--hex] [--config_file PATH] [--verbose] FILE");
        std::process::exit(-1);
    };

    match disassemble_file(path, config.output.value_mode) {
        Ok(assembly) => {
            println!("{}", assembly);
        }
        Err(e) => {
            log::error!("Disassembly of {} failed: {:?}", path.display(), e);
            eprintln!("{:#}", e);
            std::process::exit(-1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marty86_core::DecodeError;

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../marty86_core/tests/fixtures")
            .join(name)
    }

    #[test]
    fn test_disassemble_file() {
        let text = disassemble_file(&fixture("listing_0037"), OutputValueMode::AsInteger).unwrap();
        assert_eq!(text, "MOV CX, BX");
    }

    #[test]
    fn test_disassemble_missing_file() {
        let err = disassemble_file(&fixture("no_such_listing"), OutputValueMode::AsInteger).unwrap_err();
        assert!(err.downcast_ref::<std::io::Error>().is_some());
        assert!(err.to_string().contains("no_such_listing"));
    }

    #[test]
    fn test_decode_error_message() {
        let path = std::env::temp_dir().join(format!("marty86_bad_opcode_{}", std::process::id()));
        std::fs::write(&path, [0x90, 0x0F]).unwrap();
        let err = disassemble_file(&path, OutputValueMode::AsInteger).unwrap_err();
        let _ = std::fs::remove_file(&path);

        assert!(matches!(
            err.downcast_ref::<DecodeError>(),
            Some(DecodeError::UnknownOpcode { offset: 1, opcode: 0x0F })
        ));
        assert_eq!(err.to_string(), "Unknown opcode 0x0F at offset 0x0001");
    }
}
