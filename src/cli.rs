//! Mode selection for the `huffman` driver.

use std::fmt;
use std::path::Path;

use crate::error::{HuffmanError, Result};
use crate::file_ops;
use crate::huffman_codec::CodecStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Decompress,
}

impl Mode {
    /// Resolve the `-c` / `-d` flags. Exactly one must be set.
    pub fn from_flags(compress: bool, decompress: bool) -> Result<Mode> {
        match (compress, decompress) {
            (true, false) => Ok(Mode::Compress),
            (false, true) => Ok(Mode::Decompress),
            (true, true) => Err(HuffmanError::UnsupportedMode(
                "-c and -d are mutually exclusive".to_string(),
            )),
            (false, false) => Err(HuffmanError::UnsupportedMode(
                "no mode given; use -c to compress or -d to decompress".to_string(),
            )),
        }
    }

    pub fn run(self, input: &Path, output: &Path) -> Result<CodecStats> {
        match self {
            Mode::Compress => file_ops::compress_file(input, output),
            Mode::Decompress => file_ops::decompress_file(input, output),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Compress => f.write_str("compress"),
            Mode::Decompress => f.write_str("decompress"),
        }
    }
}
