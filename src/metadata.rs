//! Container header.
//!
//! ```text
//! magic "HUFZ" | version u8 | original length u64 | payload bits u64
//!   | symbol count u16 | count x (symbol u8, code length u8)
//! ```
//!
//! Integers are little-endian and symbols are listed in ascending order.

use std::io::{self, Read, Write};

use crate::error::{HuffmanError, Result};
use crate::hufftree::MAX_CODE_LENGTH;

pub const MAGIC: [u8; 4] = *b"HUFZ";
pub const FORMAT_VERSION: u8 = 1;

/// Size of the fixed part of the header, before the symbol list.
pub const FIXED_HEADER_LEN: usize = 4 + 1 + 8 + 8 + 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub original_length: u64,
    pub payload_bits: u64,
    /// (symbol, code length) in ascending symbol order.
    pub symbols: Vec<(u8, u8)>,
}

impl Header {
    pub fn encoded_len(&self) -> usize {
        FIXED_HEADER_LEN + 2 * self.symbols.len()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&MAGIC)?;
        writer.write_all(&[FORMAT_VERSION])?;
        writer.write_all(&self.original_length.to_le_bytes())?;
        writer.write_all(&self.payload_bits.to_le_bytes())?;
        writer.write_all(&(self.symbols.len() as u16).to_le_bytes())?;
        for &(symbol, length) in &self.symbols {
            writer.write_all(&[symbol, length])?;
        }
        Ok(())
    }

    /// Read and validate a header. Any shortfall is a format error.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Header> {
        let mut magic = [0u8; 4];
        read_field(reader, &mut magic, "magic")?;
        if magic != MAGIC {
            return Err(HuffmanError::format(format!(
                "bad magic: expected {MAGIC:02x?}, found {magic:02x?}"
            )));
        }

        let mut version = [0u8; 1];
        read_field(reader, &mut version, "version")?;
        if version[0] != FORMAT_VERSION {
            return Err(HuffmanError::format(format!(
                "unsupported format version {} (expected {FORMAT_VERSION})",
                version[0]
            )));
        }

        let mut word = [0u8; 8];
        read_field(reader, &mut word, "original length")?;
        let original_length = u64::from_le_bytes(word);

        read_field(reader, &mut word, "payload bit count")?;
        let payload_bits = u64::from_le_bytes(word);

        let mut count_bytes = [0u8; 2];
        read_field(reader, &mut count_bytes, "symbol count")?;
        let count = u16::from_le_bytes(count_bytes) as usize;
        if count > 256 {
            return Err(HuffmanError::format(format!(
                "symbol count {count} exceeds 256"
            )));
        }

        let mut symbols = Vec::with_capacity(count);
        for _ in 0..count {
            let mut pair = [0u8; 2];
            read_field(reader, &mut pair, "symbol table")?;
            symbols.push((pair[0], pair[1]));
        }

        let header = Header {
            original_length,
            payload_bits,
            symbols,
        };
        header.validate()?;
        Ok(header)
    }

    /// Check that the header fields agree with each other.
    pub fn validate(&self) -> Result<()> {
        let count = self.symbols.len();

        if self
            .symbols
            .windows(2)
            .any(|pair| pair[0].0 >= pair[1].0)
        {
            return Err(HuffmanError::format(
                "symbol table is not strictly ascending",
            ));
        }
        if let Some(&(symbol, length)) = self
            .symbols
            .iter()
            .find(|&&(_, length)| length == 0 || length > MAX_CODE_LENGTH)
        {
            return Err(HuffmanError::format(format!(
                "code length {length} for symbol 0x{symbol:02x} outside 1..={MAX_CODE_LENGTH}"
            )));
        }

        match count {
            0 if self.original_length != 0 => Err(HuffmanError::format(format!(
                "no symbols but original length {}",
                self.original_length
            ))),
            0 if self.payload_bits != 0 => Err(HuffmanError::format(format!(
                "empty input declares {} payload bits",
                self.payload_bits
            ))),
            _ if count > 0 && self.original_length == 0 => Err(HuffmanError::format(format!(
                "original length 0 but {count} symbols"
            ))),
            1 if self.symbols[0].1 != 1 || self.payload_bits != 0 => {
                Err(HuffmanError::format(format!(
                    "single-symbol container must have code length 1 and no payload, \
                     found length {} and {} bits",
                    self.symbols[0].1, self.payload_bits
                )))
            }
            n if n >= 2
                && (self.payload_bits < self.original_length
                    || self.payload_bits
                        > self.original_length.saturating_mul(MAX_CODE_LENGTH as u64)) =>
            {
                Err(HuffmanError::format(format!(
                    "{} payload bits cannot encode {} symbols",
                    self.payload_bits, self.original_length
                )))
            }
            _ => Ok(()),
        }
    }
}

fn read_field<R: Read>(reader: &mut R, buf: &mut [u8], field: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            HuffmanError::format(format!("header truncated while reading {field}"))
        }
        _ => HuffmanError::Io(e),
    })
}
