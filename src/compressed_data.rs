use std::io::{Cursor, Read};

use tracing::debug;

use crate::bit_io::bytes_for_bits;
use crate::error::{HuffmanError, Result};
use crate::metadata::Header;

/// A complete container: header plus bit-packed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedData {
    pub header: Header,
    pub payload: Vec<u8>,
}

impl CompressedData {
    pub fn original_length(&self) -> u64 {
        self.header.original_length
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.header.encoded_len() + self.payload.len());
        self.header.write_to(&mut bytes)?;
        bytes.extend_from_slice(&self.payload);
        Ok(bytes)
    }

    /// Parse a container, checking the header before touching the payload.
    pub fn deserialize(data: &[u8]) -> Result<CompressedData> {
        let mut cursor = Cursor::new(data);
        let header = Header::read_from(&mut cursor)?;

        let expected = bytes_for_bits(header.payload_bits);
        let mut payload = Vec::new();
        cursor.read_to_end(&mut payload)?;
        let actual = payload.len() as u64;
        debug!(
            header_len = header.encoded_len(),
            payload_len = actual,
            "parsed container header"
        );

        if actual < expected {
            return Err(HuffmanError::TruncatedInput {
                expected,
                actual,
                unit: "payload bytes",
            });
        }
        if actual > expected {
            return Err(HuffmanError::format(format!(
                "{} trailing bytes after a {expected}-byte payload",
                actual - expected
            )));
        }

        Ok(CompressedData { header, payload })
    }
}
