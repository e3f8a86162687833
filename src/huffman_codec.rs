use std::io::{Read, Write};

use tracing::debug;

use crate::bit_io::{bytes_for_bits, BitReader, BitWriter};
use crate::code_table::{CodeTable, DecodeTable, Step};
use crate::compressed_data::CompressedData;
use crate::error::{HuffmanError, Result};
use crate::hufftree::HuffmanTree;
use crate::metadata::Header;

/// Encoder holding the canonical code table for one input.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    table: CodeTable,
}

/// Byte counts for one compress or decompress run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl CodecStats {
    /// Output size as a fraction of input size; 0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }
}

impl HuffmanCodec {
    /// Codec for the symbols of `tree`, using canonical codes of the same lengths.
    pub fn new(tree: &HuffmanTree) -> Result<Self> {
        Ok(HuffmanCodec {
            table: CodeTable::canonical_from_tree(tree)?,
        })
    }

    /// Build the codec from the data it will encode. Empty data gives an empty table.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match HuffmanTree::from_bytes(data)? {
            Some(tree) => HuffmanCodec::new(&tree),
            None => Ok(HuffmanCodec::default()),
        }
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.table
    }

    pub fn encode(&self, data: &[u8]) -> Result<CompressedData> {
        if data.is_empty() {
            return Ok(CompressedData {
                header: Header {
                    original_length: 0,
                    payload_bits: 0,
                    symbols: Vec::new(),
                },
                payload: Vec::new(),
            });
        }
        let header_symbols = self.table.lengths();

        // a single symbol is reproduced from the count alone
        let (payload, payload_bits) = if self.table.len() == 1 {
            if let Some(&byte) = data.iter().find(|b| self.table.get(**b).is_none()) {
                return Err(HuffmanError::SymbolNotInTable(byte));
            }
            (Vec::new(), 0)
        } else {
            let mut bit_vec = BitWriter::with_capacity(data.len() / 2);
            for &byte in data {
                let code = self
                    .table
                    .get(byte)
                    .ok_or(HuffmanError::SymbolNotInTable(byte))?;
                bit_vec.push_bits(code.bits, code.length);
            }
            bit_vec.finish()
        };

        debug!(
            original_length = data.len(),
            symbols = header_symbols.len(),
            payload_bits,
            "encoded payload"
        );

        let header = Header {
            original_length: data.len() as u64,
            payload_bits,
            symbols: header_symbols,
        };
        header.validate()?;
        Ok(CompressedData { header, payload })
    }

    /// Decode using nothing but the container's own header and payload.
    pub fn decode(compressed: &CompressedData) -> Result<Vec<u8>> {
        let header = &compressed.header;
        header.validate()?;

        let original_length = usize::try_from(header.original_length).map_err(|_| {
            HuffmanError::format(format!(
                "original length {} does not fit in memory",
                header.original_length
            ))
        })?;

        match header.symbols.as_slice() {
            [] => return Ok(Vec::new()),
            [(byte, _)] => {
                let mut result = Vec::new();
                result.try_reserve_exact(original_length).map_err(|e| {
                    HuffmanError::format(format!(
                        "cannot allocate {original_length} bytes for a single-symbol run: {e}"
                    ))
                })?;
                result.resize(original_length, *byte);
                return Ok(result);
            }
            _ => {}
        }

        let available = compressed.payload.len() as u64;
        let needed = bytes_for_bits(header.payload_bits);
        if available < needed {
            return Err(HuffmanError::TruncatedInput {
                expected: needed,
                actual: available,
                unit: "payload bytes",
            });
        }

        let table = CodeTable::canonical(&header.symbols)?;
        let decode_table = DecodeTable::from_code_table(&table)?;
        let mut bits = BitReader::new(&compressed.payload, header.payload_bits);

        // each symbol takes at least one bit, so payload_bits bounds the count
        let mut result = Vec::with_capacity(original_length);
        let mut node = DecodeTable::ROOT;
        while result.len() < original_length {
            let bit = bits.read_bit().ok_or_else(|| HuffmanError::TruncatedInput {
                expected: header.original_length,
                actual: result.len() as u64,
                unit: "symbols",
            })?;
            match decode_table.step(node, bit)? {
                Step::Symbol(byte) => {
                    result.push(byte);
                    node = DecodeTable::ROOT;
                }
                Step::Continue(next) => node = next,
            }
        }

        if bits.remaining() != 0 {
            return Err(HuffmanError::format(format!(
                "{} unused payload bits after {} symbols",
                bits.remaining(),
                original_length
            )));
        }
        Ok(result)
    }

    /// Compress `data` into a serialized container.
    pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
        HuffmanCodec::from_bytes(data)?.encode(data)?.serialize()
    }

    /// Parse and decode a serialized container.
    pub fn decompress(container: &[u8]) -> Result<Vec<u8>> {
        HuffmanCodec::decode(&CompressedData::deserialize(container)?)
    }

    /// Read all of `input`, compress it, and write the container to `output`.
    pub fn encode_from_file<R: Read, W: Write>(mut input: R, mut output: W) -> Result<CodecStats> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        let compressed = HuffmanCodec::compress(&data)?;
        output.write_all(&compressed)?;
        output.flush()?;
        Ok(CodecStats {
            input_bytes: data.len() as u64,
            output_bytes: compressed.len() as u64,
        })
    }

    /// Read a whole container from `input` and write the decoded bytes to `output`.
    pub fn decode_from_file<R: Read, W: Write>(mut input: R, mut output: W) -> Result<CodecStats> {
        let mut container = Vec::new();
        input.read_to_end(&mut container)?;
        let decoded = HuffmanCodec::decompress(&container)?;
        output.write_all(&decoded)?;
        output.flush()?;
        Ok(CodecStats {
            input_bytes: container.len() as u64,
            output_bytes: decoded.len() as u64,
        })
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn three_symbol_example() {
        let data = b"AAAAABBBCC";
        let codec = HuffmanCodec::from_bytes(data).unwrap();
        let table = codec.code_table();
        assert_eq!(table.get(b'A').unwrap().length, 1);
        assert_eq!(table.get(b'B').unwrap().length, 2);
        assert_eq!(table.get(b'C').unwrap().length, 2);

        let compressed = codec.encode(data).unwrap();
        // A=0, B=10, C=11: 5 + 6 + 4 bits
        assert_eq!(compressed.header.payload_bits, 15);
        assert_eq!(compressed.payload, vec![0b0000_0101, 0b0101_1110]);
        assert_eq!(HuffmanCodec::decode(&compressed).unwrap(), data.to_vec());
    }

    #[test]
    fn empty_input_round_trips() {
        let container = HuffmanCodec::compress(b"").unwrap();
        let parsed = CompressedData::deserialize(&container).unwrap();
        assert_eq!(parsed.original_length(), 0);
        assert!(parsed.header.symbols.is_empty());
        assert!(parsed.payload.is_empty());
        assert!(HuffmanCodec::decompress(&container).unwrap().is_empty());
    }

    #[test]
    fn single_symbol_uses_count_only() {
        let data = vec![0x41u8; 10_000];
        let container = HuffmanCodec::compress(&data).unwrap();
        assert_eq!(container.len(), 23 + 2);
        assert_eq!(HuffmanCodec::decompress(&container).unwrap(), data);
    }

    #[test]
    fn foreign_byte_is_reported() {
        let codec = HuffmanCodec::from_bytes(b"abab").unwrap();
        assert!(matches!(
            codec.encode(b"abc"),
            Err(HuffmanError::SymbolNotInTable(b'c'))
        ));

        let single = HuffmanCodec::from_bytes(b"aaaa").unwrap();
        assert!(matches!(
            single.encode(b"ab"),
            Err(HuffmanError::SymbolNotInTable(b'b'))
        ));
    }

    #[test]
    fn empty_data_gives_an_empty_container() {
        let codec = HuffmanCodec::from_bytes(b"ab").unwrap();
        let compressed = codec.encode(b"").unwrap();
        assert!(compressed.header.symbols.is_empty());
        assert!(compressed.payload.is_empty());

        let container = compressed.serialize().unwrap();
        assert!(HuffmanCodec::decompress(&container).unwrap().is_empty());

        let single = HuffmanCodec::from_bytes(b"aaaa").unwrap();
        let container = single.encode(b"").unwrap().serialize().unwrap();
        assert!(HuffmanCodec::decompress(&container).unwrap().is_empty());
    }

    #[test]
    fn oversized_single_symbol_run_is_an_error() {
        let mut container = HuffmanCodec::compress(b"AAAA").unwrap();
        assert_eq!(container.len(), 25);
        container[5..13].copy_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(
            HuffmanCodec::decompress(&container),
            Err(HuffmanError::Format(_))
        ));
    }

    #[test]
    fn payload_bit_count_must_match_symbols() {
        let mut compressed = HuffmanCodec::from_bytes(b"AAAAABBBCC")
            .unwrap()
            .encode(b"AAAAABBBCC")
            .unwrap();
        // claim one extra bit: the decoder finishes with a bit left over
        compressed.header.payload_bits += 1;
        assert!(matches!(
            HuffmanCodec::decode(&compressed),
            Err(HuffmanError::Format(_))
        ));

        // claim too few bits: the decoder runs dry before the last symbol
        compressed.header.payload_bits -= 3;
        assert!(matches!(
            HuffmanCodec::decode(&compressed),
            Err(HuffmanError::TruncatedInput { unit: "symbols", .. })
        ));
    }

    #[test]
    fn streams_through_read_and_write() {
        let text = b"The quick brown fox jumps over the lazy dog".to_vec();
        let mut container = Vec::new();
        let stats = HuffmanCodec::encode_from_file(Cursor::new(&text), &mut container).unwrap();
        assert_eq!(stats.input_bytes, text.len() as u64);
        assert_eq!(stats.output_bytes, container.len() as u64);

        let mut restored = Vec::new();
        let stats = HuffmanCodec::decode_from_file(Cursor::new(&container), &mut restored).unwrap();
        assert_eq!(restored, text);
        assert_eq!(stats.output_bytes, text.len() as u64);
    }

    #[test]
    fn ratio_of_empty_input_is_zero() {
        let stats = CodecStats {
            input_bytes: 0,
            output_bytes: 23,
        };
        assert_eq!(stats.ratio(), 0.0);
        let stats = CodecStats {
            input_bytes: 100,
            output_bytes: 25,
        };
        assert_eq!(stats.ratio(), 0.25);
    }
}
