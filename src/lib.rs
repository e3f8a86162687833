//! # huffc
//!
//! Byte-oriented Huffman compression with a self-describing container.
//! Only canonical code lengths are stored in the header, so a container can
//! be decoded without the original frequency table.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffc::HuffmanCodec;
//!
//! let container = HuffmanCodec::compress(b"AAAAABBBCC")?;
//! assert_eq!(HuffmanCodec::decompress(&container)?, b"AAAAABBBCC");
//! # Ok::<(), huffc::HuffmanError>(())
//! ```
//!
//! Files are handled by [`file_ops`], which only replaces the destination
//! once the whole output has been written.

pub mod bit_io;
pub mod cli;
pub mod code_table;
pub mod compressed_data;
pub mod error;
pub mod file_ops;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod metadata;

mod min_heap;

pub use code_table::{Code, CodeTable, DecodeTable};
pub use compressed_data::CompressedData;
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{CodecStats, HuffmanCodec};
pub use hufftree::{HuffmanTree, MAX_CODE_LENGTH};
pub use min_heap::HeapErr;
