//! Whole-file compress and decompress with atomic output.
//!
//! Output is staged in a temporary file next to the destination and renamed
//! into place only once everything has been written. A failed run leaves no
//! output behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{HuffmanError, Result};
use crate::huffman_codec::{CodecStats, HuffmanCodec};

pub fn compress_file(input: &Path, output: &Path) -> Result<CodecStats> {
    let data = fs::read(input).map_err(|e| HuffmanError::file(input, e))?;
    let container = HuffmanCodec::compress(&data)?;
    write_atomically(output, &container)?;

    let stats = CodecStats {
        input_bytes: data.len() as u64,
        output_bytes: container.len() as u64,
    };
    info!(
        input = %input.display(),
        output = %output.display(),
        input_bytes = stats.input_bytes,
        output_bytes = stats.output_bytes,
        ratio = %format!("{:.3}", stats.ratio()),
        "compressed"
    );
    Ok(stats)
}

pub fn decompress_file(input: &Path, output: &Path) -> Result<CodecStats> {
    let container = fs::read(input).map_err(|e| HuffmanError::file(input, e))?;
    let data = HuffmanCodec::decompress(&container)?;
    write_atomically(output, &data)?;

    let stats = CodecStats {
        input_bytes: container.len() as u64,
        output_bytes: data.len() as u64,
    };
    info!(
        input = %input.display(),
        output = %output.display(),
        input_bytes = stats.input_bytes,
        output_bytes = stats.output_bytes,
        "decompressed"
    );
    Ok(stats)
}

/// Write `bytes` to `path` via a temporary file in the same directory.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| HuffmanError::file(dir, e))?;
    debug!(staging = %staged.path().display(), "writing output");
    staged
        .write_all(bytes)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| HuffmanError::file(staged.path(), e))?;
    staged
        .persist(path)
        .map_err(|e| HuffmanError::file(path, e.error))?;
    Ok(())
}
