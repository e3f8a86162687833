use huffc::file_ops::{compress_file, decompress_file};
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let sample_path = dir.path().join("sample.txt");
    let packed_path = dir.path().join("sample.huff");
    let restored_path = dir.path().join("decompressed.txt");

    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";
    fs::write(&sample_path, sample_text)?;
    println!("Created sample file: {} bytes", sample_text.len());

    let stats = compress_file(&sample_path, &packed_path)?;
    println!(
        "Compressed to: {} bytes ({:.1}% of original)",
        stats.output_bytes,
        stats.ratio() * 100.0
    );

    decompress_file(&packed_path, &restored_path)?;
    let decompressed_text = fs::read_to_string(&restored_path)?;

    if sample_text == decompressed_text {
        println!("Decompression successful, data matches exactly.");
    } else {
        return Err("Decompression verification failed".into());
    }

    Ok(())
}
