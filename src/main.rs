//! `huffman` command-line driver.
//!
//! ```bash
//! huffman -c notes.txt notes.bin
//! huffman -d notes.bin notes.txt
//! huffman -c --log-level info notes.txt notes.bin
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use huffc::cli::Mode;

#[derive(Parser, Debug)]
#[command(name = "huffman")]
#[command(version)]
#[command(about = "Huffman file compressor", long_about = None)]
struct Args {
    /// Compress INPUT into OUTPUT
    #[arg(short = 'c', conflicts_with = "decompress")]
    compress: bool,

    /// Decompress INPUT into OUTPUT
    #[arg(short = 'd')]
    decompress: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// File to read
    input: PathBuf,

    /// File to create or replace
    output: PathBuf,
}

fn init_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    // only fails when a global subscriber is already set
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run(args: &Args) -> huffc::Result<()> {
    let mode = Mode::from_flags(args.compress, args.decompress)?;
    debug!(%mode, input = %args.input.display(), output = %args.output.display(), "starting");
    mode.run(&args.input, &args.output)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("huffman: {err}");
            ExitCode::FAILURE
        }
    }
}
