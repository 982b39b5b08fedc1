//! ansi-elements
//!
//! Reads text from a file or stdin and prints the element stream, one
//! element per line.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use ansi_elements::{Element, Parser, ParserConfig};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Parse command line arguments
    let mut input_file: Option<PathBuf> = None;
    let mut config_file: Option<PathBuf> = None;
    let mut output_format = OutputFormat::Text;
    let mut chunk_size: Option<usize> = None;
    let mut no_utf8 = false;
    let mut show_help = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                if i < args.len() {
                    config_file = Some(PathBuf::from(&args[i]));
                }
            }
            "-s" | "--chunk-size" => {
                i += 1;
                if i < args.len() {
                    chunk_size = args[i].parse().ok().filter(|&n| n > 0);
                }
            }
            "-j" | "--json" => {
                output_format = OutputFormat::Json;
            }
            "--no-utf8" => {
                no_utf8 = true;
            }
            "-h" | "--help" => {
                show_help = true;
            }
            _ => {
                // Treat as input file if no flag
                if input_file.is_none() && !args[i].starts_with('-') {
                    input_file = Some(PathBuf::from(&args[i]));
                }
            }
        }
        i += 1;
    }

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    let mut config = match &config_file {
        Some(path) => match ParserConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ParserConfig::default(),
    };
    if no_utf8 {
        config.use_utf8 = false;
    }

    // Read input
    let input_data = match &input_file {
        Some(path) => match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            // Read from stdin
            let mut data = Vec::new();
            if let Err(e) = io::stdin().read_to_end(&mut data) {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
            data
        }
    };
    let text = String::from_utf8_lossy(&input_data);

    let mut parser = Parser::with_config(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut faults = 0usize;

    for chunk in split_chunks(&text, chunk_size) {
        for result in parser.feed(chunk) {
            let written = match result {
                Ok(element) => write_element(&mut out, &element, output_format),
                Err(e) => {
                    tracing::error!("{}", e);
                    faults += 1;
                    Ok(())
                }
            };
            if let Err(e) = written {
                eprintln!("Error writing output: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    if !parser.pending().is_empty() {
        tracing::warn!("input ended inside a sequence: {:?}", parser.pending());
    }

    if faults > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn write_element(out: &mut impl Write, element: &Element, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{}", element),
        OutputFormat::Json => {
            let json = serde_json::to_string(element).map_err(io::Error::from)?;
            writeln!(out, "{}", json)
        }
    }
}

/// Split text into chunks of `size` characters, or one chunk
fn split_chunks(text: &str, size: Option<usize>) -> Vec<&str> {
    let Some(size) = size else {
        return vec![text];
    };

    let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).step_by(size).collect();
    bounds.push(text.len());
    bounds.windows(2).map(|w| &text[w[0]..w[1]]).collect()
}

fn print_help() {
    println!("ansi-elements - decode ANSI/VT control sequences");
    println!();
    println!("Usage: ansi-elements [OPTIONS] [INPUT_FILE]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>    Load parser configuration (JSON)");
    println!("  -s, --chunk-size <N>   Feed input in chunks of N characters");
    println!("  -j, --json             Output elements as JSON lines");
    println!("      --no-utf8          Report shifts and charset designations");
    println!("  -h, --help             Show this help message");
    println!();
    println!("If no input file is specified, reads from stdin.");
    println!();
    println!("Examples:");
    println!("  printf 'Hello\\033[31mWorld\\033[0m' | ansi-elements");
    println!("  ansi-elements --json session.log > elements.jsonl");
}
