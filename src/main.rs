use std::env;
use std::fs;
use std::process;

use notetable::{ConvertConfig, OutputFormat};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: notetable [--config <file.yaml>] [--format c|yaml] <input.mid|input.tab> [output]";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    let mut config_path: Option<&String> = None;
    let mut format: Option<OutputFormat> = None;
    let mut positional: Vec<&String> = Vec::new();

    // Parse flags
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => match iter.next() {
                Some(path) => config_path = Some(path),
                None => usage_exit(),
            },
            "--format" => match iter.next().map(|f| f.parse::<OutputFormat>()) {
                Some(Ok(f)) => format = Some(f),
                Some(Err(e)) => {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
                None => usage_exit(),
            },
            "-h" | "--help" => {
                println!("{}", USAGE);
                return;
            }
            _ => positional.push(arg),
        }
    }

    let (input_path, output_path) = match positional.as_slice() {
        [input] => (*input, None),
        [input, output] => (*input, Some(*output)),
        _ => usage_exit(),
    };

    // Load configuration
    let mut config = match config_path {
        Some(path) => {
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error reading config '{}': {}", path, e);
                    process::exit(1);
                }
            };
            match ConvertConfig::from_yaml(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("{}", e);
                    process::exit(1);
                }
            }
        }
        None => ConvertConfig::default(),
    };
    if let Some(format) = format {
        config.format = format;
    }

    // Read input file
    let bytes = match fs::read(input_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", input_path, e);
            process::exit(1);
        }
    };

    // Convert
    let table = match notetable::convert_and_render(input_path, &bytes, &config) {
        Ok(table) => table,
        Err(e) if !e.is_fatal() => {
            eprintln!("Warning: {}", e);
            process::exit(2);
        }
        Err(e) => {
            eprintln!("Conversion error: {}", e);
            process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &table) {
                eprintln!("Error writing to '{}': {}", path, e);
                process::exit(1);
            }
            eprintln!("Wrote note table to {}", path);
        }
        None => {
            print!("{}", table);
        }
    }
}

fn usage_exit() -> ! {
    eprintln!("{}", USAGE);
    process::exit(1);
}
