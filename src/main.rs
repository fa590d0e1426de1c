//! catpdf – command-line catalog generator.
//!
//! Usage:
//!   catpdf <products.json> [output.pdf] [--detailed] [--out-dir DIR]
//!
//! The input is a JSON array of product records. If no output path is
//! given the file lands in `--out-dir` (default `.`) under the
//! conventional `<prefix>-<timestamp>.pdf` name.

use std::{env, fs, path::PathBuf, process};

use chrono::Utc;
use pdf_catalog::pipeline::{generate, GenerateOptions, RenderMode};
use pdf_catalog::product::Product;
use pdf_catalog::sink;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut out_dir = PathBuf::from(".");
    let mut mode = RenderMode::Summary;
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1).peekable();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--detailed" | "-d" => mode = RenderMode::Detailed,
            "--out-dir" | "-o" => match iter.next() {
                Some(v) => out_dir = PathBuf::from(v),
                None => {
                    eprintln!("--out-dir requires a value");
                    process::exit(1);
                }
            },
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if positional == 0 {
                    input_path = Some(PathBuf::from(path));
                } else if positional == 1 {
                    output_path = Some(PathBuf::from(path));
                } else {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                positional += 1;
            }
        }
    }

    let input = match input_path {
        Some(p) => p,
        None => {
            eprintln!("Error: no input file specified.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    let json = match fs::read_to_string(&input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading '{}': {e}", input.display());
            process::exit(1);
        }
    };

    let products: Vec<Product> = match serde_json::from_str(&json) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error parsing '{}': {e}", input.display());
            process::exit(1);
        }
    };

    let generated_at = Utc::now();
    match generate(&products, mode, &GenerateOptions::default()) {
        Ok((bytes, layout)) => {
            let written = match output_path {
                Some(output) => {
                    if let Some(parent) = output.parent() {
                        if !parent.as_os_str().is_empty() {
                            if let Err(e) = fs::create_dir_all(parent) {
                                eprintln!("Error creating output directory: {e}");
                                process::exit(1);
                            }
                        }
                    }
                    if let Err(e) = fs::write(&output, &bytes) {
                        eprintln!("Error writing '{}': {e}", output.display());
                        process::exit(1);
                    }
                    output
                }
                None => match sink::save_to_dir(&bytes, &out_dir, mode, generated_at) {
                    Ok(path) => path,
                    Err(e) => {
                        eprintln!("Error saving PDF: {e}");
                        process::exit(1);
                    }
                },
            };
            let pages = layout.pages.len();
            eprintln!(
                "Wrote '{}' ({} bytes, {} page{})",
                written.display(),
                bytes.len(),
                pages,
                if pages == 1 { "" } else { "s" }
            );
        }
        Err(e) => {
            eprintln!("Error generating PDF: {e}");
            process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("catpdf – product catalog PDF generator (pdf-catalog)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <products.json> [output.pdf] [--detailed] [--out-dir DIR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <products.json>  JSON array of product records");
    eprintln!("  [output.pdf]     Output path (default: conventional name in --out-dir)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --detailed, -d   One page per product instead of the summary table");
    eprintln!("  --out-dir, -o    Directory for the conventional file name (default: .)");
    eprintln!("  --help           Print this message");
}
