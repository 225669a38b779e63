// Shape preview CLI.
//
// Usage:
//   shape-preview <shapes.json> [-o <output_dir>]
//
// The JSON file holds an array of shape options, each with a "name".
// Every shape is written to <output_dir>/<name>.bmp; shapes with a separate
// hit-detection image also get <name>_hit.bmp. Set RUST_LOG=info (or debug)
// to see sizes, anchors and surface allocations.

use shape_preview::{parse_entries, render_entry};
use std::path::PathBuf;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let input = PathBuf::from(&args[1]);
    let mut output_dir = PathBuf::from(".");
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-o" if i + 1 < args.len() => {
                output_dir = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            other => {
                eprintln!("Unknown option: {}", other);
                print_usage();
                process::exit(1);
            }
        }
    }

    let json = std::fs::read_to_string(&input).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {}", input.display(), e);
        process::exit(1);
    });
    let entries = parse_entries(&json).unwrap_or_else(|e| {
        eprintln!("Invalid shape list in {}: {}", input.display(), e);
        process::exit(1);
    });
    if let Err(e) = std::fs::create_dir_all(&output_dir) {
        eprintln!("Cannot create {}: {}", output_dir.display(), e);
        process::exit(1);
    }

    let mut failed = false;
    for entry in &entries {
        match render_entry(entry, &output_dir) {
            Ok(written) => {
                println!("Saved: {}", written.image.display());
                if let Some(hit) = written.hit_detection {
                    println!("Saved: {}", hit.display());
                }
            }
            Err(e) => {
                eprintln!("Failed: {}", e);
                failed = true;
            }
        }
    }
    if failed {
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!("shape-preview - render regular shape symbols to BMP files");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  shape-preview <shapes.json> [-o <output_dir>]");
}
