//! CLI driver: reconstruct an MBP-10 CSV from an MBO CSV.
//!
//! # Usage
//!
//! ```bash
//! # Default output path (output_mbp.csv)
//! cargo run --release --bin reconstruct -- mbo.csv
//!
//! # Explicit paths
//! cargo run --release --bin reconstruct -- --input mbo.csv --output mbp.csv
//! ```

use std::path::PathBuf;
use std::process;

use mbp_reconstructor::{CsvPipeline, EngineConfig, PipelineConfig};

/// Command-line arguments
struct Args {
    /// Input MBO CSV file
    input: PathBuf,
    /// Output MBP CSV file
    output: PathBuf,
    /// Disable per-event timing (slightly faster, no average latency stat)
    no_timing: bool,
}

fn parse_args() -> std::result::Result<Args, String> {
    let args: Vec<String> = std::env::args().collect();

    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut no_timing = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" | "-i" => {
                i += 1;
                if i >= args.len() {
                    return Err("--input requires a path".to_string());
                }
                input = Some(PathBuf::from(&args[i]));
            }
            "--output" | "-o" => {
                i += 1;
                if i >= args.len() {
                    return Err("--output requires a path".to_string());
                }
                output = Some(PathBuf::from(&args[i]));
            }
            "--no-timing" => {
                no_timing = true;
            }
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            arg => {
                // Positional arguments
                if input.is_none() {
                    input = Some(PathBuf::from(arg));
                } else if output.is_none() {
                    output = Some(PathBuf::from(arg));
                } else {
                    return Err(format!("Unknown argument: {arg}"));
                }
            }
        }
        i += 1;
    }

    let input = input.ok_or("Input path is required")?;
    let output = output.unwrap_or_else(|| PathBuf::from("output_mbp.csv"));

    Ok(Args {
        input,
        output,
        no_timing,
    })
}

fn print_help() {
    eprintln!(
        r#"
Reconstruct MBP-10 Snapshots from MBO Events

Reads a venue MBO CSV, replays it through the book engine, and writes one
depth-10 MBP row per input event.

USAGE:
    reconstruct [OPTIONS] --input <MBO.CSV> [--output <MBP.CSV>]
    reconstruct <INPUT> [OUTPUT]

OPTIONS:
    -i, --input <PATH>    Input MBO CSV file
    -o, --output <PATH>   Output MBP CSV file (default: output_mbp.csv)
        --no-timing       Skip per-event latency measurement
    -h, --help            Print this help message
"#
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(1);
        }
    };

    println!("MBP-10 Reconstruction");
    println!("  Input:  {}", args.input.display());
    println!("  Output: {}", args.output.display());

    let config = PipelineConfig {
        engine: EngineConfig::default().with_timing(!args.no_timing),
        ..PipelineConfig::default()
    };
    let mut pipeline = CsvPipeline::with_config(config);

    let summary = match pipeline.process_file(&args.input, &args.output) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let stats = pipeline.engine().stats();

    println!("\nProcessing Results:");
    println!("  Lines read:        {}", summary.lines_read);
    println!("  Rows written:      {}", summary.rows_written);
    println!("  Parse failures:    {}", summary.parse_failures);
    println!("  Records processed: {}", stats.records_processed);
    println!("  Trades processed:  {}", stats.trades_processed);
    println!("  Orders added:      {}", stats.orders_added);
    println!("  Orders cancelled:  {}", stats.orders_cancelled);
    if !args.no_timing {
        println!("  Avg event time:    {} ns", stats.average_processing_ns());
    }
    println!(
        "  Throughput:        {:.0} rows/s ({:.2}s total)",
        summary.throughput(),
        summary.elapsed.as_secs_f64()
    );
}
