//! CSV file driver: MBO lines in, MBP rows out.
//!
//! [`CsvPipeline`] wires the parser, the [`BookEngine`], and the writer into
//! a buffered streaming pass: read a chunk of lines, parse each, apply to
//! the engine, format the snapshot, flush the chunk. Parse failures are
//! counted and skipped; the engine never sees them. This is the only layer
//! with user-visible failures (bad paths, unreadable input, unwritable
//! output).

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::book::{BookEngine, EngineConfig};
use crate::error::{BookError, Result};
use crate::parser::parse_mbo_line;
use crate::writer;

/// Pipeline tuning knobs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Engine configuration for the single instrument being processed.
    pub engine: EngineConfig,
    /// Number of output rows buffered between flushes.
    pub chunk_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            chunk_rows: 8192,
        }
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    /// Input lines read (excluding the header)
    pub lines_read: u64,
    /// Lines that failed to parse and were skipped
    pub parse_failures: u64,
    /// Events suppressed before dispatch (the initial clear sentinel)
    pub suppressed: u64,
    /// MBP rows written
    pub rows_written: u64,
    /// Wall-clock processing time
    #[serde(skip)]
    pub elapsed: Duration,
}

impl PipelineSummary {
    /// Rows written per second of wall-clock time.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.rows_written as f64 / secs
        } else {
            0.0
        }
    }
}

/// Streaming MBO → MBP CSV processor for a single instrument feed.
#[derive(Debug, Default)]
pub struct CsvPipeline {
    config: PipelineConfig,
    engine: BookEngine,
}

impl CsvPipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        let engine = BookEngine::with_config(config.engine.clone());
        Self { config, engine }
    }

    /// The engine, read-only (counters, book state).
    pub fn engine(&self) -> &BookEngine {
        &self.engine
    }

    /// Process a whole MBO CSV file into an MBP CSV file.
    pub fn process_file(
        &mut self,
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
    ) -> Result<PipelineSummary> {
        let input_path = input_path.as_ref();
        let input = File::open(input_path).map_err(|e| {
            BookError::Io(format!("cannot open input {}: {e}", input_path.display()))
        })?;

        let output_path = output_path.as_ref();
        let output = File::create(output_path).map_err(|e| {
            BookError::Io(format!("cannot create output {}: {e}", output_path.display()))
        })?;

        self.run(BufReader::new(input), BufWriter::new(output))
    }

    /// Process MBO CSV from any reader into any writer.
    ///
    /// The first input line is the venue header and is skipped. The MBP
    /// header row is always written, even for empty input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<PipelineSummary> {
        let start = Instant::now();

        output.write_all(writer::header().as_bytes())?;

        let mut summary = PipelineSummary {
            lines_read: 0,
            parse_failures: 0,
            suppressed: 0,
            rows_written: 0,
            elapsed: Duration::ZERO,
        };

        let mut chunk = String::with_capacity(self.config.chunk_rows * 256);
        let mut rows_in_chunk = 0usize;

        for (index, line) in input.lines().enumerate() {
            let line = line?;
            if index == 0 {
                // Venue header row.
                continue;
            }
            summary.lines_read += 1;

            let Some(event) = parse_mbo_line(&line) else {
                summary.parse_failures += 1;
                log::debug!("skipping unparseable line {}", index + 1);
                continue;
            };

            match self.engine.apply(&event) {
                Some(record) => {
                    writer::write_mbp_row(&mut chunk, &record);
                    summary.rows_written += 1;
                    rows_in_chunk += 1;
                    if rows_in_chunk >= self.config.chunk_rows {
                        output.write_all(chunk.as_bytes())?;
                        chunk.clear();
                        rows_in_chunk = 0;
                    }
                }
                None => summary.suppressed += 1,
            }
        }

        if !chunk.is_empty() {
            output.write_all(chunk.as_bytes())?;
        }
        output.flush()?;

        summary.elapsed = start.elapsed();
        if summary.parse_failures > 0 {
            log::warn!(
                "{} of {} lines failed to parse and were skipped",
                summary.parse_failures,
                summary.lines_read
            );
        }
        log::info!(
            "processed {} lines into {} rows in {:.2}s ({:.0} rows/s)",
            summary.lines_read,
            summary.rows_written,
            summary.elapsed.as_secs_f64(),
            summary.throughput()
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "\
ts_recv,ts_event,rtype,publisher_id,instrument_id,action,side,price,size,channel_id,order_id,flags,ts_in_delta,sequence,symbol
2025-07-17T08:05:03.360677248Z,2025-07-17T08:05:03.360519907Z,160,2,1108,R,N,0,0,0,0,8,0,0,ARL
2025-07-17T08:05:11.491502square,bad,line
2025-07-17T08:05:11.491572486Z,2025-07-17T08:05:11.491421332Z,160,2,1108,A,B,5.510000,100,0,817593,130,165200,851012,ARL
2025-07-17T08:05:12.112741296Z,2025-07-17T08:05:12.112650171Z,160,2,1108,C,B,5.510000,100,0,817593,130,163003,851433,ARL
";

    fn run_pipeline(input: &str) -> (PipelineSummary, String) {
        let mut pipeline = CsvPipeline::with_config(PipelineConfig {
            engine: EngineConfig::default().with_logging(false).with_timing(false),
            chunk_rows: 2,
        });
        let mut out = Vec::new();
        let summary = pipeline
            .run(input.as_bytes(), &mut out)
            .expect("pipeline run");
        (summary, String::from_utf8(out).expect("utf8 output"))
    }

    #[test]
    fn test_counts() {
        let (summary, _) = run_pipeline(INPUT);
        assert_eq!(summary.lines_read, 4);
        assert_eq!(summary.parse_failures, 1);
        assert_eq!(summary.suppressed, 1);
        assert_eq!(summary.rows_written, 2);
    }

    #[test]
    fn test_output_shape() {
        let (_, output) = run_pipeline(INPUT);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3); // header + 2 rows
        assert!(lines[0].starts_with(",ts_recv,ts_event"));

        // Add row shows the bid at the top slot.
        let add_fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(add_fields[6], "A");
        assert_eq!(add_fields[14], "5.510000");
        assert_eq!(add_fields[15], "100");
        assert_eq!(add_fields[16], "1");

        // Cancel row shows the book drained again.
        let cancel_fields: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(cancel_fields[6], "C");
        assert_eq!(cancel_fields[14], "0.000000");
        assert_eq!(cancel_fields[15], "0");
    }

    #[test]
    fn test_empty_input_writes_header_only() {
        let (summary, output) = run_pipeline("header-only\n");
        assert_eq!(summary.lines_read, 0);
        assert_eq!(summary.rows_written, 0);
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_missing_input_file_errors() {
        let mut pipeline = CsvPipeline::new();
        let result = pipeline.process_file("/definitely/not/here.csv", "/tmp/out.csv");
        assert!(matches!(result, Err(BookError::Io(_))));
    }
}
