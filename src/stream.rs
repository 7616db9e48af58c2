//! Line-oriented query boundary.
//!
//! Each non-empty input line holds one query, `<radius> <threads>`, both
//! integers. The stream is processed until end-of-stream: valid queries are
//! estimated and printed, out-of-range queries are rejected with a warning
//! and skipped, and syntactically malformed lines abort the run. The core
//! never sees an unvalidated value.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::coordinator::{Coordinator, Estimate, SampleRequest};

/// Fatal stream-processing failures. Out-of-range values are not listed
/// here; they reject the offending line and processing continues.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("line {line}: expected `<radius> <threads>`, found {found} field(s)")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: `{token}` is not an integer")]
    InvalidInteger { line: usize, token: String },

    #[error("query stream I/O failure")]
    Io(#[from] io::Error),
}

/// One raw query line, before range validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub radius: i64,
    pub threads: i64,
}

/// Counts of how the stream's lines were handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamSummary {
    /// Queries estimated and printed.
    pub answered: usize,
    /// Well-formed lines skipped for out-of-range values.
    pub rejected: usize,
}

/// Parses one line into a query. Blank lines parse to `None`.
fn parse_query(line_no: usize, line: &str) -> Result<Option<Query>, StreamError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [] => Ok(None),
        [radius, threads] => Ok(Some(Query {
            radius: parse_field(line_no, radius)?,
            threads: parse_field(line_no, threads)?,
        })),
        other => Err(StreamError::FieldCount {
            line: line_no,
            found: other.len(),
        }),
    }
}

fn parse_field(line_no: usize, token: &str) -> Result<i64, StreamError> {
    token.parse().map_err(|_| StreamError::InvalidInteger {
        line: line_no,
        token: token.to_string(),
    })
}

/// One result line: elapsed milliseconds and area, three decimal places
/// each, separated by two spaces.
pub fn format_result(estimate: &Estimate) -> String {
    let millis = estimate.elapsed.as_secs_f64() * 1_000.0;
    format!("{millis:.3}  {:.3}", estimate.area)
}

/// Reads `<radius> <threads>` queries from `reader` until end-of-stream and
/// writes one result line per answered query to `writer`.
///
/// Every query runs with the same sample budget `tries` and base seed
/// `base_seed`. The returned summary says how many queries were answered
/// and how many were rejected; the caller decides what a nonzero rejection
/// count means for the process exit status.
pub fn process_queries<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    coordinator: &Coordinator,
    tries: u64,
    base_seed: u64,
) -> Result<StreamSummary, StreamError> {
    let mut summary = StreamSummary::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let Some(query) = parse_query(line_no, &line)? else {
            continue;
        };

        if query.radius <= 0 || query.threads <= 0 {
            tracing::warn!(
                line = line_no,
                radius = query.radius,
                threads = query.threads,
                "rejected query: radius and threads must be positive"
            );
            summary.rejected += 1;
            continue;
        }

        let request = SampleRequest {
            total_samples: tries,
            threads: usize::try_from(query.threads).unwrap_or(usize::MAX),
            radius: query.radius as f64,
            base_seed,
        };
        let estimate = coordinator.estimate(&request);
        writeln!(writer, "{}", format_result(&estimate))?;
        summary.answered += 1;
    }

    writer.flush()?;
    Ok(summary)
}
