//! The `decode` and `parse` subcommands.

use crate::render::{Dig, OutputFormat, ResponseLine, result_json};
use anyhow::{Context, Result};
use console::style;
use sagan_metrics::{DecodeTimer, metrics};
use sagan_proto::{DecodeOptions, Message};
use sagan_result::{BufKind, DnsResult, ParseOptions, ResultError};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Inputs read.
    pub total: usize,
    /// Inputs that had problems but were still printed.
    pub flagged: usize,
    /// Inputs skipped because they were not DNS results.
    pub skipped: usize,
}

/// Decodes each buffer and prints it.
pub fn decode_buffers<W: Write>(
    out: &mut W,
    buffers: &[String],
    options: DecodeOptions,
    format: OutputFormat,
) -> Result<Summary> {
    let mut summary = Summary::default();

    for (i, buf) in buffers.iter().enumerate() {
        let timer = DecodeTimer::start();
        let message = Message::parse_with(buf, options).with_context(|| format!("buffer #{}", i + 1))?;
        timer.finish();

        metrics().record_message(&message);
        summary.total += 1;
        if message.is_malformed() {
            summary.flagged += 1;
        }

        match format {
            OutputFormat::Text => {
                if i > 0 {
                    writeln!(out)?;
                }
                write!(out, "{}", Dig(&message))?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &message)?;
                writeln!(out)?;
            }
        }
    }

    Ok(summary)
}

/// Reads one JSON result per line and prints each.
///
/// Lines that are not DNS measurement results are logged and skipped.
/// Problems inside a result follow `options`; with a failing action the
/// whole run stops at that line.
pub fn parse_results<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    options: ParseOptions,
    format: OutputFormat,
) -> Result<Summary> {
    let mut summary = Summary::default();

    for (index, line) in input.lines().enumerate() {
        let number = index + 1;
        let line = line.with_context(|| format!("reading line {number}"))?;
        if line.trim().is_empty() {
            continue;
        }

        summary.total += 1;
        let result = match DnsResult::from_json(&line, options) {
            Ok(result) => result,
            Err(err @ (ResultError::Json(_) | ResultError::NotAMeasurement(_) | ResultError::WrongType(_))) => {
                warn!(line = number, error = %err, "Skipping line");
                metrics().record_rejected(rejection(&err));
                summary.skipped += 1;
                continue;
            }
            Err(err) => return Err(err).with_context(|| format!("line {number}")),
        };

        match format {
            OutputFormat::Text => write_result(out, &result).with_context(|| format!("line {number}"))?,
            OutputFormat::Json => {
                let value = result_json(&result).with_context(|| format!("line {number}"))?;
                serde_json::to_writer(&mut *out, &value)?;
                writeln!(out)?;
            }
        }

        for response in &result.responses {
            for kind in [BufKind::Answer, BufKind::Query] {
                // Already decoded while printing; this only reads the cache.
                if let Ok(Some(message)) = response.buffer(kind) {
                    metrics().record_message(message);
                }
            }
        }
        metrics().record_result(&result);

        if result.is_error() || result.is_malformed() {
            summary.flagged += 1;
        }
        debug!(line = number, result = %result, "printed result");
    }

    Ok(summary)
}

fn write_result<W: Write>(out: &mut W, result: &DnsResult) -> Result<()> {
    writeln!(
        out,
        "{} {}",
        style(result.to_string()).cyan().bold(),
        style(format!("({}, fw {})", result.created.format("%Y-%m-%d %H:%M:%S UTC"), fw(result))).dim()
    )?;
    if let Some(message) = &result.status.error_message {
        writeln!(out, "  {} {message}", style("error:").red())?;
    }
    if result.status.is_malformed {
        writeln!(out, "  {}", style("malformed").yellow())?;
    }

    for response in &result.responses {
        writeln!(out, "{}", style(ResponseLine(response)).green())?;
        for kind in [BufKind::Answer, BufKind::Query] {
            if let Some(message) = response.buffer(kind)? {
                writeln!(out, ";; {}", kind.key())?;
                write!(out, "{}", Dig(message))?;
            }
        }
        if let Some(message) = response.error_message() {
            writeln!(out, "  {} {message}", style("error:").red())?;
        }
    }
    writeln!(out)?;
    Ok(())
}

fn fw(result: &DnsResult) -> String {
    result.firmware.map_or_else(|| "?".to_string(), |fw| fw.to_string())
}

fn rejection(err: &ResultError) -> &'static str {
    match err {
        ResultError::Json(_) => "json",
        ResultError::WrongType(_) => "type",
        _ => "envelope",
    }
}
