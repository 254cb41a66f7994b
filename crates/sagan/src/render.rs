//! Output rendering for decoded buffers and results.

use clap::ValueEnum;
use sagan_proto::{Message, ResourceRecord};
use sagan_result::{BufKind, DnsResult, Response, ResultError};
use serde_json::{Map, Value};
use std::fmt;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// dig-style text.
    #[default]
    Text,
    /// One JSON document per line.
    Json,
}

/// Renders a message the way `dig` prints a response.
pub struct Dig<'a>(pub &'a Message);

impl fmt::Display for Dig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.0;

        if let Some(header) = &message.header {
            for (i, line) in header.to_string().lines().enumerate() {
                if i == 0 {
                    writeln!(f, ";; ->>HEADER<<- {line}")?;
                } else {
                    writeln!(f, ";; {line}")?;
                }
            }
        }

        if let Some(edns) = &message.edns0 {
            writeln!(f, "\n;; OPT PSEUDOSECTION:")?;
            writeln!(f, "; {edns}")?;
        }

        if !message.questions.is_empty() {
            writeln!(f, "\n;; QUESTION SECTION:")?;
            for question in &message.questions {
                writeln!(f, "{question}")?;
            }
        }

        section(f, "ANSWER", &message.answers)?;
        section(f, "AUTHORITY", &message.authorities)?;
        section(f, "ADDITIONAL", &message.additionals)?;

        if !message.errors.is_empty() {
            writeln!(f, "\n;; DECODE ERRORS:")?;
            for issue in &message.errors {
                writeln!(f, ";; {issue}")?;
            }
        }

        Ok(())
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str, records: &[ResourceRecord]) -> fmt::Result {
    if records.is_empty() {
        return Ok(());
    }
    writeln!(f, "\n;; {title} SECTION:")?;
    for record in records {
        writeln!(f, "{record}")?;
    }
    Ok(())
}

/// One-line summary of a response.
pub struct ResponseLine<'a>(pub &'a Response);

impl fmt::Display for ResponseLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.0;
        match response.response_id {
            Some(id) => write!(f, "Response #{id}:")?,
            None => f.write_str("Response:")?,
        }
        if let Some(protocol) = response.protocol {
            write!(f, " {protocol}")?;
        }
        if let Some(af) = response.af {
            write!(f, " IPv{af}")?;
        }
        let source = response.source_address.as_deref().unwrap_or("?");
        let destination = response.destination_address.as_deref().unwrap_or("?");
        write!(f, " {source} -> {destination}")?;
        if let Some(rt) = response.response_time {
            write!(f, ", {rt} ms")?;
        }
        if let Some(size) = response.response_size {
            write!(f, ", {size} bytes")?;
        }
        Ok(())
    }
}

/// Serializes a result with its decoded buffers attached to each response.
pub fn result_json(result: &DnsResult) -> Result<Value, ResultError> {
    let mut value = serde_json::to_value(result)?;

    if let Some(responses) = value.get_mut("responses").and_then(Value::as_array_mut) {
        for (json, response) in responses.iter_mut().zip(&result.responses) {
            let Some(object) = json.as_object_mut() else {
                continue;
            };
            attach(object, response, BufKind::Answer)?;
            attach(object, response, BufKind::Query)?;
            object.insert("is_error".to_string(), Value::Bool(response.is_error()));
            object.insert("is_malformed".to_string(), Value::Bool(response.is_malformed()));
            if let Some(message) = response.error_message() {
                object.insert("error_message".to_string(), Value::String(message));
            }
        }
    }

    if let Some(object) = value.as_object_mut() {
        object.insert("is_error".to_string(), Value::Bool(result.is_error()));
        object.insert("is_malformed".to_string(), Value::Bool(result.is_malformed()));
    }

    Ok(value)
}

fn attach(object: &mut Map<String, Value>, response: &Response, kind: BufKind) -> Result<(), ResultError> {
    if let Some(message) = response.buffer(kind)? {
        object.insert(kind.key().to_string(), serde_json::to_value(message)?);
    }
    Ok(())
}
