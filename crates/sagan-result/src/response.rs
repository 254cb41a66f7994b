//! A single DNS response within a result.

use crate::action::{Action, ParseOptions, Problem, Status};
use crate::error::{ResultError, Result};
use crate::fields;
use once_cell::sync::OnceCell;
use sagan_proto::{BackfillSource, Message};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// =============================================================================
// Protocol
// =============================================================================

/// Transport the probe used for the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// ICMP.
    Icmp,
    /// UDP.
    Udp,
    /// TCP.
    Tcp,
}

impl Protocol {
    /// Maps a result's `proto` value. Single-letter forms are accepted.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "ICMP" | "I" => Some(Self::Icmp),
            "UDP" | "U" => Some(Self::Udp),
            "TCP" | "T" => Some(Self::Tcp),
            _ => None,
        }
    }

    /// Returns the canonical name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Icmp => "ICMP",
            Self::Udp => "UDP",
            Self::Tcp => "TCP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Response
// =============================================================================

/// Which of the two buffers to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufKind {
    /// `abuf`, the answer the probe received.
    Answer,
    /// `qbuf`, the query the probe sent.
    Query,
}

impl BufKind {
    /// Returns the JSON key of the buffer.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Answer => "abuf",
            Self::Query => "qbuf",
        }
    }
}

/// Values a result set passes down to each of its responses.
///
/// A response's own fields take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseDefaults {
    /// Address family.
    pub af: Option<u8>,
    /// Destination address.
    pub destination_address: Option<String>,
    /// Source address.
    pub source_address: Option<String>,
    /// Raw protocol value.
    pub protocol: Option<String>,
}

/// One response of a DNS result.
///
/// The buffers are decoded on first access and kept; the response can be
/// shared between threads and the first decode wins.
#[derive(Debug, Serialize)]
pub struct Response {
    /// Address family (4 or 6).
    pub af: Option<u8>,

    /// Address the query was sent to.
    pub destination_address: Option<String>,

    /// Address the query was sent from.
    pub source_address: Option<String>,

    /// Transport protocol.
    pub protocol: Option<Protocol>,

    /// Round-trip time in milliseconds, rounded to 3 decimals.
    pub response_time: Option<f64>,

    /// Size of the answer in bytes.
    pub response_size: Option<u64>,

    /// Position within a result set (`subid`).
    pub response_id: Option<u64>,

    /// Problems found while reading the response fields.
    #[serde(flatten)]
    pub status: Status,

    #[serde(skip)]
    raw: Value,

    #[serde(skip)]
    options: ParseOptions,

    #[serde(skip)]
    abuf: OnceCell<Option<Message>>,

    #[serde(skip)]
    qbuf: OnceCell<Option<Message>>,
}

impl Response {
    /// Builds a standalone response from its JSON object.
    ///
    /// # Errors
    ///
    /// Fails only when an action is [`Action::Fail`] and a problem is found.
    pub fn new(raw: Value, options: ParseOptions) -> Result<Self> {
        Self::from_value(raw, &ResponseDefaults::default(), false, options)
    }

    /// Builds a response, filling missing fields from `defaults`.
    ///
    /// `response_id` is only read for responses that are part of a set.
    ///
    /// # Errors
    ///
    /// Fails only when an action is [`Action::Fail`] and a problem is found.
    pub fn from_value(
        raw: Value,
        defaults: &ResponseDefaults,
        part_of_set: bool,
        options: ParseOptions,
    ) -> Result<Self> {
        let mut status = Status::default();

        let af = fields::uint(raw.get("af")).or(defaults.af);
        let destination_address =
            fields::text(raw.get("dst_addr")).or_else(|| defaults.destination_address.clone());
        let source_address = fields::text(raw.get("src_addr")).or_else(|| defaults.source_address.clone());

        let protocol = match fields::text(raw.get("proto")).or_else(|| defaults.protocol.clone()) {
            Some(text) => {
                let protocol = Protocol::parse(&text);
                if protocol.is_none() {
                    status.malformation(
                        options.on_malformation,
                        format!("\"{text}\" is not a recognised protocol"),
                    )?;
                }
                protocol
            }
            None => None,
        };

        let response_time = fields::float(fields::nested_or_top(&raw, "rt")).map(fields::round3);
        let response_size = fields::uint(fields::nested_or_top(&raw, "size"));
        let response_id = if part_of_set {
            fields::uint(raw.get("subid"))
        } else {
            None
        };

        Ok(Self {
            af,
            destination_address,
            source_address,
            protocol,
            response_time,
            response_size,
            response_id,
            status,
            raw,
            options,
            abuf: OnceCell::new(),
            qbuf: OnceCell::new(),
        })
    }

    /// Returns the raw JSON object.
    #[inline]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Returns the decoded answer buffer, or `None` if the response has none.
    ///
    /// # Errors
    ///
    /// Fails when an action is [`Action::Fail`] and decoding finds a
    /// problem. Nothing is cached in that case.
    pub fn abuf(&self) -> Result<Option<&Message>> {
        self.buffer(BufKind::Answer)
    }

    /// Returns the decoded query buffer, or `None` if the response has none.
    ///
    /// # Errors
    ///
    /// See [`Response::abuf`].
    pub fn qbuf(&self) -> Result<Option<&Message>> {
        self.buffer(BufKind::Query)
    }

    /// Returns one of the buffers, decoding it on first access.
    ///
    /// # Errors
    ///
    /// See [`Response::abuf`].
    pub fn buffer(&self, kind: BufKind) -> Result<Option<&Message>> {
        let cell = match kind {
            BufKind::Answer => &self.abuf,
            BufKind::Query => &self.qbuf,
        };
        cell.get_or_try_init(|| self.load(kind)).map(Option::as_ref)
    }

    /// Returns true if the response fields or an already decoded buffer
    /// report an error.
    pub fn is_error(&self) -> bool {
        self.status.is_error || self.decoded().any(Message::is_protocol_error)
    }

    /// Returns the error text, if any.
    pub fn error_message(&self) -> Option<String> {
        self.status
            .error_message
            .clone()
            .or_else(|| self.decoded().find(|m| m.is_protocol_error()).and_then(protocol_error))
    }

    /// Returns true if the response fields or an already decoded buffer are
    /// malformed.
    pub fn is_malformed(&self) -> bool {
        self.status.is_malformed || self.decoded().any(Message::is_malformed)
    }

    fn decoded(&self) -> impl Iterator<Item = &Message> {
        [&self.abuf, &self.qbuf]
            .into_iter()
            .filter_map(|cell| cell.get().and_then(Option::as_ref))
    }

    fn buf_text(&self, kind: BufKind) -> Option<&str> {
        fields::nested_or_top(&self.raw, kind.key())
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    }

    fn load(&self, kind: BufKind) -> Result<Option<Message>> {
        let Some(text) = self.buf_text(kind) else {
            return Ok(None);
        };

        let message = if self.options.parse_buf {
            self.decode(text)?
        } else {
            self.backfill(text)?
        };

        if let Some(description) = protocol_error(&message) {
            self.options.on_error.apply(Problem::Error, &description)?;
        }

        Ok(Some(message))
    }

    fn decode(&self, text: &str) -> Result<Message> {
        let action = self.options.on_malformation;
        match Message::parse_with(text, self.options.decode) {
            Ok(message) => {
                if let Some(issue) = message.errors.first() {
                    action.apply(
                        Problem::Malformation,
                        &format!("{issue}: Unable to parse buffer: {text}"),
                    )?;
                }
                Ok(message)
            }
            Err(error) if action == Action::Fail => Err(ResultError::Decode(error)),
            Err(error) => {
                action.apply(Problem::Malformation, &format!("{error}: Unable to parse buffer: {text}"))?;
                Ok(Message::undecodable(text, &error))
            }
        }
    }

    fn backfill(&self, text: &str) -> Result<Message> {
        let action = self.options.on_malformation;
        let source = self.raw.get("result").filter(|r| r.is_object()).unwrap_or(&self.raw);

        let source = match BackfillSource::from_value(source) {
            Ok(source) => source,
            Err(error) => {
                action.apply(Problem::Malformation, &format!("Unable to backfill buffer: {error}"))?;
                return Ok(Message::empty(text));
            }
        };

        let message = Message::backfill(text, &source);
        for issue in &message.errors {
            action.apply(Problem::Malformation, &issue.to_string())?;
        }
        Ok(message)
    }
}

fn protocol_error(message: &Message) -> Option<String> {
    message
        .is_protocol_error()
        .then(|| message.rcode())
        .flatten()
        .map(|rcode| format!("Protocol error: {rcode}"))
}
