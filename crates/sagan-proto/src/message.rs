//! DNS message decoding.
//!
//! A [`Message`] is built from the base64 buffer string found in a result.
//! Decoding never fails on a broken buffer: problems are collected in
//! [`Message::errors`] and whatever was decoded before them is kept.

use crate::edns::Edns0;
use crate::error::{Error, Result};
use crate::header::{HEADER_SIZE, Header};
use crate::issue::{DecodeIssue, DecodeOutcome, ErrorSink, Stage};
use crate::options::DecodeOptions;
use crate::question::Question;
use crate::rcode::Rcode;
use crate::record::{RecordHeader, ResourceRecord};
use crate::wire::WireReader;
use data_encoding::BASE64_NOPAD;
use serde::Serialize;
use std::fmt;

/// A decoded DNS message.
///
/// Sections hold what could be decoded; they may be shorter than the
/// header's counts when the buffer is truncated or corrupt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// The message header, absent when the buffer is shorter than 12
    /// bytes or header decoding was disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,

    /// EDNS(0) data from the OPT pseudo-RR in the additional section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edns0: Option<Edns0>,

    /// The question section.
    pub questions: Vec<Question>,

    /// The answer section.
    pub answers: Vec<ResourceRecord>,

    /// The authority section.
    pub authorities: Vec<ResourceRecord>,

    /// The additional section (excluding OPT when EDNS is diverted).
    pub additionals: Vec<ResourceRecord>,

    /// The buffer string exactly as given.
    pub raw: String,

    /// Problems met while decoding.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<DecodeIssue>,
}

impl Message {
    /// Creates an empty message for `raw`.
    pub fn empty(raw: impl Into<String>) -> Self {
        Self {
            header: None,
            edns0: None,
            questions: Vec::new(),
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
            raw: raw.into(),
            errors: Vec::new(),
        }
    }

    /// Decodes a base64 buffer string with every section enabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBase64`] if `buf` is not base64. A buffer
    /// that decodes to broken DNS is not an error; see [`Message::errors`].
    pub fn parse(buf: &str) -> Result<Self> {
        Self::parse_with(buf, DecodeOptions::default())
    }

    /// Decodes a base64 buffer string, keeping the sections `options`
    /// selects.
    ///
    /// Whitespace and `=` padding are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBase64`] if `buf` is not base64.
    pub fn parse_with(buf: &str, options: DecodeOptions) -> Result<Self> {
        let data = decode_base64(buf)?;
        Ok(Self::from_wire(buf, &data, options))
    }

    /// Decodes raw wire bytes. `raw` is kept as the message's text form.
    pub fn from_wire(raw: impl Into<String>, data: &[u8], options: DecodeOptions) -> Self {
        let outcome = decode(data, options);
        let mut message = outcome.value;
        message.raw = raw.into();
        message.errors = outcome.errors;

        tracing::debug!(
            size = data.len(),
            questions = message.questions.len(),
            answers = message.answers.len(),
            authorities = message.authorities.len(),
            additionals = message.additionals.len(),
            errors = message.errors.len(),
            "decoded DNS buffer"
        );
        message
    }

    /// Builds a message standing in for a buffer that could not be
    /// decoded at all, carrying the reason as its only issue.
    pub fn undecodable(raw: impl Into<String>, error: &Error) -> Self {
        let mut sink = ErrorSink::new();
        sink.record(Stage::Base64, 0, error);
        let mut message = Self::empty(raw);
        message.errors = sink.finish(()).errors;
        message
    }

    /// Returns true if any decode problem was recorded.
    #[inline]
    pub fn is_malformed(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns true if the header carries a response code other than
    /// NOERROR.
    pub fn is_protocol_error(&self) -> bool {
        self.header.as_ref().is_some_and(|header| header.rcode.is_error())
    }

    /// Returns the response code, extended by EDNS when present.
    pub fn rcode(&self) -> Option<Rcode> {
        let header = self.header.as_ref()?;
        Some(match &self.edns0 {
            Some(edns) => edns.full_rcode(header.rcode),
            None => header.rcode,
        })
    }

    /// Returns the first question, if any.
    pub fn question(&self) -> Option<&Question> {
        self.questions.first()
    }

    /// Iterates over answer, authority and additional records in order.
    pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .chain(self.authorities.iter())
            .chain(self.additionals.iter())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Strips whitespace and trailing padding, then decodes standard base64.
fn decode_base64(buf: &str) -> Result<Vec<u8>> {
    let cleaned: String = buf.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    BASE64_NOPAD
        .decode(cleaned.trim_end_matches('=').as_bytes())
        .map_err(|err| Error::invalid_base64(err.to_string()))
}

// =============================================================================
// Section Decoding
// =============================================================================

/// Decodes raw wire bytes into a message with an empty `raw` string.
pub fn decode(data: &[u8], options: DecodeOptions) -> DecodeOutcome<Message> {
    let mut decoder = Decoder {
        data,
        options,
        sink: ErrorSink::new(),
        message: Message::empty(String::new()),
    };
    decoder.run();
    decoder.sink.finish(decoder.message)
}

/// A failure after which the rest of the buffer cannot be trusted.
struct Abort {
    stage: Stage,
    offset: usize,
    error: Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Answer,
    Authority,
    Additional,
}

struct Decoder<'a> {
    data: &'a [u8],
    options: DecodeOptions,
    sink: ErrorSink,
    message: Message,
}

impl Decoder<'_> {
    fn run(&mut self) {
        if self.data.len() < HEADER_SIZE {
            let error = Error::buffer_too_short(HEADER_SIZE, self.data.len());
            self.sink.record(Stage::Header, 0, &error);
            return;
        }

        let mut reader = WireReader::new(self.data);
        let header = match Header::read(&mut reader) {
            Ok(header) => header,
            Err(error) => {
                self.sink.record(Stage::Header, 0, &error);
                return;
            }
        };

        let result = self.sections(&mut reader, &header);
        if self.options.header {
            self.message.header = Some(header);
        }

        match result {
            Ok(()) if !reader.is_empty() => {
                self.sink.push(
                    Stage::End,
                    reader.position(),
                    format!("trailing garbage, buf size = {}", self.data.len()),
                );
            }
            Ok(()) => {}
            Err(abort) => self.sink.record(abort.stage, abort.offset, &abort.error),
        }
    }

    fn sections(&mut self, reader: &mut WireReader<'_>, header: &Header) -> std::result::Result<(), Abort> {
        for _ in 0..header.qdcount {
            let offset = reader.position();
            let question = Question::read(reader).map_err(|error| Abort {
                stage: Stage::Question,
                offset,
                error,
            })?;
            if self.options.questions {
                self.message.questions.push(question);
            }
        }

        self.records(reader, header.ancount, Section::Answer)?;
        self.records(reader, header.nscount, Section::Authority)?;
        self.records(reader, header.arcount, Section::Additional)
    }

    fn records(
        &mut self,
        reader: &mut WireReader<'_>,
        count: u16,
        section: Section,
    ) -> std::result::Result<(), Abort> {
        for _ in 0..count {
            let offset = reader.position();
            let envelope = RecordHeader::read(reader).map_err(|error| Abort {
                stage: Stage::Record,
                offset,
                error,
            })?;
            let rdata_offset = envelope.rdata_offset;

            if section == Section::Additional && envelope.is_opt() && self.options.edns0 {
                let mut rdata = envelope.rdata_reader(self.data);
                match Edns0::decode(envelope.name, envelope.class, envelope.ttl, &mut rdata) {
                    Ok(edns) => self.message.edns0 = Some(edns),
                    Err(error) => self.sink.record(Stage::Record, rdata_offset, &error),
                }
                continue;
            }

            match envelope.into_record(self.data) {
                Ok(record) => self.store(section, record),
                Err(error) => self.sink.record(Stage::Record, rdata_offset, &error),
            }
        }
        Ok(())
    }

    fn store(&mut self, section: Section, record: ResourceRecord) {
        let (keep, list) = match section {
            Section::Answer => (self.options.answers, &mut self.message.answers),
            Section::Authority => (self.options.authorities, &mut self.message.authorities),
            Section::Additional => (self.options.additionals, &mut self.message.additionals),
        };
        if keep {
            list.push(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtype::RecordType;
    use std::net::Ipv4Addr;

    // as250.net. A, one answer 194.150.168.100.
    const AS250: &[u8] = &[
        0x9B, 0x91, 0x84, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x05, b'a', b's', b'2',
        b'5', b'0', 0x03, b'n', b'e', b't', 0x00, 0x00, 0x01, 0x00, 0x01, 0xC0, 0x0C, 0x00, 0x01, 0x00,
        0x01, 0x00, 0x00, 0x0E, 0x10, 0x00, 0x04, 0xC2, 0x96, 0xA8, 0x64,
    ];

    fn wire(data: &[u8]) -> Message {
        Message::from_wire("", data, DecodeOptions::default())
    }

    #[test]
    fn test_decode_simple_answer() {
        let message = wire(AS250);
        assert!(!message.is_malformed(), "{:?}", message.errors);

        let header = message.header.as_ref().unwrap();
        assert_eq!(header.id, 39825);
        assert!(header.is_response());
        assert!(header.is_authoritative());

        assert_eq!(message.question().unwrap().name, "as250.net.");
        assert_eq!(message.answers.len(), 1);
        assert_eq!(message.answers[0].rdata.as_a(), Some(Ipv4Addr::new(194, 150, 168, 100)));
        assert!(message.authorities.is_empty());
        assert!(message.edns0.is_none());
    }

    #[test]
    fn test_short_buffer() {
        let message = wire(&AS250[..5]);
        assert!(message.header.is_none());
        assert_eq!(message.errors.len(), 1);
        assert_eq!(message.errors[0].stage, Stage::Header);
        assert_eq!(message.errors[0].offset, 5);
    }

    #[test]
    fn test_truncated_question_stops() {
        let message = wire(&AS250[..20]);
        assert!(message.header.is_some());
        assert!(message.questions.is_empty());
        assert_eq!(message.errors.len(), 1);
        assert_eq!(message.errors[0].stage, Stage::Question);
    }

    #[test]
    fn test_truncated_record_keeps_question() {
        let message = wire(&AS250[..41]);
        assert_eq!(message.questions.len(), 1);
        assert!(message.answers.is_empty());
        assert_eq!(message.errors.len(), 1);
        assert_eq!(message.errors[0].stage, Stage::Record);
    }

    #[test]
    fn test_trailing_garbage() {
        let mut data = AS250.to_vec();
        data.extend_from_slice(&[0xde, 0xad]);
        let message = wire(&data);

        assert_eq!(message.answers.len(), 1);
        assert_eq!(message.errors.len(), 1);
        let issue = &message.errors[0];
        assert_eq!(issue.stage, Stage::End);
        assert_eq!(issue.offset, AS250.len());
        assert_eq!(issue.message, format!("trailing garbage, buf size = {}", data.len()));
    }

    #[test]
    fn test_bad_rdata_skips_one_record() {
        // Two answers: an A record with a 3-byte RDATA, then a valid one.
        let mut data = AS250.to_vec();
        data[7] = 2;
        data[38] = 3;
        data.truncate(42);
        data.extend_from_slice(&AS250[27..]);

        let message = wire(&data);
        assert_eq!(message.answers.len(), 1);
        assert_eq!(message.errors.len(), 1);
        assert_eq!(message.errors[0].stage, Stage::Record);
        assert_eq!(message.errors[0].offset, 39);
    }

    #[test]
    fn test_disabled_sections_are_walked() {
        let options = DecodeOptions {
            questions: false,
            ..DecodeOptions::default()
        };
        let message = Message::from_wire("", AS250, options);
        assert!(message.questions.is_empty());
        assert_eq!(message.answers.len(), 1);
        assert!(!message.is_malformed());

        let message = Message::from_wire("", AS250, DecodeOptions::HEADER_ONLY);
        assert!(message.header.is_some());
        assert!(message.answers.is_empty());
        assert!(!message.is_malformed());
    }

    #[test]
    fn test_opt_diverted_from_additional() {
        // Query for "." NS with an OPT record carrying an empty NSID.
        let data = [
            0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x02, 0x00,
            0x01, 0x00, 0x00, 0x29, 0x02, 0x00, 0x00, 0x00, 0x80, 0x00, 0x00, 0x04, 0x00, 0x03, 0x00, 0x00,
        ];

        let message = wire(&data);
        assert!(!message.is_malformed(), "{:?}", message.errors);
        assert!(message.additionals.is_empty());
        let edns = message.edns0.as_ref().unwrap();
        assert_eq!(edns.udp_size, 512);
        assert!(edns.dnssec_ok);
        assert_eq!(edns.nsid().unwrap().nsid.as_deref(), Some(""));

        let options = DecodeOptions {
            edns0: false,
            ..DecodeOptions::default()
        };
        let message = Message::from_wire("", &data, options);
        assert!(message.edns0.is_none());
        assert_eq!(message.additionals.len(), 1);
        assert!(message.additionals[0].rtype.is(RecordType::OPT));
        assert!(message.additionals[0].rdata.as_unknown().is_some());
    }

    #[test]
    fn test_parse_base64() {
        let message = Message::parse("m5GEAAABAAEAAAAABWFzMjUwA25ldAAAAQABwAwAAQABAAAOEAAEwpaoZA==").unwrap();
        assert_eq!(message.answers.len(), 1);
        assert_eq!(
            message.to_string(),
            "m5GEAAABAAEAAAAABWFzMjUwA25ldAAAAQABwAwAAQABAAAOEAAEwpaoZA=="
        );

        let unpadded = Message::parse("m5GEAAABAAEAAAAABWFzMjUwA25ldAAAAQABwAwAAQABAAAOEAAEwpaoZA\n").unwrap();
        assert_eq!(unpadded.answers, message.answers);
    }

    #[test]
    fn test_invalid_base64() {
        let err = Message::parse("not base64!").unwrap_err();
        assert!(matches!(err, Error::InvalidBase64 { .. }));
        assert!(matches!(Message::parse("m5GE=AABAAE"), Err(Error::InvalidBase64 { .. })));

        let message = Message::undecodable("not base64!", &err);
        assert!(message.is_malformed());
        assert_eq!(message.errors[0].stage, Stage::Base64);
        assert_eq!(message.to_string(), "not base64!");
    }
}
