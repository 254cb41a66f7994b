//! # Sagan DNS Buffer Decoder
//!
//! Decodes the `abuf` and `qbuf` strings found in RIPE Atlas DNS results:
//! base64-encoded DNS messages exactly as the probe sent or received them.
//!
//! ## Features
//!
//! - **RFC 1035 messages** with name decompression and a pointer jump limit
//! - **EDNS0 support** (RFC 6891), including the NSID option
//! - **DNSSEC record types** (DS, DNSKEY, RRSIG, NSEC, NSEC3, NSEC3PARAM)
//! - **Best-effort decoding**: a truncated or corrupt buffer yields a partial
//!   message plus a list of [`DecodeIssue`]s instead of an error
//! - **Legacy backfill** for results that carry flat fields and no buffer
//!
//! ## Example
//!
//! ```rust
//! use sagan_proto::Message;
//!
//! let message = Message::parse("m5GEAAABAAEAAAAABWFzMjUwA25ldAAAAQABwAwAAQABAAAOEAAEwpaoZA==")?;
//! assert_eq!(message.header.as_ref().map(|h| h.id), Some(39825));
//! assert_eq!(message.answers[0].rdata.to_string(), "194.150.168.100");
//! assert!(!message.is_malformed());
//! # Ok::<(), sagan_proto::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::upper_case_acronyms)]

pub mod backfill;
pub mod class;
pub mod edns;
pub mod error;
pub mod header;
pub mod issue;
pub mod lookup;
pub mod message;
pub mod name;
pub mod opcode;
pub mod options;
pub mod question;
pub mod rcode;
pub mod rdata;
pub mod record;
pub mod rtype;
pub mod wire;

// Re-exports for convenience
pub use backfill::{BackfillSource, LegacyAnswer};
pub use class::{Class, RecordClass};
pub use edns::{Edns0, EdnsOption};
pub use error::{Error, Result};
pub use header::{Header, HeaderFlags};
pub use issue::{DecodeIssue, DecodeOutcome, ErrorSink, Stage};
pub use lookup::Code;
pub use message::Message;
pub use name::NameDecoder;
pub use opcode::{OpCode, Opcode};
pub use options::DecodeOptions;
pub use question::Question;
pub use rcode::{Rcode, ResponseCode};
pub use rdata::RData;
pub use record::ResourceRecord;
pub use rtype::{RecordType, Type};
pub use wire::WireReader;

/// Maximum number of compression pointers followed while decoding one name.
pub use name::MAX_POINTER_JUMPS;
