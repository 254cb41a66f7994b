//! # Sagan DNS Results
//!
//! Reads RIPE Atlas DNS measurement results: the JSON envelope, its
//! responses, and the `abuf`/`qbuf` buffers inside them. Buffers are decoded
//! with [`sagan_proto`] on first access.
//!
//! Problems come in two kinds, each with its own [`Action`]:
//!
//! - **errors** the measurement itself reports (`err`, `dnserr`, `error`,
//!   or a non-NOERROR response code), and
//! - **malformations**, input that is not in the expected shape (unknown
//!   firmware, unknown protocol, buffers that do not decode cleanly).
//!
//! ## Example
//!
//! ```rust
//! use sagan_result::{DnsResult, ParseOptions};
//!
//! let json = r#"{"fw": 4610, "msm_id": 1004041, "prb_id": 714, "timestamp": 1395856407,
//!     "type": "dns", "af": 4, "proto": "UDP",
//!     "result": {"abuf": "PdCEAAABAAEAAAAABWFzMjUwA25ldAAAAQABwAwAAQABAAAOEAAEwpaooA==", "rt": 81.718}}"#;
//!
//! let result = DnsResult::from_json(json, ParseOptions::default())?;
//! let abuf = result.responses[0].abuf()?.expect("result has an abuf");
//! assert_eq!(abuf.answers[0].rdata.to_string(), "194.150.168.160");
//! # Ok::<(), sagan_result::ResultError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod error;
mod fields;
pub mod response;
pub mod result;

pub use action::{Action, ParseOptions, Status};
pub use error::{Result, ResultError};
pub use response::{BufKind, Protocol, Response, ResponseDefaults};
pub use result::DnsResult;
