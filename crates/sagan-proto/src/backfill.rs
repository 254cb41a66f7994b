//! Messages rebuilt from flat result fields.
//!
//! Old firmware did not always ship a raw buffer. What it did ship is a
//! handful of header counts and an `answers` list with upper-case keys.
//! [`Message::backfill`] turns those into a [`Message`] so callers see the
//! same shape either way.

use crate::header::Header;
use crate::issue::{DecodeIssue, Stage};
use crate::message::Message;
use crate::rdata::{Legacy, RData};
use crate::record::ResourceRecord;
use crate::rtype::{RecordType, Type};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use smallvec::SmallVec;

/// Field readers that treat a value of the wrong kind as absent.
///
/// Probe firmware has shipped numbers as strings, so numeric strings are
/// accepted too.
mod lenient {
    use super::*;
    use std::str::FromStr;

    pub(super) fn number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u64> + FromStr,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(number) => number.as_u64().and_then(|n| T::try_from(n).ok()),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        })
    }

    pub(super) fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => Some(text),
            _ => None,
        })
    }

    /// An unknown mnemonic is kept as [`Type::NONE`](crate::rtype::RecordType::NONE).
    pub(super) fn rtype<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Type>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            value => Some(Type::deserialize(value).unwrap_or_else(|_| Type::from_u16(0))),
        })
    }

    pub(super) fn rdata<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<LegacyText>, D::Error> {
        Ok(LegacyText::deserialize(Value::deserialize(deserializer)?).ok())
    }

    /// Entries that are not objects are dropped.
    pub(super) fn answers<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<LegacyAnswer>>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(list) => Some(
                list.into_iter()
                    .filter_map(|entry| LegacyAnswer::deserialize(entry).ok())
                    .collect(),
            ),
            _ => None,
        })
    }
}

/// RDATA as printed by the probe: one string or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LegacyText {
    /// A single string.
    One(String),
    /// Several strings.
    Many(Vec<String>),
}

impl LegacyText {
    fn into_strings(self) -> SmallVec<[String; 1]> {
        match self {
            Self::One(text) => SmallVec::from_elem(text, 1),
            Self::Many(list) => list.into_iter().collect(),
        }
    }
}

/// One entry of a result's `answers` list.
///
/// Keys follow the result format: `TTL`, `TYPE`, `NAME`, `RDATA`, `MNAME`,
/// `RNAME`, `SERIAL` and `RDLENGTH`. A value of the wrong kind reads as
/// absent; a `TYPE` that names no known type reads as `NONE`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE", default)]
#[allow(missing_docs)]
pub struct LegacyAnswer {
    #[serde(deserialize_with = "lenient::number")]
    pub ttl: Option<u32>,
    #[serde(rename = "TYPE", deserialize_with = "lenient::rtype")]
    pub rtype: Option<Type>,
    #[serde(deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::rdata")]
    pub rdata: Option<LegacyText>,
    #[serde(deserialize_with = "lenient::string")]
    pub mname: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub rname: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub serial: Option<u32>,
    #[serde(deserialize_with = "lenient::number")]
    pub rdlength: Option<u16>,
}

impl LegacyAnswer {
    /// Returns true if none of the known keys was present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn into_record(self) -> ResourceRecord {
        let data = self.rdata.map(LegacyText::into_strings).unwrap_or_default();
        let legacy = Legacy::new(data).with_soa(self.mname, self.rname, self.serial);
        ResourceRecord {
            name: self.name.unwrap_or_default(),
            rtype: self.rtype.unwrap_or_else(|| Type::from_u16(0)),
            class: None,
            ttl: self.ttl,
            rdlength: self.rdlength,
            rdata: RData::Legacy(legacy),
        }
    }
}

/// The flat fields a message can be rebuilt from.
///
/// Unknown keys are ignored, so a whole response object deserializes. Each
/// field is read on its own, so one bad value does not lose the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct BackfillSource {
    #[serde(rename = "ID", deserialize_with = "lenient::number")]
    pub id: Option<u16>,
    #[serde(rename = "QDCOUNT", deserialize_with = "lenient::number")]
    pub qdcount: Option<u16>,
    #[serde(rename = "ANCOUNT", deserialize_with = "lenient::number")]
    pub ancount: Option<u16>,
    #[serde(rename = "NSCOUNT", deserialize_with = "lenient::number")]
    pub nscount: Option<u16>,
    #[serde(rename = "ARCOUNT", deserialize_with = "lenient::number")]
    pub arcount: Option<u16>,
    #[serde(deserialize_with = "lenient::answers")]
    pub answers: Option<Vec<LegacyAnswer>>,
}

impl BackfillSource {
    /// Reads the fields out of a response JSON object.
    ///
    /// # Errors
    ///
    /// Fails only if `value` is not a JSON object.
    pub fn from_value(value: &serde_json::Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }

    fn has_header(&self) -> bool {
        self.id.is_some()
            || self.qdcount.is_some()
            || self.ancount.is_some()
            || self.nscount.is_some()
            || self.arcount.is_some()
    }
}

impl Message {
    /// Builds a message from flat result fields instead of a buffer.
    ///
    /// The header has every flag clear, opcode QUERY and rcode NOERROR;
    /// missing counts are 0. It is left out entirely when none of the
    /// header keys was present. Answers without any known key are skipped.
    /// An answer without a usable `TYPE` is kept as `NONE` and recorded as
    /// an issue; there is no buffer, so the issue offset is the answer's
    /// index.
    pub fn backfill(raw: impl Into<String>, source: &BackfillSource) -> Self {
        let mut message = Self::empty(raw);

        if source.has_header() {
            message.header = Some(Header::from_counts(
                source.id.unwrap_or(0),
                source.qdcount.unwrap_or(0),
                source.ancount.unwrap_or(0),
                source.nscount.unwrap_or(0),
                source.arcount.unwrap_or(0),
            ));
        }

        message.answers = source
            .answers
            .iter()
            .flatten()
            .filter(|answer| !answer.is_empty())
            .cloned()
            .map(LegacyAnswer::into_record)
            .collect();

        for (index, answer) in message.answers.iter().enumerate() {
            if answer.rtype.is(RecordType::NONE) {
                message.errors.push(DecodeIssue::new(
                    Stage::Record,
                    index,
                    format!("answer #{} has no parseable Type", index + 1),
                ));
            }
        }

        tracing::debug!(answers = message.answers.len(), "backfilled message from result fields");
        message
    }
}
