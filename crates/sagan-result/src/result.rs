//! The DNS measurement result envelope.

use crate::action::{ParseOptions, Status};
use crate::error::{ResultError, Result};
use crate::fields;
use crate::response::{BufKind, Response, ResponseDefaults};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Keys every measurement result carries.
const REQUIRED_KEYS: [&str; 5] = ["timestamp", "msm_id", "prb_id", "fw", "type"];

/// Firmware versions before this one reported the address family as `pf`.
const PF_FIRMWARE_LIMIT: i64 = 4460;

/// A DNS measurement result: the envelope plus one or more responses.
#[derive(Debug, Serialize)]
pub struct DnsResult {
    /// When the measurement ran.
    pub created: DateTime<Utc>,

    /// Measurement ID (`msm_id`).
    pub measurement_id: Option<u64>,

    /// Probe ID (`prb_id`).
    pub probe_id: Option<u64>,

    /// Probe firmware version (`fw`).
    pub firmware: Option<i64>,

    /// Public address of the probe (`from`).
    pub origin: Option<String>,

    /// Seconds since the probe last synced its clock (`lts`).
    pub seconds_since_sync: Option<u64>,

    /// Group ID.
    pub group_id: Option<u64>,

    /// Bundle ID.
    pub bundle: Option<u64>,

    /// Responses: the single `result` first, then the `resultset` entries.
    pub responses: Vec<Response>,

    /// Number of responses the probe intended to send (`submax`).
    pub responses_total: Option<u64>,

    /// Problems reported by the envelope.
    #[serde(flatten)]
    pub status: Status,
}

impl DnsResult {
    /// Parses a result from its JSON text.
    ///
    /// # Errors
    ///
    /// Fails if the text is not JSON, is not a DNS measurement result, or an
    /// action is [`Action::Fail`](crate::Action::Fail) and a problem is found.
    pub fn from_json(json: &str, options: ParseOptions) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?, options)
    }

    /// Builds a result from parsed JSON.
    ///
    /// # Errors
    ///
    /// See [`DnsResult::from_json`].
    pub fn from_value(raw: Value, options: ParseOptions) -> Result<Self> {
        if let Some(missing) = REQUIRED_KEYS.iter().find(|key| raw.get(**key).is_none()) {
            return Err(ResultError::NotAMeasurement(format!("missing key {missing:?}")));
        }

        let kind = raw
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ResultError::NotAMeasurement("type is not a string".to_string()))?;
        if !kind.eq_ignore_ascii_case("dns") {
            return Err(ResultError::WrongType(kind.to_string()));
        }

        let created = fields::int(raw.get("timestamp"))
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            .ok_or_else(|| ResultError::NotAMeasurement("timestamp is not a unix time".to_string()))?;

        let mut status = Status::default();
        let firmware = fields::int(raw.get("fw"));

        if firmware == Some(0) {
            status.malformation(options.on_malformation, "Unknown firmware: 0")?;
        }

        for key in ["dnserr", "err"] {
            if let Some(text) = fields::text(raw.get(key)) {
                status.error(options.on_error, text)?;
            }
        }

        let mut defaults = ResponseDefaults {
            af: fields::uint(raw.get("af")),
            destination_address: fields::text(raw.get("dst_addr")),
            source_address: fields::text(raw.get("src_addr")),
            protocol: fields::text(raw.get("proto")),
        };
        if firmware.is_some_and(|fw| (1..PF_FIRMWARE_LIMIT).contains(&fw)) {
            defaults.af = fields::uint(raw.get("pf"));
        }

        let mut responses = Vec::new();
        if let Some(single) = raw.get("result") {
            let mut single = single.clone();
            // Some firmware put the single result's buffers on the envelope.
            if let Some(object) = single.as_object_mut() {
                for key in [BufKind::Answer.key(), BufKind::Query.key()] {
                    if let Some(buf) = raw.get(key) {
                        object.entry(key).or_insert_with(|| buf.clone());
                    }
                }
            }
            responses.push(Response::from_value(single, &defaults, false, options)?);
        }
        if let Some(set) = raw.get("resultset").and_then(Value::as_array) {
            for entry in set {
                responses.push(Response::from_value(entry.clone(), &defaults, true, options)?);
            }
        }

        if let Some(error) = raw.get("error") {
            status.error(options.on_error, describe_error(error))?;
        }

        tracing::debug!(
            msm_id = ?fields::int(raw.get("msm_id")),
            prb_id = ?fields::int(raw.get("prb_id")),
            responses = responses.len(),
            "parsed dns result"
        );

        Ok(Self {
            created,
            measurement_id: fields::uint(raw.get("msm_id")),
            probe_id: fields::uint(raw.get("prb_id")),
            firmware,
            origin: fields::text(raw.get("from")),
            seconds_since_sync: fields::uint(raw.get("lts")),
            group_id: fields::uint(raw.get("group_id")),
            bundle: fields::uint(raw.get("bundle")),
            responses_total: fields::uint(fields::nested(&raw, "submax")),
            responses,
            status,
        })
    }

    /// Returns the measurement type, always `"dns"`.
    #[inline]
    pub const fn kind(&self) -> &'static str {
        "dns"
    }

    /// Returns `created` as seconds since the epoch.
    #[inline]
    pub fn created_timestamp(&self) -> i64 {
        self.created.timestamp()
    }

    /// Returns true if the envelope or any response reports an error.
    pub fn is_error(&self) -> bool {
        self.status.is_error || self.responses.iter().any(Response::is_error)
    }

    /// Returns true if the envelope or any response is malformed.
    pub fn is_malformed(&self) -> bool {
        self.status.is_malformed || self.responses.iter().any(Response::is_malformed)
    }
}

impl fmt::Display for DnsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = |value: Option<u64>| value.map_or_else(|| "?".to_string(), |v| v.to_string());
        write!(f, "Measurement #{}, Probe #{}", id(self.measurement_id), id(self.probe_id))
    }
}

fn describe_error(error: &Value) -> String {
    match error {
        Value::Object(map) => {
            if let Some(timeout) = map.get("timeout") {
                format!("Timeout: {}", plain(timeout))
            } else if let Some(message) = map.get("getaddrinfo") {
                format!("Name resolution error: {}", plain(message))
            } else {
                format!("Unknown error: {error}")
            }
        }
        other => format!("Unknown error: {}", plain(other)),
    }
}

/// Renders strings without their JSON quotes.
fn plain(value: &Value) -> String {
    value.as_str().map_or_else(|| value.to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use serde_json::json;

    fn envelope() -> Value {
        json!({"timestamp": 1_347_765_990, "msm_id": 1, "prb_id": 2, "fw": 4700, "type": "dns"})
    }

    fn quiet() -> ParseOptions {
        ParseOptions {
            on_error: Action::Ignore,
            on_malformation: Action::Ignore,
            ..ParseOptions::default()
        }
    }

    fn with(mut value: Value, key: &str, field: Value) -> Value {
        value[key] = field;
        value
    }

    #[test]
    fn test_missing_key() {
        let mut value = envelope();
        value.as_object_mut().unwrap().remove("prb_id");
        let err = DnsResult::from_value(value, quiet()).unwrap_err();
        assert!(matches!(err, ResultError::NotAMeasurement(ref text) if text.contains("prb_id")));
    }

    #[test]
    fn test_wrong_type() {
        let err = DnsResult::from_value(with(envelope(), "type", json!("ping")), quiet()).unwrap_err();
        assert!(matches!(err, ResultError::WrongType(ref kind) if kind == "ping"));

        assert!(DnsResult::from_value(with(envelope(), "type", json!("DNS")), quiet()).is_ok());
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(DnsResult::from_json("{", quiet()), Err(ResultError::Json(_))));
    }

    #[test]
    fn test_envelope_fields() {
        let value = with(with(envelope(), "from", json!("192.0.2.7")), "lts", json!(-1));
        let result = DnsResult::from_value(value, quiet()).unwrap();

        assert_eq!(result.created.to_rfc3339(), "2012-09-16T03:26:30+00:00");
        assert_eq!(result.created_timestamp(), 1_347_765_990);
        assert_eq!(result.measurement_id, Some(1));
        assert_eq!(result.probe_id, Some(2));
        assert_eq!(result.firmware, Some(4700));
        assert_eq!(result.origin.as_deref(), Some("192.0.2.7"));
        assert_eq!(result.seconds_since_sync, None);
        assert!(result.responses.is_empty());
        assert_eq!(result.to_string(), "Measurement #1, Probe #2");
        assert_eq!(result.kind(), "dns");
    }

    #[test]
    fn test_firmware_zero_is_malformed() {
        let result = DnsResult::from_value(with(envelope(), "fw", json!(0)), quiet()).unwrap();
        assert!(result.status.is_malformed);

        let strict = ParseOptions::strict();
        let err = DnsResult::from_value(with(envelope(), "fw", json!(0)), strict).unwrap_err();
        assert_eq!(err.to_string(), "Unknown firmware: 0");
    }

    #[test]
    fn test_dnserr_and_err() {
        let result = DnsResult::from_value(with(envelope(), "dnserr", json!("connect: refused")), quiet()).unwrap();
        assert!(result.is_error());
        assert_eq!(result.status.error_message.as_deref(), Some("connect: refused"));

        let result = DnsResult::from_value(with(envelope(), "err", json!("send failed")), quiet()).unwrap();
        assert_eq!(result.status.error_message.as_deref(), Some("send failed"));
    }

    #[test]
    fn test_error_object() {
        let cases = [
            (json!({"timeout": 5000}), "Timeout: 5000"),
            (json!({"getaddrinfo": "Name or service not known"}), "Name resolution error: Name or service not known"),
            (json!({"socket": "busy"}), "Unknown error: {\"socket\":\"busy\"}"),
            (json!("boom"), "Unknown error: boom"),
        ];
        for (error, expected) in cases {
            let result = DnsResult::from_value(with(envelope(), "error", error), quiet()).unwrap();
            assert_eq!(result.status.error_message.as_deref(), Some(expected));
        }

        let err = DnsResult::from_value(with(envelope(), "error", json!({"timeout": 1})), ParseOptions::strict())
            .unwrap_err();
        assert!(err.is_measurement_error());
    }

    #[test]
    fn test_af_from_pf_on_old_firmware() {
        let value = with(with(with(envelope(), "fw", json!(4450)), "pf", json!(6)), "af", json!(4));
        let value = with(value, "result", json!({"rt": 1}));
        let result = DnsResult::from_value(value, quiet()).unwrap();
        assert_eq!(result.responses[0].af, Some(6));

        let value = with(with(with(envelope(), "fw", json!(4460)), "pf", json!(6)), "af", json!(4));
        let value = with(value, "result", json!({"rt": 1}));
        let result = DnsResult::from_value(value, quiet()).unwrap();
        assert_eq!(result.responses[0].af, Some(4));
    }

    #[test]
    fn test_single_result_and_set() {
        let value = with(
            with(envelope(), "result", json!({"rt": 1, "submax": 3, "subid": 9})),
            "resultset",
            json!([{"subid": 1, "af": 6}, {"subid": 2}]),
        );
        let value = with(value, "af", json!(4));
        let result = DnsResult::from_value(value, quiet()).unwrap();

        assert_eq!(result.responses.len(), 3);
        assert_eq!(result.responses_total, Some(3));
        assert_eq!(result.responses[0].response_id, None);
        assert_eq!(result.responses[1].response_id, Some(1));
        assert_eq!(result.responses[1].af, Some(6));
        assert_eq!(result.responses[2].response_id, Some(2));
        assert_eq!(result.responses[2].af, Some(4));
    }

    #[test]
    fn test_envelope_buffer_falls_back_to_single_result() {
        let qbuf = "CcsAAAABAAAAAAABBHJpcGUDbmV0AAAcAAEAACkCAAAAgAAAAAAAAAA=";
        let value = with(with(envelope(), "result", json!({"rt": 1})), "qbuf", json!(qbuf));
        let result = DnsResult::from_value(value, quiet()).unwrap();

        let message = result.responses[0].qbuf().unwrap().unwrap();
        assert_eq!(message.header.as_ref().unwrap().id, 0x09cb);
        assert!(result.responses[0].abuf().unwrap().is_none());
        assert!(result.responses[0].raw().get("qbuf").is_some());
    }
}
