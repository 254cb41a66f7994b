//! Parsing of complete DNS measurement results as published by RIPE Atlas.

use rstest::rstest;
use sagan_proto::{RecordClass, RecordType, ResponseCode, Stage};
use sagan_result::{Action, DnsResult, ParseOptions, Protocol, ResultError};

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/data/{name}.json", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("cannot read {path}: {err}"))
}

fn parse(name: &str) -> DnsResult {
    DnsResult::from_json(&fixture(name), ParseOptions::default()).unwrap_or_else(|err| panic!("{name}: {err}"))
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("value is present");
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

#[rstest]
#[case("dns_4460", "2012-09-16T03:26:30+00:00")]
#[case("dns_4610", "2014-03-26T17:53:27+00:00")]
#[case("resultset", "2014-03-26T00:03:23+00:00")]
#[case("qbuf_resultset", "2014-05-21T09:45:23+00:00")]
fn test_created(#[case] name: &str, #[case] expected: &str) {
    let result = parse(name);
    assert_eq!(result.created.to_rfc3339(), expected);
    assert_eq!(result.kind(), "dns");
}

#[rstest]
#[case("dns_4460")]
#[case("dns_4610")]
#[case("dns_lts")]
#[case("edns0")]
#[case("flags")]
#[case("resultset")]
#[case("qbuf_resultset")]
#[case("string_fw_text")]
#[case("txt_class_in")]
fn test_clean_results_pass_strict(#[case] name: &str) {
    let result = DnsResult::from_json(&fixture(name), ParseOptions::strict()).unwrap();
    for response in &result.responses {
        response.abuf().unwrap();
        response.qbuf().unwrap();
    }
    assert!(!result.is_error(), "{name}");
    assert!(!result.is_malformed(), "{name}");
}

#[test]
fn test_firmware_4460() {
    let result = parse("dns_4460");
    assert_eq!(result.measurement_id, Some(1_004_041));
    assert_eq!(result.probe_id, Some(184));
    assert_eq!(result.firmware, Some(4460));
    assert_eq!(result.origin.as_deref(), Some("217.172.81.146"));
    assert_eq!(result.seconds_since_sync, None);
    assert_eq!(result.responses.len(), 1);

    let response = &result.responses[0];
    assert_eq!(response.af, Some(4));
    assert_eq!(response.destination_address.as_deref(), Some("193.227.234.53"));
    assert_eq!(response.source_address, None);
    assert_eq!(response.protocol, Some(Protocol::Udp));
    assert_close(response.response_time, 45.305);
    assert_eq!(response.response_size, Some(43));
    assert_eq!(response.response_id, None);

    let abuf = response.abuf().unwrap().unwrap();
    assert_eq!(abuf.header.as_ref().unwrap().id, 39825);
    let answer = &abuf.answers[0];
    assert_eq!(answer.name, "as250.net.");
    assert!(answer.rtype.is(RecordType::A));
    assert_eq!(answer.ttl, Some(3600));
    assert_eq!(answer.rdlength, Some(4));
    assert_eq!(answer.rdata.to_string(), "194.150.168.100");
}

#[test]
fn test_firmware_4610() {
    let result = parse("dns_4610");
    assert_eq!(result.probe_id, Some(714));
    assert_eq!(result.to_string(), "Measurement #1004041, Probe #714");

    let response = &result.responses[0];
    assert_eq!(response.source_address.as_deref(), Some("192.168.0.100"));
    assert_close(response.response_time, 81.718);

    let abuf = response.abuf().unwrap().unwrap();
    assert_eq!(abuf.header.as_ref().unwrap().id, 15824);
    assert_eq!(abuf.answers[0].rdata.to_string(), "194.150.168.160");
}

#[test]
fn test_seconds_since_sync() {
    assert_eq!(parse("dns_lts").seconds_since_sync, Some(161));
    assert_eq!(parse("qbuf_single").seconds_since_sync, Some(30));
}

#[test]
fn test_string_firmware() {
    let result = parse("string_fw_text");
    assert_eq!(result.firmware, Some(4560));
    assert_eq!(result.responses_total, None);

    let abuf = result.responses[0].abuf().unwrap().unwrap();
    assert_eq!(abuf.question().unwrap().name, "baseline.ripe67.nlnetlabs.nl.");
}

#[test]
fn test_resultset() {
    let result = parse("resultset");
    assert_eq!(result.responses.len(), 3);
    assert_eq!(result.responses_total, None);

    let expected = [
        (1, "192.168.1.1", 2.994, 290, 19506),
        (2, "109.69.8.34", 76.292, 1137, 25432),
        (3, "8.8.8.8", 79.971, 225, 34160),
    ];
    for (response, (subid, dst, rt, size, id)) in result.responses.iter().zip(expected) {
        assert_eq!(response.response_id, Some(subid));
        assert_eq!(response.af, Some(4));
        assert_eq!(response.source_address.as_deref(), Some("192.168.1.2"));
        assert_eq!(response.destination_address.as_deref(), Some(dst));
        assert_eq!(response.protocol, Some(Protocol::Udp));
        assert_close(response.response_time, rt);
        assert_eq!(response.response_size, Some(size));

        let abuf = response.abuf().unwrap().unwrap();
        assert_eq!(abuf.header.as_ref().unwrap().id, id);
        assert_eq!(abuf.question().unwrap().name, "www.ripe.net.");
    }
}

#[test]
fn test_query_buffers_in_resultset() {
    let result = parse("qbuf_resultset");
    assert_eq!(result.group_id, Some(1_666_151));
    assert_eq!(result.responses.len(), 2);

    for (response, dst) in result.responses.iter().zip(["8.8.8.8", "8.8.4.4"]) {
        assert_eq!(response.protocol, Some(Protocol::Tcp));
        assert_eq!(response.source_address.as_deref(), Some("10.0.5.101"));
        assert_eq!(response.destination_address.as_deref(), Some(dst));
        assert!(response.abuf().unwrap().is_none());
    }

    let qbuf = result.responses[0].qbuf().unwrap().unwrap();
    let header = qbuf.header.as_ref().unwrap();
    assert_eq!(header.id, 30121);
    assert!(header.recursion_desired());
    assert!(header.recursion_available());
    assert_eq!(qbuf.question().unwrap().name, "15112.1400665523.www.twitter.com.");

    let edns = qbuf.edns0.as_ref().unwrap();
    assert_eq!(edns.udp_size, 512);
    let nsid = edns.nsid().unwrap();
    assert_eq!(nsid.length, 0);
    assert_eq!(nsid.nsid.as_deref(), Some(""));
}

#[test]
fn test_query_buffer_on_envelope() {
    let result = parse("qbuf_single");
    let response = &result.responses[0];
    assert_eq!(response.af, Some(6));

    let qbuf = response.qbuf().unwrap().unwrap();
    assert_eq!(qbuf.header.as_ref().unwrap().id, 2507);
    let question = qbuf.question().unwrap();
    assert_eq!(question.name, "ripe.net.");
    assert!(question.qtype.is(RecordType::AAAA));
    assert!(qbuf.edns0.as_ref().unwrap().dnssec_ok);

    let abuf = response.abuf().unwrap().unwrap();
    assert_eq!(abuf.answers.len(), 2);
    assert_eq!(abuf.answers[0].rdata.to_string(), "2001:67c:2e8:22:0:0:c100:68b");
    assert!(abuf.answers[1].rtype.is(RecordType::RRSIG));
    assert!(!abuf.is_malformed());
}

#[test]
fn test_envelope_query_buffer_has_trailing_bytes() {
    let result = parse("qbuf_single");
    let qbuf = result.responses[0].qbuf().unwrap().unwrap();

    assert_eq!(qbuf.errors.len(), 1);
    assert_eq!(qbuf.errors[0].stage, Stage::End);
    assert_eq!(qbuf.errors[0].offset, 37);
    assert!(qbuf.errors[0].message.contains("trailing garbage, buf size = 41"));
    assert!(result.is_malformed());

    let strict = DnsResult::from_json(&fixture("qbuf_single"), ParseOptions::strict()).unwrap();
    assert!(matches!(
        strict.responses[0].qbuf(),
        Err(ResultError::Malformed(ref text)) if text.starts_with("end at offset 37")
    ));
}

#[test]
fn test_edns0_nsid() {
    let result = parse("edns0");
    let abuf = result.responses[0].abuf().unwrap().unwrap();

    let edns = abuf.edns0.as_ref().unwrap();
    assert_eq!(edns.udp_size, 4096);
    let nsid = edns.nsid().unwrap();
    assert_eq!(nsid.length, 20);
    assert_eq!(nsid.nsid.as_deref(), Some("k3.ams-ix.k.ripe.net"));
}

#[test]
fn test_header_flags() {
    let result = parse("flags");
    let abuf = result.responses[0].abuf().unwrap().unwrap();
    let header = abuf.header.as_ref().unwrap();

    assert!(header.is_response());
    assert!(header.is_authoritative());
    assert!(!header.is_truncated());
    assert!(!header.recursion_desired());
    assert!(!header.recursion_available());
    assert_eq!(
        (header.qdcount, header.ancount, header.nscount, header.arcount),
        (1, 1, 2, 3)
    );
}

#[test]
fn test_error_propagation() {
    let result = parse("error_propagation");
    let response = &result.responses[0];

    // Errors inside a buffer are only known once it is decoded.
    assert!(!response.is_error());
    let abuf = response.abuf().unwrap().unwrap();
    assert!(abuf.rcode().is_some_and(|rcode| rcode.is(ResponseCode::NotImp)));
    assert!(response.is_error());
    assert!(result.is_error());
    assert_eq!(response.error_message().as_deref(), Some("Protocol error: NOTIMP"));
    assert!(!response.is_malformed());

    let strict = DnsResult::from_json(&fixture("error_propagation"), ParseOptions::strict()).unwrap();
    let err = strict.responses[0].abuf().unwrap_err();
    assert!(matches!(err, ResultError::Error(ref text) if text == "Protocol error: NOTIMP"));
}

#[test]
fn test_txt_answer_in_chaos_query() {
    let result = parse("txt_class_in");
    let abuf = result.responses[0].abuf().unwrap().unwrap();

    let question = abuf.question().unwrap();
    assert_eq!(question.name, "version.bind.");
    assert!(question.qtype.is(RecordType::TXT));
    assert!(question.qclass.is(RecordClass::CH));

    let answer = &abuf.answers[0];
    assert_eq!(answer.class.map(|class| class.is(RecordClass::IN)), Some(true));
    assert_eq!(answer.rdata.to_string(), "PowerDNS Recursor 3.5.2 $Id$");
}

#[test]
fn test_backfill_from_result_fields() {
    let options = ParseOptions {
        parse_buf: false,
        ..ParseOptions::default()
    };

    let result = DnsResult::from_json(&fixture("txt_class_in"), options).unwrap();
    let abuf = result.responses[0].abuf().unwrap().unwrap();
    assert_eq!(abuf.header.as_ref().unwrap().id, 40432);
    assert!(abuf.questions.is_empty());
    let answer = &abuf.answers[0];
    assert_eq!(answer.name, "version.bind");
    assert!(answer.rtype.is(RecordType::TXT));
    assert_eq!(answer.rdata.to_string(), "PowerDNS Recursor 3.5.2 $Id$");

    let result = DnsResult::from_json(&fixture("edns0"), options).unwrap();
    let abuf = result.responses[0].abuf().unwrap().unwrap();
    let header = abuf.header.as_ref().unwrap();
    assert_eq!((header.id, header.nscount, header.arcount), (43, 13, 24));
    assert!(abuf.edns0.is_none());
    assert!(abuf.answers[0].rtype.is(RecordType::SOA));
    assert!(!result.is_malformed());
}

#[test]
fn test_truncated_buffer_is_malformed() {
    let mut value: serde_json::Value = serde_json::from_str(&fixture("dns_4610")).unwrap();
    value["result"]["abuf"] = serde_json::json!("PdCEAAABAAEAAAAABWFzMjUwA25ldAAAAQABwAwAAQAB");

    let options = ParseOptions {
        on_malformation: Action::Ignore,
        ..ParseOptions::default()
    };
    let result = DnsResult::from_value(value.clone(), options).unwrap();
    let abuf = result.responses[0].abuf().unwrap().unwrap();
    assert!(abuf.answers.is_empty());
    assert_eq!(abuf.errors.len(), 1);
    assert!(result.is_malformed());

    let strict = DnsResult::from_value(value, ParseOptions::strict()).unwrap();
    assert!(matches!(strict.responses[0].abuf(), Err(ResultError::Malformed(_))));
}

#[test]
fn test_serialized_result() {
    let result = parse("dns_4610");
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["measurement_id"], 1_004_041);
    assert_eq!(json["is_error"], false);
    assert_eq!(json["responses"][0]["protocol"], "UDP");
    assert_eq!(json["responses"][0]["response_size"], 43);
    assert!(json["responses"][0].get("raw").is_none());
}
