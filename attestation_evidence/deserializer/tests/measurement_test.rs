/*
 * Copyright (c) Huawei Technologies Co., Ltd. 2025. All rights reserved.
 * Global Trust Authority is licensed under the Mulan PSL v2.
 * You can use this software according to the terms and conditions of the Mulan PSL v2.
 * You may obtain a copy of Mulan PSL v2 at:
 *     http://license.coscl.org.cn/MulanPSL2
 * THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR
 * PURPOSE.
 * See the Mulan PSL v2 for more details.
 */

use evidence_deserializer::{
    measurement_to_json, measurement_to_xml, parse_measurement, AuditRecord, CumulativeHashPolicy, ParseError,
    ParserConfig, TreeDeserializer,
};
use evidence_model::{DigestAlgorithm, Fault, ModelError, NodeKind};

const SHA256_ETC: &str = "2b5cb3bd1d6b2bab1c4bc5b3b6db4e5e0a1f2b0c1d7e3f2a4b5c6d7e8f901234";
const SHA384_A: &str = "a1a2a3a4a5a6a7a8a9a0b1b2b3b4b5b6b7b8b9b0c1c2c3c4c5c6c7c8c9c0d1d2d3d4d5d6d7d8d9d0e1e2e3e4e5e6e7e8";
const SHA384_B: &str = "0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f202122232425262728292a2b2c2d2e2f30";

fn measurement_xml(cumulative_hash: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Measurement xmlns="lib:wml:measurements:1.0" Label="ISecL_Default_Application_Flavor" Uuid="1fe1b7fc-99e6-4e7e-ba3d-d9aeeb03d227" DigestAlg="SHA384">
    <Dir Exclude="" Include=".*" Path="/opt/trustagent/hypertext/WEB-INF">{}</Dir>
    <File Path="/opt/trustagent/bin/module_analysis.sh">{}</File>
    <CumulativeHash>{}</CumulativeHash>
</Measurement>"#,
        SHA384_A, SHA384_B, cumulative_hash
    )
}

// Test Objective: A positional "0" key holds the digest of the entry
// Expected Result: one directory node at /etc with that SHA256 digest, no CumulativeHash
#[test]
fn test_positional_digest_is_node_value() {
    let measurement = parse_measurement(&format!(r#"{{"Dir": {{"Path": "/etc", "0": "{}"}}}}"#, SHA256_ETC)).unwrap();
    assert_eq!(measurement.nodes().len(), 1);
    let node = &measurement.nodes()[0];
    assert_eq!(node.kind(), NodeKind::Directory);
    assert_eq!(node.path(), "/etc");
    let value = node.value().unwrap();
    assert_eq!(value.algorithm(), DigestAlgorithm::Sha256);
    assert_eq!(value.to_hex(), SHA256_ETC);
    assert!(node.metadata().is_empty());
    assert!(measurement.cumulative_hash().is_none());
}

#[test]
fn test_blank_key_digest_is_node_value() {
    let measurement = parse_measurement(&format!(r#"{{"File": {{"Path": "/a", "": "{}"}}}}"#, SHA256_ETC)).unwrap();
    assert_eq!(measurement.nodes()[0].value().unwrap().to_hex(), SHA256_ETC);
}

// Test Objective: CumulativeHash is exposed by accessor but never as a node
// Expected Result: two nodes, SHA384 cumulative hash
#[test]
fn test_cumulative_hash_is_not_a_node() {
    let decoded = TreeDeserializer::default().measurement_from_xml(&measurement_xml(SHA384_B)).unwrap();
    assert_eq!(decoded.audit, AuditRecord::Logged);

    let measurement = decoded.value;
    assert_eq!(measurement.nodes().len(), 2);
    assert_eq!(measurement.nodes()[0].kind(), NodeKind::Directory);
    assert_eq!(measurement.nodes()[0].value().unwrap().to_hex(), SHA384_A);
    assert_eq!(measurement.nodes()[1].kind(), NodeKind::File);
    let hash = measurement.cumulative_hash().unwrap();
    assert_eq!(hash.algorithm(), DigestAlgorithm::Sha384);
    assert_eq!(hash.to_hex(), SHA384_B);
    assert!(measurement.is_valid());
}

#[test]
fn test_reported_cumulative_hash_is_checked() {
    let measurement = parse_measurement(&measurement_xml(SHA384_B)).unwrap();
    assert_eq!(measurement.cumulative_hash_matches().unwrap(), Some(false));

    let expected = measurement.recompute_cumulative_hash(DigestAlgorithm::Sha384).unwrap();
    let measurement = parse_measurement(&measurement_xml(&expected.to_hex())).unwrap();
    assert_eq!(measurement.cumulative_hash_matches().unwrap(), Some(true));
}

// Test Objective: Re-serializing and re-parsing a measurement is idempotent
// Expected Result: equal trees through JSON and through XML
#[test]
fn test_measurement_round_trip_is_idempotent() {
    let measurement = parse_measurement(&measurement_xml(SHA384_B)).unwrap();

    let json = measurement_to_json(&measurement).unwrap();
    assert_eq!(json.matches("\"CumulativeHash\"").count(), 1);
    assert_eq!(parse_measurement(&json).unwrap(), measurement);

    let xml = measurement_to_xml(&measurement).unwrap();
    assert_eq!(parse_measurement(&xml).unwrap(), measurement);
}

#[test]
fn test_json_output_repeats_keys_in_order() {
    let measurement = parse_measurement(&format!(
        r#"{{"File": {{"Path": "/a", "": "{d}"}}, "Dir": {{"Path": "/d", "": "{d}"}}, "File": {{"Path": "/b", "": "{d}"}}}}"#,
        d = SHA256_ETC
    ))
    .unwrap();
    let json = measurement_to_json(&measurement).unwrap();
    assert_eq!(json.matches("\"File\"").count(), 2);
    let reparsed = parse_measurement(&json).unwrap();
    let paths: Vec<&str> = reparsed.nodes().iter().map(|n| n.path()).collect();
    assert_eq!(paths, vec!["/a", "/d", "/b"]);
}

// Test Objective: More than one CumulativeHash follows the configured policy
// Expected Result: rejected by default, last value kept under LastWins
#[test]
fn test_duplicate_cumulative_hash_policy() {
    let text = format!(
        r#"{{"File": {{"Path": "/a", "": "{a}"}}, "CumulativeHash": "{a}", "CumulativeHash": "{b}"}}"#,
        a = SHA384_A,
        b = SHA384_B
    );
    assert!(matches!(parse_measurement(&text), Err(ParseError::DuplicateCumulativeHash(2))));

    let deserializer = TreeDeserializer::new(ParserConfig {
        cumulative_hash_policy: CumulativeHashPolicy::LastWins,
        ..ParserConfig::default()
    });
    let measurement = deserializer.measurement_from_json(&text).unwrap().value;
    assert_eq!(measurement.cumulative_hash().unwrap().to_hex(), SHA384_B);
}

#[test]
fn test_unknown_digest_alg_is_fatal() {
    let text = format!(r#"{{"DigestAlg": "MD5", "File": {{"Path": "/a", "": "{}"}}}}"#, SHA256_ETC);
    assert!(matches!(
        parse_measurement(&text),
        Err(ParseError::Model(ModelError::UnknownAlgorithm(name))) if name == "MD5"
    ));
}

// Test Objective: Well-formed digests of the wrong length are kept and reported as faults
// Expected Result: node constructed, measurement carries "SHA256 Digest is invalid"
#[test]
fn test_wrong_length_digest_is_a_fault() {
    let text = format!(r#"{{"DigestAlg": "SHA256", "File": {{"Path": "/a", "": "{}"}}}}"#, &SHA256_ETC[..40]);
    let measurement = parse_measurement(&text).unwrap();
    let node = &measurement.nodes()[0];
    assert_eq!(node.value().unwrap().as_bytes().len(), 20);
    assert!(!node.is_valid());
    assert_eq!(measurement.faults(), &[Fault::with_cause("SHA256 Digest is invalid", "/a")]);
}

#[test]
fn test_malformed_entries_are_fatal() {
    let bad_hex = r#"{"File": {"Path": "/a", "": "not-hex"}}"#;
    assert!(matches!(parse_measurement(bad_hex), Err(ParseError::MalformedPayload(_))));

    let odd_hex = format!(r#"{{"File": {{"Path": "/a", "": "{}"}}}}"#, &SHA256_ETC[..39]);
    assert!(matches!(parse_measurement(&odd_hex), Err(ParseError::MalformedPayload(_))));

    let no_digest = r#"{"File": {"Path": "/a"}}"#;
    assert!(matches!(parse_measurement(no_digest), Err(ParseError::MalformedPayload(_))));

    assert!(matches!(parse_measurement("<Measurement><File>"), Err(ParseError::MalformedPayload(_))));
}

#[test]
fn test_payload_size_limit() {
    let deserializer = TreeDeserializer::new(ParserConfig { max_payload_bytes: 16, ..ParserConfig::default() });
    let text = format!(r#"{{"File": {{"Path": "/a", "": "{}"}}}}"#, SHA256_ETC);
    match deserializer.measurement_from_json(&text) {
        Err(ParseError::PayloadTooLarge { size, limit }) => {
            assert_eq!(size, text.len());
            assert_eq!(limit, 16);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_audit_trace_can_be_disabled() {
    let deserializer = TreeDeserializer::new(ParserConfig { audit_trace: false, ..ParserConfig::default() });
    let decoded = deserializer.measurement_from_xml(&measurement_xml(SHA384_B)).unwrap();
    assert_eq!(decoded.audit, AuditRecord::Disabled);
}

#[test]
fn test_default_algorithm_applies_to_unrecognised_lengths() {
    let deserializer = TreeDeserializer::new(ParserConfig {
        default_algorithm: DigestAlgorithm::Sha512,
        ..ParserConfig::default()
    });
    let measurement = deserializer
        .measurement_from_json(r#"{"Symlink": {"Path": "/l", "": "abcdef"}}"#)
        .unwrap()
        .value;
    assert_eq!(measurement.nodes()[0].value().unwrap().algorithm(), DigestAlgorithm::Sha512);
    assert_eq!(measurement.faults().len(), 1);
}

// Test Objective: Deeply nested XML is refused instead of exhausting the stack
// Expected Result: MalformedPayload for a 300000-level document under the size limit
#[test]
fn test_deeply_nested_xml_is_rejected() {
    let depth = 300_000;
    let text = format!("<Measurement>{}{}</Measurement>", "<a>".repeat(depth), "</a>".repeat(depth));
    assert!(text.len() < evidence_deserializer::DEFAULT_MAX_PAYLOAD_BYTES);
    assert!(matches!(parse_measurement(&text), Err(ParseError::MalformedPayload(_))));
}
