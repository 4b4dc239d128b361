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

use evidence_model::{
    Digest, DigestAlgorithm, MeasurementEntry, MeasurementNode, Measurement, ModelError, NodeKind,
    PcrEventLogFactory, PcrFactory, PcrIndex, TreeHeader,
};
use openssl::hash::{Hasher, MessageDigest};
use std::collections::BTreeMap;

/// Test fixtures for hash-chain tests
pub mod fixtures {
    use super::*;

    pub fn sha256(data: &[u8]) -> Vec<u8> {
        let mut hasher = Hasher::new(MessageDigest::sha256()).expect("Failed to create hasher");
        hasher.update(data).expect("Failed to update hash");
        hasher.finish().expect("Failed to finalize hash").to_vec()
    }

    /// TPM extend: H(current || measurement)
    pub fn extend(current: &[u8], measurement: &[u8]) -> Vec<u8> {
        let mut buffer = current.to_vec();
        buffer.extend_from_slice(measurement);
        sha256(&buffer)
    }

    pub fn entry(content: &str, label: &str) -> MeasurementEntry {
        let digest = Digest::new(DigestAlgorithm::Sha256, sha256(content.as_bytes())).unwrap();
        MeasurementEntry::new(digest, label)
    }

    pub fn file_node(path: &str, content: &str) -> MeasurementNode {
        let digest = Digest::new(DigestAlgorithm::Sha256, sha256(content.as_bytes())).unwrap();
        MeasurementNode::new(NodeKind::File, path, Some(digest), BTreeMap::new())
    }
}

// Test Objective: Replaying an event log yields the extended register value
// Expected Result: replay equals the manual extend chain and matches the PCR
#[test]
fn test_event_log_replay_matches_pcr() {
    let events = vec![fixtures::entry("shim", "shimx64.efi"), fixtures::entry("grub", "grubx64.efi")];
    let mut expected = vec![0u8; 32];
    for event in &events {
        expected = fixtures::extend(&expected, event.value().as_bytes());
    }

    let log = PcrEventLogFactory::new_instance(DigestAlgorithm::Sha256, PcrIndex::new(4), events).unwrap();
    assert!(log.is_valid());
    assert_eq!(log.replay().unwrap().to_bytes(), expected);

    let pcr = PcrFactory::new_instance(DigestAlgorithm::Sha256, PcrIndex::new(4), &hex::encode(&expected)).unwrap();
    assert!(log.matches(&pcr).unwrap());

    let other_index = PcrFactory::new_instance(DigestAlgorithm::Sha256, PcrIndex::new(5), &hex::encode(&expected)).unwrap();
    assert!(!log.matches(&other_index).unwrap());
}

#[test]
fn test_event_log_factory_two_tier_failures() {
    let unknown = PcrEventLogFactory::new_instance_by_name("whirlpool", PcrIndex::new(0), vec![]);
    assert!(matches!(unknown, Err(ModelError::UnknownAlgorithm(_))));

    let unsupported = PcrEventLogFactory::new_instance_by_name("sha512", PcrIndex::new(0), vec![]);
    assert_eq!(unsupported, Err(ModelError::UnsupportedAlgorithm(DigestAlgorithm::Sha512)));
}

// Test Objective: Entries of another bank and bad entries surface as log faults
// Expected Result: faults name the offending entry label
#[test]
fn test_event_log_faults() {
    let sha1 = Digest::from_hex(DigestAlgorithm::Sha1, "da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
    let events = vec![fixtures::entry("kernel", "vmlinuz"), MeasurementEntry::new(sha1, "initrd")];
    let log = PcrEventLogFactory::new_instance(DigestAlgorithm::Sha256, PcrIndex::new(9), events).unwrap();
    assert_eq!(log.faults().len(), 1);
    assert_eq!(log.faults()[0].cause.as_deref(), Some("initrd"));

    let blank = MeasurementEntry::new(Digest::zero(DigestAlgorithm::Sha256), " ");
    assert_eq!(blank.faults()[0].description, "Measurement label is empty");
}

#[test]
fn test_event_log_json_wire() {
    let json = serde_json::json!({
        "pcr_index": 10,
        "pcr_bank": "SHA256",
        "event_log": [
            {
                "value": "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
                "label": "boot_aggregate",
                "info": {"ComponentName": "boot"}
            }
        ]
    });
    let log: evidence_model::PcrEventLog = serde_json::from_value(json).unwrap();
    assert_eq!(log.pcr_index(), PcrIndex::new(10));
    assert_eq!(log.events().len(), 1);
    assert_eq!(log.events()[0].info().get("ComponentName").map(String::as_str), Some("boot"));
    assert!(log.is_valid());
}

// Test Objective: Cumulative hash is recomputed over nodes in wire order
// Expected Result: matches when reported correctly, differs when order changes
#[test]
fn test_cumulative_hash_recomputation() {
    let first = fixtures::file_node("/bin/a", "a");
    let second = fixtures::file_node("/bin/b", "b");
    let expected = fixtures::extend(
        &fixtures::extend(&[0u8; 32], first.value().unwrap().as_bytes()),
        second.value().unwrap().as_bytes(),
    );
    let reported = Digest::new(DigestAlgorithm::Sha256, expected).unwrap();

    let measurement = Measurement::new(TreeHeader::default(), vec![first.clone(), second.clone()], Some(reported.clone()));
    assert!(measurement.is_valid());
    assert_eq!(measurement.cumulative_hash_matches().unwrap(), Some(true));

    let reordered = Measurement::new(TreeHeader::default(), vec![second, first], Some(reported));
    assert_eq!(reordered.cumulative_hash_matches().unwrap(), Some(false));

    let legacy = Measurement::new(TreeHeader::default(), vec![], None);
    assert_eq!(legacy.cumulative_hash_matches().unwrap(), None);
}

#[test]
fn test_measurement_node_faults_surface_on_container() {
    let short = Digest::from_parts_unchecked(DigestAlgorithm::Sha256, vec![1u8; 31]);
    let nodes = vec![
        MeasurementNode::new(NodeKind::File, "/etc/hosts", Some(short), BTreeMap::new()),
        MeasurementNode::new(NodeKind::Directory, "/etc", None, BTreeMap::new()),
        MeasurementNode::new(NodeKind::Symlink, "", Some(Digest::zero(DigestAlgorithm::Sha256)), BTreeMap::new()),
    ];
    let measurement = Measurement::new(TreeHeader::default(), nodes, None);
    let descriptions: Vec<&str> = measurement.faults().iter().map(|f| f.description.as_str()).collect();
    assert_eq!(
        descriptions,
        vec!["SHA256 Digest is invalid", "Path is empty", "Measurement node has no digest"]
    );
    assert!(measurement.recompute_cumulative_hash(DigestAlgorithm::Sha256).is_err());
}

#[test]
fn test_directory_defaults() {
    let plain = MeasurementNode::new(NodeKind::Directory, "/opt", None, BTreeMap::new());
    assert_eq!(plain.include(), ".*");
    assert_eq!(plain.exclude(), "");
    assert_eq!(plain.filter_type(), "regex");

    let mut metadata = BTreeMap::new();
    metadata.insert("Include".to_string(), ".*\\.so".to_string());
    metadata.insert("FilterType".to_string(), "wildcard".to_string());
    let filtered = MeasurementNode::new(NodeKind::Directory, "/opt", None, metadata);
    assert_eq!(filtered.include(), ".*\\.so");
    assert_eq!(filtered.filter_type(), "wildcard");
}

#[test]
fn test_header_digest_algorithm() {
    let header = TreeHeader { digest_alg: Some("SHA384".to_string()), ..TreeHeader::default() };
    assert_eq!(header.digest_algorithm().unwrap(), Some(DigestAlgorithm::Sha384));

    let header = TreeHeader { digest_alg: Some("crc32".to_string()), ..TreeHeader::default() };
    assert!(matches!(header.digest_algorithm(), Err(ModelError::UnknownAlgorithm(_))));
}
