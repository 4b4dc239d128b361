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
    Digest, DigestAlgorithm, DigestError, ModelError, Pcr, PcrFactory, PcrIndex, Validate,
};
use serde_json::json;

const SHA1_EMPTY: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";
const SHA256_VALUE: &str = "9d7504bb0d32f62d43310f38df37cdd5e42bdb83dd0c0592fd9b1c3b16770c35";

// Test Objective: Display output is the "<bank>: <index>: <hex>" log format
// Expected Result: exact string match
#[test]
fn test_pcr_display_format() {
    let pcr = PcrFactory::new_instance(DigestAlgorithm::Sha256, PcrIndex::new(0), SHA256_VALUE).unwrap();
    assert_eq!(pcr.to_string(), format!("SHA256: 0: {}", SHA256_VALUE));

    let pcr = PcrFactory::new_instance(DigestAlgorithm::Sha1, PcrIndex::new(17), SHA1_EMPTY).unwrap();
    assert_eq!(pcr.to_string(), format!("SHA1: 17: {}", SHA1_EMPTY));
}

#[test]
fn test_pcr_accessors() {
    let pcr = PcrFactory::new_instance_by_name("sha256", PcrIndex::new(7), SHA256_VALUE).unwrap();
    assert_eq!(pcr.index(), Some(PcrIndex::new(7)));
    assert_eq!(pcr.bank(), DigestAlgorithm::Sha256);
    assert_eq!(pcr.value().unwrap().to_hex(), SHA256_VALUE);
    assert!(pcr.is_valid());
    assert!(pcr.faults().is_empty());
}

// Test Objective: Unknown names and known-but-unwired algorithms fail differently
// Expected Result: UnknownAlgorithm vs UnsupportedAlgorithm
#[test]
fn test_factory_two_tier_failures() {
    let unknown = PcrFactory::new_instance_by_name("md5", PcrIndex::new(0), SHA1_EMPTY);
    assert!(matches!(unknown, Err(ModelError::UnknownAlgorithm(name)) if name == "md5"));

    let unsupported = PcrFactory::new_instance_by_name("SHA384", PcrIndex::new(0), SHA1_EMPTY);
    assert_eq!(unsupported, Err(ModelError::UnsupportedAlgorithm(DigestAlgorithm::Sha384)));

    let unsupported = PcrFactory::new_instance_from_bytes(DigestAlgorithm::Sm3, PcrIndex::new(0), &[0u8; 32]);
    assert_eq!(unsupported, Err(ModelError::UnsupportedAlgorithm(DigestAlgorithm::Sm3)));
}

#[test]
fn test_factory_rejects_undecodable_value() {
    let result = PcrFactory::new_instance(DigestAlgorithm::Sha1, PcrIndex::new(0), &SHA1_EMPTY[..39]);
    assert!(matches!(result, Err(ModelError::Digest(DigestError::InvalidEncoding(_)))));
}

// Test Objective: A wrong-length SHA1 value still builds a PCR
// Expected Result: the PCR is inspectable and carries a length fault
#[test]
fn test_wrong_length_value_is_a_fault() {
    let pcr = PcrFactory::new_instance(DigestAlgorithm::Sha1, PcrIndex::new(3), &SHA1_EMPTY[..38]).unwrap();
    assert!(!pcr.is_valid());
    assert_eq!(pcr.faults().len(), 1);
    assert_eq!(pcr.faults()[0].description, "Invalid SHA1 PCR Value");
    assert_eq!(pcr.value().unwrap().as_bytes().len(), 19);
    assert_eq!(pcr.validate(), pcr.faults());
}

#[test]
fn test_out_of_range_index_is_a_fault() {
    let pcr = PcrFactory::new_instance(DigestAlgorithm::Sha1, PcrIndex::new(24), SHA1_EMPTY).unwrap();
    assert_eq!(pcr.faults().len(), 1);
    assert_eq!(pcr.faults()[0].description, "Invalid pcr index");
}

// Test Objective: Tag check and length check are independent
// Expected Result: a SHA1-tagged digest in a SHA256 bank yields both faults
#[test]
fn test_digest_tag_mismatch_is_a_fault() {
    let digest = Digest::from_hex(DigestAlgorithm::Sha1, SHA1_EMPTY).unwrap();
    let pcr = Pcr::new(DigestAlgorithm::Sha256, PcrIndex::new(0), digest).unwrap();
    let descriptions: Vec<&str> = pcr.faults().iter().map(|f| f.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Digest algorithm does not match bank", "Invalid SHA256 PCR Value"]);
}

// Test Objective: Faults take part in equality
// Expected Result: invalid and corrected instances differ, identical ones are equal
#[test]
fn test_equality_includes_faults() {
    let valid = PcrFactory::new_instance(DigestAlgorithm::Sha1, PcrIndex::new(0), SHA1_EMPTY).unwrap();
    let same = PcrFactory::new_instance(DigestAlgorithm::Sha1, PcrIndex::new(0), SHA1_EMPTY).unwrap();
    let invalid = PcrFactory::new_instance(DigestAlgorithm::Sha1, PcrIndex::new(30), SHA1_EMPTY).unwrap();
    assert_eq!(valid, same);
    assert_ne!(valid, invalid);
}

#[test]
fn test_ordering_by_index_first() {
    let mut pcrs = vec![
        PcrFactory::new_instance(DigestAlgorithm::Sha256, PcrIndex::new(2), SHA256_VALUE).unwrap(),
        PcrFactory::new_instance(DigestAlgorithm::Sha1, PcrIndex::new(1), SHA1_EMPTY).unwrap(),
        PcrFactory::new_instance(DigestAlgorithm::Sha256, PcrIndex::new(1), SHA256_VALUE).unwrap(),
    ];
    pcrs.sort();
    let order: Vec<String> = pcrs.iter().map(|p| format!("{}:{}", p.index().unwrap(), p.bank())).collect();
    assert_eq!(order, vec!["1:SHA1", "1:SHA256", "2:SHA256"]);
}

#[test]
fn test_pcr_index_parsing() {
    assert_eq!("7".parse::<PcrIndex>().unwrap(), PcrIndex::new(7));
    assert_eq!("pcr7".parse::<PcrIndex>().unwrap(), PcrIndex::new(7));
    assert_eq!("PCR_12".parse::<PcrIndex>().unwrap(), PcrIndex::new(12));
    assert!("-1".parse::<PcrIndex>().is_err());
    assert!(PcrIndex::try_from(-1i64).is_err());
    assert!(!PcrIndex::new(99).is_valid());
}

// Test Objective: JSON wire form with digest_type tag
// Expected Result: string and numeric index both accepted, missing index is a fault
#[test]
fn test_pcr_json_wire() {
    let pcr: Pcr = serde_json::from_value(json!({
        "digest_type": "SHA256",
        "index": "0",
        "value": SHA256_VALUE
    }))
    .unwrap();
    assert!(pcr.is_valid());
    assert_eq!(
        serde_json::to_value(&pcr).unwrap(),
        json!({"digest_type": "SHA256", "index": 0, "value": SHA256_VALUE})
    );

    let reparsed: Pcr = serde_json::from_value(serde_json::to_value(&pcr).unwrap()).unwrap();
    assert_eq!(reparsed, pcr);

    let missing_index: Pcr = serde_json::from_value(json!({"pcr_bank": "sha1", "value": SHA1_EMPTY})).unwrap();
    assert_eq!(missing_index.faults()[0].description, "Pcr index is null");

    let missing_value: Pcr = serde_json::from_value(json!({"digest_type": "SHA1", "index": 1})).unwrap();
    assert_eq!(missing_value.faults()[0].description, "Digest is null");
    assert_eq!(missing_value.to_string(), "SHA1: 1: null");

    let unwired = serde_json::from_value::<Pcr>(json!({"digest_type": "SHA384", "index": 1}));
    assert!(unwired.is_err());
}

#[test]
fn test_pcr_index_range_bounds() {
    assert!(PcrIndex::new(0).is_valid());
    assert!(PcrIndex::new(23).is_valid());
    assert!(!PcrIndex::new(24).is_valid());
    assert!(!PcrIndex::new(u32::MAX).is_valid());
}
