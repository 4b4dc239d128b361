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

//! Digest algorithm vocabulary.
//!
//! Every per-algorithm fact (name, aliases, byte length, whether a PCR bank is
//! wired to it) lives in [`ALGORITHM_TABLE`]. Adding an algorithm means adding
//! a variant and a row; nothing else dispatches on the variant directly.

use openssl::hash::MessageDigest;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Supported digest algorithms ("banks")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Sm3,
}

struct AlgorithmRow {
    algorithm: DigestAlgorithm,
    name: &'static str,
    aliases: &'static [&'static str],
    length: usize,
    pcr_bank: bool,
}

/// Rows are in declaration order of [`DigestAlgorithm`].
const ALGORITHM_TABLE: [AlgorithmRow; 5] = [
    AlgorithmRow { algorithm: DigestAlgorithm::Sha1, name: "SHA1", aliases: &["SHA"], length: 20, pcr_bank: true },
    AlgorithmRow { algorithm: DigestAlgorithm::Sha256, name: "SHA256", aliases: &[], length: 32, pcr_bank: true },
    AlgorithmRow { algorithm: DigestAlgorithm::Sha384, name: "SHA384", aliases: &[], length: 48, pcr_bank: false },
    AlgorithmRow { algorithm: DigestAlgorithm::Sha512, name: "SHA512", aliases: &[], length: 64, pcr_bank: false },
    AlgorithmRow { algorithm: DigestAlgorithm::Sm3, name: "SM3", aliases: &["SM3256"], length: 32, pcr_bank: false },
];

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 5] = [
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
        DigestAlgorithm::Sm3,
    ];

    fn row(self) -> &'static AlgorithmRow {
        &ALGORITHM_TABLE[self as usize]
    }

    /// Canonical upper-case name, e.g. `SHA256`
    pub fn name(self) -> &'static str {
        self.row().name
    }

    /// Expected digest length in bytes
    pub fn length(self) -> usize {
        self.row().length
    }

    /// Expected digest length in hexadecimal characters
    pub fn hex_length(self) -> usize {
        self.row().length * 2
    }

    /// Whether a concrete PCR / event-log bank is wired to this algorithm
    pub fn is_pcr_bank(self) -> bool {
        self.row().pcr_bank
    }

    /// Resolve an algorithm from its name.
    ///
    /// Matching ignores case, `-` and `_`, so `sha256`, `SHA-256` and
    /// `SHA_256` all resolve to [`DigestAlgorithm::Sha256`].
    ///
    /// # Errors
    ///
    /// * `ModelError::UnknownAlgorithm` - If the name matches no table row.
    pub fn from_name(name: &str) -> Result<Self, ModelError> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();

        ALGORITHM_TABLE
            .iter()
            .find(|row| row.name == normalized || row.aliases.contains(&normalized.as_str()))
            .map(|row| row.algorithm)
            .ok_or_else(|| ModelError::UnknownAlgorithm(name.to_string()))
    }

    /// First algorithm (in table order) whose digest is `length` bytes long
    pub fn from_length(length: usize) -> Option<Self> {
        ALGORITHM_TABLE.iter().find(|row| row.length == length).map(|row| row.algorithm)
    }

    pub fn is_valid_bytes(self, bytes: &[u8]) -> bool {
        bytes.len() == self.length()
    }

    /// Validate if a string is a valid hex digest for this algorithm
    pub fn is_valid_hex(self, hex_str: &str) -> bool {
        hex_str.len() == self.hex_length() && hex_str.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get the OpenSSL MessageDigest for this algorithm
    pub fn message_digest(self) -> MessageDigest {
        match self {
            Self::Sha1 => MessageDigest::sha1(),
            Self::Sha256 => MessageDigest::sha256(),
            Self::Sha384 => MessageDigest::sha384(),
            Self::Sha512 => MessageDigest::sha512(),
            Self::Sm3 => MessageDigest::sm3(),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl Serialize for DigestAlgorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for DigestAlgorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_follow_declaration_order() {
        for algorithm in DigestAlgorithm::ALL {
            assert_eq!(ALGORITHM_TABLE[algorithm as usize].algorithm, algorithm);
        }
    }

    #[test]
    fn from_name_accepts_common_spellings() {
        assert_eq!(DigestAlgorithm::from_name("sha256").unwrap(), DigestAlgorithm::Sha256);
        assert_eq!(DigestAlgorithm::from_name("SHA-384").unwrap(), DigestAlgorithm::Sha384);
        assert_eq!(DigestAlgorithm::from_name("sm3_256").unwrap(), DigestAlgorithm::Sm3);
        assert!(matches!(
            DigestAlgorithm::from_name("md5"),
            Err(ModelError::UnknownAlgorithm(name)) if name == "md5"
        ));
    }

    #[test]
    fn from_length_prefers_table_order() {
        assert_eq!(DigestAlgorithm::from_length(32), Some(DigestAlgorithm::Sha256));
        assert_eq!(DigestAlgorithm::from_length(20), Some(DigestAlgorithm::Sha1));
        assert_eq!(DigestAlgorithm::from_length(19), None);
    }
}
