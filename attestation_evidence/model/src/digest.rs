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

//! Algorithm-tagged digest values.
//!
//! Checked constructors guarantee `bytes.len() == algorithm.length()`. The
//! `*_unchecked` constructors only guarantee that the text was decodable; they
//! exist so evidence objects can hold a wrong-length value and report it as a
//! fault instead of losing it.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::algorithm::DigestAlgorithm;
use crate::error::DigestError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest {
    algorithm: DigestAlgorithm,
    bytes: Vec<u8>,
}

/// Pure length predicate, usable before construction and as a post-hoc check.
pub fn is_valid(bytes: &[u8], algorithm: DigestAlgorithm) -> bool {
    algorithm.is_valid_bytes(bytes)
}

impl Digest {
    /// Create a digest from raw bytes.
    ///
    /// # Errors
    ///
    /// * `DigestError::InvalidLength` - If the byte count does not match the algorithm.
    pub fn new(algorithm: DigestAlgorithm, bytes: impl Into<Vec<u8>>) -> Result<Self, DigestError> {
        let bytes = bytes.into();
        if !is_valid(&bytes, algorithm) {
            return Err(DigestError::InvalidLength {
                algorithm,
                expected: algorithm.length(),
                actual: bytes.len(),
            });
        }
        Ok(Self { algorithm, bytes })
    }

    /// Create a digest from hexadecimal text (either case).
    ///
    /// # Errors
    ///
    /// * `DigestError::InvalidEncoding` - If the text is not hex.
    /// * `DigestError::InvalidLength` - If the decoded length does not match the algorithm.
    pub fn from_hex(algorithm: DigestAlgorithm, text: &str) -> Result<Self, DigestError> {
        Self::new(algorithm, decode_hex(text)?)
    }

    /// Create a digest from standard base64 text.
    pub fn from_base64(algorithm: DigestAlgorithm, text: &str) -> Result<Self, DigestError> {
        let bytes = BASE64
            .decode(text.trim())
            .map_err(|e| DigestError::InvalidEncoding(format!("Failed to decode base64 digest: {}", e)))?;
        Self::new(algorithm, bytes)
    }

    /// Create a digest from text that is either hex or base64.
    ///
    /// Hex is tried first when the text has exactly the hex length of the
    /// algorithm; anything else is treated as base64.
    pub fn parse(algorithm: DigestAlgorithm, text: &str) -> Result<Self, DigestError> {
        let text = text.trim();
        if algorithm.is_valid_hex(text) {
            return Self::from_hex(algorithm, text);
        }
        Self::from_base64(algorithm, text).map_err(|e| match e {
            DigestError::InvalidEncoding(_) => DigestError::InvalidEncoding(format!(
                "'{}' is neither {} hex nor base64",
                text, algorithm
            )),
            other => other,
        })
    }

    /// Wrap bytes without checking their length against the algorithm.
    pub fn from_parts_unchecked(algorithm: DigestAlgorithm, bytes: impl Into<Vec<u8>>) -> Self {
        Self { algorithm, bytes: bytes.into() }
    }

    /// Decode hex text without checking the decoded length.
    ///
    /// # Errors
    ///
    /// * `DigestError::InvalidEncoding` - If the text is not hex (odd length included).
    pub fn from_hex_unchecked(algorithm: DigestAlgorithm, text: &str) -> Result<Self, DigestError> {
        Ok(Self::from_parts_unchecked(algorithm, decode_hex(text)?))
    }

    /// The all-zero digest, i.e. the reset value of a PCR in this bank
    pub fn zero(algorithm: DigestAlgorithm) -> Self {
        Self { algorithm, bytes: vec![0u8; algorithm.length()] }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// Whether the byte length matches the digest's own algorithm tag
    pub fn is_valid(&self) -> bool {
        is_valid(&self.bytes, self.algorithm)
    }
}

fn decode_hex(text: &str) -> Result<Vec<u8>, DigestError> {
    hex::decode(text.trim())
        .map_err(|e| DigestError::InvalidEncoding(format!("Failed to decode hex digest '{}': {}", text, e)))
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
