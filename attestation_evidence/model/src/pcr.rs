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

//! PCR register values, one type for every bank.
//! # Examples
//! ```
//! use evidence_model::{DigestAlgorithm, Digest, Pcr, PcrIndex};
//!
//! let digest = Digest::zero(DigestAlgorithm::Sha1);
//! let pcr = Pcr::new(DigestAlgorithm::Sha1, PcrIndex::new(0), digest).unwrap();
//! assert_eq!(pcr.to_string(), format!("SHA1: 0: {}", "00".repeat(20)));
//! ```

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::algorithm::DigestAlgorithm;
use crate::digest::Digest;
use crate::error::ModelError;
use crate::fault::{check_digest, Fault, Validate};

/// Valid PCR index range (0-23)
pub const PCR_INDEX_MIN: u32 = 0;
pub const PCR_INDEX_MAX: u32 = 23;

/// PCR register number. Range is checked by [`PcrIndex::is_valid`], not by the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PcrIndex(u32);

impl PcrIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        (PCR_INDEX_MIN..=PCR_INDEX_MAX).contains(&self.0)
    }
}

impl fmt::Display for PcrIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PcrIndex {
    type Err = ModelError;

    /// Accepts `7`, `pcr7` and `PCR_7`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = match trimmed.get(..3) {
            Some(prefix) if prefix.eq_ignore_ascii_case("pcr") => trimmed[3..].trim_start_matches('_'),
            _ => trimmed,
        };
        digits
            .parse::<u32>()
            .map(PcrIndex)
            .map_err(|e| ModelError::InvalidPcrIndex(format!("'{}': {}", s, e)))
    }
}

impl TryFrom<i64> for PcrIndex {
    type Error = ModelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(PcrIndex)
            .map_err(|_| ModelError::InvalidPcrIndex(value.to_string()))
    }
}

impl Serialize for PcrIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IndexWire {
    Number(i64),
    Text(String),
}

impl IndexWire {
    fn into_index(self) -> Result<PcrIndex, ModelError> {
        match self {
            IndexWire::Number(n) => PcrIndex::try_from(n),
            IndexWire::Text(s) => s.parse(),
        }
    }
}

impl<'de> Deserialize<'de> for PcrIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IndexWire::deserialize(deserializer)?.into_index().map_err(D::Error::custom)
    }
}

/// A single PCR: index, bank and the digest currently held by the register.
///
/// Faults are computed once at construction and take part in equality, so an
/// invalid instance never compares equal to a corrected one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pcr {
    index: Option<PcrIndex>,
    bank: DigestAlgorithm,
    value: Option<Digest>,
    faults: Vec<Fault>,
}

impl Pcr {
    /// Create a PCR for a wired bank.
    ///
    /// # Errors
    ///
    /// * `ModelError::UnsupportedAlgorithm` - If no PCR bank is wired to `bank`.
    pub fn new(bank: DigestAlgorithm, index: PcrIndex, value: Digest) -> Result<Self, ModelError> {
        if !bank.is_pcr_bank() {
            return Err(ModelError::UnsupportedAlgorithm(bank));
        }
        Ok(Self::assemble(Some(index), bank, Some(value)))
    }

    pub(crate) fn assemble(index: Option<PcrIndex>, bank: DigestAlgorithm, value: Option<Digest>) -> Self {
        let mut pcr = Self { index, bank, value, faults: Vec::new() };
        pcr.faults = pcr.validate();
        pcr
    }

    pub fn index(&self) -> Option<PcrIndex> {
        self.index
    }

    pub fn bank(&self) -> DigestAlgorithm {
        self.bank
    }

    pub fn value(&self) -> Option<&Digest> {
        self.value.as_ref()
    }

    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    pub fn is_valid(&self) -> bool {
        self.faults.is_empty()
    }
}

impl Validate for Pcr {
    fn validate(&self) -> Vec<Fault> {
        let mut faults = Vec::new();
        match self.index {
            None => faults.push(Fault::new("Pcr index is null")),
            Some(index) if !index.is_valid() => faults.push(Fault::with_cause("Invalid pcr index", index)),
            Some(_) => {}
        }
        match &self.value {
            None => faults.push(Fault::new("Digest is null")),
            Some(digest) => check_digest(
                &mut faults,
                digest,
                self.bank,
                &format!("Invalid {} PCR Value", self.bank),
            ),
        }
        faults
    }
}

impl fmt::Display for Pcr {
    /// `"<bank>: <index>: <hex>"`, relied upon by log consumers
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = self.index.map(|i| i.to_string()).unwrap_or_else(|| "null".to_string());
        let value = self.value.as_ref().map(Digest::to_hex).unwrap_or_else(|| "null".to_string());
        write!(f, "{}: {}: {}", self.bank, index, value)
    }
}

impl Serialize for Pcr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("digest_type", &self.bank)?;
        map.serialize_entry("index", &self.index)?;
        map.serialize_entry("value", &self.value)?;
        map.end()
    }
}

#[derive(Deserialize)]
struct PcrWire {
    #[serde(alias = "pcr_bank")]
    digest_type: DigestAlgorithm,
    #[serde(default)]
    index: Option<PcrIndex>,
    #[serde(default)]
    value: Option<String>,
}

impl<'de> Deserialize<'de> for Pcr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = PcrWire::deserialize(deserializer)?;
        if !wire.digest_type.is_pcr_bank() {
            return Err(D::Error::custom(ModelError::UnsupportedAlgorithm(wire.digest_type)));
        }
        let value = wire
            .value
            .map(|text| Digest::from_hex_unchecked(wire.digest_type, &text))
            .transpose()
            .map_err(D::Error::custom)?;
        Ok(Self::assemble(wire.index, wire.digest_type, value))
    }
}
