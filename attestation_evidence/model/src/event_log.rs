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

//! Per-PCR event logs: the ordered list of measurements extended into one register.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::algorithm::DigestAlgorithm;
use crate::digest::Digest;
use crate::error::ModelError;
use crate::fault::{Fault, Validate};
use crate::hash;
use crate::pcr::{Pcr, PcrIndex};

/// One measured module in an event log
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MeasurementEntry {
    value: Digest,
    label: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    info: BTreeMap<String, String>,
    #[serde(skip)]
    faults: Vec<Fault>,
}

impl MeasurementEntry {
    pub fn new(value: Digest, label: impl Into<String>) -> Self {
        Self::with_info(value, label, BTreeMap::new())
    }

    pub fn with_info(value: Digest, label: impl Into<String>, info: BTreeMap<String, String>) -> Self {
        let mut entry = Self { value, label: label.into(), info, faults: Vec::new() };
        entry.faults = entry.validate();
        entry
    }

    pub fn value(&self) -> &Digest {
        &self.value
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn info(&self) -> &BTreeMap<String, String> {
        &self.info
    }

    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    pub fn is_valid(&self) -> bool {
        self.faults.is_empty()
    }
}

impl Validate for MeasurementEntry {
    fn validate(&self) -> Vec<Fault> {
        let mut faults = Vec::new();
        if self.label.trim().is_empty() {
            faults.push(Fault::new("Measurement label is empty"));
        }
        if !self.value.is_valid() {
            faults.push(Fault::with_cause(
                format!("{} Digest is invalid", self.value.algorithm()),
                format!("{} bytes", self.value.as_bytes().len()),
            ));
        }
        faults
    }
}

/// Event log of a single PCR in a single bank
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PcrEventLog {
    pcr_index: PcrIndex,
    pcr_bank: DigestAlgorithm,
    event_log: Vec<MeasurementEntry>,
    #[serde(skip)]
    faults: Vec<Fault>,
}

impl PcrEventLog {
    /// # Errors
    ///
    /// * `ModelError::UnsupportedAlgorithm` - If no event-log bank is wired to `bank`.
    pub fn new(bank: DigestAlgorithm, pcr_index: PcrIndex, events: Vec<MeasurementEntry>) -> Result<Self, ModelError> {
        if !bank.is_pcr_bank() {
            return Err(ModelError::UnsupportedAlgorithm(bank));
        }
        let mut log = Self { pcr_index, pcr_bank: bank, event_log: events, faults: Vec::new() };
        log.faults = log.validate();
        Ok(log)
    }

    pub fn pcr_index(&self) -> PcrIndex {
        self.pcr_index
    }

    pub fn pcr_bank(&self) -> DigestAlgorithm {
        self.pcr_bank
    }

    pub fn events(&self) -> &[MeasurementEntry] {
        &self.event_log
    }

    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    pub fn is_valid(&self) -> bool {
        self.faults.is_empty()
    }

    /// Expected register value after extending every event in order
    pub fn replay(&self) -> Result<Digest, ModelError> {
        hash::replay(self.pcr_bank, self.event_log.iter().map(MeasurementEntry::value))
    }

    /// Whether `pcr` is the register this log describes and holds the replayed value
    pub fn matches(&self, pcr: &Pcr) -> Result<bool, ModelError> {
        if pcr.index() != Some(self.pcr_index) || pcr.bank() != self.pcr_bank {
            return Ok(false);
        }
        let replayed = self.replay()?;
        Ok(pcr.value() == Some(&replayed))
    }
}

impl Validate for PcrEventLog {
    fn validate(&self) -> Vec<Fault> {
        let mut faults = Vec::new();
        if !self.pcr_index.is_valid() {
            faults.push(Fault::with_cause("Invalid pcr index", self.pcr_index));
        }
        for entry in &self.event_log {
            if entry.value.algorithm() != self.pcr_bank {
                faults.push(Fault::with_cause(
                    format!("Event digest algorithm {} does not match bank {}", entry.value.algorithm(), self.pcr_bank),
                    &entry.label,
                ));
            }
            faults.extend(
                entry
                    .faults
                    .iter()
                    .map(|fault| Fault::with_cause(fault.description.clone(), &entry.label)),
            );
        }
        faults
    }
}

#[derive(Deserialize)]
struct EntryWire {
    value: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    info: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct EventLogWire {
    pcr_index: PcrIndex,
    #[serde(alias = "digest_type")]
    pcr_bank: DigestAlgorithm,
    #[serde(default)]
    event_log: Vec<EntryWire>,
}

impl<'de> Deserialize<'de> for PcrEventLog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = EventLogWire::deserialize(deserializer)?;
        let events = wire
            .event_log
            .into_iter()
            .map(|entry| {
                Digest::from_hex_unchecked(wire.pcr_bank, &entry.value)
                    .map(|digest| MeasurementEntry::with_info(digest, entry.label, entry.info))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(D::Error::custom)?;
        PcrEventLog::new(wire.pcr_bank, wire.pcr_index, events).map_err(D::Error::custom)
    }
}
