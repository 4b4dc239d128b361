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

//! Algorithm-driven construction of PCRs and event logs.
//!
//! Failures come in two tiers that callers may branch on:
//! an algorithm name that is not in the table is `UnknownAlgorithm`, a known
//! algorithm without a wired bank is `UnsupportedAlgorithm`.

use log::error;

use crate::algorithm::DigestAlgorithm;
use crate::digest::Digest;
use crate::error::ModelError;
use crate::event_log::{MeasurementEntry, PcrEventLog};
use crate::pcr::{Pcr, PcrIndex};

fn wired_bank(algorithm: DigestAlgorithm) -> Result<DigestAlgorithm, ModelError> {
    if algorithm.is_pcr_bank() {
        Ok(algorithm)
    } else {
        error!("Unsupported PCR bank: {}", algorithm);
        Err(ModelError::UnsupportedAlgorithm(algorithm))
    }
}

pub struct PcrFactory;

impl PcrFactory {
    /// Build a PCR from a hex value.
    ///
    /// A well-formed value of the wrong length still produces a PCR; the
    /// mismatch is reported through [`Pcr::faults`].
    ///
    /// # Errors
    ///
    /// * `ModelError::UnsupportedAlgorithm` - If `algorithm` has no wired bank.
    /// * `ModelError::Digest` - If `value` is not hex.
    pub fn new_instance(algorithm: DigestAlgorithm, index: PcrIndex, value: &str) -> Result<Pcr, ModelError> {
        let bank = wired_bank(algorithm)?;
        let digest = Digest::from_hex_unchecked(bank, value)?;
        Ok(Pcr::assemble(Some(index), bank, Some(digest)))
    }

    pub fn new_instance_from_bytes(algorithm: DigestAlgorithm, index: PcrIndex, value: &[u8]) -> Result<Pcr, ModelError> {
        let bank = wired_bank(algorithm)?;
        Ok(Pcr::assemble(Some(index), bank, Some(Digest::from_parts_unchecked(bank, value))))
    }

    /// # Errors
    ///
    /// * `ModelError::UnknownAlgorithm` - If `algorithm` names no known algorithm.
    pub fn new_instance_by_name(algorithm: &str, index: PcrIndex, value: &str) -> Result<Pcr, ModelError> {
        Self::new_instance(DigestAlgorithm::from_name(algorithm)?, index, value)
    }

    pub fn new_instance_from_bytes_by_name(algorithm: &str, index: PcrIndex, value: &[u8]) -> Result<Pcr, ModelError> {
        Self::new_instance_from_bytes(DigestAlgorithm::from_name(algorithm)?, index, value)
    }
}

pub struct PcrEventLogFactory;

impl PcrEventLogFactory {
    pub fn new_instance(
        bank: DigestAlgorithm,
        index: PcrIndex,
        events: Vec<MeasurementEntry>,
    ) -> Result<PcrEventLog, ModelError> {
        PcrEventLog::new(wired_bank(bank)?, index, events)
    }

    pub fn new_instance_by_name(
        bank: &str,
        index: PcrIndex,
        events: Vec<MeasurementEntry>,
    ) -> Result<PcrEventLog, ModelError> {
        Self::new_instance(DigestAlgorithm::from_name(bank)?, index, events)
    }
}
