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

use evidence_model::DigestAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Evidence larger than this is rejected before parsing
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 5 * 1024 * 1024;

/// What to do when a measurement carries more than one CumulativeHash
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CumulativeHashPolicy {
    #[default]
    Reject,
    LastWins,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub max_payload_bytes: usize,
    /// Used for node digests when neither `DigestAlg` nor the digest length identifies the algorithm
    pub default_algorithm: DigestAlgorithm,
    pub cumulative_hash_policy: CumulativeHashPolicy,
    /// Re-serialize every decoded tree and log it at debug level
    pub audit_trace: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            default_algorithm: DigestAlgorithm::Sha256,
            cumulative_hash_policy: CumulativeHashPolicy::default(),
            audit_trace: true,
        }
    }
}

impl ParserConfig {
    pub fn from_yaml(path: impl Into<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let config_str = std::fs::read_to_string(path.into())?;
        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: ParserConfig = serde_yaml::from_str(config_str)?;
        Ok(config)
    }
}
