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

use evidence_model::ModelError;
use thiserror::Error;

/// Fatal parse failures. No partial tree is ever returned alongside one.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Payload size {size} exceeds {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Found {0} CumulativeHash fields, at most one is allowed")]
    DuplicateCumulativeHash(usize),

    #[error("Failed to encode evidence: {0}")]
    Encode(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Evidence source unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
