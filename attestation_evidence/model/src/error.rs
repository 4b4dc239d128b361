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

use thiserror::Error;

use crate::algorithm::DigestAlgorithm;

/// Errors raised while building a [`crate::Digest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestError {
    #[error("Invalid {algorithm} digest length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        algorithm: DigestAlgorithm,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid digest encoding: {0}")]
    InvalidEncoding(String),
}

/// Errors raised at the model / factory boundary.
///
/// `UnknownAlgorithm` and `UnsupportedAlgorithm` are deliberately separate:
/// the first means the name matches nothing in the algorithm table, the second
/// means the algorithm is known but has no PCR bank wired to it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Algorithm {0} is not supported for this operation")]
    UnsupportedAlgorithm(DigestAlgorithm),

    #[error("Invalid PCR index: {0}")]
    InvalidPcrIndex(String),

    #[error(transparent)]
    Digest(#[from] DigestError),

    #[error("Hash error: {0}")]
    Hash(String),
}
