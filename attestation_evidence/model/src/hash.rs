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

//! TPM-style hash chaining: `new = H(current || measurement)`.

use openssl::hash::Hasher;

use crate::algorithm::DigestAlgorithm;
use crate::digest::Digest;
use crate::error::ModelError;

/// Extend `current` with `measurement` using `algorithm`
///
/// # Errors
///
/// * `ModelError::Hash` - If OpenSSL fails to create, update or finalize the hasher.
pub fn extend(algorithm: DigestAlgorithm, current: &[u8], measurement: &[u8]) -> Result<Vec<u8>, ModelError> {
    let mut hasher = Hasher::new(algorithm.message_digest())
        .map_err(|e| ModelError::Hash(format!("Failed to create hasher: {}", e)))?;

    hasher
        .update(current)
        .map_err(|e| ModelError::Hash(format!("Failed to update hash with current value: {}", e)))?;

    hasher
        .update(measurement)
        .map_err(|e| ModelError::Hash(format!("Failed to update hash with measurement: {}", e)))?;

    let digest = hasher
        .finish()
        .map_err(|e| ModelError::Hash(format!("Failed to finalize hash: {}", e)))?;

    Ok(digest.to_vec())
}

/// Replay a sequence of measurements starting from the all-zero register
pub fn replay<'a, I>(algorithm: DigestAlgorithm, measurements: I) -> Result<Digest, ModelError>
where
    I: IntoIterator<Item = &'a Digest>,
{
    let mut current = Digest::zero(algorithm).to_bytes();
    for measurement in measurements {
        current = extend(algorithm, &current, measurement.as_bytes())?;
    }
    Ok(Digest::new(algorithm, current)?)
}
