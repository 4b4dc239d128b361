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

//! Seam to whatever fetches evidence from an attested host.

use async_trait::async_trait;
use evidence_model::{Manifest, Measurement};
use log::info;

use crate::audit::Decoded;
use crate::deserializer::TreeDeserializer;
use crate::error::TransportError;

/// Source of raw evidence documents
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    /// Measurement document (XML or JSON text)
    async fn fetch_measurement(&self) -> Result<String, TransportError>;

    /// Manifest document the measurement is checked against
    async fn fetch_manifest(&self) -> Result<String, TransportError>;

    /// DER encoded AIK certificate of the host
    async fn fetch_aik_certificate(&self) -> Result<Vec<u8>, TransportError>;
}

/// Fetch and decode a measurement.
///
/// # Errors
///
/// * `TransportError::Unavailable` - If the source cannot deliver the document.
/// * `TransportError::Parse` - If the delivered document does not decode.
pub async fn collect_measurement(
    source: &dyn EvidenceSource,
    deserializer: &TreeDeserializer,
) -> Result<Decoded<Measurement>, TransportError> {
    let text = source.fetch_measurement().await?;
    info!("Fetched measurement, {} bytes", text.len());
    Ok(deserializer.measurement_from_str(&text)?)
}

/// Fetch and decode a manifest.
///
/// # Errors
///
/// * `TransportError::Unavailable` - If the source cannot deliver the document.
/// * `TransportError::Parse` - If the delivered document does not decode.
pub async fn collect_manifest(
    source: &dyn EvidenceSource,
    deserializer: &TreeDeserializer,
) -> Result<Decoded<Manifest>, TransportError> {
    let text = source.fetch_manifest().await?;
    info!("Fetched manifest, {} bytes", text.len());
    Ok(deserializer.manifest_from_str(&text)?)
}
