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

//! Decoding of manifest and measurement evidence into `evidence_model` trees.

pub mod audit;
pub mod config;
pub mod deserializer;
pub mod error;
pub mod field;
pub mod raw;
pub mod transport;
pub mod validator;
pub mod wire;
mod xml;

pub use audit::{AuditRecord, Decoded};
pub use config::{CumulativeHashPolicy, ParserConfig, DEFAULT_MAX_PAYLOAD_BYTES};
pub use deserializer::{parse_manifest, parse_measurement, PayloadFormat, TreeDeserializer, TreeKind};
pub use error::{ParseError, TransportError};
pub use field::{ChildField, FieldKind};
pub use raw::RawNode;
pub use transport::{collect_manifest, collect_measurement, EvidenceSource};
pub use validator::{validate_manifest_input, validate_measurement_input};
pub use wire::{manifest_to_json, manifest_to_xml, measurement_to_json, measurement_to_xml};
