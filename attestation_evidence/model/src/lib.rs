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

//! Attestation evidence model: digests, PCR values, event logs and the typed
//! manifest / measurement trees produced by `evidence_deserializer`.

pub mod algorithm;
pub mod digest;
pub mod error;
pub mod event_log;
pub mod factory;
pub mod fault;
pub mod hash;
pub mod node;
pub mod pcr;
pub mod tree;

pub use algorithm::DigestAlgorithm;
pub use digest::{is_valid, Digest};
pub use error::{DigestError, ModelError};
pub use event_log::{MeasurementEntry, PcrEventLog};
pub use factory::{PcrEventLogFactory, PcrFactory};
pub use fault::{Fault, Validate};
pub use node::{MeasurementNode, NodeKind};
pub use pcr::{Pcr, PcrIndex, PCR_INDEX_MAX, PCR_INDEX_MIN};
pub use tree::{Manifest, Measurement, TreeHeader};
