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

//! Manifest and measurement containers.
//!
//! Node order is wire order. It is significant for cumulative-hash
//! recomputation, so the node list is a sequence, never a set.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::algorithm::DigestAlgorithm;
use crate::digest::Digest;
use crate::error::ModelError;
use crate::fault::{Fault, Validate};
use crate::hash;
use crate::node::MeasurementNode;

/// Container-level attributes of a manifest or measurement document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TreeHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest_alg: Option<String>,
    /// Every other scalar attribute (namespace, version, ...)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl TreeHeader {
    /// Algorithm named by `DigestAlg`, `None` when the attribute is absent.
    ///
    /// # Errors
    ///
    /// * `ModelError::UnknownAlgorithm` - If the attribute names no known algorithm.
    pub fn digest_algorithm(&self) -> Result<Option<DigestAlgorithm>, ModelError> {
        self.digest_alg.as_deref().map(DigestAlgorithm::from_name).transpose()
    }
}

fn node_faults(nodes: &[MeasurementNode]) -> impl Iterator<Item = Fault> + '_ {
    nodes.iter().flat_map(|node| {
        node.faults()
            .iter()
            .map(move |fault| Fault::with_cause(fault.description.clone(), node.path()))
    })
}

/// Declared set of filesystem entries for a workload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Manifest {
    header: TreeHeader,
    nodes: Vec<MeasurementNode>,
    #[serde(skip)]
    faults: Vec<Fault>,
}

impl Manifest {
    pub fn new(header: TreeHeader, nodes: Vec<MeasurementNode>) -> Self {
        let mut manifest = Self { header, nodes, faults: Vec::new() };
        manifest.faults = manifest.validate();
        manifest
    }

    pub fn header(&self) -> &TreeHeader {
        &self.header
    }

    pub fn nodes(&self) -> &[MeasurementNode] {
        &self.nodes
    }

    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    pub fn is_valid(&self) -> bool {
        self.faults.is_empty()
    }
}

impl Validate for Manifest {
    fn validate(&self) -> Vec<Fault> {
        node_faults(&self.nodes).collect()
    }
}

/// Runtime-observed filesystem entries and their digests
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Measurement {
    header: TreeHeader,
    nodes: Vec<MeasurementNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cumulative_hash: Option<Digest>,
    #[serde(skip)]
    faults: Vec<Fault>,
}

impl Measurement {
    pub fn new(header: TreeHeader, nodes: Vec<MeasurementNode>, cumulative_hash: Option<Digest>) -> Self {
        let mut measurement = Self { header, nodes, cumulative_hash, faults: Vec::new() };
        measurement.faults = measurement.validate();
        measurement
    }

    pub fn header(&self) -> &TreeHeader {
        &self.header
    }

    pub fn nodes(&self) -> &[MeasurementNode] {
        &self.nodes
    }

    /// Reported cumulative hash; older payloads carry none
    pub fn cumulative_hash(&self) -> Option<&Digest> {
        self.cumulative_hash.as_ref()
    }

    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    pub fn is_valid(&self) -> bool {
        self.faults.is_empty()
    }

    /// Extend every node digest, in order, starting from the all-zero value.
    ///
    /// # Errors
    ///
    /// * `ModelError::Hash` - If a node has no digest or hashing fails.
    pub fn recompute_cumulative_hash(&self, algorithm: DigestAlgorithm) -> Result<Digest, ModelError> {
        let digests = self
            .nodes
            .iter()
            .map(|node| {
                node.value()
                    .ok_or_else(|| ModelError::Hash(format!("Measurement node {} has no digest", node.path())))
            })
            .collect::<Result<Vec<_>, _>>()?;
        hash::replay(algorithm, digests)
    }

    /// Compare the reported cumulative hash with the recomputed one.
    /// `None` when the payload carried no cumulative hash.
    pub fn cumulative_hash_matches(&self) -> Result<Option<bool>, ModelError> {
        match &self.cumulative_hash {
            None => Ok(None),
            Some(reported) => {
                let recomputed = self.recompute_cumulative_hash(reported.algorithm())?;
                Ok(Some(&recomputed == reported))
            }
        }
    }
}

impl Validate for Measurement {
    fn validate(&self) -> Vec<Fault> {
        let mut faults: Vec<Fault> = node_faults(&self.nodes).collect();
        faults.extend(
            self.nodes
                .iter()
                .filter(|node| node.value().is_none())
                .map(|node| Fault::with_cause("Measurement node has no digest", node.path())),
        );
        if let Some(hash) = &self.cumulative_hash {
            if !hash.is_valid() {
                faults.push(Fault::with_cause(
                    "Cumulative hash is invalid",
                    format!("{} expects {} bytes, found {}", hash.algorithm(), hash.algorithm().length(), hash.as_bytes().len()),
                ));
            }
        }
        faults
    }
}
