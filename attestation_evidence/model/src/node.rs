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

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::digest::Digest;
use crate::fault::{Fault, Validate};

pub const DEFAULT_INCLUDE: &str = ".*";
pub const DEFAULT_EXCLUDE: &str = "";
pub const DEFAULT_FILTER_TYPE: &str = "regex";

/// Filesystem entry kinds found in manifests and measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
    Symlink,
}

impl NodeKind {
    /// Element / field name used on the wire
    pub fn field_name(self) -> &'static str {
        match self {
            NodeKind::Directory => "Dir",
            NodeKind::File => "File",
            NodeKind::Symlink => "Symlink",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// A single manifest or measurement entry.
///
/// Manifest entries usually carry no digest; measurement entries always do.
/// Wire attributes other than the path and digest are kept in `metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MeasurementNode {
    kind: NodeKind,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Digest>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
    #[serde(skip)]
    faults: Vec<Fault>,
}

impl MeasurementNode {
    pub fn new(
        kind: NodeKind,
        path: impl Into<String>,
        value: Option<Digest>,
        metadata: BTreeMap<String, String>,
    ) -> Self {
        let mut node = Self { kind, path: path.into(), value, metadata, faults: Vec::new() };
        node.faults = node.validate();
        node
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn value(&self) -> Option<&Digest> {
        self.value.as_ref()
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.metadata.get(name).map(String::as_str)
    }

    /// Include filter for directory entries, `.*` when not given
    pub fn include(&self) -> &str {
        self.attribute("Include").unwrap_or(DEFAULT_INCLUDE)
    }

    pub fn exclude(&self) -> &str {
        self.attribute("Exclude").unwrap_or(DEFAULT_EXCLUDE)
    }

    pub fn filter_type(&self) -> &str {
        self.attribute("FilterType").unwrap_or(DEFAULT_FILTER_TYPE)
    }

    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    pub fn is_valid(&self) -> bool {
        self.faults.is_empty()
    }
}

impl Validate for MeasurementNode {
    fn validate(&self) -> Vec<Fault> {
        let mut faults = Vec::new();
        if self.path.trim().is_empty() {
            faults.push(Fault::with_cause("Path is empty", self.kind));
        }
        if let Some(digest) = &self.value {
            if !digest.is_valid() {
                faults.push(Fault::with_cause(
                    format!("{} Digest is invalid", digest.algorithm()),
                    &self.path,
                ));
            }
        }
        faults
    }
}
