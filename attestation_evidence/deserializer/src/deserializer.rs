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

//! Manifest and measurement tree deserializer.
//!
//! Every child of the top-level object is classified by its field name,
//! annotated with a `type` discriminator and decoded through serde into a
//! [`MeasurementNode`]. The top-level object itself decodes into a
//! [`TreeHeader`].

use evidence_model::{Digest, DigestAlgorithm, Manifest, Measurement, MeasurementNode, NodeKind, TreeHeader};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::audit::{self, Decoded};
use crate::config::{CumulativeHashPolicy, ParserConfig};
use crate::error::ParseError;
use crate::field::{classify_children, ChildField, FieldKind};
use crate::raw::RawNode;
use crate::wire;

/// Which document a raw tree is decoded as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKind {
    Manifest,
    Measurement,
}

impl TreeKind {
    /// Value injected under `type` before decoding a child
    pub fn discriminator(self, kind: NodeKind) -> &'static str {
        match (self, kind) {
            (TreeKind::Manifest, NodeKind::Directory) => "dir",
            (TreeKind::Manifest, NodeKind::File) => "file",
            (TreeKind::Manifest, NodeKind::Symlink) => "symlink",
            (TreeKind::Measurement, NodeKind::Directory) => "directoryMeasurementType",
            (TreeKind::Measurement, NodeKind::File) => "fileMeasurementType",
            (TreeKind::Measurement, NodeKind::Symlink) => "symlinkMeasurementType",
        }
    }

    fn name(self) -> &'static str {
        match self {
            TreeKind::Manifest => "manifest",
            TreeKind::Measurement => "measurement",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum NodeWire {
    #[serde(rename = "dir", alias = "directoryMeasurementType")]
    Directory(NodeFields),
    #[serde(rename = "file", alias = "fileMeasurementType")]
    File(NodeFields),
    #[serde(rename = "symlink", alias = "symlinkMeasurementType")]
    Symlink(NodeFields),
}

impl NodeWire {
    fn into_parts(self) -> (NodeKind, NodeFields) {
        match self {
            NodeWire::Directory(fields) => (NodeKind::Directory, fields),
            NodeWire::File(fields) => (NodeKind::File, fields),
            NodeWire::Symlink(fields) => (NodeKind::Symlink, fields),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NodeFields {
    #[serde(rename = "Path", alias = "path", default)]
    path: String,
    #[serde(default)]
    value: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct HeaderWire {
    #[serde(rename = "Label", alias = "label", default)]
    label: Option<String>,
    #[serde(rename = "Uuid", alias = "uuid", default)]
    uuid: Option<String>,
    #[serde(rename = "DigestAlg", alias = "digestAlg", default)]
    digest_alg: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

/// Keep scalar attributes only; nested content is not metadata.
fn scalar_attributes(extra: BTreeMap<String, Value>) -> BTreeMap<String, String> {
    extra
        .into_iter()
        .filter(|(key, _)| !key.is_empty())
        .filter_map(|(key, value)| match value {
            Value::String(text) => Some((key, text)),
            _ => None,
        })
        .collect()
}

/// A key that carries element text rather than a named attribute
fn is_unlabeled(key: &str) -> bool {
    key.is_empty() || key.bytes().all(|b| b.is_ascii_digit())
}

/// Build the decode input for one child without touching the raw tree.
fn annotate(tree: TreeKind, kind: NodeKind, child: &RawNode) -> Result<Value, ParseError> {
    let wrapped;
    let entries = match child {
        RawNode::Object(entries) => entries.as_slice(),
        RawNode::Scalar(_) if tree == TreeKind::Manifest => {
            return Err(ParseError::MalformedPayload(format!(
                "{} entry of manifest must carry attributes, found bare text",
                kind
            )));
        }
        RawNode::Scalar(_) => {
            wrapped = [(String::new(), child.clone())];
            &wrapped[..]
        }
        RawNode::Null | RawNode::Array(_) => {
            return Err(ParseError::MalformedPayload(format!(
                "{} entry of {} is not an object",
                kind,
                tree.name()
            )));
        }
    };

    let mut map = Map::new();
    map.insert("type".to_string(), Value::String(tree.discriminator(kind).to_string()));
    for (key, value) in entries {
        if key == "type" {
            continue;
        }
        let key = match tree {
            TreeKind::Measurement if is_unlabeled(key) => "value",
            _ => key.as_str(),
        };
        map.insert(key.to_string(), value.to_json_value());
    }
    Ok(Value::Object(map))
}

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, ParseError> {
    serde_json::from_value(value).map_err(|e| ParseError::MalformedPayload(format!("Failed to decode {}: {}", what, e)))
}

/// Resolves the algorithm of node digests for one document
struct AlgorithmResolver {
    declared: Option<DigestAlgorithm>,
    fallback: DigestAlgorithm,
}

impl AlgorithmResolver {
    fn digest(&self, text: &str) -> Result<Option<Digest>, ParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let bytes = hex::decode(text)
            .map_err(|e| ParseError::MalformedPayload(format!("Digest {} is not valid hex: {}", text, e)))?;
        let algorithm = self
            .declared
            .or_else(|| DigestAlgorithm::from_length(bytes.len()))
            .unwrap_or(self.fallback);
        Ok(Some(Digest::from_parts_unchecked(algorithm, bytes)))
    }
}

fn cumulative_hash_text(node: &RawNode) -> Result<&str, ParseError> {
    let text = match node {
        RawNode::Scalar(text) => Some(text.as_str()),
        RawNode::Object(_) => node.get("").or_else(|| node.get("value")).and_then(RawNode::as_scalar),
        RawNode::Null | RawNode::Array(_) => None,
    };
    text.ok_or_else(|| ParseError::MalformedPayload("CumulativeHash must hold a digest".to_string()))
}

struct DecodedTree {
    header: TreeHeader,
    nodes: Vec<MeasurementNode>,
    cumulative_hash: Option<Digest>,
}

/// Input syntax of an evidence document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Json,
    Xml,
}

impl PayloadFormat {
    /// Sniff the format from the first significant character.
    ///
    /// # Errors
    ///
    /// * `ParseError::MalformedPayload` - If the text is neither JSON object nor XML.
    pub fn detect(text: &str) -> Result<Self, ParseError> {
        match text.trim_start_matches('\u{feff}').trim_start().chars().next() {
            Some('<') => Ok(PayloadFormat::Xml),
            Some('{') => Ok(PayloadFormat::Json),
            Some(other) => Err(ParseError::MalformedPayload(format!(
                "Unrecognised evidence format starting with '{}'",
                other
            ))),
            None => Err(ParseError::MalformedPayload("Evidence payload is empty".to_string())),
        }
    }
}

/// Decoder for manifest and measurement documents.
///
/// Holds only configuration; one instance can serve any number of parses.
#[derive(Debug, Clone, Default)]
pub struct TreeDeserializer {
    config: ParserConfig,
}

impl TreeDeserializer {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn check_size(&self, text: &str) -> Result<(), ParseError> {
        if text.len() > self.config.max_payload_bytes {
            return Err(ParseError::PayloadTooLarge {
                size: text.len(),
                limit: self.config.max_payload_bytes,
            });
        }
        Ok(())
    }

    fn read(&self, text: &str, format: PayloadFormat) -> Result<RawNode, ParseError> {
        self.check_size(text)?;
        match format {
            PayloadFormat::Json => RawNode::from_json(text),
            PayloadFormat::Xml => RawNode::from_xml(text),
        }
    }

    pub fn manifest_from_json(&self, text: &str) -> Result<Decoded<Manifest>, ParseError> {
        self.decode_manifest(&self.read(text, PayloadFormat::Json)?)
    }

    pub fn manifest_from_xml(&self, text: &str) -> Result<Decoded<Manifest>, ParseError> {
        self.decode_manifest(&self.read(text, PayloadFormat::Xml)?)
    }

    pub fn measurement_from_json(&self, text: &str) -> Result<Decoded<Measurement>, ParseError> {
        self.decode_measurement(&self.read(text, PayloadFormat::Json)?)
    }

    pub fn measurement_from_xml(&self, text: &str) -> Result<Decoded<Measurement>, ParseError> {
        self.decode_measurement(&self.read(text, PayloadFormat::Xml)?)
    }

    /// Parse a manifest in either format
    pub fn manifest_from_str(&self, text: &str) -> Result<Decoded<Manifest>, ParseError> {
        self.decode_manifest(&self.read(text, PayloadFormat::detect(text)?)?)
    }

    /// Parse a measurement in either format
    pub fn measurement_from_str(&self, text: &str) -> Result<Decoded<Measurement>, ParseError> {
        self.decode_measurement(&self.read(text, PayloadFormat::detect(text)?)?)
    }

    /// Decode an already parsed tree as a manifest.
    ///
    /// # Errors
    ///
    /// * `ParseError::MalformedPayload` - If an entry or the header cannot be decoded.
    /// * `ParseError::Model` - If `DigestAlg` names an unknown algorithm.
    pub fn decode_manifest(&self, raw: &RawNode) -> Result<Decoded<Manifest>, ParseError> {
        let tree = self.decode_tree(TreeKind::Manifest, raw)?;
        let manifest = Manifest::new(tree.header, tree.nodes);
        debug!("Decoded manifest with {} entries", manifest.nodes().len());
        let audit = audit::trace(self.config.audit_trace, "manifest", || {
            wire::manifest_to_xml(&manifest).map_err(|e| e.to_string())
        });
        Ok(Decoded { value: manifest, audit })
    }

    /// Decode an already parsed tree as a measurement.
    ///
    /// # Errors
    ///
    /// * `ParseError::MalformedPayload` - If an entry, its digest or the header cannot be decoded.
    /// * `ParseError::DuplicateCumulativeHash` - If several CumulativeHash fields appear under `Reject`.
    /// * `ParseError::Model` - If `DigestAlg` names an unknown algorithm.
    pub fn decode_measurement(&self, raw: &RawNode) -> Result<Decoded<Measurement>, ParseError> {
        let tree = self.decode_tree(TreeKind::Measurement, raw)?;
        let measurement = Measurement::new(tree.header, tree.nodes, tree.cumulative_hash);
        debug!("Decoded measurement with {} entries", measurement.nodes().len());
        let audit = audit::trace(self.config.audit_trace, "measurement", || {
            wire::measurement_to_xml(&measurement).map_err(|e| e.to_string())
        });
        Ok(Decoded { value: measurement, audit })
    }

    fn decode_tree(&self, tree: TreeKind, raw: &RawNode) -> Result<DecodedTree, ParseError> {
        if raw.entries().is_none() {
            return Err(ParseError::MalformedPayload(format!("Top-level {} is not an object", tree.name())));
        }

        let header = decode_header(raw)?;
        let resolver = AlgorithmResolver {
            declared: header.digest_algorithm()?,
            fallback: self.config.default_algorithm,
        };

        let mut nodes = Vec::new();
        let mut cumulative_hashes = Vec::new();
        for child in classify_children(raw) {
            let (kind, node) = match child {
                ChildField::Directory(node) => (NodeKind::Directory, node),
                ChildField::File(node) => (NodeKind::File, node),
                ChildField::Symlink(node) => (NodeKind::Symlink, node),
                ChildField::CumulativeHash(node) => {
                    cumulative_hashes.push(node);
                    continue;
                }
                ChildField::Unrecognized(_) => continue,
            };
            nodes.push(decode_node(tree, kind, node, &resolver)?);
        }

        let cumulative_hash = match tree {
            TreeKind::Manifest => None,
            TreeKind::Measurement => self.select_cumulative_hash(&cumulative_hashes, &resolver)?,
        };
        Ok(DecodedTree { header, nodes, cumulative_hash })
    }

    fn select_cumulative_hash(
        &self,
        candidates: &[&RawNode],
        resolver: &AlgorithmResolver,
    ) -> Result<Option<Digest>, ParseError> {
        if candidates.len() > 1 {
            match self.config.cumulative_hash_policy {
                CumulativeHashPolicy::Reject => return Err(ParseError::DuplicateCumulativeHash(candidates.len())),
                CumulativeHashPolicy::LastWins => {
                    warn!("Measurement carries {} CumulativeHash fields, keeping the last", candidates.len());
                }
            }
        }
        match candidates.last() {
            Some(node) => resolver.digest(cumulative_hash_text(node)?),
            None => Ok(None),
        }
    }
}

fn decode_header(raw: &RawNode) -> Result<TreeHeader, ParseError> {
    let wire: HeaderWire = decode(raw.to_json_value(), "evidence header")?;
    let attributes = scalar_attributes(wire.extra)
        .into_iter()
        .filter(|(key, _)| FieldKind::from_field_name(key).is_none())
        .collect();
    Ok(TreeHeader {
        label: wire.label,
        uuid: wire.uuid,
        digest_alg: wire.digest_alg,
        attributes,
    })
}

fn decode_node(
    tree: TreeKind,
    kind: NodeKind,
    child: &RawNode,
    resolver: &AlgorithmResolver,
) -> Result<MeasurementNode, ParseError> {
    let wire: NodeWire = decode(annotate(tree, kind, child)?, &format!("{} entry", kind))?;
    let (decoded_kind, fields) = wire.into_parts();
    let value = match fields.value.as_deref() {
        Some(text) => resolver.digest(text)?,
        None => None,
    };
    if tree == TreeKind::Measurement && value.is_none() {
        return Err(ParseError::MalformedPayload(format!(
            "{} entry {} of measurement has no digest",
            decoded_kind, fields.path
        )));
    }
    Ok(MeasurementNode::new(decoded_kind, fields.path, value, scalar_attributes(fields.extra)))
}

/// Parse a manifest (JSON or XML) with the default configuration
pub fn parse_manifest(text: &str) -> Result<Manifest, ParseError> {
    TreeDeserializer::default().manifest_from_str(text).map(Decoded::into_inner)
}

/// Parse a measurement (JSON or XML) with the default configuration
pub fn parse_measurement(text: &str) -> Result<Measurement, ParseError> {
    TreeDeserializer::default().measurement_from_str(text).map(Decoded::into_inner)
}
