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

//! Re-serialization of typed trees back to their wire form.
//!
//! The output parses back into an equal tree. JSON output repeats the
//! `Dir` / `File` / `Symlink` keys in node order instead of grouping them.

use evidence_model::{Digest, Manifest, Measurement, MeasurementNode, TreeHeader};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::ParseError;
use crate::xml::{self, XmlElement};

const MANIFEST_ROOT: &str = "Manifest";
const MEASUREMENT_ROOT: &str = "Measurement";
const CUMULATIVE_HASH: &str = "CumulativeHash";

/// Key holding a node digest. Measurements carry it as element text.
#[derive(Clone, Copy)]
enum DigestSlot {
    Attribute,
    Text,
}

impl DigestSlot {
    fn json_key(self) -> &'static str {
        match self {
            DigestSlot::Attribute => "value",
            DigestSlot::Text => "",
        }
    }
}

fn header_attributes(header: &TreeHeader) -> Vec<(&str, &str)> {
    let mut attributes = Vec::new();
    if let Some(label) = &header.label {
        attributes.push(("Label", label.as_str()));
    }
    if let Some(uuid) = &header.uuid {
        attributes.push(("Uuid", uuid.as_str()));
    }
    if let Some(alg) = &header.digest_alg {
        attributes.push(("DigestAlg", alg.as_str()));
    }
    attributes.extend(header.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    attributes
}

struct NodeJson<'a> {
    node: &'a MeasurementNode,
    slot: DigestSlot,
}

impl Serialize for NodeJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("Path", self.node.path())?;
        for (key, value) in self.node.metadata() {
            map.serialize_entry(key, value)?;
        }
        if let Some(digest) = self.node.value() {
            map.serialize_entry(self.slot.json_key(), &digest.to_hex())?;
        }
        map.end()
    }
}

struct TreeJson<'a> {
    header: &'a TreeHeader,
    nodes: &'a [MeasurementNode],
    cumulative_hash: Option<&'a Digest>,
    slot: DigestSlot,
}

impl Serialize for TreeJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in header_attributes(self.header) {
            map.serialize_entry(key, value)?;
        }
        for node in self.nodes {
            map.serialize_entry(node.kind().field_name(), &NodeJson { node, slot: self.slot })?;
        }
        if let Some(hash) = self.cumulative_hash {
            map.serialize_entry(CUMULATIVE_HASH, &hash.to_hex())?;
        }
        map.end()
    }
}

fn to_json(tree: &TreeJson<'_>) -> Result<String, ParseError> {
    serde_json::to_string_pretty(tree).map_err(|e| ParseError::Encode(e.to_string()))
}

/// Manifest as JSON, node digests under `value`
pub fn manifest_to_json(manifest: &Manifest) -> Result<String, ParseError> {
    to_json(&TreeJson {
        header: manifest.header(),
        nodes: manifest.nodes(),
        cumulative_hash: None,
        slot: DigestSlot::Attribute,
    })
}

/// Measurement as JSON, node digests under the blank key
pub fn measurement_to_json(measurement: &Measurement) -> Result<String, ParseError> {
    to_json(&TreeJson {
        header: measurement.header(),
        nodes: measurement.nodes(),
        cumulative_hash: measurement.cumulative_hash(),
        slot: DigestSlot::Text,
    })
}

fn node_element(node: &MeasurementNode, slot: DigestSlot) -> XmlElement {
    let mut element = XmlElement::new(node.kind().field_name()).attribute("Path", node.path());
    for (key, value) in node.metadata() {
        element = element.attribute(key.as_str(), value.as_str());
    }
    match (node.value(), slot) {
        (Some(digest), DigestSlot::Attribute) => element.attribute("value", digest.to_hex()),
        (Some(digest), DigestSlot::Text) => {
            element.text = Some(digest.to_hex());
            element
        }
        (None, _) => element,
    }
}

fn root_element(name: &str, header: &TreeHeader, nodes: &[MeasurementNode], slot: DigestSlot) -> XmlElement {
    let mut root = XmlElement::new(name);
    for (key, value) in header_attributes(header) {
        root = root.attribute(key, value);
    }
    root.children.extend(nodes.iter().map(|node| node_element(node, slot)));
    root
}

pub fn manifest_to_xml(manifest: &Manifest) -> Result<String, ParseError> {
    let root = root_element(MANIFEST_ROOT, manifest.header(), manifest.nodes(), DigestSlot::Attribute);
    xml::write_document(&root).map_err(ParseError::Encode)
}

pub fn measurement_to_xml(measurement: &Measurement) -> Result<String, ParseError> {
    let mut root = root_element(
        MEASUREMENT_ROOT,
        measurement.header(),
        measurement.nodes(),
        DigestSlot::Text,
    );
    if let Some(hash) = measurement.cumulative_hash() {
        let mut element = XmlElement::new(CUMULATIVE_HASH);
        element.text = Some(hash.to_hex());
        root.children.push(element);
    }
    xml::write_document(&root).map_err(ParseError::Encode)
}
