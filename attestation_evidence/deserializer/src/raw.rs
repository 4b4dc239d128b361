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

//! Untyped, ordered evidence tree.
//!
//! Objects are kept as `(key, value)` lists rather than maps: field order is
//! significant and the same key (`File`, `Dir`, ...) may repeat.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::ParseError;
use crate::xml;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawNode {
    Null,
    Scalar(String),
    Array(Vec<RawNode>),
    Object(Vec<(String, RawNode)>),
}

impl RawNode {
    /// Parse JSON text, keeping duplicate keys in order
    pub fn from_json(text: &str) -> Result<Self, ParseError> {
        serde_json::from_str(text)
            .map_err(|e| ParseError::MalformedPayload(format!("Failed to parse JSON evidence: {}", e)))
    }

    /// Parse XML text; the root element becomes the top-level object
    pub fn from_xml(text: &str) -> Result<Self, ParseError> {
        xml::read_document(text).map(|(_, node)| node)
    }

    pub fn entries(&self) -> Option<&[(String, RawNode)]> {
        match self {
            RawNode::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&RawNode> {
        self.entries()?.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            RawNode::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to a `serde_json::Value` for typed decoding.
    ///
    /// Scalars become strings. A repeated key keeps its last value; callers
    /// that care about repeats walk [`RawNode::entries`] instead.
    pub fn to_json_value(&self) -> Value {
        match self {
            RawNode::Null => Value::Null,
            RawNode::Scalar(s) => Value::String(s.clone()),
            RawNode::Array(items) => Value::Array(items.iter().map(RawNode::to_json_value).collect()),
            RawNode::Object(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json_value());
                }
                Value::Object(map)
            }
        }
    }
}

struct RawNodeVisitor;

impl<'de> Visitor<'de> for RawNodeVisitor {
    type Value = RawNode;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<RawNode, E> {
        Ok(RawNode::Scalar(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawNode, E> {
        Ok(RawNode::Scalar(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawNode, E> {
        Ok(RawNode::Scalar(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawNode, E> {
        Ok(RawNode::Scalar(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RawNode, E> {
        Ok(RawNode::Scalar(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RawNode, E> {
        Ok(RawNode::Scalar(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawNode, E> {
        Ok(RawNode::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<RawNode, E> {
        Ok(RawNode::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<RawNode, D::Error> {
        RawNode::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawNode, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element::<RawNode>()? {
            items.push(item);
        }
        Ok(RawNode::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawNode, A::Error> {
        let mut entries = Vec::new();
        while let Some((key, value)) = map.next_entry::<String, RawNode>()? {
            entries.push((key, value));
        }
        Ok(RawNode::Object(entries))
    }
}

impl<'de> Deserialize<'de> for RawNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawNodeVisitor)
    }
}
