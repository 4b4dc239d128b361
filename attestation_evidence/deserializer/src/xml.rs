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

//! XML <-> [`RawNode`] mapping.
//!
//! An element becomes an object whose entries are its attributes, then its
//! child elements in document order, then its text under the blank key `""`.
//! An element with neither attributes nor children collapses to a scalar, so
//! `<CumulativeHash>ab12</CumulativeHash>` reads the same as the JSON
//! `"CumulativeHash": "ab12"`.

use log::debug;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::ParseError;
use crate::raw::RawNode;

/// Deepest element nesting accepted, same as serde_json's recursion limit
pub const MAX_XML_DEPTH: usize = 128;

struct Frame {
    name: String,
    entries: Vec<(String, RawNode)>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart) -> Result<Self, ParseError> {
        let name = utf8(start.local_name().as_ref())?;
        let mut entries = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| malformed(format!("Invalid attribute on <{}>: {}", name, e)))?;
            let key = utf8(attribute.key.as_ref())?;
            let value = attribute
                .unescape_value()
                .map_err(|e| malformed(format!("Invalid attribute value on <{}>: {}", name, e)))?;
            entries.push((key, RawNode::Scalar(value.into_owned())));
        }
        Ok(Self { name, entries, text: String::new() })
    }

    fn close(self) -> (String, RawNode) {
        if self.entries.is_empty() {
            return (self.name, RawNode::Scalar(self.text));
        }
        let mut entries = self.entries;
        if !self.text.is_empty() {
            entries.push((String::new(), RawNode::Scalar(self.text)));
        }
        (self.name, RawNode::Object(entries))
    }
}

fn malformed(message: String) -> ParseError {
    ParseError::MalformedPayload(message)
}

fn utf8(bytes: &[u8]) -> Result<String, ParseError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| malformed(format!("Invalid UTF-8 in XML name: {}", e)))
}

/// Parse an XML document into `(root element name, root object)`
pub fn read_document(text: &str) -> Result<(String, RawNode), ParseError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, RawNode)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed(format!("Failed to parse XML evidence at {}: {}", reader.buffer_position(), e)))?;
        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(malformed("XML evidence has more than one root element".to_string()));
                }
                if stack.len() >= MAX_XML_DEPTH {
                    return Err(malformed(format!("XML evidence nests deeper than {} elements", MAX_XML_DEPTH)));
                }
                stack.push(Frame::open(&start)?);
            }
            Event::Empty(start) => {
                let closed = Frame::open(&start)?.close();
                attach(&mut stack, &mut root, closed)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| malformed("Unexpected closing tag in XML evidence".to_string()))?;
                attach(&mut stack, &mut root, frame.close())?;
            }
            Event::Text(content) => {
                let unescaped = content
                    .unescape()
                    .map_err(|e| malformed(format!("Invalid XML text: {}", e)))?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&unescaped);
                }
            }
            Event::CData(content) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&utf8(&content.into_inner())?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(malformed("XML evidence ended inside an open element".to_string()));
    }
    let (name, node) = root.ok_or_else(|| malformed("XML evidence has no root element".to_string()))?;
    let node = match node {
        RawNode::Scalar(text) if text.is_empty() => RawNode::Object(Vec::new()),
        RawNode::Scalar(text) => RawNode::Object(vec![(String::new(), RawNode::Scalar(text))]),
        other => other,
    };
    Ok((name, node))
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<(String, RawNode)>,
    closed: (String, RawNode),
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.entries.push(closed);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(closed);
            Ok(())
        }
        None => Err(malformed("XML evidence has more than one root element".to_string())),
    }
}

/// Element to be written by [`write_document`]
#[derive(Debug, Default)]
pub(crate) struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }
}

/// Whether `name` can stand as an attribute name in the written document
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == ':' => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
        }
        _ => false,
    }
}

pub(crate) fn write_document(root: &XmlElement) -> Result<String, String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| e.to_string())?;
    write_element(&mut writer, root)?;
    String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), String> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        if !is_xml_name(key) {
            debug!("Skipping attribute {:?} of <{}>, not an XML name", key, element.name);
            continue;
        }
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.text.is_none() && element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(|e| e.to_string());
    }

    writer.write_event(Event::Start(start)).map_err(|e| e.to_string())?;
    if let Some(text) = &element.text {
        writer.write_event(Event::Text(BytesText::new(text))).map_err(|e| e.to_string())?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| e.to_string())
}
