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

//! Field-name classification of top-level children.
//!
//! File, directory and symlink entries share one wire shape; only the name
//! of the wrapping field tells them apart. The name is resolved once, here,
//! through [`FIELD_TABLE`].

use evidence_model::NodeKind;

use crate::raw::RawNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Directory,
    File,
    Symlink,
    CumulativeHash,
}

pub const FIELD_TABLE: [(&str, FieldKind); 4] = [
    ("Dir", FieldKind::Directory),
    ("File", FieldKind::File),
    ("Symlink", FieldKind::Symlink),
    ("CumulativeHash", FieldKind::CumulativeHash),
];

impl FieldKind {
    pub fn from_field_name(name: &str) -> Option<Self> {
        FIELD_TABLE.iter().find(|(field, _)| *field == name).map(|(_, kind)| *kind)
    }

    /// Node kind emitted for this field, `None` for CumulativeHash
    pub fn node_kind(self) -> Option<NodeKind> {
        match self {
            FieldKind::Directory => Some(NodeKind::Directory),
            FieldKind::File => Some(NodeKind::File),
            FieldKind::Symlink => Some(NodeKind::Symlink),
            FieldKind::CumulativeHash => None,
        }
    }
}

/// One classified child of the top-level object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChildField<'a> {
    Directory(&'a RawNode),
    File(&'a RawNode),
    Symlink(&'a RawNode),
    CumulativeHash(&'a RawNode),
    Unrecognized(&'a str),
}

impl<'a> ChildField<'a> {
    pub fn classify(name: &'a str, value: &'a RawNode) -> Self {
        match FieldKind::from_field_name(name) {
            Some(FieldKind::Directory) => ChildField::Directory(value),
            Some(FieldKind::File) => ChildField::File(value),
            Some(FieldKind::Symlink) => ChildField::Symlink(value),
            Some(FieldKind::CumulativeHash) => ChildField::CumulativeHash(value),
            None => ChildField::Unrecognized(name),
        }
    }
}

/// Classify the immediate children of `root` in wire order.
///
/// A recognised field whose value is an array contributes one child per
/// element, in array order.
pub fn classify_children(root: &RawNode) -> Vec<ChildField<'_>> {
    let Some(entries) = root.entries() else {
        return Vec::new();
    };
    let mut children = Vec::with_capacity(entries.len());
    for (name, value) in entries {
        match (FieldKind::from_field_name(name), value) {
            (Some(_), RawNode::Array(items)) => {
                children.extend(items.iter().map(|item| ChildField::classify(name, item)));
            }
            _ => children.push(ChildField::classify(name, value)),
        }
    }
    children
}
