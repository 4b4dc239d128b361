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

//! Audit trace of decoded documents.
//!
//! The outcome travels next to the decoded value instead of being swallowed,
//! but a failed trace never turns into a parse error.

use log::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditRecord {
    /// Tracing is turned off in the parser configuration
    Disabled,
    /// The re-serialized document was handed to the logger
    Logged,
    /// Re-serialization failed; the parse itself still succeeded
    Failed(String),
}

/// A decoded value together with the outcome of its audit trace
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    pub value: T,
    pub audit: AuditRecord,
}

impl<T> Decoded<T> {
    pub fn into_inner(self) -> T {
        self.value
    }
}

pub(crate) fn trace<F>(enabled: bool, document_kind: &str, render: F) -> AuditRecord
where
    F: FnOnce() -> Result<String, String>,
{
    if !enabled {
        return AuditRecord::Disabled;
    }
    match render() {
        Ok(document) => {
            debug!("TreeDeserializer: Deserialize {} - {}", document_kind, document);
            AuditRecord::Logged
        }
        Err(e) => {
            warn!("Unable to re-serialize {} for audit trace: {}", document_kind, e);
            AuditRecord::Failed(e)
        }
    }
}
