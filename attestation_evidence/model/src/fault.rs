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

//! Accumulated validation faults.
//!
//! Evidence objects are never rejected by validation; they are built, checked,
//! and carry whatever faults were found. Callers decide whether any fault makes
//! the evidence untrustworthy.

use serde::Serialize;
use std::fmt;

use crate::algorithm::DigestAlgorithm;
use crate::digest::Digest;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Fault {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl Fault {
    pub fn new(description: impl Into<String>) -> Self {
        Self { description: description.into(), cause: None }
    }

    pub fn with_cause(description: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self { description: description.into(), cause: Some(cause.to_string()) }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {}", self.description, cause),
            None => f.write_str(&self.description),
        }
    }
}

/// Structural checks that produce faults instead of errors.
pub trait Validate {
    /// Run every check and return all faults found, in check order
    fn validate(&self) -> Vec<Fault>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// Digest checks shared by PCRs and event-log entries.
///
/// The tag check and the length check are independent: a digest built through
/// an unchecked constructor can fail either one.
pub(crate) fn check_digest(
    faults: &mut Vec<Fault>,
    digest: &Digest,
    expected: DigestAlgorithm,
    invalid_message: &str,
) {
    if digest.algorithm() != expected {
        faults.push(Fault::with_cause(
            "Digest algorithm does not match bank",
            format!("expected {}, found {}", expected, digest.algorithm()),
        ));
    }
    if !expected.is_valid_bytes(digest.as_bytes()) {
        faults.push(Fault::with_cause(
            invalid_message,
            format!("expected {} bytes, found {}", expected.length(), digest.as_bytes().len()),
        ));
    }
}
