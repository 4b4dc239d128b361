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

//! Gatekeeping checks on raw evidence text.
//!
//! Parse failures are turned into a single fault so that the caller can
//! report them together with the faults of other evidence.

use evidence_model::Fault;
use log::error;

use crate::config::ParserConfig;
use crate::deserializer::TreeDeserializer;
use crate::error::ParseError;

const INVALID_MANIFEST: &str = "Invalid manifest";
const INVALID_MEASUREMENT: &str = "Invalid measurement";

fn quiet_deserializer() -> TreeDeserializer {
    TreeDeserializer::new(ParserConfig { audit_trace: false, ..ParserConfig::default() })
}

fn validate_input<F>(text: &str, description: &str, parse: F) -> Vec<Fault>
where
    F: FnOnce(&TreeDeserializer, &str) -> Result<(), ParseError>,
{
    if text.trim().is_empty() {
        return Vec::new();
    }
    match parse(&quiet_deserializer(), text) {
        Ok(()) => Vec::new(),
        Err(e) => {
            error!("{}: {}", description, e);
            vec![Fault::with_cause(description, e)]
        }
    }
}

/// Check that `text` parses as a manifest. Empty input is not checked.
pub fn validate_manifest_input(text: &str) -> Vec<Fault> {
    validate_input(text, INVALID_MANIFEST, |deserializer, text| {
        deserializer.manifest_from_str(text).map(|_| ())
    })
}

/// Check that `text` parses as a measurement. Empty input is not checked.
pub fn validate_measurement_input(text: &str) -> Vec<Fault> {
    validate_input(text, INVALID_MEASUREMENT, |deserializer, text| {
        deserializer.measurement_from_str(text).map(|_| ())
    })
}
