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

use clap::{Subcommand, ValueEnum};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Xml,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DocumentKind {
    Manifest,
    Measurement,
}

#[derive(Subcommand)]
pub enum EvidenceCommands {
    /// Decode a manifest and print it in wire form
    Manifest {
        /// Manifest file, XML or JSON
        #[clap(short, long, required = true)]
        file: String,

        /// Output format
        #[clap(short, long, value_enum, default_value = "json")]
        output: OutputFormat,
    },

    /// Decode a measurement and print it in wire form
    Measurement {
        /// Measurement file, XML or JSON
        #[clap(short, long, required = true)]
        file: String,

        /// Output format
        #[clap(short, long, value_enum, default_value = "json")]
        output: OutputFormat,

        /// Recompute the cumulative hash and compare it with the reported one
        #[clap(long)]
        verify_cumulative_hash: bool,
    },

    /// Build a PCR value and report its faults
    Pcr {
        /// PCR bank, e.g. SHA1 or SHA256
        #[clap(short, long, required = true)]
        bank: String,

        /// PCR index, 0-23
        #[clap(short, long, required = true)]
        index: String,

        /// Hex encoded PCR value
        #[clap(short, long, required = true)]
        value: String,
    },

    /// Replay a PCR event log and print the expected PCR value
    Replay {
        /// Event log file (JSON)
        #[clap(short, long, required = true)]
        file: String,

        /// Reported PCR value to compare with the replayed one
        #[clap(short, long)]
        expected: Option<String>,
    },

    /// Check that a document parses, printing any faults
    Validate {
        #[clap(short, long, required = true, value_enum)]
        kind: DocumentKind,

        #[clap(short, long, required = true)]
        file: String,
    },
}
