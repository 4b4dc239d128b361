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

mod commands;

use crate::commands::{DocumentKind, EvidenceCommands, OutputFormat};
use clap::Parser;
use evidence_deserializer::{
    manifest_to_json, manifest_to_xml, measurement_to_json, measurement_to_xml, validate_manifest_input,
    validate_measurement_input, ParserConfig, TreeDeserializer,
};
use evidence_model::{Fault, PcrEventLog, PcrFactory, PcrIndex};
use log::info;
use std::error::Error;
use std::fs;
use std::process::ExitCode;

#[derive(Parser)]
#[clap(author, version, about = "Inspect attestation evidence", long_about = None)]
struct Cli {
    /// Parser configuration file (YAML)
    #[clap(short, long)]
    config: Option<String>,

    /// Logging configuration file (YAML); logs go to stderr when absent
    #[clap(long)]
    log_config: Option<String>,

    /// Log level used for stderr logging
    #[clap(long, default_value = "warn")]
    log_level: String,

    #[clap(subcommand)]
    command: EvidenceCommands,
}

fn print_faults(faults: &[Fault]) -> bool {
    for fault in faults {
        println!("fault: {}", fault);
    }
    faults.is_empty()
}

fn deal_evidence_commands(command: &EvidenceCommands, deserializer: &TreeDeserializer) -> Result<bool, Box<dyn Error>> {
    match command {
        EvidenceCommands::Manifest { file, output } => {
            let manifest = deserializer.manifest_from_str(&fs::read_to_string(file)?)?.value;
            info!("Decoded manifest {} with {} entries", file, manifest.nodes().len());
            let text = match output {
                OutputFormat::Json => manifest_to_json(&manifest)?,
                OutputFormat::Xml => manifest_to_xml(&manifest)?,
            };
            println!("{}", text);
            Ok(print_faults(manifest.faults()))
        }
        EvidenceCommands::Measurement { file, output, verify_cumulative_hash } => {
            let measurement = deserializer.measurement_from_str(&fs::read_to_string(file)?)?.value;
            info!("Decoded measurement {} with {} entries", file, measurement.nodes().len());
            let text = match output {
                OutputFormat::Json => measurement_to_json(&measurement)?,
                OutputFormat::Xml => measurement_to_xml(&measurement)?,
            };
            println!("{}", text);
            let mut valid = print_faults(measurement.faults());
            if *verify_cumulative_hash {
                match measurement.cumulative_hash_matches()? {
                    Some(true) => println!("cumulative hash: match"),
                    Some(false) => {
                        println!("cumulative hash: mismatch");
                        valid = false;
                    }
                    None => println!("cumulative hash: not reported"),
                }
            }
            Ok(valid)
        }
        EvidenceCommands::Pcr { bank, index, value } => {
            let pcr = PcrFactory::new_instance_by_name(bank, index.parse::<PcrIndex>()?, value)?;
            println!("{}", pcr);
            println!("{}", serde_json::to_string_pretty(&pcr)?);
            Ok(print_faults(pcr.faults()))
        }
        EvidenceCommands::Replay { file, expected } => {
            let event_log: PcrEventLog = serde_json::from_str(&fs::read_to_string(file)?)?;
            let replayed = event_log.replay()?;
            println!("{}: {}: {}", event_log.pcr_bank(), event_log.pcr_index(), replayed);
            let mut valid = print_faults(event_log.faults());
            if let Some(expected) = expected {
                let pcr = PcrFactory::new_instance(event_log.pcr_bank(), event_log.pcr_index(), expected)?;
                let matched = event_log.matches(&pcr)?;
                println!("event log {}", if matched { "matches" } else { "does not match" });
                valid &= matched;
            }
            Ok(valid)
        }
        EvidenceCommands::Validate { kind, file } => {
            let text = fs::read_to_string(file)?;
            let faults = match kind {
                DocumentKind::Manifest => validate_manifest_input(&text),
                DocumentKind::Measurement => validate_measurement_input(&text),
            };
            Ok(print_faults(&faults))
        }
    }
}

fn run(cli: &Cli) -> Result<bool, Box<dyn Error>> {
    match &cli.log_config {
        Some(path) => common_log::init_with_yaml(path)?,
        None => common_log::init_console(&cli.log_level)?,
    }
    let config = match &cli.config {
        Some(path) => ParserConfig::from_yaml(path)?,
        None => ParserConfig::default(),
    };
    deal_evidence_commands(&cli.command, &TreeDeserializer::new(config))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
