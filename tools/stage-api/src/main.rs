// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Stages an auto-generated client library in this repository.

mod stage;

use clap::Parser;
use stage::UnknownPackage;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// The exit code used when the destination cannot be determined.
const UNKNOWN_PACKAGE_EXIT_CODE: u8 = 32;

#[derive(Parser)]
#[command(version, about = "Stage an auto-generated API", long_about = None)]
struct Cli {
    /// The directory where the auto-generated API was written.
    #[arg(value_parser = parse_src)]
    src: PathBuf,

    /// The directory, relative to the repository root, where the API is
    /// staged. By default it is derived from the package name.
    dest: Option<String>,

    /// The repository root.
    #[arg(long, default_value = ".")]
    repo_root: PathBuf,
}

fn parse_src(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.is_dir() {
        return Err(format!("path not found: {value}"));
    }
    if !path.join(stage::MANIFEST).is_file() {
        return Err(format!(
            "not a Rust package, missing {}: {value}",
            stage::MANIFEST
        ));
    }
    Ok(path)
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> ExitCode {
    match stage::stage_api(&cli.src, cli.dest.as_deref(), &cli.repo_root) {
        Ok(staged) => {
            tracing::info!(dest = %staged.dest.display(), kind = %staged.kind, "staging complete");
            ExitCode::SUCCESS
        }
        Err(e) if e.downcast_ref::<UnknownPackage>().is_some() => {
            tracing::error!(
                "{e}. Is this a valid Google Cloud API package? If it is, provide the dest directory manually."
            );
            ExitCode::from(UNKNOWN_PACKAGE_EXIT_CODE)
        }
        Err(e) => {
            tracing::error!("an error occurred: {e:#}");
            tracing::error!("it is possible that your working area has been left in an inconsistent state");
            ExitCode::FAILURE
        }
    }
}
