// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Paket Bootstrapper - Main Application
//!
//! Makes sure `paket.exe` sits next to this executable in the requested
//! version:
//! - no argument installs the latest stable release
//! - `prerelease` installs the latest release, prereleases included
//! - any other argument installs that exact version
//!
//! The exit code is 1 only when the run failed and no `paket.exe` is left.

use std::process::exit;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use paket_bootstrapper::{BootstrapConfig, UpdateOutcome, UpdateRequest, Updater};

mod cli;

use cli::Cli;

/// Main application entry point
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let request = UpdateRequest::from_arg(cli.target_version.as_deref());
    println!("{}", request.describe());

    let config = match BootstrapConfig::for_running_executable() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            exit(1);
        }
    };

    let outcome = Updater::new(config.clone()).run(&request);

    match &outcome {
        UpdateOutcome::Skipped(version) => {
            println!("{} {version} is up to date.", config.artifact_name);
        }
        UpdateOutcome::Updated(version) => {
            println!("Installed {} {version}.", config.artifact_name);
        }
        UpdateOutcome::Failed(e) => eprintln!("{e}"),
    }

    exit(outcome.exit_code(&config.target));
}

/// Log to stderr; `RUST_LOG` overrides the level chosen by `--verbose`
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "paket_bootstrapper=debug"
    } else {
        "paket_bootstrapper=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
