// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
// CLI argument definitions for paket-bootstrapper
//
// Separated from main.rs so that build.rs can include this file
// to generate the man page via clap_mangen.

use clap::Parser;

/// CLI argument parser
#[derive(Parser)]
#[command(
    name = "paket-bootstrapper",
    version,
    about = "Downloads paket.exe next to this executable and keeps it up to date",
    disable_version_flag = true
)]
#[command(arg(clap::Arg::new("version").long("version").action(clap::ArgAction::Version).help("Print version")))]
pub struct Cli {
    /// Version to install, or "prerelease" for the latest prerelease
    /// (latest stable when omitted)
    #[arg(value_name = "VERSION")]
    pub target_version: Option<String>,

    /// Make the operation more talkative
    #[arg(short, long)]
    pub verbose: bool,
}
