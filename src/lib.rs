// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Paket Bootstrapper Library
//!
//! Keeps `paket.exe` present and current next to the bootstrapper: reads the
//! installed version, resolves the wanted version from the GitHub release
//! feed (explicit, latest stable, or latest prerelease), and downloads the
//! release asset when the installed copy is missing or stale.

pub mod config;
pub mod download;
pub mod error;
pub mod feed;
pub mod local;
pub mod pe_version;
pub mod proxy;
pub mod request;
pub mod resolver;
pub mod updater;
pub mod version;

// Re-export commonly used items at the crate root for convenience
pub use config::{ARTIFACT_NAME, BootstrapConfig, RELEASES_API_URL, RELEASES_BASE_URL};
pub use error::BootstrapError;
pub use feed::{HttpReleaseFeed, ReleaseFeed, ReleaseFeedEntry, parse_releases};
pub use local::{FileVersionReader, LocalArtifact, VersionProbe};
pub use proxy::ProxyConfig;
pub use request::{ReleaseChannel, UpdateRequest};
pub use resolver::{resolve, select_release};
pub use updater::{UpdateOutcome, Updater};
pub use version::{is_prerelease, is_up_to_date};
