// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Error types for a bootstrap run.

use std::path::PathBuf;

use crate::request::ReleaseChannel;

/// Every way a bootstrap run can go wrong.
///
/// All variants except [`BootstrapError::LocalVersionUnreadable`] end the run.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The installed artifact exists but its version could not be read.
    #[error("could not read the version of {}: {reason}", path.display())]
    LocalVersionUnreadable { path: PathBuf, reason: String },

    /// The release feed could not be fetched or parsed.
    #[error("release feed unavailable: {0}")]
    FeedUnavailable(String),

    /// The feed held no release accepted by the requested channel.
    #[error("no {channel} release found in the release feed")]
    NoMatchingRelease { channel: ReleaseChannel },

    /// The artifact download or its installation failed.
    #[error("download from {url} failed: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// The directory of the running executable could not be determined.
    #[error("cannot determine the bootstrapper location: {0}")]
    TargetUnresolved(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, BootstrapError>;
