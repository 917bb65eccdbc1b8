// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! What the caller asked to install
//!
//! A request is built once from the command line argument and never changes
//! during the run.

use std::fmt;

use crate::version::is_prerelease;

/// Argument value selecting the latest release including prereleases
pub const PRERELEASE_KEYWORD: &str = "prerelease";

/// Which releases of the feed may satisfy a "latest" request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseChannel {
    /// Only releases without a prerelease marker
    Stable,
    /// Any release, prereleases included
    Any,
}

impl ReleaseChannel {
    /// Check whether a release tag belongs to this channel
    ///
    /// # Examples
    /// ```
    /// use paket_bootstrapper::ReleaseChannel;
    /// assert!(ReleaseChannel::Stable.accepts("5.1.0"));
    /// assert!(!ReleaseChannel::Stable.accepts("5.1.0-beta1"));
    /// assert!(ReleaseChannel::Any.accepts("5.1.0-beta1"));
    /// ```
    #[must_use]
    pub fn accepts(self, tag: &str) -> bool {
        match self {
            Self::Stable => !is_prerelease(tag),
            Self::Any => true,
        }
    }
}

impl fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable => f.write_str("stable"),
            Self::Any => f.write_str("stable or prerelease"),
        }
    }
}

/// The version the caller wants installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateRequest {
    /// A specific version, used as-is
    Version(String),
    /// The newest release of a channel, looked up in the feed
    Latest(ReleaseChannel),
}

impl UpdateRequest {
    /// Build a request from the optional positional argument
    ///
    /// No argument (or an empty one) asks for the latest stable release,
    /// `"prerelease"` for the latest release of any kind, anything else is
    /// an explicit version. The argument is matched exactly, without
    /// trimming.
    #[must_use]
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("") => Self::Latest(ReleaseChannel::Stable),
            Some(PRERELEASE_KEYWORD) => Self::Latest(ReleaseChannel::Any),
            Some(version) => Self::Version(version.to_string()),
        }
    }

    /// One-line console description of the request
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Version(version) => format!("Version {version} requested."),
            Self::Latest(ReleaseChannel::Stable) => {
                "No version specified. Downloading latest stable.".to_string()
            }
            Self::Latest(ReleaseChannel::Any) => {
                "Prerelease requested. Looking for latest prerelease.".to_string()
            }
        }
    }
}
