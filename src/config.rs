// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Release endpoints and the local target path
//!
//! The bootstrapper reads no configuration files. The defaults below are the
//! fixed Paket release locations; library callers may override the
//! endpoints, which is how the tests point the updater at a mock server.

use std::path::{Path, PathBuf};

use crate::error::{BootstrapError, Result};

/// GitHub API endpoint listing releases, newest first
pub const RELEASES_API_URL: &str = "https://api.github.com/repos/fsprojects/Paket/releases";

/// Base URL that release assets are downloaded from
pub const RELEASES_BASE_URL: &str = "https://github.com/fsprojects/Paket/releases";

/// File name of the artifact, both as release asset and on disk
pub const ARTIFACT_NAME: &str = "paket.exe";

/// `User-Agent` sent with every request (the GitHub API rejects requests without one)
pub const USER_AGENT: &str = concat!("paket-bootstrapper/", env!("CARGO_PKG_VERSION"));

/// Where releases come from and where the artifact goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Release feed URL
    pub releases_url: String,
    /// Base URL of release downloads
    pub releases_base: String,
    /// Asset file name
    pub artifact_name: String,
    /// Local path of the installed artifact
    pub target: PathBuf,
}

impl BootstrapConfig {
    /// Default endpoints with the artifact placed in `dir`
    #[must_use]
    pub fn in_directory(dir: &Path) -> Self {
        Self {
            releases_url: RELEASES_API_URL.to_string(),
            releases_base: RELEASES_BASE_URL.to_string(),
            artifact_name: ARTIFACT_NAME.to_string(),
            target: dir.join(ARTIFACT_NAME),
        }
    }

    /// Default endpoints with the artifact beside the running executable
    ///
    /// # Errors
    /// Returns [`BootstrapError::TargetUnresolved`] if the executable path
    /// or its parent directory cannot be determined
    pub fn for_running_executable() -> Result<Self> {
        let exe = std::env::current_exe()
            .map_err(|e| BootstrapError::TargetUnresolved(e.to_string()))?;
        let dir = exe.parent().ok_or_else(|| {
            BootstrapError::TargetUnresolved(format!("{} has no parent directory", exe.display()))
        })?;
        Ok(Self::in_directory(dir))
    }

    /// Replace the release feed URL
    #[must_use]
    pub fn with_releases_url(mut self, url: impl Into<String>) -> Self {
        self.releases_url = url.into();
        self
    }

    /// Replace the base URL of release downloads
    #[must_use]
    pub fn with_releases_base(mut self, url: impl Into<String>) -> Self {
        self.releases_base = url.into();
        self
    }

    /// Build the download URL of the artifact for a version
    ///
    /// # Examples
    /// ```
    /// use std::path::Path;
    /// use paket_bootstrapper::BootstrapConfig;
    ///
    /// let config = BootstrapConfig::in_directory(Path::new("/opt/tools"));
    /// assert_eq!(
    ///     config.build_download_url("5.1.0"),
    ///     "https://github.com/fsprojects/Paket/releases/download/5.1.0/paket.exe"
    /// );
    /// ```
    #[must_use]
    pub fn build_download_url(&self, version: &str) -> String {
        format!(
            "{}/download/{}/{}",
            self.releases_base.trim_end_matches('/'),
            version,
            self.artifact_name
        )
    }
}
