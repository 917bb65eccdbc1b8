// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Inspection of the installed artifact

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BootstrapError, Result};
use crate::pe_version::read_file_version;

/// Reads the version embedded in an installed artifact
pub trait VersionProbe {
    /// Read the version of the artifact at `path`
    ///
    /// # Errors
    /// Returns [`BootstrapError::LocalVersionUnreadable`] if no version can
    /// be obtained
    fn probe(&self, path: &Path) -> Result<String>;
}

/// Reads the `FileVersion` from the artifact's version resource
///
/// The artifact is never executed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileVersionReader;

impl VersionProbe for FileVersionReader {
    fn probe(&self, path: &Path) -> Result<String> {
        let unreadable = |reason: String| BootstrapError::LocalVersionUnreadable {
            path: path.to_path_buf(),
            reason,
        };

        let image = fs::read(path).map_err(|e| unreadable(e.to_string()))?;
        read_file_version(&image).ok_or_else(|| unreadable("no version resource".to_string()))
    }
}

/// The installed artifact as found at the start of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifact {
    pub path: PathBuf,
    pub exists: bool,
    pub version: Option<String>,
}

impl LocalArtifact {
    /// Look at the artifact at `path` and read its version if it exists
    ///
    /// An unreadable version is not an error: the artifact is then treated
    /// as having no version, which forces a download.
    pub fn inspect<P>(path: &Path, probe: &P) -> Self
    where
        P: VersionProbe + ?Sized,
    {
        if !path.exists() {
            tracing::debug!("no artifact at {}", path.display());
            return Self {
                path: path.to_path_buf(),
                exists: false,
                version: None,
            };
        }

        let version = match probe.probe(path) {
            Ok(version) if !version.is_empty() => Some(version),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("{e}");
                None
            }
        };

        Self {
            path: path.to_path_buf(),
            exists: true,
            version,
        }
    }

    /// Installed version, or "" when absent or unreadable
    #[must_use]
    pub fn version_or_empty(&self) -> &str {
        self.version.as_deref().unwrap_or("")
    }
}
