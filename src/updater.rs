// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! The bootstrap run
//!
//! Reads the installed version, resolves the wanted one, and downloads the
//! artifact when the installed copy does not match. Every failure ends the
//! run; nothing is retried.
//!
//! Two bootstrappers running against the same target share the staging file
//! and can corrupt each other's download. Runs are not locked.

use std::path::Path;

use crate::config::BootstrapConfig;
use crate::download::download;
use crate::error::{BootstrapError, Result};
use crate::feed::HttpReleaseFeed;
use crate::local::{FileVersionReader, LocalArtifact, VersionProbe};
use crate::proxy::ProxyConfig;
use crate::request::UpdateRequest;
use crate::resolver::resolve;
use crate::version::is_up_to_date;

/// Result of a bootstrap run
#[derive(Debug)]
pub enum UpdateOutcome {
    /// The installed version already matches; carries that version
    Skipped(String),
    /// A new artifact was installed; carries its version
    Updated(String),
    /// The run failed
    Failed(BootstrapError),
}

impl UpdateOutcome {
    /// Process exit code for this outcome
    ///
    /// Only a failure that leaves nothing installed at `target` is reported
    /// as an error; an older artifact that survived a failed update is good
    /// enough to keep working.
    #[must_use]
    pub fn exit_code(&self, target: &Path) -> i32 {
        match self {
            Self::Failed(_) if !target.exists() => 1,
            _ => 0,
        }
    }
}

/// Runs the bootstrap sequence for one target
#[derive(Debug, Clone)]
pub struct Updater<P = FileVersionReader> {
    config: BootstrapConfig,
    probe: P,
    proxy: Option<ProxyConfig>,
}

impl Updater<FileVersionReader> {
    /// Updater reading the version resource and using the system proxy
    #[must_use]
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            probe: FileVersionReader,
            proxy: None,
        }
    }
}

impl<P: VersionProbe> Updater<P> {
    /// Replace the way the installed version is read
    #[must_use]
    pub fn with_probe<Q: VersionProbe>(self, probe: Q) -> Updater<Q> {
        Updater {
            config: self.config,
            probe,
            proxy: self.proxy,
        }
    }

    /// Use this proxy configuration instead of discovering the system one
    #[must_use]
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    #[must_use]
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Bring the artifact up to date with `request`
    ///
    /// Never panics on network or filesystem failures; they are returned as
    /// [`UpdateOutcome::Failed`].
    pub fn run(&self, request: &UpdateRequest) -> UpdateOutcome {
        match self.try_run(request) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!("bootstrap run failed: {e:?}");
                UpdateOutcome::Failed(e)
            }
        }
    }

    fn try_run(&self, request: &UpdateRequest) -> Result<UpdateOutcome> {
        let target = &self.config.target;
        let local = LocalArtifact::inspect(target, &self.probe);
        let local_version = local.version_or_empty();
        if local.exists {
            tracing::debug!(
                "installed {} version: {:?}",
                self.config.artifact_name,
                local_version
            );
        }

        let proxy = self.proxy.clone().unwrap_or_else(ProxyConfig::discover);
        let feed = HttpReleaseFeed::new(self.config.releases_url.as_str(), proxy.clone());
        let desired = resolve(request, &feed)?;

        if is_up_to_date(local_version, &desired) {
            return Ok(UpdateOutcome::Skipped(local_version.to_string()));
        }

        let url = self.config.build_download_url(&desired);
        tracing::info!("Starting download from {url}");
        let written = download(&url, target, &proxy)?;
        tracing::debug!(
            "installed {} {desired} ({written} bytes) at {}",
            self.config.artifact_name,
            target.display()
        );

        Ok(UpdateOutcome::Updated(desired))
    }
}
