// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Release feed client
//!
//! The feed is the GitHub releases listing: a JSON array of release objects,
//! newest first. Only `tag_name` is read; every other field is ignored so
//! schema additions upstream do not matter.

use serde::Deserialize;

use crate::error::{BootstrapError, Result};
use crate::proxy::ProxyConfig;

/// One release of the feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReleaseFeedEntry {
    /// Release tag, which is the version string
    #[serde(default)]
    pub tag_name: Option<String>,
}

impl ReleaseFeedEntry {
    /// Entry with the given tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag_name: Some(tag.into()),
        }
    }

    /// The release tag, if present and non-blank
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag_name
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }
}

/// Source of the release list
pub trait ReleaseFeed {
    /// Fetch all releases, newest first
    ///
    /// # Errors
    /// Returns [`BootstrapError::FeedUnavailable`] if the list cannot be
    /// fetched or parsed
    fn releases(&self) -> Result<Vec<ReleaseFeedEntry>>;
}

/// Parse a feed response body
///
/// # Errors
/// Returns [`BootstrapError::FeedUnavailable`] if the body is not a JSON
/// array of objects
pub fn parse_releases(body: &str) -> Result<Vec<ReleaseFeedEntry>> {
    serde_json::from_str(body)
        .map_err(|e| BootstrapError::FeedUnavailable(format!("malformed release list: {e}")))
}

/// Release feed fetched over HTTP
#[derive(Debug, Clone)]
pub struct HttpReleaseFeed {
    url: String,
    proxy: ProxyConfig,
}

impl HttpReleaseFeed {
    /// Feed served as a JSON release list at `url`, fetched through `proxy`
    #[must_use]
    pub fn new(url: impl Into<String>, proxy: ProxyConfig) -> Self {
        Self {
            url: url.into(),
            proxy,
        }
    }
}

impl ReleaseFeed for HttpReleaseFeed {
    fn releases(&self) -> Result<Vec<ReleaseFeedEntry>> {
        tracing::debug!("fetching release list from {}", self.url);

        let unavailable =
            |reason: String| BootstrapError::FeedUnavailable(format!("{}: {reason}", self.url));

        let resp = self
            .proxy
            .get(&self.url)
            .send()
            .map_err(|e| unavailable(e.to_string()))?;

        if !resp.is_success() {
            return Err(unavailable(format!("server returned {}", resp.status())));
        }

        let body = resp.text().map_err(|e| unavailable(e.to_string()))?;
        let releases = parse_releases(&body)?;
        tracing::debug!("release feed lists {} releases", releases.len());
        Ok(releases)
    }
}
