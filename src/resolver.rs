// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Version resolution
//!
//! Turns an [`UpdateRequest`] into the one version to install. Explicit
//! versions are taken at face value; "latest" requests scan the feed once,
//! newest first, and fail instead of looping when nothing matches.

use crate::error::{BootstrapError, Result};
use crate::feed::{ReleaseFeed, ReleaseFeedEntry};
use crate::request::{ReleaseChannel, UpdateRequest};

/// Pick the first release of the channel in feed order
///
/// # Examples
/// ```
/// use paket_bootstrapper::{ReleaseChannel, ReleaseFeedEntry, select_release};
///
/// let feed = [ReleaseFeedEntry::new("2.0.0-beta"), ReleaseFeedEntry::new("1.9.0")];
/// assert_eq!(select_release(&feed, ReleaseChannel::Stable), Some("1.9.0".to_string()));
/// assert_eq!(select_release(&feed, ReleaseChannel::Any), Some("2.0.0-beta".to_string()));
/// ```
#[must_use]
pub fn select_release(entries: &[ReleaseFeedEntry], channel: ReleaseChannel) -> Option<String> {
    entries
        .iter()
        .filter_map(ReleaseFeedEntry::tag)
        .find(|tag| channel.accepts(tag))
        .map(str::to_string)
}

/// Resolve a request to a concrete version
///
/// The feed is only contacted for "latest" requests, and only once.
///
/// # Errors
/// Returns [`BootstrapError::FeedUnavailable`] if the feed fails and
/// [`BootstrapError::NoMatchingRelease`] if it lists no release of the
/// requested channel
pub fn resolve<F>(request: &UpdateRequest, feed: &F) -> Result<String>
where
    F: ReleaseFeed + ?Sized,
{
    let channel = match request {
        UpdateRequest::Version(version) => return Ok(version.clone()),
        UpdateRequest::Latest(channel) => *channel,
    };

    let releases = feed.releases()?;
    let version =
        select_release(&releases, channel).ok_or(BootstrapError::NoMatchingRelease { channel })?;

    tracing::debug!("latest {channel} release is {version}");
    Ok(version)
}
