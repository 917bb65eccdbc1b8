// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Version string helpers
//!
//! Versions are compared textually. There is deliberately no semantic
//! ordering: a release is "current" when the installed version starts with
//! the requested one.

/// Check if a version string is a prerelease
///
/// Any hyphen marks a prerelease suffix.
///
/// # Examples
/// ```
/// use paket_bootstrapper::version::is_prerelease;
/// assert!(is_prerelease("5.1.0-beta1"));
/// assert!(!is_prerelease("5.1.0"));
/// ```
#[must_use]
pub fn is_prerelease(version: &str) -> bool {
    version.contains('-')
}

/// Check whether the installed version satisfies the desired one
///
/// The installed version must start with the desired version. The check is
/// asymmetric: "1.9.0.0" satisfies "1.9.0" but "1.9.0" does not satisfy
/// "1.9.0.0". An empty installed version never matches.
///
/// # Arguments
/// * `local` - Version of the installed artifact ("" when unknown)
/// * `desired` - Version that should be installed
///
/// # Examples
/// ```
/// use paket_bootstrapper::version::is_up_to_date;
/// assert!(is_up_to_date("1.9.0.0", "1.9.0"));
/// assert!(!is_up_to_date("1.9.0", "1.9.0.0"));
/// assert!(!is_up_to_date("", "1.9.0"));
/// ```
#[must_use]
pub fn is_up_to_date(local: &str, desired: &str) -> bool {
    !local.is_empty() && local.starts_with(desired)
}
