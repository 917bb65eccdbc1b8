// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Artifact download
//!
//! The response body is streamed into a staging file beside the target and
//! renamed over it only once the whole body is on disk. A failed download
//! leaves the previously installed artifact untouched.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{BootstrapError, Result};
use crate::proxy::ProxyConfig;

/// Size of each chunk copied from the response to disk
pub const CHUNK_SIZE: usize = 4096;

/// Path of the staging file used while downloading to `target`
///
/// # Examples
/// ```
/// use std::path::{Path, PathBuf};
/// use paket_bootstrapper::download::staging_path;
///
/// assert_eq!(
///     staging_path(Path::new("/opt/tools/paket.exe")),
///     PathBuf::from("/opt/tools/paket.exe.download")
/// );
/// ```
#[must_use]
pub fn staging_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".download");
    target.with_file_name(name)
}

/// Download `url` and install it at `target`
///
/// gzip and deflate encoded responses are decompressed on the fly.
///
/// # Returns
/// Number of bytes written
///
/// # Errors
/// Returns [`BootstrapError::DownloadFailed`] if the request fails, the
/// server answers with an error status, or the body cannot be written and
/// moved into place
pub fn download(url: &str, target: &Path, proxy: &ProxyConfig) -> Result<u64> {
    let failed = |reason: String| BootstrapError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let resp = proxy.get(url).send().map_err(|e| failed(e.to_string()))?;
    if !resp.is_success() {
        return Err(failed(format!("server returned {}", resp.status())));
    }
    let (_status, _headers, mut body) = resp.split();

    let staging = staging_path(target);
    let written =
        install_or_discard(&mut body, &staging, target).map_err(|e| failed(e.to_string()))?;

    tracing::debug!("wrote {written} bytes to {}", target.display());
    Ok(written)
}

/// Install from `reader`, removing the staging file if anything fails
///
/// The install error is returned even when the cleanup fails too.
fn install_or_discard<R: Read>(reader: &mut R, staging: &Path, target: &Path) -> io::Result<u64> {
    install_stream(reader, staging, target).inspect_err(|_| {
        if let Err(cleanup) = fs::remove_file(staging) {
            tracing::debug!("could not remove {}: {cleanup}", staging.display());
        }
    })
}

/// Copy `reader` into `staging` chunk by chunk, then rename it to `target`
fn install_stream<R: Read>(reader: &mut R, staging: &Path, target: &Path) -> io::Result<u64> {
    let written = write_chunks(reader, staging)?;
    set_executable(staging)?;
    fs::rename(staging, target)?;
    Ok(written)
}

fn write_chunks<R: Read>(reader: &mut R, dest: &Path) -> io::Result<u64> {
    let mut file = File::create(dest)?;
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut total: u64 = 0;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        file.write_all(&buffer[..read])?;
        total += read as u64;
    }

    file.sync_all()?;
    Ok(total)
}

/// Set executable permissions on a file
#[cfg(unix)]
fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
