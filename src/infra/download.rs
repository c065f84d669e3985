//! HTTP download of release tarballs
//!
//! A tarball streams into `<name>.part` beside its destination while its
//! sha256 is computed, and is renamed into place only once the digest
//! matches. Network failures and server errors are retried with exponential
//! backoff; client errors and checksum mismatches fail at once.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::config::defaults;
use crate::error::DownloadError;

/// Progress callback, called with (`bytes_so_far`, `total_bytes`); the total
/// is 0 when the server does not send a length
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// A verified file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloaded {
    /// Final location
    pub path: PathBuf,
    /// Bytes received
    pub bytes: u64,
}

/// Delay schedule between attempts: doubles from `base`, never above `cap`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    cap: Duration,
}

impl Backoff {
    pub fn new(base: Duration, cap: Duration) -> Self {
        Self { base, cap }
    }

    /// Pause after the `attempt`-th failure (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.base.saturating_mul(factor).min(self.cap)
    }
}

/// Downloads release tarballs with retry
#[derive(Debug, Clone)]
pub struct DownloadManager {
    client: reqwest::Client,
    attempts: u32,
    backoff: Backoff,
}

impl DownloadManager {
    pub fn new() -> Self {
        Self::with_config(
            defaults::MAX_DOWNLOAD_RETRIES,
            defaults::DOWNLOAD_RETRY_DELAY_MS,
        )
    }

    /// Manager making at most `attempts` tries, pausing `base_delay_ms`
    /// after the first failure
    pub fn with_config(attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("aocc-integrator/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(600))
                .connect_timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            attempts: attempts.max(1),
            backoff: Backoff::new(
                Duration::from_millis(base_delay_ms),
                Duration::from_millis(defaults::DOWNLOAD_RETRY_MAX_DELAY_MS),
            ),
        }
    }

    /// Download `url` to `dest` and check it against `expected_sha256`
    ///
    /// `dest` is only replaced by a file whose digest matches; on any failure
    /// the `.part` file is removed and a previous `dest` is left as it was.
    pub async fn download_verified(
        &self,
        url: &str,
        dest: &Path,
        expected_sha256: &str,
        progress: Option<ProgressCallback>,
    ) -> Result<Downloaded, DownloadError> {
        let partial = partial_path(dest);
        let mut attempt = 0;

        let (bytes, actual) = loop {
            attempt += 1;
            match self.stream_to(url, &partial, progress.as_ref()).await {
                Ok(received) => break received,
                Err(e) if e.is_transient() && attempt < self.attempts => {
                    let delay = self.backoff.delay(attempt);
                    tracing::warn!(
                        "Attempt {attempt}/{} for {url} failed: {e}; retrying in {}ms",
                        self.attempts,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    discard(&partial).await;
                    if e.is_transient() && attempt > 1 {
                        return Err(DownloadError::MaxRetriesExceeded {
                            url: url.to_string(),
                            retries: attempt,
                            error: e.to_string(),
                        });
                    }
                    return Err(e);
                }
            }
        };

        if !actual.eq_ignore_ascii_case(expected_sha256) {
            discard(&partial).await;
            return Err(DownloadError::ChecksumFailed {
                file: dest.display().to_string(),
                expected: expected_sha256.to_ascii_lowercase(),
                actual,
            });
        }

        tokio::fs::rename(&partial, dest)
            .await
            .map_err(|e| DownloadError::IoError {
                path: dest.to_path_buf(),
                error: e.to_string(),
            })?;
        tracing::debug!("Saved {bytes} bytes to {}", dest.display());

        Ok(Downloaded {
            path: dest.to_path_buf(),
            bytes,
        })
    }

    /// One attempt: stream the body into `partial`, returning its length and
    /// sha256
    async fn stream_to(
        &self,
        url: &str,
        partial: &Path,
        progress: Option<&ProgressCallback>,
    ) -> Result<(u64, String), DownloadError> {
        let network_err = |e: reqwest::Error| DownloadError::NetworkError {
            url: url.to_string(),
            error: e.to_string(),
        };
        let io_err = |e: std::io::Error| DownloadError::IoError {
            path: partial.to_path_buf(),
            error: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(network_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let total = response.content_length().unwrap_or(0);

        if let Some(parent) = partial.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let mut file = File::create(partial).await.map_err(io_err)?;

        let mut hasher = Sha256::new();
        let mut received = 0u64;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(network_err)?;
            file.write_all(&chunk).await.map_err(io_err)?;
            hasher.update(&chunk);
            received += chunk.len() as u64;
            if let Some(cb) = progress {
                cb(received, total);
            }
        }
        file.flush().await.map_err(io_err)?;

        Ok((received, hex::encode(hasher.finalize())))
    }
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

async fn discard(partial: &Path) {
    if let Err(e) = tokio::fs::remove_file(partial).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::debug!("Could not remove {}: {e}", partial.display());
        }
    }
}

/// Temporary path a download is streamed to before it is moved into place
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// Last path segment of a URL, used as the archive file name
pub fn file_name_from_url(url: &str) -> Option<&str> {
    url.split(&['?', '#'][..])
        .next()
        .and_then(|u| u.rsplit('/').next())
        .filter(|name| !name.is_empty())
}

/// Hex sha256 of a file, read in blocks
pub fn sha256_file(path: &Path) -> Result<String, DownloadError> {
    let io_err = |e: std::io::Error| DownloadError::IoError {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    let mut file = std::fs::File::open(path).map_err(io_err)?;
    let mut hasher = Sha256::new();
    let mut block = [0u8; 64 * 1024];
    loop {
        let read = file.read(&mut block).map_err(io_err)?;
        if read == 0 {
            break;
        }
        hasher.update(&block[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Whether the file at `path` has the given sha256 (hex, any case)
pub fn file_matches_sha256(path: &Path, expected: &str) -> Result<bool, DownloadError> {
    Ok(sha256_file(path)?.eq_ignore_ascii_case(expected))
}

/// Hex sha256 of a byte slice
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
