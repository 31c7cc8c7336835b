//! Resource acquisition.
//!
//! Turns a remote location or an open upload stream into a [`ScopedResource`]:
//! a private temporary file whose suffix matches the validated extension.
//! Names are validated before any bytes move, so a rejected name never
//! leaves an artifact behind.

use docparse_core::{DocumentFormat, FormatRegistry, ParseError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info, warn};

/// Name used when a URL ends without a file name.
pub const FALLBACK_FILENAME: &str = "downloaded_file";

/// Default transfer ceiling for remote fetches.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `User-Agent` sent with remote fetches.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const RESOURCE_PREFIX: &str = "docparse-";

// ============================================================================
// Scoped resource
// ============================================================================

/// Document bytes materialized at a private temporary path.
///
/// Owned by exactly one call. The file is deleted when the value is dropped
/// or passed to [`release`](Self::release), whichever comes first.
#[derive(Debug)]
pub struct ScopedResource {
    file: NamedTempFile,
}

impl ScopedResource {
    /// Create an empty resource carrying the format's extension.
    pub fn create(format: DocumentFormat, temp_dir: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(RESOURCE_PREFIX).suffix(format.extension());

        let file = match temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        Ok(Self { file })
    }

    /// Create a resource holding `bytes`.
    pub async fn with_bytes(
        format: DocumentFormat,
        bytes: &[u8],
        temp_dir: Option<&Path>,
    ) -> Result<Self> {
        let resource = Self::create(format, temp_dir)?;
        tokio::fs::write(resource.path(), bytes).await?;
        Ok(resource)
    }

    /// Local path of the resource.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the resource now. Failures are ignored.
    pub fn release(self) {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            warn!("Failed to remove {:?}: {}", path, e);
        }
    }
}

/// A document that has been validated and materialized locally.
#[derive(Debug)]
pub struct Acquired {
    /// Decoded file name the format was derived from
    pub filename: String,
    /// Validated format
    pub format: DocumentFormat,
    /// Local copy of the bytes
    pub resource: ScopedResource,
}

// ============================================================================
// Names
// ============================================================================

/// Percent-decode a file name. Invalid UTF-8 becomes U+FFFD.
#[must_use]
pub fn decode_filename(raw: &str) -> String {
    let bytes = urlencoding::decode_binary(raw.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// File name a URL points at: the last path segment, query removed, decoded.
#[must_use]
pub fn filename_from_url(url: &str) -> String {
    let segment = url.rsplit('/').next().unwrap_or(url);
    let segment = segment.split('?').next().unwrap_or(segment);
    let name = decode_filename(segment);

    if name.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        name
    }
}

// ============================================================================
// Remote
// ============================================================================

/// Settings for acquiring documents.
#[derive(Debug, Clone)]
pub struct AcquireConfig {
    /// Hard ceiling for a whole remote transfer
    pub timeout: Duration,
    /// `User-Agent` header for remote requests
    pub user_agent: String,
    /// Directory for scoped resources, system temp dir when `None`
    pub temp_dir: Option<PathBuf>,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            temp_dir: None,
        }
    }
}

/// Fetches remote documents into scoped resources.
pub struct RemoteFetcher {
    client: reqwest::Client,
    temp_dir: Option<PathBuf>,
}

impl RemoteFetcher {
    /// Build a fetcher from the given settings.
    pub fn new(config: &AcquireConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ParseError::TransferFailed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            temp_dir: config.temp_dir.clone(),
        })
    }

    /// Directory scoped resources are created in, if overridden.
    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }

    /// Validate the name a URL points at, then download it.
    pub async fn fetch(&self, url: &str) -> Result<Acquired> {
        if url.trim().is_empty() {
            return Err(ParseError::InvalidInput("URL cannot be empty".to_string()));
        }

        let filename = filename_from_url(url);
        let format = FormatRegistry::validate(&filename)?;

        info!("Fetching {} ({})", url, format.label());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_transfer)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ParseError::TransferHttp {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(classify_transfer)?;
        debug!("Downloaded {} bytes for {}", bytes.len(), filename);

        let resource = ScopedResource::with_bytes(format, &bytes, self.temp_dir()).await?;

        Ok(Acquired {
            filename,
            format,
            resource,
        })
    }
}

fn classify_transfer(e: reqwest::Error) -> ParseError {
    if e.is_timeout() {
        ParseError::TransferTimeout
    } else if e.is_connect() {
        ParseError::TransferConnectionFailed(e.to_string())
    } else if let Some(status) = e.status() {
        ParseError::TransferHttp {
            status: status.as_u16(),
        }
    } else {
        ParseError::TransferFailed(e.to_string())
    }
}

// ============================================================================
// Upload
// ============================================================================

/// Validate an upload's name, then drain its byte source.
pub async fn drain_upload<R>(
    filename: Option<&str>,
    mut reader: R,
    temp_dir: Option<&Path>,
) -> Result<Acquired>
where
    R: AsyncRead + Unpin,
{
    let raw = match filename {
        Some(name) if !name.is_empty() => name,
        _ => return Err(ParseError::InvalidInput("No filename provided".to_string())),
    };

    let filename = decode_filename(raw);
    let format = FormatRegistry::validate(&filename)?;

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).await?;
    if bytes.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    debug!("Received {} bytes for {}", bytes.len(), filename);

    let resource = ScopedResource::with_bytes(format, &bytes, temp_dir).await?;

    Ok(Acquired {
        filename,
        format,
        resource,
    })
}
