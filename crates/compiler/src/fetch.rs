//! Catalogue retrieval over HTTP or from a local file.
//!
//! The fetcher treats the catalogue as opaque structured records: it only
//! checks that the payload is a JSON array. Field-level checks belong to
//! the normalizer.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use flate2::read::GzDecoder;
use serde_json::Value;

use crate::error::{CompileError, DecodeError, FetchError};
use crate::normalize::json_kind;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Where a catalogue lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl Source {
    /// `http://` and `https://` locations are URLs; anything else is a path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Url(location.to_string())
        } else {
            Source::Path(PathBuf::from(location))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch and decode the catalogue into raw records.
pub async fn fetch(source: &Source, timeout: Duration) -> Result<Vec<Value>, CompileError> {
    let bytes = fetch_bytes(source, timeout).await?;
    tracing::debug!("Fetched {} bytes from {}", bytes.len(), source);
    Ok(decode_catalogue(&bytes)?)
}

/// Retrieve the raw payload. The whole operation, connect through last byte,
/// is bounded by `timeout`. No retries.
pub async fn fetch_bytes(source: &Source, timeout: Duration) -> Result<Vec<u8>, FetchError> {
    let retrieve = async {
        match source {
            Source::Url(url) => fetch_url(url, timeout).await,
            Source::Path(path) => read_path(path).await,
        }
    };

    match tokio::time::timeout(timeout, retrieve).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            location: source.to_string(),
            after: timeout,
        }),
    }
}

async fn fetch_url(url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
    let transport = |source: reqwest::Error| FetchError::Transport {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(transport)?;
    let response = client.get(url).send().await.map_err(transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = response.bytes().await.map_err(transport)?;
    Ok(body.to_vec())
}

async fn read_path(path: &Path) -> Result<Vec<u8>, FetchError> {
    tokio::fs::read(path).await.map_err(|source| FetchError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode a payload into records. Gzip-compressed payloads are inflated first.
pub fn decode_catalogue(bytes: &[u8]) -> Result<Vec<Value>, DecodeError> {
    let inflated;
    let json = if bytes.starts_with(&GZIP_MAGIC) {
        let mut out = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut out)
            .map_err(DecodeError::Gzip)?;
        inflated = out;
        &inflated[..]
    } else {
        bytes
    };

    match serde_json::from_slice::<Value>(json)? {
        Value::Array(records) => Ok(records),
        other => Err(DecodeError::NotAnArray {
            found: json_kind(&other),
        }),
    }
}
