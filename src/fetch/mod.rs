// src/fetch/mod.rs

use reqwest::{header, Client, StatusCode};
use std::{fmt, path::PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};
use url::Url;

/// Errors from loading catalog source text.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: Url, status: StatusCode },

    /// Connection, TLS or body read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    /// Local file could not be read.
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// GET `url` and return the whole body as text.
pub async fn fetch_text(client: &Client, url: &Url) -> Result<String, FetchError> {
    let transport = |source: reqwest::Error| FetchError::Transport {
        url: url.clone(),
        source,
    };

    let resp = client
        .get(url.clone())
        .header(header::CACHE_CONTROL, "no-store")
        .send()
        .await
        .map_err(transport)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.clone(),
            status,
        });
    }

    let body = resp.text().await.map_err(transport)?;
    debug!(url = %url, bytes = body.len(), "fetched");
    Ok(body)
}

/// Where catalog text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Remote(Url),
    Local(PathBuf),
}

impl Source {
    /// `http(s)` URLs are remote; anything else is a filesystem path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Source::Remote(url),
            _ => Source::Local(PathBuf::from(raw)),
        }
    }

    /// Base for resolving relative links found inside the document.
    ///
    /// Local files resolve against their own `file://` URL, so links are
    /// relative to the directory holding the file.
    pub fn base_url(&self) -> Option<Url> {
        match self {
            Source::Remote(url) => Some(url.clone()),
            Source::Local(path) => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    std::env::current_dir().ok()?.join(path)
                };
                Url::from_file_path(path).ok()
            }
        }
    }

    /// Read the complete document.
    pub async fn load(&self, client: &Client) -> Result<String, FetchError> {
        info!(source = %self, "loading catalog source");
        match self {
            Source::Remote(url) => fetch_text(client, url).await,
            Source::Local(path) => {
                fs::read_to_string(path)
                    .await
                    .map_err(|source| FetchError::Io {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Remote(url) => write!(f, "{}", url),
            Source::Local(path) => write!(f, "{}", path.display()),
        }
    }
}
