//! Anonymous read pipeline for version metadata.
//!
//! # Responsibilities
//! - Open an unauthenticated download pipeline
//! - Stream the metadata document and extract its first line
//!
//! # Design Decisions
//! - The initial request is attempted once; only body reads are retried
//! - The metadata document is a single short line, so a failed read restarts
//!   the stream instead of resuming with ranged requests

use url::Url;

/// Retries applied to partial body reads, matching the engine's per-download
/// body retry bound.
pub const MAX_BODY_READ_RETRIES: usize = 5;

/// How a pipeline authenticates. Version metadata is public, so only the
/// anonymous descriptor exists here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Anonymous,
}

/// Unauthenticated download pipeline.
pub struct AnonymousPipeline {
    client: reqwest::Client,
}

impl AnonymousPipeline {
    pub fn open(credential: CredentialKind) -> Result<Self, reqwest::Error> {
        let CredentialKind::Anonymous = credential;
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    /// Stream the resource and return its first newline-delimited line.
    ///
    /// `None` on any failure or on an empty body. Partial reads restart the
    /// stream up to [`MAX_BODY_READ_RETRIES`] times.
    pub async fn download_first_line(&self, url: &Url) -> Option<String> {
        let mut response = self.begin_download(url).await?;

        let mut body: Vec<u8> = Vec::new();
        let mut retries_left = MAX_BODY_READ_RETRIES;
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    body.extend_from_slice(&chunk);
                    if chunk.contains(&b'\n') {
                        break;
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    if retries_left == 0 {
                        return None;
                    }
                    retries_left -= 1;
                    body.clear();
                    response = self.begin_download(url).await?;
                }
            }
        }

        if body.is_empty() {
            return None;
        }
        let text = String::from_utf8(body).ok()?;
        text.lines().next().map(|line| line.trim().to_string())
    }

    async fn begin_download(&self, url: &Url) -> Option<reqwest::Response> {
        let response = self.client.get(url.clone()).send().await.ok()?;
        response.error_for_status().ok()
    }
}
