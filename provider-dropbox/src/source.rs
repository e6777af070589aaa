//! Dropbox range fetcher
//!
//! Implements the `RangeFetcher` trait over the Dropbox HTTP API.
//! Dropbox splits its surface between an RPC host (JSON bodies) and a
//! content host (payload in the response body, arguments in the
//! `Dropbox-API-Arg` header).

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};
use transport_traits::auth::TokenProvider;
use transport_traits::error::{Result, TransportError};
use transport_traits::http::{HttpClient, HttpMethod, HttpRequest, RetryPolicy};
use transport_traits::source::RangeFetcher;

use crate::error::DropboxError;
use crate::types::{DownloadArg, GetMetadataArg, Metadata};

/// Dropbox RPC endpoint host
const API_BASE: &str = "https://api.dropboxapi.com/2";

/// Dropbox content endpoint host
const CONTENT_BASE: &str = "https://content.dropboxapi.com/2";

/// Range fetcher over one Dropbox file path.
pub struct DropboxRangeFetcher {
    /// HTTP client for API requests
    http: Arc<dyn HttpClient>,

    /// Bearer-token source for the Dropbox app
    tokens: Arc<dyn TokenProvider>,

    /// Dropbox path, e.g. `/expeditions/ep01.mp4`
    path: String,

    /// Cached descriptor, `dropbox:<path>`
    descriptor: String,
}

impl DropboxRangeFetcher {
    pub fn new(
        http: Arc<dyn HttpClient>,
        tokens: Arc<dyn TokenProvider>,
        path: impl Into<String>,
    ) -> Self {
        let path = path.into();
        let descriptor = format!("dropbox:{}", path);
        Self {
            http,
            tokens,
            path,
            descriptor,
        }
    }
}

#[async_trait]
impl RangeFetcher for DropboxRangeFetcher {
    fn descriptor(&self) -> &str {
        &self.descriptor
    }

    #[instrument(skip(self), fields(path = %self.path))]
    async fn content_length(&mut self) -> Result<u64> {
        let token = self.tokens.access_token().await?;
        let request = HttpRequest::new(HttpMethod::Post, format!("{}/files/get_metadata", API_BASE))
            .bearer_token(token)
            .json(&GetMetadataArg { path: &self.path })?;

        let response = self
            .http
            .execute_with_retry(request, RetryPolicy::default())
            .await?;

        if !response.is_success() {
            return Err(DropboxError::ApiError {
                status_code: response.status,
                message: response.text_lossy(),
            }
            .into());
        }

        let metadata: Metadata = response
            .json()
            .map_err(|e| DropboxError::ParseError(format!("file metadata: {}", e)))?;

        if metadata.tag != "file" {
            return Err(DropboxError::NotAFile {
                path: self.path.clone(),
                tag: metadata.tag,
            }
            .into());
        }

        let size = metadata.size.ok_or_else(|| {
            DropboxError::ParseError("file metadata carried no size".to_string())
        })?;

        debug!(size, "resolved Dropbox content length");
        Ok(size)
    }

    async fn open_from(
        &mut self,
        offset: u64,
    ) -> Result<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
        let token = self.tokens.access_token().await?;
        let arg = serde_json::to_string(&DownloadArg { path: &self.path })
            .map_err(|e| TransportError::OperationFailed(format!("encoding download arg: {}", e)))?;

        let request = HttpRequest::new(HttpMethod::Post, format!("{}/files/download", CONTENT_BASE))
            .bearer_token(token)
            .header("Dropbox-API-Arg", arg)
            .header("Range", format!("bytes={}-", offset));

        debug!(path = %self.path, offset, "opening Dropbox download");
        self.http.download_stream(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;
    use tokio::io::AsyncReadExt;
    use transport_traits::auth::StaticTokenProvider;
    use transport_traits::http::HttpResponse;

    mock! {
        Http {}

        #[async_trait]
        impl HttpClient for Http {
            async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
            async fn execute_with_retry(
                &self,
                request: HttpRequest,
                policy: RetryPolicy,
            ) -> Result<HttpResponse>;
            async fn download_stream(
                &self,
                request: HttpRequest,
            ) -> Result<Box<dyn tokio::io::AsyncRead + Send + Unpin>>;
        }
    }

    fn fetcher(http: MockHttp) -> DropboxRangeFetcher {
        DropboxRangeFetcher::new(
            Arc::new(http),
            Arc::new(StaticTokenProvider::new("token")),
            "/clips/ep01.mp4",
        )
    }

    #[tokio::test]
    async fn test_content_length_of_file() {
        let mut http = MockHttp::new();
        http.expect_execute_with_retry()
            .times(1)
            .returning(|request, _| {
                assert!(request.url.ends_with("/files/get_metadata"));
                assert_eq!(
                    request.headers.get("Content-Type"),
                    Some(&"application/json".to_string())
                );
                Ok(HttpResponse {
                    status: 200,
                    headers: HashMap::new(),
                    body: Bytes::from(r#"{".tag": "file", "size": 4096}"#),
                })
            });

        let mut fetcher = fetcher(http);
        assert_eq!(fetcher.content_length().await.unwrap(), 4096);
    }

    #[tokio::test]
    async fn test_content_length_rejects_folders() {
        let mut http = MockHttp::new();
        http.expect_execute_with_retry().times(1).returning(|_, _| {
            Ok(HttpResponse {
                status: 200,
                headers: HashMap::new(),
                body: Bytes::from(r#"{".tag": "folder"}"#),
            })
        });

        let mut fetcher = fetcher(http);
        assert!(fetcher.content_length().await.is_err());
    }

    #[tokio::test]
    async fn test_open_from_uses_content_host_and_range() {
        let mut http = MockHttp::new();
        http.expect_download_stream().times(1).returning(|request| {
            assert!(request.url.starts_with(CONTENT_BASE));
            assert_eq!(
                request.headers.get("Dropbox-API-Arg"),
                Some(&r#"{"path":"/clips/ep01.mp4"}"#.to_string())
            );
            assert_eq!(request.headers.get("Range"), Some(&"bytes=512-".to_string()));
            Ok(Box::new(std::io::Cursor::new(b"payload".to_vec()))
                as Box<dyn tokio::io::AsyncRead + Send + Unpin>)
        });

        let mut fetcher = fetcher(http);
        let mut stream = fetcher.open_from(512).await.unwrap();

        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, b"payload");
    }
}
