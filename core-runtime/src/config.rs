//! # Pipeline Configuration
//!
//! Builder-assembled configuration for the publishing pipeline.
//!
//! ## Required Dependencies
//!
//! - `HttpClient` - all remote calls go through it
//! - `TokenProvider` - bearer tokens for the publishing platform
//! - session state path - where the in-flight transfer record lives
//!
//! ## Defaults
//!
//! Chunk size defaults to 16 MiB and must be a positive multiple of the
//! 256 KiB granularity the resumable-upload protocol requires (the
//! final chunk is exempt and may be shorter). The upload endpoint and
//! content type default to the video-platform values and can be
//! overridden for other resumable endpoints.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::PipelineConfig;
//! use std::sync::Arc;
//!
//! let config = PipelineConfig::builder()
//!     .http_client(Arc::new(my_client))
//!     .token_provider(Arc::new(my_tokens))
//!     .state_path("/home/me/.config/pipeline/upload-state.json")
//!     .build()?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use transport_traits::auth::TokenProvider;
use transport_traits::http::HttpClient;

use crate::error::{Error, Result};

/// Smallest legal chunk granularity of the resumable-upload protocol.
/// Every chunk except the final one must be a multiple of this.
pub const MIN_CHUNK_SIZE: u64 = 256 * 1024;

/// Default chunk size: 16 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 16 * 1024 * 1024;

/// Default resumable-upload endpoint (video publishing API).
pub const DEFAULT_UPLOAD_ENDPOINT: &str =
    "https://www.googleapis.com/upload/youtube/v3/videos?uploadType=resumable&part=snippet,status";

/// Default declared content type for uploaded media.
pub const DEFAULT_UPLOAD_CONTENT_TYPE: &str = "video/*";

/// Assembled pipeline configuration.
///
/// Use [`PipelineConfig::builder`] to construct instances; `build()`
/// fails fast with an actionable message when a required capability is
/// missing or a knob is out of range.
#[derive(Clone)]
pub struct PipelineConfig {
    /// HTTP client for all remote calls
    pub http_client: Arc<dyn HttpClient>,

    /// Bearer-token source for the publishing platform
    pub token_provider: Arc<dyn TokenProvider>,

    /// Path of the durable transfer-session record
    pub state_path: PathBuf,

    /// Bytes per upload chunk
    pub chunk_size: u64,

    /// Resumable-upload initiation endpoint
    pub upload_endpoint: String,

    /// Declared content type of the uploaded media
    pub upload_content_type: String,
}

impl std::fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("http_client", &"HttpClient { ... }")
            .field("token_provider", &"TokenProvider { ... }")
            .field("state_path", &self.state_path)
            .field("chunk_size", &self.chunk_size)
            .field("upload_endpoint", &self.upload_endpoint)
            .field("upload_content_type", &self.upload_content_type)
            .finish()
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Default)]
pub struct PipelineConfigBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    state_path: Option<PathBuf>,
    chunk_size: Option<u64>,
    upload_endpoint: Option<String>,
    upload_content_type: Option<String>,
}

impl PipelineConfigBuilder {
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    pub fn state_path(mut self, path: impl AsRef<Path>) -> Self {
        self.state_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn chunk_size(mut self, bytes: u64) -> Self {
        self.chunk_size = Some(bytes);
        self
    }

    pub fn upload_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.upload_endpoint = Some(endpoint.into());
        self
    }

    pub fn upload_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.upload_content_type = Some(content_type.into());
        self
    }

    /// Validate and assemble the configuration.
    pub fn build(self) -> Result<PipelineConfig> {
        let http_client = self.http_client.ok_or_else(|| Error::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: "No HTTP client provided. Inject one with .http_client(...) \
                      (transport-reqwest ships a default implementation)."
                .to_string(),
        })?;

        let token_provider = self.token_provider.ok_or_else(|| Error::CapabilityMissing {
            capability: "TokenProvider".to_string(),
            message: "No token provider given. Inject the OAuth layer's token \
                      source with .token_provider(...)."
                .to_string(),
        })?;

        let state_path = self
            .state_path
            .ok_or_else(|| Error::Config("session state path is required".to_string()))?;

        let chunk_size = self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE);
        if chunk_size == 0 || chunk_size % MIN_CHUNK_SIZE != 0 {
            return Err(Error::Config(format!(
                "chunk size must be a positive multiple of {} bytes, got {}",
                MIN_CHUNK_SIZE, chunk_size
            )));
        }

        Ok(PipelineConfig {
            http_client,
            token_provider,
            state_path,
            chunk_size,
            upload_endpoint: self
                .upload_endpoint
                .unwrap_or_else(|| DEFAULT_UPLOAD_ENDPOINT.to_string()),
            upload_content_type: self
                .upload_content_type
                .unwrap_or_else(|| DEFAULT_UPLOAD_CONTENT_TYPE.to_string()),
        })
    }
}
