//! # Transfer Session
//!
//! Orchestrates initiation, resume, and chunked transfer against a
//! provider resumable-upload endpoint.
//!
//! ## Workflow
//!
//! 1. Construction loads the persisted session record: present means a
//!    transfer is in progress and `upload` will start with a resume
//!    probe; absent means idle and `initialise` must run first.
//! 2. `initialise` declares length, content type, and metadata, and
//!    persists the provider-assigned session URL before any byte of
//!    content is sent.
//! 3. `upload` probes the session for the next expected offset, then
//!    PUTs chunks strictly in order until the provider acknowledges
//!    completion.
//!
//! Terminal outcomes (completed, permanently rejected) remove the
//! session record. Transport-level failures and cancellation leave it
//! in place, so the next run resumes from the last acknowledged offset.

use bytes::Bytes;
use core_runtime::config::PipelineConfig;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use transport_traits::auth::TokenProvider;
use transport_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use transport_traits::source::ChunkSource;

use crate::error::{Result, TransferError};
use crate::state::{SessionState, SessionStateStore};
use crate::status::{classify, ResponseKind};

/// The remote object created by a completed transfer, decoded from the
/// provider's final response body.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishedResource {
    /// Provider-assigned id of the created resource
    pub id: String,

    /// Remaining response fields, kept as-is for the caller
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

enum Phase {
    Idle,
    InProgress(SessionState),
}

enum ProbeOutcome {
    Done(PublishedResource),
    NextOffset(u64),
}

/// A resumable transfer bound to one chunk source and one session
/// record. Strictly sequential: each chunk is awaited before the next
/// read, as the upload session only accepts ordered byte ranges.
pub struct TransferSession<S> {
    http: Arc<dyn HttpClient>,
    tokens: Arc<dyn TokenProvider>,
    store: SessionStateStore,
    source: S,
    chunk_size: u64,
    endpoint: String,
    content_type: String,
    phase: Phase,
}

impl<S: ChunkSource> TransferSession<S> {
    /// Bind a session to its collaborators, loading any persisted
    /// record. A present record puts the session straight into the
    /// in-progress phase; `upload` will then start with a resume probe.
    pub fn new(
        http: Arc<dyn HttpClient>,
        tokens: Arc<dyn TokenProvider>,
        source: S,
        store: SessionStateStore,
        chunk_size: u64,
        endpoint: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Result<Self> {
        let phase = match store.load()? {
            Some(state) => {
                info!(
                    source = %state.source_descriptor,
                    total_length = state.total_length,
                    "found persisted transfer session"
                );
                Phase::InProgress(state)
            }
            None => Phase::Idle,
        };

        Ok(Self {
            http,
            tokens,
            store,
            source,
            chunk_size,
            endpoint: endpoint.into(),
            content_type: content_type.into(),
            phase,
        })
    }

    /// Bind a session using the assembled pipeline configuration.
    pub fn from_config(config: &PipelineConfig, source: S) -> Result<Self> {
        Self::new(
            config.http_client.clone(),
            config.token_provider.clone(),
            source,
            SessionStateStore::new(&config.state_path),
            config.chunk_size,
            config.upload_endpoint.clone(),
            config.upload_content_type.clone(),
        )
    }

    /// Whether a persisted transfer is waiting to be driven to an end.
    pub fn in_progress(&self) -> bool {
        matches!(self.phase, Phase::InProgress(_))
    }

    /// The persisted record, when in progress. Lets a restarted caller
    /// rebuild the matching chunk source before calling `upload`.
    pub fn resumable_state(&self) -> Option<&SessionState> {
        match &self.phase {
            Phase::InProgress(state) => Some(state),
            Phase::Idle => None,
        }
    }

    /// Start a new upload session: declare length, content type, and
    /// metadata, and persist the provider-assigned session URL.
    ///
    /// Fails fast when a transfer is already in progress — the session
    /// record is the exclusivity mechanism and is never overwritten.
    /// Any non-success response is terminal and nothing is persisted.
    #[instrument(skip_all)]
    pub async fn initialise(&mut self, metadata: &Value) -> Result<()> {
        if self.in_progress() {
            return Err(TransferError::AlreadyInProgress);
        }

        let total_length = self.source.total_len().await?;
        if total_length == 0 {
            return Err(TransferError::EmptyContent);
        }

        let token = self.tokens.access_token().await?;
        let request = HttpRequest::new(HttpMethod::Post, &self.endpoint)
            .bearer_token(token)
            .header("X-Upload-Content-Length", total_length.to_string())
            .header("X-Upload-Content-Type", &self.content_type)
            .json(metadata)?;

        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(TransferError::InitiateRejected {
                status: response.status,
                detail: response.text_lossy(),
            });
        }

        let upload_url = response
            .header("Location")
            .ok_or(TransferError::MissingSessionUrl)?
            .to_string();

        let state = SessionState {
            upload_url,
            source_descriptor: self.source.descriptor().to_string(),
            total_length,
        };

        // Durable before the first chunk: a crash from here on resumes.
        self.store.save(&state)?;

        info!(
            source = %state.source_descriptor,
            total_length, "transfer session initiated"
        );
        self.phase = Phase::InProgress(state);
        Ok(())
    }

    /// Drive the transfer to a terminal outcome.
    ///
    /// `progress` is invoked with the current offset before each chunk,
    /// best-effort. Cancellation is honored at every blocking point and
    /// leaves the session record untouched; the next run resumes from
    /// the last acknowledged offset, resending at most one chunk.
    #[instrument(skip_all)]
    pub async fn upload(
        &mut self,
        mut progress: impl FnMut(u64) + Send,
        cancel: &CancellationToken,
    ) -> Result<PublishedResource> {
        let state = match &self.phase {
            Phase::InProgress(state) => state.clone(),
            Phase::Idle => return Err(TransferError::NotInProgress),
        };

        if state.source_descriptor != self.source.descriptor() {
            return Err(TransferError::SourceMismatch {
                bound: self.source.descriptor().to_string(),
                persisted: state.source_descriptor,
            });
        }

        let mut offset = match self.probe(&state, cancel).await? {
            ProbeOutcome::Done(resource) => return Ok(resource),
            ProbeOutcome::NextOffset(offset) => offset,
        };

        while offset < state.total_length {
            progress(offset);

            let want = self.chunk_size.min(state.total_length - offset);
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TransferError::Cancelled),
                chunk = self.source.read(offset, want) => chunk?,
            };
            if chunk.is_empty() {
                return Err(TransferError::Transport(
                    std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        format!("source ended at offset {} of {}", offset, state.total_length),
                    )
                    .into(),
                ));
            }
            let end = offset + chunk.len() as u64 - 1;

            debug!(offset, end, total = state.total_length, "sending chunk");
            let response = self.put_chunk(&state, offset, end, chunk, cancel).await?;

            match classify(response.status) {
                ResponseKind::Completed => {
                    self.store.clear()?;
                    self.phase = Phase::Idle;
                    info!(total = state.total_length, "transfer completed");
                    return decode_resource(&response);
                }
                ResponseKind::Resumable => {
                    // Chunks go out in strict order; the next offset is
                    // already known without re-parsing the Range header.
                    offset = end + 1;
                }
                ResponseKind::PermanentFailure => {
                    self.store.clear()?;
                    self.phase = Phase::Idle;
                    warn!(status = response.status, "chunk permanently rejected");
                    return Err(TransferError::Rejected {
                        status: response.status,
                        detail: response.text_lossy(),
                    });
                }
            }
        }

        // Every byte went out and was acknowledged as resumable, yet no
        // completion arrived. Keep the record; the next run's probe
        // settles the session either way.
        Err(TransferError::MissingCompletion)
    }

    /// Zero-length status probe: asks the session which bytes it has.
    async fn probe(
        &mut self,
        state: &SessionState,
        cancel: &CancellationToken,
    ) -> Result<ProbeOutcome> {
        let token = self.tokens.access_token().await?;
        let request = HttpRequest::new(HttpMethod::Put, &state.upload_url)
            .bearer_token(token)
            .header("Content-Length", "0")
            .header("Content-Range", format!("bytes */{}", state.total_length));

        let response = self.execute_cancellable(request, cancel).await?;

        match classify(response.status) {
            ResponseKind::Completed => {
                self.store.clear()?;
                self.phase = Phase::Idle;
                info!("transfer already completed by a previous run");
                Ok(ProbeOutcome::Done(decode_resource(&response)?))
            }
            ResponseKind::Resumable => {
                // `Range: bytes=0-<last>` carries the acknowledged
                // bytes; no header means nothing stored yet.
                let next = match response.header("Range") {
                    Some(range) => parse_last_acked_byte(range)? + 1,
                    None => 0,
                };
                debug!(next_offset = next, "session resumable");
                Ok(ProbeOutcome::NextOffset(next))
            }
            ResponseKind::PermanentFailure => {
                self.store.clear()?;
                self.phase = Phase::Idle;
                warn!(status = response.status, "session permanently rejected");
                Err(TransferError::Rejected {
                    status: response.status,
                    detail: response.text_lossy(),
                })
            }
        }
    }

    async fn put_chunk(
        &self,
        state: &SessionState,
        offset: u64,
        end: u64,
        chunk: Bytes,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse> {
        let token = self.tokens.access_token().await?;
        let request = HttpRequest::new(HttpMethod::Put, &state.upload_url)
            .bearer_token(token)
            .header(
                "Content-Range",
                format!("bytes {}-{}/{}", offset, end, state.total_length),
            )
            .body(chunk);

        self.execute_cancellable(request, cancel).await
    }

    async fn execute_cancellable(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransferError::Cancelled),
            response = self.http.execute(request) => Ok(response?),
        }
    }
}

fn decode_resource(response: &HttpResponse) -> Result<PublishedResource> {
    Ok(serde_json::from_slice(&response.body)?)
}

/// Parse the last acknowledged byte out of `bytes=0-<last>`.
fn parse_last_acked_byte(header: &str) -> Result<u64> {
    let (_, last) = header
        .rsplit_once('-')
        .ok_or_else(|| TransferError::InvalidRangeHeader(header.to_string()))?;
    last.trim()
        .parse()
        .map_err(|_| TransferError::InvalidRangeHeader(header.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_last_acked_byte() {
        assert_eq!(parse_last_acked_byte("bytes=0-12345").unwrap(), 12345);
        assert_eq!(parse_last_acked_byte("bytes=0-0").unwrap(), 0);
        assert!(parse_last_acked_byte("bytes").is_err());
        assert!(parse_last_acked_byte("bytes=0-x").is_err());
    }

    #[test]
    fn test_decode_resource_keeps_extra_fields() {
        let response = HttpResponse {
            status: 201,
            headers: Default::default(),
            body: Bytes::from(r#"{"id":"vid42","snippet":{"title":"t"}}"#),
        };

        let resource = decode_resource(&response).unwrap();
        assert_eq!(resource.id, "vid42");
        assert!(resource.fields.contains_key("snippet"));
    }
}
