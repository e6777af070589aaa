//! # Resumable Transfer Engine
//!
//! Uploads a large byte stream to a remote resumable-upload session,
//! surviving process restarts mid-transfer.
//!
//! ## Overview
//!
//! A [`TransferSession`] binds a [`ChunkSource`](transport_traits::source::ChunkSource)
//! (local file, or a remote range-fetchable object) to a provider
//! upload session. The session URL, source descriptor, and total length
//! are persisted through [`SessionStateStore`] before the first byte
//! goes out, so a crashed or cancelled process resumes from the last
//! acknowledged offset on its next run.
//!
//! Chunks are transferred strictly one at a time: resumable-upload
//! sessions are bound to ordered byte ranges, so there is nothing to
//! parallelize within one session. The state file's existence is also
//! the mutual-exclusion primitive — at most one transfer per
//! installation, and starting a second one fails loudly.
//!
//! ## Flow
//!
//! ```text
//! Idle --initialise--> InProgress --upload loop--> Completed
//!                          |                          |
//!                          +------ PermanentFailure --+--> state cleared
//! ```
//!
//! Network-level failures (no response) leave the persisted state
//! untouched and propagate, so the caller can simply rerun later.

pub mod bounded;
pub mod error;
pub mod session;
pub mod source;
pub mod state;
pub mod status;

pub use bounded::BoundedChunkReader;
pub use error::{Result, TransferError};
pub use session::{PublishedResource, TransferSession};
pub use source::{LocalFileSource, RemoteChunkSource};
pub use state::{SessionState, SessionStateStore};
pub use status::{classify, ResponseKind};
