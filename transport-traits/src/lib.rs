//! # Transport Traits
//!
//! Injected abstractions shared by the publishing pipeline crates.
//!
//! ## Overview
//!
//! This crate defines the contract between the pipeline core and its
//! external collaborators. Nothing here talks to the network itself;
//! concrete implementations are injected at construction time so that no
//! component depends on a process-wide client singleton.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - async HTTP operations with retry
//!   and streaming downloads
//! - [`TokenProvider`](auth::TokenProvider) - bearer tokens for the
//!   publishing platform (the OAuth layer is out of scope and consumed
//!   through this trait)
//! - [`ChunkSource`](source::ChunkSource) - a byte-addressable input for
//!   the transfer engine
//! - [`RangeFetcher`](source::RangeFetcher) - the provider-specific half
//!   of a remote chunk source
//!
//! ## Error Handling
//!
//! All traits use the [`TransportError`](error::TransportError) type.
//! Implementations should convert their internal errors to
//! `TransportError` and include actionable context (URLs, offsets,
//! status codes).

pub mod auth;
pub mod error;
pub mod http;
pub mod source;

pub use auth::{StaticTokenProvider, TokenProvider};
pub use error::TransportError;
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use source::{ChunkSource, RangeFetcher};
