//! # Dropbox Provider
//!
//! Implements the `RangeFetcher` trait for the Dropbox HTTP API, the
//! second cloud backend media can be streamed from. Identical shape to
//! the Drive provider; only the HTTP calls differ.
//!
//! ## Overview
//!
//! This module provides:
//! - Content length lookup via `files/get_metadata`
//! - Sequential ranged downloads via `files/download` with a `Range`
//!   header and the `Dropbox-API-Arg` path argument

pub mod error;
pub mod source;
pub mod types;

pub use error::{DropboxError, Result};
pub use source::DropboxRangeFetcher;
