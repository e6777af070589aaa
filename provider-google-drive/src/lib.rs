//! # Google Drive Provider
//!
//! Implements the `RangeFetcher` trait for Google Drive API v3, so
//! media stored on Drive can be streamed straight into an upload
//! session without touching local disk.
//!
//! ## Overview
//!
//! This module provides:
//! - Content length lookup via `files.get` with a `size` field mask
//! - Sequential ranged downloads via `alt=media` and a `Range` header
//! - OAuth 2.0 authentication through the injected `TokenProvider`

pub mod error;
pub mod source;
pub mod types;

pub use error::{GoogleDriveError, Result};
pub use source::DriveRangeFetcher;
