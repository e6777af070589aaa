//! Dropbox API request and response types

use serde::{Deserialize, Serialize};

/// `files/get_metadata` request body
///
/// See: https://www.dropbox.com/developers/documentation/http/documentation#files-get_metadata
#[derive(Debug, Serialize)]
pub struct GetMetadataArg<'a> {
    pub path: &'a str,
}

/// `files/download` path argument, sent in the `Dropbox-API-Arg` header
#[derive(Debug, Serialize)]
pub struct DownloadArg<'a> {
    pub path: &'a str,
}

/// Metadata response, tagged by entry kind
#[derive(Debug, Deserialize)]
pub struct Metadata {
    /// `file`, `folder`, or `deleted`
    #[serde(rename = ".tag")]
    pub tag: String,

    /// Size in bytes, present only for files
    #[serde(default)]
    pub size: Option<u64>,
}
