//! Google Drive API response types
//!
//! Data structures for deserializing Google Drive API v3 responses.

use serde::Deserialize;

/// Subset of the file resource requested with `fields=size`
///
/// See: https://developers.google.com/drive/api/v3/reference/files#resource
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileSize {
    /// File size in bytes. The API serializes it as a string; it is
    /// omitted entirely for folders and Google-native documents.
    #[serde(default)]
    pub size: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_size() {
        let file: DriveFileSize = serde_json::from_str(r#"{"size": "1048576"}"#).unwrap();
        assert_eq!(file.size, Some("1048576".to_string()));
    }

    #[test]
    fn test_deserialize_sizeless_resource() {
        let file: DriveFileSize = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(file.size, None);
    }
}
