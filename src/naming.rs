//! Names of the files produced by one upload.
//!
//! Everything here is pure: the caller supplies the timestamp so the same
//! inputs always yield the same names.

use chrono::NaiveDateTime;
use std::path::Path;

use crate::config::ContentFormat;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Extension of `path` including the leading dot, or an empty string.
/// Dotfiles such as `.profile` have no extension.
pub fn original_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedArtifacts {
    /// Remote name of the selected file: `{title}_{timestamp}{ext}`.
    pub remote_file: String,
    /// Remote name of the description: `{title}_{timestamp}_content.{html|txt}`.
    pub remote_content: String,
    /// Local temporary file: `content_{timestamp}.{html|txt}`.
    pub local_content: String,
}

impl DerivedArtifacts {
    pub fn derive(title: &str, local_file: &Path, timestamp: &str, format: ContentFormat) -> Self {
        let stem = format!("{}_{}", title, timestamp);
        let ext = format.extension();
        DerivedArtifacts {
            remote_file: format!("{}{}", stem, original_extension(local_file)),
            remote_content: format!("{}_content.{}", stem, ext),
            local_content: format!("content_{}.{}", timestamp, ext),
        }
    }
}
