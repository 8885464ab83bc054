//! Upload Status Mapping
//!
//! The file-upload collaborator reports its outcome as one of a small closed
//! set of human-readable status lines. This module owns that set and the
//! three-way mapping from status to the bot's simulated reply text. The
//! upload path never touches the streaming engine or the `processing` flag.

use serde::{Deserialize, Serialize};

/// Outcome of a simulated file upload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadStatus {
    /// The page-limit check succeeded; the size check comes next
    PageCheckPassed,
    /// The file exceeded the size limit
    SizeLimitExceeded,
    /// Any other failure
    Failed,
}

impl UploadStatus {
    /// The human-readable status line reported by the upload collaborator
    #[must_use]
    pub fn status_line(&self) -> &'static str {
        match self {
            Self::PageCheckPassed => "File page limit check succeeded.",
            Self::SizeLimitExceeded => "File size limit exceeded.",
            Self::Failed => "File upload failed.",
        }
    }

    /// The bot's reply text for this outcome
    #[must_use]
    pub fn reply_text(&self) -> &'static str {
        match self {
            Self::PageCheckPassed => "Checking file size.",
            Self::SizeLimitExceeded => {
                "File size limit exceeded. Please upload a smaller file."
            }
            Self::Failed => "Network Error. Please try again later.",
        }
    }

    /// Map a raw status line into the closed set.
    ///
    /// Anything outside the two recognized lines maps to `Failed`, which
    /// yields the generic network-error reply.
    #[must_use]
    pub fn from_line(line: &str) -> Self {
        match line {
            "File page limit check succeeded." => Self::PageCheckPassed,
            "File size limit exceeded." => Self::SizeLimitExceeded,
            _ => Self::Failed,
        }
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_mapping() {
        assert_eq!(
            UploadStatus::PageCheckPassed.reply_text(),
            "Checking file size."
        );
        assert_eq!(
            UploadStatus::SizeLimitExceeded.reply_text(),
            "File size limit exceeded. Please upload a smaller file."
        );
        assert_eq!(
            UploadStatus::Failed.reply_text(),
            "Network Error. Please try again later."
        );
    }

    #[test]
    fn test_from_line_recognized() {
        assert_eq!(
            UploadStatus::from_line("File page limit check succeeded."),
            UploadStatus::PageCheckPassed
        );
        assert_eq!(
            UploadStatus::from_line("File size limit exceeded."),
            UploadStatus::SizeLimitExceeded
        );
    }

    #[test]
    fn test_from_line_anything_else_fails() {
        assert_eq!(
            UploadStatus::from_line("Disk on fire."),
            UploadStatus::Failed
        );
        assert_eq!(UploadStatus::from_line(""), UploadStatus::Failed);
    }

    #[test]
    fn test_display_is_status_line() {
        assert_eq!(
            UploadStatus::SizeLimitExceeded.to_string(),
            "File size limit exceeded."
        );
    }
}
