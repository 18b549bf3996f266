//! Document uploads and the replies they produce

use crate::{GaiefError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A file to send as the multipart `file` part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    /// File name reported to the server
    pub file_name: String,
    /// MIME type of the part
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    /// Create an upload, guessing the content type from the file name
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                GaiefError::validation(format!("Not a file path: {}", path.display()))
            })?
            .to_string();
        Ok(Self::new(file_name, bytes))
    }

    /// Whether there is anything to send
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Map common document extensions to a MIME type
pub fn guess_content_type(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "tif" | "tiff" => "image/tiff",
        "bmp" => "image/bmp",
        "txt" => "text/plain",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// `/upload-test` response: `{reply, extracted_text}` or `{error}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadResponseBody {
    /// Document was read and answered
    Reply {
        /// Assistant text
        reply: String,
        /// First characters of the OCR text
        #[serde(default)]
        extracted_text: String,
    },
    /// OCR or model failure
    Error {
        /// Failure message
        error: String,
    },
}

impl UploadResponseBody {
    /// Split into success or a backend error
    pub fn into_result(self, status: u16) -> Result<UploadReply> {
        match self {
            UploadResponseBody::Reply {
                reply,
                extracted_text,
            } => Ok(UploadReply {
                reply,
                extracted_text,
            }),
            UploadResponseBody::Error { error } => Err(GaiefError::backend(status, error)),
        }
    }
}

/// A successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReply {
    /// Assistant text
    pub reply: String,
    /// First characters of the OCR text
    pub extracted_text: String,
}

/// Reply of the OCR summary function
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OcrSummary {
    /// Status line, e.g. "Document processed successfully"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Name of the processed file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Characters extracted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text_length: Option<u64>,
    /// Leading part of the extracted text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text_preview: Option<String>,
    /// Model summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// `completed`, `processing` or `failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OcrSummary {
    /// An `error` field makes the whole reply a failure
    pub fn into_result(mut self, status: u16) -> Result<OcrSummary> {
        match self.error.take() {
            Some(error) => Err(GaiefError::backend(status, error)),
            None => Ok(self),
        }
    }
}
