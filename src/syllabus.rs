//! Client boundary for the external syllabus parser service.
//!
//! The service does the actual document parsing; this module owns the upload
//! call, the wire types, and the per-module progress math used by displays.

use std::path::Path;

use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, error, info, instrument};

use crate::error::SyllabusError;

/// Structured syllabus returned by the parser service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Syllabus {
    pub course_name: String,
    pub instructor: String,
    pub term: String,
    pub description: String,
    pub modules: Vec<SyllabusModule>,
    pub prerequisites: String,
    pub objectives: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusModule {
    pub name: String,
    pub description: String,
    pub duration: String,
    pub topics: Vec<SyllabusTopic>,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusTopic {
    pub name: String,
    pub description: String,
    pub duration: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub status: String,
    pub syllabus_data: Syllabus,
    pub metadata: ParseMetadata,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseMetadata {
    pub file_name: String,
    pub file_type: String,
    pub course_name: String,
    pub instructor: String,
    pub term: String,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl SyllabusModule {
    /// Completed topics as a percentage, rounded to the nearest integer.
    /// A topicless module reports 0.
    pub fn progress(&self) -> u32 {
        if self.topics.is_empty() {
            return 0;
        }
        let completed = self.topics.iter().filter(|t| t.completed).count();
        (completed as f64 / self.topics.len() as f64 * 100.0).round() as u32
    }
}

/// Map a file extension to the MIME type the service accepts. The allowlist
/// mirrors the upload surface: PDF, Word, and plain text only.
pub fn mime_for_extension(path: &Path) -> Result<&'static str, SyllabusError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => Ok("application/pdf"),
        "docx" => {
            Ok("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        "txt" => Ok("text/plain"),
        _ => Err(SyllabusError::UnsupportedFileType(ext)),
    }
}

#[derive(Debug, Clone)]
pub struct SyllabusClient {
    base_url: String,
    client: reqwest::Client,
}

impl SyllabusClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Upload a syllabus file and return the parsed structure.
    ///
    /// The file type is checked before any I/O or network call; an
    /// unsupported extension never fires a request.
    #[instrument(skip(self), fields(file = %path.display()))]
    pub async fn upload(&self, path: &Path) -> Result<ParseResponse, SyllabusError> {
        let mime = mime_for_extension(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("syllabus")
            .to_string();

        let bytes = fs::read(path).await?;
        debug!(bytes = bytes.len(), mime, "uploading syllabus file");

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| SyllabusError::Http(e.to_string()))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("file_type", mime);

        let response = self
            .client
            .post(format!("{}/api/parse-syllabus", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request failed");
                SyllabusError::Http(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ServiceErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| "Failed to parse syllabus".to_string());
            error!(status = %status, error = %message, "syllabus service error");
            return Err(SyllabusError::Service(message));
        }

        let parsed: ParseResponse = response
            .json()
            .await
            .map_err(|e| SyllabusError::Service(e.to_string()))?;
        info!(course = %parsed.syllabus_data.course_name, "syllabus parsed");
        Ok(parsed)
    }
}
