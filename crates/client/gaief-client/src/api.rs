//! reqwest implementation of [`Backend`]

use crate::backend::Backend;
use async_trait::async_trait;
use gaief_core::config::parse_http_url;
use gaief_core::{
    error_message_from_body, ChatHistory, ChatReply, ChatRequest, ChatResponseBody, ClientConfig,
    DebugRecord, DocumentUpload, GaiefError, HealthStatus, OcrSummary, Result, Role,
    UploadReply, UploadResponseBody, UserRecord,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// HTTP client for the tutoring backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    ocr_summary_url: Option<Url>,
}

impl ApiClient {
    /// Create a client from validated settings
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let base_url = parse_http_url("GAIEF_API_URL", &config.api_base_url)?;
        let ocr_summary_url = config
            .ocr_summary_url
            .as_deref()
            .map(|raw| parse_http_url("GAIEF_OCR_SUMMARY_URL", raw))
            .transpose()?;

        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(300))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url,
            ocr_summary_url,
        })
    }

    /// Create a client for a backend URL with default settings
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::new(&ClientConfig::default().with_api_base_url(base_url))
    }

    /// Backend URL in use
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET` on the OCR summary function; it reports whether it is configured
    pub async fn check_ocr_service(&self) -> Result<serde_json::Value> {
        let url = self.ocr_url()?;
        tracing::debug!(%url, "Probing OCR summary service");
        let (status, body) = self.execute(self.client.get(url)).await?;
        decode(status, &body)
    }

    /// Append percent-encoded path segments to the base URL. Dot segments
    /// are rejected since the URL parser would resolve them as navigation.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(GaiefError::validation(format!(
                "Invalid path segment: {:?}",
                bad
            )));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GaiefError::config("API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn ocr_url(&self) -> Result<Url> {
        self.ocr_summary_url.clone().ok_or_else(|| {
            GaiefError::config("OCR summary endpoint is not configured (set GAIEF_OCR_SUMMARY_URL)")
        })
    }

    async fn execute(&self, request: RequestBuilder) -> Result<(StatusCode, String)> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("Request failed before a response arrived: {}", e);
            GaiefError::Network(e)
        })?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Backend answered with an error status");
        }
        Ok((status, body))
    }
}

/// Non-OK becomes a backend error; otherwise parse JSON
fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    if !status.is_success() {
        return Err(GaiefError::backend(
            status.as_u16(),
            error_message_from_body(status.as_u16(), body),
        ));
    }
    Ok(serde_json::from_str(body)?)
}

fn file_part(document: DocumentUpload) -> Result<Part> {
    let part = Part::bytes(document.bytes)
        .file_name(document.file_name)
        .mime_str(&document.content_type)?;
    Ok(part)
}

#[async_trait]
impl Backend for ApiClient {
    async fn fetch_user_record(&self, role: Role, user_id: &str) -> Result<UserRecord> {
        let url = self.endpoint(&["api", "v1", role.plural(), user_id])?;
        tracing::debug!(%url, "Fetching user record");

        let (status, body) = self.execute(self.client.get(url)).await?;
        if !status.is_success() {
            return Err(GaiefError::not_found(error_message_from_body(
                status.as_u16(),
                &body,
            )));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_chat_message(
        &self,
        role: Role,
        topic: &str,
        context_user: &UserRecord,
    ) -> Result<ChatReply> {
        let request = ChatRequest::for_user(role, topic, context_user)?;
        self.send_chat_request(&request).await
    }

    async fn send_chat_request(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.endpoint(&["chat"])?;
        tracing::debug!(%url, user_role = %request.user_role, "Sending chat request");

        let (status, body) = self.execute(self.client.post(url).json(request)).await?;
        let parsed: ChatResponseBody = decode(status, &body)?;
        parsed.into_result(status.as_u16())
    }

    async fn upload_document(
        &self,
        document: DocumentUpload,
        role: Role,
        topic: &str,
    ) -> Result<UploadReply> {
        let url = self.endpoint(&["upload-test"])?;
        tracing::debug!(%url, file = %document.file_name, "Uploading document");

        let form = Form::new()
            .part("file", file_part(document)?)
            .text("role", role.singular())
            .text("topic", topic.to_string());

        let (status, body) = self.execute(self.client.post(url).multipart(form)).await?;
        let parsed: UploadResponseBody = decode(status, &body)?;
        parsed.into_result(status.as_u16())
    }

    async fn check_health(&self) -> Result<HealthStatus> {
        let url = self.endpoint(&["health"])?;
        let (status, body) = self.execute(self.client.get(url)).await?;
        decode(status, &body)
    }

    async fn fetch_chat_history(&self, user_id: &str, role: Role) -> Result<ChatHistory> {
        let mut url = self.endpoint(&["debug", "chat-history", user_id])?;
        url.query_pairs_mut()
            .append_pair("user_role", role.singular());
        tracing::debug!(%url, "Fetching chat history");

        let (status, body) = self.execute(self.client.get(url)).await?;
        decode(status, &body)
    }

    async fn fetch_debug_record(&self, user_id: &str) -> Result<DebugRecord> {
        let url = self.endpoint(&["debug", "student", user_id])?;
        let (status, body) = self.execute(self.client.get(url)).await?;
        decode(status, &body)
    }

    async fn summarize_document(&self, document: DocumentUpload) -> Result<OcrSummary> {
        let url = self.ocr_url()?;
        tracing::debug!(%url, file = %document.file_name, "Sending document for OCR summary");

        let form = Form::new().part("file", file_part(document)?);
        let (status, body) = self.execute(self.client.post(url).multipart(form)).await?;

        // The function reports processing failures as 500 with a JSON body
        let parsed: OcrSummary = match serde_json::from_str(&body) {
            Ok(summary) => summary,
            Err(_) if !status.is_success() => {
                return Err(GaiefError::backend(
                    status.as_u16(),
                    error_message_from_body(status.as_u16(), &body),
                ))
            }
            Err(e) => return Err(e.into()),
        };
        parsed.into_result(status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = ApiClient::with_base_url("http://localhost:8000").unwrap();
        let url = client
            .endpoint(&["api", "v1", "students", "a/b c"])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/students/a%2Fb%20c");
    }

    #[test]
    fn test_endpoint_rejects_dot_segments() {
        let client = ApiClient::with_base_url("http://localhost:8000").unwrap();
        for id in ["..", ".", ""] {
            let err = client.endpoint(&["api", "v1", "students", id]).unwrap_err();
            assert!(matches!(err, GaiefError::Validation(_)), "id {:?}", id);
        }
        let url = client.endpoint(&["api", "v1", "students", "..S1"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/students/..S1");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = ApiClient::with_base_url("http://localhost:8000/gaief/").unwrap();
        let url = client.endpoint(&["health"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/gaief/health");
    }

    #[test]
    fn test_missing_ocr_url_is_config_error() {
        let client = ApiClient::with_base_url("http://localhost:8000").unwrap();
        assert!(matches!(client.ocr_url(), Err(GaiefError::Config(_))));
    }

    #[test]
    fn test_decode_non_ok() {
        let err = decode::<serde_json::Value>(StatusCode::BAD_GATEWAY, "").unwrap_err();
        assert!(matches!(err, GaiefError::Backend { status: 502, .. }));
        assert_eq!(err.to_string(), "Status 502");
    }
}
