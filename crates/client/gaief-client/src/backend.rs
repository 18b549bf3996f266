//! The seam between the orchestrator and the network

use async_trait::async_trait;
use gaief_core::{
    ChatHistory, ChatReply, ChatRequest, DebugRecord, DocumentUpload, HealthStatus, OcrSummary,
    Result, Role, UploadReply, UserRecord,
};

/// Every call the UI makes against the backend and the OCR function.
///
/// Errors come back already normalized: a non-OK status and an `{error}`
/// body both surface as [`gaief_core::GaiefError`] with the server's message.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /api/v1/{role}/{id}`; non-OK status is `NotFound`
    async fn fetch_user_record(&self, role: Role, user_id: &str) -> Result<UserRecord>;

    /// `POST /chat` with the record JSON-stringified into `context`
    async fn send_chat_message(
        &self,
        role: Role,
        topic: &str,
        context_user: &UserRecord,
    ) -> Result<ChatReply>;

    /// `POST /chat` with a prepared request
    async fn send_chat_request(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// `POST /upload-test` as multipart `file`, `role`, `topic`
    async fn upload_document(
        &self,
        document: DocumentUpload,
        role: Role,
        topic: &str,
    ) -> Result<UploadReply>;

    /// `GET /health`
    async fn check_health(&self) -> Result<HealthStatus>;

    /// `GET /debug/chat-history/{id}?user_role={singular}`
    async fn fetch_chat_history(&self, user_id: &str, role: Role) -> Result<ChatHistory>;

    /// `GET /debug/student/{id}`
    async fn fetch_debug_record(&self, user_id: &str) -> Result<DebugRecord>;

    /// `POST` multipart `file` to the OCR summary function
    async fn summarize_document(&self, document: DocumentUpload) -> Result<OcrSummary>;
}
