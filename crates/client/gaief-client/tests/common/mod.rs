//! Mock tutoring backend for client tests

#![allow(dead_code)]

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

// ============================================================================
// Recorded traffic
// ============================================================================

/// One request seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Value,
}

/// One multipart part seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl RecordedPart {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).to_string()
    }
}

// ============================================================================
// Mock backend
// ============================================================================

/// Canned responses plus a log of what arrived
pub struct MockBackendState {
    /// Records keyed by (plural role, id)
    pub users: RwLock<HashMap<(String, String), Value>>,
    /// Status and body returned by `/chat`
    pub chat_response: RwLock<(StatusCode, Value)>,
    /// Status and body returned by `/upload-test`
    pub upload_response: RwLock<(StatusCode, Value)>,
    /// Status and body returned by the OCR function
    pub ocr_response: RwLock<(StatusCode, Value)>,
    /// Chat history per user id
    pub histories: RwLock<HashMap<String, Value>>,
    /// Every request, in arrival order
    pub requests: RwLock<Vec<RecordedRequest>>,
    /// Multipart parts of the latest upload
    pub last_parts: RwLock<Vec<RecordedPart>>,
}

impl Default for MockBackendState {
    fn default() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            chat_response: RwLock::new((StatusCode::OK, json!({"reply": "Mock reply"}))),
            upload_response: RwLock::new((
                StatusCode::OK,
                json!({"reply": "Mock document feedback", "extracted_text": "2 + 2 = 4"}),
            )),
            ocr_response: RwLock::new((
                StatusCode::OK,
                json!({
                    "message": "Document processed successfully",
                    "filename": "worksheet.pdf",
                    "extracted_text_length": 9,
                    "extracted_text_preview": "2 + 2 = 4",
                    "summary": "A one-line arithmetic worksheet",
                    "status": "completed"
                }),
            )),
            histories: RwLock::new(HashMap::new()),
            requests: RwLock::new(Vec::new()),
            last_parts: RwLock::new(Vec::new()),
        }
    }
}

impl MockBackendState {
    pub async fn add_user(&self, role: &str, id: &str, record: Value) {
        self.users
            .write()
            .await
            .insert((role.to_string(), id.to_string()), record);
    }

    pub async fn set_chat_response(&self, status: StatusCode, body: Value) {
        *self.chat_response.write().await = (status, body);
    }

    pub async fn set_upload_response(&self, status: StatusCode, body: Value) {
        *self.upload_response.write().await = (status, body);
    }

    pub async fn set_ocr_response(&self, status: StatusCode, body: Value) {
        *self.ocr_response.write().await = (status, body);
    }

    pub async fn requests_to(&self, path_prefix: &str) -> Vec<RecordedRequest> {
        self.requests
            .read()
            .await
            .iter()
            .filter(|r| r.path.starts_with(path_prefix))
            .cloned()
            .collect()
    }

    async fn record(&self, method: &str, path: String, query: HashMap<String, String>, body: Value) {
        self.requests.write().await.push(RecordedRequest {
            method: method.to_string(),
            path,
            query,
            body,
        });
    }
}

/// Start the mock on an ephemeral port
pub async fn start_mock_backend() -> (SocketAddr, Arc<MockBackendState>) {
    let state = Arc::new(MockBackendState::default());

    let app = Router::new()
        .route("/api/v1/:role/:id", get(mock_get_user))
        .route("/chat", post(mock_chat))
        .route("/upload-test", post(mock_upload))
        .route("/health", get(mock_health))
        .route("/debug/chat-history/:id", get(mock_chat_history))
        .route("/debug/student/:id", get(mock_debug_student))
        .route("/ocr/summary", get(mock_ocr_status).post(mock_ocr_summary))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

/// Client pointed at the mock, with the OCR function configured
pub fn client_for(addr: SocketAddr) -> gaief_client::ApiClient {
    let config = gaief_core::ClientConfig::default()
        .with_api_base_url(format!("http://{}", addr))
        .with_ocr_summary_url(format!("http://{}/ocr/summary", addr));
    gaief_client::ApiClient::new(&config).unwrap()
}

async fn mock_get_user(
    State(state): State<Arc<MockBackendState>>,
    Path((role, id)): Path<(String, String)>,
) -> impl IntoResponse {
    state
        .record("GET", format!("/api/v1/{}/{}", role, id), HashMap::new(), Value::Null)
        .await;

    match state.users.read().await.get(&(role.clone(), id)) {
        Some(record) => (StatusCode::OK, Json(record.clone())),
        None => {
            let mut label = role.trim_end_matches('s').to_string();
            if let Some(first) = label.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            (
                StatusCode::NOT_FOUND,
                Json(json!({"detail": format!("{} not found", label)})),
            )
        }
    }
}

async fn mock_chat(
    State(state): State<Arc<MockBackendState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state
        .record("POST", "/chat".to_string(), HashMap::new(), body)
        .await;
    let (status, body) = state.chat_response.read().await.clone();
    (status, Json(body))
}

async fn mock_upload(
    State(state): State<Arc<MockBackendState>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap_or_default().to_vec();
        parts.push(RecordedPart {
            name,
            file_name,
            content_type,
            data,
        });
    }
    *state.last_parts.write().await = parts;
    state
        .record("POST", "/upload-test".to_string(), HashMap::new(), Value::Null)
        .await;

    let (status, body) = state.upload_response.read().await.clone();
    (status, Json(body))
}

async fn mock_health(State(state): State<Arc<MockBackendState>>) -> impl IntoResponse {
    state
        .record("GET", "/health".to_string(), HashMap::new(), Value::Null)
        .await;
    Json(json!({"status": "ok"}))
}

async fn mock_chat_history(
    State(state): State<Arc<MockBackendState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state
        .record("GET", format!("/debug/chat-history/{}", id), query, Value::Null)
        .await;

    let history = state
        .histories
        .read()
        .await
        .get(&id)
        .cloned()
        .unwrap_or_else(|| json!({"chat_history_count": 0, "chat_history": []}));
    Json(history)
}

async fn mock_debug_student(
    State(state): State<Arc<MockBackendState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    state
        .record("GET", format!("/debug/student/{}", id), HashMap::new(), Value::Null)
        .await;

    match state
        .users
        .read()
        .await
        .get(&("students".to_string(), id.clone()))
    {
        Some(record) => (
            StatusCode::OK,
            Json(json!({"student_id": id, "record": record})),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Student not found"})),
        ),
    }
}

async fn mock_ocr_status(State(state): State<Arc<MockBackendState>>) -> impl IntoResponse {
    state
        .record("GET", "/ocr/summary".to_string(), HashMap::new(), Value::Null)
        .await;
    Json(json!({
        "status": "OCR summary function is running",
        "environment_check": {"endpoint_configured": true, "key_configured": true}
    }))
}

async fn mock_ocr_summary(
    State(state): State<Arc<MockBackendState>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap_or_default().to_vec();
        parts.push(RecordedPart {
            name,
            file_name,
            content_type,
            data,
        });
    }
    *state.last_parts.write().await = parts;
    state
        .record("POST", "/ocr/summary".to_string(), HashMap::new(), Value::Null)
        .await;

    let (status, body) = state.ocr_response.read().await.clone();
    (status, Json(body))
}
