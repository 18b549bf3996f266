//! Action sequencing between forms, the backend and the output container

use crate::form::{ChatForm, FreeChatForm, HistoryForm, LookupForm, SummarizeForm, UploadForm};
use crate::render::{Panel, Renderer, ViewModel};
use crate::state::UiState;
use crate::tokens::{ActionKind, RequestToken, RequestTokens};
use gaief_client::Backend;
use gaief_core::{ChatRequest, GaiefError, Result, Role, UserRecord};
use parking_lot::RwLock;
use std::sync::Arc;

/// Result of one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The panel was written to the output container
    Applied(Panel),
    /// A newer action of the same kind started first; nothing was written
    Discarded,
}

impl ActionOutcome {
    /// Applied panel, if any
    pub fn panel(&self) -> Option<&Panel> {
        match self {
            ActionOutcome::Applied(panel) => Some(panel),
            ActionOutcome::Discarded => None,
        }
    }

    /// Whether the result was dropped as stale
    pub fn is_discarded(&self) -> bool {
        matches!(self, ActionOutcome::Discarded)
    }
}

/// State changes that go with a panel
#[derive(Default)]
struct Update {
    role: Option<Role>,
    user: Option<UserRecord>,
}

/// Runs user actions and owns the UI state
pub struct Orchestrator {
    backend: Arc<dyn Backend>,
    renderer: Renderer,
    tokens: RequestTokens,
    state: RwLock<UiState>,
}

impl Orchestrator {
    /// Create an orchestrator over a backend
    pub fn new(backend: Arc<dyn Backend>) -> Result<Self> {
        Ok(Self {
            backend,
            renderer: Renderer::new()?,
            tokens: RequestTokens::new(),
            state: RwLock::new(UiState::default()),
        })
    }

    /// Snapshot of the current state
    pub fn state(&self) -> UiState {
        self.state.read().clone()
    }

    /// Renderer used for every panel
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Generation counters
    pub fn tokens(&self) -> &RequestTokens {
        &self.tokens
    }

    /// Fetch a record and chat about it.
    ///
    /// `/chat` is only issued once the record fetch succeeded and no newer
    /// send has started.
    pub async fn send_message(&self, form: &ChatForm) -> ActionOutcome {
        let token = self.tokens.begin(ActionKind::SendMessage);
        let form = match form.validated() {
            Ok(form) => form,
            Err(e) => return self.fail(token, &e),
        };

        tracing::debug!(role = %form.role, user_id = %form.user_id, "Fetching context user");
        let user = match self
            .backend
            .fetch_user_record(form.role, &form.user_id)
            .await
        {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(user_id = %form.user_id, "User lookup failed, chat not sent: {}", e);
                let message = format!("User not found: {} {}", form.role.singular(), form.user_id);
                return self.fail_message(token, &message);
            }
        };

        if !self.tokens.is_current(&token) {
            tracing::warn!(generation = token.generation, "Send superseded before chat, skipping");
            return ActionOutcome::Discarded;
        }

        match self
            .backend
            .send_chat_message(form.role, &form.topic, &user)
            .await
        {
            Ok(reply) => {
                let panel = self.render(&ViewModel::Exchange {
                    question: &form.topic,
                    reply: &reply.reply,
                });
                tracing::info!(user_id = %form.user_id, "Chat reply received");
                self.apply(
                    token,
                    Update {
                        role: Some(form.role),
                        user: Some(user),
                    },
                    panel,
                )
            }
            Err(e) => self.fail_message(token, &chat_failure_message(&e)),
        }
    }

    /// Fetch a record and show it as a profile
    pub async fn lookup_user(&self, form: &LookupForm) -> ActionOutcome {
        let token = self.tokens.begin(ActionKind::Lookup);
        let form = match form.validated() {
            Ok(form) => form,
            Err(e) => return self.fail(token, &e),
        };

        match self
            .backend
            .fetch_user_record(form.role, &form.user_id)
            .await
        {
            Ok(user) => {
                let panel = self.render(&ViewModel::Profile {
                    role: form.role,
                    user: &user,
                });
                tracing::info!(role = %form.role, user_id = %form.user_id, "User record loaded");
                self.apply(
                    token,
                    Update {
                        role: Some(form.role),
                        user: Some(user),
                    },
                    panel,
                )
            }
            Err(e) => self.fail(token, &e),
        }
    }

    /// Chat with typed context
    pub async fn send_free_chat(&self, form: &FreeChatForm) -> ActionOutcome {
        let token = self.tokens.begin(ActionKind::FreeChat);
        let form = match form.validated() {
            Ok(form) => form,
            Err(e) => return self.fail(token, &e),
        };

        let request = ChatRequest::new(form.role, form.topic.as_str(), form.context.as_str());
        match self.backend.send_chat_request(&request).await {
            Ok(reply) => {
                let panel = self.render(&ViewModel::Exchange {
                    question: &form.topic,
                    reply: &reply.reply,
                });
                tracing::info!(role = %form.role, "Free chat reply received");
                self.apply(
                    token,
                    Update {
                        role: Some(form.role),
                        ..Default::default()
                    },
                    panel,
                )
            }
            Err(e) => self.fail_message(token, &chat_failure_message(&e)),
        }
    }

    /// Send a document for feedback
    pub async fn upload_document(&self, form: UploadForm) -> ActionOutcome {
        let token = self.tokens.begin(ActionKind::Upload);
        let (role, topic, document) = match form.validated() {
            Ok(parts) => parts,
            Err(e) => return self.fail(token, &e),
        };

        let file_name = document.file_name.clone();
        match self.backend.upload_document(document, role, &topic).await {
            Ok(reply) => {
                let panel = self.render(&ViewModel::Upload {
                    file_name: &file_name,
                    reply: &reply,
                });
                tracing::info!(file = %file_name, "Document feedback received");
                self.apply(
                    token,
                    Update {
                        role: Some(role),
                        ..Default::default()
                    },
                    panel,
                )
            }
            Err(e) => self.fail(token, &e),
        }
    }

    /// Show the backend health payload
    pub async fn check_health(&self) -> ActionOutcome {
        let token = self.tokens.begin(ActionKind::Health);
        match self.backend.check_health().await {
            Ok(health) => {
                let panel = self.render(&ViewModel::Json {
                    value: &health.0,
                    is_error: false,
                });
                tracing::info!(status = health.status().unwrap_or("unknown"), "Health checked");
                self.apply(token, Update::default(), panel)
            }
            Err(e) => self.fail(token, &e),
        }
    }

    /// Show past exchanges for a user
    pub async fn load_chat_history(&self, form: &HistoryForm) -> ActionOutcome {
        let token = self.tokens.begin(ActionKind::History);
        let form = match form.validated() {
            Ok(form) => form,
            Err(e) => return self.fail(token, &e),
        };

        match self
            .backend
            .fetch_chat_history(&form.user_id, form.role)
            .await
        {
            Ok(history) => {
                let panel = self.render(&ViewModel::History {
                    user_id: &form.user_id,
                    history: &history,
                });
                tracing::info!(
                    user_id = %form.user_id,
                    entries = history.chat_history.len(),
                    "Chat history loaded"
                );
                self.apply(
                    token,
                    Update {
                        role: Some(form.role),
                        ..Default::default()
                    },
                    panel,
                )
            }
            Err(e) => self.fail(token, &e),
        }
    }

    /// Show the raw debug record for a student
    pub async fn load_debug_record(&self, user_id: &str) -> ActionOutcome {
        let token = self.tokens.begin(ActionKind::Debug);
        let form = match LookupForm::new(Role::Students, user_id).validated() {
            Ok(form) => form,
            Err(e) => return self.fail(token, &e),
        };

        match self.backend.fetch_debug_record(&form.user_id).await {
            Ok(record) => {
                let panel = self.render(&ViewModel::Json {
                    value: &record.0,
                    is_error: false,
                });
                self.apply(token, Update::default(), panel)
            }
            Err(e) => self.fail(token, &e),
        }
    }

    /// Send a document to the OCR summary function
    pub async fn summarize_document(&self, form: SummarizeForm) -> ActionOutcome {
        let token = self.tokens.begin(ActionKind::Summarize);
        let document = match form.validated() {
            Ok(document) => document,
            Err(e) => return self.fail(token, &e),
        };

        match self.backend.summarize_document(document).await {
            Ok(summary) => {
                let panel = self.render(&ViewModel::OcrSummary { summary: &summary });
                tracing::info!(
                    file = summary.filename.as_deref().unwrap_or("unknown"),
                    "Document summarized"
                );
                self.apply(token, Update::default(), panel)
            }
            Err(e) => self.fail(token, &e),
        }
    }

    fn render(&self, view: &ViewModel<'_>) -> Panel {
        self.renderer
            .render(view)
            .unwrap_or_else(|e| self.renderer.render_error(&e))
    }

    fn fail(&self, token: RequestToken, err: &GaiefError) -> ActionOutcome {
        tracing::debug!(kind = ?token.kind, error_kind = ?err.kind(), "Action failed: {}", err);
        let panel = self.renderer.render_error(err);
        self.apply(token, Update::default(), panel)
    }

    fn fail_message(&self, token: RequestToken, message: &str) -> ActionOutcome {
        let panel = self.renderer.render_message(message);
        self.apply(token, Update::default(), panel)
    }

    /// Staleness check and write happen under one lock
    fn apply(&self, token: RequestToken, update: Update, panel: Panel) -> ActionOutcome {
        let mut state = self.state.write();
        if !self.tokens.is_current(&token) {
            tracing::warn!(
                kind = ?token.kind,
                generation = token.generation,
                latest = self.tokens.current(token.kind),
                "Discarding stale result"
            );
            return ActionOutcome::Discarded;
        }

        if let Some(role) = update.role {
            state.role = role;
        }
        if let Some(user) = update.user {
            state.current_user = Some(user);
        }
        state.show(token.kind, panel.clone());
        ActionOutcome::Applied(panel)
    }
}

/// Backend message when there is one, generic fallback otherwise
fn chat_failure_message(err: &GaiefError) -> String {
    match err.backend_message() {
        Some(message) => message.to_string(),
        None => format!("Chat failed: {}", err),
    }
}
