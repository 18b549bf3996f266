//! GAIEF tutoring client UI layer
//!
//! Takes form input, drives the backend through [`gaief_client::Backend`]
//! and renders every outcome, success or failure, into one [`Panel`].
//!
//! - [`form`]: required-field validation, before any network call
//! - [`render`]: Handlebars-backed HTML and text panels
//! - [`orchestrator`]: action sequencing with stale-result discarding
//!
//! ```no_run
//! use gaief_client::ApiClient;
//! use gaief_core::Role;
//! use gaief_ui::{ChatForm, Orchestrator};
//! use std::sync::Arc;
//!
//! # async fn run() -> gaief_core::Result<()> {
//! let backend = Arc::new(ApiClient::with_base_url("http://127.0.0.1:8000")?);
//! let ui = Orchestrator::new(backend)?;
//! let outcome = ui
//!     .send_message(&ChatForm::new(Role::Students, "S1001", "fractions"))
//!     .await;
//! if let Some(panel) = outcome.panel() {
//!     println!("{}", panel.text);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod form;
pub mod orchestrator;
pub mod render;
pub mod state;
pub mod templates;
pub mod tokens;

pub use form::{ChatForm, FreeChatForm, HistoryForm, LookupForm, SummarizeForm, UploadForm};
pub use orchestrator::{ActionOutcome, Orchestrator};
pub use render::{clamp_score, format_timestamp, Panel, PanelStyle, Renderer, ViewModel};
pub use state::UiState;
pub use tokens::{ActionKind, RequestToken, RequestTokens};
