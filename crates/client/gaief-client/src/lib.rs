//! HTTP client for the GAIEF tutoring backend
//!
//! [`Backend`] is the set of calls the UI makes; [`ApiClient`] implements it
//! over reqwest against a configurable base URL.
//!
//! ```no_run
//! use gaief_client::{ApiClient, Backend};
//! use gaief_core::Role;
//!
//! # async fn run() -> gaief_core::Result<()> {
//! let client = ApiClient::with_base_url("http://127.0.0.1:8000")?;
//! let user = client.fetch_user_record(Role::Students, "S1001").await?;
//! let reply = client.send_chat_message(Role::Students, "fractions", &user).await?;
//! println!("{}", reply.reply);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod backend;

pub use api::ApiClient;
pub use backend::Backend;
