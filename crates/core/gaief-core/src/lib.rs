//! GAIEF client core
//!
//! Shared building blocks for talking to the GAIEF tutoring backend:
//!
//! - Wire types for user records, chat, history and document uploads
//! - Role handling (plural selector values, singular `user_role` fields)
//! - One error type with a validation/request split
//! - Environment-driven configuration and logging setup
//!
//! # Example
//!
//! ```
//! use gaief_core::{ChatRequest, Role, UserRecord};
//!
//! let user = UserRecord::new("S1001", "Aisha Khan").with_progress("Math", 88);
//! let request = ChatRequest::for_user(Role::Students, "fractions", &user).unwrap();
//! assert_eq!(request.user_role, "student");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::{
    get_env_int, get_env_or, get_required_env, load_env, load_env_from_path, ClientConfig,
};
pub use error::{error_message_from_body, ErrorKind, ErrorPayload, GaiefError, Result};
pub use types::*;
pub use utils::init_logging;
