//! Wire types shared by the client and the UI

pub mod chat;
pub mod document;
pub mod role;
pub mod status;
pub mod user;

// Re-export commonly used types
pub use chat::*;
pub use document::*;
pub use role::*;
pub use status::*;
pub use user::*;
