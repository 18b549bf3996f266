//! Request generations per action kind

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

const KIND_COUNT: usize = 8;

/// User-triggerable actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Fetch and show a user record
    Lookup,
    /// Record fetch followed by `/chat`
    SendMessage,
    /// `/chat` with typed context
    FreeChat,
    /// Document feedback
    Upload,
    /// `/health`
    Health,
    /// Chat history
    History,
    /// Raw debug record
    Debug,
    /// OCR summary function
    Summarize,
}

impl ActionKind {
    /// Every kind, in counter order
    pub const ALL: [ActionKind; KIND_COUNT] = [
        ActionKind::Lookup,
        ActionKind::SendMessage,
        ActionKind::FreeChat,
        ActionKind::Upload,
        ActionKind::Health,
        ActionKind::History,
        ActionKind::Debug,
        ActionKind::Summarize,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Proof of when an action started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    /// Action this token belongs to
    pub kind: ActionKind,
    /// Generation at start
    pub generation: u64,
}

/// Monotonic generation counter for each action kind
#[derive(Debug, Default)]
pub struct RequestTokens {
    generations: [AtomicU64; KIND_COUNT],
}

impl RequestTokens {
    /// Create counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an action, superseding any older one of the same kind
    pub fn begin(&self, kind: ActionKind) -> RequestToken {
        let generation = self.generations[kind.index()].fetch_add(1, Ordering::SeqCst) + 1;
        RequestToken { kind, generation }
    }

    /// Whether no newer action of the same kind has started
    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.current(token.kind) == token.generation
    }

    /// Latest generation handed out for a kind
    pub fn current(&self, kind: ActionKind) -> u64 {
        self.generations[kind.index()].load(Ordering::SeqCst)
    }
}
