//! What the single output container currently shows

use crate::render::Panel;
use crate::tokens::ActionKind;
use gaief_core::{Role, UserRecord};

/// UI state owned by the orchestrator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Role of the last action that carried one
    pub role: Role,
    /// Record shown by the last successful lookup or used by the last chat
    pub current_user: Option<UserRecord>,
    /// Contents of the output container
    pub panel: Option<Panel>,
    /// Which action wrote `panel`
    pub last_action: Option<ActionKind>,
}

impl UiState {
    /// Replace the panel
    pub fn show(&mut self, kind: ActionKind, panel: Panel) {
        self.last_action = Some(kind);
        self.panel = Some(panel);
    }
}
