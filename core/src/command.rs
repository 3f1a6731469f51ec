use crate::{
    chart::{ChartRequest, HistoryWindow},
    resource::{Category, Direction},
};
use serde::{Deserialize, Serialize};

/// Player-issued chart commands.
/// Variants are appended only, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ChartCommand {
    // ── Panel ─────────────────────────────────────
    SetDirection { direction: Direction },
    ToggleDirection,
    SetWindow { window: HistoryWindow },

    // ── Curves ────────────────────────────────────
    ToggleCategory { category: Category },
    SetCategory { category: Category, enabled: bool },
}

impl ChartCommand {
    /// Apply to `request`. Returns false if nothing changed.
    pub fn apply(&self, request: &mut ChartRequest) -> bool {
        let before = *request;
        match self {
            Self::SetDirection { direction } => request.direction = *direction,
            Self::ToggleDirection => request.direction = request.direction.toggled(),
            Self::SetWindow { window } => request.window = *window,
            Self::ToggleCategory { category } => request.enabled.toggle(*category),
            Self::SetCategory { category, enabled } => request.enabled.set(*category, *enabled),
        }
        *request != before
    }
}
