use serde::{Deserialize, Serialize};

/// Player-visible state of a single board cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    Default,
    Highlighted,
    Correct,
    Wrong,
}

impl CellStatus {
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }

    pub const fn is_highlighted(self) -> bool {
        matches!(self, Self::Highlighted)
    }

    /// A resolved cell has already decided a round and stays marked until the
    /// next full board reset.
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Correct | Self::Wrong)
    }
}

impl Default for CellStatus {
    fn default() -> Self {
        Self::Default
    }
}
