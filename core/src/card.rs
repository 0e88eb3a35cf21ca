use serde::{Deserialize, Serialize};

use crate::Symbol;

/// Canonical player-visible state of a single card slot.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CardState {
    Hidden,
    Flipped,
    Matched,
}

impl CardState {
    pub const fn is_face_up(self) -> bool {
        matches!(self, Self::Flipped | Self::Matched)
    }

    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Matched)
    }
}

impl Default for CardState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One card slot; its position is the index into the [`Deck`](crate::Deck).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub symbol: Symbol,
    pub state: CardState,
}

impl Card {
    pub const fn hidden(symbol: Symbol) -> Self {
        Self {
            symbol,
            state: CardState::Hidden,
        }
    }
}
