#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};

pub use card::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use generator::*;
pub use types::*;

mod card;
mod engine;
mod error;
mod events;
mod generator;
mod scheduler;
mod types;

/// Fixed card-face alphabet; each difficulty selects from a prefix of it.
pub const SYMBOLS: [Symbol; 16] = [
    '🐶', '🐱', '🐭', '🐹', '🐰', '🦊', '🐻', '🐼', '🐨', '🐯', '🦁', '🐮', '🐷', '🐸', '🐵', '🐔',
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn total_pairs(self) -> PairCount {
        match self {
            Self::Easy => 8,
            Self::Medium => 18,
            Self::Hard => 32,
        }
    }

    pub const fn total_cards(self) -> usize {
        self.total_pairs() as usize * 2
    }

    pub const fn grid_columns(self) -> u8 {
        match self {
            Self::Easy => 4,
            Self::Medium => 6,
            Self::Hard => 8,
        }
    }

    /// One symbol per pair slot, before duplication and shuffling.
    ///
    /// Medium reuses the first six symbols on top of the first twelve, so
    /// those six end up with four copies on the board instead of two. The
    /// original game shipped this way; kept as-is rather than "fixed" to
    /// clean pairs.
    pub fn pair_symbols(self) -> Vec<Symbol> {
        match self {
            Self::Easy => SYMBOLS[..8].to_vec(),
            Self::Medium => {
                let mut symbols = SYMBOLS[..12].to_vec();
                symbols.extend_from_slice(&SYMBOLS[..6]);
                symbols
            }
            Self::Hard => {
                let mut symbols = SYMBOLS.to_vec();
                symbols.extend_from_slice(&SYMBOLS);
                symbols
            }
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

/// Ordered card sequence for one round; length is `2 × total_pairs`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Builds a face-down deck from an explicit symbol sequence.
    pub fn from_symbols<I: IntoIterator<Item = Symbol>>(symbols: I) -> Self {
        let cards: Vec<Card> = symbols.into_iter().map(Card::hidden).collect();
        if cards.len() % 2 != 0 {
            log::warn!("deck has an odd card count: {}", cards.len());
        }
        Self { cards }
    }

    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    pub fn total_pairs(&self) -> PairCount {
        (self.cards.len() / 2) as PairCount
    }

    pub fn validate_position(&self, position: Position) -> Result<Position> {
        if usize::from(position) < self.cards.len() {
            Ok(position)
        } else {
            Err(GameError::InvalidPosition)
        }
    }

    pub fn get(&self, position: Position) -> Option<Card> {
        self.cards.get(usize::from(position)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().copied()
    }

    /// Positions of every card that has not been matched yet, in order.
    pub fn unmatched_positions(&self) -> Vec<Position> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, card)| !card.state.is_matched())
            .map(|(position, _)| position as Position)
            .collect()
    }
}

impl Index<Position> for Deck {
    type Output = Card;

    fn index(&self, position: Position) -> &Self::Output {
        &self.cards[usize::from(position)]
    }
}

impl IndexMut<Position> for Deck {
    fn index_mut(&mut self, position: Position) -> &mut Self::Output {
        &mut self.cards[usize::from(position)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlipOutcome {
    NoChange,
    FirstUp,
    Matched,
    Mismatched,
    Won,
}

impl FlipOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HintOutcome {
    NoChange,
    Revealed,
}

impl HintOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Revealed)
    }
}
