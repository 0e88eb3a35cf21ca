use serde::{Deserialize, Serialize};

use crate::{CardState, PairCount, Position, Score};

/// Final snapshot reported once the last pair has been matched.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub minutes: u32,
    pub seconds: u32,
    pub moves: u32,
    pub score: Score,
}

/// Outbound notifications for the display layer, drained in emission order
/// via [`GameEngine::drain_events`](crate::GameEngine::drain_events).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GameEvent {
    TimerTick { minutes: u32, seconds: u32 },
    MovesChanged(u32),
    ScoreChanged(Score),
    PairsChanged { matched: PairCount, total: PairCount },
    CardStateChanged { position: Position, state: CardState },
    GameStarted,
    GameReset,
    GameEnded(GameSummary),
}
