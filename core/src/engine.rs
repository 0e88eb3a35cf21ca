use alloc::collections::VecDeque;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::scheduler::{DeferredAction, TaskQueue};
use crate::*;

/// Fixed delay for mismatch reverts, hint reverts, and the end-of-game
/// summary, in virtual milliseconds.
pub const FLIP_BACK_DELAY_MS: Millis = 1000;

const SECOND_MS: Millis = 1000;
const MATCH_BASE_POINTS: Score = 100;
const MATCH_BONUS_POINTS: Score = 50;
const FAST_MATCH_SECONDS: u32 = 30;
const HINT_PENALTY: Score = 50;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    Ready,
    Active,
    Won,
}

impl GamePhase {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_won(self) -> bool {
        matches!(self, Self::Won)
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::Ready
    }
}

/// Owns all mutable state for one concentration round: the deck, the flip
/// selection, counters, the session clock, and pending deferred actions.
///
/// The engine never touches a wall clock; the driver feeds it elapsed time
/// through [`advance_time`](Self::advance_time) and drains notifications from
/// [`drain_events`](Self::drain_events).
#[derive(Clone, Debug)]
pub struct GameEngine {
    difficulty: Difficulty,
    deck: Deck,
    phase: GamePhase,
    minutes: u32,
    seconds: u32,
    moves: u32,
    score: Score,
    matched_pairs: PairCount,
    flipped: SmallVec<[Position; 2]>,
    can_flip: bool,
    now: Millis,
    tick_carry: Millis,
    tasks: TaskQueue,
    rng: SmallRng,
    events: VecDeque<GameEvent>,
}

impl GameEngine {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let deck = ShuffledDeckGenerator::new(rng.random()).generate(difficulty);
        Self::from_parts(difficulty, deck, rng)
    }

    /// Builds an engine over an explicit deck layout instead of a shuffled
    /// one. [`reset`](Self::reset) still regenerates a shuffled deck.
    pub fn with_deck(difficulty: Difficulty, deck: Deck, seed: u64) -> Self {
        Self::from_parts(difficulty, deck, SmallRng::seed_from_u64(seed))
    }

    fn from_parts(difficulty: Difficulty, deck: Deck, rng: SmallRng) -> Self {
        Self {
            difficulty,
            deck,
            phase: Default::default(),
            minutes: 0,
            seconds: 0,
            moves: 0,
            score: 0,
            matched_pairs: 0,
            flipped: SmallVec::new(),
            can_flip: true,
            now: 0,
            tick_carry: 0,
            tasks: TaskQueue::default(),
            rng,
            events: VecDeque::new(),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn card_at(&self, position: Position) -> Option<Card> {
        self.deck.get(position)
    }

    /// Session clock as `(minutes, seconds)`; seconds roll over at 60.
    pub fn clock(&self) -> (u32, u32) {
        (self.minutes, self.seconds)
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn matched_pairs(&self) -> PairCount {
        self.matched_pairs
    }

    pub fn total_pairs(&self) -> PairCount {
        self.deck.total_pairs()
    }

    /// Whether the flip gate is open. False exactly while a mismatched pair
    /// is waiting to be flipped back.
    pub fn is_accepting_input(&self) -> bool {
        self.can_flip
    }

    /// Drains the outbound notifications accumulated since the last drain,
    /// in emission order.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// NotStarted → Running. No-op when the session is already started.
    pub fn start(&mut self) {
        if !self.phase.is_ready() {
            return;
        }
        self.phase = GamePhase::Active;
        self.emit(GameEvent::GameStarted);
    }

    /// Advances the virtual clock, firing due one-shot actions and, while
    /// the session runs, the per-second timer tick.
    pub fn advance_time(&mut self, elapsed: Millis) {
        self.now += elapsed;
        while let Some(action) = self.tasks.pop_due(self.now) {
            self.fire(action);
        }

        if self.phase.is_active() {
            self.tick_carry += elapsed;
            while self.tick_carry >= SECOND_MS {
                self.tick_carry -= SECOND_MS;
                self.tick_second();
            }
        } else {
            self.tick_carry = 0;
        }
    }

    fn tick_second(&mut self) {
        self.seconds += 1;
        if self.seconds == 60 {
            self.minutes += 1;
            self.seconds = 0;
        }
        self.emit(GameEvent::TimerTick {
            minutes: self.minutes,
            seconds: self.seconds,
        });
    }

    /// Flips the card at `position`. Silently inert when input is gated, the
    /// session is not running, or the card is already face up.
    pub fn flip(&mut self, position: Position) -> Result<FlipOutcome> {
        let position = self.deck.validate_position(position)?;

        if !self.phase.is_active() || !self.can_flip {
            return Ok(FlipOutcome::NoChange);
        }
        if self.deck[position].state.is_face_up() {
            return Ok(FlipOutcome::NoChange);
        }

        self.set_card_state(position, CardState::Flipped);
        self.flipped.push(position);

        if self.flipped.len() < 2 {
            return Ok(FlipOutcome::FirstUp);
        }

        self.can_flip = false;
        self.moves += 1;
        self.emit(GameEvent::MovesChanged(self.moves));

        let (first, second) = (self.flipped[0], self.flipped[1]);
        if self.deck[first].symbol == self.deck[second].symbol {
            Ok(self.resolve_match(first, second))
        } else {
            self.tasks.schedule(
                self.now + FLIP_BACK_DELAY_MS,
                DeferredAction::RevertMismatch(first, second),
            );
            Ok(FlipOutcome::Mismatched)
        }
    }

    fn resolve_match(&mut self, first: Position, second: Position) -> FlipOutcome {
        self.set_card_state(first, CardState::Matched);
        self.set_card_state(second, CardState::Matched);
        self.matched_pairs += 1;
        self.award_match_points();
        self.emit(GameEvent::PairsChanged {
            matched: self.matched_pairs,
            total: self.total_pairs(),
        });

        self.flipped.clear();
        self.can_flip = true;

        if self.matched_pairs == self.total_pairs() {
            self.finish();
            FlipOutcome::Won
        } else {
            FlipOutcome::Matched
        }
    }

    fn award_match_points(&mut self) {
        // Bonuses read the live session counters, not per-pair timestamps,
        // and the seconds counter has already rolled over at each minute.
        let mut points = MATCH_BASE_POINTS;
        if self.seconds < FAST_MATCH_SECONDS {
            points += MATCH_BONUS_POINTS;
        }
        if self.moves < u32::from(self.total_pairs()) * 2 {
            points += MATCH_BONUS_POINTS;
        }
        self.score += points;
        self.emit(GameEvent::ScoreChanged(self.score));
    }

    fn finish(&mut self) {
        self.phase = GamePhase::Won;
        let summary = GameSummary {
            minutes: self.minutes,
            seconds: self.seconds,
            moves: self.moves,
            score: self.score,
        };
        // Delayed so the last matched pair stays visible before the summary.
        self.tasks.schedule(
            self.now + FLIP_BACK_DELAY_MS,
            DeferredAction::EmitSummary(summary),
        );
    }

    /// Briefly reveals a random unmatched pair for the fixed delay, at a
    /// score penalty. Inert while a selection is pending or before start.
    pub fn hint(&mut self) -> HintOutcome {
        if !self.phase.is_active() || !self.flipped.is_empty() {
            return HintOutcome::NoChange;
        }

        let pool = self.deck.unmatched_positions();
        if pool.len() < 2 {
            return HintOutcome::NoChange;
        }

        let first = pool[self.rng.random_range(0..pool.len())];
        let partners: SmallVec<[Position; 4]> = pool
            .iter()
            .copied()
            .filter(|&p| p != first && self.deck[p].symbol == self.deck[first].symbol)
            .collect();
        if partners.is_empty() {
            log::debug!("no partner left for hint card {first}");
            return HintOutcome::NoChange;
        }
        let second = partners[self.rng.random_range(0..partners.len())];

        self.set_card_state(first, CardState::Flipped);
        self.set_card_state(second, CardState::Flipped);
        self.tasks.schedule(
            self.now + FLIP_BACK_DELAY_MS,
            DeferredAction::RevertHint(first, second),
        );

        self.score = self.score.saturating_sub(HINT_PENALTY);
        self.emit(GameEvent::ScoreChanged(self.score));
        HintOutcome::Revealed
    }

    /// Stops the clock, zeroes the session, cancels pending deferred actions,
    /// and deals a fresh shuffled deck for the current difficulty.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Ready;
        self.minutes = 0;
        self.seconds = 0;
        self.moves = 0;
        self.score = 0;
        self.matched_pairs = 0;
        self.flipped.clear();
        self.can_flip = true;
        self.now = 0;
        self.tick_carry = 0;
        self.tasks.clear();
        self.deck = ShuffledDeckGenerator::new(self.rng.random()).generate(self.difficulty);
        self.emit(GameEvent::GameReset);
    }

    /// Switches the board parameters; implies a [`reset`](Self::reset).
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.reset();
    }

    fn fire(&mut self, action: DeferredAction) {
        match action {
            DeferredAction::RevertMismatch(first, second) => {
                self.revert_if_flipped(first);
                self.revert_if_flipped(second);
                self.flipped.clear();
                self.can_flip = true;
            }
            DeferredAction::RevertHint(first, second) => {
                self.revert_if_flipped(first);
                self.revert_if_flipped(second);
            }
            DeferredAction::EmitSummary(summary) => {
                self.emit(GameEvent::GameEnded(summary));
            }
        }
    }

    fn revert_if_flipped(&mut self, position: Position) {
        // Stale tasks may fire against a card that was reset or matched in
        // the meantime; only a still-flipped card goes back down.
        if self.deck[position].state == CardState::Flipped {
            self.set_card_state(position, CardState::Hidden);
        }
    }

    fn set_card_state(&mut self, position: Position, state: CardState) {
        if self.deck[position].state != state {
            self.deck[position].state = state;
            self.emit(GameEvent::CardStateChanged { position, state });
        }
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn engine(symbols: &[Symbol]) -> GameEngine {
        let deck = Deck::from_symbols(symbols.iter().copied());
        let mut engine = GameEngine::with_deck(Difficulty::Easy, deck, 1234);
        engine.start();
        engine.drain_events().for_each(drop);
        engine
    }

    fn events(engine: &mut GameEngine) -> Vec<GameEvent> {
        engine.drain_events().collect()
    }

    #[test]
    fn flip_before_start_is_inert() {
        let deck = Deck::from_symbols(['a', 'a']);
        let mut engine = GameEngine::with_deck(Difficulty::Easy, deck, 0);

        assert_eq!(engine.flip(0), Ok(FlipOutcome::NoChange));
        assert_eq!(engine.card_at(0).unwrap().state, CardState::Hidden);
        assert_eq!(engine.moves(), 0);
        assert!(events(&mut engine).is_empty());
    }

    #[test]
    fn matching_pair_resolves_synchronously() {
        let mut engine = engine(&['a', 'a', 'b', 'b']);
        engine.advance_time(5_000);

        assert_eq!(engine.flip(0), Ok(FlipOutcome::FirstUp));
        assert_eq!(engine.flip(1), Ok(FlipOutcome::Matched));

        assert_eq!(engine.moves(), 1);
        assert_eq!(engine.score(), 200);
        assert_eq!(engine.matched_pairs(), 1);
        assert_eq!(engine.card_at(0).unwrap().state, CardState::Matched);
        assert_eq!(engine.card_at(1).unwrap().state, CardState::Matched);
        assert!(engine.is_accepting_input());

        let emitted = events(&mut engine);
        assert!(emitted.contains(&GameEvent::MovesChanged(1)));
        assert!(emitted.contains(&GameEvent::ScoreChanged(200)));
        assert!(emitted.contains(&GameEvent::PairsChanged {
            matched: 1,
            total: 2
        }));
    }

    #[test]
    fn mismatch_blocks_input_until_the_delay_elapses() {
        let mut engine = engine(&['a', 'b', 'a', 'b']);

        assert_eq!(engine.flip(0), Ok(FlipOutcome::FirstUp));
        assert_eq!(engine.flip(1), Ok(FlipOutcome::Mismatched));
        assert!(!engine.is_accepting_input());
        assert_eq!(engine.moves(), 1);

        // Gated flips leave no trace.
        assert_eq!(engine.flip(2), Ok(FlipOutcome::NoChange));
        assert_eq!(engine.card_at(2).unwrap().state, CardState::Hidden);

        engine.advance_time(FLIP_BACK_DELAY_MS);

        assert!(engine.is_accepting_input());
        assert_eq!(engine.card_at(0).unwrap().state, CardState::Hidden);
        assert_eq!(engine.card_at(1).unwrap().state, CardState::Hidden);
        assert_eq!(engine.flip(2), Ok(FlipOutcome::FirstUp));
    }

    #[test]
    fn flip_ignores_face_up_and_out_of_range_cards() {
        let mut engine = engine(&['a', 'a', 'b', 'b']);
        engine.flip(0).unwrap();

        assert_eq!(engine.flip(0), Ok(FlipOutcome::NoChange));
        assert_eq!(engine.moves(), 0);

        engine.flip(1).unwrap();
        assert_eq!(engine.flip(0), Ok(FlipOutcome::NoChange));
        assert_eq!(engine.flip(1), Ok(FlipOutcome::NoChange));
        assert_eq!(engine.moves(), 1);

        assert_eq!(engine.flip(99), Err(GameError::InvalidPosition));
    }

    #[test]
    fn move_bonus_is_dropped_once_moves_pile_up() {
        let mut engine = engine(&['a', 'b', 'a', 'b']);

        // Burn moves on mismatches until moves >= total_pairs * 2.
        for _ in 0..4 {
            engine.flip(0).unwrap();
            engine.flip(1).unwrap();
            engine.advance_time(FLIP_BACK_DELAY_MS);
        }
        assert_eq!(engine.moves(), 4);

        engine.flip(0).unwrap();
        engine.flip(2).unwrap();

        // Base 100 + fast bonus 50, no low-move bonus at 5 moves vs cap 4.
        assert_eq!(engine.score(), 150);
    }

    #[test]
    fn fast_bonus_reads_the_rolled_over_seconds_counter() {
        let mut engine = engine(&['a', 'a', 'b', 'b']);

        // 1:10 elapsed; the seconds counter is back under 30.
        engine.advance_time(70_000);
        assert_eq!(engine.clock(), (1, 10));

        engine.flip(0).unwrap();
        engine.flip(1).unwrap();

        assert_eq!(engine.score(), 200);
    }

    #[test]
    fn winning_stops_the_clock_and_defers_the_summary() {
        let mut engine = engine(&['a', 'a']);
        engine.advance_time(3_000);

        engine.flip(0).unwrap();
        assert_eq!(engine.flip(1), Ok(FlipOutcome::Won));
        assert!(engine.phase().is_won());

        // No summary yet, and the clock no longer ticks.
        let before = events(&mut engine);
        assert!(
            !before
                .iter()
                .any(|event| matches!(event, GameEvent::GameEnded(_)))
        );
        engine.advance_time(FLIP_BACK_DELAY_MS);
        assert_eq!(engine.clock(), (0, 3));

        let after = events(&mut engine);
        assert_eq!(
            after,
            alloc::vec![GameEvent::GameEnded(GameSummary {
                minutes: 0,
                seconds: 3,
                moves: 1,
                score: 200,
            })]
        );
    }

    #[test]
    fn start_is_a_noop_once_running_or_won() {
        let mut engine = engine(&['a', 'a']);
        engine.start();
        assert!(events(&mut engine).is_empty());

        engine.flip(0).unwrap();
        engine.flip(1).unwrap();
        engine.start();
        assert!(engine.phase().is_won());
    }

    #[test]
    fn hint_reveals_a_real_pair_and_reverts_it() {
        let mut engine = engine(&['a', 'b', 'c', 'a', 'b', 'c']);

        assert_eq!(engine.hint(), HintOutcome::Revealed);

        let up: Vec<Position> = (0..6)
            .filter(|&p| engine.card_at(p).unwrap().state == CardState::Flipped)
            .collect();
        assert_eq!(up.len(), 2);
        assert_eq!(
            engine.card_at(up[0]).unwrap().symbol,
            engine.card_at(up[1]).unwrap().symbol
        );
        assert_eq!(engine.moves(), 0);
        assert_eq!(engine.matched_pairs(), 0);
        assert!(engine.is_accepting_input());

        engine.advance_time(FLIP_BACK_DELAY_MS);
        assert!(
            (0..6).all(|p| engine.card_at(p).unwrap().state == CardState::Hidden),
            "hinted cards must flip back down"
        );
    }

    #[test]
    fn hint_penalty_floors_at_zero() {
        let mut engine = engine(&['a', 'a', 'b', 'b']);

        engine.hint();
        assert_eq!(engine.score(), 0);

        engine.advance_time(FLIP_BACK_DELAY_MS);
        engine.flip(0).unwrap();
        engine.flip(1).unwrap();
        assert_eq!(engine.score(), 200);

        for _ in 0..5 {
            engine.hint();
            engine.advance_time(FLIP_BACK_DELAY_MS);
        }
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn hint_is_inert_while_a_selection_is_pending() {
        let mut engine = engine(&['a', 'a', 'b', 'b']);
        engine.flip(0).unwrap();

        assert_eq!(engine.hint(), HintOutcome::NoChange);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn hint_is_inert_on_a_degenerate_board() {
        let mut engine = engine(&['a', 'a', 'b', 'b']);
        engine.flip(0).unwrap();
        engine.flip(1).unwrap();
        engine.flip(2).unwrap();
        engine.flip(3).unwrap();
        assert!(engine.phase().is_won());

        assert_eq!(engine.hint(), HintOutcome::NoChange);
    }

    #[test]
    fn reset_restores_defaults_and_cancels_pending_reverts() {
        let mut engine = engine(&['a', 'b', 'a', 'b']);
        engine.advance_time(12_000);
        engine.flip(0).unwrap();
        engine.flip(1).unwrap();
        assert!(!engine.is_accepting_input());

        engine.reset();
        engine.drain_events().for_each(drop);

        assert!(engine.phase().is_ready());
        assert_eq!(engine.clock(), (0, 0));
        assert_eq!(engine.moves(), 0);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.matched_pairs(), 0);
        assert!(engine.is_accepting_input());
        assert_eq!(
            engine.deck().total_cards(),
            Difficulty::Easy.total_cards(),
            "reset deals a full deck for the difficulty"
        );
        assert!(
            engine
                .deck()
                .iter()
                .all(|card| card.state == CardState::Hidden)
        );

        // The cancelled revert must not touch the fresh deck.
        engine.advance_time(FLIP_BACK_DELAY_MS);
        assert!(events(&mut engine).is_empty());
    }

    #[test]
    fn set_difficulty_implies_a_reset_with_new_parameters() {
        let mut engine = GameEngine::new(Difficulty::Easy, 9);
        engine.start();
        engine.advance_time(2_000);

        engine.set_difficulty(Difficulty::Hard);

        assert!(engine.phase().is_ready());
        assert_eq!(engine.difficulty(), Difficulty::Hard);
        assert_eq!(engine.deck().total_cards(), Difficulty::Hard.total_cards());
        assert_eq!(engine.clock(), (0, 0));
    }

    #[test]
    fn timer_rolls_minutes_at_sixty_seconds() {
        let mut engine = engine(&['a', 'a']);

        engine.advance_time(59_000);
        assert_eq!(engine.clock(), (0, 59));

        engine.advance_time(1_000);
        assert_eq!(engine.clock(), (1, 0));

        let ticks: Vec<GameEvent> = events(&mut engine);
        assert_eq!(ticks.len(), 60);
        assert_eq!(
            ticks.last(),
            Some(&GameEvent::TimerTick {
                minutes: 1,
                seconds: 0
            })
        );
    }

    #[test]
    fn clock_only_runs_while_the_session_is_active() {
        let deck = Deck::from_symbols(['a', 'a']);
        let mut engine = GameEngine::with_deck(Difficulty::Easy, deck, 0);

        engine.advance_time(5_000);
        assert_eq!(engine.clock(), (0, 0));

        engine.start();
        engine.advance_time(2_500);
        assert_eq!(engine.clock(), (0, 2));
    }
}
