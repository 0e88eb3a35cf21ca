use super::*;

/// Generation strategy that duplicates the difficulty's pair symbols and
/// applies a uniform Fisher–Yates shuffle over the full card list.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShuffledDeckGenerator {
    seed: u64,
}

impl ShuffledDeckGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DeckGenerator for ShuffledDeckGenerator {
    fn generate(self, difficulty: Difficulty) -> Deck {
        use rand::prelude::*;

        let mut symbols = difficulty.pair_symbols();
        symbols.extend_from_within(..);

        let mut rng = SmallRng::seed_from_u64(self.seed);
        for i in (1..symbols.len()).rev() {
            let j = rng.random_range(0..=i);
            symbols.swap(i, j);
        }

        // double check card count
        if symbols.len() != difficulty.total_cards() {
            log::warn!(
                "generated deck size mismatch, actual: {}, expected: {}",
                symbols.len(),
                difficulty.total_cards()
            );
        }
        Deck::from_symbols(symbols)
    }
}
