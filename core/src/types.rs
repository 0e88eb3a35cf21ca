/// Index of a card slot in the shuffled deck.
pub type Position = u16;

/// Count type used for pair counts and card counts.
pub type PairCount = u16;

/// Session score.
pub type Score = u32;

/// Virtual-clock milliseconds.
pub type Millis = u64;

/// Card face identity; two (or, on some difficulties, four) cards share one.
pub type Symbol = char;
