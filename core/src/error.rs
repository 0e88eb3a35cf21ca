use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Position is outside the deck")]
    InvalidPosition,
}

pub type Result<T> = core::result::Result<T, GameError>;
