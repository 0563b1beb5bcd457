//! Bracket errors

use crate::utils::match_id::MatchIdError;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BracketError {
    #[error("bracket requires at least two fighters, got {0}")]
    InsufficientRoster(usize),

    #[error(transparent)]
    MatchId(#[from] MatchIdError),
}
