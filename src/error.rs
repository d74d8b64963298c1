use crate::models::{ItemId, UserId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecError>;

/// Build-time failures. Query-time "not found" conditions are never
/// errors; every query returns an empty result for unknown identifiers.
#[derive(Debug, Error, PartialEq)]
pub enum RecError {
    #[error("duplicate rating for user {user_id}, item {item_id}")]
    DuplicateRating { user_id: UserId, item_id: ItemId },

    #[error("non-finite rating value {value} for user {user_id}, item {item_id}")]
    InvalidRating {
        user_id: UserId,
        item_id: ItemId,
        value: f32,
    },

    #[error("invalid ngram range {min}..={max}")]
    InvalidNgramRange { min: usize, max: usize },

    #[error("max document frequency must be in (0, 1], got {0}")]
    InvalidMaxDocFrequency(f32),

    #[error("vocabulary is empty after pruning")]
    EmptyVocabulary,

    #[error("configuration error: {0}")]
    Config(String),
}
