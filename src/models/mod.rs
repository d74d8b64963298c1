use serde::{Deserialize, Serialize};

pub type UserId = u32;
pub type ItemId = u32;

/// A single user rating of an item, immutable once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub value: f32,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub item_id: ItemId,
    pub title: String,
}

/// One ranked neighbor produced by either recommendation engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_id: ItemId,
    pub score: f32,
}

/// A fuzzy-search result joined back to its movie record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleMatch {
    pub item_id: ItemId,
    pub title: String,
    pub score: f32,
}

impl Rating {
    pub fn new(user_id: UserId, item_id: ItemId, value: f32, timestamp: i64) -> Self {
        Self {
            user_id,
            item_id,
            value,
            timestamp,
        }
    }
}

impl Movie {
    pub fn new(item_id: ItemId, title: impl Into<String>) -> Self {
        Self {
            item_id,
            title: title.into(),
        }
    }
}

impl Recommendation {
    pub fn new(item_id: ItemId, score: f32) -> Self {
        Self { item_id, score }
    }
}
