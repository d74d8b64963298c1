pub mod cosine;
pub mod graph;

pub use cosine::CosineEngine;
pub use graph::PathEngine;

use crate::models::{ItemId, Recommendation};

/// Common seam over both item-to-item engines.
///
/// `recommend` is total: unknown or degenerate items yield an empty
/// list, never an error. Results are at most `limit` entries, sorted
/// descending by score with item id ascending on ties.
pub trait ItemRecommender {
    fn recommend(&self, item_id: ItemId) -> Vec<Recommendation>;
    fn limit(&self) -> usize;
}
