use crate::algorithms::ItemRecommender;
use crate::models::{ItemId, Recommendation, UserId};
use crate::store::RatingStore;
use crate::utils::{l2_norm, rank_descending};
use nalgebra::DVector;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::info;

/// Conventional item-to-item engine: cosine similarity over
/// mean-centered, column-normalized rating vectors.
///
/// The full pairwise matrix is computed at build time and held sparsely
/// (one row of nonzero pairs per kept item); `recommend` ranks a row on
/// demand. Items whose ratings are all equal carry no signal after
/// centering and are excluded from the matrix entirely.
pub struct CosineEngine {
    limit: usize,
    items: Vec<ItemId>,
    index_of: HashMap<ItemId, usize>,
    rows: Vec<Vec<(usize, f32)>>,
}

impl CosineEngine {
    pub fn build(store: &RatingStore, limit: usize) -> Self {
        let mut items = Vec::new();
        let mut index_of = HashMap::new();
        for &item_id in store.item_ids() {
            let mut min = f32::INFINITY;
            let mut max = f32::NEG_INFINITY;
            for rating in store.item_ratings(item_id) {
                min = min.min(rating.value);
                max = max.max(rating.value);
            }
            // min == max means zero variance; comparing raw values avoids
            // trusting centered f32 results to be exactly zero.
            if min < max {
                index_of.insert(item_id, items.len());
                items.push(item_id);
            }
        }

        let user_index: HashMap<UserId, usize> = store
            .user_ids()
            .iter()
            .enumerate()
            .map(|(i, &user_id)| (user_id, i))
            .collect();

        // Centered, L2-normalized sparse columns: item -> [(user, value)].
        let mut columns: Vec<Vec<(usize, f32)>> = Vec::with_capacity(items.len());
        for &item_id in &items {
            let mut sum = 0.0f32;
            let mut count = 0usize;
            for rating in store.item_ratings(item_id) {
                sum += rating.value;
                count += 1;
            }
            let mean = sum / count as f32;
            let mut column: Vec<(usize, f32)> = store
                .item_ratings(item_id)
                .map(|rating| (user_index[&rating.user_id], rating.value - mean))
                .collect();
            let norm = l2_norm(column.iter().map(|&(_, value)| value));
            if norm > 0.0 {
                for entry in column.iter_mut() {
                    entry.1 /= norm;
                }
            }
            columns.push(column);
        }

        // Per-user postings lists drive the sparse pairwise product: a
        // pair of items can only dot to nonzero through shared raters.
        let mut user_postings: Vec<Vec<(usize, f32)>> = vec![Vec::new(); store.user_ids().len()];
        for (i, column) in columns.iter().enumerate() {
            for &(user, value) in column {
                user_postings[user].push((i, value));
            }
        }

        let n_items = items.len();
        let rows: Vec<Vec<(usize, f32)>> = columns
            .par_iter()
            .map(|column| {
                let mut buf = DVector::<f32>::zeros(n_items);
                for &(user, value) in column {
                    for &(j, other) in &user_postings[user] {
                        buf[j] += value * other;
                    }
                }
                (0..n_items)
                    .filter(|&j| buf[j] != 0.0)
                    .map(|j| (j, buf[j]))
                    .collect()
            })
            .collect();

        info!(items = n_items, "cosine similarity matrix built");

        Self {
            limit,
            items,
            index_of,
            rows,
        }
    }

    /// Item ids present in the matrix (zero-variance items excluded).
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.index_of.contains_key(&item_id)
    }

    /// Raw matrix entry, if both items survived the build.
    pub fn similarity(&self, a: ItemId, b: ItemId) -> Option<f32> {
        let &i = self.index_of.get(&a)?;
        let &j = self.index_of.get(&b)?;
        match self.rows[i].binary_search_by_key(&j, |&(col, _)| col) {
            Ok(pos) => Some(self.rows[i][pos].1),
            Err(_) => Some(0.0),
        }
    }
}

impl ItemRecommender for CosineEngine {
    fn recommend(&self, item_id: ItemId) -> Vec<Recommendation> {
        let Some(&i) = self.index_of.get(&item_id) else {
            return Vec::new();
        };
        let recs = self.rows[i]
            .iter()
            .filter(|&&(j, _)| j != i)
            .map(|&(j, score)| Recommendation::new(self.items[j], score))
            .collect();
        rank_descending(recs, self.limit)
    }

    fn limit(&self) -> usize {
        self.limit
    }
}
