use crate::models::Recommendation;
use std::cmp::Ordering;

pub mod validation;

pub fn l2_norm(values: impl Iterator<Item = f32>) -> f32 {
    values.map(|x| x * x).sum::<f32>().sqrt()
}

pub fn normalize(values: &mut [f32]) {
    let norm = l2_norm(values.iter().copied());
    if norm > 0.0 {
        for x in values.iter_mut() {
            *x /= norm;
        }
    }
}

/// Sorts descending by score with item id ascending on ties, then caps
/// the list. Shared by both engines so ranking is deterministic.
pub fn rank_descending(mut recs: Vec<Recommendation>, limit: usize) -> Vec<Recommendation> {
    recs.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.item_id.cmp(&b.item_id))
    });
    recs.truncate(limit);
    recs
}
