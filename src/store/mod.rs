use crate::error::{RecError, Result};
use crate::models::{ItemId, Rating, UserId};
use crate::utils::validation::validate_rating;
use std::collections::{HashMap, HashSet};

/// In-memory rating collection, indexed by user and by item.
///
/// Built once at load time and read-only afterward. Users and items are
/// kept in first-encounter order so that repeated builds over the same
/// input produce bit-identical engines downstream.
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    ratings: Vec<Rating>,
    user_order: Vec<UserId>,
    item_order: Vec<ItemId>,
    by_user: HashMap<UserId, Vec<usize>>,
    by_item: HashMap<ItemId, Vec<usize>>,
}

impl RatingStore {
    /// Validates and indexes a batch of ratings.
    ///
    /// Duplicate (user, item) pairs are rejected rather than merged:
    /// a silent last-wins policy would corrupt both engines' aggregates.
    pub fn from_ratings(ratings: Vec<Rating>) -> Result<Self> {
        let mut seen: HashSet<(UserId, ItemId)> = HashSet::with_capacity(ratings.len());
        let mut user_order = Vec::new();
        let mut item_order = Vec::new();
        let mut by_user: HashMap<UserId, Vec<usize>> = HashMap::new();
        let mut by_item: HashMap<ItemId, Vec<usize>> = HashMap::new();

        for (i, rating) in ratings.iter().enumerate() {
            validate_rating(rating)?;
            if !seen.insert((rating.user_id, rating.item_id)) {
                return Err(RecError::DuplicateRating {
                    user_id: rating.user_id,
                    item_id: rating.item_id,
                });
            }

            by_user
                .entry(rating.user_id)
                .or_insert_with(|| {
                    user_order.push(rating.user_id);
                    Vec::new()
                })
                .push(i);
            by_item
                .entry(rating.item_id)
                .or_insert_with(|| {
                    item_order.push(rating.item_id);
                    Vec::new()
                })
                .push(i);
        }

        // Chronological order within a user is load-bearing for the
        // path engine; stable sort keeps input order on timestamp ties.
        for indexes in by_user.values_mut() {
            indexes.sort_by_key(|&i| ratings[i].timestamp);
        }

        Ok(Self {
            ratings,
            user_order,
            item_order,
            by_user,
            by_item,
        })
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// User ids in first-encounter order.
    pub fn user_ids(&self) -> &[UserId] {
        &self.user_order
    }

    /// Item ids in first-encounter order.
    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_order
    }

    /// A user's ratings, sorted by timestamp ascending.
    pub fn user_ratings(&self, user_id: UserId) -> impl Iterator<Item = &Rating> {
        self.by_user
            .get(&user_id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.ratings[i])
    }

    /// All ratings of an item, in input order.
    pub fn item_ratings(&self, item_id: ItemId) -> impl Iterator<Item = &Rating> {
        self.by_item
            .get(&item_id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.ratings[i])
    }
}
