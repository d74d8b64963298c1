pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod store;
pub mod utils;

pub use algorithms::{CosineEngine, ItemRecommender, PathEngine};
pub use config::Config;
pub use error::{RecError, Result};
pub use models::*;
pub use search::{Analyzer, NgramRange, SearchHit, TextIndex};
pub use store::RatingStore;

use std::collections::HashMap;
use std::time::Instant;
use tracing::info;

/// Owns the rating store, both recommendation engines and the title
/// indexes, with explicit construction order. Build-to-completion: a
/// failed build leaves nothing queryable. All queries are pure reads,
/// safe to issue concurrently once construction returns.
pub struct Recommender {
    config: Config,
    store: RatingStore,
    cosine: CosineEngine,
    paths: PathEngine,
    titles: TextIndex,
    fallback: TextIndex,
    movies: HashMap<ItemId, Movie>,
    // Corpus row -> item id, for joining search hits back to movies.
    corpus_items: Vec<ItemId>,
}

impl Recommender {
    pub fn new(movies: Vec<Movie>, ratings: Vec<Rating>, config: Config) -> Result<Self> {
        let store = RatingStore::from_ratings(ratings)?;
        let limit = config.recommendation.limit;

        let start = Instant::now();
        let cosine = CosineEngine::build(&store, limit);
        info!(elapsed = ?start.elapsed(), "cosine engine ready");

        let start = Instant::now();
        let paths = PathEngine::build(&store, limit);
        info!(elapsed = ?start.elapsed(), "path engine ready");

        let corpus: Vec<String> = movies.iter().map(|m| m.title.clone()).collect();
        let corpus_items: Vec<ItemId> = movies.iter().map(|m| m.item_id).collect();
        let titles = TextIndex::fit(
            &corpus,
            Analyzer::Word,
            config.search.word_ngrams,
            config.search.max_doc_frequency,
        )?;
        // A second index over the first one's vocabulary resolves
        // queries whose words match no title directly.
        let fallback = TextIndex::fit(
            titles.features(),
            Analyzer::Char,
            config.search.char_ngrams,
            config.search.max_doc_frequency,
        )?;

        let movies = movies.into_iter().map(|m| (m.item_id, m)).collect();

        Ok(Self {
            config,
            store,
            cosine,
            paths,
            titles,
            fallback,
            movies,
            corpus_items,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    pub fn cosine(&self) -> &CosineEngine {
        &self.cosine
    }

    pub fn paths(&self) -> &PathEngine {
        &self.paths
    }

    pub fn movie(&self, item_id: ItemId) -> Option<&Movie> {
        self.movies.get(&item_id)
    }

    /// Expands a query through the character-n-gram index when its own
    /// words miss the title vocabulary. Returns `None` when nothing in
    /// the vocabulary comes close.
    pub fn suggest(&self, query: &str) -> Option<String> {
        let hits = self.fallback.search(query);
        if hits.is_empty() {
            return None;
        }
        let expanded = hits
            .iter()
            .take(self.config.search.suggestion_terms)
            .map(|hit| hit.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Some(expanded)
    }

    /// Resolves free text to ranked movie candidates, at most `limit`.
    pub fn search(&self, query: &str) -> Vec<TitleMatch> {
        let known = query
            .split_whitespace()
            .filter(|word| self.titles.contains(&word.to_lowercase()))
            .count();

        let resolved;
        let query = if known < self.config.search.min_known_words {
            match self.suggest(query) {
                Some(expanded) => {
                    resolved = expanded;
                    resolved.as_str()
                }
                None => return Vec::new(),
            }
        } else {
            query
        };

        self.titles
            .search(query)
            .into_iter()
            .take(self.config.recommendation.limit)
            .map(|hit| TitleMatch {
                item_id: self.corpus_items[hit.index],
                title: hit.text,
                score: hit.score,
            })
            .collect()
    }

    pub fn recommend_cosine(&self, item_id: ItemId) -> Vec<Recommendation> {
        self.cosine.recommend(item_id)
    }

    pub fn recommend_path(&self, item_id: ItemId) -> Vec<Recommendation> {
        self.paths.recommend(item_id)
    }
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
