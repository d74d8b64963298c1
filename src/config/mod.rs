use crate::error::{RecError, Result};
use crate::search::NgramRange;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub recommendation: RecommendationConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Result cap shared by both engines. The path engine's build cost
    /// grows linearly with it.
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Terms in more than this fraction of titles are pruned; 0.28 is
    /// just enough to keep articles like "the" out of the vocabulary.
    pub max_doc_frequency: f32,
    pub word_ngrams: NgramRange,
    pub char_ngrams: NgramRange,
    /// Queries with fewer known words than this go through the
    /// character-n-gram fallback first.
    pub min_known_words: usize,
    /// How many fallback vocabulary terms a query expands into.
    pub suggestion_terms: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recommendation: RecommendationConfig { limit: 20 },
            search: SearchConfig {
                max_doc_frequency: 0.28,
                word_ngrams: NgramRange::new(1, 1),
                char_ngrams: NgramRange::new(3, 3),
                min_known_words: 2,
                suggestion_terms: 4,
            },
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("REELREC"))
            .build()
            .map_err(|e| RecError::Config(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| RecError::Config(e.to_string()))
    }
}
