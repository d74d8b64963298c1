use crate::error::{RecError, Result};
use crate::utils::l2_norm;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Analyzer {
    /// Lowercased alphanumeric tokens of two or more characters,
    /// combined into n-grams joined by single spaces.
    Word,
    /// Lowercased character n-grams over the whole string, spaces
    /// included.
    Char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramRange {
    pub min: usize,
    pub max: usize,
}

impl NgramRange {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

/// A raw index result; `index` points back into the fitted corpus so
/// callers can join to their own records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub index: usize,
    pub text: String,
    pub score: f32,
}

/// TF-IDF fuzzy index over a corpus of short strings.
///
/// Vocabulary terms whose document frequency exceeds `max_df` (as a
/// fraction of the corpus) are pruned; that is what keeps "the" out of
/// movie-title matching. Document vectors use smoothed idf
/// `ln((1 + n) / (1 + df)) + 1` and are L2-normalized, so a query dot
/// product is a cosine similarity.
#[derive(Debug)]
pub struct TextIndex {
    analyzer: Analyzer,
    ngram_range: NgramRange,
    docs: Vec<String>,
    terms: Vec<String>,
    term_index: HashMap<String, usize>,
    idf: Vec<f32>,
    postings: Vec<Vec<(usize, f32)>>,
}

impl TextIndex {
    pub fn fit(
        corpus: &[String],
        analyzer: Analyzer,
        ngram_range: NgramRange,
        max_df: f32,
    ) -> Result<Self> {
        if ngram_range.min == 0 || ngram_range.min > ngram_range.max {
            return Err(RecError::InvalidNgramRange {
                min: ngram_range.min,
                max: ngram_range.max,
            });
        }
        if !(max_df > 0.0 && max_df <= 1.0) {
            return Err(RecError::InvalidMaxDocFrequency(max_df));
        }

        let doc_tokens: Vec<HashMap<String, usize>> = corpus
            .iter()
            .map(|doc| term_counts(doc, analyzer, ngram_range))
            .collect();

        let mut doc_frequency: HashMap<&str, usize> = HashMap::new();
        for counts in &doc_tokens {
            for term in counts.keys() {
                *doc_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        // Strictly-greater comparison, so max_df = 1.0 prunes nothing.
        let threshold = max_df * corpus.len() as f32;
        let mut terms: Vec<String> = doc_frequency
            .iter()
            .filter(|&(_, &df)| df as f32 <= threshold)
            .map(|(&term, _)| term.to_string())
            .collect();
        terms.sort();
        if terms.is_empty() {
            return Err(RecError::EmptyVocabulary);
        }

        let term_index: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();

        let n = corpus.len() as f32;
        let idf: Vec<f32> = terms
            .iter()
            .map(|term| ((1.0 + n) / (1.0 + doc_frequency[term.as_str()] as f32)).ln() + 1.0)
            .collect();

        let mut postings: Vec<Vec<(usize, f32)>> = vec![Vec::new(); terms.len()];
        for (doc, counts) in doc_tokens.iter().enumerate() {
            let mut weights: Vec<(usize, f32)> = counts
                .iter()
                .filter_map(|(term, &tf)| {
                    term_index
                        .get(term.as_str())
                        .map(|&t| (t, tf as f32 * idf[t]))
                })
                .collect();
            let norm = l2_norm(weights.iter().map(|&(_, w)| w));
            if norm > 0.0 {
                for entry in weights.iter_mut() {
                    entry.1 /= norm;
                }
            }
            weights.sort_by_key(|&(t, _)| t);
            for (t, w) in weights {
                postings[t].push((doc, w));
            }
        }

        info!(
            documents = corpus.len(),
            terms = terms.len(),
            ?analyzer,
            "text index fitted"
        );

        Ok(Self {
            analyzer,
            ngram_range,
            docs: corpus.to_vec(),
            terms,
            term_index,
            idf,
            postings,
        })
    }

    /// The fitted vocabulary, sorted. Doubles as the corpus for the
    /// character-n-gram fallback index.
    pub fn features(&self) -> &[String] {
        &self.terms
    }

    pub fn contains(&self, term: &str) -> bool {
        self.term_index.contains_key(term)
    }

    pub fn documents(&self) -> &[String] {
        &self.docs
    }

    /// Ranked fuzzy match of `query` against the corpus. Unknown terms
    /// contribute nothing; a query with no known terms matches nothing.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let counts = term_counts(query, self.analyzer, self.ngram_range);
        let mut weights: Vec<(usize, f32)> = counts
            .iter()
            .filter_map(|(term, &tf)| {
                self.term_index
                    .get(term.as_str())
                    .map(|&t| (t, tf as f32 * self.idf[t]))
            })
            .collect();
        let norm = l2_norm(weights.iter().map(|&(_, w)| w));
        if norm == 0.0 {
            return Vec::new();
        }
        for entry in weights.iter_mut() {
            entry.1 /= norm;
        }
        weights.sort_by_key(|&(t, _)| t);

        // Only the query's nonzero terms can move a score; everything
        // else in the vocabulary would dot to zero anyway.
        let mut scores: HashMap<usize, f32> = HashMap::new();
        for &(t, weight) in &weights {
            for &(doc, doc_weight) in &self.postings[t] {
                *scores.entry(doc).or_insert(0.0) += weight * doc_weight;
            }
        }

        let mut hits: Vec<SearchHit> = scores
            .into_iter()
            .filter(|&(_, score)| score > 0.0)
            .map(|(doc, score)| SearchHit {
                index: doc,
                text: self.docs[doc].clone(),
                score,
            })
            .collect();
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.index.cmp(&b.index))
        });
        hits
    }
}

fn term_counts(text: &str, analyzer: Analyzer, range: NgramRange) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    match analyzer {
        Analyzer::Word => {
            let words: Vec<String> = text
                .to_lowercase()
                .split(|c: char| !c.is_alphanumeric())
                .filter(|w| w.chars().count() >= 2)
                .map(str::to_string)
                .collect();
            for n in range.min..=range.max {
                if n > words.len() {
                    break;
                }
                for gram in words.windows(n) {
                    *counts.entry(gram.join(" ")).or_insert(0) += 1;
                }
            }
        }
        Analyzer::Char => {
            let chars: Vec<char> = text.to_lowercase().chars().collect();
            for n in range.min..=range.max {
                if n > chars.len() {
                    break;
                }
                for gram in chars.windows(n) {
                    *counts.entry(gram.iter().collect::<String>()).or_insert(0) += 1;
                }
            }
        }
    }
    counts
}
