use reelrec::*;

fn movies() -> Vec<Movie> {
    vec![
        Movie::new(1, "Toy Story"),
        Movie::new(2, "Toy Story 2"),
        Movie::new(3, "Finding Nemo"),
        Movie::new(4, "The Lion King"),
        Movie::new(5, "Jumanji"),
    ]
}

fn ratings() -> Vec<Rating> {
    vec![
        Rating::new(1, 1, 5.0, 100),
        Rating::new(1, 2, 5.0, 200),
        Rating::new(1, 3, 3.0, 300),
        Rating::new(2, 1, 4.0, 100),
        Rating::new(2, 2, 4.5, 200),
        Rating::new(2, 5, 2.0, 300),
        Rating::new(3, 2, 3.0, 100),
        Rating::new(3, 3, 4.0, 200),
        Rating::new(3, 4, 5.0, 300),
        Rating::new(4, 1, 2.0, 100),
        Rating::new(4, 4, 3.5, 200),
    ]
}

fn test_config() -> Config {
    let mut config = Config::default();
    // The production 0.28 ceiling would prune every term out of a
    // five-title corpus.
    config.search.max_doc_frequency = 1.0;
    config
}

#[test]
fn end_to_end_search_and_recommend() {
    let rec = Recommender::new(movies(), ratings(), test_config()).unwrap();

    let hits = rec.search("Toy Story");
    assert!(!hits.is_empty());
    // Both known words match directly; the exact title wins the tie.
    assert_eq!(hits[0].title, "Toy Story");
    assert_eq!(hits[0].item_id, 1);

    let cosine = rec.recommend_cosine(hits[0].item_id);
    assert!(!cosine.is_empty());
    assert!(cosine.iter().all(|r| r.item_id != 1));

    // User 1 and user 2 both rated item 1 right before item 2.
    let paths = rec.recommend_path(1);
    assert!(paths.iter().any(|r| r.item_id == 2));
}

#[test]
fn search_falls_back_to_ngram_expansion() {
    let rec = Recommender::new(movies(), ratings(), test_config()).unwrap();

    // No whole word matches the vocabulary, but the trigrams of
    // "stor nem" recover "story" and "nemo".
    let suggestion = rec.suggest("stor nem").unwrap();
    assert!(suggestion.contains("story"));
    assert!(suggestion.contains("nemo"));

    let hits = rec.search("stor nem");
    assert!(!hits.is_empty());
    assert_eq!(hits[0].title, "Finding Nemo");
}

#[test]
fn empty_query_yields_empty_result() {
    let rec = Recommender::new(movies(), ratings(), test_config()).unwrap();
    assert!(rec.search("").is_empty());
    assert!(rec.search("zzzzqqq").is_empty());
    assert!(rec.suggest("").is_none());
}

#[test]
fn unknown_item_yields_empty_recommendations() {
    let rec = Recommender::new(movies(), ratings(), test_config()).unwrap();
    assert!(rec.recommend_cosine(999).is_empty());
    assert!(rec.recommend_path(999).is_empty());
}

#[test]
fn search_respects_limit() {
    let mut config = test_config();
    config.recommendation.limit = 1;
    let rec = Recommender::new(movies(), ratings(), config).unwrap();
    assert!(rec.search("Toy Story").len() <= 1);
}

#[test]
fn duplicate_rating_is_rejected() {
    let mut rows = ratings();
    rows.push(Rating::new(1, 1, 3.0, 400));
    let err = RatingStore::from_ratings(rows).unwrap_err();
    assert_eq!(
        err,
        RecError::DuplicateRating {
            user_id: 1,
            item_id: 1
        }
    );
}

#[test]
fn non_finite_rating_is_rejected() {
    let rows = vec![Rating::new(1, 1, f32::NAN, 100)];
    let err = RatingStore::from_ratings(rows).unwrap_err();
    assert!(matches!(err, RecError::InvalidRating { user_id: 1, .. }));
}

#[test]
fn store_orders_user_ratings_chronologically() {
    let rows = vec![
        Rating::new(1, 30, 2.0, 300),
        Rating::new(1, 10, 4.0, 100),
        Rating::new(1, 20, 3.0, 200),
    ];
    let store = RatingStore::from_ratings(rows).unwrap();
    let sequence: Vec<ItemId> = store.user_ratings(1).map(|r| r.item_id).collect();
    assert_eq!(sequence, vec![10, 20, 30]);
}

#[test]
fn tfidf_scenario_ranks_matching_titles() {
    let corpus = vec![
        "Toy Story".to_string(),
        "Toy Story 2".to_string(),
        "Finding Nemo".to_string(),
    ];
    let index = TextIndex::fit(&corpus, Analyzer::Word, NgramRange::new(1, 1), 1.0).unwrap();

    let hits = index.search("toy");
    assert_eq!(hits.len(), 2);
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(hits.iter().all(|h| h.text.starts_with("Toy Story")));
}

#[test]
fn max_doc_frequency_prunes_common_terms() {
    let corpus = vec![
        "The Terminator".to_string(),
        "The Matrix".to_string(),
        "The Godfather".to_string(),
        "Alien".to_string(),
    ];
    // "the" appears in 3 of 4 documents and crosses the 0.5 ceiling.
    let index = TextIndex::fit(&corpus, Analyzer::Word, NgramRange::new(1, 1), 0.5).unwrap();
    assert!(!index.contains("the"));
    assert!(index.contains("matrix"));
    assert!(index.search("the").is_empty());
}

#[test]
fn invalid_index_parameters_fail_fast() {
    let corpus = vec!["Heat".to_string()];
    assert_eq!(
        TextIndex::fit(&corpus, Analyzer::Word, NgramRange::new(0, 1), 1.0).unwrap_err(),
        RecError::InvalidNgramRange { min: 0, max: 1 }
    );
    assert_eq!(
        TextIndex::fit(&corpus, Analyzer::Word, NgramRange::new(2, 1), 1.0).unwrap_err(),
        RecError::InvalidNgramRange { min: 2, max: 1 }
    );
    assert_eq!(
        TextIndex::fit(&corpus, Analyzer::Word, NgramRange::new(1, 1), 0.0).unwrap_err(),
        RecError::InvalidMaxDocFrequency(0.0)
    );
    // Single-character tokens never enter the vocabulary.
    assert_eq!(
        TextIndex::fit(&["a".to_string()], Analyzer::Word, NgramRange::new(1, 1), 1.0)
            .unwrap_err(),
        RecError::EmptyVocabulary
    );
}

#[test]
fn char_ngrams_match_partial_words() {
    let corpus = vec!["story".to_string(), "finding".to_string()];
    let index = TextIndex::fit(&corpus, Analyzer::Char, NgramRange::new(3, 3), 1.0).unwrap();
    let hits = index.search("stori");
    assert_eq!(hits[0].text, "story");
}
