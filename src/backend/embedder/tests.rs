use super::*;

fn stub_embedder() -> DeckEmbedder {
    DeckEmbedder::load(EmbedderConfig::stub()).expect("stub embedder loads without model files")
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[test]
fn test_stub_mode_reports_itself() {
    let embedder = stub_embedder();
    assert!(embedder.is_stub());
    assert_eq!(embedder.embedding_dim(), config::DEFAULT_EMBEDDING_DIM);
}

#[test]
fn test_stub_embeddings_are_deterministic() {
    let embedder = stub_embedder();
    let a = embedder.embed_text("web scraper for e-commerce sites").unwrap();
    let b = embedder.embed_text("web scraper for e-commerce sites").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_stub_embeddings_are_normalized() {
    let embedder = stub_embedder();
    let v = embedder.embed_text("machine learning pipeline").unwrap();
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
}

#[test]
fn test_stub_embedding_of_empty_text_is_zero_vector() {
    let embedder = stub_embedder();
    let v = embedder.embed_text("").unwrap();
    assert!(v.iter().all(|x| *x == 0.0));
}

#[test]
fn test_stub_similarity_tracks_vocabulary_overlap() {
    let embedder = stub_embedder();
    let query = embedder.embed_text("build a web scraper for shops").unwrap();
    let related = embedder
        .embed_text("our web scraper crawls online shops")
        .unwrap();
    let unrelated = embedder
        .embed_text("gardening tips for growing tomatoes")
        .unwrap();

    assert!(cosine(&query, &related) > cosine(&query, &unrelated));
}

#[test]
fn test_stub_ignores_punctuation_and_case() {
    let embedder = stub_embedder();
    let a = embedder.embed_text("Scraper, API!").unwrap();
    let b = embedder.embed_text("scraper api").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_missing_model_dir_is_rejected() {
    let config = EmbedderConfig::new("/nonexistent/model/dir");
    let err = DeckEmbedder::load(config).unwrap_err();
    assert!(matches!(err, EmbeddingError::ModelNotFound { .. }));
}

#[test]
fn test_empty_model_dir_is_invalid_config() {
    let config = EmbedderConfig::default();
    let err = DeckEmbedder::load(config).unwrap_err();
    assert!(matches!(err, EmbeddingError::InvalidConfig { .. }));
}
