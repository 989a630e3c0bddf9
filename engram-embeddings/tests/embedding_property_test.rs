//! Vectorizer properties over arbitrary input.

use engram_core::constants::EMBEDDING_DIM;
use engram_core::traits::IEmbeddingProvider;
use engram_embeddings::{cosine_similarity, top_k, EmbeddingGenerator};

use proptest::prelude::*;

proptest! {
    #[test]
    fn every_vector_has_the_contract_dimension(text in ".{0,200}") {
        let generator = EmbeddingGenerator::new();
        let v = generator.embed(&text).unwrap();
        prop_assert_eq!(v.len(), EMBEDDING_DIM);
    }

    #[test]
    fn vectors_are_unit_norm_or_zero(text in ".{0,200}") {
        let generator = EmbeddingGenerator::new();
        let v = generator.embed(&text).unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        prop_assert!(norm < 1e-6 || (norm - 1.0).abs() < 1e-4, "norm = {norm}");
    }

    #[test]
    fn embedding_is_deterministic(text in "[a-zA-Z0-9 _.,-]{0,120}") {
        let generator = EmbeddingGenerator::new();
        prop_assert_eq!(generator.embed(&text).unwrap(), generator.embed(&text).unwrap());
    }

    #[test]
    fn self_similarity_is_one_for_nonempty_token_input(word in "[a-z]{2,12}") {
        let generator = EmbeddingGenerator::new();
        let v = generator.embed(&word).unwrap();
        let sim = cosine_similarity(&v, &v);
        prop_assert!((sim - 1.0).abs() < 1e-6, "sim = {sim}");
    }

    #[test]
    fn top_k_is_sorted_and_bounded(
        words in proptest::collection::vec("[a-z]{2,10}", 1..12),
        k in 0usize..8,
    ) {
        let generator = EmbeddingGenerator::new();
        let query = generator.embed("rust database migration").unwrap();
        let candidates: Vec<(usize, Vec<f32>)> = words
            .iter()
            .enumerate()
            .map(|(i, w)| (i, generator.embed(w).unwrap()))
            .collect();

        let ranked = top_k(&query, candidates, k);
        prop_assert!(ranked.len() <= k);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].1 >= pair[1].1);
        }
    }
}
