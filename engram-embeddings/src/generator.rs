//! The deterministic sparse vectorizer.
//!
//! Layout: the first `VOCABULARY.len()` dimensions hold tf-idf weights for
//! curated terms by fixed index; the remainder holds positional FNV-1a hash
//! features. The whole vector is L2-normalized.

use std::collections::HashMap;

use engram_core::constants::EMBEDDING_DIM;
use engram_core::errors::EngramResult;
use engram_core::traits::IEmbeddingProvider;

use crate::vocabulary::{COMMON_WORDS, VOCABULARY};

/// Version of the vectorizer itself, decoupled from the store schema
/// version. Bump on any change to the vocabulary, hash function, or
/// dimension, and regenerate stored vectors.
pub const EMBEDDING_SCHEMA_VERSION: u32 = 1;

/// IDF weight for curated vocabulary terms.
const IDF_VOCABULARY: f32 = 2.0;
/// IDF weight for conversational filler.
const IDF_COMMON: f32 = 0.5;
/// IDF weight for everything else.
const IDF_DEFAULT: f32 = 1.0;

/// Deterministic embedding generator.
pub struct EmbeddingGenerator {
    vocab_index: HashMap<&'static str, usize>,
    common: std::collections::HashSet<&'static str>,
}

impl EmbeddingGenerator {
    pub fn new() -> Self {
        Self {
            vocab_index: VOCABULARY
                .iter()
                .enumerate()
                .map(|(i, term)| (*term, i))
                .collect(),
            common: COMMON_WORDS.iter().copied().collect(),
        }
    }

    /// Maximal alphanumeric runs of the lowercased input.
    fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn idf(&self, term: &str) -> f32 {
        if self.common.contains(term) {
            IDF_COMMON
        } else if self.vocab_index.contains_key(term) {
            IDF_VOCABULARY
        } else {
            IDF_DEFAULT
        }
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; EMBEDDING_DIM];
        }

        // Term frequencies, normalized by the max frequency.
        let mut tf: HashMap<&str, f32> = HashMap::new();
        for token in &tokens {
            *tf.entry(token.as_str()).or_default() += 1.0;
        }
        let max_tf = tf.values().cloned().fold(1.0f32, f32::max);

        // Vocabulary section: tf-idf weights at fixed indices.
        let vocab_len = VOCABULARY.len();
        let mut vector = vec![0.0f32; EMBEDDING_DIM];
        for (term, count) in &tf {
            if let Some(&idx) = self.vocab_index.get(term) {
                vector[idx] = (count / max_tf) * self.idf(term);
            }
        }

        // Hash section: positional unigram and bigram features.
        let hash_dim = EMBEDDING_DIM - vocab_len;
        let mut hashed = vec![0.0f32; hash_dim];
        for (i, token) in tokens.iter().enumerate() {
            let bucket = fnv1a(&format!("{token}_{}", i % 10)) as usize % hash_dim;
            hashed[bucket] += 1.0;
        }
        for pair in tokens.windows(2) {
            let bucket = fnv1a(&format!("{} {}", pair[0], pair[1])) as usize % hash_dim;
            hashed[bucket] += 0.5;
        }
        let max_hashed = hashed.iter().cloned().fold(0.0f32, f32::max);
        if max_hashed > 0.0 {
            for (slot, value) in vector[vocab_len..].iter_mut().zip(&hashed) {
                *slot = value / max_hashed;
            }
        }

        // L2 normalize.
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Default for EmbeddingGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IEmbeddingProvider for EmbeddingGenerator {
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>> {
        Ok(self.vector(text))
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIM
    }

    fn name(&self) -> &str {
        "sparse-tfidf-positional"
    }
}

/// FNV-1a. The hash function is part of the embedding contract.
fn fnv1a(s: &str) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for b in s.as_bytes() {
        h ^= *b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}
