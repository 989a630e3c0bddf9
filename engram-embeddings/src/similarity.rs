//! Cosine similarity and top-k ranking over unit-norm vectors.

/// Cosine similarity. Both inputs are unit-norm (or zero), so this is the
/// dot product, clamped to [0, 1].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot.clamp(0.0, 1.0)
}

/// Rank `candidates` by descending similarity to `query` and keep the first
/// `k`. Each candidate carries an arbitrary payload.
pub fn top_k<T>(query: &[f32], candidates: Vec<(T, Vec<f32>)>, k: usize) -> Vec<(T, f32)> {
    let mut scored: Vec<(T, f32)> = candidates
        .into_iter()
        .map(|(payload, vector)| {
            let score = cosine_similarity(query, &vector);
            (payload, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_vectors_have_zero_similarity() {
        let zero = vec![0.0f32; 8];
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn negative_dot_products_clamp_to_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn top_k_orders_descending_and_truncates() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            ("far", vec![0.0, 1.0]),
            ("near", vec![1.0, 0.0]),
            ("mid", vec![0.7071, 0.7071]),
        ];
        let ranked = top_k(&query, candidates, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, "near");
        assert_eq!(ranked[1].0, "mid");
        assert!(ranked[0].1 >= ranked[1].1);
    }

    #[test]
    fn top_k_handles_k_larger_than_candidates() {
        let ranked = top_k(&[1.0], vec![("only", vec![1.0])], 10);
        assert_eq!(ranked.len(), 1);
    }
}
