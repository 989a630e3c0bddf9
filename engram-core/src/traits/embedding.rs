use crate::errors::EngramResult;

/// Produces fixed-dimension embedding vectors.
pub trait IEmbeddingProvider {
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>>;

    fn embed_batch(&self, texts: &[String]) -> EngramResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimensions(&self) -> usize;

    fn name(&self) -> &str;
}
