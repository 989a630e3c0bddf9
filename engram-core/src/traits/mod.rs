//! Seam traits implemented by subsystem crates.

mod embedding;
mod sanitizer;

pub use embedding::IEmbeddingProvider;
pub use sanitizer::{ISanitizer, SanitizedText};
