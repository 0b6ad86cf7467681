//! Local hashing embedder
//!
//! Hashes character trigrams and whole words into a fixed number of buckets.
//! Texts that share vocabulary land close together, which is enough for local
//! development and tests without a model provider.

use async_trait::async_trait;
use sprintsync_core::{Embedder, Result, Vector};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        Ok(hash_text_to_vector(text, self.dim))
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

/// Hash text into a unit-length vector of `dim` buckets.
///
/// Empty text yields the zero vector.
pub fn hash_text_to_vector(text: &str, dim: usize) -> Vector {
    let mut buckets = vec![0.0f32; dim];
    if dim == 0 {
        return Vector::new(buckets);
    }

    let lowered = text.to_lowercase();

    for trigram in generate_trigrams(lowered.trim()) {
        buckets[bucket(&trigram, dim)] += 1.0;
    }

    // Words contribute more than trigrams
    for word in lowered.split_whitespace() {
        buckets[bucket(word, dim)] += 2.0;
    }

    Vector::new(buckets).normalized()
}

fn bucket(token: &str, dim: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    (hasher.finish() as usize) % dim
}

fn generate_trigrams(s: &str) -> HashSet<String> {
    if s.is_empty() {
        return HashSet::new();
    }

    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();

    chars.windows(3).map(|w| w.iter().collect::<String>()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_text_to_vector() {
        let vec1 = hash_text_to_vector("hello world", 64);
        let vec2 = hash_text_to_vector("hello world", 64);
        let vec3 = hash_text_to_vector("goodbye moon", 64);

        assert_eq!(vec1.dim(), 64);
        assert_eq!(vec1, vec2);
        assert_ne!(vec1, vec3);
        assert!((vec1.norm() - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let v = hash_text_to_vector("   ", 32);
        assert_eq!(v, Vector::zeros(32));
    }

    #[tokio::test]
    async fn test_shared_vocabulary_is_closer() {
        let embedder = HashingEmbedder::new(256);
        let backend = embedder.embed("rust backend api developer postgres").await.unwrap();
        let design = embedder.embed("figma illustrator visual designer").await.unwrap();
        let task = embedder.embed("build the postgres backend api").await.unwrap();

        let to_backend = task.cosine_distance(&backend).unwrap();
        let to_design = task.cosine_distance(&design).unwrap();
        assert!(to_backend < to_design, "{} vs {}", to_backend, to_design);
    }
}
