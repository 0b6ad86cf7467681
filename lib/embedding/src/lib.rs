//! # SprintSync Embedding
//!
//! Implementations of [`sprintsync_core::Embedder`]:
//!
//! - [`OpenAiEmbedder`] - remote `text-embedding-3-small` (or any compatible endpoint)
//! - [`HashingEmbedder`] - deterministic local trigram hashing
//! - [`ZeroEmbedder`] - zero vectors, for CI

pub mod hashing;
pub mod openai;
pub mod zero;

pub use hashing::HashingEmbedder;
pub use openai::{OpenAiConfig, OpenAiEmbedder};
pub use zero::ZeroEmbedder;

use sprintsync_core::{Embedder, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// API key value that selects the zero embedder regardless of provider
pub const CI_DUMMY_KEY: &str = "dummy-key-for-ci";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Hashing,
    Zero,
}

#[derive(Debug, Error)]
#[error("unknown embedding provider '{0}' (expected openai, hashing or zero)")]
pub struct UnknownProvider(String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "hashing" | "hash" => Ok(ProviderKind::Hashing),
            "zero" | "stub" => Ok(ProviderKind::Zero),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Hashing => "hashing",
            ProviderKind::Zero => "zero",
        };
        write!(f, "{}", name)
    }
}

/// Build the configured provider.
///
/// `openai` falls back to [`ZeroEmbedder`] when the key is [`CI_DUMMY_KEY`].
pub fn build_embedder(kind: ProviderKind, openai: OpenAiConfig) -> Result<Arc<dyn Embedder>> {
    let dim = openai.dimensions;
    let embedder: Arc<dyn Embedder> = match kind {
        ProviderKind::OpenAi if openai.api_key == CI_DUMMY_KEY => Arc::new(ZeroEmbedder::new(dim)),
        ProviderKind::OpenAi => Arc::new(OpenAiEmbedder::new(openai)?),
        ProviderKind::Hashing => Arc::new(HashingEmbedder::new(dim)),
        ProviderKind::Zero => Arc::new(ZeroEmbedder::new(dim)),
    };
    Ok(embedder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_kind() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("hashing".parse::<ProviderKind>().unwrap(), ProviderKind::Hashing);
        assert_eq!("zero".parse::<ProviderKind>().unwrap(), ProviderKind::Zero);
        assert!("bert".parse::<ProviderKind>().is_err());
    }

    #[tokio::test]
    async fn test_ci_key_selects_zero_embedder() {
        let mut config = OpenAiConfig::new(CI_DUMMY_KEY);
        config.dimensions = 8;

        let embedder = build_embedder(ProviderKind::OpenAi, config).unwrap();
        assert_eq!(embedder.name(), "zero");

        let v = embedder.embed("anything").await.unwrap();
        assert_eq!(v.dim(), 8);
        assert!(v.as_slice().iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_openai_requires_key() {
        assert!(build_embedder(ProviderKind::OpenAi, OpenAiConfig::new("")).is_err());
    }
}
