//! OpenAI embeddings client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sprintsync_core::{Embedder, Error, Result, Vector, DEFAULT_EMBEDDING_DIM};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub dimensions: usize,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            dimensions: DEFAULT_EMBEDDING_DIM,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Calls `POST {base_url}/embeddings`. No retries.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiEmbedder {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::InvalidConfig("OpenAI API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        // The 3rd-generation models default to 1536; only ask for a
        // different size explicitly.
        let dimensions = (self.config.dimensions != DEFAULT_EMBEDDING_DIM)
            .then_some(self.config.dimensions);

        let request = EmbeddingRequest {
            model: &self.config.model,
            input: text,
            dimensions,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(Error::provider)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, model = %self.config.model, "embedding request rejected");
            return Err(Error::EmbeddingProvider(format!(
                "provider returned {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(Error::provider)?;
        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                Error::EmbeddingProvider("response contained no embeddings".to_string())
            })?;

        debug!(model = %self.config.model, dim = embedding.len(), "embedding computed");
        Ok(Vector::new(embedding))
    }

    fn dimension(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer, dimensions: usize) -> OpenAiConfig {
        OpenAiConfig {
            base_url: server.uri(),
            dimensions,
            ..OpenAiConfig::new("sk-test")
        }
    }

    #[tokio::test]
    async fn test_embed_parses_first_embedding() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "list",
                "data": [{"object": "embedding", "index": 0, "embedding": [0.1, 0.2, 0.3]}],
                "model": "text-embedding-3-small"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let embedder = OpenAiEmbedder::new(config_for(&server, 3)).unwrap();
        let vector = embedder.embed("hello").await.unwrap();
        assert_eq!(vector.as_slice(), &[0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_error_status_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let embedder = OpenAiEmbedder::new(config_for(&server, 3)).unwrap();
        let err = embedder.embed("hello").await.unwrap_err();
        assert!(matches!(err, Error::EmbeddingProvider(msg) if msg.contains("429")));
    }

    #[tokio::test]
    async fn test_empty_data_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .mount(&server)
            .await;

        let embedder = OpenAiEmbedder::new(config_for(&server, 3)).unwrap();
        assert!(matches!(
            embedder.embed("hello").await,
            Err(Error::EmbeddingProvider(_))
        ));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(matches!(
            OpenAiEmbedder::new(OpenAiConfig::new("")),
            Err(Error::InvalidConfig(_))
        ));
    }
}
