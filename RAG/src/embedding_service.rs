use crate::config::RagConfig;
use crate::models::*;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Inputs per embeddings request.
const MAX_BATCH: usize = 1000;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// One vector per input text, in input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_documents(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| anyhow::anyhow!("Embedding provider returned no vector for the query"))
    }
}

pub struct OpenAIEmbeddings {
    client: Client,
    api_key: String,
    url: String,
    model: String,
}

impl OpenAIEmbeddings {
    pub fn new(config: &RagConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            url: config.endpoint("embeddings"),
            model: config.embedding_model.clone(),
        }
    }

    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: batch,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Embedding request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow::anyhow!(
                "OpenAI embeddings API error ({}): {}",
                status,
                api_error_message(&error_text)
            ));
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .context("Malformed embeddings response")?;

        if parsed.data.len() != batch.len() {
            return Err(anyhow::anyhow!(
                "Expected {} embeddings, got {}",
                batch.len(),
                parsed.data.len()
            ));
        }

        parsed.data.sort_by_key(|d| d.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddings {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH) {
            embeddings.extend(self.embed_batch(batch).await?);
        }
        log::info!("Embedded {} texts with {}", embeddings.len(), self.model);
        Ok(embeddings)
    }
}

/// Pulls `error.message` out of an OpenAI error body, falling back to the raw text.
pub(crate) fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn provider(server: &mockito::ServerGuard) -> OpenAIEmbeddings {
        OpenAIEmbeddings::new(&RagConfig::new("sk-test").with_api_base(server.url()))
    }

    #[tokio::test]
    async fn returns_vectors_in_input_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "text-embedding-ada-002",
                "input": ["first", "second"]
            })))
            .with_status(200)
            .with_body(
                json!({
                    "data": [
                        { "index": 1, "embedding": [0.0, 1.0] },
                        { "index": 0, "embedding": [1.0, 0.0] }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let vectors = provider(&server)
            .embed_documents(&["first".to_string(), "second".to_string()])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[tokio::test]
    async fn query_embedding_is_single_vector() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body(json!({ "data": [{ "index": 0, "embedding": [0.5, 0.5] }] }).to_string())
            .create_async()
            .await;

        let vector = provider(&server).embed_query("what?").await.unwrap();
        assert_eq!(vector, vec![0.5, 0.5]);
    }

    #[tokio::test]
    async fn api_error_message_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(401)
            .with_body(json!({ "error": { "message": "Incorrect API key provided" } }).to_string())
            .create_async()
            .await;

        let err = provider(&server)
            .embed_documents(&["text".to_string()])
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("Incorrect API key provided"));
    }

    #[tokio::test]
    async fn count_mismatch_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body(json!({ "data": [] }).to_string())
            .create_async()
            .await;

        assert!(provider(&server)
            .embed_documents(&["text".to_string()])
            .await
            .is_err());
    }

    #[test]
    fn non_json_error_body_passes_through() {
        assert_eq!(api_error_message("upstream timeout"), "upstream timeout");
    }
}
