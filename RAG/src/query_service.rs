use crate::completion_service::CompletionModel;
use crate::embedding_service::EmbeddingProvider;
use crate::models::*;
use crate::vector_store::VectorIndex;
use anyhow::Result;
use std::sync::Arc;

pub struct QueryService {
    embedding_service: Arc<dyn EmbeddingProvider>,
    completion_model: Arc<dyn CompletionModel>,
    top_k: usize,
}

impl QueryService {
    pub fn new(
        embedding_service: Arc<dyn EmbeddingProvider>,
        completion_model: Arc<dyn CompletionModel>,
        top_k: usize,
    ) -> Self {
        Self {
            embedding_service,
            completion_model,
            top_k,
        }
    }

    pub async fn answer(&self, question: &str, index: &VectorIndex) -> Result<Answer> {
        if index.is_empty() {
            return Err(anyhow::anyhow!(
                "The document has no extractable text to answer questions from"
            ));
        }

        let query_embedding = self.embedding_service.embed_query(question).await?;
        let sources = index.similarity_search(&query_embedding, self.top_k)?;

        let context = build_context(&sources);
        let prompt = build_prompt(question, &context);

        let completion = self.completion_model.complete(&prompt).await?;
        log::info!("{}", completion.usage);

        Ok(Answer {
            text: completion.text.trim().to_string(),
            sources,
            usage: completion.usage,
        })
    }
}

/// Every retrieved chunk, verbatim, separated by a blank line.
pub fn build_context(sources: &[RetrievedChunk]) -> String {
    sources
        .iter()
        .map(|s| s.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        r#"Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.

{context}

Question: {question}
Helpful Answer:"#
    )
}
