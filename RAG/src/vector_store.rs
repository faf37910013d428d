use crate::embedding_service::EmbeddingProvider;
use crate::models::*;
use anyhow::Result;

/// Flat in-memory index over chunk embeddings. Search is exhaustive by
/// Euclidean distance.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    entries: Vec<(DocumentChunk, Vec<f32>)>,
    dimensions: usize,
}

impl VectorIndex {
    pub async fn from_chunks(
        chunks: Vec<DocumentChunk>,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Self> {
        if chunks.is_empty() {
            log::info!("No chunks to index");
            return Ok(Self::default());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedder.embed_documents(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(anyhow::anyhow!(
                "Got {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            ));
        }

        let index = Self::from_embeddings(chunks.into_iter().zip(embeddings).collect())?;
        log::info!(
            "Built index with {} vectors of dimension {}",
            index.len(),
            index.dimensions
        );
        Ok(index)
    }

    pub fn from_embeddings(entries: Vec<(DocumentChunk, Vec<f32>)>) -> Result<Self> {
        let dimensions = entries.first().map(|(_, e)| e.len()).unwrap_or(0);
        if let Some((chunk, embedding)) = entries.iter().find(|(_, e)| e.len() != dimensions) {
            return Err(anyhow::anyhow!(
                "Embedding for chunk {} has dimension {}, expected {}",
                chunk.index,
                embedding.len(),
                dimensions
            ));
        }
        Ok(Self {
            entries,
            dimensions,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `k` closest chunks, nearest first. Equal distances keep insertion order.
    pub fn similarity_search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimensions {
            return Err(anyhow::anyhow!(
                "Query embedding has dimension {}, index expects {}",
                query.len(),
                self.dimensions
            ));
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (_, embedding))| (i, l2_distance(query, embedding)))
            .collect();

        // sort_by is stable, so ties stay in insertion order
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));

        let results: Vec<RetrievedChunk> = scored
            .into_iter()
            .take(k)
            .map(|(i, distance)| RetrievedChunk {
                chunk: self.entries[i].0.clone(),
                distance,
            })
            .collect();

        log::info!("Found {} relevant chunks", results.len());
        Ok(results)
    }
}

pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn chunk(index: usize, content: &str) -> DocumentChunk {
        DocumentChunk {
            id: format!("chunk-{}", index),
            index,
            content: content.to_string(),
        }
    }

    struct LengthEmbeddings;

    #[async_trait]
    impl EmbeddingProvider for LengthEmbeddings {
        async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 0.0]).collect())
        }
    }

    struct ShortEmbeddings;

    #[async_trait]
    impl EmbeddingProvider for ShortEmbeddings {
        async fn embed_documents(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(vec![vec![1.0]])
        }
    }

    struct PanickingEmbeddings;

    #[async_trait]
    impl EmbeddingProvider for PanickingEmbeddings {
        async fn embed_documents(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            panic!("embedding provider must not be called");
        }
    }

    #[test]
    fn nearest_first_and_bounded_by_k() {
        let index = VectorIndex::from_embeddings(vec![
            (chunk(0, "far"), vec![10.0, 0.0]),
            (chunk(1, "near"), vec![1.0, 0.0]),
            (chunk(2, "middle"), vec![4.0, 0.0]),
        ])
        .unwrap();

        let results = index.similarity_search(&[0.0, 0.0], 2).unwrap();
        let order: Vec<&str> = results.iter().map(|r| r.chunk.content.as_str()).collect();
        assert_eq!(order, vec!["near", "middle"]);
        assert!((results[0].distance - 1.0).abs() < 1e-6);

        assert_eq!(index.similarity_search(&[0.0, 0.0], 10).unwrap().len(), 3);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let index = VectorIndex::from_embeddings(vec![
            (chunk(0, "a"), vec![1.0, 0.0]),
            (chunk(1, "b"), vec![0.0, 1.0]),
            (chunk(2, "c"), vec![-1.0, 0.0]),
        ])
        .unwrap();

        let results = index.similarity_search(&[0.0, 0.0], 3).unwrap();
        let order: Vec<usize> = results.iter().map(|r| r.chunk.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn non_finite_distances_still_sort() {
        let index = VectorIndex::from_embeddings(vec![
            (chunk(0, "nan"), vec![f32::NAN, 0.0]),
            (chunk(1, "far"), vec![3.0, 0.0]),
            (chunk(2, "inf"), vec![f32::INFINITY, 0.0]),
            (chunk(3, "near"), vec![1.0, 0.0]),
        ])
        .unwrap();

        let results = index.similarity_search(&[0.0, 0.0], 4).unwrap();
        assert_eq!(results.len(), 4);

        let finite: Vec<&str> = results
            .iter()
            .filter(|r| r.distance.is_finite())
            .map(|r| r.chunk.content.as_str())
            .collect();
        assert_eq!(finite, vec!["near", "far"]);

        let near = results.iter().position(|r| r.chunk.index == 3).unwrap();
        let inf = results.iter().position(|r| r.chunk.index == 2).unwrap();
        assert!(near < inf);
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        assert!(VectorIndex::from_embeddings(vec![
            (chunk(0, "a"), vec![1.0, 0.0]),
            (chunk(1, "b"), vec![1.0]),
        ])
        .is_err());

        let index = VectorIndex::from_embeddings(vec![(chunk(0, "a"), vec![1.0, 0.0])]).unwrap();
        assert!(index.similarity_search(&[1.0], 1).is_err());
    }

    #[tokio::test]
    async fn builds_from_provider() {
        let chunks = vec![chunk(0, "short"), chunk(1, "a much longer chunk")];
        let index = VectorIndex::from_chunks(chunks, &LengthEmbeddings).await.unwrap();
        assert_eq!(index.len(), 2);

        let results = index.similarity_search(&[19.0, 0.0], 1).unwrap();
        assert_eq!(results[0].chunk.index, 1);
    }

    #[tokio::test]
    async fn empty_chunks_skip_the_provider() {
        let index = VectorIndex::from_chunks(Vec::new(), &PanickingEmbeddings)
            .await
            .unwrap();
        assert!(index.is_empty());
        assert!(index.similarity_search(&[1.0], 4).unwrap().is_empty());
    }

    #[tokio::test]
    async fn embedding_count_mismatch_is_an_error() {
        let chunks = vec![chunk(0, "a"), chunk(1, "b")];
        assert!(VectorIndex::from_chunks(chunks, &ShortEmbeddings).await.is_err());
    }
}
