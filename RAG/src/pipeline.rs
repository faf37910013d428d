use crate::completion_service::{CompletionModel, OpenAICompletion};
use crate::config::RagConfig;
use crate::document_processor::DocumentProcessor;
use crate::embedding_service::{EmbeddingProvider, OpenAIEmbeddings};
use crate::models::*;
use crate::query_service::QueryService;
use crate::text_splitter::CharacterTextSplitter;
use crate::vector_store::VectorIndex;
use anyhow::Result;
use std::sync::Arc;

/// An indexed document, ready for questions.
pub struct KnowledgeBase {
    pub document: ProcessedDocument,
    pub index: VectorIndex,
}

impl KnowledgeBase {
    pub fn chunk_count(&self) -> usize {
        self.document.chunks.len()
    }
}

/// The upload-to-answer pipeline. Holds no per-document state: every call
/// rebuilds what it needs from its inputs.
pub struct PdfQa {
    processor: DocumentProcessor,
    embedding_service: Arc<dyn EmbeddingProvider>,
    query_service: QueryService,
}

impl PdfQa {
    pub fn new(
        config: &RagConfig,
        embedding_service: Arc<dyn EmbeddingProvider>,
        completion_model: Arc<dyn CompletionModel>,
    ) -> Result<Self> {
        let splitter =
            CharacterTextSplitter::new(&config.separator, config.chunk_size, config.chunk_overlap)?;

        Ok(Self {
            processor: DocumentProcessor::new(splitter),
            query_service: QueryService::new(
                embedding_service.clone(),
                completion_model,
                config.top_k,
            ),
            embedding_service,
        })
    }

    /// OpenAI-backed pipeline.
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        config.validate()?;
        Self::new(
            config,
            Arc::new(OpenAIEmbeddings::new(config)),
            Arc::new(OpenAICompletion::new(config)),
        )
    }

    pub async fn build_knowledge_base(&self, pdf: UploadedPdf) -> Result<KnowledgeBase> {
        let document = self.processor.process_upload(pdf).await?;
        self.index_document(document).await
    }

    pub async fn knowledge_base_from_text(
        &self,
        filename: &str,
        text: &str,
    ) -> Result<KnowledgeBase> {
        let document = self.processor.process_text(filename, text);
        self.index_document(document).await
    }

    async fn index_document(&self, document: ProcessedDocument) -> Result<KnowledgeBase> {
        let index =
            VectorIndex::from_chunks(document.chunks.clone(), self.embedding_service.as_ref())
                .await?;
        Ok(KnowledgeBase { document, index })
    }

    pub async fn ask(&self, knowledge_base: &KnowledgeBase, question: &str) -> Result<Answer> {
        self.query_service.answer(question, &knowledge_base.index).await
    }

    /// One page interaction. Nothing runs without a document, and the query
    /// stage only runs when a non-blank question is present.
    pub async fn run(
        &self,
        pdf: Option<UploadedPdf>,
        question: Option<&str>,
    ) -> Result<RunOutcome> {
        let Some(pdf) = pdf else {
            return Ok(RunOutcome::default());
        };

        let knowledge_base = self.build_knowledge_base(pdf).await?;
        self.answer_outcome(knowledge_base, question).await
    }

    /// [`run`](Self::run) for text that is already extracted.
    pub async fn run_text(
        &self,
        filename: &str,
        text: &str,
        question: Option<&str>,
    ) -> Result<RunOutcome> {
        let knowledge_base = self.knowledge_base_from_text(filename, text).await?;
        self.answer_outcome(knowledge_base, question).await
    }

    async fn answer_outcome(
        &self,
        knowledge_base: KnowledgeBase,
        question: Option<&str>,
    ) -> Result<RunOutcome> {
        let answer = match normalize_question(question) {
            Some(question) => Some(self.ask(&knowledge_base, question).await?),
            None => None,
        };

        Ok(RunOutcome {
            chunk_count: knowledge_base.chunk_count(),
            document: Some(knowledge_base.document.filename),
            answer,
        })
    }
}

pub fn normalize_question(question: Option<&str>) -> Option<&str> {
    question.map(str::trim).filter(|q| !q.is_empty())
}
