pub mod models;
pub mod config;
pub mod text_splitter;
pub mod document_processor;
pub mod embedding_service;
pub mod vector_store;
pub mod completion_service;
pub mod query_service;
pub mod pipeline;

pub use models::*;
pub use config::RagConfig;
pub use text_splitter::CharacterTextSplitter;
pub use document_processor::DocumentProcessor;
pub use embedding_service::{EmbeddingProvider, OpenAIEmbeddings};
pub use vector_store::VectorIndex;
pub use completion_service::{CompletionModel, OpenAICompletion};
pub use query_service::QueryService;
pub use pipeline::{KnowledgeBase, PdfQa};
