use crate::models::*;
use crate::text_splitter::CharacterTextSplitter;
use anyhow::{Context, Result};
use uuid::Uuid;

pub struct DocumentProcessor {
    splitter: CharacterTextSplitter,
}

impl DocumentProcessor {
    pub fn new(splitter: CharacterTextSplitter) -> Self {
        Self { splitter }
    }

    /// Extracts, then chunks, an uploaded PDF. Parsing runs on the blocking pool.
    pub async fn process_upload(&self, pdf: UploadedPdf) -> Result<ProcessedDocument> {
        log::info!("Processing PDF: {} ({} bytes)", pdf.filename, pdf.bytes.len());

        let UploadedPdf { filename, bytes } = pdf;
        let pages = tokio::task::spawn_blocking(move || extract_pages(&bytes))
            .await
            .context("PDF extraction task failed")??;

        let content = concat_pages(&pages);
        let chunks = self.create_chunks(&content);

        log::info!(
            "Extracted {} pages ({} characters) from {}",
            pages.len(),
            content.chars().count(),
            filename
        );

        Ok(ProcessedDocument {
            filename,
            page_count: pages.len(),
            content,
            chunks,
        })
    }

    /// Same as [`process_upload`](Self::process_upload) for text that is
    /// already extracted.
    pub fn process_text(&self, filename: &str, content: &str) -> ProcessedDocument {
        ProcessedDocument {
            filename: filename.to_string(),
            page_count: 1,
            content: content.to_string(),
            chunks: self.create_chunks(content),
        }
    }

    pub fn create_chunks(&self, content: &str) -> Vec<DocumentChunk> {
        let chunks: Vec<DocumentChunk> = self
            .splitter
            .split_text(content)
            .into_iter()
            .enumerate()
            .map(|(index, content)| DocumentChunk {
                id: Uuid::new_v4().to_string(),
                index,
                content,
            })
            .collect();

        log::info!("Created {} chunks", chunks.len());
        chunks
    }
}

/// Text of every page, in page order. Pages without a text layer come back empty.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>> {
    pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| anyhow::anyhow!("Failed to extract text from PDF: {}", e))
}

pub fn extract_text(bytes: &[u8]) -> Result<String> {
    Ok(concat_pages(&extract_pages(bytes)?))
}

fn concat_pages(pages: &[String]) -> String {
    pages.concat()
}
