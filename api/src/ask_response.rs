use pdf_qa::{RunOutcome, TokenUsage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct AskResponse {
    pub document: Option<String>,
    pub chunks: usize,
    pub answer: Option<String>,
    pub sources: Vec<String>,
    pub usage: Option<TokenUsage>,
}

impl From<RunOutcome> for AskResponse {
    fn from(outcome: RunOutcome) -> Self {
        let (answer, sources, usage) = match outcome.answer {
            Some(answer) => (
                Some(answer.text),
                answer.sources.into_iter().map(|s| s.chunk.content).collect(),
                Some(answer.usage),
            ),
            None => (None, Vec::new(), None),
        };

        Self {
            document: outcome.document,
            chunks: outcome.chunk_count,
            answer,
            sources,
            usage,
        }
    }
}
