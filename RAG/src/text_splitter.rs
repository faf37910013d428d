use anyhow::Result;
use regex::Regex;
use std::collections::VecDeque;

/// Splits text on a literal separator and packs the pieces into overlapping
/// windows. Lengths are counted in characters.
#[derive(Debug, Clone)]
pub struct CharacterTextSplitter {
    separator: String,
    pattern: Option<Regex>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl CharacterTextSplitter {
    pub fn new(separator: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_overlap > chunk_size {
            anyhow::bail!(
                "Got a larger chunk overlap ({}) than chunk size ({})",
                chunk_overlap,
                chunk_size
            );
        }

        let pattern = if separator.is_empty() {
            None
        } else {
            Some(Regex::new(&regex::escape(separator))?)
        };

        Ok(Self {
            separator: separator.to_string(),
            pattern,
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        let splits: Vec<&str> = match &self.pattern {
            Some(re) => re.split(text).filter(|s| !s.is_empty()).collect(),
            None => text
                .char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect(),
        };
        self.merge_splits(&splits)
    }

    fn merge_splits(&self, splits: &[&str]) -> Vec<String> {
        let separator_len = self.separator.chars().count();
        let joiner = |window_len: usize| if window_len == 0 { 0 } else { separator_len };

        let mut docs = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0;

        for &split in splits {
            let len = split.chars().count();

            if total + len + joiner(window.len()) > self.chunk_size {
                if total > self.chunk_size {
                    log::warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total,
                        self.chunk_size
                    );
                }

                if !window.is_empty() {
                    if let Some(doc) = self.join(&window) {
                        docs.push(doc);
                    }

                    // Shrink from the front until what remains fits as overlap.
                    while total > self.chunk_overlap
                        || (total + len + joiner(window.len()) > self.chunk_size && total > 0)
                    {
                        let removed_joiner = if window.len() > 1 { separator_len } else { 0 };
                        match window.pop_front() {
                            Some(first) => total -= first.chars().count() + removed_joiner,
                            None => break,
                        }
                    }
                }
            }

            window.push_back(split);
            total += len + if window.len() > 1 { separator_len } else { 0 };
        }

        if let Some(doc) = self.join(&window) {
            docs.push(doc);
        }

        docs
    }

    fn join(&self, window: &VecDeque<&str>) -> Option<String> {
        let joined = window
            .iter()
            .copied()
            .collect::<Vec<_>>()
            .join(&self.separator);
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
