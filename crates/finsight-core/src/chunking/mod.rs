//! Sentence-aligned chunking
//!
//! Raw extracted text is split into overlapping chunks of bounded token
//! length. Sentences are the primary unit: they accumulate into a buffer
//! until the next sentence would exceed the chunk budget, at which point the
//! buffer is emitted as one chunk. Overlap carries whole trailing sentences
//! forward, never a mid-sentence slice.

pub mod tokenizer;

use crate::models::Chunk;
use finsight_config::ChunkingConfig;
use sha2::{Digest, Sha256};

/// Pluggable token counting function.
///
/// Must count the same subword tokens the embedding provider and language
/// model consume. Defaults to tiktoken `cl100k_base`.
pub type TokenCounter = fn(&str) -> usize;

pub struct SentenceChunker {
    chunk_size_tokens: usize,
    overlap_tokens: usize,
    count_tokens: TokenCounter,
}

impl SentenceChunker {
    pub fn new(config: &ChunkingConfig) -> Self {
        Self::with_counter(
            config.chunk_size_tokens,
            config.overlap_tokens,
            tokenizer::count_tokens,
        )
    }

    pub fn with_counter(
        chunk_size_tokens: usize,
        overlap_tokens: usize,
        count_tokens: TokenCounter,
    ) -> Self {
        Self {
            chunk_size_tokens,
            overlap_tokens,
            count_tokens,
        }
    }

    /// Split `text` into ordered chunks for `document_id`.
    ///
    /// Output order equals document order; ordinals are assigned
    /// sequentially from 0. A single sentence longer than the chunk budget
    /// is emitted as its own oversized chunk; content is never dropped.
    pub fn chunk(&self, document_id: &str, text: &str) -> Vec<Chunk> {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut buffer: Vec<(String, usize)> = Vec::new();
        let mut buffer_tokens = 0usize;

        for sentence in sentences {
            let tokens = (self.count_tokens)(&sentence);

            if !buffer.is_empty() && buffer_tokens + tokens > self.chunk_size_tokens {
                self.emit(document_id, &buffer, chunks.len(), &mut chunks);

                let (carry, carry_tokens) = self.carry_overlap(&buffer);
                // An overlap that leaves no room for the incoming sentence
                // would immediately re-emit pure overlap; start empty instead.
                if carry_tokens + tokens > self.chunk_size_tokens {
                    buffer = Vec::new();
                    buffer_tokens = 0;
                } else {
                    buffer = carry;
                    buffer_tokens = carry_tokens;
                }
            }

            buffer_tokens += tokens;
            buffer.push((sentence, tokens));
        }

        if !buffer.is_empty() {
            self.emit(document_id, &buffer, chunks.len(), &mut chunks);
        }

        chunks
    }

    /// Trailing sentences of the previous buffer whose combined token count
    /// stays under the overlap budget
    fn carry_overlap(&self, buffer: &[(String, usize)]) -> (Vec<(String, usize)>, usize) {
        let mut carry: Vec<(String, usize)> = Vec::new();
        let mut carry_tokens = 0usize;

        for (sentence, tokens) in buffer.iter().rev() {
            if carry_tokens + tokens > self.overlap_tokens {
                break;
            }
            // Never carry the entire previous chunk; that would duplicate it.
            if carry.len() + 1 == buffer.len() {
                break;
            }
            carry_tokens += tokens;
            carry.insert(0, (sentence.clone(), *tokens));
        }

        (carry, carry_tokens)
    }

    fn emit(
        &self,
        document_id: &str,
        buffer: &[(String, usize)],
        ordinal: usize,
        chunks: &mut Vec<Chunk>,
    ) {
        let text = buffer
            .iter()
            .map(|(s, _)| s.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let token_count = (self.count_tokens)(&text);

        chunks.push(Chunk {
            id: chunk_id(document_id, ordinal, &text),
            document_id: document_id.to_string(),
            text,
            token_count,
            ordinal,
            page_number: None,
            section: None,
            embedding: None,
        });
    }
}

/// Deterministic chunk id from document id, position, and content
pub fn chunk_id(document_id: &str, ordinal: usize, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document_id.as_bytes());
    hasher.update(ordinal.to_be_bytes());
    hasher.update(text.as_bytes());
    let hash = hex::encode(hasher.finalize());
    hash[..16].to_string()
}

/// Split on sentence-terminal punctuation, keeping the terminator with the
/// sentence. Text without any terminal punctuation is one sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut iter = text.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if matches!(c, '.' | '!' | '?') {
            let boundary = iter.peek().map_or(true, |(_, next)| next.is_whitespace());
            if boundary {
                let end = i + c.len_utf8();
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_string());
                }
                start = end;
            }
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    // Deterministic counter for tests: one token per whitespace-separated word
    fn word_count(text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn chunker(size: usize, overlap: usize) -> SentenceChunker {
        SentenceChunker::with_counter(size, overlap, word_count)
    }

    #[test]
    fn three_sentences_fit_in_one_chunk() {
        let text = "Revenue grew in Q3. Margins held steady. Guidance was raised.";
        let chunks = chunker(100, 10).chunk("doc-1", text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].ordinal, 0);
        assert!(chunks[0].text.contains("Guidance was raised."));
    }

    #[test]
    fn overlap_carries_trailing_sentences() {
        // Each sentence is 5 words; budget fits two sentences.
        let text = "Alpha beta gamma delta one. Alpha beta gamma delta two. Alpha beta gamma delta three.";
        let chunks = chunker(10, 5).chunk("doc-1", text);
        assert_eq!(chunks.len(), 2);
        // Chunk 2 leads with chunk 1's trailing sentence.
        assert!(chunks[1].text.starts_with("Alpha beta gamma delta two."));
        assert!(chunks[1].text.ends_with("Alpha beta gamma delta three."));
    }

    #[test]
    fn overlap_bound_holds_for_adjacent_chunks() {
        let text = "One two three. Four five six. Seven eight nine. Ten eleven twelve. Thirteen fourteen fifteen.";
        let overlap = 3;
        let chunks = chunker(6, overlap).chunk("doc-1", text);
        assert!(chunks.len() >= 2);

        for pair in chunks.windows(2) {
            let prev: Vec<String> = split_sentences(&pair[0].text);
            let next: Vec<String> = split_sentences(&pair[1].text);
            let shared_tokens: usize = next
                .iter()
                .filter(|s| prev.contains(s))
                .map(|s| word_count(s))
                .sum();
            assert!(shared_tokens <= overlap, "overlap {} > {}", shared_tokens, overlap);
        }
    }

    #[test]
    fn oversized_sentence_is_emitted_whole() {
        let text = "Tiny one. This single enormous sentence has far too many words to ever fit the budget. Tiny two.";
        let chunks = chunker(5, 2).chunk("doc-1", text);
        let oversized = chunks
            .iter()
            .find(|c| c.text.contains("enormous"))
            .expect("oversized sentence must be kept");
        assert!(oversized.text.contains("far too many words"));
        assert!(oversized.token_count > 5);
    }

    #[test]
    fn degenerate_input_becomes_one_sentence() {
        let text = "no terminal punctuation here just a stream of words";
        let sentences = split_sentences(text);
        assert_eq!(sentences.len(), 1);

        let chunks = chunker(100, 10).chunk("doc-1", text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);
    }

    #[test]
    fn no_sentence_is_dropped() {
        let text = "S one alpha. S two beta. S three gamma. S four delta. S five epsilon. S six zeta.";
        let sentences = split_sentences(text);
        let chunks = chunker(6, 3).chunk("doc-1", text);

        // Every source sentence appears in at least one chunk, in order.
        let mut cursor = 0usize;
        for sentence in &sentences {
            let found = chunks[cursor..]
                .iter()
                .position(|c| c.text.contains(sentence.as_str()));
            assert!(found.is_some(), "sentence dropped: {}", sentence);
            cursor += found.unwrap();
        }
    }

    #[test]
    fn ordinals_are_sequential_from_zero() {
        let text = "One two three. Four five six. Seven eight nine. Ten eleven twelve.";
        let chunks = chunker(6, 0).chunk("doc-1", text);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.ordinal, i);
        }
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunker(10, 2).chunk("doc-1", "").is_empty());
        assert!(chunker(10, 2).chunk("doc-1", "   \n ").is_empty());
    }

    #[test]
    fn abbreviation_mid_token_does_not_split() {
        // Terminator not followed by whitespace stays inside the sentence.
        let sentences = split_sentences("Revenue was $1.5B in FY2023. Costs fell.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("$1.5B"));
    }
}
