use once_cell::sync::Lazy;
use tiktoken_rs::{cl100k_base, CoreBPE};

static TOKENIZER: Lazy<CoreBPE> = Lazy::new(|| cl100k_base().expect("Failed to load tokenizer"));

/// Count exact subword tokens using tiktoken (GPT-compatible).
///
/// This is the same unit the embedding provider and language model consume;
/// character or word counts would misestimate context-window usage.
pub fn count_tokens(text: &str) -> usize {
    TOKENIZER.encode_with_special_tokens(text).len()
}
