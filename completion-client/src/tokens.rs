//! Prompt token counting

use crate::error::ClientError;
use tiktoken_rs::CoreBPE;

/// BPE token counter matching the target model's tokenizer.
pub struct TokenCounter {
    bpe: CoreBPE,
}

impl TokenCounter {
    /// Create a counter for `model`, falling back to `o200k_base`
    pub fn for_model(model: &str) -> Result<Self, ClientError> {
        let bpe = tiktoken_rs::get_bpe_from_model(model)
            .or_else(|_| tiktoken_rs::o200k_base())
            .map_err(|e| ClientError::Tokenizer {
                message: e.to_string(),
            })?;
        Ok(Self { bpe })
    }

    /// Count the tokens in `text`
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter").finish_non_exhaustive()
    }
}
