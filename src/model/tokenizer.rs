use std::path::Path;

use candle_core::{Device, Tensor};
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

use super::{BatchTokenizer, EncodedBatch};
use crate::error::{Error, Result};

/// A HuggingFace `tokenizer.json` tokenizer, padding each batch to its
/// longest member.
#[derive(Clone)]
pub struct HfTokenizer {
    tokenizer: Tokenizer,
    max_length: usize,
}

impl HfTokenizer {
    /// Configures padding with `pad_id` and truncation at `max_length`.
    pub fn new(mut tokenizer: Tokenizer, pad_id: u32, max_length: usize) -> Result<Self> {
        configure(&mut tokenizer, pad_id, max_length)?;
        Ok(Self {
            tokenizer,
            max_length,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P, pad_id: u32, max_length: usize) -> Result<Self> {
        let tokenizer = Tokenizer::from_file(path.as_ref())?;
        Self::new(tokenizer, pad_id, max_length)
    }

    fn pad_id(&self) -> u32 {
        self.tokenizer
            .get_padding()
            .map(|p| p.pad_id)
            .unwrap_or_default()
    }
}

fn configure(tokenizer: &mut Tokenizer, pad_id: u32, max_length: usize) -> Result<()> {
    tokenizer
        .with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            pad_id,
            ..Default::default()
        }))
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))?;
    Ok(())
}

impl BatchTokenizer for HfTokenizer {
    fn tokenize(&self, texts: &[&str], max_length: usize, device: &Device) -> Result<EncodedBatch> {
        if texts.is_empty() {
            return Err(Error::EmptyBatch);
        }

        let encodings = if max_length == self.max_length {
            self.tokenizer.encode_batch(texts.to_vec(), true)?
        } else {
            let mut tokenizer = self.tokenizer.clone();
            configure(&mut tokenizer, self.pad_id(), max_length)?;
            tokenizer.encode_batch(texts.to_vec(), true)?
        };

        let mut input_ids = Vec::with_capacity(encodings.len());
        let mut attention_mask = Vec::with_capacity(encodings.len());
        for encoding in encodings {
            input_ids.push(Tensor::new(encoding.get_ids(), device)?);
            attention_mask.push(Tensor::new(encoding.get_attention_mask(), device)?);
        }
        Ok(EncodedBatch {
            input_ids: Tensor::stack(input_ids.as_slice(), 0)?,
            attention_mask: Tensor::stack(attention_mask.as_slice(), 0)?,
        })
    }
}
