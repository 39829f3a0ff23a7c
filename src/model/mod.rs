mod config;
mod modernbert;
mod tokenizer;

pub use candle_core::Device;
use candle_core::Tensor;

pub use config::ModelConfig;
pub use modernbert::ModernBertClassifier;
pub use tokenizer::HfTokenizer;

use crate::error::{Error, Result};

/// Token ids and attention mask for one batch, both `[batch, seq_len]`.
#[derive(Debug, Clone)]
pub struct EncodedBatch {
    pub input_ids: Tensor,
    pub attention_mask: Tensor,
}

/// Turns a batch of texts into padded, truncated model inputs.
pub trait BatchTokenizer {
    fn tokenize(&self, texts: &[&str], max_length: usize, device: &Device) -> Result<EncodedBatch>;
}

/// A loaded single-sequence classifier.
pub trait SequenceClassifier {
    fn config(&self) -> &ModelConfig;

    fn device(&self) -> &Device;

    /// Returns logits of shape `[batch, num_labels]`.
    fn forward(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Tensor>;

    /// Every weight tensor of the model, as stored.
    fn parameters(&self) -> Vec<Tensor>;
}

/// Parses `cpu`, `cuda[:N]` or `metal[:N]`.
pub fn parse_device(name: &str) -> Result<Device> {
    let name = name.trim().to_ascii_lowercase();
    let (kind, ordinal) = match name.split_once(':') {
        Some((kind, ordinal)) => {
            let ordinal = ordinal
                .parse::<usize>()
                .map_err(|_| Error::UnknownDevice(name.clone()))?;
            (kind, ordinal)
        }
        None => (name.as_str(), 0),
    };
    match kind {
        "cpu" => Ok(Device::Cpu),
        "cuda" => Ok(Device::new_cuda(ordinal)?),
        "metal" => Ok(Device::new_metal(ordinal)?),
        _ => Err(Error::UnknownDevice(name.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cpu() {
        assert!(parse_device("cpu").unwrap().is_cpu());
        assert!(parse_device(" CPU ").unwrap().is_cpu());
    }

    #[test]
    fn rejects_unknown_devices() {
        assert!(matches!(parse_device("tpu"), Err(Error::UnknownDevice(_))));
        assert!(matches!(parse_device("cuda:x"), Err(Error::UnknownDevice(_))));
    }
}
