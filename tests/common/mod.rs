#![allow(dead_code)]

use std::cell::RefCell;

use candle_core::{DType, Device, Module, Tensor};
use candle_nn::{Embedding, Linear};
use toxic_classifier_eval::model::{BatchTokenizer, EncodedBatch, ModelConfig, SequenceClassifier};
use toxic_classifier_eval::{NormalizedRecord, NormalizedTable, Result};

pub const PAD: u32 = 0;
pub const CLS: u32 = 7;

/// `[CLS]` followed by one id per character in `1..=6`, padded with `0`.
/// Records every batch it receives.
#[derive(Default)]
pub struct CharTokenizer {
    pub batches: RefCell<Vec<Vec<String>>>,
}

impl BatchTokenizer for CharTokenizer {
    fn tokenize(&self, texts: &[&str], max_length: usize, device: &Device) -> Result<EncodedBatch> {
        self.batches
            .borrow_mut()
            .push(texts.iter().map(|t| t.to_string()).collect());

        let encoded: Vec<Vec<u32>> = texts
            .iter()
            .map(|text| {
                std::iter::once(CLS)
                    .chain(text.chars().map(|c| c as u32 % 6 + 1))
                    .take(max_length)
                    .collect()
            })
            .collect();
        let width = encoded.iter().map(Vec::len).max().unwrap_or(0);

        let mut ids = Vec::with_capacity(texts.len() * width);
        let mut mask = Vec::with_capacity(texts.len() * width);
        for row in &encoded {
            ids.extend(row.iter().copied().chain(std::iter::repeat(PAD)).take(width));
            mask.extend((0..width).map(|i| u32::from(i < row.len())));
        }
        Ok(EncodedBatch {
            input_ids: Tensor::from_vec(ids, (texts.len(), width), device)?,
            attention_mask: Tensor::from_vec(mask, (texts.len(), width), device)?,
        })
    }
}

/// Mean-pooled embedding classifier: class 1 when a text has more odd than
/// even character ids. `[CLS]` embeds to zero.
pub struct ParityClassifier {
    embedding: Embedding,
    classifier: Linear,
    config: ModelConfig,
    device: Device,
}

impl ParityClassifier {
    pub fn new(device: &Device) -> Self {
        let rows: Vec<f32> = (0..8u32)
            .flat_map(|id| match id {
                CLS => [0.0, 0.0],
                id if id % 2 == 0 => [1.0, 0.0],
                _ => [0.0, 1.0],
            })
            .collect();
        let embeddings = Tensor::from_vec(rows, (8, 2), device).unwrap();
        let weight = Tensor::new(&[[1f32, 0.], [0., 1.]], device).unwrap();
        let bias = Tensor::zeros(2, DType::F32, device).unwrap();
        Self {
            embedding: Embedding::new(embeddings, 2),
            classifier: Linear::new(weight, Some(bias)),
            config: ModelConfig {
                vocab_size: 8,
                max_position_embeddings: 16,
                max_length: 20,
            },
            device: device.clone(),
        }
    }
}

impl SequenceClassifier for ParityClassifier {
    fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn device(&self) -> &Device {
        &self.device
    }

    fn forward(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        let embedded = self.embedding.forward(input_ids)?;
        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = embedded.broadcast_mul(&mask)?.sum(1)?;
        let pooled = summed.broadcast_div(&mask.sum(1)?)?;
        Ok(self.classifier.forward(&pooled)?)
    }

    fn parameters(&self) -> Vec<Tensor> {
        let mut params = vec![self.embedding.embeddings().clone(), self.classifier.weight().clone()];
        params.extend(self.classifier.bias().cloned());
        params
    }
}

pub fn table(sources: &[&str], targets: &[u8]) -> NormalizedTable {
    NormalizedTable::new(
        sources
            .iter()
            .zip(targets)
            .map(|(s, t)| NormalizedRecord {
                source: s.to_string(),
                target: *t,
            })
            .collect(),
    )
}
