use std::collections::BTreeMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor, D};
use serde::Serialize;

use crate::dataset::{Sample, SampleDataset};
use crate::error::{Error, Result};
use crate::model::{BatchTokenizer, HfTokenizer, ModernBertClassifier, SequenceClassifier};
use crate::predictions::PredictionTable;

/// Descriptive snapshot of a loaded model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelProperties {
    pub embedding_size: usize,
    pub input_shape: BTreeMap<String, Vec<usize>>,
    pub max_context_length: usize,
    pub num_trainable_params: usize,
    pub output_shape: Vec<usize>,
    /// Total parameter size in bytes.
    pub size: usize,
    pub vocab_size: usize,
}

/// Runs a sequence classifier over a [`SampleDataset`].
///
/// Inference is synchronous and batches are processed in dataset order.
/// The pipeline holds no locks; callers sharing one across threads must
/// serialize access themselves.
pub struct InferencePipeline<'a, M, T> {
    model: M,
    tokenizer: T,
    dataset: &'a SampleDataset,
    max_length: usize,
    batch_size: usize,
    device: Device,
}

impl<'a> InferencePipeline<'a, ModernBertClassifier, HfTokenizer> {
    /// Loads a ModernBERT classifier and its `tokenizer.json` from `model_dir`.
    pub fn load<P: AsRef<Path>>(
        model_dir: P,
        dataset: &'a SampleDataset,
        max_length: usize,
        batch_size: usize,
        device: Device,
    ) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let model = ModernBertClassifier::load(model_dir, &device)?;

        let tokenizer_path = model_dir.join("tokenizer.json");
        if !tokenizer_path.is_file() {
            return Err(Error::ModelLoad {
                path: model_dir.to_path_buf(),
                reason: "missing tokenizer.json".to_string(),
            });
        }
        let tokenizer = HfTokenizer::from_file(tokenizer_path, model.pad_token_id(), max_length)?;

        Self::new(model, tokenizer, dataset, max_length, batch_size, device)
    }
}

impl<'a, M, T> InferencePipeline<'a, M, T>
where
    M: SequenceClassifier,
    T: BatchTokenizer,
{
    pub fn new(
        model: M,
        tokenizer: T,
        dataset: &'a SampleDataset,
        max_length: usize,
        batch_size: usize,
        device: Device,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidParameter {
                name: "batch_size",
                value: batch_size.to_string(),
                reason: "must be positive",
            });
        }
        if max_length == 0 {
            return Err(Error::InvalidParameter {
                name: "max_length",
                value: max_length.to_string(),
                reason: "must be positive",
            });
        }
        if !model.device().same_device(&device) {
            return Err(Error::DeviceMismatch {
                model: model.device().location(),
                input: device.location(),
            });
        }
        Ok(Self {
            model,
            tokenizer,
            dataset,
            max_length,
            batch_size,
            device,
        })
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Runs one forward pass over an all-ones input spanning every position
    /// embedding and reports the model's shape and size.
    pub fn analyze_model(&self) -> Result<ModelProperties> {
        let config = self.model.config();
        let input = Tensor::ones((1, config.max_position_embeddings), DType::U32, &self.device)?;
        let output = self.model.forward(&input, &input)?;

        let input_shape = ["attention_mask", "input_ids"]
            .into_iter()
            .map(|name| (name.to_string(), input.dims().to_vec()))
            .collect();

        let parameters = self.model.parameters();
        let num_trainable_params = parameters.iter().map(Tensor::elem_count).sum();
        let size = parameters
            .iter()
            .map(|t| t.elem_count() * t.dtype().size_in_bytes())
            .sum();

        Ok(ModelProperties {
            embedding_size: config.max_position_embeddings,
            input_shape,
            max_context_length: config.max_length,
            num_trainable_params,
            output_shape: output.dims().to_vec(),
            size,
            vocab_size: config.vocab_size,
        })
    }

    pub fn infer_sample(&self, sample: &Sample) -> Result<String> {
        let mut predictions = self.infer_batch(std::slice::from_ref(sample))?;
        predictions.pop().ok_or(Error::EmptyBatch)
    }

    /// Predicts every row, `batch_size` rows at a time, and pairs each
    /// prediction with the row's target.
    pub fn infer_dataset(&self) -> Result<PredictionTable> {
        let samples: Vec<Sample> = self.dataset.iter().collect();
        let mut predictions = Vec::with_capacity(samples.len());
        for (i, batch) in samples.chunks(self.batch_size).enumerate() {
            log::debug!("batch {i}: {} samples", batch.len());
            predictions.extend(self.infer_batch(batch)?);
        }
        PredictionTable::from_parts(self.dataset.data().targets(), predictions)
    }

    fn infer_batch(&self, batch: &[Sample]) -> Result<Vec<String>> {
        if batch.is_empty() {
            return Err(Error::EmptyBatch);
        }
        let texts: Vec<&str> = batch.iter().map(Sample::text).collect();
        let encoded = self.tokenizer.tokenize(&texts, self.max_length, &self.device)?;
        for tensor in [&encoded.input_ids, &encoded.attention_mask] {
            if !tensor.device().same_device(self.model.device()) {
                return Err(Error::DeviceMismatch {
                    model: self.model.device().location(),
                    input: tensor.device().location(),
                });
            }
        }

        // Weights are plain tensors rather than `Var`s, so no gradient graph
        // is recorded for this pass.
        let logits = self
            .model
            .forward(&encoded.input_ids, &encoded.attention_mask)?;
        let classes = logits.argmax(D::Minus1)?.to_vec1::<u32>()?;
        if classes.len() != batch.len() {
            return Err(Error::LengthMismatch {
                references: batch.len(),
                predictions: classes.len(),
            });
        }
        Ok(classes.into_iter().map(|c| c.to_string()).collect())
    }
}
