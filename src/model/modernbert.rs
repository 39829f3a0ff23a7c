use std::fs::File;
use std::path::{Path, PathBuf};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::modernbert::{Config, ModernBertForSequenceClassification};

use super::{ModelConfig, SequenceClassifier};
use crate::error::{Error, Result};

/// ModernBERT sequence classifier loaded from a local model directory
/// holding `config.json` and `model.safetensors`.
pub struct ModernBertClassifier {
    model: ModernBertForSequenceClassification,
    config: ModelConfig,
    pad_token_id: u32,
    parameters: Vec<Tensor>,
    device: Device,
}

impl ModernBertClassifier {
    pub fn load<P: AsRef<Path>>(path: P, device: &Device) -> Result<Self> {
        let mut dir = PathBuf::from(path.as_ref());
        if !dir.is_dir() {
            return Err(Error::ModelLoad {
                path: dir,
                reason: "not a directory".to_string(),
            });
        }
        for name in ["config.json", "model.safetensors"] {
            if !dir.join(name).is_file() {
                return Err(Error::ModelLoad {
                    path: dir,
                    reason: format!("missing {name}"),
                });
            }
        }

        dir.push("config.json");
        let config_reader = File::open(&dir)?;
        let raw_config: serde_json::Value = serde_json::from_reader(config_reader)?;
        let modernbert_config: Config = serde_json::from_value(raw_config.clone())?;
        let config: ModelConfig = serde_json::from_value(raw_config)?;
        dir.pop();

        dir.push("model.safetensors");
        let tensors = candle_core::safetensors::load(&dir, device)?;
        dir.pop();

        let parameters = tensors.values().cloned().collect();
        let model_builder = VarBuilder::from_tensors(tensors, DType::F32, device);
        let model = ModernBertForSequenceClassification::load(model_builder, &modernbert_config)?;

        log::info!(
            "loaded ModernBERT classifier from {} (vocab {}, {} positions)",
            dir.display(),
            config.vocab_size,
            config.max_position_embeddings
        );
        Ok(Self {
            model,
            config,
            pad_token_id: modernbert_config.pad_token_id,
            parameters,
            device: device.clone(),
        })
    }

    pub fn pad_token_id(&self) -> u32 {
        self.pad_token_id
    }
}

impl SequenceClassifier for ModernBertClassifier {
    fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn device(&self) -> &Device {
        &self.device
    }

    fn forward(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        Ok(self.model.forward(input_ids, attention_mask)?)
    }

    fn parameters(&self) -> Vec<Tensor> {
        self.parameters.clone()
    }
}
