use serde::Deserialize;

/// Model-independent view of a `config.json`, the fields the pipeline needs
/// to characterize any sequence classifier.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ModelConfig {
    pub vocab_size: usize,
    pub max_position_embeddings: usize,
    /// Generation length limit carried by the config. Reported as-is; it is
    /// not derived from `max_position_embeddings`.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_max_length() -> usize {
    20
}
