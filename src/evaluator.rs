use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::metrics::{Average, Metric};
use crate::predictions::PredictionTable;

/// Metric name to score.
pub type MetricScores = BTreeMap<String, f64>;

/// Scores a persisted prediction table against the requested metrics.
pub struct TaskEvaluator {
    data_path: PathBuf,
    metrics: Vec<Metric>,
}

impl TaskEvaluator {
    /// Resolves every metric identifier up front, so an unknown name fails
    /// before anything is read or scored.
    pub fn new<P, I, S>(data_path: P, metrics: I) -> Result<Self>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let metrics = metrics
            .into_iter()
            .map(|m| m.as_ref().parse::<Metric>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            data_path: data_path.as_ref().to_path_buf(),
            metrics,
        })
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn run(&self) -> Result<MetricScores> {
        let table = PredictionTable::read_csv(&self.data_path)?;
        if table.is_empty() {
            return Err(Error::EmptyPredictions(self.data_path.clone()));
        }
        let references = table.targets();
        let predictions = table.predictions();

        let mut scores = MetricScores::new();
        for metric in &self.metrics {
            let score = metric.compute(&references, &predictions, Average::Micro)?;
            log::info!("{metric}: {score:.4}");
            scores.insert(metric.name().to_string(), score);
        }
        Ok(scores)
    }
}
