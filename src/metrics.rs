//! Closed registry of classification metrics.
//!
//! Every metric shares the [`ScoreFn`] signature so the evaluator can treat
//! them uniformly once an identifier has been resolved.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// How per-label scores are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Average {
    /// Pool true/false positives over all labels before dividing.
    #[default]
    Micro,
    /// Unweighted mean of per-label scores.
    Macro,
}

pub type ScoreFn = fn(&[String], &[String], Average) -> f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Accuracy,
    Precision,
    Recall,
    F1,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Self::Accuracy, Self::Precision, Self::Recall, Self::F1];

    pub fn name(self) -> &'static str {
        match self {
            Self::Accuracy => "accuracy",
            Self::Precision => "precision",
            Self::Recall => "recall",
            Self::F1 => "f1",
        }
    }

    pub fn scorer(self) -> ScoreFn {
        match self {
            Self::Accuracy => accuracy,
            Self::Precision => precision,
            Self::Recall => recall,
            Self::F1 => f1,
        }
    }

    pub fn compute(self, references: &[String], predictions: &[String], average: Average) -> Result<f64> {
        if references.len() != predictions.len() {
            return Err(Error::LengthMismatch {
                references: references.len(),
                predictions: predictions.len(),
            });
        }
        Ok((self.scorer())(references, predictions, average))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| Error::UnknownMetric(s.to_string()))
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

fn label_counts<'a>(
    references: &'a [String],
    predictions: &'a [String],
) -> BTreeMap<&'a str, Counts> {
    let labels: BTreeSet<&str> = references
        .iter()
        .chain(predictions)
        .map(|l| l.trim())
        .collect();
    let mut counts: BTreeMap<&str, Counts> =
        labels.into_iter().map(|l| (l, Counts::default())).collect();

    for (r, p) in references.iter().zip(predictions) {
        let (r, p) = (r.trim(), p.trim());
        if r == p {
            if let Some(c) = counts.get_mut(r) {
                c.tp += 1;
            }
        } else {
            if let Some(c) = counts.get_mut(p) {
                c.fp += 1;
            }
            if let Some(c) = counts.get_mut(r) {
                c.fn_ += 1;
            }
        }
    }
    counts
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn averaged(
    references: &[String],
    predictions: &[String],
    average: Average,
    score: impl Fn(Counts) -> f64,
) -> f64 {
    let counts = label_counts(references, predictions);
    match average {
        Average::Micro => {
            let pooled = counts.values().fold(Counts::default(), |acc, c| Counts {
                tp: acc.tp + c.tp,
                fp: acc.fp + c.fp,
                fn_: acc.fn_ + c.fn_,
            });
            score(pooled)
        }
        Average::Macro => {
            if counts.is_empty() {
                return 0.0;
            }
            counts.values().map(|c| score(*c)).sum::<f64>() / counts.len() as f64
        }
    }
}

fn accuracy(references: &[String], predictions: &[String], _average: Average) -> f64 {
    let correct = references
        .iter()
        .zip(predictions)
        .filter(|(r, p)| r.trim() == p.trim())
        .count();
    ratio(correct, references.len())
}

fn precision(references: &[String], predictions: &[String], average: Average) -> f64 {
    averaged(references, predictions, average, |c| ratio(c.tp, c.tp + c.fp))
}

fn recall(references: &[String], predictions: &[String], average: Average) -> f64 {
    averaged(references, predictions, average, |c| ratio(c.tp, c.tp + c.fn_))
}

fn f1(references: &[String], predictions: &[String], average: Average) -> f64 {
    averaged(references, predictions, average, |c| {
        ratio(2 * c.tp, 2 * c.tp + c.fp + c.fn_)
    })
}
