use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use toxic_classifier_eval::model::parse_device;
use toxic_classifier_eval::timing::report_time;
use toxic_classifier_eval::{
    InferencePipeline, RawDataImporter, RawDataPreprocessor, SampleDataset, Settings,
};

/// Classify a labeled toxicity dataset and score the predictions.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to settings.json
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    report_time("main", || run(&cli))
}

fn run(cli: &Cli) -> Result<()> {
    let settings = Settings::load(&cli.settings)
        .with_context(|| format!("reading {}", cli.settings.display()))?;
    let evaluator = settings.evaluator().context("resolving metrics")?;

    let raw_data = report_time("import", || {
        RawDataImporter::new(&settings.parameters.dataset).obtain()
    })
    .context("importing dataset")?;

    let preprocessor = RawDataPreprocessor::new(raw_data, settings.columns.clone());
    let dataset_analysis = preprocessor.analyze().context("analyzing dataset")?;
    println!("{}", serde_json::to_string_pretty(&dataset_analysis)?);

    let normalized = report_time("transform", || preprocessor.transform())
        .context("normalizing dataset")?;
    let normalized = match settings.inference.num_samples {
        Some(n) => normalized.head(n),
        None => normalized,
    };
    let dataset = SampleDataset::new(&normalized);
    if dataset.is_empty() {
        bail!("no samples left after preprocessing");
    }

    let device = parse_device(&settings.inference.device)?;
    let pipeline = InferencePipeline::load(
        &settings.parameters.model,
        &dataset,
        settings.inference.max_length,
        settings.inference.batch_size,
        device,
    )
    .with_context(|| format!("loading model {}", settings.parameters.model.display()))?;

    let model_analysis = pipeline.analyze_model().context("analyzing model")?;
    println!("{}", serde_json::to_string_pretty(&model_analysis)?);

    let sample = dataset.sample_at(0)?;
    let sample_prediction = report_time("infer_sample", || pipeline.infer_sample(&sample))?;
    println!("{sample_prediction}");

    let predictions_path = settings.predictions_path();
    let predictions = report_time("infer_dataset", || pipeline.infer_dataset())?;
    predictions.write_csv(&predictions_path)?;

    let scores = report_time("evaluate", || evaluator.run())?;
    println!("{}", serde_json::to_string_pretty(&scores)?);
    Ok(())
}
