mod common;

use candle_core::Device;
use common::{table, CharTokenizer, ParityClassifier};
use toxic_classifier_eval::{Error, InferencePipeline, PredictionRecord, Sample, SampleDataset};

fn pipeline(
    dataset: &SampleDataset,
    batch_size: usize,
) -> InferencePipeline<'_, ParityClassifier, CharTokenizer> {
    InferencePipeline::new(
        ParityClassifier::new(&Device::Cpu),
        CharTokenizer::default(),
        dataset,
        32,
        batch_size,
        Device::Cpu,
    )
    .unwrap()
}

#[test]
fn four_rows_in_two_batches() {
    let dataset = SampleDataset::new(&table(&["a", "b", "c", "d"], &[0, 1, 0, 1]));
    let pipeline = pipeline(&dataset, 2);

    let predictions = pipeline.infer_dataset().unwrap();

    assert_eq!(
        *pipeline.tokenizer().batches.borrow(),
        vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string(), "d".to_string()]]
    );
    let expected: Vec<PredictionRecord> = [(0, "0"), (1, "1"), (0, "0"), (1, "1")]
        .into_iter()
        .map(|(target, prediction)| PredictionRecord {
            target,
            prediction: prediction.to_string(),
        })
        .collect();
    assert_eq!(predictions.records(), expected.as_slice());
}

#[test]
fn batch_size_does_not_change_predictions() {
    let sources = [
        "you are great",
        "shut up",
        "b",
        "what a lovely day",
        "idiot",
        "",
        "ddd",
        "thanks for the help",
        "go away now",
        "x",
    ];
    let targets = [0, 1, 0, 0, 1, 0, 1, 0, 1, 0];
    let dataset = SampleDataset::new(&table(&sources, &targets));

    let reference = pipeline(&dataset, dataset.len()).infer_dataset().unwrap();
    assert_eq!(reference.len(), dataset.len());
    for batch_size in [1, 7] {
        let pipeline = pipeline(&dataset, batch_size);
        assert_eq!(pipeline.infer_dataset().unwrap(), reference);
        let sizes: Vec<usize> = pipeline
            .tokenizer()
            .batches
            .borrow()
            .iter()
            .map(Vec::len)
            .collect();
        let expected = if batch_size == 1 { vec![1; 10] } else { vec![7, 3] };
        assert_eq!(sizes, expected);
    }
}

#[test]
fn infer_sample_matches_dataset_row() {
    let dataset = SampleDataset::new(&table(&["shut up", "hello", "bbb", "ok"], &[1, 0, 1, 0]));
    let pipeline = pipeline(&dataset, 3);
    let table = pipeline.infer_dataset().unwrap();
    for (i, record) in table.records().iter().enumerate() {
        let sample = dataset.sample_at(i).unwrap();
        assert_eq!(pipeline.infer_sample(&sample).unwrap(), record.prediction);
    }
}

#[test]
fn targets_come_from_the_dataset() {
    let dataset = SampleDataset::new(&table(&["a", "b", "c"], &[1, 1, 0]));
    let predictions = pipeline(&dataset, 2).infer_dataset().unwrap();
    let targets: Vec<u8> = predictions.records().iter().map(|r| r.target).collect();
    assert_eq!(targets, [1, 1, 0]);
}

#[test]
fn empty_dataset_yields_empty_table() {
    let dataset = SampleDataset::new(&table(&[], &[]));
    let pipeline = pipeline(&dataset, 4);
    assert!(pipeline.infer_dataset().unwrap().is_empty());
    assert!(pipeline.tokenizer().batches.borrow().is_empty());
}

#[test]
fn truncation_respects_max_length() {
    let dataset = SampleDataset::new(&table(&["bbbbbbbbaaaaaaaaaaaa"], &[1]));
    let long = pipeline(&dataset, 1);
    // all twenty characters: twelve even ids outvote eight odd ones
    assert_eq!(long.infer_sample(&Sample("bbbbbbbbaaaaaaaaaaaa".into())).unwrap(), "0");

    let short = InferencePipeline::new(
        ParityClassifier::new(&Device::Cpu),
        CharTokenizer::default(),
        &dataset,
        5,
        1,
        Device::Cpu,
    )
    .unwrap();
    // [CLS] plus the first four characters, all odd
    assert_eq!(short.infer_sample(&Sample("bbbbbbbbaaaaaaaaaaaa".into())).unwrap(), "1");
}

#[test]
fn analyze_model_reports_shapes_and_sizes() {
    let dataset = SampleDataset::new(&table(&["a"], &[0]));
    let properties = pipeline(&dataset, 1).analyze_model().unwrap();

    assert_eq!(properties.vocab_size, 8);
    assert_eq!(properties.embedding_size, 16);
    assert_eq!(properties.max_context_length, 20);
    assert_eq!(properties.input_shape["input_ids"], [1, 16]);
    assert_eq!(properties.input_shape["attention_mask"], [1, 16]);
    assert_eq!(properties.output_shape, [1, 2]);
    assert_eq!(properties.num_trainable_params, 8 * 2 + 2 * 2 + 2);
    assert_eq!(properties.size, properties.num_trainable_params * 4);
}

#[test]
fn zero_batch_size_is_rejected() {
    let dataset = SampleDataset::new(&table(&["a"], &[0]));
    let err = InferencePipeline::new(
        ParityClassifier::new(&Device::Cpu),
        CharTokenizer::default(),
        &dataset,
        8,
        0,
        Device::Cpu,
    )
    .err()
    .unwrap();
    assert!(matches!(err, Error::InvalidParameter { name: "batch_size", .. }));
}
