//! Training loop for one trait dimension.

use crate::checkpoint::{save_weights, TrainRecord};
use crate::config::Config;
use crate::data::{split_dataset, LabeledExample};
use crate::dimension::Dimension;
use crate::evaluate::{accuracy, evaluate};
use crate::lstm::{argmax, LstmClassifier};
use crate::optim::Adam;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::error::Error;

/// Recurrent hidden width, fixed across all dimensions.
pub const HIDDEN_DIM: usize = 128;

/// Binary labels per dimension.
pub const LABEL_SIZE: usize = 2;

/// Per-epoch metric accumulator, folded by the training driver.
#[derive(Debug, Default)]
pub struct TrainingHistory {
    /// Best test accuracy seen so far
    pub best_acc: f64,
    /// Per-epoch average training loss
    pub losses: Vec<f64>,
    /// Per-epoch training accuracy
    pub train_accs: Vec<f64>,
    /// Per-epoch test accuracy
    pub test_accs: Vec<f64>,
}

impl TrainingHistory {
    pub fn new() -> Self {
        TrainingHistory::default()
    }

    /// Fold one epoch's metrics into the history.
    pub fn record(&mut self, loss: f64, train_acc: f64, test_acc: f64) {
        self.losses.push(loss);
        self.train_accs.push(train_acc);
        self.test_accs.push(test_acc);
        if test_acc >= self.best_acc {
            self.best_acc = test_acc;
        }
    }

    /// Finish the history into a persistable record for the dimension.
    pub fn into_record(self, dimension: Dimension) -> TrainRecord {
        TrainRecord {
            best_acc: self.best_acc,
            losses: self.losses,
            train_accs: self.train_accs,
            test_accs: self.test_accs,
            personality_char: dimension.index() + 1,
            letters: dimension.letters(),
        }
    }
}

/// Run one training epoch and return `(average loss, accuracy)`.
///
/// Shuffles the collection, then trains on `batch_size` examples from the
/// front — a fixed-size subsample of the train split per epoch, not a full
/// pass. Per example: fresh zero hidden state, forward, cross-entropy loss
/// against the true label, fresh gradients, backpropagation, one Adam step.
///
/// The returned average divides the summed loss by the full collection
/// length rather than the number of examples processed; accuracy covers
/// the processed examples only.
pub fn train_epoch(
    model: &mut LstmClassifier,
    optimizer: &mut Adam,
    data: &mut [LabeledExample],
    batch_size: usize,
    epoch: usize,
    rng: &mut StdRng,
) -> (f64, f64) {
    data.shuffle(rng);

    let mut loss_sum = 0.0;
    let mut count = 0usize;
    let mut truth = Vec::new();
    let mut pred = Vec::new();

    for example in data.iter().take(batch_size) {
        let cache = model.forward_cache(&example.sequence);
        truth.push(example.label);
        pred.push(argmax(&cache.log_probs));

        let loss = -cache.log_probs[example.label];
        loss_sum += loss;

        let grads = model.backward(&example.sequence, &cache, example.label);
        optimizer.step(model, &grads);

        count += 1;
        if count % 100 == 0 {
            println!("\tEpoch: {} Iteration: {} Loss: {:.4}", epoch, count, loss);
        }
    }

    let avg_loss = loss_sum / data.len() as f64;
    let acc = accuracy(&truth, &pred);
    println!(
        "Epoch: {} Avg Loss: {:.4} Acc: {:.2}%",
        epoch,
        avg_loss,
        acc * 100.0
    );
    (avg_loss, acc)
}

/// Train a classifier for one dimension and persist the outcome.
///
/// Splits the dataset 80/20, runs the configured number of epochs (each:
/// train subsample, then held-out evaluation), folds the metrics into a
/// [`TrainingHistory`], and saves the weight file, the aggregate record,
/// and a JSON metrics summary.
pub fn train(
    config: &Config,
    data: Vec<LabeledExample>,
    dimension: Dimension,
    rng: &mut StdRng,
) -> Result<TrainRecord, Box<dyn Error>> {
    let (mut train_data, mut test_data) = split_dataset(data, config.data.train_split, rng);
    println!(
        "{} training samples, {} testing samples",
        train_data.len(),
        test_data.len()
    );

    let mut model = LstmClassifier::new(config.model.feature_size, HIDDEN_DIM, LABEL_SIZE, rng);
    let mut optimizer = Adam::new(&model, config.model.learning_rate);
    let mut history = TrainingHistory::new();

    for epoch in 0..config.training.epochs {
        println!("Epoch: {}", epoch);
        let (loss, train_acc) = train_epoch(
            &mut model,
            &mut optimizer,
            &mut train_data,
            config.training.batch_size,
            epoch,
            rng,
        );

        let test_acc = evaluate(&model, &mut test_data, config.training.batch_size, rng);
        println!("Test Acc: {:.2}%\n", test_acc * 100.0);

        history.record(loss, train_acc, test_acc);
    }

    println!("Best Acc: {:.2}%", history.best_acc * 100.0);

    save_weights(&config.output.model_dir, dimension, &model)?;
    let record = history.into_record(dimension);
    record.save(&config.output.model_dir, &config.output.record_file)?;
    record.save_summary(&config.output.model_dir, dimension)?;

    Ok(record)
}
