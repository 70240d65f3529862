//! # mbti-lstm — per-dimension MBTI classification with an LSTM
//!
//! Trains, per personality-trait dimension, a binary classifier over
//! sequences of pre-computed word2vec embeddings, and later labels free
//! text with the trained weights.
//!
//! Each of the four MBTI dimensions (I/E, N/S, T/F, J/P) is an independent
//! binary problem: a single-layer LSTM reads the text's embedding sequence
//! and a linear projection with log-softmax produces a 2-way label
//! distribution. Trained weights and per-epoch metrics are checkpointed
//! per dimension; a full prediction concatenates the four decoded letters.
//!
//! ## Training
//!
//! ```bash
//! mbti-lstm train --dimension ei
//! ```
//!
//! ## Prediction
//!
//! ```bash
//! mbti-lstm predict "I love solving complex problems"
//! # Prediction is INTJ
//! ```
//!
//! ## As a library
//!
//! ```no_run
//! use mbti_lstm::{build_dataset, load_data, train, Config, Dimension, WordVectors};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let mut rng = StdRng::seed_from_u64(config.training.seed);
//!
//!     let records = load_data(&config.data.csv_path)?;
//!     let vectors = WordVectors::load(&config.embeddings.model_path)?;
//!     let data = build_dataset(&records, &vectors, Dimension::Ei);
//!
//!     let record = train(&config, data, Dimension::Ei, &mut rng)?;
//!     println!("Best accuracy: {:.2}%", record.best_acc * 100.0);
//!     Ok(())
//! }
//! ```
//!
//! The random source is an explicit [`rand::rngs::StdRng`] handle threaded
//! through dataset preparation, training, and evaluation — reproducibility
//! depends only on the seed and the input order, never on ambient state.

pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod data;
pub mod dimension;
pub mod embedding;
pub mod evaluate;
pub mod lstm;
pub mod optim;
pub mod predict;
pub mod preprocess;
pub mod train;

pub use checkpoint::TrainRecord;
pub use config::Config;
pub use data::{build_dataset, split_dataset, LabeledExample};
pub use dimension::Dimension;
pub use embedding::WordVectors;
pub use lstm::LstmClassifier;
pub use predict::{predict, predict_personality, PipelineError};
pub use train::train;

use csv::ReaderBuilder;
use serde::Deserialize;
use std::error::Error;
use std::fs::File;

/// MBTI record structure from the training data CSV.
#[derive(Debug, Deserialize, Clone)]
pub struct MbtiRecord {
    /// MBTI personality type (e.g., "INTJ", "ENFP")
    #[serde(rename = "type")]
    pub mbti_type: String,

    /// User's posts/text content
    pub posts: String,
}

/// Load MBTI records from a CSV file with `type,posts` columns.
pub fn load_data(path: &str) -> Result<Vec<MbtiRecord>, Box<dyn Error>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: MbtiRecord = result?;
        records.push(record);
    }

    Ok(records)
}
