//! Prediction pipeline: raw text to trait letters.
//!
//! Tokens absent from the embedding vocabulary are silently skipped — a
//! named policy, not an error. Input whose every token is out of
//! vocabulary cannot be classified and surfaces [`PipelineError::EmptyEmbedding`]
//! before the classifier is invoked.

use crate::checkpoint::load_weights;
use crate::config::Config;
use crate::dimension::Dimension;
use crate::embedding::WordVectors;
use crate::lstm::{argmax, LstmClassifier};
use crate::preprocess::tokenize;
use ndarray::Array1;
use std::error::Error;
use thiserror::Error as ThisError;

/// Contract violations of the prediction pipeline.
#[derive(Debug, ThisError)]
pub enum PipelineError {
    /// Every token of the input was out of vocabulary.
    #[error("no token of the input text exists in the embedding vocabulary")]
    EmptyEmbedding,
    /// The embedding store width differs from the model's feature size.
    #[error("embedding width {found} does not match the model feature size {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Turn raw text into an ordered embedding sequence.
///
/// Out-of-vocabulary tokens are dropped; the surviving vectors keep their
/// original order. All-out-of-vocabulary input is an error.
pub fn embed_text(text: &str, vectors: &WordVectors) -> Result<Vec<Array1<f64>>, PipelineError> {
    let sequence: Vec<Array1<f64>> = tokenize(text)
        .iter()
        .filter_map(|token| vectors.lookup(token).cloned())
        .collect();
    if sequence.is_empty() {
        return Err(PipelineError::EmptyEmbedding);
    }
    Ok(sequence)
}

/// Predict the trait letter for one dimension.
///
/// Uses the supplied classifier, or loads the dimension's weights from the
/// checkpoint store when none is given. The whole text runs through the
/// classifier as one sequence; the argmax label decodes to the dimension's
/// pole letter.
pub fn predict(
    config: &Config,
    vectors: &WordVectors,
    text: &str,
    dimension: Dimension,
    model: Option<&LstmClassifier>,
) -> Result<char, Box<dyn Error>> {
    let loaded;
    let model = match model {
        Some(model) => model,
        None => {
            loaded = load_weights(&config.output.model_dir, dimension)?;
            &loaded
        }
    };

    if vectors.dim() != model.input_dim {
        return Err(PipelineError::DimensionMismatch {
            expected: model.input_dim,
            found: vectors.dim(),
        }
        .into());
    }

    let sequence = embed_text(text, vectors)?;
    let log_probs = model.forward(&sequence);
    let label = argmax(&log_probs);
    Ok(dimension.letter_for(label))
}

/// Predict all four dimensions and concatenate the letters.
///
/// The embedding store is loaded once and shared across the dimensions;
/// each dimension's classifier comes from its own checkpoint.
pub fn predict_personality(config: &Config, text: &str) -> Result<String, Box<dyn Error>> {
    let vectors = WordVectors::load(&config.embeddings.model_path)?;

    let mut personality = String::with_capacity(4);
    for dimension in Dimension::ALL {
        personality.push(predict(config, &vectors, text, dimension, None)?);
    }
    Ok(personality)
}
