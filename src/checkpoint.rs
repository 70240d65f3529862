//! Persistence of trained weights and training records.
//!
//! Weight files are written per trait dimension (`<dir>/<code>_model`);
//! the aggregate training record covers the most recently trained
//! dimension. Both use a stable binary encoding; saving over an existing
//! file replaces it.

use crate::dimension::Dimension;
use crate::lstm::LstmClassifier;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Training outcome for one dimension: the best observed test accuracy and
/// the full per-epoch metric histories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainRecord {
    /// Best test accuracy seen across all epochs
    pub best_acc: f64,
    /// Per-epoch average training loss
    pub losses: Vec<f64>,
    /// Per-epoch training accuracy
    pub train_accs: Vec<f64>,
    /// Per-epoch test accuracy
    pub test_accs: Vec<f64>,
    /// 1-based position of the trained dimension in the type string
    pub personality_char: usize,
    /// The dimension's two pole letters (label 0, label 1)
    pub letters: (char, char),
}

impl TrainRecord {
    /// Write the record to `<dir>/<file>`, replacing any previous one.
    pub fn save(&self, dir: &str, file: &str) -> Result<(), Box<dyn Error>> {
        std::fs::create_dir_all(dir)?;
        let path = Path::new(dir).join(file);
        let writer = BufWriter::new(File::create(&path)?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Read a record back from `<dir>/<file>`.
    pub fn load(dir: &str, file: &str) -> Result<Self, Box<dyn Error>> {
        let path = Path::new(dir).join(file);
        let reader = BufReader::new(
            File::open(&path).map_err(|e| format!("cannot open record {:?}: {}", path, e))?,
        );
        let record = bincode::deserialize_from(reader)?;
        Ok(record)
    }

    /// Write a human-readable JSON copy next to the binary artifacts.
    pub fn save_summary(&self, dir: &str, dimension: Dimension) -> Result<(), Box<dyn Error>> {
        std::fs::create_dir_all(dir)?;
        let path = Path::new(dir).join(format!("{}_metrics.json", dimension.code()));
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Path of the weight file for one dimension.
pub fn weights_path(dir: &str, dimension: Dimension) -> PathBuf {
    Path::new(dir).join(format!("{}_model", dimension.code()))
}

/// Serialize the classifier's parameters to the dimension's weight file.
pub fn save_weights(
    dir: &str,
    dimension: Dimension,
    model: &LstmClassifier,
) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(dir)?;
    let path = weights_path(dir, dimension);
    let writer = BufWriter::new(File::create(&path)?);
    bincode::serialize_into(writer, model)?;
    println!("Saved model weights to {:?}", path);
    Ok(())
}

/// Rebuild a classifier from the dimension's weight file.
///
/// A missing or unreadable file is an error; prediction cannot proceed
/// without trained weights.
pub fn load_weights(dir: &str, dimension: Dimension) -> Result<LstmClassifier, Box<dyn Error>> {
    let path = weights_path(dir, dimension);
    let reader = BufReader::new(
        File::open(&path)
            .map_err(|e| format!("cannot open weights for {} at {:?}: {}", dimension, path, e))?,
    );
    let model = bincode::deserialize_from(reader)?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn temp_dir(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!("mbti_lstm_{}_{}", std::process::id(), name));
        dir.to_str().unwrap().to_string()
    }

    #[test]
    fn test_record_round_trip() {
        let dir = temp_dir("record");
        let record = TrainRecord {
            best_acc: 0.85,
            losses: vec![0.7, 0.5, 0.4],
            train_accs: vec![0.5, 0.6, 0.7],
            test_accs: vec![0.55, 0.65, 0.85],
            personality_char: 1,
            letters: ('I', 'E'),
        };
        record.save(&dir, "lstm_save").unwrap();
        let loaded = TrainRecord::load(&dir, "lstm_save").unwrap();
        assert_eq!(record, loaded);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_overwrites() {
        let dir = temp_dir("overwrite");
        let mut record = TrainRecord {
            best_acc: 0.1,
            losses: vec![],
            train_accs: vec![],
            test_accs: vec![],
            personality_char: 2,
            letters: ('N', 'S'),
        };
        record.save(&dir, "lstm_save").unwrap();
        record.best_acc = 0.9;
        record.save(&dir, "lstm_save").unwrap();
        assert_eq!(TrainRecord::load(&dir, "lstm_save").unwrap().best_acc, 0.9);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_weights_round_trip() {
        let dir = temp_dir("weights");
        let mut rng = StdRng::seed_from_u64(21);
        let model = LstmClassifier::new(4, 8, 2, &mut rng);
        save_weights(&dir, Dimension::Tf, &model).unwrap();
        let loaded = load_weights(&dir, Dimension::Tf).unwrap();

        let seq = vec![Array1::from(vec![0.1, -0.2, 0.3, -0.4])];
        assert_eq!(model.forward(&seq), loaded.forward(&seq));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_weights_is_error() {
        let dir = temp_dir("missing");
        assert!(load_weights(&dir, Dimension::Jp).is_err());
    }
}
