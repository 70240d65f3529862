//! Configuration structures for the LSTM trait classifier.
//!
//! Strongly-typed configuration loaded from `config.toml`, covering data
//! paths, model hyperparameters, training settings, the embedding model
//! location, and output paths.

use serde::Deserialize;
use std::error::Error;

/// Main configuration structure loaded from `config.toml`.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Data loading configuration
    pub data: DataConfig,
    /// Model hyperparameters
    pub model: ModelConfig,
    /// Training settings
    pub training: TrainingConfig,
    /// Word embedding model location
    pub embeddings: EmbeddingsConfig,
    /// Output paths configuration
    pub output: OutputConfig,
}

/// Data loading configuration.
#[derive(Debug, Deserialize)]
pub struct DataConfig {
    /// Path to the CSV dataset file
    pub csv_path: String,
    /// Train/test split ratio (e.g., 0.8 = 80% train, 20% test)
    pub train_split: f64,
}

/// Model hyperparameters.
#[derive(Debug, Deserialize)]
pub struct ModelConfig {
    /// Width of the word embedding vectors fed to the classifier
    pub feature_size: usize,
    /// Learning rate for the Adam optimizer
    pub learning_rate: f64,
}

/// Training settings.
#[derive(Debug, Deserialize)]
pub struct TrainingConfig {
    /// Number of training epochs
    pub epochs: usize,
    /// Examples processed per epoch (drawn from the front of each shuffle)
    pub batch_size: usize,
    /// Seed for the run's random source
    pub seed: u64,
    /// Device flag; the training algorithm is identical either way
    pub use_cuda: bool,
}

/// Word embedding model location.
#[derive(Debug, Deserialize)]
pub struct EmbeddingsConfig {
    /// Path to the word2vec text-format vectors
    pub model_path: String,
}

/// Output paths configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Directory for weight files and training records
    pub model_dir: String,
    /// Filename of the aggregate training record
    pub record_file: String,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    /// Default configuration used when `config.toml` is not available.
    fn default() -> Self {
        Config {
            data: DataConfig {
                csv_path: "data/mbti_1.csv".to_string(),
                train_split: 0.8,
            },
            model: ModelConfig {
                feature_size: 100,
                learning_rate: 1e-4,
            },
            training: TrainingConfig {
                epochs: 50,
                batch_size: 500,
                seed: 1,
                use_cuda: false,
            },
            embeddings: EmbeddingsConfig {
                model_path: "models/word2vec.txt".to_string(),
            },
            output: OutputConfig {
                model_dir: "saves".to_string(),
                record_file: "lstm_save".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.training.epochs, 50);
        assert_eq!(config.data.train_split, 0.8);
        assert!(!config.training.use_cuda);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [data]
            csv_path = "data/mbti_1.csv"
            train_split = 0.8

            [model]
            feature_size = 50
            learning_rate = 0.0001

            [training]
            epochs = 10
            batch_size = 32
            seed = 7
            use_cuda = false

            [embeddings]
            model_path = "models/vectors.txt"

            [output]
            model_dir = "saves"
            record_file = "lstm_save"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.feature_size, 50);
        assert_eq!(config.training.seed, 7);
        assert_eq!(config.output.record_file, "lstm_save");
    }
}
