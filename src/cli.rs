//! Command-line interface: train one dimension, or predict a full type.

use crate::config::Config;
use crate::data::build_dataset;
use crate::dimension::Dimension;
use crate::embedding::WordVectors;
use crate::predict::predict_personality;
use crate::train::train;
use crate::load_data;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;
use std::io::Read;

/// Print command-line usage information.
pub fn print_usage() {
    println!("Usage:");
    println!("  mbti-lstm [COMMAND] [OPTIONS]\n");
    println!("Commands:");
    println!("  train              Train one trait dimension (saves to the model dir)");
    println!("  predict [TEXT]     Predict the 4-letter type for TEXT (or stdin)");
    println!("  help               Show this help\n");
    println!("Options:");
    println!("  --dimension CODE   Dimension to train: ei, ns, tf, jp (default: ei)\n");
    println!("Examples:");
    println!("  mbti-lstm train --dimension tf");
    println!("  mbti-lstm predict \"I love solving problems\"");
    println!("  echo \"some text\" | mbti-lstm predict");
}

/// Main entry point; `args` includes the program name.
pub fn run(args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let command = if args.len() > 1 { args[1].as_str() } else { "help" };

    match command {
        "train" => {
            let dimension = parse_dimension(&args)?;
            run_train(dimension)
        }
        "predict" => {
            let text = read_input_text(&args)?;
            let config = load_config();
            let personality = predict_personality(&config, &text)?;
            println!("Prediction is {}", personality);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            println!("Unknown command: {}\n", command);
            print_usage();
            Ok(())
        }
    }
}

/// Train one dimension end to end.
fn run_train(dimension: Dimension) -> Result<(), Box<dyn Error>> {
    let config = load_config();
    let mut rng = StdRng::seed_from_u64(config.training.seed);

    println!("=== LSTM Trait Classifier: Training ===\n");
    println!("Configuration:");
    println!("  Data: {}", config.data.csv_path);
    println!(
        "  Train/Test split: {:.0}%/{:.0}%",
        config.data.train_split * 100.0,
        (1.0 - config.data.train_split) * 100.0
    );
    println!("  Dimension: {}", dimension);
    println!("  Feature size: {}", config.model.feature_size);
    println!("  Learning rate: {}", config.model.learning_rate);
    println!("  Epochs: {}", config.training.epochs);
    println!("  Batch size: {}", config.training.batch_size);
    println!("  Seed: {}", config.training.seed);
    println!(
        "  Device: {}\n",
        if config.training.use_cuda { "cuda" } else { "cpu" }
    );

    println!("Loading dataset...");
    let records = load_data(&config.data.csv_path)?;
    println!("  Loaded {} records", records.len());

    println!("Loading word vectors from {}...", config.embeddings.model_path);
    let vectors = WordVectors::load(&config.embeddings.model_path)?;
    println!("  Vocabulary size: {}\n", vectors.len());

    if vectors.dim() != config.model.feature_size {
        return Err(format!(
            "embedding model width {} does not match the configured feature size {}",
            vectors.dim(),
            config.model.feature_size
        )
        .into());
    }

    let data = build_dataset(&records, &vectors, dimension);
    println!("Built {} labeled examples for {}\n", data.len(), dimension);

    train(&config, data, dimension, &mut rng)?;
    Ok(())
}

/// Load `config.toml`, falling back to defaults with a warning.
fn load_config() -> Config {
    Config::load("config.toml").unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config.toml: {}", e);
        eprintln!("Using default configuration\n");
        Config::default()
    })
}

/// The dimension from `--dimension CODE`, defaulting to the first.
fn parse_dimension(args: &[String]) -> Result<Dimension, Box<dyn Error>> {
    for window in args.windows(2) {
        if window[0] == "--dimension" {
            return Dimension::from_code(&window[1])
                .ok_or_else(|| format!("unknown dimension code: {}", window[1]).into());
        }
    }
    Ok(Dimension::Ei)
}

/// Prediction text from the arguments, or from standard input.
fn read_input_text(args: &[String]) -> Result<String, Box<dyn Error>> {
    if args.len() > 2 {
        return Ok(args[2..].join(" "));
    }
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    if text.trim().is_empty() {
        return Err("no input text given (pass TEXT or pipe it on stdin)".into());
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_dimension_default() {
        assert_eq!(parse_dimension(&args(&["mbti-lstm", "train"])).unwrap(), Dimension::Ei);
    }

    #[test]
    fn test_parse_dimension_flag() {
        assert_eq!(
            parse_dimension(&args(&["mbti-lstm", "train", "--dimension", "jp"])).unwrap(),
            Dimension::Jp
        );
        assert!(parse_dimension(&args(&["mbti-lstm", "train", "--dimension", "zz"])).is_err());
    }

    #[test]
    fn test_text_from_arguments() {
        let text = read_input_text(&args(&["mbti-lstm", "predict", "hello", "world"])).unwrap();
        assert_eq!(text, "hello world");
    }
}
