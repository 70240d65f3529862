//! Labeled example construction and train/test splitting.
//!
//! A labeled example pairs an ordered sequence of word embedding vectors
//! (one per in-vocabulary token) with a binary label for one trait
//! dimension. Examples are built once and never mutated; only their order
//! is shuffled.

use crate::dimension::Dimension;
use crate::embedding::WordVectors;
use crate::preprocess::tokenize;
use crate::MbtiRecord;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// One training example: an embedding sequence and its binary label.
#[derive(Debug, Clone)]
pub struct LabeledExample {
    /// Embedding vectors in token order
    pub sequence: Vec<Array1<f64>>,
    /// Binary label (0 or 1) for the dimension the dataset was built for
    pub label: usize,
}

/// Build the labeled dataset for one trait dimension.
///
/// Each record's posts are tokenized and looked up in the embedding store;
/// out-of-vocabulary tokens are silently skipped. The label is the position
/// of the record's letter for the dimension. Records with an unparseable
/// type or with no in-vocabulary tokens are dropped.
pub fn build_dataset(
    records: &[MbtiRecord],
    vectors: &WordVectors,
    dimension: Dimension,
) -> Vec<LabeledExample> {
    let mut examples = Vec::new();
    for record in records {
        let label = match dimension.label_in_type(&record.mbti_type) {
            Some(label) => label,
            None => continue,
        };
        let sequence: Vec<Array1<f64>> = tokenize(&record.posts)
            .iter()
            .filter_map(|token| vectors.lookup(token).cloned())
            .collect();
        if sequence.is_empty() {
            continue;
        }
        examples.push(LabeledExample { sequence, label });
    }
    examples
}

/// Shuffle the dataset and split it at the `train_split` boundary.
///
/// For a fixed RNG state and input order the split is reproducible. No
/// example is shared between the two halves.
pub fn split_dataset(
    mut data: Vec<LabeledExample>,
    train_split: f64,
    rng: &mut StdRng,
) -> (Vec<LabeledExample>, Vec<LabeledExample>) {
    data.shuffle(rng);
    let boundary = (data.len() as f64 * train_split) as usize;
    let test = data.split_off(boundary);
    (data, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sample_vectors() -> WordVectors {
        let mut vectors = WordVectors::new(2);
        vectors.insert("alpha", vec![1.0, 0.0]).unwrap();
        vectors.insert("beta", vec![0.0, 1.0]).unwrap();
        vectors
    }

    fn sample_examples(n: usize) -> Vec<LabeledExample> {
        (0..n)
            .map(|i| LabeledExample {
                sequence: vec![Array1::from(vec![i as f64, 0.0])],
                label: i % 2,
            })
            .collect()
    }

    #[test]
    fn test_build_dataset_labels_and_oov() {
        let records = vec![
            MbtiRecord {
                mbti_type: "INTJ".to_string(),
                posts: "alpha unknown beta".to_string(),
            },
            MbtiRecord {
                mbti_type: "ENFP".to_string(),
                posts: "beta".to_string(),
            },
            // every token out of vocabulary: dropped
            MbtiRecord {
                mbti_type: "INTP".to_string(),
                posts: "gamma delta".to_string(),
            },
        ];
        let vectors = sample_vectors();
        let data = build_dataset(&records, &vectors, Dimension::Ei);
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].sequence.len(), 2); // "unknown" skipped, order kept
        assert_eq!(data[0].label, 0);
        assert_eq!(data[1].label, 1);
    }

    #[test]
    fn test_split_proportions_and_disjointness() {
        let mut rng = StdRng::seed_from_u64(3);
        let (train, test) = split_dataset(sample_examples(10), 0.8, &mut rng);
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        // Sequences carry unique leading components, so overlap is visible.
        let train_ids: Vec<f64> = train.iter().map(|e| e.sequence[0][0]).collect();
        for example in &test {
            assert!(!train_ids.contains(&example.sequence[0][0]));
        }
    }

    #[test]
    fn test_split_is_reproducible() {
        let order = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let (train, _) = split_dataset(sample_examples(10), 0.8, &mut rng);
            train.iter().map(|e| e.sequence[0][0]).collect::<Vec<_>>()
        };
        assert_eq!(order(5), order(5));
    }
}
