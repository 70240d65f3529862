//! Held-out evaluation and accuracy computation.

use crate::data::LabeledExample;
use crate::lstm::{argmax, LstmClassifier};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Fraction of positions where `pred` matches `truth`.
///
/// The two collections must be the same length; a mismatch is fatal.
pub fn accuracy(truth: &[usize], pred: &[usize]) -> f64 {
    assert_eq!(
        truth.len(),
        pred.len(),
        "truth and prediction collections differ in length"
    );
    let right = truth.iter().zip(pred.iter()).filter(|(t, p)| t == p).count();
    right as f64 / truth.len() as f64
}

/// Evaluate the classifier on held-out data.
///
/// Shuffles the collection and scores `batch_size` examples from the front
/// (a fixed-size subsample, matching the training loop's policy). The
/// hidden state resets for every example; the forward pass never tracks
/// gradients, so no mode switch is needed.
pub fn evaluate(
    model: &LstmClassifier,
    data: &mut [LabeledExample],
    batch_size: usize,
    rng: &mut StdRng,
) -> f64 {
    data.shuffle(rng);

    let mut truth = Vec::new();
    let mut pred = Vec::new();
    for example in data.iter().take(batch_size) {
        let log_probs = model.forward(&example.sequence);
        truth.push(example.label);
        pred.push(argmax(&log_probs));
    }

    accuracy(&truth, &pred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;
    use rand::SeedableRng;

    #[test]
    fn test_accuracy_formula() {
        assert_eq!(accuracy(&[0, 1, 0, 1], &[0, 1, 1, 1]), 0.75);
    }

    #[test]
    fn test_accuracy_identity() {
        let labels = [1, 0, 1, 1, 0];
        assert_eq!(accuracy(&labels, &labels), 1.0);
    }

    #[test]
    fn test_accuracy_range() {
        let acc = accuracy(&[0, 0, 1], &[1, 1, 0]);
        assert!((0.0..=1.0).contains(&acc));
        assert_eq!(acc, 0.0);
    }

    #[test]
    #[should_panic(expected = "differ in length")]
    fn test_accuracy_length_mismatch_is_fatal() {
        accuracy(&[0, 1], &[0]);
    }

    #[test]
    fn test_evaluate_subsamples_from_front() {
        let mut rng = StdRng::seed_from_u64(9);
        let model = LstmClassifier::new(2, 4, 2, &mut rng);
        let mut data: Vec<LabeledExample> = (0..10)
            .map(|i| LabeledExample {
                sequence: vec![Array1::from(vec![i as f64 * 0.1, 0.2])],
                label: i % 2,
            })
            .collect();
        let acc = evaluate(&model, &mut data, 4, &mut rng);
        assert!((0.0..=1.0).contains(&acc));

        // batch_size larger than the collection scores everything
        let acc_all = evaluate(&model, &mut data, 100, &mut rng);
        assert!((0.0..=1.0).contains(&acc_all));
    }
}
