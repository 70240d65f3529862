//! The recurrent sequence classifier.
//!
//! A single-layer LSTM (gate order i/f/g/o) followed by a linear projection
//! to two outputs and a log-softmax. The classifier maps a variable-length
//! sequence of embedding vectors to a 2-element log-probability
//! distribution over binary labels.
//!
//! The hidden state is rebuilt from zeros inside every forward pass: the
//! model is recurrent within one sequence but carries no memory across
//! calls. That is a contract, not an artifact — callers may invoke the
//! classifier on independent examples in any order.

use ndarray::{s, Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// LSTM classifier parameters. Mutated only by the optimizer during
/// training; frozen once checkpointed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LstmClassifier {
    /// Width of the input embedding vectors
    pub input_dim: usize,
    /// Width of the recurrent hidden state
    pub hidden_dim: usize,
    /// Number of output labels (2 for binary traits)
    pub label_size: usize,
    /// Input-to-gate weights, shape (4 * hidden, input)
    pub w_ih: Array2<f64>,
    /// Hidden-to-gate weights, shape (4 * hidden, hidden)
    pub w_hh: Array2<f64>,
    /// Input-side gate biases, length 4 * hidden
    pub b_ih: Array1<f64>,
    /// Hidden-side gate biases, length 4 * hidden
    pub b_hh: Array1<f64>,
    /// Projection weights, shape (labels, hidden)
    pub w_out: Array2<f64>,
    /// Projection bias, length labels
    pub b_out: Array1<f64>,
}

/// Per-parameter gradients, same shapes as [`LstmClassifier`].
#[derive(Debug, Clone)]
pub struct Gradients {
    pub w_ih: Array2<f64>,
    pub w_hh: Array2<f64>,
    pub b_ih: Array1<f64>,
    pub b_hh: Array1<f64>,
    pub w_out: Array2<f64>,
    pub b_out: Array1<f64>,
}

impl Gradients {
    /// Zeroed gradients matching the model's parameter shapes.
    pub fn zeros(model: &LstmClassifier) -> Self {
        let gate_rows = 4 * model.hidden_dim;
        Gradients {
            w_ih: Array2::zeros((gate_rows, model.input_dim)),
            w_hh: Array2::zeros((gate_rows, model.hidden_dim)),
            b_ih: Array1::zeros(gate_rows),
            b_hh: Array1::zeros(gate_rows),
            w_out: Array2::zeros((model.label_size, model.hidden_dim)),
            b_out: Array1::zeros(model.label_size),
        }
    }
}

/// Activations recorded at one timestep, kept for backpropagation.
struct StepCache {
    i: Array1<f64>,
    f: Array1<f64>,
    g: Array1<f64>,
    o: Array1<f64>,
    c: Array1<f64>,
    tanh_c: Array1<f64>,
    h: Array1<f64>,
}

/// Full forward-pass record for one sequence.
pub struct ForwardCache {
    steps: Vec<StepCache>,
    /// The 2-element log-probability output of the pass
    pub log_probs: Array1<f64>,
}

impl LstmClassifier {
    /// Build a fresh classifier with Xavier-initialized parameters.
    pub fn new(input_dim: usize, hidden_dim: usize, label_size: usize, rng: &mut StdRng) -> Self {
        let gate_rows = 4 * hidden_dim;
        let ih_limit = (6.0 / (gate_rows + input_dim) as f64).sqrt();
        let hh_limit = (6.0 / (gate_rows + hidden_dim) as f64).sqrt();
        let out_limit = (6.0 / (label_size + hidden_dim) as f64).sqrt();

        LstmClassifier {
            input_dim,
            hidden_dim,
            label_size,
            w_ih: uniform_matrix(gate_rows, input_dim, ih_limit, rng),
            w_hh: uniform_matrix(gate_rows, hidden_dim, hh_limit, rng),
            b_ih: uniform_vector(gate_rows, ih_limit, rng),
            b_hh: uniform_vector(gate_rows, hh_limit, rng),
            w_out: uniform_matrix(label_size, hidden_dim, out_limit, rng),
            b_out: uniform_vector(label_size, out_limit, rng),
        }
    }

    /// Run the sequence through the LSTM and return log-probabilities.
    ///
    /// The hidden state starts at zero for every call. The sequence must be
    /// non-empty and every vector must be `input_dim` wide; violations are
    /// fatal.
    pub fn forward(&self, sequence: &[Array1<f64>]) -> Array1<f64> {
        self.check_sequence(sequence);
        let mut h = Array1::zeros(self.hidden_dim);
        let mut c: Array1<f64> = Array1::zeros(self.hidden_dim);

        for x in sequence {
            let (i, f, g, o) = self.gates(x, &h);
            c = &f * &c + &i * &g;
            let tanh_c = c.mapv(f64::tanh);
            h = &o * &tanh_c;
        }

        let logits = self.w_out.dot(&h) + &self.b_out;
        log_softmax(&logits)
    }

    /// Forward pass that records per-step activations for backpropagation.
    pub fn forward_cache(&self, sequence: &[Array1<f64>]) -> ForwardCache {
        self.check_sequence(sequence);
        let mut h = Array1::zeros(self.hidden_dim);
        let mut c: Array1<f64> = Array1::zeros(self.hidden_dim);
        let mut steps = Vec::with_capacity(sequence.len());

        for x in sequence {
            let (i, f, g, o) = self.gates(x, &h);
            c = &f * &c + &i * &g;
            let tanh_c = c.mapv(f64::tanh);
            h = &o * &tanh_c;
            steps.push(StepCache {
                i,
                f,
                g,
                o,
                c: c.clone(),
                tanh_c,
                h: h.clone(),
            });
        }

        let logits = self.w_out.dot(&h) + &self.b_out;
        ForwardCache {
            steps,
            log_probs: log_softmax(&logits),
        }
    }

    /// Backpropagate the cross-entropy loss for `label` through the cached
    /// pass, returning fresh gradients for every parameter.
    pub fn backward(
        &self,
        sequence: &[Array1<f64>],
        cache: &ForwardCache,
        label: usize,
    ) -> Gradients {
        assert!(label < self.label_size, "label out of range: {}", label);
        let steps = &cache.steps;
        let last = steps.len() - 1;
        let mut grads = Gradients::zeros(self);

        // d loss / d logits for cross-entropy: softmax - onehot
        let mut dlogits = cache.log_probs.mapv(f64::exp);
        dlogits[label] -= 1.0;

        grads.w_out += &outer(&dlogits, &steps[last].h);
        grads.b_out += &dlogits;

        let mut dh = self.w_out.t().dot(&dlogits);
        let mut dc: Array1<f64> = Array1::zeros(self.hidden_dim);

        for t in (0..steps.len()).rev() {
            let step = &steps[t];
            let (h_prev, c_prev) = if t == 0 {
                (Array1::zeros(self.hidden_dim), Array1::zeros(self.hidden_dim))
            } else {
                (steps[t - 1].h.clone(), steps[t - 1].c.clone())
            };

            let d_o = &dh * &step.tanh_c;
            dc = dc + &dh * &step.o * step.tanh_c.mapv(|v| 1.0 - v * v);

            let d_i = &dc * &step.g;
            let d_f = &dc * &c_prev;
            let d_g = &dc * &step.i;

            let d_i_pre = d_i * step.i.mapv(|v| v * (1.0 - v));
            let d_f_pre = d_f * step.f.mapv(|v| v * (1.0 - v));
            let d_g_pre = d_g * step.g.mapv(|v| 1.0 - v * v);
            let d_o_pre = d_o * step.o.mapv(|v| v * (1.0 - v));

            let hd = self.hidden_dim;
            let mut dgates: Array1<f64> = Array1::zeros(4 * hd);
            dgates.slice_mut(s![0..hd]).assign(&d_i_pre);
            dgates.slice_mut(s![hd..2 * hd]).assign(&d_f_pre);
            dgates.slice_mut(s![2 * hd..3 * hd]).assign(&d_g_pre);
            dgates.slice_mut(s![3 * hd..4 * hd]).assign(&d_o_pre);

            grads.w_ih += &outer(&dgates, &sequence[t]);
            grads.w_hh += &outer(&dgates, &h_prev);
            grads.b_ih += &dgates;
            grads.b_hh += &dgates;

            dh = self.w_hh.t().dot(&dgates);
            dc = dc * &step.f;
        }

        grads
    }

    /// Gate activations for one timestep.
    fn gates(
        &self,
        x: &Array1<f64>,
        h: &Array1<f64>,
    ) -> (Array1<f64>, Array1<f64>, Array1<f64>, Array1<f64>) {
        let pre = self.w_ih.dot(x) + &self.b_ih + self.w_hh.dot(h) + &self.b_hh;
        let hd = self.hidden_dim;
        let i = pre.slice(s![0..hd]).mapv(sigmoid);
        let f = pre.slice(s![hd..2 * hd]).mapv(sigmoid);
        let g = pre.slice(s![2 * hd..3 * hd]).mapv(f64::tanh);
        let o = pre.slice(s![3 * hd..4 * hd]).mapv(sigmoid);
        (i, f, g, o)
    }

    fn check_sequence(&self, sequence: &[Array1<f64>]) {
        assert!(
            !sequence.is_empty(),
            "the sequence classifier requires at least one embedding vector"
        );
        for v in sequence {
            assert_eq!(
                v.len(),
                self.input_dim,
                "embedding width {} does not match the model feature size {}",
                v.len(),
                self.input_dim
            );
        }
    }
}

/// Numerically stable log-softmax.
pub fn log_softmax(logits: &Array1<f64>) -> Array1<f64> {
    let max = logits.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let log_sum = logits.mapv(|v| (v - max).exp()).sum().ln() + max;
    logits.mapv(|v| v - log_sum)
}

/// Index of the largest element.
pub fn argmax(values: &Array1<f64>) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn outer(a: &Array1<f64>, b: &Array1<f64>) -> Array2<f64> {
    let a = a.view().insert_axis(Axis(1));
    let b = b.view().insert_axis(Axis(0));
    a.dot(&b)
}

fn uniform_matrix(rows: usize, cols: usize, limit: f64, rng: &mut StdRng) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-limit..limit))
}

fn uniform_vector(len: usize, limit: f64, rng: &mut StdRng) -> Array1<f64> {
    Array1::from_shape_fn(len, |_| rng.gen_range(-limit..limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sample_sequence(len: usize, dim: usize) -> Vec<Array1<f64>> {
        (0..len)
            .map(|t| Array1::from_shape_fn(dim, |j| ((t * dim + j) as f64 * 0.3).sin()))
            .collect()
    }

    #[test]
    fn test_log_probs_normalize() {
        let mut rng = StdRng::seed_from_u64(1);
        let model = LstmClassifier::new(4, 8, 2, &mut rng);
        let log_probs = model.forward(&sample_sequence(3, 4));
        assert_eq!(log_probs.len(), 2);
        let sum: f64 = log_probs.mapv(f64::exp).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_cross_call_memory() {
        let mut rng = StdRng::seed_from_u64(2);
        let model = LstmClassifier::new(4, 8, 2, &mut rng);
        let seq = sample_sequence(5, 4);
        let first = model.forward(&seq);
        let second = model.forward(&seq);
        assert_eq!(first, second);
    }

    #[test]
    #[should_panic(expected = "feature size")]
    fn test_wrong_width_is_fatal() {
        let mut rng = StdRng::seed_from_u64(3);
        let model = LstmClassifier::new(4, 8, 2, &mut rng);
        model.forward(&[Array1::zeros(3)]);
    }

    #[test]
    #[should_panic(expected = "at least one")]
    fn test_empty_sequence_is_fatal() {
        let mut rng = StdRng::seed_from_u64(4);
        let model = LstmClassifier::new(4, 8, 2, &mut rng);
        model.forward(&[]);
    }

    /// Flat mutable view of one parameter for perturbation.
    fn param_slice(model: &mut LstmClassifier, which: usize) -> &mut [f64] {
        match which {
            0 => model.w_ih.as_slice_mut().unwrap(),
            1 => model.w_hh.as_slice_mut().unwrap(),
            2 => model.b_ih.as_slice_mut().unwrap(),
            3 => model.b_hh.as_slice_mut().unwrap(),
            4 => model.w_out.as_slice_mut().unwrap(),
            _ => model.b_out.as_slice_mut().unwrap(),
        }
    }

    fn grad_at(grads: &Gradients, which: usize, idx: usize) -> f64 {
        match which {
            0 => grads.w_ih.as_slice().unwrap()[idx],
            1 => grads.w_hh.as_slice().unwrap()[idx],
            2 => grads.b_ih.as_slice().unwrap()[idx],
            3 => grads.b_hh.as_slice().unwrap()[idx],
            4 => grads.w_out.as_slice().unwrap()[idx],
            _ => grads.b_out.as_slice().unwrap()[idx],
        }
    }

    #[test]
    fn test_gradients_match_finite_differences() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut model = LstmClassifier::new(2, 3, 2, &mut rng);
        let seq = sample_sequence(3, 2);
        let label = 1;

        let cache = model.forward_cache(&seq);
        let grads = model.backward(&seq, &cache, label);

        let eps = 1e-5;
        // (parameter, flat index) probes across every weight and bias
        let probes = [(0, 9), (1, 20), (2, 10), (3, 3), (4, 5), (5, 0)];
        for (which, idx) in probes {
            let original = param_slice(&mut model, which)[idx];

            param_slice(&mut model, which)[idx] = original + eps;
            let plus = -model.forward(&seq)[label];
            param_slice(&mut model, which)[idx] = original - eps;
            let minus = -model.forward(&seq)[label];
            param_slice(&mut model, which)[idx] = original;

            let numeric = (plus - minus) / (2.0 * eps);
            let analytic = grad_at(&grads, which, idx);
            assert!(
                (numeric - analytic).abs() < 1e-6,
                "param {} index {}: numeric {} vs analytic {}",
                which,
                idx,
                numeric,
                analytic
            );
        }
    }
}
