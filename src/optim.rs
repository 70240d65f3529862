//! Adam optimizer over the classifier parameters.

use crate::lstm::{Gradients, LstmClassifier};
use ndarray::{Array, Dimension, Zip};

/// Adam with per-parameter first and second moment estimates.
pub struct Adam {
    lr: f64,
    beta1: f64,
    beta2: f64,
    eps: f64,
    t: usize,
    m: Gradients,
    v: Gradients,
}

impl Adam {
    /// Optimizer with zeroed moments matching the model's shapes.
    pub fn new(model: &LstmClassifier, lr: f64) -> Self {
        Adam {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            t: 0,
            m: Gradients::zeros(model),
            v: Gradients::zeros(model),
        }
    }

    /// Apply one update step from the given gradients.
    pub fn step(&mut self, model: &mut LstmClassifier, grads: &Gradients) {
        self.t += 1;
        let bc1 = 1.0 - self.beta1.powi(self.t as i32);
        let bc2 = 1.0 - self.beta2.powi(self.t as i32);

        update(
            &mut model.w_ih, &mut self.m.w_ih, &mut self.v.w_ih, &grads.w_ih,
            self.lr, self.beta1, self.beta2, self.eps, bc1, bc2,
        );
        update(
            &mut model.w_hh, &mut self.m.w_hh, &mut self.v.w_hh, &grads.w_hh,
            self.lr, self.beta1, self.beta2, self.eps, bc1, bc2,
        );
        update(
            &mut model.b_ih, &mut self.m.b_ih, &mut self.v.b_ih, &grads.b_ih,
            self.lr, self.beta1, self.beta2, self.eps, bc1, bc2,
        );
        update(
            &mut model.b_hh, &mut self.m.b_hh, &mut self.v.b_hh, &grads.b_hh,
            self.lr, self.beta1, self.beta2, self.eps, bc1, bc2,
        );
        update(
            &mut model.w_out, &mut self.m.w_out, &mut self.v.w_out, &grads.w_out,
            self.lr, self.beta1, self.beta2, self.eps, bc1, bc2,
        );
        update(
            &mut model.b_out, &mut self.m.b_out, &mut self.v.b_out, &grads.b_out,
            self.lr, self.beta1, self.beta2, self.eps, bc1, bc2,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn update<D: Dimension>(
    param: &mut Array<f64, D>,
    m: &mut Array<f64, D>,
    v: &mut Array<f64, D>,
    grad: &Array<f64, D>,
    lr: f64,
    beta1: f64,
    beta2: f64,
    eps: f64,
    bc1: f64,
    bc2: f64,
) {
    Zip::from(param)
        .and(m)
        .and(v)
        .and(grad)
        .for_each(|p, m, v, &g| {
            *m = beta1 * *m + (1.0 - beta1) * g;
            *v = beta2 * *v + (1.0 - beta2) * g * g;
            let m_hat = *m / bc1;
            let v_hat = *v / bc2;
            *p -= lr * m_hat / (v_hat.sqrt() + eps);
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_step_reduces_loss() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut model = LstmClassifier::new(2, 4, 2, &mut rng);
        let mut adam = Adam::new(&model, 0.01);
        let seq = vec![Array1::from(vec![0.5, -0.5]), Array1::from(vec![1.0, 0.0])];
        let label = 0;

        let before = -model.forward(&seq)[label];
        for _ in 0..50 {
            let cache = model.forward_cache(&seq);
            let grads = model.backward(&seq, &cache, label);
            adam.step(&mut model, &grads);
        }
        let after = -model.forward(&seq)[label];
        assert!(after < before, "loss should fall: {} -> {}", before, after);
    }
}
