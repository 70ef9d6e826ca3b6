//! Negative log-likelihood over log-probabilities, and the prediction rule
use crate::error::FgsmError;
use crate::NNFloat;
use ndarray::{Array1, ArrayView1};
use ndarray_stats::QuantileExt;

/// `-log_probs[label]`
pub fn nll_loss(log_probs: ArrayView1<NNFloat>, label: usize) -> NNFloat {
    -log_probs[label]
}

/// Gradient of [`nll_loss`] w.r.t. `log_probs`: `-1` at `label`, zero elsewhere.
pub fn nll_loss_grad(log_probs: ArrayView1<NNFloat>, label: usize) -> Array1<NNFloat> {
    debug_assert!(label < log_probs.len());
    let mut grad = Array1::zeros(log_probs.len());
    grad[label] = -1.;
    grad
}

/// Index of the largest class score.
///
/// # Errors
/// `FgsmError::Prediction` if the scores are empty or contain NaN
pub fn predict(scores: ArrayView1<NNFloat>) -> Result<usize, FgsmError> {
    scores.argmax().map_err(|_| FgsmError::Prediction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nll_picks_label() {
        let log_probs = Array1::from_vec(vec![-0.1, -2.5, -4.0]);
        assert!((nll_loss(log_probs.view(), 1) - 2.5).abs() < 1e-12);
        assert_eq!(
            nll_loss_grad(log_probs.view(), 2),
            Array1::from_vec(vec![0., 0., -1.])
        );
    }

    #[test]
    fn test_predict() {
        let scores = Array1::from_vec(vec![-3., -0.2, -1.]);
        assert_eq!(predict(scores.view()).unwrap(), 1);
    }

    #[test]
    fn test_predict_rejects_nan_and_empty() {
        let scores = Array1::from_vec(vec![-3., NNFloat::NAN, -1.]);
        assert!(matches!(predict(scores.view()), Err(FgsmError::Prediction)));
        let empty: Array1<NNFloat> = Array1::zeros(0);
        assert!(matches!(predict(empty.view()), Err(FgsmError::Prediction)));
    }
}
