use crate::dnn::layer::Layer;
use crate::tensorshape::TensorShape;
use crate::NNFloat;
use ndarray::Array1;
use ndarray::Zip;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Turns class scores into log-probabilities: `x_i - log(sum_j exp(x_j))`
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LogSoftmax {
    ndims: usize,
}

impl LogSoftmax {
    pub const fn new(ndims: usize) -> Self {
        Self { ndims }
    }
}

#[typetag::serde]
impl Layer for LogSoftmax {
    fn input_shape(&self) -> TensorShape {
        TensorShape::new(vec![Some(self.ndims)])
    }

    fn output_shape(&self) -> TensorShape {
        TensorShape::new(vec![Some(self.ndims)])
    }

    fn forward1(&self, input: &Array1<NNFloat>) -> Array1<NNFloat> {
        let max = input.fold(NNFloat::NEG_INFINITY, |acc, &x| acc.max(x));
        let log_sum_exp = max + input.mapv(|x| (x - max).exp()).sum().ln();
        input.mapv(|x| x - log_sum_exp)
    }

    fn backward1(
        &self,
        _input: &Array1<NNFloat>,
        output: &Array1<NNFloat>,
        output_grad: &Array1<NNFloat>,
    ) -> Array1<NNFloat> {
        let grad_sum = output_grad.sum();
        Zip::from(output)
            .and(output_grad)
            .map_collect(|&log_p, &g| g - log_p.exp() * grad_sum)
    }
}

impl fmt::Display for LogSoftmax {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LogSoftmax")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_log_softmax_stable_for_large_scores() {
        let layer = LogSoftmax::new(3);
        let out = layer.forward1(&Array1::from_vec(vec![1000., 1000., 1000.]));
        for &x in out.iter() {
            assert_abs_diff_eq!(x, -(3f64.ln()), epsilon = 1e-12);
        }
    }

    proptest! {
        #[test]
        fn test_log_softmax_normalizes(x in array1(6)) {
            let out = LogSoftmax::new(6).forward1(&x);
            let total: f64 = out.mapv(f64::exp).sum();
            prop_assert!((total - 1.).abs() < 1e-9);
        }

        #[test]
        fn test_log_softmax_backward_matches_finite_difference(x in array1(5), w in array1(5)) {
            let layer = LogSoftmax::new(5);
            let out = layer.forward1(&x);
            let analytic = layer.backward1(&x, &out, &w);
            let numeric = numeric_input_gradient(|v| layer.forward1(v), &x, &w);
            prop_assert!(max_abs_diff(&analytic, &numeric) <= 1e-4);
        }
    }
}
