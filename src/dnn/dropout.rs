use crate::dnn::layer::Layer;
use crate::tensorshape::TensorShape;
use crate::NNFloat;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dropout as seen by a frozen network: the identity.
///
/// `prob` is only carried so that descriptions exported from training round-trip.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Dropout {
    ndims: usize,
    prob: NNFloat,
}

impl Dropout {
    pub const fn new(ndims: usize, prob: NNFloat) -> Self {
        Self { ndims, prob }
    }

    pub const fn prob(&self) -> NNFloat {
        self.prob
    }
}

#[typetag::serde]
impl Layer for Dropout {
    fn input_shape(&self) -> TensorShape {
        TensorShape::new(vec![Some(self.ndims)])
    }

    fn output_shape(&self) -> TensorShape {
        TensorShape::new(vec![Some(self.ndims)])
    }

    fn validate(&self) -> Result<(), String> {
        if (0. ..=1.).contains(&self.prob) {
            Ok(())
        } else {
            Err(format!("dropout probability {} is outside [0, 1]", self.prob))
        }
    }

    fn forward1(&self, input: &Array1<NNFloat>) -> Array1<NNFloat> {
        input.clone()
    }

    fn backward1(
        &self,
        _input: &Array1<NNFloat>,
        _output: &Array1<NNFloat>,
        output_grad: &Array1<NNFloat>,
    ) -> Array1<NNFloat> {
        output_grad.clone()
    }
}

impl fmt::Display for Dropout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Dropout {}", self.prob)
    }
}
