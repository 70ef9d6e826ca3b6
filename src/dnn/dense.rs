use crate::affine::Affine2;
use crate::dnn::layer::Layer;
use crate::tensorshape::TensorShape;
use crate::NNFloat;
use ndarray::Array1;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Dense {
    aff: Affine2,
}

impl Dense {
    pub const fn new(aff: Affine2) -> Self {
        Self { aff }
    }

    pub fn from_parts(mul: Array2<NNFloat>, add: Array1<NNFloat>) -> Self {
        Self {
            aff: Affine2::new(mul, add),
        }
    }

    pub const fn get_affine(&self) -> &Affine2 {
        &self.aff
    }
}

#[typetag::serde]
impl Layer for Dense {
    fn input_shape(&self) -> TensorShape {
        TensorShape::new(vec![Some(self.aff.input_dim())])
    }

    fn output_shape(&self) -> TensorShape {
        TensorShape::new(vec![Some(self.aff.output_dim())])
    }

    fn validate(&self) -> Result<(), String> {
        let rows = self.aff.basis().nrows();
        if rows == self.aff.shift().len() {
            Ok(())
        } else {
            Err(format!(
                "basis has {} rows but shift has {} elements",
                rows,
                self.aff.shift().len()
            ))
        }
    }

    fn forward1(&self, input: &Array1<NNFloat>) -> Array1<NNFloat> {
        debug_assert_eq!(input.ndim(), 1);
        self.aff.apply(&input.view())
    }

    fn backward1(
        &self,
        _input: &Array1<NNFloat>,
        _output: &Array1<NNFloat>,
        output_grad: &Array1<NNFloat>,
    ) -> Array1<NNFloat> {
        self.aff.apply_transpose(&output_grad.view())
    }
}

impl fmt::Display for Dense {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Dense {}", self.aff.output_dim())
    }
}
