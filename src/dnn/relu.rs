use crate::dnn::layer::Layer;
use crate::tensorshape::TensorShape;
use crate::NNFloat;
use ndarray::Array1;
use ndarray::Zip;
use num::Zero;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ReLU {
    ndims: usize,
}

impl ReLU {
    pub const fn new(ndims: usize) -> Self {
        Self { ndims }
    }
}

impl Display for ReLU {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "ReLU")
    }
}

#[typetag::serde]
impl Layer for ReLU {
    fn input_shape(&self) -> TensorShape {
        TensorShape::new(vec![Some(self.ndims)])
    }

    fn output_shape(&self) -> TensorShape {
        TensorShape::new(vec![Some(self.ndims)])
    }

    fn forward1(&self, input: &Array1<NNFloat>) -> Array1<NNFloat> {
        input.mapv(|x| if x.lt(&0.) { 0. } else { x })
    }

    fn backward1(
        &self,
        input: &Array1<NNFloat>,
        _output: &Array1<NNFloat>,
        output_grad: &Array1<NNFloat>,
    ) -> Array1<NNFloat> {
        // Subgradient 0 at the kink
        Zip::from(input)
            .and(output_grad)
            .map_collect(|&x, &g| if x > NNFloat::zero() { g } else { 0. })
    }
}
