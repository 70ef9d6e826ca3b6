use crate::dnn::layer::Layer;
use crate::tensorshape::TensorShape;
use crate::NNFloat;
use itertools::Itertools;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-overlapping square max pooling over flattened (H, W, C) data.
/// Trailing rows and columns that do not fill a window are dropped.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct MaxPool {
    input_shape: TensorShape, // (H, W, C)
    pool_size: usize,
}

impl MaxPool {
    /// # Panics
    /// If `input_shape` is not a fully defined (H, W, C) shape, or the window
    /// is empty or larger than the image
    pub fn new(input_shape: TensorShape, pool_size: usize) -> Self {
        let pool = Self {
            input_shape,
            pool_size,
        };
        if let Err(reason) = pool.validate() {
            panic!("invalid max pool: {}", reason);
        }
        pool
    }

    pub const fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Flat input index of the maximum of each output window. Ties go to the
    /// first element in row-major window order.
    fn argmax_idxs(&self, input: &Array1<NNFloat>) -> Vec<usize> {
        let w_in = self.input_shape[1].unwrap_or(0);
        let c = self.input_shape[2].unwrap_or(0);
        let out = self.output_shape();
        let h_out = out[0].unwrap_or(0);
        let w_out = out[1].unwrap_or(0);
        let p = self.pool_size;

        (0..h_out)
            .cartesian_product(0..w_out)
            .cartesian_product(0..c)
            .map(|((y_out, x_out), f)| {
                (0..p)
                    .cartesian_product(0..p)
                    .map(|(dy, dx)| (y_out * p + dy) * (w_in * c) + (x_out * p + dx) * c + f)
                    .fold(None, |best: Option<usize>, idx| match best {
                        Some(b) if input[b] >= input[idx] => Some(b),
                        _ => Some(idx),
                    })
                    .unwrap_or(0)
            })
            .collect()
    }
}

#[typetag::serde]
impl Layer for MaxPool {
    fn input_shape(&self) -> TensorShape {
        self.input_shape.clone()
    }

    fn validate(&self) -> Result<(), String> {
        if self.input_shape.rank() != 3 || !self.input_shape.is_fully_defined() {
            return Err(format!(
                "input shape {} is not a fully defined (H, W, C)",
                self.input_shape
            ));
        }
        let h = self.input_shape[0].unwrap_or(0);
        let w = self.input_shape[1].unwrap_or(0);
        if self.pool_size == 0 || self.pool_size > h || self.pool_size > w {
            return Err(format!(
                "{}x{} window does not fit the {}x{} input",
                self.pool_size, self.pool_size, h, w
            ));
        }
        Ok(())
    }

    fn output_shape(&self) -> TensorShape {
        TensorShape::from(vec![
            self.input_shape[0].unwrap_or(0) / self.pool_size,
            self.input_shape[1].unwrap_or(0) / self.pool_size,
            self.input_shape[2].unwrap_or(0),
        ])
    }

    fn forward1(&self, input: &Array1<NNFloat>) -> Array1<NNFloat> {
        debug_assert_eq!(input.len(), self.input_dims());
        self.argmax_idxs(input)
            .into_iter()
            .map(|idx| input[idx])
            .collect()
    }

    fn backward1(
        &self,
        input: &Array1<NNFloat>,
        _output: &Array1<NNFloat>,
        output_grad: &Array1<NNFloat>,
    ) -> Array1<NNFloat> {
        let mut input_grad = Array1::zeros(input.len());
        self.argmax_idxs(input)
            .into_iter()
            .zip(output_grad.iter())
            .for_each(|(idx, &g)| input_grad[idx] += g);
        input_grad
    }
}

impl fmt::Display for MaxPool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MaxPool {}x{}", self.pool_size, self.pool_size)
    }
}
