#![allow(clippy::module_name_repetitions, clippy::similar_names)]
//! Two dimensional convolution over flattened images
use crate::dnn::layer::Layer;
use crate::tensorshape::TensorShape;
use crate::NNFloat;
use itertools::Itertools;
use ndarray::{Array1, Array4};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Assumes that data is always in a flattened state, in (H, W, C) order.
/// Weights are of the shape: (`kernel_h`, `kernel_w`, `channels_in`, `channels_out`)
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Conv {
    kernel: Array4<NNFloat>, // (K_h, K_w, C_in, C_out) following tf convention
    bias: Array1<NNFloat>,   // (C_out)
    input_shape: TensorShape, // (H, W, C_in)
    strides: (usize, usize), // (y, x)
    padding: ((usize, usize), (usize, usize)), // ((top, bottom), (left, right))
}

/// Flat index bookkeeping shared by the forward and backward passes
struct Geometry {
    h_in: usize,
    w_in: usize,
    c_in: usize,
    h_out: usize,
    w_out: usize,
    c_out: usize,
    k_h: usize,
    k_w: usize,
}

impl Conv {
    /// # Panics
    /// If improper shapes are passed in
    pub fn new(
        kernel: Array4<NNFloat>,
        bias: Array1<NNFloat>,
        input_shape: TensorShape,
        strides: (usize, usize),
        padding: ((usize, usize), (usize, usize)),
    ) -> Self {
        let conv = Self {
            kernel,
            bias,
            input_shape,
            strides,
            padding,
        };
        if let Err(reason) = conv.validate() {
            panic!("invalid convolution: {}", reason);
        }
        conv
    }

    pub fn kernel(&self) -> &Array4<NNFloat> {
        &self.kernel
    }

    fn geometry(&self) -> Geometry {
        let out = self.output_shape();
        Geometry {
            h_in: self.input_shape[0].unwrap_or(0),
            w_in: self.input_shape[1].unwrap_or(0),
            c_in: self.input_shape[2].unwrap_or(0),
            h_out: out[0].unwrap_or(0),
            w_out: out[1].unwrap_or(0),
            c_out: out[2].unwrap_or(0),
            k_h: self.kernel.shape()[0],
            k_w: self.kernel.shape()[1],
        }
    }

    /// Visits every (output index, input index, kernel tap) triple that
    /// contributes to the convolution. Taps falling into the zero padding are skipped.
    fn for_each_tap<F>(&self, mut visit: F)
    where
        F: FnMut(usize, usize, NNFloat),
    {
        let g = self.geometry();
        for (y_out, x_out) in (0..g.h_out).cartesian_product(0..g.w_out) {
            let y_0 = y_out * self.strides.0;
            let x_0 = x_out * self.strides.1;

            for k_y in 0..g.k_h {
                if y_0 + k_y < self.padding.0 .0 || y_0 + k_y >= g.h_in + self.padding.0 .0 {
                    continue;
                }
                let y_in = y_0 + k_y - self.padding.0 .0;
                for k_x in 0..g.k_w {
                    if x_0 + k_x < self.padding.1 .0 || x_0 + k_x >= g.w_in + self.padding.1 .0 {
                        continue;
                    }
                    let x_in = x_0 + k_x - self.padding.1 .0;

                    for f_in in 0..g.c_in {
                        let input_idx = y_in * (g.w_in * g.c_in) + x_in * g.c_in + f_in;
                        for f_out in 0..g.c_out {
                            let output_idx = y_out * (g.w_out * g.c_out) + x_out * g.c_out + f_out;
                            visit(output_idx, input_idx, self.kernel[[k_y, k_x, f_in, f_out]]);
                        }
                    }
                }
            }
        }
    }
}

#[typetag::serde]
impl Layer for Conv {
    fn input_shape(&self) -> TensorShape {
        self.input_shape.clone()
    }

    fn validate(&self) -> Result<(), String> {
        let (k_h, k_w, c_in, c_out) = self.kernel.dim();
        if self.bias.len() != c_out {
            return Err(format!(
                "bias has {} elements for {} output channels",
                self.bias.len(),
                c_out
            ));
        }
        if self.input_shape.rank() != 3 || !self.input_shape.is_fully_defined() {
            return Err(format!(
                "input shape {} is not a fully defined (H, W, C)",
                self.input_shape
            ));
        }
        if self.input_shape[2] != Some(c_in) {
            return Err(format!(
                "input shape {} does not have the kernel's {} input channels",
                self.input_shape, c_in
            ));
        }
        if self.strides.0 == 0 || self.strides.1 == 0 {
            return Err("strides must be positive".to_string());
        }
        let h_padded = self.input_shape[0].unwrap_or(0) + self.padding.0 .0 + self.padding.0 .1;
        let w_padded = self.input_shape[1].unwrap_or(0) + self.padding.1 .0 + self.padding.1 .1;
        if k_h == 0 || k_w == 0 || k_h > h_padded || k_w > w_padded {
            return Err(format!(
                "{}x{} kernel does not fit the {}x{} padded input",
                k_h, k_w, h_padded, w_padded
            ));
        }
        Ok(())
    }

    fn output_shape(&self) -> TensorShape {
        let k_h = self.kernel.shape()[0];
        let k_w = self.kernel.shape()[1];
        let h_padded = self.input_shape[0].unwrap_or(0) + self.padding.0 .0 + self.padding.0 .1;
        let w_padded = self.input_shape[1].unwrap_or(0) + self.padding.1 .0 + self.padding.1 .1;
        let h_out = h_padded.saturating_sub(k_h) / self.strides.0 + 1;
        let w_out = w_padded.saturating_sub(k_w) / self.strides.1 + 1;
        TensorShape::from(vec![h_out, w_out, self.kernel.shape()[3]])
    }

    fn forward1(&self, input: &Array1<NNFloat>) -> Array1<NNFloat> {
        debug_assert_eq!(input.len(), self.input_dims());
        let c_out = self.bias.len();
        let mut output = Array1::from_shape_fn(self.output_dims(), |i| self.bias[i % c_out]);
        self.for_each_tap(|output_idx, input_idx, w| {
            output[output_idx] += input[input_idx] * w;
        });
        output
    }

    fn backward1(
        &self,
        _input: &Array1<NNFloat>,
        _output: &Array1<NNFloat>,
        output_grad: &Array1<NNFloat>,
    ) -> Array1<NNFloat> {
        debug_assert_eq!(output_grad.len(), self.output_dims());
        let mut input_grad = Array1::zeros(self.input_dims());
        self.for_each_tap(|output_idx, input_idx, w| {
            input_grad[input_idx] += output_grad[output_idx] * w;
        });
        input_grad
    }
}

impl fmt::Display for Conv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Conv {}x{}, {}",
            self.kernel.shape()[1],
            self.kernel.shape()[0],
            self.kernel.shape()[3]
        )
    }
}
