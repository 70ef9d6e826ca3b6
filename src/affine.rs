#![allow(non_snake_case, clippy::module_name_repetitions)]
//! Representation of affine transformations
use crate::NNFloat;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// Affine map data structure. Assumes that the affine is f(x) = Ax + b
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Affine2 {
    basis: Array2<NNFloat>,
    shift: Array1<NNFloat>,
}

impl Display for Affine2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(
            f,
            "Basis {:?} Shift {:?}",
            self.basis.shape(),
            self.shift.shape()
        )
    }
}

impl Affine2 {
    /// # Panics
    /// If improper shapes are passed in
    pub fn new(basis: Array2<NNFloat>, shift: Array1<NNFloat>) -> Self {
        debug_assert_eq!(basis.shape()[0], shift.len());
        Self { basis, shift }
    }

    pub fn identity(ndim: usize) -> Self {
        Self {
            basis: Array2::eye(ndim),
            shift: Array1::zeros(ndim),
        }
    }

    pub fn basis(&self) -> ArrayView2<NNFloat> {
        self.basis.view()
    }

    pub fn shift(&self) -> ArrayView1<NNFloat> {
        self.shift.view()
    }

    pub fn input_dim(&self) -> usize {
        self.basis.shape()[1]
    }

    pub fn output_dim(&self) -> usize {
        self.shift.len()
    }

    pub fn shape(&self) -> &[usize] {
        self.basis.shape()
    }

    pub fn apply(&self, x: &ArrayView1<NNFloat>) -> Array1<NNFloat> {
        debug_assert_eq!(x.len(), self.input_dim());
        self.basis.dot(x) + &self.shift
    }

    /// Pull a cotangent on the output back to the input, i.e. `A^T g`.
    /// The shift does not depend on the input and drops out.
    pub fn apply_transpose(&self, g: &ArrayView1<NNFloat>) -> Array1<NNFloat> {
        debug_assert_eq!(g.len(), self.output_dim());
        self.basis.t().dot(g)
    }
}
