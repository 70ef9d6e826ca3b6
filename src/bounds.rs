#![allow(clippy::module_name_repetitions)]
use crate::NNFloat;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::Axis;
use ndarray::Zip;
use ndarray::{iter::Lanes, stack, Ix1};
use rand::distributions::Distribution;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element-wise box of valid inputs, stored as a `(2, n)` array of lower and upper rows.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Bounds1 {
    data: Array2<NNFloat>,
}

impl Bounds1 {
    /// # Panics
    /// If `lower` and `upper` differ in length
    pub fn new<'a>(lower: ArrayView1<'a, NNFloat>, upper: ArrayView1<'a, NNFloat>) -> Self {
        let data = stack(Axis(0), &[lower, upper]).unwrap();
        debug_assert!(Zip::from(&lower).and(&upper).all(|l, u| l <= u));
        Self { data }
    }

    /// The same `[lower, upper]` interval for every one of `ndim` elements
    pub fn uniform(ndim: usize, lower: NNFloat, upper: NNFloat) -> Self {
        Self::new(
            Array1::from_elem(ndim, lower).view(),
            Array1::from_elem(ndim, upper).view(),
        )
    }

    pub fn lower(&self) -> ArrayView1<NNFloat> {
        self.data.index_axis(Axis(0), 0)
    }

    pub fn upper(&self) -> ArrayView1<NNFloat> {
        self.data.index_axis(Axis(0), 1)
    }

    pub fn ndim(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn bounds_iter(&self) -> Lanes<NNFloat, Ix1> {
        self.data.lanes(Axis(0))
    }

    /// Project `x` onto the box
    pub fn clamp(&self, x: ArrayView1<NNFloat>) -> Array1<NNFloat> {
        debug_assert_eq!(x.len(), self.ndim());
        Zip::from(x)
            .and(self.bounds_iter())
            .map_collect(|&x, b| x.max(b[0]).min(b[1]))
    }

    pub fn is_member(&self, x: &ArrayView1<NNFloat>) -> bool {
        let eps = 1e-9;
        Zip::from(x)
            .and(self.bounds_iter())
            .all(|&x, bounds| bounds[0] - eps <= x && x <= bounds[1] + eps)
    }

    pub fn sample_uniform(&self, seed: u64) -> Array1<NNFloat> {
        let mut rng = StdRng::seed_from_u64(seed);
        Zip::from(self.bounds_iter())
            .map_collect(|x| Uniform::new_inclusive(x[0], x[1]).sample(&mut rng))
    }
}

impl fmt::Display for Bounds1 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Lower: {}\nUpper: {}", self.lower(), self.upper())
    }
}
