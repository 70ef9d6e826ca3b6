#![cfg(test)]
use crate::affine::Affine2;
use crate::bounds::Bounds1;
use crate::dnn::{Dense, Layer, LogSoftmax, ReLU, DNN};
use crate::NNFloat;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::Array3;
use ndarray::Array4;
use ndarray::ArrayView1;
use ndarray::Axis;
use ndarray::Zip;
use proptest::arbitrary::functor::ArbitraryF1;
use proptest::prelude::*;
use proptest::sample::SizeRange;
use std::mem;

prop_compose! {
    pub fn array1(len: usize)(v in Vec::lift1_with(-10. .. 10., SizeRange::new(len..=len))) -> Array1<NNFloat> {
        Array1::from_vec(v)
    }
}

prop_compose! {
    pub fn unit_array1(len: usize)(v in Vec::lift1_with(0. ..=1., SizeRange::new(len..=len))) -> Array1<NNFloat> {
        Array1::from_vec(v)
    }
}

prop_compose! {
    pub fn array2(rows: usize, cols: usize)(v in Vec::lift1_with(array1(cols), SizeRange::new(rows..=rows))) -> Array2<NNFloat> {
        assert!(rows > 0);
        ndarray::stack(Axis(0), &v.iter().map(|x| x.view()).collect::<Vec<ArrayView1<NNFloat>>>()).unwrap()
    }
}

prop_compose! {
    pub fn array3(d0: usize, d1: usize, d2: usize)(v in array1(d0 * d1 * d2)) -> Array3<NNFloat> {
        v.into_shape((d0, d1, d2)).unwrap()
    }
}

prop_compose! {
    pub fn array4(d0: usize, d1: usize, d2: usize, d3: usize)(v in array1(d0 * d1 * d2 * d3)) -> Array4<NNFloat> {
        v.into_shape((d0, d1, d2, d3)).unwrap()
    }
}

prop_compose! {
    pub fn affine2(in_dim: usize, out_dim: usize)(basis in array2(out_dim, in_dim), shift in array1(out_dim)) -> Affine2 {
        Affine2::new(basis, shift)
    }
}

prop_compose! {
    pub fn bounds1(len: usize)(mut lower in array1(len), mut upper in array1(len)) -> Bounds1 {
        Zip::from(&mut lower).and(&mut upper).for_each(|l, u| if *l > *u {mem::swap(l, u)});
        assert!(Zip::from(&lower).and(&upper).all(|l, u| l <= u));
        Bounds1::new(lower.view(), upper.view())
    }
}

prop_compose! {
    /// Fully connected ReLU network ending in a log-softmax over `output_size` classes
    pub fn fc_dnn(input_size: usize, output_size: usize, nlayers: usize, max_layer_width: usize)(repr_sizes in Vec::lift1_with(1..max_layer_width, SizeRange::new(nlayers..=nlayers)).prop_map(move |mut x| {x.insert(0, input_size); x.push(output_size); x}))(affines in {let pairs = repr_sizes.iter().zip(repr_sizes.iter().skip(1)); pairs.map(|(&x, &y)| affine2(x,y)).collect::<Vec<_>>()}) -> DNN {
        let n_affines = affines.len();
        let mut layers: Vec<Box<dyn Layer>> = Vec::with_capacity(2 * n_affines);
        affines.into_iter().enumerate().for_each(|(i, aff)| {
            let output_dim = aff.output_dim();
            layers.push(Box::new(Dense::new(aff)));
            if i + 1 < n_affines {
                layers.push(Box::new(ReLU::new(output_dim)));
            }
        });
        layers.push(Box::new(LogSoftmax::new(output_size)));
        DNN::new(layers).unwrap()
    }
}

/// Central finite-difference estimate of `d sum(w * f(x)) / dx`
pub fn numeric_input_gradient<F>(f: F, x: &Array1<NNFloat>, w: &Array1<NNFloat>) -> Array1<NNFloat>
where
    F: Fn(&Array1<NNFloat>) -> Array1<NNFloat>,
{
    let h = 1e-6;
    Array1::from_shape_fn(x.len(), |i| {
        let mut plus = x.clone();
        plus[i] += h;
        let mut minus = x.clone();
        minus[i] -= h;
        (w.dot(&f(&plus)) - w.dot(&f(&minus))) / (2. * h)
    })
}

/// Largest element-wise absolute difference
pub fn max_abs_diff(a: &Array1<NNFloat>, b: &Array1<NNFloat>) -> NNFloat {
    Zip::from(a)
        .and(b)
        .fold(0., |acc, x, y| NNFloat::max(acc, (x - y).abs()))
}
