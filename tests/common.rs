#![allow(dead_code)]
use fgsm_rs::dataset::{Dataset, LabeledSample};
use fgsm_rs::dnn::{Conv, Dense, Layer, LogSoftmax, MaxPool, ReLU, DNN};
use fgsm_rs::tensorshape::TensorShape;
use ndarray::{Array1, Array2, Array4};

pub const SIDE: usize = 6;

/// Conv -> MaxPool -> ReLU -> Dense -> LogSoftmax network telling vertical
/// bars (class 0) from horizontal bars (class 1) on 6x6 single channel images.
pub fn bar_detector() -> DNN {
    // Channel 0 responds to a bright center column, channel 1 to a bright center row
    let kernel = Array4::from_shape_fn((3, 3, 1, 2), |(y, x, _, f)| {
        let center = if f == 0 { x == 1 } else { y == 1 };
        if center {
            2. / 3.
        } else {
            -1. / 3.
        }
    });
    // Class score is the pooled response of its channel; flat layout is (y, x, c)
    let readout = Array2::from_shape_fn((2, 8), |(class, idx)| {
        if idx % 2 == class {
            1.
        } else {
            0.
        }
    });
    let layers: Vec<Box<dyn Layer>> = vec![
        Box::new(Conv::new(
            kernel,
            Array1::zeros(2),
            TensorShape::from(vec![SIDE, SIDE, 1]),
            (1, 1),
            ((0, 0), (0, 0)),
        )),
        Box::new(MaxPool::new(TensorShape::from(vec![4, 4, 2]), 2)),
        Box::new(ReLU::new(8)),
        Box::new(Dense::from_parts(readout, Array1::zeros(2))),
        Box::new(LogSoftmax::new(2)),
    ];
    DNN::new(layers).unwrap()
}

pub fn bar_image(vertical: bool, position: usize, bar: f64, background: f64) -> Array1<f64> {
    Array1::from_shape_fn(SIDE * SIDE, |idx| {
        let (y, x) = (idx / SIDE, idx % SIDE);
        let on_bar = if vertical { x == position } else { y == position };
        if on_bar {
            bar
        } else {
            background
        }
    })
}

/// High and low contrast bars in both orientations, plus one mislabeled sample
pub fn bar_dataset() -> Dataset {
    let mut samples = vec![];
    for position in 1..SIDE - 1 {
        samples.push(LabeledSample::new(bar_image(true, position, 1., 0.1), 0));
        samples.push(LabeledSample::new(bar_image(false, position, 1., 0.1), 1));
        samples.push(LabeledSample::new(bar_image(true, position, 0.35, 0.2), 0));
        samples.push(LabeledSample::new(bar_image(false, position, 0.35, 0.2), 1));
    }
    samples.push(LabeledSample::new(bar_image(true, 2, 1., 0.1), 1));
    Dataset::new(samples)
}
