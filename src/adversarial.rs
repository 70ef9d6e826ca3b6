//! Fast Gradient Sign Method
//!
//! `x_adv = clamp(x + epsilon * sign(d loss / d x))`
use crate::bounds::Bounds1;
use crate::NNFloat;
use ndarray::{Array1, ArrayView1, Zip};

/// Sign of every element: `-1`, `0` or `1`.
///
/// Unlike `f64::signum`, both zeros map to `0`, and so does NaN.
pub fn elementwise_sign(gradient: ArrayView1<NNFloat>) -> Array1<NNFloat> {
    gradient.mapv(|g| {
        if g > 0. {
            1.
        } else if g < 0. {
            -1.
        } else {
            0.
        }
    })
}

/// Steps `sample` by `epsilon` in the direction of the gradient's sign and
/// clamps the result back into `bounds`.
pub fn perturb(
    sample: ArrayView1<NNFloat>,
    epsilon: NNFloat,
    gradient: ArrayView1<NNFloat>,
    bounds: &Bounds1,
) -> Array1<NNFloat> {
    debug_assert_eq!(sample.len(), gradient.len());
    debug_assert!(epsilon >= 0.);
    let stepped = Zip::from(sample)
        .and(&elementwise_sign(gradient))
        .map_collect(|&x, &s| x + epsilon * s);
    bounds.clamp(stepped.view())
}
