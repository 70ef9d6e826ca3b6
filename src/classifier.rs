//! The frozen-model seam the attack is written against
use crate::NNFloat;
use ndarray::{Array1, ArrayView1};

/// A frozen classifier producing per-class log-probabilities, able to pull a
/// gradient on its output back to its input.
///
/// Parameters never change, so an implementation must not accumulate gradient
/// state between calls: `input_gradient` depends only on the trace it is given.
pub trait Classifier {
    /// Whatever the forward pass needs to remember for the backward pass
    type Trace;

    fn input_dims(&self) -> usize;
    fn num_classes(&self) -> usize;

    /// Returns the log-probabilities for `input` and the trace that produced them.
    fn forward_trace(&self, input: &Array1<NNFloat>) -> (Array1<NNFloat>, Self::Trace);

    /// Gradient w.r.t. the input of the traced forward pass, given the
    /// gradient w.r.t. its output.
    fn input_gradient(&self, trace: &Self::Trace, output_grad: ArrayView1<NNFloat>)
        -> Array1<NNFloat>;

    fn forward(&self, input: &Array1<NNFloat>) -> Array1<NNFloat> {
        self.forward_trace(input).0
    }
}
