use crate::tensorshape::TensorShape;
use crate::NNFloat;
use dyn_clone::DynClone;
use ndarray::Array1;
use std::fmt::{Debug, Display};

/// A frozen layer over flattened data.
///
/// Layers may not be stateful: identical inputs must produce identical outputs,
/// and the backward pass is a pure function of the forward pass's input and
/// output. Nothing accumulates between calls.
#[typetag::serde(tag = "type")]
pub trait Layer: DynClone + Display + Debug + Send + Sync {
    fn input_shape(&self) -> TensorShape;
    fn output_shape(&self) -> TensorShape;

    fn forward1(&self, input: &Array1<NNFloat>) -> Array1<NNFloat>;

    /// Pulls `output_grad` (the gradient of some scalar w.r.t. this layer's
    /// output) back to a gradient w.r.t. this layer's input.
    ///
    /// # Arguments
    ///
    /// * `input` - The input seen on the forward pass.
    /// * `output` - The output `forward1` produced for `input`.
    /// * `output_grad` - Gradient w.r.t. `output`.
    fn backward1(
        &self,
        input: &Array1<NNFloat>,
        output: &Array1<NNFloat>,
        output_grad: &Array1<NNFloat>,
    ) -> Array1<NNFloat>;

    /// Checks the layer's own parameters for consistency. Deserialized layers
    /// skip their constructors, so a network is checked with this on load.
    ///
    /// # Errors
    /// A description of the first inconsistency found
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    fn input_dims(&self) -> usize {
        self.input_shape().dims()
    }

    fn output_dims(&self) -> usize {
        self.output_shape().dims()
    }
}

// This implements `Clone` for the trait
dyn_clone::clone_trait_object!(Layer);
