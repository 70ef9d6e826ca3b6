use crate::classifier::Classifier;
use crate::dnn::layer::Layer;
use crate::error::FgsmError;
use crate::tensorshape::TensorShape;
use crate::NNFloat;
use log::{debug, trace};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

/// A frozen feed-forward network: a chain of layers over flattened data
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DNN {
    layers: Vec<Box<dyn Layer>>,
}

/// Activations recorded by [`DNN::forward_activations`]: the network input
/// followed by the output of every layer.
#[derive(Clone, Debug)]
pub struct Activations {
    values: Vec<Array1<NNFloat>>,
}

impl Activations {
    pub fn input(&self) -> &Array1<NNFloat> {
        &self.values[0]
    }

    /// # Panics
    /// Never for traces built by a `DNN`, which always hold the input
    pub fn output(&self) -> &Array1<NNFloat> {
        self.values.last().unwrap()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl DNN {
    /// # Errors
    /// If there are no layers, a layer is internally inconsistent, or
    /// consecutive layers disagree on the shape passed between them
    pub fn new(layers: Vec<Box<dyn Layer>>) -> Result<Self, FgsmError> {
        let dnn = Self { layers };
        dnn.validate()?;
        Ok(dnn)
    }

    /// # Errors
    /// If the layer is internally inconsistent or its input shape does not
    /// match the current output shape
    pub fn add_layer(&mut self, layer: Box<dyn Layer>) -> Result<(), FgsmError> {
        check_layer(self.layers.len(), layer.as_ref())?;
        if let Some(last) = self.layers.last() {
            check_link(self.layers.len(), &last.output_shape(), &layer.input_shape())?;
        }
        self.layers.push(layer);
        Ok(())
    }

    pub fn get_layer(&self, idx: usize) -> Option<&dyn Layer> {
        self.layers.get(idx).map(Box::as_ref)
    }

    pub fn get_layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// # Errors
    /// `EmptyNetwork`, `InvalidLayer` or `LayerShapeMismatch`
    pub fn validate(&self) -> Result<(), FgsmError> {
        if self.layers.is_empty() {
            return Err(FgsmError::EmptyNetwork);
        }
        self.layers
            .iter()
            .enumerate()
            .try_for_each(|(i, layer)| check_layer(i, layer.as_ref()))?;
        self.layers
            .iter()
            .zip(self.layers.iter().skip(1))
            .enumerate()
            .try_for_each(|(i, (prev, next))| {
                check_link(i + 1, &prev.output_shape(), &next.input_shape())
            })
    }

    /// `None` only for a network deserialized without [`DNN::validate`]
    pub fn input_shape(&self) -> Option<TensorShape> {
        self.layers.first().map(|layer| layer.input_shape())
    }

    pub fn output_shape(&self) -> Option<TensorShape> {
        self.layers.last().map(|layer| layer.output_shape())
    }

    pub fn forward1(&self, input: &Array1<NNFloat>) -> Array1<NNFloat> {
        self.layers
            .iter()
            .fold(input.clone(), |x, layer| layer.forward1(&x))
    }

    pub fn forward_activations(&self, input: &Array1<NNFloat>) -> Activations {
        let mut values = Vec::with_capacity(self.layers.len() + 1);
        values.push(input.clone());
        for (i, layer) in self.layers.iter().enumerate() {
            let next = layer.forward1(&values[i]);
            values.push(next);
        }
        Activations { values }
    }

    /// Pulls `output_grad` back through every layer, last to first.
    pub fn backward_trace(
        &self,
        activations: &Activations,
        output_grad: ArrayView1<NNFloat>,
    ) -> Array1<NNFloat> {
        debug_assert_eq!(activations.len(), self.layers.len() + 1);
        self.layers
            .iter()
            .enumerate()
            .rev()
            .fold(output_grad.to_owned(), |grad, (i, layer)| {
                trace!("backward through layer {} ({})", i, layer);
                layer.backward1(&activations.values[i], &activations.values[i + 1], &grad)
            })
    }
}

impl DNN {
    /// # Errors
    /// On malformed JSON, unknown layer types, or inconsistent layer shapes
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, FgsmError> {
        let dnn: Self = serde_json::from_reader(reader)?;
        dnn.validate()?;
        debug!("loaded network {}", dnn);
        Ok(dnn)
    }

    /// # Errors
    /// See [`DNN::from_json_reader`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FgsmError> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// # Errors
    /// If the file cannot be written
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), FgsmError> {
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }
}

fn check_layer(layer_idx: usize, layer: &dyn Layer) -> Result<(), FgsmError> {
    layer
        .validate()
        .map_err(|reason| FgsmError::InvalidLayer { layer_idx, reason })
}

fn check_link(
    layer_idx: usize,
    given: &TensorShape,
    expected: &TensorShape,
) -> Result<(), FgsmError> {
    if given.is_compatible_with(expected) {
        Ok(())
    } else {
        Err(FgsmError::LayerShapeMismatch {
            layer_idx,
            expected: expected.clone(),
            given: given.clone(),
        })
    }
}

impl Classifier for DNN {
    type Trace = Activations;

    fn input_dims(&self) -> usize {
        self.input_shape().map_or(0, |shape| shape.dims())
    }

    fn num_classes(&self) -> usize {
        self.output_shape().map_or(0, |shape| shape.dims())
    }

    fn forward_trace(&self, input: &Array1<NNFloat>) -> (Array1<NNFloat>, Activations) {
        let activations = self.forward_activations(input);
        (activations.output().clone(), activations)
    }

    fn input_gradient(
        &self,
        trace: &Activations,
        output_grad: ArrayView1<NNFloat>,
    ) -> Array1<NNFloat> {
        self.backward_trace(trace, output_grad)
    }

    fn forward(&self, input: &Array1<NNFloat>) -> Array1<NNFloat> {
        self.forward1(input)
    }
}

impl fmt::Display for DNN {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let layers: Vec<String> = self.layers.iter().map(|x| format!("{}", x)).collect();
        match self.input_shape() {
            Some(shape) => write!(f, "Input {} => {}", shape, layers.join(" => ")),
            None => write!(f, "Empty"),
        }
    }
}
