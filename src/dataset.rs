//! Labeled sample sets
use crate::error::FgsmError;
use crate::NNFloat;
use log::debug;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A flattened, normalized sample with its class index
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LabeledSample {
    pub sample: Array1<NNFloat>,
    pub label: usize,
}

impl LabeledSample {
    pub fn new(sample: Array1<NNFloat>, label: usize) -> Self {
        Self { sample, label }
    }
}

/// An ordered set of labeled samples
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    samples: Vec<LabeledSample>,
}

impl Dataset {
    pub fn new(samples: Vec<LabeledSample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<LabeledSample> {
        self.samples.iter()
    }

    pub fn samples(&self) -> &[LabeledSample] {
        &self.samples
    }

    /// Keeps only the first `n` samples
    #[must_use]
    pub fn take(mut self, n: usize) -> Self {
        self.samples.truncate(n);
        self
    }

    /// Keeps at most `limit` samples, then checks only those against the model.
    ///
    /// # Errors
    /// See [`Dataset::validate`]
    pub fn prepare(
        self,
        limit: Option<usize>,
        input_dims: usize,
        num_classes: usize,
    ) -> Result<Self, FgsmError> {
        let dataset = match limit {
            Some(n) => self.take(n),
            None => self,
        };
        dataset.validate(input_dims, num_classes)?;
        Ok(dataset)
    }

    /// Checks every sample against the model it will be fed to.
    ///
    /// # Errors
    /// `SampleShapeMismatch` or `LabelOutOfRange` for the first offending sample
    pub fn validate(&self, input_dims: usize, num_classes: usize) -> Result<(), FgsmError> {
        self.samples
            .iter()
            .enumerate()
            .try_for_each(|(sample_idx, s)| {
                if s.sample.len() != input_dims {
                    return Err(FgsmError::SampleShapeMismatch {
                        sample_idx,
                        expected: input_dims,
                        given: s.sample.len(),
                    });
                }
                if s.label >= num_classes {
                    return Err(FgsmError::LabelOutOfRange {
                        sample_idx,
                        label: s.label,
                        num_classes,
                    });
                }
                Ok(())
            })
    }

    /// # Errors
    /// On malformed JSON
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, FgsmError> {
        let dataset: Self = serde_json::from_reader(reader)?;
        debug!("loaded {} samples", dataset.len());
        Ok(dataset)
    }

    /// # Errors
    /// See [`Dataset::from_json_reader`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FgsmError> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a LabeledSample;
    type IntoIter = std::slice::Iter<'a, LabeledSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl FromIterator<LabeledSample> for Dataset {
    fn from_iter<I: IntoIterator<Item = LabeledSample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}
