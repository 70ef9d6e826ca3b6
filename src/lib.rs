#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
//! Fast Gradient Sign Method (FGSM) attacks against frozen neural classifiers.
//!
//! A network is described as data (a list of typetag-serialized layers), run
//! forward to classify a flattened sample, and pulled back to obtain the
//! gradient of the negative log-likelihood with respect to that sample. The
//! gradient's sign drives the perturbation in [`adversarial::perturb`], and
//! [`evaluate::evaluate`] measures how much accuracy survives the attack.
extern crate ndarray;
extern crate ndarray_stats;
extern crate num;
extern crate rand;

pub mod adversarial;
pub mod affine;
pub mod bounds;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod dnn;
pub mod error;
pub mod evaluate;
pub mod loss;
pub mod tensorshape;

#[cfg(test)]
mod test_util;

pub use crate::classifier::Classifier;
pub use crate::error::FgsmError;

pub type NNFloat = f64;
