//! Accuracy of a frozen classifier under FGSM attack
use crate::adversarial::perturb;
use crate::classifier::Classifier;
use crate::config::{check_epsilon, AttackConfig, ExampleSelection};
use crate::dataset::LabeledSample;
use crate::error::FgsmError;
use crate::loss::{nll_loss, nll_loss_grad, predict};
use crate::NNFloat;
use log::{debug, info, trace, warn};
use more_asserts::{assert_le, debug_assert_le};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// An attacked sample kept for display
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AdversarialExample {
    pub original_prediction: usize,
    pub new_prediction: usize,
    pub perturbed_sample: Array1<NNFloat>,
}

/// Outcome of attacking a sample set at one epsilon
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EpsilonReport {
    pub epsilon: NNFloat,
    /// `correct / total`
    pub accuracy: NNFloat,
    /// Attacked samples still classified correctly
    pub correct: usize,
    /// Samples initially classified correctly, i.e. the ones attacked
    pub attacked: usize,
    /// Every sample seen, including the ones skipped as initially wrong
    pub total: usize,
    pub examples: Vec<AdversarialExample>,
}

/// Attacks every initially correct sample with FGSM at `epsilon` and counts
/// how many keep their label.
///
/// Initially misclassified samples are never attacked but stay in the
/// accuracy denominator.
///
/// # Errors
/// `InvalidEpsilon` unless `epsilon` is finite and non-negative,
/// `InvalidInputRange` for an unusable `config.input_range`, and
/// `Prediction` if the model produces scores without an arg-max
#[allow(clippy::cast_precision_loss)]
pub fn evaluate<C: Classifier>(
    model: &C,
    samples: &[LabeledSample],
    epsilon: NNFloat,
    config: &AttackConfig,
) -> Result<EpsilonReport, FgsmError> {
    check_epsilon(epsilon)?;
    config.validate_input_range()?;
    let bounds = config.input_bounds(model.input_dims());
    let mut correct = 0;
    let mut attacked = 0;
    let mut examples = Vec::with_capacity(config.max_examples);

    for (idx, LabeledSample { sample, label }) in samples.iter().enumerate() {
        debug_assert_eq!(sample.len(), model.input_dims());
        let (log_probs, model_trace) = model.forward_trace(sample);
        let original_prediction = predict(log_probs.view())?;
        if original_prediction != *label {
            continue;
        }
        attacked += 1;

        let loss = nll_loss(log_probs.view(), *label);
        let output_grad = nll_loss_grad(log_probs.view(), *label);
        let gradient = model.input_gradient(&model_trace, output_grad.view());
        let perturbed_sample = perturb(sample.view(), epsilon, gradient.view(), &bounds);
        let new_prediction = predict(model.forward(&perturbed_sample).view())?;
        trace!(
            "sample {} label {} loss {:.5}: {} -> {}",
            idx,
            label,
            loss,
            original_prediction,
            new_prediction
        );

        let survived = new_prediction == *label;
        if survived {
            correct += 1;
        }
        if examples.len() < config.max_examples
            && keep_example(config.example_selection, epsilon, survived)
        {
            examples.push(AdversarialExample {
                original_prediction,
                new_prediction,
                perturbed_sample,
            });
        }
    }

    let total = samples.len();
    debug_assert_le!(correct, attacked);
    debug_assert_le!(attacked, total);
    debug!(
        "epsilon {}: skipped {} initially misclassified samples",
        epsilon,
        total - attacked
    );
    let accuracy = if total == 0 {
        warn!("evaluating epsilon {} on an empty sample set", epsilon);
        0.
    } else {
        correct as NNFloat / total as NNFloat
    };
    info!(
        "Epsilon: {}\tTest Accuracy = {} / {} = {}",
        epsilon, correct, total, accuracy
    );

    Ok(EpsilonReport {
        epsilon,
        accuracy,
        correct,
        attacked,
        total,
        examples,
    })
}

/// Runs [`evaluate`] once per configured epsilon, in order.
///
/// # Errors
/// If the configuration is invalid or any evaluation fails
pub fn sweep<C: Classifier>(
    model: &C,
    samples: &[LabeledSample],
    config: &AttackConfig,
) -> Result<Vec<EpsilonReport>, FgsmError> {
    config.validate()?;
    config
        .epsilons
        .iter()
        .map(|&epsilon| evaluate(model, samples, epsilon, config))
        .collect()
}

fn keep_example(selection: ExampleSelection, epsilon: NNFloat, survived: bool) -> bool {
    match selection {
        ExampleSelection::Any => true,
        ExampleSelection::Adversarial => epsilon <= 0. || !survived,
    }
}
