use crate::tensorshape::TensorShape;
use std::fmt;

#[derive(Debug)]
pub enum FgsmError {
    Io {
        err: std::io::Error,
    },
    Serde {
        err: serde_json::Error,
    },
    Shape {
        err: ndarray::ShapeError,
    },
    EmptyNetwork,
    InvalidLayer {
        layer_idx: usize,
        reason: String,
    },
    LayerShapeMismatch {
        layer_idx: usize,
        expected: TensorShape,
        given: TensorShape,
    },
    SampleShapeMismatch {
        sample_idx: usize,
        expected: usize,
        given: usize,
    },
    LabelOutOfRange {
        sample_idx: usize,
        label: usize,
        num_classes: usize,
    },
    InvalidEpsilon {
        epsilon: f64,
    },
    InvalidInputRange {
        lower: f64,
        upper: f64,
    },
    /// The model output has no well-defined maximum (empty or NaN)
    Prediction,
}

impl fmt::Display for FgsmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io { err } => write!(f, "io error: {}", err),
            Self::Serde { err } => write!(f, "serialization error: {}", err),
            Self::Shape { err } => write!(f, "shape error: {}", err),
            Self::EmptyNetwork => write!(f, "network has no layers"),
            Self::InvalidLayer { layer_idx, reason } => {
                write!(f, "layer {} is invalid: {}", layer_idx, reason)
            }
            Self::LayerShapeMismatch {
                layer_idx,
                expected,
                given,
            } => write!(
                f,
                "layer {} expects input {} but the previous layer produces {}",
                layer_idx, expected, given
            ),
            Self::SampleShapeMismatch {
                sample_idx,
                expected,
                given,
            } => write!(
                f,
                "sample {} has {} elements, model expects {}",
                sample_idx, given, expected
            ),
            Self::LabelOutOfRange {
                sample_idx,
                label,
                num_classes,
            } => write!(
                f,
                "sample {} has label {} but the model has {} classes",
                sample_idx, label, num_classes
            ),
            Self::InvalidEpsilon { epsilon } => {
                write!(f, "epsilon must be finite and non-negative, got {}", epsilon)
            }
            Self::InvalidInputRange { lower, upper } => {
                write!(f, "invalid input range [{}, {}]", lower, upper)
            }
            Self::Prediction => write!(f, "model output has no arg-max"),
        }
    }
}

impl std::error::Error for FgsmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { err } => Some(err),
            Self::Serde { err } => Some(err),
            Self::Shape { err } => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FgsmError {
    fn from(err: std::io::Error) -> Self {
        Self::Io { err }
    }
}

impl From<serde_json::Error> for FgsmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde { err }
    }
}

impl From<ndarray::ShapeError> for FgsmError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Shape { err }
    }
}
