use std::{fmt, io};

use crate::arch::Shape;

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The framework's error type.
#[derive(Debug)]
pub enum MlErr {
    /// A layer cannot accept the shape produced by the previous stage.
    IncompatibleShape { layer: &'static str, input: Shape },
    /// A forward pass was given an input of the wrong shape.
    InputMismatch { expected: Shape, got: Shape },
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// A saved tensor disagrees with the architecture metadata.
    TensorShape {
        name: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    /// A saved tensor is not stored as f32.
    TensorDtype { name: String },
    /// The model file carries no metadata entry under this key.
    MissingMetadata { key: &'static str },
    Shape(ndarray::ShapeError),
    Format(safetensors::SafeTensorError),
    Json(serde_json::Error),
    Io(io::Error),
}

impl fmt::Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompatibleShape { layer, input } => {
                write!(f, "{layer} layer cannot take an input of shape {input}")
            }
            Self::InputMismatch { expected, got } => {
                write!(f, "expected an input of shape {expected}, got {got}")
            }
            Self::SizeMismatch {
                what,
                got,
                expected,
            } => {
                write!(
                    f,
                    "there's a size mismatch in {what}, got {got} and expected {expected}"
                )
            }
            Self::TensorShape {
                name,
                expected,
                got,
            } => {
                write!(
                    f,
                    "tensor {name} has shape {got:?}, the architecture expects {expected:?}"
                )
            }
            Self::TensorDtype { name } => write!(f, "tensor {name} is not stored as f32"),
            Self::MissingMetadata { key } => {
                write!(f, "model file has no {key} metadata entry")
            }
            Self::Shape(e) => write!(f, "shape error: {e}"),
            Self::Format(e) => write!(f, "model format error: {e}"),
            Self::Json(e) => write!(f, "metadata error: {e}"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for MlErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Shape(e) => Some(e),
            Self::Format(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MlErr {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ndarray::ShapeError> for MlErr {
    fn from(e: ndarray::ShapeError) -> Self {
        Self::Shape(e)
    }
}

impl From<safetensors::SafeTensorError> for MlErr {
    fn from(e: safetensors::SafeTensorError) -> Self {
        Self::Format(e)
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
