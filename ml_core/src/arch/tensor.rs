use ndarray::{Array1, Array3};

use super::Shape;
use crate::{MlErr, Result};

/// A single-sample value flowing through a model.
#[derive(Debug, Clone, PartialEq)]
pub enum Tensor {
    Image(Array3<f32>),
    Flat(Array1<f32>),
}

impl Tensor {
    pub fn shape(&self) -> Shape {
        match self {
            Self::Image(a) => {
                let (height, width, channels) = a.dim();
                Shape::image(height, width, channels)
            }
            Self::Flat(a) => Shape::flat(a.len()),
        }
    }

    pub(crate) fn into_image(self, layer: &'static str) -> Result<Array3<f32>> {
        match self {
            Self::Image(a) => Ok(a),
            other => Err(MlErr::IncompatibleShape {
                layer,
                input: other.shape(),
            }),
        }
    }

    pub(crate) fn into_flat(self, layer: &'static str) -> Result<Array1<f32>> {
        match self {
            Self::Flat(a) => Ok(a),
            other => Err(MlErr::IncompatibleShape {
                layer,
                input: other.shape(),
            }),
        }
    }
}

impl From<Array3<f32>> for Tensor {
    fn from(a: Array3<f32>) -> Self {
        Self::Image(a)
    }
}

impl From<Array1<f32>> for Tensor {
    fn from(a: Array1<f32>) -> Self {
        Self::Flat(a)
    }
}
