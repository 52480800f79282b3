//! Serializable mirrors of the architecture and compile configuration.
//!
//! These enums are the persistence vocabulary: a saved model file carries
//! them as JSON metadata next to the weight tensors.

use serde::{Deserialize, Serialize};

use crate::arch::Shape;

/// The specification for the `Shape` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeSpec {
    Image {
        height: usize,
        width: usize,
        channels: usize,
    },
    Flat {
        len: usize,
    },
}

impl From<Shape> for ShapeSpec {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Image {
                height,
                width,
                channels,
            } => Self::Image {
                height,
                width,
                channels,
            },
            Shape::Flat { len } => Self::Flat { len },
        }
    }
}

impl From<ShapeSpec> for Shape {
    fn from(spec: ShapeSpec) -> Self {
        match spec {
            ShapeSpec::Image {
                height,
                width,
                channels,
            } => Self::Image {
                height,
                width,
                channels,
            },
            ShapeSpec::Flat { len } => Self::Flat { len },
        }
    }
}

/// The specification for the `ActFn` enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnSpec {
    Relu,
    Sigmoid { amp: f32 },
}

/// The specification for the `Layer` enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSpec {
    #[serde(rename = "conv2d")]
    Conv2D {
        filters: usize,
        kernel_size: (usize, usize),
        act_fn: Option<ActFnSpec>,
    },
    #[serde(rename = "max_pool2d")]
    MaxPool2D { pool_size: (usize, usize) },
    Flatten,
    Dense {
        units: usize,
        act_fn: Option<ActFnSpec>,
    },
}

/// The specification for the computation graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSpec {
    Sequential {
        input: ShapeSpec,
        layers: Vec<LayerSpec>,
    },
}

/// The specification for the optimizer attached at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerSpec {
    Adam {
        learning_rate: f32,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
    },
}

/// The specification for the loss attached at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFnSpec {
    BinaryCrossentropy,
}

/// The specification for a tracked metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSpec {
    Accuracy,
}

/// The optimizer, loss and metrics a model is compiled with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileSpec {
    pub optimizer: OptimizerSpec,
    pub loss: LossFnSpec,
    pub metrics: Vec<MetricSpec>,
}
