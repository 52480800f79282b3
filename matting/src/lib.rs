//! Architecture definition and export routine for the background matting
//! network: a 256x256 RGB image in, a sigmoid-bounded 3-channel value out.
//!
//! There is no training loop, no data pipeline and no inference server here;
//! the whole job is to assemble the fixed topology, attach the compile
//! configuration and write the result to disk.

use std::path::Path;

use ml_core::{
    arch::{activations::ActFn, layers::Layer, Sequential, Shape},
    spec::{CompileSpec, LossFnSpec, MetricSpec, OptimizerSpec},
    Model, Result,
};

/// Where the exported model lands when no path is given.
pub const DEFAULT_MODEL_PATH: &str = "model.safetensors";

/// Assembles the fixed matting topology with freshly initialized weights.
///
/// Three (convolution -> max-pool) stages with 3x3 kernels and 32/64/128
/// filters, then flatten, a 256-unit ReLU hidden layer and a 3-unit sigmoid
/// output. The topology is not configurable; any shape incompatibility is
/// raised by the framework while the graph is assembled.
pub fn create_model() -> Result<Model> {
    let graph = Sequential::new(
        Shape::image(256, 256, 3),
        [
            Layer::conv2d(32, (3, 3), Some(ActFn::relu())),
            Layer::max_pool2d((2, 2)),
            Layer::conv2d(64, (3, 3), Some(ActFn::relu())),
            Layer::max_pool2d((2, 2)),
            Layer::conv2d(128, (3, 3), Some(ActFn::relu())),
            Layer::max_pool2d((2, 2)),
            Layer::flatten(),
            Layer::dense(256, Some(ActFn::relu())),
            Layer::dense(3, Some(ActFn::sigmoid(1.0))),
        ],
    )?;

    Ok(Model::new(graph, &mut rand::rng()))
}

/// Attaches the Adam / binary cross-entropy / accuracy configuration and
/// writes the full model to `path`.
///
/// # Errors
/// Any I/O or serialization failure propagates untouched; there is no retry
/// and no atomic-write guarantee.
pub fn compile_and_save_model(model: &mut Model, path: impl AsRef<Path>) -> Result<()> {
    model.compile(CompileSpec {
        optimizer: OptimizerSpec::Adam {
            learning_rate: 1e-3,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
        },
        loss: LossFnSpec::BinaryCrossentropy,
        metrics: vec![MetricSpec::Accuracy],
    });

    let path = path.as_ref();
    model.save(path)?;
    println!("model saved to {}", path.display());
    Ok(())
}
