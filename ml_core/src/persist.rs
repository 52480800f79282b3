//! Model persistence over the safetensors format.
//!
//! A model file is a single safetensors archive: every parameter tensor under
//! its layout name, plus the architecture and compile configuration as JSON
//! strings in the metadata header.

use std::{collections::HashMap, fs, path::Path};

use log::{debug, info};
use safetensors::{tensor::TensorView, Dtype, SafeTensors};

use crate::{
    arch::Sequential,
    layout::ParameterLayout,
    model::Model,
    spec::{CompileSpec, ModelSpec},
    MlErr, Result,
};

const MODEL_KEY: &str = "model";
const COMPILE_KEY: &str = "compile";

impl Model {
    /// Writes the full model (graph, weights, compile configuration) to
    /// `path`.
    ///
    /// # Errors
    /// Any I/O or encoding failure propagates; nothing is retried and no
    /// partial file is cleaned up.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let layout = ParameterLayout::new(self.graph());
        layout.validate(self.params().len())?;

        let mut metadata = HashMap::new();
        metadata.insert(
            MODEL_KEY.to_string(),
            serde_json::to_string(&self.graph().spec())?,
        );
        if let Some(compile) = self.compile_spec() {
            metadata.insert(COMPILE_KEY.to_string(), serde_json::to_string(compile)?);
        }

        let mut tensors = Vec::with_capacity(layout.entries().len());
        for e in layout.entries() {
            let data: &[u8] = bytemuck::cast_slice(&self.params()[e.range.clone()]);
            tensors.push((
                e.name.clone(),
                TensorView::new(Dtype::F32, e.shape.clone(), data)?,
            ));
        }

        debug!("writing {} tensors to {}", tensors.len(), path.display());
        safetensors::serialize_to_file(tensors, &Some(metadata), path)?;
        info!("model written to {}", path.display());
        Ok(())
    }

    /// Reads a model back from a file written by [`Model::save`].
    ///
    /// The graph is rebuilt from the architecture metadata, then every named
    /// tensor is checked against the rebuilt layout and copied into a fresh
    /// parameter buffer.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let buf = fs::read(path)?;

        let (_header_len, header) = SafeTensors::read_metadata(&buf)?;
        let metadata = header
            .metadata()
            .as_ref()
            .ok_or(MlErr::MissingMetadata { key: MODEL_KEY })?;
        let model_json = metadata
            .get(MODEL_KEY)
            .ok_or(MlErr::MissingMetadata { key: MODEL_KEY })?;
        let spec: ModelSpec = serde_json::from_str(model_json)?;
        let compile: Option<CompileSpec> = metadata
            .get(COMPILE_KEY)
            .map(|s| serde_json::from_str(s))
            .transpose()?;

        let graph = Sequential::from_spec(&spec)?;
        let layout = ParameterLayout::new(&graph);
        layout.validate(graph.size())?;

        let tensors = SafeTensors::deserialize(&buf)?;
        let mut params = vec![0.0; graph.size()];
        for e in layout.entries() {
            let view = tensors.tensor(&e.name)?;
            if view.dtype() != Dtype::F32 {
                return Err(MlErr::TensorDtype {
                    name: e.name.clone(),
                });
            }
            if view.shape() != e.shape.as_slice() {
                return Err(MlErr::TensorShape {
                    name: e.name.clone(),
                    expected: e.shape.clone(),
                    got: view.shape().to_vec(),
                });
            }

            // The data section is not guaranteed to be 4-byte aligned, so
            // decode instead of casting in place.
            for (dst, src) in params[e.range.clone()]
                .iter_mut()
                .zip(view.data().chunks_exact(4))
            {
                *dst = f32::from_le_bytes([src[0], src[1], src[2], src[3]]);
            }
        }

        debug!(
            "read {} tensors from {}",
            layout.entries().len(),
            path.display()
        );
        Model::from_parts(graph, params, compile)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        arch::{activations::ActFn, layers::Layer, Shape},
        spec::{LossFnSpec, MetricSpec, OptimizerSpec},
    };

    fn small_model() -> Model {
        let graph = Sequential::new(
            Shape::image(6, 6, 1),
            [
                Layer::conv2d(2, (3, 3), Some(ActFn::relu())),
                Layer::max_pool2d((2, 2)),
                Layer::flatten(),
                Layer::dense(3, Some(ActFn::sigmoid(1.0))),
            ],
        )
        .unwrap();

        Model::new(graph, &mut StdRng::seed_from_u64(11))
    }

    fn compile_spec() -> CompileSpec {
        CompileSpec {
            optimizer: OptimizerSpec::Adam {
                learning_rate: 1e-3,
                beta1: 0.9,
                beta2: 0.999,
                epsilon: 1e-7,
            },
            loss: LossFnSpec::BinaryCrossentropy,
            metrics: vec![MetricSpec::Accuracy],
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.safetensors");

        let mut model = small_model();
        model.compile(compile_spec());
        model.save(&path).unwrap();

        let reloaded = Model::load(&path).unwrap();

        assert_eq!(reloaded.num_layers(), model.num_layers());
        assert_eq!(reloaded.output_shape(), model.output_shape());
        assert_eq!(reloaded.params(), model.params());
        assert_eq!(reloaded.graph().spec(), model.graph().spec());
        assert_eq!(reloaded.compile_spec(), model.compile_spec());
    }

    #[test]
    fn an_uncompiled_model_loads_without_a_compile_spec() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.safetensors");

        small_model().save(&path).unwrap();

        let reloaded = Model::load(&path).unwrap();
        assert!(reloaded.compile_spec().is_none());
    }

    #[test]
    fn load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.safetensors");
        fs::write(&path, b"not a model").unwrap();

        assert!(Model::load(&path).is_err());
    }

    #[test]
    fn load_fails_on_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.safetensors");

        assert!(matches!(Model::load(&path), Err(MlErr::Io(_))));
    }

    #[test]
    fn save_fails_on_an_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir.safetensors");

        assert!(small_model().save(&path).is_err());
    }
}
