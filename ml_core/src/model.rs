use rand::Rng;

use crate::{
    arch::{Sequential, Shape, Tensor},
    spec::CompileSpec,
    MlErr, Result,
};

/// A built model: computation graph, flat parameter buffer, and the compile
/// configuration once one is attached.
///
/// The lifecycle is deliberately narrow: construct, optionally compile once,
/// save. Nothing here trains or mutates parameters after construction.
#[derive(Debug, Clone)]
pub struct Model {
    graph: Sequential,
    params: Vec<f32>,
    compile: Option<CompileSpec>,
}

impl Model {
    /// Creates a model with freshly initialized parameters: Glorot-uniform
    /// kernels, zero biases.
    pub fn new<R: Rng>(graph: Sequential, rng: &mut R) -> Self {
        let mut params = vec![0.0; graph.size()];

        let mut offset = 0;
        for layer in graph.layers() {
            let next = offset + layer.size();
            layer.init(rng, &mut params[offset..next]);
            offset = next;
        }

        Self {
            graph,
            params,
            compile: None,
        }
    }

    /// Reassembles a model from a graph and an existing parameter buffer.
    ///
    /// # Errors
    /// Fails if the buffer length does not match the graph.
    pub fn from_parts(
        graph: Sequential,
        params: Vec<f32>,
        compile: Option<CompileSpec>,
    ) -> Result<Self> {
        if params.len() != graph.size() {
            return Err(MlErr::SizeMismatch {
                what: "params",
                got: params.len(),
                expected: graph.size(),
            });
        }

        Ok(Self {
            graph,
            params,
            compile,
        })
    }

    /// Attaches the optimizer/loss/metric configuration.
    pub fn compile(&mut self, spec: CompileSpec) {
        self.compile = Some(spec);
    }

    pub fn compile_spec(&self) -> Option<&CompileSpec> {
        self.compile.as_ref()
    }

    pub fn graph(&self) -> &Sequential {
        &self.graph
    }

    pub fn params(&self) -> &[f32] {
        &self.params
    }

    pub fn num_layers(&self) -> usize {
        self.graph.num_layers()
    }

    pub fn output_shape(&self) -> Shape {
        self.graph.output_shape()
    }

    /// Evaluates the model on a single sample.
    pub fn predict(&self, x: Tensor) -> Result<Tensor> {
        self.graph.forward(&self.params, x)
    }
}
