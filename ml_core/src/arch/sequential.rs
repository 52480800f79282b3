use super::{layers::Layer, Shape, Tensor};
use crate::{
    spec::{ModelSpec, ShapeSpec},
    MlErr, Result,
};

/// A sequential computation graph: each layer consumes the previous layer's
/// output.
///
/// Shapes are propagated and checked once, when the graph is assembled; a
/// stage that cannot accept its input shape fails construction.
#[derive(Debug, Clone)]
pub struct Sequential {
    input: Shape,
    output: Shape,
    layers: Vec<Layer>,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `input` - The shape of a single input sample.
    /// * `layers` - The layers the sequential is composed of.
    ///
    /// # Returns
    /// The assembled graph, or the first shape incompatibility found.
    pub fn new<I>(input: Shape, layers: I) -> Result<Self>
    where
        I: IntoIterator<Item = Layer>,
    {
        let mut layers: Vec<Layer> = layers.into_iter().collect();

        let mut shape = input;
        for layer in &mut layers {
            shape = layer.build(shape)?;
        }

        Ok(Self {
            input,
            output: shape,
            layers,
        })
    }

    pub fn input_shape(&self) -> Shape {
        self.input
    }

    pub fn output_shape(&self) -> Shape {
        self.output
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The number of layers in the graph. The input is not a layer.
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// The total amount of parameters over all layers.
    pub fn size(&self) -> usize {
        self.layers.iter().map(|layer| layer.size()).sum()
    }

    /// Makes a forward pass through the network.
    ///
    /// # Arguments
    /// * `params` - The flat parameter buffer, layer slices front to back.
    /// * `x` - A single input sample.
    ///
    /// # Returns
    /// The prediction for the given input or an error if occurred.
    pub fn forward(&self, params: &[f32], x: Tensor) -> Result<Tensor> {
        if params.len() != self.size() {
            return Err(MlErr::SizeMismatch {
                what: "params",
                got: params.len(),
                expected: self.size(),
            });
        }
        if x.shape() != self.input {
            return Err(MlErr::InputMismatch {
                expected: self.input,
                got: x.shape(),
            });
        }

        let mut rest = params;
        let mut x = x;
        for layer in &self.layers {
            let (head, tail) = rest.split_at(layer.size());
            x = layer.forward(head, x)?;
            rest = tail;
        }

        Ok(x)
    }

    pub fn spec(&self) -> ModelSpec {
        ModelSpec::Sequential {
            input: ShapeSpec::from(self.input),
            layers: self.layers.iter().map(Layer::spec).collect(),
        }
    }

    /// Rebuilds a graph following a spec.
    pub fn from_spec(spec: &ModelSpec) -> Result<Self> {
        let ModelSpec::Sequential { input, layers } = spec;
        Self::new((*input).into(), layers.iter().copied().map(Layer::from_spec))
    }
}
