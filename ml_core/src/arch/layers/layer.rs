use rand::Rng;

use super::{Conv2D, Dense, Flatten, MaxPool2D};
use crate::{
    arch::{activations::ActFn, Shape, Tensor},
    spec::LayerSpec,
    Result,
};

/// The operations a model can be assembled from.
#[derive(Debug, Clone)]
pub enum Layer {
    Conv2D(Conv2D),
    MaxPool2D(MaxPool2D),
    Flatten(Flatten),
    Dense(Dense),
}

impl Layer {
    pub fn conv2d(filters: usize, kernel_size: (usize, usize), act_fn: Option<ActFn>) -> Self {
        Self::Conv2D(Conv2D::new(filters, kernel_size, act_fn))
    }

    pub fn max_pool2d(pool_size: (usize, usize)) -> Self {
        Self::MaxPool2D(MaxPool2D::new(pool_size))
    }

    pub fn flatten() -> Self {
        Self::Flatten(Flatten::new())
    }

    pub fn dense(units: usize, act_fn: Option<ActFn>) -> Self {
        Self::Dense(Dense::new(units, act_fn))
    }

    /// Stable name used for logging and for naming saved tensors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Conv2D(_) => "conv2d",
            Self::MaxPool2D(_) => "max_pool2d",
            Self::Flatten(_) => "flatten",
            Self::Dense(_) => "dense",
        }
    }

    pub(crate) fn build(&mut self, input: Shape) -> Result<Shape> {
        match self {
            Self::Conv2D(l) => l.build(input),
            Self::MaxPool2D(l) => l.build(input),
            Self::Flatten(l) => l.build(input),
            Self::Dense(l) => l.build(input),
        }
    }

    /// The amount of parameters this layer has.
    pub fn size(&self) -> usize {
        match self {
            Self::Conv2D(l) => l.size(),
            Self::Dense(l) => l.size(),
            Self::MaxPool2D(_) | Self::Flatten(_) => 0,
        }
    }

    /// Named parameter tensors of this layer, in buffer order.
    pub(crate) fn param_shapes(&self) -> Vec<(&'static str, Vec<usize>)> {
        match self {
            Self::Conv2D(l) => {
                let (kh, kw) = l.kernel_size();
                vec![
                    ("kernel", vec![kh, kw, l.in_channels(), l.filters()]),
                    ("bias", vec![l.filters()]),
                ]
            }
            Self::Dense(l) => vec![
                ("kernel", vec![l.in_features(), l.units()]),
                ("bias", vec![l.units()]),
            ],
            Self::MaxPool2D(_) | Self::Flatten(_) => vec![],
        }
    }

    /// Fills this layer's slice of the flat parameter buffer.
    pub fn init<R: Rng>(&self, rng: &mut R, params: &mut [f32]) {
        match self {
            Self::Conv2D(l) => l.init(rng, params),
            Self::Dense(l) => l.init(rng, params),
            Self::MaxPool2D(_) | Self::Flatten(_) => {}
        }
    }

    pub fn forward(&self, params: &[f32], x: Tensor) -> Result<Tensor> {
        match self {
            Self::Conv2D(l) => Ok(l.forward(params, x.into_image("conv2d")?)?.into()),
            Self::MaxPool2D(l) => Ok(l.forward(x.into_image("max_pool2d")?)?.into()),
            Self::Flatten(l) => Ok(l.forward(x.into_image("flatten")?).into()),
            Self::Dense(l) => Ok(l.forward(params, x.into_flat("dense")?)?.into()),
        }
    }

    pub fn spec(&self) -> LayerSpec {
        match self {
            Self::Conv2D(l) => LayerSpec::Conv2D {
                filters: l.filters(),
                kernel_size: l.kernel_size(),
                act_fn: l.act_fn().map(ActFn::spec),
            },
            Self::MaxPool2D(l) => LayerSpec::MaxPool2D {
                pool_size: l.pool_size(),
            },
            Self::Flatten(_) => LayerSpec::Flatten,
            Self::Dense(l) => LayerSpec::Dense {
                units: l.units(),
                act_fn: l.act_fn().map(ActFn::spec),
            },
        }
    }

    pub fn from_spec(spec: LayerSpec) -> Self {
        match spec {
            LayerSpec::Conv2D {
                filters,
                kernel_size,
                act_fn,
            } => Self::conv2d(filters, kernel_size, act_fn.map(ActFn::from_spec)),
            LayerSpec::MaxPool2D { pool_size } => Self::max_pool2d(pool_size),
            LayerSpec::Flatten => Self::flatten(),
            LayerSpec::Dense { units, act_fn } => {
                Self::dense(units, act_fn.map(ActFn::from_spec))
            }
        }
    }
}
