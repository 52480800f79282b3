use super::{Relu, Sigmoid};
use crate::spec::ActFnSpec;

#[derive(Debug, Clone, Copy)]
pub enum ActFn {
    Relu(Relu),
    Sigmoid(Sigmoid),
}

impl ActFn {
    pub fn relu() -> Self {
        Self::Relu(Relu)
    }

    pub fn sigmoid(amp: f32) -> Self {
        Self::Sigmoid(Sigmoid::new(amp))
    }

    pub fn f(&self, z: f32) -> f32 {
        match self {
            Self::Relu(a) => a.f(z),
            Self::Sigmoid(a) => a.f(z),
        }
    }

    pub fn spec(&self) -> ActFnSpec {
        match self {
            Self::Relu(_) => ActFnSpec::Relu,
            Self::Sigmoid(a) => ActFnSpec::Sigmoid { amp: a.amp() },
        }
    }

    pub fn from_spec(spec: ActFnSpec) -> Self {
        match spec {
            ActFnSpec::Relu => Self::relu(),
            ActFnSpec::Sigmoid { amp } => Self::sigmoid(amp),
        }
    }
}
