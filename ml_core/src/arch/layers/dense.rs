use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::Rng;

use crate::{
    arch::{activations::ActFn, Shape},
    init::ParamGen,
    MlErr, Result,
};

/// A fully connected layer, y = act(xW + b).
///
/// The kernel is stored (input features, units), biases after it.
#[derive(Debug, Clone)]
pub struct Dense {
    units: usize,
    act_fn: Option<ActFn>,

    // Resolved when the layer is wired into a graph.
    in_features: usize,
}

impl Dense {
    pub fn new(units: usize, act_fn: Option<ActFn>) -> Self {
        Self {
            units,
            act_fn,
            in_features: 0,
        }
    }

    pub fn units(&self) -> usize {
        self.units
    }

    pub fn act_fn(&self) -> Option<&ActFn> {
        self.act_fn.as_ref()
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    /// Resolves the input feature count and returns the output shape.
    ///
    /// # Errors
    /// Fails if the input is not flat.
    pub fn build(&mut self, input: Shape) -> Result<Shape> {
        let Shape::Flat { len } = input else {
            return Err(MlErr::IncompatibleShape {
                layer: "dense",
                input,
            });
        };

        if len == 0 || self.units == 0 {
            return Err(MlErr::IncompatibleShape {
                layer: "dense",
                input,
            });
        }

        self.in_features = len;
        Ok(Shape::flat(self.units))
    }

    /// The amount of parameters this layer has.
    pub fn size(&self) -> usize {
        (self.in_features + 1) * self.units
    }

    pub fn init<R: Rng>(&self, rng: &mut R, params: &mut [f32]) {
        let (kernel, bias) = params.split_at_mut(self.in_features * self.units);
        ParamGen::GlorotUniform {
            fan_in: self.in_features,
            fan_out: self.units,
        }
        .fill(rng, kernel);
        ParamGen::Zeros.fill(rng, bias);
    }

    pub fn forward(&self, params: &[f32], x: Array1<f32>) -> Result<Array1<f32>> {
        if params.len() != self.size() {
            return Err(MlErr::SizeMismatch {
                what: "dense params",
                got: params.len(),
                expected: self.size(),
            });
        }
        if x.len() != self.in_features {
            return Err(MlErr::IncompatibleShape {
                layer: "dense",
                input: Shape::flat(x.len()),
            });
        }

        let w_size = self.in_features * self.units;
        let kernel = ArrayView2::from_shape((self.in_features, self.units), &params[..w_size])?;
        let bias = ArrayView1::from_shape(self.units, &params[w_size..])?;

        let mut z = x.dot(&kernel) + bias;
        if let Some(act_fn) = &self.act_fn {
            z.mapv_inplace(|v| act_fn.f(v));
        }

        Ok(z)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use super::*;

    fn built(units: usize, act_fn: Option<ActFn>, input: Shape) -> Dense {
        let mut layer = Dense::new(units, act_fn);
        layer.build(input).unwrap();
        layer
    }

    #[test]
    fn computes_an_affine_map() {
        let layer = built(2, None, Shape::flat(2));
        // W = [[1, 2], [3, 4]], b = [10, 20]
        let params = [1.0, 2.0, 3.0, 4.0, 10.0, 20.0];
        let x = array![1.0, 1.0];

        let out = layer.forward(&params, x).unwrap();

        assert_abs_diff_eq!(out[0], 14.0, epsilon = 1e-6);
        assert_abs_diff_eq!(out[1], 26.0, epsilon = 1e-6);
    }

    #[test]
    fn sigmoid_keeps_the_output_in_unit_range() {
        let layer = built(3, Some(ActFn::sigmoid(1.0)), Shape::flat(2));
        let params = [5.0, -5.0, 0.0, 5.0, -5.0, 0.0, 0.0, 0.0, 0.0];
        let x = array![100.0, 100.0];

        let out = layer.forward(&params, x).unwrap();

        assert!(out.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn rejects_an_image_input() {
        let mut layer = Dense::new(4, None);
        assert!(layer.build(Shape::image(2, 2, 1)).is_err());
    }

    #[test]
    fn rejects_a_short_param_buffer() {
        let layer = built(2, None, Shape::flat(2));
        let params = [0.0; 3];

        assert!(layer.forward(&params, array![0.0, 0.0]).is_err());
    }
}
