use ndarray::{s, Array3, ArrayView1, ArrayView4, Zip};
use rand::Rng;

use crate::{
    arch::{activations::ActFn, Shape},
    init::ParamGen,
    MlErr, Result,
};

/// A 2-D convolution over a height x width x channels input.
///
/// Valid padding, stride 1, one bias per filter. The kernel is stored HWIO:
/// (kernel height, kernel width, input channels, filters).
#[derive(Debug, Clone)]
pub struct Conv2D {
    filters: usize,
    kernel_size: (usize, usize),
    act_fn: Option<ActFn>,

    // Resolved when the layer is wired into a graph.
    in_channels: usize,
}

impl Conv2D {
    pub fn new(filters: usize, kernel_size: (usize, usize), act_fn: Option<ActFn>) -> Self {
        Self {
            filters,
            kernel_size,
            act_fn,
            in_channels: 0,
        }
    }

    pub fn filters(&self) -> usize {
        self.filters
    }

    pub fn kernel_size(&self) -> (usize, usize) {
        self.kernel_size
    }

    pub fn act_fn(&self) -> Option<&ActFn> {
        self.act_fn.as_ref()
    }

    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    /// Resolves the input channel count and returns the output shape.
    ///
    /// # Errors
    /// Fails if the input is not an image or the kernel does not fit in it.
    pub fn build(&mut self, input: Shape) -> Result<Shape> {
        let Shape::Image {
            height,
            width,
            channels,
        } = input
        else {
            return Err(MlErr::IncompatibleShape {
                layer: "conv2d",
                input,
            });
        };

        let (kh, kw) = self.kernel_size;
        if kh == 0 || kw == 0 || kh > height || kw > width || channels == 0 || self.filters == 0 {
            return Err(MlErr::IncompatibleShape {
                layer: "conv2d",
                input,
            });
        }

        self.in_channels = channels;
        Ok(Shape::image(height - kh + 1, width - kw + 1, self.filters))
    }

    /// The amount of parameters this layer has.
    pub fn size(&self) -> usize {
        let (kh, kw) = self.kernel_size;
        (kh * kw * self.in_channels + 1) * self.filters
    }

    pub fn init<R: Rng>(&self, rng: &mut R, params: &mut [f32]) {
        let (kh, kw) = self.kernel_size;
        let (kernel, bias) = params.split_at_mut(kh * kw * self.in_channels * self.filters);
        ParamGen::GlorotUniform {
            fan_in: kh * kw * self.in_channels,
            fan_out: kh * kw * self.filters,
        }
        .fill(rng, kernel);
        ParamGen::Zeros.fill(rng, bias);
    }

    pub fn forward(&self, params: &[f32], x: Array3<f32>) -> Result<Array3<f32>> {
        if params.len() != self.size() {
            return Err(MlErr::SizeMismatch {
                what: "conv2d params",
                got: params.len(),
                expected: self.size(),
            });
        }

        let (kh, kw) = self.kernel_size;
        let (h, w, channels) = x.dim();
        if channels != self.in_channels || h < kh || w < kw {
            return Err(MlErr::IncompatibleShape {
                layer: "conv2d",
                input: Shape::image(h, w, channels),
            });
        }

        let w_size = kh * kw * self.in_channels * self.filters;
        let kernel =
            ArrayView4::from_shape((kh, kw, self.in_channels, self.filters), &params[..w_size])?;
        let bias = ArrayView1::from_shape(self.filters, &params[w_size..])?;

        let (oh, ow) = (h - kh + 1, w - kw + 1);
        let mut out = Array3::zeros((oh, ow, self.filters));
        for i in 0..oh {
            for j in 0..ow {
                let patch = x.slice(s![i..i + kh, j..j + kw, ..]);
                for fi in 0..self.filters {
                    let k = kernel.slice(s![.., .., .., fi]);
                    let mut acc = bias[fi];
                    Zip::from(&patch).and(&k).for_each(|&p, &kv| acc += p * kv);
                    out[[i, j, fi]] = acc;
                }
            }
        }

        if let Some(act_fn) = &self.act_fn {
            out.mapv_inplace(|z| act_fn.f(z));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array3;

    use super::*;

    fn built(filters: usize, kernel: (usize, usize), act_fn: Option<ActFn>, input: Shape) -> Conv2D {
        let mut layer = Conv2D::new(filters, kernel, act_fn);
        layer.build(input).unwrap();
        layer
    }

    #[test]
    fn computes_a_valid_cross_correlation() {
        let layer = built(1, (2, 2), None, Shape::image(3, 3, 1));
        // kernel [[1, 0], [0, 1]], bias 0.5
        let params = [1.0, 0.0, 0.0, 1.0, 0.5];
        let x =
            Array3::from_shape_vec((3, 3, 1), vec![1., 2., 3., 4., 5., 6., 7., 8., 9.]).unwrap();

        let out = layer.forward(&params, x).unwrap();

        assert_eq!(out.dim(), (2, 2, 1));
        assert_eq!(out[[0, 0, 0]], 1. + 5. + 0.5);
        assert_eq!(out[[0, 1, 0]], 2. + 6. + 0.5);
        assert_eq!(out[[1, 0, 0]], 4. + 8. + 0.5);
        assert_eq!(out[[1, 1, 0]], 5. + 9. + 0.5);
    }

    #[test]
    fn sums_over_input_channels() {
        let layer = built(1, (1, 1), None, Shape::image(1, 1, 2));
        let params = [1.0, 10.0, 0.0];
        let x = Array3::from_shape_vec((1, 1, 2), vec![2., 3.]).unwrap();

        let out = layer.forward(&params, x).unwrap();

        assert_eq!(out[[0, 0, 0]], 2. + 30.);
    }

    #[test]
    fn applies_the_activation() {
        let layer = built(1, (1, 1), Some(ActFn::relu()), Shape::image(2, 2, 1));
        let params = [-1.0, 0.0];
        let x = Array3::from_shape_vec((2, 2, 1), vec![1., 2., 3., 4.]).unwrap();

        let out = layer.forward(&params, x).unwrap();

        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn rejects_a_flat_input() {
        let mut layer = Conv2D::new(1, (3, 3), None);
        assert!(layer.build(Shape::flat(9)).is_err());
    }

    #[test]
    fn rejects_a_kernel_larger_than_the_input() {
        let mut layer = Conv2D::new(1, (3, 3), None);
        assert!(layer.build(Shape::image(2, 2, 1)).is_err());
    }

    #[test]
    fn rejects_a_channel_mismatch_at_forward() {
        let layer = built(1, (1, 1), None, Shape::image(2, 2, 1));
        let params = vec![0.0; layer.size()];
        let x = Array3::zeros((2, 2, 3));

        assert!(layer.forward(&params, x).is_err());
    }
}
