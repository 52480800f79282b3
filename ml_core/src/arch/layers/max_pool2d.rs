use ndarray::{s, Array3};

use crate::{arch::Shape, MlErr, Result};

/// Non-overlapping max-pooling over the spatial axes of an image.
///
/// Spatial dimensions are floor-divided by the window size; a trailing
/// remainder smaller than the window is dropped.
#[derive(Debug, Clone)]
pub struct MaxPool2D {
    pool_size: (usize, usize),
}

impl MaxPool2D {
    pub fn new(pool_size: (usize, usize)) -> Self {
        Self { pool_size }
    }

    pub fn pool_size(&self) -> (usize, usize) {
        self.pool_size
    }

    pub fn build(&mut self, input: Shape) -> Result<Shape> {
        let Shape::Image {
            height,
            width,
            channels,
        } = input
        else {
            return Err(MlErr::IncompatibleShape {
                layer: "max_pool2d",
                input,
            });
        };

        let (ph, pw) = self.pool_size;
        if ph == 0 || pw == 0 || ph > height || pw > width {
            return Err(MlErr::IncompatibleShape {
                layer: "max_pool2d",
                input,
            });
        }

        Ok(Shape::image(height / ph, width / pw, channels))
    }

    pub fn forward(&self, x: Array3<f32>) -> Result<Array3<f32>> {
        let (ph, pw) = self.pool_size;
        let (h, w, channels) = x.dim();
        if ph > h || pw > w {
            return Err(MlErr::IncompatibleShape {
                layer: "max_pool2d",
                input: Shape::image(h, w, channels),
            });
        }

        let (oh, ow) = (h / ph, w / pw);
        let mut out = Array3::zeros((oh, ow, channels));
        for i in 0..oh {
            for j in 0..ow {
                let window = x.slice(s![i * ph..(i + 1) * ph, j * pw..(j + 1) * pw, ..]);
                for c in 0..channels {
                    out[[i, j, c]] = window
                        .slice(s![.., .., c])
                        .fold(f32::NEG_INFINITY, |m, &v| m.max(v));
                }
            }
        }

        Ok(out)
    }
}
