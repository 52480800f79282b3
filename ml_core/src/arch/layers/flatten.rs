use ndarray::{Array1, Array3};

use crate::{arch::Shape, MlErr, Result};

/// Flattens an image into a vector in row-major order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flatten;

impl Flatten {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&mut self, input: Shape) -> Result<Shape> {
        let Shape::Image { .. } = input else {
            return Err(MlErr::IncompatibleShape {
                layer: "flatten",
                input,
            });
        };

        Ok(Shape::flat(input.num_elems()))
    }

    pub fn forward(&self, x: Array3<f32>) -> Array1<f32> {
        Array1::from_iter(x)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array1, Array3};

    use super::*;

    #[test]
    fn flattens_in_row_major_order() {
        let values: Vec<f32> = (0..8).map(|v| v as f32).collect();
        let x = Array3::from_shape_vec((2, 2, 2), values.clone()).unwrap();

        let out = Flatten::new().forward(x);

        assert_eq!(out, Array1::from_vec(values));
    }

    #[test]
    fn rejects_an_already_flat_input() {
        assert!(Flatten::new().build(Shape::flat(8)).is_err());
    }
}
