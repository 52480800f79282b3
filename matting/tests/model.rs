use ml_core::arch::{Shape, Tensor};
use ndarray::Array3;

use matting::create_model;

#[test]
fn model_has_ten_layers() {
    let model = create_model().unwrap();
    assert_eq!(model.num_layers(), 10);
}

#[test]
fn model_output_is_three_values() {
    let model = create_model().unwrap();
    assert_eq!(model.output_shape(), Shape::flat(3));
}

#[test]
fn model_accepts_a_full_size_input_and_bounds_its_output() {
    let model = create_model().unwrap();
    let x = Tensor::Image(Array3::from_elem((256, 256, 3), 0.5));

    let out = model.predict(x).unwrap();

    let Tensor::Flat(out) = out else {
        panic!("expected a flat output")
    };
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|&v| (0.0..=1.0).contains(&v)));
}

#[test]
fn model_rejects_a_wrong_input_shape() {
    let model = create_model().unwrap();
    let x = Tensor::Image(Array3::zeros((64, 64, 3)));

    assert!(model.predict(x).is_err());
}

#[test]
fn model_parameter_count_matches_the_architecture() {
    // (3*3*3+1)*32 + (3*3*32+1)*64 + (3*3*64+1)*128
    //   + (30*30*128+1)*256 + (256+1)*3
    let model = create_model().unwrap();
    assert_eq!(model.params().len(), 29_585_475);
}
