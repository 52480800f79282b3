use log::info;

use matting::{compile_and_save_model, create_model, DEFAULT_MODEL_PATH};

fn main() -> ml_core::Result<()> {
    env_logger::init();

    let mut model = create_model()?;
    info!(
        "built model: {} layers, {} parameters, output {}",
        model.num_layers(),
        model.params().len(),
        model.output_shape(),
    );

    compile_and_save_model(&mut model, DEFAULT_MODEL_PATH)
}
