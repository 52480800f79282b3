mod conv2d;
mod dense;
mod flatten;
mod layer;
mod max_pool2d;

pub use conv2d::Conv2D;
pub use dense::Dense;
pub use flatten::Flatten;
pub use layer::Layer;
pub use max_pool2d::MaxPool2D;
