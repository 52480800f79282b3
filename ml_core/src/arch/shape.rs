use std::fmt;

/// The shape of a value flowing through a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A single image, height x width x channels.
    Image {
        height: usize,
        width: usize,
        channels: usize,
    },
    /// A flat vector.
    Flat { len: usize },
}

impl Shape {
    pub fn image(height: usize, width: usize, channels: usize) -> Self {
        Self::Image {
            height,
            width,
            channels,
        }
    }

    pub fn flat(len: usize) -> Self {
        Self::Flat { len }
    }

    /// The total amount of scalars in a value of this shape.
    pub fn num_elems(&self) -> usize {
        match *self {
            Self::Image {
                height,
                width,
                channels,
            } => height * width * channels,
            Self::Flat { len } => len,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Image {
                height,
                width,
                channels,
            } => write!(f, "{height}x{width}x{channels}"),
            Self::Flat { len } => write!(f, "{len}"),
        }
    }
}
