use rand::Rng;

/// Parameter generators for freshly built models.
#[derive(Debug, Clone, Copy)]
pub enum ParamGen {
    Zeros,
    /// Uniform in [-l, l] with l = sqrt(6 / (fan_in + fan_out)).
    GlorotUniform { fan_in: usize, fan_out: usize },
}

impl ParamGen {
    /// Fills `out` with samples from this generator.
    pub fn fill<R: Rng>(&self, rng: &mut R, out: &mut [f32]) {
        match *self {
            Self::Zeros => out.fill(0.0),
            Self::GlorotUniform { fan_in, fan_out } => {
                let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
                for w in out {
                    *w = rng.random_range(-limit..=limit);
                }
            }
        }
    }
}
