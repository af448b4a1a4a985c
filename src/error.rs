use thiserror::Error;

/// Construction-time failures for a simulation grid or its parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    #[error("grid dimension must be a positive even number, got {0}")]
    InvalidDimension(usize),
    #[error("at most 3 dye channels are supported, got {0}")]
    TooManyChannels(usize),
    #[error("invalid solver parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] FluidError),
}
