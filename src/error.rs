use thiserror::Error;

/// Rejected input to the rotation controller. State is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RotationError {
    #[error("pointer position ({x}, {y}) is not finite")]
    NonFinitePosition { x: f32, y: f32 },
    #[error("elapsed time {0} must be finite and non-negative")]
    InvalidElapsed(f32),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("config value {field} = {value} is out of range ({expected})")]
    Invalid {
        field: &'static str,
        value: f32,
        expected: &'static str,
    },
}

/// Failures while bringing up the GPU and loading the sprite.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("surface creation failed: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("sprite decode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}
