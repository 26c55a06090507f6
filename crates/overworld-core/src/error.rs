use thiserror::Error;

/// Configuration errors, surfaced synchronously before a worker starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("map dimensions {width}x{height} are too small (need at least 8x8)")]
    BadDimensions { width: usize, height: usize },
    #[error("at least one civilization is required")]
    NoCivilizations,
    #[error("{0} civilizations exceed the faction index range (max 255)")]
    TooManyCivilizations(usize),
    #[error("erosion rate {0} must lie in [0, 1)")]
    BadErosionRate(f32),
    #[error("sea level {0} must be finite and non-negative")]
    BadSeaLevel(f32),
}

/// Failures of a generation run.
#[derive(Debug, Clone, Error)]
pub enum GenError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("generation cancelled between stages")]
    Cancelled,
    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: &'static str, message: String },
    #[error("worker thread panicked: {0}")]
    WorkerPanic(String),
}
