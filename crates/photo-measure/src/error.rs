use photo_measure_core::MeasureError;

/// Errors produced by the collaborator adapters and job runners.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Measure(#[from] MeasureError),

    #[error("raw depth map is constant ({value}); cannot normalize")]
    FlatDepthMap { value: f32 },

    #[error("invalid depth buffer length (expected {expected} values, got {got})")]
    InvalidDepthBuffer { expected: usize, got: usize },

    #[cfg(feature = "image")]
    #[error(transparent)]
    Image(#[from] ::image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
