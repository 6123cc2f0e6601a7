//! Pipeline errors

use thiserror::Error;

/// Errors raised by the pipeline core.
///
/// `InvalidState` and `UnsupportedPrimitive` are protocol violations by the
/// caller; correct orchestration never produces them.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{component}: Invalid State/Not Initialized ({detail})")]
    InvalidState {
        component: &'static str,
        detail: &'static str,
    },

    #[error("{rasterizer} cannot rasterize a {primitive}")]
    UnsupportedPrimitive {
        rasterizer: &'static str,
        primitive: &'static str,
    },

    #[error("No {0} loaded into the render pipeline")]
    StageNotLoaded(&'static str),

    #[error("Degenerate view: {0}")]
    DegenerateView(&'static str),

    #[error("Failed to export frame: {0}")]
    Export(#[from] image::ImageError),
}

impl PipelineError {
    pub(crate) fn invalid(component: &'static str, detail: &'static str) -> Self {
        PipelineError::InvalidState { component, detail }
    }
}
