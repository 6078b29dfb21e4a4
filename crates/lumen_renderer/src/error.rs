//! Renderer errors.

use thiserror::Error;

/// Errors that can occur while setting up or driving the renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to spawn render worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Render worker {0} disconnected")]
    WorkerDisconnected(usize),

    #[error("Render worker {0} died")]
    WorkerDied(usize),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid framebuffer dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Renderer has been shut down")]
    ShutDown,
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;
