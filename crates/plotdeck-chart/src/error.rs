use std::path::PathBuf;

use thiserror::Error;

/// Failures in the synthesis pipeline.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The generated statements raised during evaluation.
    #[error("failed evaluating generated plotting code: {0}")]
    Eval(String),

    /// The recorded commands could not be rendered.
    #[error("chart rendering failed: {0}")]
    Render(String),

    /// Both the generated code and the deterministic fallback failed;
    /// carries both failure messages for the caller.
    #[error("both generated and fallback plots failed.\nOriginal error: {primary}\nFallback error: {fallback}")]
    ExecutionFailed { primary: String, fallback: String },

    /// Execution reported success but the artifact is not on disk.
    #[error("plot file was not generated: {}", .0.display())]
    ArtifactMissing(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
