use std::fmt;

use plotters::drawing::DrawingAreaErrorKind;

/// Failure while producing one artifact. Other artifacts are unaffected.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The drawing backend rejected an operation.
    Backend(String),
    /// Artifact payload could not be encoded or decoded.
    Encode(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(msg) => write!(f, "render backend error: {msg}"),
            Self::Encode(msg) => write!(f, "artifact encoding error: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl<E> From<DrawingAreaErrorKind<E>> for RenderError
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Self::Backend(e.to_string())
    }
}
