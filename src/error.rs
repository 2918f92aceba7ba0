use thiserror::Error;

/// Everything that can go wrong while building or running an engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("no drawing surface found for container `{0}`")]
    ContainerNotFound(String),

    #[error("drawing surface is no longer available")]
    SurfaceUnavailable,

    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("initial cells do not fit the grid: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
}

impl EngineError {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_names_parameter() {
        let err = EngineError::invalid_argument("cell_size", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "invalid argument `cell_size`: must be greater than zero"
        );
    }

    #[test]
    fn test_size_mismatch_message() {
        let err = EngineError::SizeMismatch { expected: 4, actual: 3 };
        assert!(err.to_string().contains("expected 4, got 3"));
    }
}
