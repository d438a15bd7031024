use crate::cube::CubeCoord;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building or querying terrain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// The cube lies outside the world grid.
    #[error("cube {cube} is out of bounds")]
    OutOfBounds {
        /// The offending cube coordinate.
        cube: CubeCoord,
    },

    /// An integer code does not name a known cube type.
    #[error("invalid cube type code: {0}")]
    InvalidCubeType(i32),

    /// The terrain array is empty or not box-shaped.
    #[error("invalid terrain: {0}")]
    InvalidTerrain(String),
}
