//! Core types for Hillbillies: vectors, cubes, terrain, and border connectivity.
//!
//! This crate holds no simulation state. It answers the spatial questions
//! the simulation asks every tick: which cube a position falls in, what the
//! cube is made of, and whether a unit may stand there.

/// Incremental "solid and connected to the border" tracking.
pub mod connectivity;
/// Cube types and integer cube coordinates.
pub mod cube;
/// Error types used throughout the crate.
pub mod error;
/// The terrain grid and its change listener.
pub mod terrain;
/// Real-valued 3-component vectors.
pub mod vector;

/// Re-export of [`connectivity::BorderConnectivity`].
pub use connectivity::BorderConnectivity;
/// Re-exports of cube types.
pub use cube::{CubeCoord, CubeType};
/// Re-exports of error types.
pub use error::{CoreError, CoreResult};
/// Re-exports of terrain types.
pub use terrain::{NoopListener, Terrain, TerrainChangeListener};
/// Re-exports of vector types.
pub use vector::{Axis, Vector3};
