use hb_core::{CoreError, CubeCoord, Vector3};

use crate::faction::FactionId;
use crate::unit::UnitId;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by units, the world, and the population manager.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// A terrain query or update failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The position is outside the world or not a valid place to stand.
    #[error("position {0} is not a valid position")]
    OutOfBounds(Vector3),

    /// The name does not satisfy the unit name grammar.
    #[error("invalid unit name: {0:?}")]
    InvalidName(String),

    /// The time step is negative or too large.
    #[error("invalid duration {0}: must be in [0, 0.2)")]
    InvalidDuration(f64),

    /// No unit with the given id exists.
    #[error("unit not found: {0}")]
    UnitNotFound(UnitId),

    /// The unit is dead and cannot act.
    #[error("unit {0} is dead")]
    UnitDead(UnitId),

    /// The two units are not in neighboring cubes.
    #[error("units {a} and {b} are not adjacent")]
    NotAdjacent {
        /// The acting unit.
        a: UnitId,
        /// The unit it tried to reach.
        b: UnitId,
    },

    /// A work target lies too far from the unit.
    #[error("cube {cube} is not adjacent to the unit")]
    CubeNotAdjacent {
        /// The requested cube.
        cube: CubeCoord,
    },

    /// A unit tried to attack itself.
    #[error("unit {0} cannot attack itself")]
    SelfAttack(UnitId),

    /// Both units belong to the same faction.
    #[error("units {a} and {b} belong to the same faction")]
    SameFaction {
        /// The acting unit.
        a: UnitId,
        /// The unit it tried to attack.
        b: UnitId,
    },

    /// The faction has no room for another member.
    #[error("faction {0} is full")]
    FactionFull(FactionId),

    /// The world already holds the maximum number of live units.
    #[error("population limit of {max} units reached")]
    PopulationFull {
        /// The configured unit cap.
        max: usize,
    },

    /// No cube in the world is a valid place to stand.
    #[error("no valid position available")]
    NoValidPosition,
}
