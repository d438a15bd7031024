use std::fmt;

use serde::Serialize;

/// What a unit is currently doing.
///
/// A freshly created unit is `Idle`, which also covers the bootstrap case of
/// a unit with no activity yet: both accept every interruptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// Doing nothing.
    #[default]
    Idle,
    /// Walking or sprinting along a leg toward a neighboring cube.
    Moving,
    /// Working on a cube.
    Working,
    /// The first rest step, which only an attack can cut short.
    InitResting,
    /// Restoring stamina and hitpoints.
    Resting,
    /// Swinging at an adjacent opponent.
    Attacking,
    /// Waiting for an opponent's attack to land.
    Defending,
}

/// A request to switch activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interruptor {
    /// Start moving.
    Moving,
    /// Start working.
    Working,
    /// Start resting.
    Resting,
    /// Enter combat, as attacker or defender.
    Fighting,
}

impl Activity {
    /// Returns true if the activity may be replaced in response to `interruptor`.
    ///
    /// Working, moving and resting ignore a request to do what they already do.
    /// Combat is never interrupted.
    pub fn accepts(self, interruptor: Interruptor) -> bool {
        match self {
            Self::Idle => true,
            Self::Moving => interruptor != Interruptor::Moving,
            Self::Working => interruptor != Interruptor::Working,
            Self::Resting => interruptor != Interruptor::Resting,
            Self::InitResting => interruptor == Interruptor::Fighting,
            Self::Attacking | Self::Defending => false,
        }
    }

    /// Returns true for both rest phases.
    pub fn is_resting(self) -> bool {
        matches!(self, Self::InitResting | Self::Resting)
    }

    /// Returns true while attacking or defending.
    pub fn is_fighting(self) -> bool {
        matches!(self, Self::Attacking | Self::Defending)
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Moving => "moving",
            Self::Working => "working",
            Self::InitResting => "resting (initial)",
            Self::Resting => "resting",
            Self::Attacking => "attacking",
            Self::Defending => "defending",
        };
        f.write_str(name)
    }
}
