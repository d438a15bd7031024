use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::vector::Vector3;

/// The terrain type of a single cube.
///
/// The integer codes match the terrain file format: 0 = air, 1 = rock,
/// 2 = tree, 3 = workshop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CubeType {
    /// Empty space.
    #[default]
    Air,
    /// Solid rock; can be mined.
    Rock,
    /// A tree; solid, can be felled.
    Tree,
    /// A workshop; passable, used to upgrade equipment.
    Workshop,
}

impl CubeType {
    /// All cube types in code order.
    pub const ALL: [CubeType; 4] = [
        CubeType::Air,
        CubeType::Rock,
        CubeType::Tree,
        CubeType::Workshop,
    ];

    /// Integer code of this type.
    pub fn code(self) -> i32 {
        match self {
            Self::Air => 0,
            Self::Rock => 1,
            Self::Tree => 2,
            Self::Workshop => 3,
        }
    }

    /// Units and objects may occupy passable cubes.
    pub fn is_passable(self) -> bool {
        matches!(self, Self::Air | Self::Workshop)
    }

    /// Solid cubes block movement and can support what stands on them.
    pub fn is_solid(self) -> bool {
        !self.is_passable()
    }
}

impl TryFrom<i32> for CubeType {
    type Error = CoreError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Air),
            1 => Ok(Self::Rock),
            2 => Ok(Self::Tree),
            3 => Ok(Self::Workshop),
            other => Err(CoreError::InvalidCubeType(other)),
        }
    }
}

impl fmt::Display for CubeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Air => write!(f, "air"),
            Self::Rock => write!(f, "rock"),
            Self::Tree => write!(f, "tree"),
            Self::Workshop => write!(f, "workshop"),
        }
    }
}

/// Integer coordinate of a cube in the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CubeCoord {
    /// The x index.
    pub x: i32,
    /// The y index.
    pub y: i32,
    /// The z index (0 is the world floor).
    pub z: i32,
}

impl CubeCoord {
    /// Create a cube coordinate.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Position of the center of this cube.
    pub fn center(self) -> Vector3 {
        Vector3::new(
            f64::from(self.x) + 0.5,
            f64::from(self.y) + 0.5,
            f64::from(self.z) + 0.5,
        )
    }

    /// The cube displaced by the given offsets.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The cube directly below this one.
    pub fn below(self) -> Self {
        self.offset(0, 0, -1)
    }

    /// The six cubes sharing a face with this one.
    pub fn face_neighbors(self) -> [CubeCoord; 6] {
        [
            self.offset(-1, 0, 0),
            self.offset(1, 0, 0),
            self.offset(0, -1, 0),
            self.offset(0, 1, 0),
            self.offset(0, 0, -1),
            self.offset(0, 0, 1),
        ]
    }

    /// The 26 cubes sharing a face, edge or corner with this one.
    pub fn neighbors(self) -> Vec<CubeCoord> {
        let mut out = Vec::with_capacity(26);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if dx != 0 || dy != 0 || dz != 0 {
                        out.push(self.offset(dx, dy, dz));
                    }
                }
            }
        }
        out
    }

    /// Euclidean distance between the two cubes' centers.
    pub fn distance(self, other: Self) -> f64 {
        self.center().distance(other.center())
    }

    /// Unit step (-1, 0 or 1 per axis) from this cube toward `target`.
    pub fn step_toward(self, target: Self) -> (i32, i32, i32) {
        (
            (target.x - self.x).signum(),
            (target.y - self.y).signum(),
            (target.z - self.z).signum(),
        )
    }
}

impl fmt::Display for CubeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<[i32; 3]> for CubeCoord {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_type_codes_round_trip() {
        for kind in CubeType::ALL {
            assert_eq!(CubeType::try_from(kind.code()).unwrap(), kind);
        }
        assert!(matches!(
            CubeType::try_from(7),
            Err(CoreError::InvalidCubeType(7))
        ));
    }

    #[test]
    fn passability() {
        assert!(CubeType::Air.is_passable());
        assert!(CubeType::Workshop.is_passable());
        assert!(CubeType::Rock.is_solid());
        assert!(CubeType::Tree.is_solid());
    }

    #[test]
    fn neighbor_counts() {
        let c = CubeCoord::new(5, 5, 5);
        assert_eq!(c.neighbors().len(), 26);
        assert!(!c.neighbors().contains(&c));
        assert!(c.face_neighbors().iter().all(|n| c.distance(*n) == 1.0));
    }

    #[test]
    fn step_toward_signs() {
        let from = CubeCoord::new(5, 5, 5);
        assert_eq!(from.step_toward(CubeCoord::new(9, 5, 0)), (1, 0, -1));
        assert_eq!(from.step_toward(from), (0, 0, 0));
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&CubeType::Workshop).unwrap();
        assert_eq!(json, "\"workshop\"");
    }
}
