use std::fmt;

use crate::connectivity::BorderConnectivity;
use crate::cube::{CubeCoord, CubeType};
use crate::error::{CoreError, CoreResult};
use crate::vector::Vector3;

/// Receives a callback whenever the type of a cube changes after construction.
///
/// Implemented for any `FnMut(CubeCoord)` closure.
pub trait TerrainChangeListener {
    /// Called once per changed cube.
    fn notify_terrain_changed(&mut self, cube: CubeCoord);
}

impl<F: FnMut(CubeCoord)> TerrainChangeListener for F {
    fn notify_terrain_changed(&mut self, cube: CubeCoord) {
        self(cube)
    }
}

/// Listener that ignores all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl TerrainChangeListener for NoopListener {
    fn notify_terrain_changed(&mut self, _cube: CubeCoord) {}
}

/// The fixed-size cube grid of a world plus its connectivity oracle.
pub struct Terrain {
    nb_x: i32,
    nb_y: i32,
    nb_z: i32,
    cubes: Vec<CubeType>,
    connectivity: BorderConnectivity,
    listener: Box<dyn TerrainChangeListener>,
}

impl fmt::Debug for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terrain")
            .field("size", &(self.nb_x, self.nb_y, self.nb_z))
            .field("connected", &self.connectivity.connected_count())
            .finish()
    }
}

impl Terrain {
    /// Build a terrain from a `[x][y][z]` array of cube-type codes.
    ///
    /// The array must be non-empty and box-shaped and contain only known codes.
    pub fn new(
        codes: &[Vec<Vec<i32>>],
        listener: impl TerrainChangeListener + 'static,
    ) -> CoreResult<Self> {
        let nb_x = codes.len();
        let nb_y = codes.first().map_or(0, Vec::len);
        let nb_z = codes
            .first()
            .and_then(|plane| plane.first())
            .map_or(0, Vec::len);
        if nb_x == 0 || nb_y == 0 || nb_z == 0 {
            return Err(CoreError::InvalidTerrain(format!(
                "terrain must have a positive size, got {nb_x}x{nb_y}x{nb_z}"
            )));
        }
        for (x, plane) in codes.iter().enumerate() {
            if plane.len() != nb_y {
                return Err(CoreError::InvalidTerrain(format!(
                    "plane x={x} has {} columns, expected {nb_y}",
                    plane.len()
                )));
            }
            for (y, column) in plane.iter().enumerate() {
                if column.len() != nb_z {
                    return Err(CoreError::InvalidTerrain(format!(
                        "column ({x}, {y}) has {} cubes, expected {nb_z}",
                        column.len()
                    )));
                }
            }
        }

        let mut cubes = Vec::with_capacity(nb_x * nb_y * nb_z);
        for plane in codes {
            for column in plane {
                for code in column {
                    cubes.push(CubeType::try_from(*code)?);
                }
            }
        }
        Ok(Self::assemble(
            nb_x as i32,
            nb_y as i32,
            nb_z as i32,
            cubes,
            Box::new(listener),
        ))
    }

    /// Build a terrain of the given size by evaluating `kind_at` for every cube.
    pub fn from_fn(
        nb_x: i32,
        nb_y: i32,
        nb_z: i32,
        kind_at: impl Fn(CubeCoord) -> CubeType,
    ) -> CoreResult<Self> {
        if nb_x <= 0 || nb_y <= 0 || nb_z <= 0 {
            return Err(CoreError::InvalidTerrain(format!(
                "terrain must have a positive size, got {nb_x}x{nb_y}x{nb_z}"
            )));
        }
        let mut cubes = Vec::with_capacity((nb_x * nb_y * nb_z) as usize);
        for x in 0..nb_x {
            for y in 0..nb_y {
                for z in 0..nb_z {
                    cubes.push(kind_at(CubeCoord::new(x, y, z)));
                }
            }
        }
        Ok(Self::assemble(nb_x, nb_y, nb_z, cubes, Box::new(NoopListener)))
    }

    /// Replace the change listener.
    pub fn with_listener(mut self, listener: impl TerrainChangeListener + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    fn assemble(
        nb_x: i32,
        nb_y: i32,
        nb_z: i32,
        cubes: Vec<CubeType>,
        listener: Box<dyn TerrainChangeListener>,
    ) -> Self {
        let connectivity = BorderConnectivity::from_solids(nb_x, nb_y, nb_z, |c| {
            cubes[((c.x * nb_y + c.y) * nb_z + c.z) as usize].is_solid()
        });
        Self {
            nb_x,
            nb_y,
            nb_z,
            cubes,
            connectivity,
            listener,
        }
    }

    /// Number of cubes along x.
    pub fn nb_x(&self) -> i32 {
        self.nb_x
    }

    /// Number of cubes along y.
    pub fn nb_y(&self) -> i32 {
        self.nb_y
    }

    /// Number of cubes along z.
    pub fn nb_z(&self) -> i32 {
        self.nb_z
    }

    /// Returns true if the cube lies inside the grid.
    pub fn contains(&self, cube: CubeCoord) -> bool {
        self.connectivity.contains(cube)
    }

    /// Type of the given cube.
    pub fn cube_type(&self, cube: CubeCoord) -> CoreResult<CubeType> {
        self.index(cube)
            .map(|i| self.cubes[i])
            .ok_or(CoreError::OutOfBounds { cube })
    }

    /// Change the type of a cube, update connectivity and notify the listener.
    ///
    /// Returns the solid cubes that lost their connection to the border as a
    /// result. The caller decides what happens to them.
    pub fn set_cube_type(&mut self, cube: CubeCoord, kind: CubeType) -> CoreResult<Vec<CubeCoord>> {
        let idx = self.index(cube).ok_or(CoreError::OutOfBounds { cube })?;
        let old = std::mem::replace(&mut self.cubes[idx], kind);
        if old == kind {
            return Ok(Vec::new());
        }
        let detached = match (old.is_solid(), kind.is_solid()) {
            (true, false) => self.connectivity.change_solid_to_passable(cube),
            (false, true) => {
                self.connectivity.change_passable_to_solid(cube);
                Vec::new()
            }
            _ => Vec::new(),
        };
        self.listener.notify_terrain_changed(cube);
        if !detached.is_empty() {
            tracing::debug!(%cube, count = detached.len(), "cubes lost border support");
        }
        Ok(detached)
    }

    /// Returns true if the cube is inside the grid and passable.
    pub fn is_passable(&self, cube: CubeCoord) -> bool {
        self.index(cube).is_some_and(|i| self.cubes[i].is_passable())
    }

    /// Returns true if the cube is solid and connected to the world border.
    pub fn is_solid_connected_to_border(&self, cube: CubeCoord) -> bool {
        self.connectivity.is_solid_connected_to_border(cube)
    }

    /// Returns true if something in this cube would rest on solid ground:
    /// the cube is on the world floor or the cube below is solid and connected.
    pub fn is_supported(&self, cube: CubeCoord) -> bool {
        cube.z == 0 || self.is_solid_connected_to_border(cube.below())
    }

    /// Returns true if a unit may stand in the given cube.
    pub fn is_valid_cube(&self, cube: CubeCoord) -> bool {
        self.is_passable(cube) && self.is_supported(cube)
    }

    /// Returns true if a unit may occupy the given position.
    pub fn is_valid_position(&self, position: Vector3) -> bool {
        position.x.is_finite()
            && position.y.is_finite()
            && position.z.is_finite()
            && self.is_valid_cube(position.cube())
    }

    /// Iterate over every cube and its type.
    pub fn cubes(&self) -> impl Iterator<Item = (CubeCoord, CubeType)> + '_ {
        let (nb_y, nb_z) = (self.nb_y, self.nb_z);
        self.cubes.iter().enumerate().map(move |(i, kind)| {
            let i = i as i32;
            let cube = CubeCoord::new(i / (nb_y * nb_z), (i / nb_z) % nb_y, i % nb_z);
            (cube, *kind)
        })
    }

    /// Number of cubes of the given type.
    pub fn count(&self, kind: CubeType) -> usize {
        self.cubes.iter().filter(|k| **k == kind).count()
    }

    /// Number of solid cubes connected to the border.
    pub fn connected_count(&self) -> usize {
        self.connectivity.connected_count()
    }

    /// Every cube a unit may currently stand in.
    pub fn valid_cubes(&self) -> Vec<CubeCoord> {
        self.cubes()
            .filter(|(cube, _)| self.is_valid_cube(*cube))
            .map(|(cube, _)| cube)
            .collect()
    }

    fn index(&self, cube: CubeCoord) -> Option<usize> {
        self.contains(cube)
            .then(|| ((cube.x * self.nb_y + cube.y) * self.nb_z + cube.z) as usize)
    }
}
