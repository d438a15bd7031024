//! Incrementally maintained "solid and connected to the world border" oracle.
//!
//! Two solid cubes are linked when they share a face. A solid cube is
//! connected when a chain of linked solid cubes leads from it to any cube on
//! the outer shell of the grid. Queries are O(1) lookups; updates only walk
//! the component around the changed cube.

use std::collections::{HashSet, VecDeque};

use crate::cube::CubeCoord;

/// Connectivity state for every cube of a fixed-size grid.
#[derive(Debug, Clone)]
pub struct BorderConnectivity {
    nb_x: i32,
    nb_y: i32,
    nb_z: i32,
    solid: Vec<bool>,
    connected: Vec<bool>,
}

impl BorderConnectivity {
    /// Create a grid of the given size where every cube is passable.
    pub fn new(nb_x: i32, nb_y: i32, nb_z: i32) -> Self {
        let len = (nb_x.max(0) * nb_y.max(0) * nb_z.max(0)) as usize;
        Self {
            nb_x,
            nb_y,
            nb_z,
            solid: vec![false; len],
            connected: vec![false; len],
        }
    }

    /// Create a grid whose solid cubes are given by `is_solid`, seeding the
    /// connected set by flooding inward from every solid border cube.
    pub fn from_solids(
        nb_x: i32,
        nb_y: i32,
        nb_z: i32,
        is_solid: impl Fn(CubeCoord) -> bool,
    ) -> Self {
        let mut this = Self::new(nb_x, nb_y, nb_z);
        let mut seeds = Vec::new();
        for x in 0..nb_x {
            for y in 0..nb_y {
                for z in 0..nb_z {
                    let cube = CubeCoord::new(x, y, z);
                    if is_solid(cube) {
                        let idx = this.flat(cube);
                        this.solid[idx] = true;
                        if this.is_border(cube) {
                            seeds.push(cube);
                        }
                    }
                }
            }
        }
        for seed in seeds {
            if !this.connected[this.flat(seed)] {
                this.flood_connect(seed);
            }
        }
        this
    }

    /// Returns true if the cube lies inside the grid.
    pub fn contains(&self, cube: CubeCoord) -> bool {
        (0..self.nb_x).contains(&cube.x)
            && (0..self.nb_y).contains(&cube.y)
            && (0..self.nb_z).contains(&cube.z)
    }

    /// Returns true if the cube lies on the outer shell of the grid.
    pub fn is_border(&self, cube: CubeCoord) -> bool {
        self.contains(cube)
            && (cube.x == 0
                || cube.y == 0
                || cube.z == 0
                || cube.x == self.nb_x - 1
                || cube.y == self.nb_y - 1
                || cube.z == self.nb_z - 1)
    }

    /// Returns true if the cube is solid. Out-of-bounds cubes are not.
    pub fn is_solid(&self, cube: CubeCoord) -> bool {
        self.index(cube).is_some_and(|i| self.solid[i])
    }

    /// Returns true if the cube is solid and linked to the border.
    pub fn is_solid_connected_to_border(&self, cube: CubeCoord) -> bool {
        self.index(cube).is_some_and(|i| self.connected[i])
    }

    /// Number of solid cubes currently connected to the border.
    pub fn connected_count(&self) -> usize {
        self.connected.iter().filter(|c| **c).count()
    }

    /// Mark a passable cube as solid, connecting it (and any floating solid
    /// cubes it now links up) if it touches the border or a connected cube.
    pub fn change_passable_to_solid(&mut self, cube: CubeCoord) {
        let Some(idx) = self.index(cube) else {
            return;
        };
        if self.solid[idx] {
            return;
        }
        self.solid[idx] = true;
        let anchored = self.is_border(cube)
            || cube
                .face_neighbors()
                .iter()
                .any(|n| self.is_solid_connected_to_border(*n));
        if anchored {
            self.flood_connect(cube);
        }
    }

    /// Mark a solid cube as passable. Returns every other cube that lost its
    /// link to the border as a consequence.
    pub fn change_solid_to_passable(&mut self, cube: CubeCoord) -> Vec<CubeCoord> {
        let Some(idx) = self.index(cube) else {
            return Vec::new();
        };
        if !self.solid[idx] {
            return Vec::new();
        }
        self.solid[idx] = false;
        let was_connected = std::mem::replace(&mut self.connected[idx], false);
        if !was_connected {
            return Vec::new();
        }

        let mut settled: HashSet<CubeCoord> = HashSet::new();
        let mut detached = Vec::new();
        for neighbor in cube.face_neighbors() {
            if !self.is_solid_connected_to_border(neighbor) || settled.contains(&neighbor) {
                continue;
            }
            let (anchored, component) = self.search_border(neighbor, &settled);
            if anchored {
                settled.extend(component);
            } else {
                for c in component {
                    let i = self.flat(c);
                    self.connected[i] = false;
                    detached.push(c);
                }
            }
        }
        detached
    }

    /// Walk connected solid cubes from `start` until the border (or a cube
    /// already known to be anchored) is found.
    fn search_border(
        &self,
        start: CubeCoord,
        settled: &HashSet<CubeCoord>,
    ) -> (bool, Vec<CubeCoord>) {
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut order = vec![start];

        while let Some(current) = queue.pop_front() {
            if self.is_border(current) || settled.contains(&current) {
                return (true, order);
            }
            for n in current.face_neighbors() {
                if self.is_solid_connected_to_border(n) && visited.insert(n) {
                    order.push(n);
                    queue.push_back(n);
                }
            }
        }
        (false, order)
    }

    /// Mark `start` and every unconnected solid cube reachable from it as connected.
    fn flood_connect(&mut self, start: CubeCoord) {
        let idx = self.flat(start);
        self.connected[idx] = true;
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for n in current.face_neighbors() {
                if let Some(i) = self.index(n)
                    && self.solid[i]
                    && !self.connected[i]
                {
                    self.connected[i] = true;
                    queue.push_back(n);
                }
            }
        }
    }

    fn index(&self, cube: CubeCoord) -> Option<usize> {
        self.contains(cube).then(|| self.flat(cube))
    }

    fn flat(&self, cube: CubeCoord) -> usize {
        ((cube.x * self.nb_y + cube.y) * self.nb_z + cube.z) as usize
    }
}
