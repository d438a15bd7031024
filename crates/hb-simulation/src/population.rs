//! Spawning units and keeping factions balanced.

use hb_core::{CubeCoord, Terrain};
use rand::Rng;
use rand::rngs::StdRng;

use crate::error::{SimError, SimResult};
use crate::event::SimEventKind;
use crate::faction::{Faction, FactionId};
use crate::unit::{
    Attributes, MAX_INITIAL_ATTRIBUTE, MIN_INITIAL_ATTRIBUTE, Unit, UnitId, min_weight,
};
use crate::world::World;

/// Names handed out to spawned units.
pub const NAME_ROSTER: [&str; 16] = [
    "Billy Bob",
    "Jolene",
    "Cletus",
    "Earl",
    "Daisy Mae",
    "Jethro",
    "Ellie May",
    "Hank",
    "Loretta",
    "Otis",
    "Bubba",
    "Mabel",
    "Rufus",
    "Dolly",
    "Zeke",
    "Ada",
];

/// Random probes before falling back to a full scan of the terrain.
pub const POSITION_ATTEMPTS: usize = 100;

/// A uniformly chosen cube a unit may stand in.
pub fn random_valid_cube(terrain: &Terrain, rng: &mut StdRng) -> Option<CubeCoord> {
    for _ in 0..POSITION_ATTEMPTS {
        let cube = CubeCoord::new(
            rng.random_range(0..terrain.nb_x()),
            rng.random_range(0..terrain.nb_y()),
            rng.random_range(0..terrain.nb_z()),
        );
        if terrain.is_valid_cube(cube) {
            return Some(cube);
        }
    }
    let valid = terrain.valid_cubes();
    if valid.is_empty() {
        return None;
    }
    Some(valid[rng.random_range(0..valid.len())])
}

/// Attributes drawn uniformly from the initial range, weight kept legal.
pub fn random_attributes(rng: &mut StdRng) -> Attributes {
    let mut draw = || rng.random_range(MIN_INITIAL_ATTRIBUTE..=MAX_INITIAL_ATTRIBUTE);
    let strength = draw();
    let agility = draw();
    let toughness = draw();
    let weight = draw().max(min_weight(strength, agility));
    Attributes::new(weight, strength, agility, toughness)
}

impl World {
    /// Spawn a unit with random attributes and name at a random valid cube.
    pub fn spawn_unit(&mut self, default_behavior: bool) -> SimResult<UnitId> {
        self.ensure_room()?;
        let attributes = random_attributes(&mut self.rng);
        let name = NAME_ROSTER[self.rng.random_range(0..NAME_ROSTER.len())];
        let cube =
            random_valid_cube(&self.terrain, &mut self.rng).ok_or(SimError::NoValidPosition)?;
        self.create_unit(name, cube, attributes, default_behavior)
    }

    /// Create a unit at `cube` and assign it a faction.
    pub fn create_unit(
        &mut self,
        name: impl Into<String>,
        cube: CubeCoord,
        attributes: Attributes,
        default_behavior: bool,
    ) -> SimResult<UnitId> {
        self.ensure_room()?;
        let id = UnitId(self.next_unit_id);
        let unit = Unit::new(id, name, cube, attributes, default_behavior, &self.terrain)?;
        self.add_unit(unit)
    }

    fn add_unit(&mut self, mut unit: Unit) -> SimResult<UnitId> {
        self.ensure_room()?;
        let id = unit.id;
        let faction = self.assign_faction()?;
        self.factions.add_member(faction, id)?;
        unit.faction = Some(faction);
        self.next_unit_id = self.next_unit_id.max(id.0 + 1);
        tracing::info!(unit = %id, name = %unit.name, %faction, cube = %unit.cube(), "unit spawned");
        let description = format!("{} joined {faction}", unit.name);
        self.units.insert(id, unit);
        self.push_event(SimEventKind::UnitSpawned { unit: id, faction }, description);
        Ok(id)
    }

    fn ensure_room(&self) -> SimResult<()> {
        let max = self.config.max_units;
        if self.units().count() >= max {
            return Err(SimError::PopulationFull { max });
        }
        Ok(())
    }

    /// Found a new faction while there are fewer than the configured number,
    /// otherwise pick the smallest one.
    fn assign_faction(&mut self) -> SimResult<FactionId> {
        match self.factions.smallest() {
            Some(id) if self.factions.len() >= self.config.max_factions => {
                if self.factions.get(id).is_some_and(Faction::is_full) {
                    Err(SimError::FactionFull(id))
                } else {
                    Ok(id)
                }
            }
            _ => {
                let id = self.factions.create();
                self.push_event(SimEventKind::FactionCreated { faction: id }, format!("{id} founded"));
                Ok(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hb_core::CubeType;
    use rand::SeedableRng;

    use super::*;
    use crate::config::SimConfig;
    use crate::unit::validate_name;

    fn terrain() -> Terrain {
        Terrain::from_fn(10, 10, 4, |c| match (c.x, c.y, c.z) {
            (_, _, 0) => CubeType::Rock,
            (3..=5, 3..=5, 1) => CubeType::Rock,
            _ => CubeType::Air,
        })
        .unwrap()
    }

    #[test]
    fn roster_names_are_valid() {
        for name in NAME_ROSTER {
            assert!(validate_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn random_attributes_are_legal() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let a = random_attributes(&mut rng);
            for v in [a.strength, a.agility, a.toughness, a.weight] {
                assert!((MIN_INITIAL_ATTRIBUTE..=MAX_INITIAL_ATTRIBUTE).contains(&v));
            }
            assert!(a.weight >= min_weight(a.strength, a.agility));
            assert_eq!(a.initial(), a);
        }
    }

    #[test]
    fn random_cube_is_valid() {
        let terrain = terrain();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            let cube = random_valid_cube(&terrain, &mut rng).unwrap();
            assert!(terrain.is_valid_cube(cube));
        }
        let solid = Terrain::from_fn(3, 3, 1, |_| CubeType::Rock).unwrap();
        assert_eq!(random_valid_cube(&solid, &mut rng), None);
    }

    #[test]
    fn spawned_units_fill_five_factions_then_balance() {
        let mut w = World::new(terrain(), SimConfig::default());
        for _ in 0..12 {
            w.spawn_unit(false).unwrap();
        }
        assert_eq!(w.active_factions().len(), 5);
        let sizes: Vec<usize> = w.active_factions().iter().map(|f| f.len()).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2, 2]);
        for unit in w.units() {
            let faction = unit.faction().unwrap();
            assert!(w.factions().get(faction).unwrap().contains(unit.id()));
            assert!(w.is_valid_position(unit.position()));
        }
    }

    #[test]
    fn population_is_capped() {
        let mut w = World::new(terrain(), SimConfig::default().with_max_units(3));
        for _ in 0..3 {
            w.spawn_unit(false).unwrap();
        }
        assert_eq!(w.spawn_unit(false), Err(SimError::PopulationFull { max: 3 }));
        assert!(matches!(
            w.create_unit("Extra", CubeCoord::new(0, 0, 1), Attributes::new(50, 50, 50, 50), false),
            Err(SimError::PopulationFull { .. })
        ));
    }

    #[test]
    fn full_faction_rejects_newcomers() {
        let config = SimConfig::default()
            .with_max_factions(1)
            .with_max_faction_size(2);
        let mut w = World::new(terrain(), config);
        w.spawn_unit(false).unwrap();
        w.spawn_unit(false).unwrap();
        assert!(matches!(w.spawn_unit(false), Err(SimError::FactionFull(_))));
        assert_eq!(w.units().count(), 2);
    }

    #[test]
    fn spawning_is_deterministic_per_seed() {
        let names = |seed| {
            let mut w = World::new(terrain(), SimConfig::default().with_seed(seed));
            (0..5)
                .map(|_| {
                    let id = w.spawn_unit(false).unwrap();
                    let u = w.unit(id).unwrap();
                    (u.name().to_string(), u.cube(), u.attributes())
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(names(9), names(9));
    }

    #[test]
    fn construction_failure_leaves_no_trace() {
        let mut w = World::new(terrain(), SimConfig::default());
        assert!(
            w.create_unit("lowercase", CubeCoord::new(0, 0, 1), Attributes::new(50, 50, 50, 50), false)
                .is_err()
        );
        assert!(w.factions().is_empty());
        assert_eq!(w.units().count(), 0);
    }
}
