/// Configuration for a simulated world.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// Maximum number of live units in the world.
    pub max_units: usize,
    /// Number of factions created before new units join existing ones.
    pub max_factions: usize,
    /// Maximum number of members per faction.
    pub max_faction_size: usize,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_units: 100,
            max_factions: 5,
            max_faction_size: 50,
            max_events: 0,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the maximum number of live units.
    pub fn with_max_units(mut self, max: usize) -> Self {
        self.max_units = max;
        self
    }

    /// Set the number of factions to create before balancing.
    pub fn with_max_factions(mut self, max: usize) -> Self {
        self.max_factions = max;
        self
    }

    /// Set the membership cap of each faction.
    pub fn with_max_faction_size(mut self, max: usize) -> Self {
        self.max_faction_size = max;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }
}
