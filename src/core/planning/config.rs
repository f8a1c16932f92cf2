//! Configuration for link planning
//!
//! Holds the target topology and the seed of the random source used to
//! shuffle pair order between passes.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Environment variable read by `PlannerConfig::from_env`
pub const ENV_LINKPLAN_SEED: &str = "LINKPLAN_SEED";

/// Target shape of the fabric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Every device linked to every other device at least once
    Mesh,
    /// Devices linked in a single cycle ordered by id
    Ring,
}

impl Default for Topology {
    fn default() -> Self {
        Topology::Mesh
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Topology::Mesh => "mesh",
            Topology::Ring => "ring",
        })
    }
}

/// Configuration for a planning run
#[derive(Debug, Clone, Default)]
pub struct PlannerConfig {
    /// Shape to plan for
    pub topology: Topology,
    /// Fixed seed for reproducible shuffles; fresh entropy when `None`
    pub seed: Option<u64>,
}

impl PlannerConfig {
    /// Create a configuration planning a mesh with an unseeded random source
    pub fn new() -> Self {
        Self {
            topology: Topology::default(),
            seed: None,
        }
    }

    /// Start from defaults, taking the seed from `LINKPLAN_SEED` when it is set
    /// to a valid integer
    pub fn from_env() -> Self {
        let seed = std::env::var(ENV_LINKPLAN_SEED).ok().and_then(|s| s.trim().parse::<u64>().ok());
        Self {
            seed,
            ..Self::new()
        }
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    /// Pin the random source so repeated runs produce the same plan
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Random source for the planners
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
