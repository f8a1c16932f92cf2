use crate::core::connections::Connection;
use crate::core::devices::Device;
use crate::core::planning::config::Topology;
use crate::core::planning::mesh::fill_passes;
use crate::core::planning::pair_order::{all_pairs, ring_segments};
use crate::core::planning::selector::Snapshot;
use log::info;
use rand::Rng;

/// Tops up remaining capacity on top of the current occupancy
pub struct CapacityFiller;

impl CapacityFiller {
    /// Compute extra links against a copy of the live devices
    ///
    /// Mesh style considers every pair, ring style only the adjacent pairs of
    /// the id-ordered cycle. Either way full passes are repeated in shuffled
    /// order until a pass adds nothing. The returned links still have to be
    /// committed by the ledger.
    pub fn fill<R: Rng + ?Sized>(devices: &[Device], style: Topology, rng: &mut R) -> Vec<Connection> {
        if devices.len() < 2 {
            return Vec::new();
        }

        let mut snapshot = Snapshot::live(devices);
        let mut pairs = match style {
            Topology::Mesh => all_pairs(snapshot.len()),
            Topology::Ring => ring_segments(snapshot.len()),
        };

        let connections = fill_passes(&mut snapshot, &mut pairs, rng);
        info!("Fill ({}) found {} additional link(s)", style, connections.len());
        connections
    }
}
