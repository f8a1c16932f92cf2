use crate::core::connections::Connection;
use crate::core::devices::Device;
use crate::core::errors::PlanError;
use crate::core::planning::pair_order::all_pairs;
use crate::core::planning::selector::Snapshot;
use crate::core::types::DeviceId;
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Result of a mesh computation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshPlan {
    /// Accepted links, first-contact links first
    pub connections: Vec<Connection>,
    /// Device pairs (lower id first) that never got a first link
    pub unresolved_pairs: Vec<(DeviceId, DeviceId)>,
    /// How many of `connections` came from the first-contact phase
    pub first_contact_links: usize,
}

impl MeshPlan {
    /// Soft warning when some pairs could not be connected
    pub fn diagnostic(&self) -> Option<PlanError> {
        if self.unresolved_pairs.is_empty() {
            None
        } else {
            Some(PlanError::UnresolvedTopology(self.unresolved_pairs.clone()))
        }
    }
}

/// Best-effort full mesh planner
pub struct MeshPlanner;

impl MeshPlanner {
    /// Plan a mesh over copies of `devices` with every port free
    ///
    /// Phase 1 gives every pair one link, rescanning until a scan makes no
    /// progress. Phase 2 then spends the remaining capacity on any pair,
    /// shuffling pair order on every pass.
    pub fn plan<R: Rng + ?Sized>(devices: &[Device], rng: &mut R) -> MeshPlan {
        if devices.len() < 2 {
            return MeshPlan::default();
        }

        let mut snapshot = Snapshot::fresh(devices);
        let mut pairs = all_pairs(snapshot.len());

        let (mut connections, contacted) = first_contact(&mut snapshot, &pairs);
        let first_contact_links = connections.len();
        debug!("Mesh phase 1 made {} first-contact links over {} pairs", first_contact_links, pairs.len());

        let unresolved_pairs: Vec<(DeviceId, DeviceId)> = pairs
            .iter()
            .filter(|pair| !contacted.contains(*pair))
            .map(|&(i, j)| (snapshot.device(i).id(), snapshot.device(j).id()))
            .collect();
        if !unresolved_pairs.is_empty() {
            warn!("Mesh phase 1 left {} pair(s) without a link", unresolved_pairs.len());
        }

        connections.extend(fill_passes(&mut snapshot, &mut pairs, rng));
        info!(
            "Mesh plan: {} links ({} first contact), {} unresolved pair(s)",
            connections.len(),
            first_contact_links,
            unresolved_pairs.len()
        );

        MeshPlan {
            connections,
            unresolved_pairs,
            first_contact_links,
        }
    }
}

/// Give each not-yet-contacted pair one link, repeating full scans until a
/// scan adds nothing
fn first_contact(snapshot: &mut Snapshot, pairs: &[(usize, usize)]) -> (Vec<Connection>, HashSet<(usize, usize)>) {
    let mut connections = Vec::new();
    let mut contacted = HashSet::new();

    loop {
        let mut progress = false;
        for &(i, j) in pairs {
            if contacted.contains(&(i, j)) {
                continue;
            }
            if let Some(conn) = snapshot.try_link(i, j) {
                connections.push(conn);
                contacted.insert((i, j));
                progress = true;
            }
        }
        if !progress {
            break;
        }
    }
    (connections, contacted)
}

/// Link any pair that still has compatible capacity, shuffling the pair order
/// on every full pass, until a pass adds nothing
pub(crate) fn fill_passes<R: Rng + ?Sized>(
    snapshot: &mut Snapshot,
    pairs: &mut [(usize, usize)],
    rng: &mut R,
) -> Vec<Connection> {
    let mut connections = Vec::new();
    let mut pass = 0;

    loop {
        pass += 1;
        pairs.shuffle(rng);
        let before = connections.len();
        for &(i, j) in pairs.iter() {
            if let Some(conn) = snapshot.try_link(i, j) {
                connections.push(conn);
            }
        }
        debug!("Fill pass {} added {} link(s)", pass, connections.len() - before);
        if connections.len() == before {
            break;
        }
    }
    connections
}
