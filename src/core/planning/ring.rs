use crate::core::connections::Connection;
use crate::core::devices::Device;
use crate::core::errors::PlanError;
use crate::core::planning::mesh::MeshPlanner;
use crate::core::planning::pair_order::ring_segments;
use crate::core::planning::selector::Snapshot;
use crate::core::types::DeviceId;
use log::{info, warn};
use rand::Rng;

/// Result of a ring computation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingPlan {
    pub connections: Vec<Connection>,
    /// Ring segments (in cycle order) that got no link
    pub unfulfilled_segments: Vec<(DeviceId, DeviceId)>,
}

impl RingPlan {
    /// Soft warning when the ring is only partial
    pub fn warning(&self) -> Option<PlanError> {
        if self.unfulfilled_segments.is_empty() {
            None
        } else {
            Some(PlanError::UnresolvedTopology(self.unfulfilled_segments.clone()))
        }
    }

    pub fn is_complete(&self) -> bool {
        self.unfulfilled_segments.is_empty()
    }
}

/// Single-cycle ring planner, devices ordered by ascending id
pub struct RingPlanner;

impl RingPlanner {
    /// Plan a ring over copies of `devices` with every port free
    ///
    /// Each segment gets exactly one placement attempt. Two devices degrade to
    /// a mesh plan; fewer than two is an error.
    pub fn plan<R: Rng + ?Sized>(devices: &[Device], rng: &mut R) -> Result<RingPlan, PlanError> {
        match devices.len() {
            0 | 1 => return Err(PlanError::TooFewDevices(devices.len())),
            2 => {
                let mesh = MeshPlanner::plan(devices, rng);
                return Ok(RingPlan {
                    connections: mesh.connections,
                    unfulfilled_segments: mesh.unresolved_pairs,
                });
            }
            _ => {}
        }

        let mut snapshot = Snapshot::fresh(devices);
        let mut plan = RingPlan::default();

        for (i, j) in ring_segments(snapshot.len()) {
            match snapshot.try_link(i, j) {
                Some(conn) => plan.connections.push(conn),
                None => {
                    let segment = (snapshot.device(i).id(), snapshot.device(j).id());
                    warn!(
                        "No ring link possible between {} and {}",
                        snapshot.device(i).name(),
                        snapshot.device(j).name()
                    );
                    plan.unfulfilled_segments.push(segment);
                }
            }
        }

        info!(
            "Ring plan: {} links, {} unfulfilled segment(s)",
            plan.connections.len(),
            plan.unfulfilled_segments.len()
        );
        Ok(plan)
    }
}
