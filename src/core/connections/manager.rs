use crate::core::connections::connection::Connection;
use crate::core::connections::connection_validator::{self, ConnectionValidator};
use crate::core::devices::device::{occupy_both, pair_mut};
use crate::core::devices::{Device, PortCounts, PortName};
use crate::core::errors::PlanError;
use crate::core::planning::{CapacityFiller, MeshPlan, MeshPlanner, RingPlan, RingPlanner, Topology};
use crate::core::types::{DeviceId, DeviceKind, PortFamily};
use log::{info, warn};
use rand::Rng;

/// Requested changes to a device; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceUpdate {
    pub name: Option<String>,
    pub mpo: Option<u32>,
    pub lc: Option<u32>,
    pub sfp: Option<u32>,
}

impl DeviceUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn mpo(mut self, count: u32) -> Self {
        self.mpo = Some(count);
        self
    }

    pub fn lc(mut self, count: u32) -> Self {
        self.lc = Some(count);
        self
    }

    pub fn sfp(mut self, count: u32) -> Self {
        self.sfp = Some(count);
        self
    }
}

/// What an accepted `update_device` call changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub renamed: bool,
    pub ports_changed: bool,
    /// Connections dropped because the port counts changed
    pub connections_cleared: usize,
}

/// Aggregate port counts over all devices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct PortTotals {
    pub mpo: u32,
    pub lc: u32,
    pub sfp: u32,
}

/// Owner of the devices and of the accepted connection list
///
/// The ledger is the only place where live port occupancy is mutated. Every
/// record in `connections` has a matching occupancy entry on both of its
/// devices and vice versa.
#[derive(Debug, Clone, Default)]
pub struct ConnectionLedger {
    devices: Vec<Device>,
    connections: Vec<Connection>,
    id_counter: u32,
}

impl ConnectionLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            connections: Vec::new(),
            id_counter: 0,
        }
    }

    // --- devices ---

    /// Add a device with the next free id
    pub fn add_device(&mut self, name: &str, kind: DeviceKind, counts: PortCounts) -> Result<&Device, PlanError> {
        let name = self.check_new_name(name, None)?;
        let id = self
            .id_counter
            .checked_add(1)
            .map(DeviceId::new)
            .ok_or(PlanError::IdsExhausted(DeviceId::new(self.id_counter)))?;
        if self.device(id).is_some() {
            return Err(PlanError::DuplicateId(id));
        }
        self.push_device(Device::new(id, name, kind, counts))
    }

    /// Add a device under a known id, as when restoring a saved project
    pub(crate) fn insert_device(
        &mut self,
        id: DeviceId,
        name: &str,
        kind: DeviceKind,
        counts: PortCounts,
    ) -> Result<&Device, PlanError> {
        let name = self.check_new_name(name, None)?;
        if self.device(id).is_some() {
            return Err(PlanError::DuplicateId(id));
        }
        self.push_device(Device::new(id, name, kind, counts))
    }

    fn push_device(&mut self, device: Device) -> Result<&Device, PlanError> {
        self.id_counter = self.id_counter.max(device.id().value());
        info!("Device added: {} {} ({})", device.id(), device.name(), device.kind());
        self.devices.push(device);
        let index = self.devices.len() - 1;
        Ok(&self.devices[index])
    }

    /// Validate a device name, ignoring the device being renamed
    fn check_new_name(&self, name: &str, renaming: Option<DeviceId>) -> Result<String, PlanError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlanError::EmptyName);
        }
        if self
            .devices
            .iter()
            .any(|device| device.name() == name && Some(device.id()) != renaming)
        {
            return Err(PlanError::DuplicateName(name.to_string()));
        }
        Ok(name.to_string())
    }

    /// Remove a device together with every connection that references it
    ///
    /// Returns the number of connections removed.
    pub fn remove_device(&mut self, id: DeviceId) -> Result<usize, PlanError> {
        let index = self.index_of(id)?;

        let (dropped, kept): (Vec<Connection>, Vec<Connection>) =
            std::mem::take(&mut self.connections)
                .into_iter()
                .partition(|conn| conn.involves(id));
        for conn in &dropped {
            self.release_endpoints(conn);
        }
        self.connections = kept;

        let device = self.devices.remove(index);
        info!("Device removed: {} {} ({} connection(s) dropped)", id, device.name(), dropped.len());
        Ok(dropped.len())
    }

    /// Rename a device and/or change its port counts
    ///
    /// Any change of port counts clears every connection in the ledger. When
    /// connections exist the caller has to pass `force`, otherwise nothing is
    /// changed and `ConfirmationRequired` is returned.
    pub fn update_device(&mut self, id: DeviceId, update: DeviceUpdate, force: bool) -> Result<UpdateOutcome, PlanError> {
        let index = self.index_of(id)?;
        let device = &self.devices[index];

        let new_name = match &update.name {
            Some(name) if name.trim() != device.name() => Some(self.check_new_name(name, Some(id))?),
            _ => None,
        };

        let current = device.counts();
        let requested = PortCounts::new(
            update.mpo.unwrap_or(current.mpo),
            update.lc.unwrap_or(current.lc),
            update.sfp.unwrap_or(current.sfp),
        )
        .masked_for(device.kind());
        let ports_changed = requested != current;

        if ports_changed && !self.connections.is_empty() && !force {
            return Err(PlanError::ConfirmationRequired(id));
        }

        let mut outcome = UpdateOutcome::default();
        if let Some(name) = new_name {
            info!("Device {} renamed from '{}' to '{}'", id, self.devices[index].name(), name);
            self.devices[index].set_name(name);
            outcome.renamed = true;
        }
        if ports_changed {
            outcome.connections_cleared = self.clear_connections();
            self.devices[index].set_counts(requested);
            outcome.ports_changed = true;
            info!(
                "Device {} ports set to MPO {} / LC {} / SFP {}",
                id, requested.mpo, requested.lc, requested.sfp
            );
        }
        Ok(outcome)
    }

    /// Drop every device and connection and restart id numbering
    pub fn clear_all(&mut self) {
        self.devices.clear();
        self.connections.clear();
        self.id_counter = 0;
        info!("All devices and connections cleared");
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.iter().find(|device| device.id() == id)
    }

    pub fn device_by_name(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.name() == name)
    }

    /// Display name of a device, or its id if it is gone
    pub fn device_name(&self, id: DeviceId) -> String {
        self.device(id)
            .map(|device| device.name().to_string())
            .unwrap_or_else(|| id.to_string())
    }

    /// Devices in insertion order
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Free ports of a device
    pub fn available_ports(&self, id: DeviceId) -> Result<Vec<PortName>, PlanError> {
        Ok(self.require(id)?.available_ports())
    }

    /// Port families on `local` that could be linked to `remote_port` on `remote`
    pub fn compatible_families(&self, remote: DeviceId, remote_port: &str, local: DeviceId) -> Result<Vec<PortFamily>, PlanError> {
        let remote_device = self.require(remote)?;
        let local_device = self.require(local)?;
        let port = remote_port
            .parse::<PortName>()
            .map_err(|_| PlanError::unavailable(remote, remote_port))?;
        Ok(connection_validator::compatible_families(
            remote_device.kind(),
            &port,
            local_device.kind(),
        ))
    }

    pub fn port_totals(&self) -> PortTotals {
        self.devices.iter().fold(PortTotals::default(), |mut totals, device| {
            let counts = device.counts();
            totals.mpo += counts.mpo;
            totals.lc += counts.lc;
            totals.sfp += counts.sfp;
            totals
        })
    }

    fn index_of(&self, id: DeviceId) -> Result<usize, PlanError> {
        self.devices
            .iter()
            .position(|device| device.id() == id)
            .ok_or(PlanError::UnknownDevice(id))
    }

    fn require(&self, id: DeviceId) -> Result<&Device, PlanError> {
        self.device(id).ok_or(PlanError::UnknownDevice(id))
    }

    // --- connections ---

    /// Add a manual connection after validating ports and compatibility
    ///
    /// Nothing changes when validation fails.
    pub fn add_connection(&mut self, a: DeviceId, port_a: &str, b: DeviceId, port_b: &str) -> Result<Connection, PlanError> {
        let device_a = self.require(a)?;
        let device_b = self.require(b)?;
        let (port_a, port_b, class) = ConnectionValidator::validate_link(device_a, port_a, device_b, port_b)?;
        self.commit(Connection::new(a, port_a, b, port_b, class))
    }

    /// Occupy both ends of a connection on the live devices and record it
    ///
    /// If the second side cannot be taken the first side is released before
    /// the error is returned.
    pub(crate) fn commit(&mut self, conn: Connection) -> Result<Connection, PlanError> {
        let i = self.index_of(conn.device_a)?;
        let j = self.index_of(conn.device_b)?;
        if i == j {
            return Err(PlanError::SelfLink(conn.device_a));
        }

        let (device_a, device_b) = pair_mut(&mut self.devices, i, j);
        occupy_both(device_a, conn.port_a, device_b, conn.port_b)?;

        info!("Connection added: {}", self.describe(&conn));
        self.connections.push(conn);
        Ok(conn)
    }

    /// Commit a link computed by a planner, re-checking it against the rule table
    fn commit_planned(&mut self, conn: Connection) -> Result<Connection, PlanError> {
        let kind_a = self.require(conn.device_a)?.kind();
        let kind_b = self.require(conn.device_b)?.kind();
        if connection_validator::compatible(kind_a, &conn.port_a, kind_b, &conn.port_b) != Some(conn.class) {
            return Err(PlanError::Incompatible {
                device_a: conn.device_a,
                port_a: conn.port_a.to_string(),
                device_b: conn.device_b,
                port_b: conn.port_b.to_string(),
            });
        }
        self.commit(conn)
    }

    /// Commit a batch of planned links; any failure clears the ledger
    fn commit_all(&mut self, planned: &[Connection]) -> Result<Vec<Connection>, PlanError> {
        let mut committed = Vec::with_capacity(planned.len());
        for conn in planned {
            match self.commit_planned(*conn) {
                Ok(conn) => committed.push(conn),
                Err(err) => {
                    warn!("Planned link {} rejected: {}", self.describe(conn), err);
                    self.clear_connections();
                    return Err(PlanError::CorruptedState(format!("planned link could not be committed: {}", err)));
                }
            }
        }
        Ok(committed)
    }

    /// Remove a connection given its endpoints in either order
    pub fn remove_connection(&mut self, a: DeviceId, port_a: &str, b: DeviceId, port_b: &str) -> bool {
        let (Ok(port_a), Ok(port_b)) = (port_a.parse::<PortName>(), port_b.parse::<PortName>()) else {
            return false;
        };
        let Some(index) = self
            .connections
            .iter()
            .position(|conn| conn.matches(a, &port_a, b, &port_b))
        else {
            warn!("No connection {}[{}] <-> {}[{}] to remove", a, port_a, b, port_b);
            return false;
        };

        let conn = self.connections.remove(index);
        self.release_endpoints(&conn);
        info!("Connection removed: {}", self.describe(&conn));
        true
    }

    fn release_endpoints(&mut self, conn: &Connection) {
        for (id, port) in [(conn.device_a, &conn.port_a), (conn.device_b, &conn.port_b)] {
            match self.devices.iter_mut().find(|device| device.id() == id) {
                Some(device) => {
                    device.release(port);
                }
                None => warn!("Connection endpoint {} no longer exists", id),
            }
        }
    }

    /// Drop every connection and reset every device's occupancy
    ///
    /// Returns the number of connections dropped.
    pub fn clear_connections(&mut self) -> usize {
        for device in &mut self.devices {
            device.reset_ports();
        }
        let dropped = self.connections.len();
        self.connections.clear();
        if dropped > 0 {
            info!("Cleared {} connection(s)", dropped);
        }
        dropped
    }

    /// Human readable form of a connection: `A [LC1] <-> B [LC1] (LC-LC (100G))`
    pub fn describe(&self, conn: &Connection) -> String {
        format!(
            "{} [{}] <-> {} [{}] ({})",
            self.device_name(conn.device_a),
            conn.port_a,
            self.device_name(conn.device_b),
            conn.port_b,
            conn.class
        )
    }

    // --- planning ---

    /// Replace every connection with a freshly planned mesh
    pub fn plan_mesh<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<MeshPlan, PlanError> {
        self.clear_connections();
        let plan = MeshPlanner::plan(&self.devices, rng);
        self.commit_all(&plan.connections)?;
        Ok(plan)
    }

    /// Replace every connection with a freshly planned ring
    ///
    /// With fewer than two devices nothing is touched and `TooFewDevices` is
    /// returned.
    pub fn plan_ring<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<RingPlan, PlanError> {
        if self.devices.len() < 2 {
            return Err(PlanError::TooFewDevices(self.devices.len()));
        }
        self.clear_connections();
        let plan = RingPlanner::plan(&self.devices, rng)?;
        self.commit_all(&plan.connections)?;
        Ok(plan)
    }

    /// Plan and commit for the given topology, returning the soft diagnostic
    pub fn plan<R: Rng + ?Sized>(&mut self, topology: Topology, rng: &mut R) -> Result<Option<PlanError>, PlanError> {
        match topology {
            Topology::Mesh => self.plan_mesh(rng).map(|plan| plan.diagnostic()),
            Topology::Ring => self.plan_ring(rng).map(|plan| plan.warning()),
        }
    }

    /// Add mesh-style links on top of the existing connections
    pub fn fill_mesh<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<Connection>, PlanError> {
        self.fill(Topology::Mesh, rng)
    }

    /// Add ring-style links on top of the existing connections
    pub fn fill_ring<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<Connection>, PlanError> {
        self.fill(Topology::Ring, rng)
    }

    pub fn fill<R: Rng + ?Sized>(&mut self, style: Topology, rng: &mut R) -> Result<Vec<Connection>, PlanError> {
        self.verify_integrity()?;
        let planned = CapacityFiller::fill(&self.devices, style, rng);
        self.commit_all(&planned)
    }

    // --- integrity ---

    /// Check that the connection list and the occupancy maps agree
    ///
    /// On any mismatch every connection is cleared and `CorruptedState` is
    /// returned.
    pub fn verify_integrity(&mut self) -> Result<(), PlanError> {
        match self.find_inconsistency() {
            None => Ok(()),
            Some(reason) => {
                warn!("Inconsistent connection state ({}), clearing all connections", reason);
                self.clear_connections();
                Err(PlanError::CorruptedState(reason))
            }
        }
    }

    fn find_inconsistency(&self) -> Option<String> {
        for conn in &self.connections {
            let (Some(a), Some(b)) = (self.device(conn.device_a), self.device(conn.device_b)) else {
                return Some(format!("connection references a missing device: {}", self.describe(conn)));
            };
            if a.remote_of(&conn.port_a) != Some(b.id()) || b.remote_of(&conn.port_b) != Some(a.id()) {
                return Some(format!("connection not reflected in port occupancy: {}", self.describe(conn)));
            }
        }

        let occupied: usize = self.devices.iter().map(|device| device.occupancy().len()).sum();
        if occupied != 2 * self.connections.len() {
            return Some(format!(
                "{} occupied port(s) for {} connection(s)",
                occupied,
                self.connections.len()
            ));
        }

        for device in &self.devices {
            if let Some(port) = device.occupancy().keys().find(|port| !device.has_port(port)) {
                return Some(format!("{} has occupied port {} outside its inventory", device.name(), port));
            }
            if device.quarters() != device.expected_quarters() {
                return Some(format!("{} connection tally out of sync", device.name()));
            }
        }
        None
    }

    #[cfg(test)]
    pub(crate) fn device_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        self.devices.iter_mut().find(|device| device.id() == id)
    }
}
