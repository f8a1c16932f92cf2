use crate::core::devices::port_specs::{PortName, BREAKOUT_CHANNELS};
use crate::core::errors::PlanError;
use crate::core::types::{DeviceId, DeviceKind, PortFamily};
use log::debug;
use std::collections::BTreeMap;

/// Port inventory of a device, as counts per family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortCounts {
    /// Wide breakout ports (4 channels each)
    pub mpo: u32,
    /// Narrow ports
    pub lc: u32,
    /// Low-speed ports
    pub sfp: u32,
}

impl PortCounts {
    pub fn new(mpo: u32, lc: u32, sfp: u32) -> Self {
        Self { mpo, lc, sfp }
    }

    /// Build counts from untrusted signed input, rejecting negatives
    pub fn from_signed(mpo: i64, lc: i64, sfp: i64) -> Result<Self, PlanError> {
        let check = |family: PortFamily, value: i64| {
            u32::try_from(value).map_err(|_| PlanError::InvalidPortCount {
                family: family.prefix(),
                value,
            })
        };
        Ok(Self {
            mpo: check(PortFamily::Mpo, mpo)?,
            lc: check(PortFamily::Lc, lc)?,
            sfp: check(PortFamily::Sfp, sfp)?,
        })
    }

    /// Drop the counts of families the kind does not expose
    pub fn masked_for(self, kind: DeviceKind) -> Self {
        let keep = |family: PortFamily, count: u32| if kind.supports(family) { count } else { 0 };
        Self {
            mpo: keep(PortFamily::Mpo, self.mpo),
            lc: keep(PortFamily::Lc, self.lc),
            sfp: keep(PortFamily::Sfp, self.sfp),
        }
    }

    pub fn count(&self, family: PortFamily) -> u32 {
        match family {
            PortFamily::Lc => self.lc,
            PortFamily::Sfp => self.sfp,
            PortFamily::Mpo => self.mpo,
        }
    }
}

/// A device and the occupancy state of its ports
///
/// The set of ports is never stored, it is derived from the counts. The
/// occupancy map is authoritative: a port is in use iff it is a key of the map,
/// and the value is the remote device on the other end. The weighted
/// connection tally is a cache kept in quarter units (one MPO channel = 1,
/// one LC/SFP port = 4).
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    id: DeviceId,
    name: String,
    kind: DeviceKind,
    counts: PortCounts,
    occupancy: BTreeMap<PortName, DeviceId>,
    quarters: u32,
}

impl Device {
    pub(crate) fn new(id: DeviceId, name: String, kind: DeviceKind, counts: PortCounts) -> Self {
        Self {
            id,
            name,
            kind,
            counts: counts.masked_for(kind),
            occupancy: BTreeMap::new(),
            quarters: 0,
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn counts(&self) -> PortCounts {
        self.counts
    }

    /// Local port -> remote device currently attached there
    pub fn occupancy(&self) -> &BTreeMap<PortName, DeviceId> {
        &self.occupancy
    }

    /// Remote device attached to a local port, if any
    pub fn remote_of(&self, port: &PortName) -> Option<DeviceId> {
        self.occupancy.get(port).copied()
    }

    /// Weighted connection tally (an MPO channel counts as 0.25)
    pub fn connection_count(&self) -> f64 {
        f64::from(self.quarters) / 4.0
    }

    /// Whether the port physically exists on this device
    pub fn has_port(&self, port: &PortName) -> bool {
        let family = port.family();
        if !self.kind.supports(family) || port.index() == 0 || port.index() > self.counts.count(family) {
            return false;
        }
        match (family, port.channel()) {
            (PortFamily::Mpo, Some(channel)) => (1..=BREAKOUT_CHANNELS).contains(&channel),
            (PortFamily::Mpo, None) => false,
            (_, channel) => channel.is_none(),
        }
    }

    /// Every port of one family, in index then channel order
    pub fn ports_of(&self, family: PortFamily) -> Box<dyn Iterator<Item = PortName>> {
        let count = if self.kind.supports(family) {
            self.counts.count(family)
        } else {
            0
        };
        match family {
            PortFamily::Lc => Box::new((1..=count).map(PortName::lc)),
            PortFamily::Sfp => Box::new((1..=count).map(PortName::sfp)),
            PortFamily::Mpo => Box::new(
                (1..=count).flat_map(|index| (1..=BREAKOUT_CHANNELS).map(move |channel| PortName::mpo(index, channel))),
            ),
        }
    }

    /// All port names: LC ports, then SFP ports, then MPO channels
    pub fn all_possible_ports(&self) -> Vec<PortName> {
        [PortFamily::Lc, PortFamily::Sfp, PortFamily::Mpo]
            .into_iter()
            .flat_map(|family| self.ports_of(family))
            .collect()
    }

    /// All ports not currently in use, in the same order as `all_possible_ports`
    pub fn available_ports(&self) -> Vec<PortName> {
        self.all_possible_ports()
            .into_iter()
            .filter(|port| !self.occupancy.contains_key(port))
            .collect()
    }

    pub fn is_available(&self, port: &PortName) -> bool {
        self.has_port(port) && !self.occupancy.contains_key(port)
    }

    /// First free port of a family, without taking it
    pub fn first_available(&self, family: PortFamily) -> Option<PortName> {
        self.ports_of(family).find(|port| !self.occupancy.contains_key(port))
    }

    /// Mark a port as used by a link to `remote`
    ///
    /// Fails without touching any state if the port does not exist or is
    /// already taken.
    pub(crate) fn occupy(&mut self, port: PortName, remote: DeviceId) -> Result<(), PlanError> {
        if !self.is_available(&port) {
            debug!("Cannot occupy {}[{}]: missing or already in use", self.name, port);
            return Err(PlanError::unavailable(self.id, port));
        }
        self.occupancy.insert(port, remote);
        self.quarters += port.family().weight_quarters();
        debug!("Occupied {}[{}] -> {} (tally {:.2})", self.name, port, remote, self.connection_count());
        Ok(())
    }

    /// Free a port. Releasing a port that is not in use does nothing.
    pub(crate) fn release(&mut self, port: &PortName) -> Option<DeviceId> {
        let remote = self.occupancy.remove(port)?;
        self.quarters = self.quarters.saturating_sub(port.family().weight_quarters());
        debug!("Released {}[{}] (was {}, tally {:.2})", self.name, port, remote, self.connection_count());
        Some(remote)
    }

    /// Drop every occupancy entry
    pub(crate) fn reset_ports(&mut self) {
        self.occupancy.clear();
        self.quarters = 0;
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Replace the port counts. Occupancy is reset since it may reference
    /// ports that no longer exist.
    pub(crate) fn set_counts(&mut self, counts: PortCounts) {
        self.counts = counts.masked_for(self.kind);
        self.reset_ports();
    }

    /// Tally recomputed from the occupancy map
    pub(crate) fn expected_quarters(&self) -> u32 {
        self.occupancy.keys().map(|port| port.family().weight_quarters()).sum()
    }

    pub(crate) fn quarters(&self) -> u32 {
        self.quarters
    }
}

/// Mutable access to two distinct devices of a slice, in argument order
pub(crate) fn pair_mut(devices: &mut [Device], i: usize, j: usize) -> (&mut Device, &mut Device) {
    assert_ne!(i, j, "a device cannot be paired with itself");
    if i < j {
        let (head, tail) = devices.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = devices.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Occupy one port on each of two devices, or neither
///
/// If side B cannot be taken, side A is released again before the error is
/// returned.
pub(crate) fn occupy_both(a: &mut Device, port_a: PortName, b: &mut Device, port_b: PortName) -> Result<(), PlanError> {
    a.occupy(port_a, b.id())?;
    if let Err(err) = b.occupy(port_b, a.id()) {
        a.release(&port_a);
        return Err(err);
    }
    Ok(())
}
