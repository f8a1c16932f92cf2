use crate::core::connections::{Connection, LinkClass};
use crate::core::devices::device::{occupy_both, pair_mut};
use crate::core::devices::{Device, PortName};
use log::{debug, warn};

/// A link picked between two device snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkCandidate {
    pub port_a: PortName,
    pub port_b: PortName,
    pub class: LinkClass,
}

/// Pick and take the highest-priority link still possible between two devices
///
/// Link classes are tried in `LinkClass::PRIORITY` order. For each class the
/// first free port of the right family is probed on both sides before either
/// is occupied. If the second side cannot be taken the first side is released
/// again and the next class is tried. Both devices are mutated, so callers pass
/// private copies.
pub fn select_link(a: &mut Device, b: &mut Device) -> Option<LinkCandidate> {
    let groups = (a.kind().group(), b.kind().group());

    for class in LinkClass::PRIORITY {
        let Some((family_a, family_b)) = class.families_for(groups.0, groups.1) else {
            continue;
        };
        let Some(port_a) = a.first_available(family_a) else {
            continue;
        };
        let Some(port_b) = b.first_available(family_b) else {
            continue;
        };

        if let Err(err) = occupy_both(a, port_a, b, port_b) {
            warn!("Probed ports {}[{}] / {}[{}] could not be taken: {}", a.name(), port_a, b.name(), port_b, err);
            continue;
        }

        debug!("Selected {}[{}] <-> {}[{}] ({})", a.name(), port_a, b.name(), port_b, class);
        return Some(LinkCandidate { port_a, port_b, class });
    }
    None
}

/// Private working copy of the devices a planner explores
///
/// Devices are kept sorted by id so pair and ring orders are stable.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    devices: Vec<Device>,
}

impl Snapshot {
    /// Copy of the devices with every port free
    pub(crate) fn fresh(devices: &[Device]) -> Self {
        let mut snapshot = Self::live(devices);
        for device in &mut snapshot.devices {
            device.reset_ports();
        }
        snapshot
    }

    /// Copy of the devices keeping their current occupancy
    pub(crate) fn live(devices: &[Device]) -> Self {
        let mut devices = devices.to_vec();
        devices.sort_by_key(|device| device.id());
        Self { devices }
    }

    pub(crate) fn len(&self) -> usize {
        self.devices.len()
    }

    pub(crate) fn device(&self, index: usize) -> &Device {
        &self.devices[index]
    }

    /// Run the selector between the devices at two distinct indices
    pub(crate) fn try_link(&mut self, i: usize, j: usize) -> Option<Connection> {
        let (a, b) = pair_mut(&mut self.devices, i, j);
        select_link(a, b).map(|link| Connection::new(a.id(), link.port_a, b.id(), link.port_b, link.class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::devices::PortCounts;
    use crate::core::types::{DeviceId, DeviceKind, PortFamily};

    fn device(id: u32, kind: DeviceKind, mpo: u32, lc: u32, sfp: u32) -> Device {
        Device::new(DeviceId::new(id), format!("dev{}", id), kind, PortCounts::new(mpo, lc, sfp))
    }

    #[test]
    fn test_lc_preferred_over_mpo() {
        let mut a = device(1, DeviceKind::MicronUhd, 1, 2, 0);
        let mut b = device(2, DeviceKind::Horizon, 1, 2, 0);

        let link = select_link(&mut a, &mut b).unwrap();
        assert_eq!(link.class, LinkClass::LcLc);
        assert_eq!((link.port_a, link.port_b), (PortName::lc(1), PortName::lc(1)));
        assert_eq!(a.remote_of(&PortName::lc(1)), Some(b.id()));
        assert_eq!(b.remote_of(&PortName::lc(1)), Some(a.id()));
    }

    #[test]
    fn test_falls_back_to_mpo_when_lc_exhausted() {
        let mut a = device(1, DeviceKind::MicronUhd, 1, 1, 0);
        let mut b = device(2, DeviceKind::MicronUhd, 1, 0, 0);

        let link = select_link(&mut a, &mut b).unwrap();
        assert_eq!(link.class, LinkClass::MpoMpo);
        assert_eq!(link.port_a, PortName::mpo(1, 1));
        assert_eq!(a.first_available(PortFamily::Lc), Some(PortName::lc(1)));
    }

    #[test]
    fn test_mpo_sfp_keeps_side_order() {
        let mut edge = device(1, DeviceKind::Micron, 0, 0, 2);
        let mut bridge = device(2, DeviceKind::Horizon, 1, 0, 0);

        let link = select_link(&mut edge, &mut bridge).unwrap();
        assert_eq!(link.class, LinkClass::MpoSfp);
        assert_eq!(link.port_a, PortName::sfp(1));
        assert_eq!(link.port_b, PortName::mpo(1, 1));
    }

    #[test]
    fn test_no_link_leaves_devices_untouched() {
        let mut a = device(1, DeviceKind::MicronUhd, 0, 3, 0);
        let mut b = device(2, DeviceKind::Micron, 0, 0, 3);
        let (before_a, before_b) = (a.clone(), b.clone());

        assert_eq!(select_link(&mut a, &mut b), None);
        assert_eq!(a, before_a);
        assert_eq!(b, before_b);
    }

    #[test]
    fn test_taken_probe_rolls_back_and_falls_through() {
        let mut a = device(1, DeviceKind::MicronUhd, 1, 1, 0);
        let mut b = device(2, DeviceKind::Horizon, 1, 1, 0);
        let port_a = a.first_available(PortFamily::Lc).unwrap();
        let port_b = b.first_available(PortFamily::Lc).unwrap();

        // Side B loses its probed port before both sides are taken
        b.occupy(port_b, DeviceId::new(9)).unwrap();
        let before = a.clone();
        assert!(occupy_both(&mut a, port_a, &mut b, port_b).is_err());
        assert_eq!(a, before);

        let link = select_link(&mut a, &mut b).unwrap();
        assert_eq!(link.class, LinkClass::MpoMpo);
        assert_eq!(a.remote_of(&PortName::lc(1)), None);
        assert_eq!(a.connection_count(), 0.25);
    }

    #[test]
    fn test_snapshot_try_link_reversed_indices() {
        let devices = vec![device(2, DeviceKind::Micron, 0, 0, 1), device(1, DeviceKind::Micron, 0, 0, 1)];
        let mut snapshot = Snapshot::fresh(&devices);
        assert_eq!(snapshot.device(0).id(), DeviceId::new(1));

        let conn = snapshot.try_link(1, 0).unwrap();
        assert_eq!(conn.device_a, DeviceId::new(2));
        assert_eq!(conn.device_b, DeviceId::new(1));
        assert_eq!(snapshot.try_link(0, 1), None);
    }
}
