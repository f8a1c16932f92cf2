
use crate::core::connections::ConnectionLedger;
use crate::core::devices::PortCounts;
use crate::core::types::{DeviceId, DeviceKind};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub(crate) fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub(crate) fn add(ledger: &mut ConnectionLedger, name: &str, kind: DeviceKind, mpo: u32, lc: u32, sfp: u32) -> DeviceId {
    ledger.add_device(name, kind, PortCounts::new(mpo, lc, sfp)).unwrap().id()
}

/// Check the tally, occupancy and symmetry invariants over the whole ledger
pub(crate) fn assert_consistent(ledger: &ConnectionLedger) {
    for device in ledger.devices() {
        let expected: f64 = device
            .occupancy()
            .keys()
            .map(|port| if port.channel().is_some() { 0.25 } else { 1.0 })
            .sum();
        assert_eq!(device.connection_count(), expected, "tally of {}", device.name());
        for port in device.available_ports() {
            assert!(device.remote_of(&port).is_none());
        }
        for port in device.occupancy().keys() {
            assert!(!device.available_ports().contains(port));
        }
    }

    let occupied: usize = ledger.devices().iter().map(|d| d.occupancy().len()).sum();
    assert_eq!(occupied, 2 * ledger.connections().len());
    for conn in ledger.connections() {
        let a = ledger.device(conn.device_a).unwrap();
        let b = ledger.device(conn.device_b).unwrap();
        assert_eq!(a.remote_of(&conn.port_a), Some(b.id()));
        assert_eq!(b.remote_of(&conn.port_b), Some(a.id()));
    }
}
