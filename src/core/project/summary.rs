use crate::core::connections::{ConnectionLedger, LinkClass};
use crate::core::types::{DeviceId, DeviceKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Links aggregated over one unordered device pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairSummary {
    pub device_a: DeviceId,
    pub device_b: DeviceId,
    /// Link count per class label, in class priority order
    pub links: Vec<(String, usize)>,
}

impl PairSummary {
    pub fn total(&self) -> usize {
        self.links.iter().map(|(_, count)| count).sum()
    }
}

/// Port usage of one device
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceUsage {
    pub id: DeviceId,
    pub name: String,
    pub kind: DeviceKind,
    pub used_ports: usize,
    pub total_ports: usize,
    pub connection_count: f64,
}

/// Aggregated view of the current connection state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopologySummary {
    pub pairs: Vec<PairSummary>,
    pub devices: Vec<DeviceUsage>,
}

impl TopologySummary {
    pub fn from_ledger(ledger: &ConnectionLedger) -> Self {
        let mut per_pair: BTreeMap<(DeviceId, DeviceId), BTreeMap<LinkClass, usize>> = BTreeMap::new();
        for conn in ledger.connections() {
            *per_pair.entry(conn.pair()).or_default().entry(conn.class).or_default() += 1;
        }

        let pairs = per_pair
            .into_iter()
            .map(|((device_a, device_b), classes)| PairSummary {
                device_a,
                device_b,
                links: classes
                    .into_iter()
                    .map(|(class, count)| (class.label().to_string(), count))
                    .collect(),
            })
            .collect();

        let devices = ledger
            .devices()
            .iter()
            .map(|device| DeviceUsage {
                id: device.id(),
                name: device.name().to_string(),
                kind: device.kind(),
                used_ports: device.occupancy().len(),
                total_ports: device.all_possible_ports().len(),
                connection_count: device.connection_count(),
            })
            .collect();

        Self { pairs, devices }
    }

    /// Links between two devices, in either order
    pub fn pair(&self, a: DeviceId, b: DeviceId) -> Option<&PairSummary> {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.pairs.iter().find(|pair| (pair.device_a, pair.device_b) == key)
    }
}

impl fmt::Display for TopologySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Devices:")?;
        for usage in &self.devices {
            writeln!(
                f,
                "  {} {} ({}): {}/{} ports used, {:.2} connections",
                usage.id, usage.name, usage.kind, usage.used_ports, usage.total_ports, usage.connection_count
            )?;
        }
        writeln!(f, "Links:")?;
        for pair in &self.pairs {
            let classes: Vec<String> = pair.links.iter().map(|(label, count)| format!("{} x{}", label, count)).collect();
            writeln!(f, "  {} <-> {}: {}", pair.device_a, pair.device_b, classes.join(", "))?;
        }
        Ok(())
    }
}
