//! Project files
//!
//! A project is stored as pretty JSON holding the device inventory and the
//! accepted connections. Older files holding only a bare array of devices are
//! still accepted.

use crate::core::connections::ConnectionLedger;
use crate::core::devices::PortCounts;
use crate::core::errors::PlanError;
use crate::core::types::{DeviceId, DeviceKind};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Format version written into new project files
pub const PROJECT_VERSION: &str = "1.1";

/// Errors raised while reading or writing a project
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("project I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed project file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid project content: {0}")]
    Invalid(#[from] PlanError),
}

/// One device as stored on disk
///
/// Counts are signed so that bad input is reported as an invalid count
/// instead of a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    #[serde(default)]
    pub mpo_ports: i64,
    #[serde(default)]
    pub lc_ports: i64,
    #[serde(default)]
    pub sfp_ports: i64,
}

/// One connection as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub dev1_id: u32,
    pub port1: String,
    pub dev2_id: u32,
    pub port2: String,
    /// Link class label, informational only; it is recomputed on load
    #[serde(rename = "type", default)]
    pub link_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub version: String,
    pub devices: Vec<DeviceRecord>,
    /// Absent in files written before connections were stored
    #[serde(default)]
    pub connections: Option<Vec<ConnectionRecord>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectDocument {
    Current(ProjectFile),
    Legacy(Vec<DeviceRecord>),
}

/// Outcome of a load beyond the ledger itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Whether the file carried a connection list at all
    pub connections_restored: bool,
    /// Stored connections that were rejected, with the reason
    pub skipped: Vec<String>,
}

impl ProjectFile {
    /// Snapshot of the ledger in file form
    pub fn from_ledger(ledger: &ConnectionLedger) -> Self {
        let devices = ledger
            .devices()
            .iter()
            .map(|device| {
                let counts = device.counts();
                DeviceRecord {
                    id: Some(device.id().value()),
                    name: device.name().to_string(),
                    kind: device.kind(),
                    mpo_ports: i64::from(counts.mpo),
                    lc_ports: i64::from(counts.lc),
                    sfp_ports: i64::from(counts.sfp),
                }
            })
            .collect();

        let connections = ledger
            .connections()
            .iter()
            .map(|conn| ConnectionRecord {
                dev1_id: conn.device_a.value(),
                port1: conn.port_a.to_string(),
                dev2_id: conn.device_b.value(),
                port2: conn.port_b.to_string(),
                link_class: conn.class.label().to_string(),
            })
            .collect();

        Self {
            version: PROJECT_VERSION.to_string(),
            devices,
            connections: Some(connections),
        }
    }
}

/// Serialize the ledger as pretty JSON
pub fn to_json(ledger: &ConnectionLedger) -> Result<String, ProjectError> {
    Ok(serde_json::to_string_pretty(&ProjectFile::from_ledger(ledger))?)
}

/// Rebuild a ledger from project JSON, in either the current or the legacy shape
pub fn from_json(json: &str) -> Result<(ConnectionLedger, LoadReport), ProjectError> {
    let (devices, connections) = match serde_json::from_str::<ProjectDocument>(json)? {
        ProjectDocument::Current(file) => {
            if file.version != PROJECT_VERSION {
                warn!("Project version {} differs from {}, loading anyway", file.version, PROJECT_VERSION);
            }
            (file.devices, file.connections)
        }
        ProjectDocument::Legacy(devices) => {
            info!("Loading legacy device list without connections");
            (devices, None)
        }
    };

    let mut ledger = ConnectionLedger::new();
    let mut next_id = devices.iter().filter_map(|record| record.id).max().unwrap_or(0);
    for record in &devices {
        let counts = PortCounts::from_signed(record.mpo_ports, record.lc_ports, record.sfp_ports)?;
        let id = match record.id {
            Some(id) => id,
            None => {
                next_id = next_id
                    .checked_add(1)
                    .ok_or(PlanError::IdsExhausted(DeviceId::new(next_id)))?;
                next_id
            }
        };
        ledger.insert_device(DeviceId::new(id), &record.name, record.kind, counts)?;
    }

    let mut report = LoadReport {
        connections_restored: connections.is_some(),
        skipped: Vec::new(),
    };
    for record in connections.unwrap_or_default() {
        let (a, b) = (DeviceId::new(record.dev1_id), DeviceId::new(record.dev2_id));
        if let Err(err) = ledger.add_connection(a, &record.port1, b, &record.port2) {
            let entry = format!("{}[{}] <-> {}[{}]: {}", a, record.port1, b, record.port2, err);
            warn!("Skipping stored connection {}", entry);
            report.skipped.push(entry);
        }
    }

    info!(
        "Loaded {} device(s), {} connection(s), {} skipped",
        ledger.devices().len(),
        ledger.connections().len(),
        report.skipped.len()
    );
    Ok((ledger, report))
}

/// Write the ledger to a project file
pub fn save(ledger: &ConnectionLedger, path: impl AsRef<Path>) -> Result<(), ProjectError> {
    let path = path.as_ref();
    std::fs::write(path, to_json(ledger)?)?;
    info!("Project saved to {}", path.display());
    Ok(())
}

/// Read a project file into a fresh ledger
pub fn load(path: impl AsRef<Path>) -> Result<(ConnectionLedger, LoadReport), ProjectError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    info!("Loading project from {}", path.display());
    from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_array_loads_without_connections() {
        let json = r#"[
            {"id": 3, "name": "A", "type": "MicroN UHD", "mpo_ports": 1, "lc_ports": 2, "sfp_ports": 0},
            {"name": "B", "type": "MicroN", "sfp_ports": 4}
        ]"#;
        let (ledger, report) = from_json(json).unwrap();

        assert!(!report.connections_restored);
        assert_eq!(ledger.devices().len(), 2);
        assert_eq!(ledger.device_by_name("B").unwrap().id(), DeviceId::new(4));
        assert!(ledger.connections().is_empty());
    }

    #[test]
    fn test_object_without_connection_list() {
        let json = r#"{"version": "1.1", "devices": [{"id": 1, "name": "A", "type": "MicroN", "sfp_ports": 1}]}"#;
        let (ledger, report) = from_json(json).unwrap();
        assert!(!report.connections_restored);
        assert_eq!(ledger.devices().len(), 1);

        let json = r#"{"version": "1.1", "devices": [], "connections": []}"#;
        assert!(from_json(json).unwrap().1.connections_restored);
    }

    #[test]
    fn test_ids_past_the_last_one_rejected() {
        let json = r#"[
            {"id": 4294967295, "name": "A", "type": "MicroN", "sfp_ports": 1},
            {"name": "B", "type": "MicroN", "sfp_ports": 1}
        ]"#;
        let err = from_json(json).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Invalid(PlanError::IdsExhausted(id)) if id == DeviceId::new(u32::MAX)
        ));

        let json = r#"[{"id": 4294967295, "name": "A", "type": "MicroN", "sfp_ports": 1}]"#;
        let (mut ledger, _) = from_json(json).unwrap();
        let err = ledger.add_device("B", DeviceKind::Micron, PortCounts::new(0, 0, 1)).unwrap_err();
        assert_eq!(err, PlanError::IdsExhausted(DeviceId::new(u32::MAX)));
        assert_eq!(ledger.devices().len(), 1);
    }

    #[test]
    fn test_repeated_id_rejected() {
        let json = r#"[
            {"id": 2, "name": "A", "type": "MicroN", "sfp_ports": 1},
            {"id": 2, "name": "B", "type": "MicroN", "sfp_ports": 1}
        ]"#;
        assert!(matches!(
            from_json(json),
            Err(ProjectError::Invalid(PlanError::DuplicateId(id))) if id == DeviceId::new(2)
        ));
    }

    #[test]
    fn test_negative_count_rejected() {
        let json = r#"[{"id": 1, "name": "A", "type": "HorizoN", "mpo_ports": -1, "lc_ports": 0, "sfp_ports": 0}]"#;
        let err = from_json(json).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Invalid(PlanError::InvalidPortCount { family: "MPO", value: -1 })
        ));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let json = r#"[{"id": 1, "name": "A", "type": "Router", "mpo_ports": 0, "lc_ports": 0, "sfp_ports": 0}]"#;
        assert!(matches!(from_json(json), Err(ProjectError::Json(_))));
    }

    #[test]
    fn test_invalid_connection_skipped() {
        let json = r#"{
            "version": "1.1",
            "devices": [
                {"id": 1, "name": "A", "type": "MicroN UHD", "mpo_ports": 0, "lc_ports": 1, "sfp_ports": 0},
                {"id": 2, "name": "B", "type": "MicroN", "mpo_ports": 0, "lc_ports": 0, "sfp_ports": 1}
            ],
            "connections": [
                {"dev1_id": 1, "port1": "LC1", "dev2_id": 2, "port2": "SFP1", "type": "LC-LC (100G)"}
            ]
        }"#;
        let (ledger, report) = from_json(json).unwrap();

        assert!(report.connections_restored);
        assert_eq!(report.skipped.len(), 1);
        assert!(ledger.connections().is_empty());
        assert!(ledger.device(DeviceId::new(1)).unwrap().occupancy().is_empty());
    }
}
