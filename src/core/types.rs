use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable session identifier of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub(crate) u32);

impl DeviceId {
    /// Create a device ID from its raw value
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Compatibility group a device kind belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceGroup {
    /// High-capacity bridges exposing MPO breakout and LC ports
    Bridge,
    /// Edge nodes exposing SFP ports only
    Edge,
}

/// Device category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    #[serde(rename = "MicroN UHD")]
    MicronUhd,
    #[serde(rename = "HorizoN")]
    Horizon,
    #[serde(rename = "MicroN")]
    Micron,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 3] = [DeviceKind::MicronUhd, DeviceKind::Horizon, DeviceKind::Micron];

    /// Compatibility group of this kind
    pub fn group(&self) -> DeviceGroup {
        match self {
            DeviceKind::MicronUhd | DeviceKind::Horizon => DeviceGroup::Bridge,
            DeviceKind::Micron => DeviceGroup::Edge,
        }
    }

    /// Whether this kind exposes ports of the given family
    pub fn supports(&self, family: PortFamily) -> bool {
        match (self.group(), family) {
            (DeviceGroup::Bridge, PortFamily::Lc | PortFamily::Mpo) => true,
            (DeviceGroup::Edge, PortFamily::Sfp) => true,
            _ => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeviceKind::MicronUhd => "MicroN UHD",
            DeviceKind::Horizon => "HorizoN",
            DeviceKind::Micron => "MicroN",
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown device kind '{0}'")]
pub struct InvalidDeviceKind(pub String);

impl std::str::FromStr for DeviceKind {
    type Err = InvalidDeviceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceKind::ALL
            .iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| InvalidDeviceKind(s.to_string()))
    }
}

/// Physical port family, derived from the textual prefix of a port name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PortFamily {
    /// Narrow 100G port
    Lc,
    /// Low-speed transceiver port
    Sfp,
    /// Wide port split into breakout channels
    Mpo,
}

impl PortFamily {
    pub fn prefix(&self) -> &'static str {
        match self {
            PortFamily::Lc => "LC",
            PortFamily::Sfp => "SFP",
            PortFamily::Mpo => "MPO",
        }
    }

    /// Occupancy weight in quarter connection units
    pub(crate) fn weight_quarters(&self) -> u32 {
        match self {
            PortFamily::Mpo => 1,
            PortFamily::Lc | PortFamily::Sfp => 4,
        }
    }
}

impl std::fmt::Display for PortFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}
