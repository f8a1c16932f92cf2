use crate::core::connections::connection_validator::LinkClass;
use crate::core::devices::PortName;
use crate::core::types::DeviceId;

/// An accepted link between two device ports
///
/// The record is undirected: (a, port_a, b, port_b) and (b, port_b, a, port_a)
/// describe the same link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    pub device_a: DeviceId,
    pub port_a: PortName,
    pub device_b: DeviceId,
    pub port_b: PortName,
    pub class: LinkClass,
}

impl Connection {
    pub fn new(device_a: DeviceId, port_a: PortName, device_b: DeviceId, port_b: PortName, class: LinkClass) -> Self {
        Self {
            device_a,
            port_a,
            device_b,
            port_b,
            class,
        }
    }

    /// Whether this record describes the given endpoints, in either order
    pub fn matches(&self, device_a: DeviceId, port_a: &PortName, device_b: DeviceId, port_b: &PortName) -> bool {
        (self.device_a == device_a && self.port_a == *port_a && self.device_b == device_b && self.port_b == *port_b)
            || (self.device_a == device_b && self.port_a == *port_b && self.device_b == device_a && self.port_b == *port_a)
    }

    pub fn involves(&self, device: DeviceId) -> bool {
        self.device_a == device || self.device_b == device
    }

    /// Device pair with the lower id first
    pub fn pair(&self) -> (DeviceId, DeviceId) {
        if self.device_a <= self.device_b {
            (self.device_a, self.device_b)
        } else {
            (self.device_b, self.device_a)
        }
    }

    /// Same link with the sides swapped
    pub fn reversed(&self) -> Self {
        Self::new(self.device_b, self.port_b, self.device_a, self.port_a, self.class)
    }
}
