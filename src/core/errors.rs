use crate::core::types::DeviceId;
use thiserror::Error;

/// Errors raised by the port model, the ledger and the planners
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("device name '{0}' is already in use")]
    DuplicateName(String),

    #[error("device name must not be empty")]
    EmptyName,

    #[error("invalid port count for {family}: {value}")]
    InvalidPortCount { family: &'static str, value: i64 },

    #[error("device {0} not found")]
    UnknownDevice(DeviceId),

    #[error("device id {0} is already in use")]
    DuplicateId(DeviceId),

    #[error("no device ids left after {0}")]
    IdsExhausted(DeviceId),

    #[error("port {port_a} on device {device_a} cannot be linked to port {port_b} on device {device_b}")]
    Incompatible {
        device_a: DeviceId,
        port_a: String,
        device_b: DeviceId,
        port_b: String,
    },

    #[error("port '{port}' on device {device} is not available")]
    PortUnavailable { device: DeviceId, port: String },

    #[error("device {0} cannot be linked to itself")]
    SelfLink(DeviceId),

    #[error("{} device pair(s) left without a link", .0.len())]
    UnresolvedTopology(Vec<(DeviceId, DeviceId)>),

    #[error("a ring needs at least 2 devices, found {0}")]
    TooFewDevices(usize),

    #[error("changing port counts on device {0} drops existing connections; pass force to proceed")]
    ConfirmationRequired(DeviceId),

    #[error("connection state was inconsistent and has been cleared: {0}")]
    CorruptedState(String),
}

impl PlanError {
    pub(crate) fn unavailable(device: DeviceId, port: impl ToString) -> Self {
        PlanError::PortUnavailable {
            device,
            port: port.to_string(),
        }
    }
}
