pub mod connection;
pub mod connection_validator;
pub mod manager;
pub mod port_validator;

pub use connection::Connection;
pub use connection_validator::{compatible, compatible_families, ConnectionValidator, LinkClass};
pub use manager::{ConnectionLedger, DeviceUpdate, PortTotals, UpdateOutcome};
pub use port_validator::PortValidator;
