pub mod core;

// Re-export commonly used types
pub use crate::core::connections::{Connection, ConnectionLedger, DeviceUpdate, LinkClass, UpdateOutcome};
pub use crate::core::devices::{Device, PortCounts, PortName};
pub use crate::core::errors::PlanError;
pub use crate::core::planning::{MeshPlan, PlannerConfig, RingPlan, Topology};
pub use crate::core::project::{ExportFormat, LoadReport, ProjectError, TopologySummary};
pub use crate::core::types::{DeviceId, DeviceKind, PortFamily};
