pub mod export;
pub mod persistence;
pub mod summary;

pub use export::{render_connections, write_connections, ExportFormat, CSV_HEADER};
pub use persistence::{
    from_json, load, save, to_json, ConnectionRecord, DeviceRecord, LoadReport, ProjectError, ProjectFile,
    PROJECT_VERSION,
};
pub use summary::{DeviceUsage, PairSummary, TopologySummary};
