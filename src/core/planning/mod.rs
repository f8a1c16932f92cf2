pub mod config;
pub mod filler;
pub mod mesh;
pub mod pair_order;
pub mod ring;
pub mod selector;

pub use config::{PlannerConfig, Topology};
pub use filler::CapacityFiller;
pub use mesh::{MeshPlan, MeshPlanner};
pub use ring::{RingPlan, RingPlanner};
pub use selector::{select_link, LinkCandidate};
