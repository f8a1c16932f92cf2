pub mod device;
pub mod port_specs;

pub use device::{Device, PortCounts};
pub use port_specs::{InvalidPortName, PortName, BREAKOUT_CHANNELS};
