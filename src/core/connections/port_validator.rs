use crate::core::devices::{Device, PortName};
use crate::core::errors::PlanError;

/// Port validation utilities for devices
pub struct PortValidator;

impl PortValidator {
    /// Parse a port name and check that it is a real port of the device
    pub fn validate_port(device: &Device, port: &str) -> Result<PortName, PlanError> {
        let parsed: PortName = port
            .parse()
            .map_err(|_| PlanError::unavailable(device.id(), port))?;

        if !device.has_port(&parsed) {
            return Err(PlanError::unavailable(device.id(), port));
        }
        Ok(parsed)
    }

    /// Like `validate_port`, and additionally require the port to be free
    pub fn validate_available(device: &Device, port: &str) -> Result<PortName, PlanError> {
        let parsed = Self::validate_port(device, port)?;

        if let Some(remote) = device.remote_of(&parsed) {
            log::debug!("Port {}[{}] already linked to {}", device.name(), parsed, remote);
            return Err(PlanError::unavailable(device.id(), parsed));
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::devices::PortCounts;
    use crate::core::types::{DeviceId, DeviceKind};

    #[test]
    fn test_port_validator() {
        let mut device = Device::new(DeviceId::new(1), "a".to_string(), DeviceKind::Horizon, PortCounts::new(1, 1, 0));

        assert_eq!(PortValidator::validate_port(&device, "MPO1-Ch4"), Ok(PortName::mpo(1, 4)));
        assert!(PortValidator::validate_port(&device, "MPO2-Ch1").is_err());
        assert!(PortValidator::validate_port(&device, "SFP1").is_err());
        assert!(PortValidator::validate_port(&device, "garbage").is_err());

        device.occupy(PortName::lc(1), DeviceId::new(2)).unwrap();
        let result = PortValidator::validate_available(&device, "LC1");
        assert_eq!(
            result,
            Err(PlanError::PortUnavailable {
                device: DeviceId::new(1),
                port: "LC1".to_string()
            })
        );
        assert!(PortValidator::validate_port(&device, "LC1").is_ok());
    }
}
