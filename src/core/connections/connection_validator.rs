use crate::core::connections::port_validator::PortValidator;
use crate::core::devices::{Device, PortName};
use crate::core::errors::PlanError;
use crate::core::types::{DeviceGroup, DeviceKind, PortFamily};

/// Bandwidth class of an accepted link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkClass {
    LcLc,
    MpoMpo,
    SfpSfp,
    MpoSfp,
}

impl LinkClass {
    /// Classes in the order the planners try them, highest bandwidth first
    pub const PRIORITY: [LinkClass; 4] = [LinkClass::LcLc, LinkClass::MpoMpo, LinkClass::SfpSfp, LinkClass::MpoSfp];

    pub fn label(&self) -> &'static str {
        match self {
            LinkClass::LcLc => "LC-LC (100G)",
            LinkClass::MpoMpo => "MPO-MPO (25G)",
            LinkClass::SfpSfp => "SFP-SFP (10G)",
            LinkClass::MpoSfp => "MPO-SFP (10G)",
        }
    }

    /// Port families to use on the (a, b) sides to form this class between
    /// devices of the given groups
    pub fn families_for(&self, a: DeviceGroup, b: DeviceGroup) -> Option<(PortFamily, PortFamily)> {
        LINK_RULES
            .iter()
            .find(|rule| rule.class == *self && rule.groups == (a, b))
            .map(|rule| rule.families)
    }
}

impl std::fmt::Display for LinkClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

struct LinkRule {
    families: (PortFamily, PortFamily),
    groups: (DeviceGroup, DeviceGroup),
    class: LinkClass,
}

/// Every legal (family, group) combination. Anything not listed is incompatible.
const LINK_RULES: [LinkRule; 5] = [
    LinkRule {
        families: (PortFamily::Lc, PortFamily::Lc),
        groups: (DeviceGroup::Bridge, DeviceGroup::Bridge),
        class: LinkClass::LcLc,
    },
    LinkRule {
        families: (PortFamily::Mpo, PortFamily::Mpo),
        groups: (DeviceGroup::Bridge, DeviceGroup::Bridge),
        class: LinkClass::MpoMpo,
    },
    LinkRule {
        families: (PortFamily::Sfp, PortFamily::Sfp),
        groups: (DeviceGroup::Edge, DeviceGroup::Edge),
        class: LinkClass::SfpSfp,
    },
    LinkRule {
        families: (PortFamily::Mpo, PortFamily::Sfp),
        groups: (DeviceGroup::Bridge, DeviceGroup::Edge),
        class: LinkClass::MpoSfp,
    },
    LinkRule {
        families: (PortFamily::Sfp, PortFamily::Mpo),
        groups: (DeviceGroup::Edge, DeviceGroup::Bridge),
        class: LinkClass::MpoSfp,
    },
];

/// Link class formed by joining `port_a` on a `kind_a` device with `port_b`
/// on a `kind_b` device, or `None` when the pair is incompatible
pub fn compatible(kind_a: DeviceKind, port_a: &PortName, kind_b: DeviceKind, port_b: &PortName) -> Option<LinkClass> {
    let families = (port_a.family(), port_b.family());
    let groups = (kind_a.group(), kind_b.group());
    LINK_RULES
        .iter()
        .find(|rule| rule.families == families && rule.groups == groups)
        .map(|rule| rule.class)
}

/// Local port families that may be linked to `remote_port` on a `remote_kind`
/// device, for a local device of `local_kind`
pub fn compatible_families(remote_kind: DeviceKind, remote_port: &PortName, local_kind: DeviceKind) -> Vec<PortFamily> {
    let mut families: Vec<PortFamily> = LINK_RULES
        .iter()
        .filter(|rule| {
            rule.families.1 == remote_port.family()
                && rule.groups == (local_kind.group(), remote_kind.group())
        })
        .map(|rule| rule.families.0)
        .collect();
    families.sort();
    families.dedup();
    families
}

/// Centralized validation of a proposed two-sided link
pub struct ConnectionValidator;

impl ConnectionValidator {
    /// Check that a link between two devices is legal and both ports are free
    ///
    /// Checks run in order: self link, port existence/availability on each
    /// side, then compatibility.
    pub fn validate_link(
        device_a: &Device,
        port_a: &str,
        device_b: &Device,
        port_b: &str,
    ) -> Result<(PortName, PortName, LinkClass), PlanError> {
        if device_a.id() == device_b.id() {
            return Err(PlanError::SelfLink(device_a.id()));
        }

        let parsed_a = PortValidator::validate_available(device_a, port_a)?;
        let parsed_b = PortValidator::validate_available(device_b, port_b)?;

        let class = compatible(device_a.kind(), &parsed_a, device_b.kind(), &parsed_b).ok_or_else(|| {
            PlanError::Incompatible {
                device_a: device_a.id(),
                port_a: parsed_a.to_string(),
                device_b: device_b.id(),
                port_b: parsed_b.to_string(),
            }
        })?;

        Ok((parsed_a, parsed_b, class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRIDGES: [DeviceKind; 2] = [DeviceKind::MicronUhd, DeviceKind::Horizon];

    fn sample_ports() -> Vec<PortName> {
        vec![PortName::lc(1), PortName::sfp(1), PortName::mpo(1, 2)]
    }

    #[test]
    fn test_rule_table() {
        for a in BRIDGES {
            for b in BRIDGES {
                assert_eq!(compatible(a, &PortName::lc(1), b, &PortName::lc(2)), Some(LinkClass::LcLc));
                assert_eq!(compatible(a, &PortName::mpo(1, 1), b, &PortName::mpo(3, 4)), Some(LinkClass::MpoMpo));
                assert_eq!(compatible(a, &PortName::lc(1), b, &PortName::mpo(1, 1)), None);
            }
            assert_eq!(
                compatible(a, &PortName::mpo(1, 1), DeviceKind::Micron, &PortName::sfp(1)),
                Some(LinkClass::MpoSfp)
            );
            assert_eq!(
                compatible(DeviceKind::Micron, &PortName::sfp(1), a, &PortName::mpo(1, 1)),
                Some(LinkClass::MpoSfp)
            );
            assert_eq!(compatible(a, &PortName::lc(1), DeviceKind::Micron, &PortName::sfp(1)), None);
        }
        assert_eq!(
            compatible(DeviceKind::Micron, &PortName::sfp(1), DeviceKind::Micron, &PortName::sfp(2)),
            Some(LinkClass::SfpSfp)
        );
        // MPO-MPO is a bridge-only class
        assert_eq!(
            compatible(DeviceKind::Micron, &PortName::mpo(1, 1), DeviceKind::Micron, &PortName::mpo(1, 1)),
            None
        );
    }

    #[test]
    fn test_compatibility_is_symmetric() {
        for kind_a in DeviceKind::ALL {
            for kind_b in DeviceKind::ALL {
                for port_a in sample_ports() {
                    for port_b in sample_ports() {
                        assert_eq!(
                            compatible(kind_a, &port_a, kind_b, &port_b),
                            compatible(kind_b, &port_b, kind_a, &port_a),
                            "{} {} / {} {}",
                            kind_a,
                            port_a,
                            kind_b,
                            port_b
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_families_for_each_class() {
        use DeviceGroup::*;
        assert_eq!(LinkClass::LcLc.families_for(Bridge, Bridge), Some((PortFamily::Lc, PortFamily::Lc)));
        assert_eq!(LinkClass::LcLc.families_for(Bridge, Edge), None);
        assert_eq!(LinkClass::MpoSfp.families_for(Edge, Bridge), Some((PortFamily::Sfp, PortFamily::Mpo)));
        assert_eq!(LinkClass::SfpSfp.families_for(Edge, Edge), Some((PortFamily::Sfp, PortFamily::Sfp)));
    }

    #[test]
    fn test_compatible_families_for_editor() {
        assert_eq!(
            compatible_families(DeviceKind::Horizon, &PortName::mpo(1, 1), DeviceKind::MicronUhd),
            vec![PortFamily::Mpo]
        );
        assert_eq!(
            compatible_families(DeviceKind::Horizon, &PortName::mpo(1, 1), DeviceKind::Micron),
            vec![PortFamily::Sfp]
        );
        assert_eq!(
            compatible_families(DeviceKind::Micron, &PortName::sfp(1), DeviceKind::Horizon),
            vec![PortFamily::Mpo]
        );
        assert!(compatible_families(DeviceKind::Horizon, &PortName::lc(1), DeviceKind::Micron).is_empty());
    }
}
