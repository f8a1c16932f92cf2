use crate::core::types::PortFamily;
use thiserror::Error;

/// Number of independent breakout channels on one MPO port
pub const BREAKOUT_CHANNELS: u8 = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a valid port name")]
pub struct InvalidPortName(pub String);

/// Port name such as `LC2`, `SFP1` or `MPO3-Ch4`
///
/// Indices and channels are 1-based. Only MPO ports carry a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortName {
    family: PortFamily,
    index: u32,
    channel: Option<u8>,
}

impl PortName {
    /// Create a narrow LC port name
    pub fn lc(index: u32) -> Self {
        Self {
            family: PortFamily::Lc,
            index,
            channel: None,
        }
    }

    /// Create a low-speed SFP port name
    pub fn sfp(index: u32) -> Self {
        Self {
            family: PortFamily::Sfp,
            index,
            channel: None,
        }
    }

    /// Create an MPO breakout channel name
    pub fn mpo(index: u32, channel: u8) -> Self {
        Self {
            family: PortFamily::Mpo,
            index,
            channel: Some(channel),
        }
    }

    pub fn family(&self) -> PortFamily {
        self.family
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn channel(&self) -> Option<u8> {
        self.channel
    }
}

impl std::fmt::Display for PortName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.channel {
            Some(channel) => write!(f, "{}{}-Ch{}", self.family.prefix(), self.index, channel),
            None => write!(f, "{}{}", self.family.prefix(), self.index),
        }
    }
}

fn parse_index(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok().filter(|index| *index >= 1)
}

impl std::str::FromStr for PortName {
    type Err = InvalidPortName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidPortName(s.to_string());

        if let Some(rest) = s.strip_prefix(PortFamily::Lc.prefix()) {
            return parse_index(rest).map(PortName::lc).ok_or_else(invalid);
        }
        if let Some(rest) = s.strip_prefix(PortFamily::Sfp.prefix()) {
            return parse_index(rest).map(PortName::sfp).ok_or_else(invalid);
        }
        if let Some(rest) = s.strip_prefix(PortFamily::Mpo.prefix()) {
            let (index, channel) = rest.split_once("-Ch").ok_or_else(invalid)?;
            let index = parse_index(index).ok_or_else(invalid)?;
            let channel = parse_index(channel)
                .filter(|c| *c <= BREAKOUT_CHANNELS as u32)
                .ok_or_else(invalid)?;
            return Ok(PortName::mpo(index, channel as u8));
        }
        Err(invalid())
    }
}

impl TryFrom<String> for PortName {
    type Error = InvalidPortName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PortName> for String {
    fn from(port: PortName) -> Self {
        port.to_string()
    }
}
