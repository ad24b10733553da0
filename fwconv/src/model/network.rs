use serde::Serialize;

/// A physical or logical interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Interface {
    pub name: String,
    pub ip: Option<String>,
    pub mask: Option<String>,
    /// Cisco `nameif`, FortiGate `alias`, PAN-OS comment.
    pub description: Option<String>,
    /// Free-form `description` line when the dialect has one besides the alias.
    pub comment: Option<String>,
    pub security_level: Option<u8>,
    pub zone: Option<String>,
    pub vlan: Option<u16>,
    pub enabled: bool,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            ..Self::default()
        }
    }

    /// `ip` and `mask` together, if both are known.
    pub fn address(&self) -> Option<(&str, &str)> {
        Some((self.ip.as_deref()?, self.mask.as_deref()?))
    }
}

/// A named set of interfaces (PAN-OS).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Zone {
    pub name: String,
    pub interfaces: Vec<String>,
    pub description: Option<String>,
}

/// A static route. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Route {
    pub name: Option<String>,
    pub network: String,
    pub mask: String,
    pub gateway: Option<String>,
    pub interface: Option<String>,
    pub distance: Option<u16>,
    pub description: Option<String>,
}

impl Route {
    /// True for `0.0.0.0 0.0.0.0`.
    pub fn is_default(&self) -> bool {
        self.network == "0.0.0.0" && self.mask == "0.0.0.0"
    }
}
