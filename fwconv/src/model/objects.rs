use serde::Serialize;

use super::defaults::ANY;
use crate::netmask;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressKind {
    #[default]
    Host,
    Subnet,
    Range,
    Fqdn,
}

/// A named address object. `mask` is only set for subnets; ranges keep
/// `start-end` in `value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressObject {
    pub name: String,
    pub kind: AddressKind,
    pub value: String,
    pub mask: Option<String>,
    pub description: Option<String>,
}

impl AddressObject {
    pub fn host(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AddressKind::Host,
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn subnet(
        name: impl Into<String>,
        value: impl Into<String>,
        mask: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: AddressKind::Subnet,
            value: value.into(),
            mask: Some(mask.into()),
            ..Self::default()
        }
    }

    /// `a.b.c.d/n` for subnets, `a.b.c.d/32` for hosts, raw value otherwise.
    pub fn cidr(&self) -> String {
        match (self.kind, self.mask.as_deref()) {
            (AddressKind::Subnet, Some(mask)) => netmask::to_cidr(&self.value, mask),
            (AddressKind::Host, _) => format!("{}/32", self.value),
            _ => self.value.clone(),
        }
    }
}

/// Ordered member references. Members use the [`Endpoint`] text convention
/// and are not checked against declared objects here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressGroup {
    pub name: String,
    pub members: Vec<String>,
    pub description: Option<String>,
}

/// A named service (protocol + destination port or range).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceObject {
    pub name: String,
    pub protocol: String,
    pub port: Option<String>,
    pub description: Option<String>,
}

/// Typed reading of endpoint text used by groups and policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Any,
    Host(String),
    Network { address: String, mask: String },
    Named(String),
}

impl Endpoint {
    pub fn classify(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() || text.eq_ignore_ascii_case(ANY) || text == "any4" {
            return Endpoint::Any;
        }
        if let Some((address, mask)) = netmask::split_address_mask(text) {
            if is_ipv4(&address) {
                return Endpoint::Network { address, mask };
            }
        }
        if is_ipv4(text) {
            return Endpoint::Host(text.to_string());
        }
        Endpoint::Named(text.to_string())
    }

    /// The object name this endpoint refers to, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Endpoint::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Back to the shared text convention.
    pub fn to_text(&self) -> String {
        match self {
            Endpoint::Any => ANY.to_string(),
            Endpoint::Host(address) => address.clone(),
            Endpoint::Network { address, mask } => netmask::to_cidr(address, mask),
            Endpoint::Named(name) => name.clone(),
        }
    }
}

/// Typed reading of service text: `any`, `tcp/443`, `udp/1000-2000`, `icmp`,
/// or a service name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceRef {
    Any,
    Protocol(String),
    Port { protocol: String, port: String },
    Named(String),
}

const PROTOCOLS: [&str; 6] = ["tcp", "udp", "icmp", "ip", "esp", "gre"];

impl ServiceRef {
    pub fn classify(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() || text.eq_ignore_ascii_case(ANY) {
            return ServiceRef::Any;
        }
        let lower = text.to_ascii_lowercase();
        if let Some((protocol, port)) = lower.split_once('/') {
            if PROTOCOLS.contains(&protocol) && !port.is_empty() {
                return ServiceRef::Port {
                    protocol: protocol.to_string(),
                    port: port.to_string(),
                };
            }
        }
        if lower == "ip" {
            return ServiceRef::Any;
        }
        if PROTOCOLS.contains(&lower.as_str()) {
            return ServiceRef::Protocol(lower);
        }
        ServiceRef::Named(text.to_string())
    }

    pub fn to_text(&self) -> String {
        match self {
            ServiceRef::Any => ANY.to_string(),
            ServiceRef::Protocol(protocol) => protocol.clone(),
            ServiceRef::Port { protocol, port } => format!("{protocol}/{port}"),
            ServiceRef::Named(name) => name.clone(),
        }
    }
}

pub(crate) fn is_ipv4(text: &str) -> bool {
    let mut count = 0;
    for octet in text.split('.') {
        count += 1;
        if octet.is_empty() || octet.len() > 3 || octet.parse::<u8>().is_err() {
            return false;
        }
    }
    count == 4
}
