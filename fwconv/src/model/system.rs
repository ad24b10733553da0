use serde::Serialize;

/// Device-wide credentials and identity extras.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceSettings {
    pub enable_password: Option<String>,
    pub password: Option<String>,
    pub domain: Option<String>,
    pub timezone: Option<String>,
}

/// A local account. Secrets are opaque.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct User {
    pub username: String,
    pub secret: Option<String>,
    pub privilege: u8,
    pub role: Option<String>,
}

/// LDAP / RADIUS / TACACS+ server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AaaServer {
    pub name: String,
    pub protocol: String,
    pub interface: Option<String>,
    pub host: Option<String>,
    pub port: String,
    pub base_dn: Option<String>,
    pub description: Option<String>,
}

/// Management-plane settings, each an ordered list of small records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemServices {
    pub logging: Vec<LogSetting>,
    pub snmp: Vec<SnmpSetting>,
    pub ssh: Vec<AccessSetting>,
    pub http: Vec<AccessSetting>,
    pub clock: Vec<ClockSetting>,
}

impl SystemServices {
    pub fn is_empty(&self) -> bool {
        self.logging.is_empty()
            && self.snmp.is_empty()
            && self.ssh.is_empty()
            && self.http.is_empty()
            && self.clock.is_empty()
    }
}

/// `logging <target> <level>` or a syslog host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogSetting {
    pub target: String,
    pub level: String,
    pub host: Option<String>,
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnmpSetting {
    pub community: String,
    pub version: String,
    pub host: Option<String>,
    pub interface: Option<String>,
}

/// Management access: either a permitted source or a scalar option
/// (`timeout 30`, `server enable`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AccessSetting {
    Allow {
        address: String,
        mask: String,
        interface: String,
    },
    Option {
        key: String,
        value: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClockSetting {
    pub key: String,
    pub value: String,
}
