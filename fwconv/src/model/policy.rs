use serde::Serialize;

use super::defaults::ANY;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Permit,
    #[default]
    Deny,
}

impl Action {
    /// `permit`, `allow` and `accept` (any case) permit; everything else denies.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if ["permit", "allow", "accept"]
            .iter()
            .any(|word| text.eq_ignore_ascii_case(word))
        {
            Action::Permit
        } else {
            Action::Deny
        }
    }

    pub fn is_permit(self) -> bool {
        self == Action::Permit
    }
}

/// One security rule. Policy order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityPolicy {
    pub name: Option<String>,
    /// Positional or vendor-assigned id.
    pub id: Option<u32>,
    pub action: Action,
    pub protocol: String,
    pub source: Vec<String>,
    pub destination: Vec<String>,
    pub service: Vec<String>,
    pub source_zone: Option<String>,
    pub destination_zone: Option<String>,
    pub application: Vec<String>,
    pub description: Option<String>,
    pub enabled: bool,
    pub log: bool,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            name: None,
            id: None,
            action: Action::Deny,
            protocol: "ip".to_string(),
            source: Vec::new(),
            destination: Vec::new(),
            service: Vec::new(),
            source_zone: None,
            destination_zone: None,
            application: Vec::new(),
            description: None,
            enabled: true,
            log: false,
        }
    }
}

impl SecurityPolicy {
    /// Source endpoints, `["any"]` when none were given.
    pub fn sources(&self) -> Vec<&str> {
        or_any(&self.source)
    }

    pub fn destinations(&self) -> Vec<&str> {
        or_any(&self.destination)
    }

    pub fn services(&self) -> Vec<&str> {
        or_any(&self.service)
    }

    /// Name, else `rule-<id>`, else `rule-<position>`.
    pub fn label(&self, position: usize) -> String {
        match (&self.name, self.id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("rule-{id}"),
            (None, None) => format!("rule-{}", position + 1),
        }
    }
}

fn or_any(values: &[String]) -> Vec<&str> {
    if values.is_empty() {
        vec![ANY]
    } else {
        values.iter().map(String::as_str).collect()
    }
}

/// `access-group <acl> in|out interface <if>` binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessGroup {
    pub acl: String,
    pub direction: String,
    pub interface: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NatKind {
    #[default]
    Dynamic,
    Static,
    Global,
}

/// A NAT entry. Dynamic, static and global records share one list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NatRule {
    pub kind: NatKind,
    pub name: Option<String>,
    /// Real (pre-translation) address or object.
    pub source: Option<String>,
    pub destination: Option<String>,
    /// Mapped address, pool or `interface`.
    pub translated: Option<String>,
    pub source_interface: Option<String>,
    pub interface: Option<String>,
    /// `nat (inside) <id>` / `global (outside) <id>` pairing key.
    pub nat_id: Option<String>,
    pub description: Option<String>,
}

/// A class-map or policy-map block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SecurityProfile {
    pub name: String,
    pub kind: String,
    pub lines: Vec<String>,
}

/// A custom application definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Application {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// A custom URL category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UrlCategory {
    pub name: String,
    pub urls: Vec<String>,
    pub description: Option<String>,
}
