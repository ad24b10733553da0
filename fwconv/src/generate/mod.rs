//! IR → vendor text.
//!
//! Every generator has the shape `fn(&ConfigModel, VendorId) -> Result<String,
//! GenerateError>`: the vendor id is the origin of the IR and only feeds the
//! header comment and a few naming choices. Categories are written in a fixed
//! order and skipped entirely when empty.

pub mod asa;
mod cisco;
pub mod fortigate;
pub mod ftd;
pub mod paloalto;

use std::borrow::Cow;

use thiserror::Error;

use crate::model::{defaults, Action, ConfigModel, Interface, SecurityPolicy, ServiceRef};
use crate::vendor::VendorId;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to format generated text: {0}")]
    Format(#[from] std::fmt::Error),
    #[error(transparent)]
    Xml(#[from] fwconv_xml::WriteError),
}

/// Policies to render. When the IR has none but carries interface ACL
/// bindings, each binding becomes one deny-any rule named after its ACL.
pub(crate) fn effective_policies(model: &ConfigModel) -> Cow<'_, [SecurityPolicy]> {
    if !model.policies.is_empty() || model.access_groups.is_empty() {
        return Cow::Borrowed(&model.policies);
    }
    let synthesized = model
        .access_groups
        .iter()
        .map(|binding| SecurityPolicy {
            name: Some(binding.acl.clone()),
            action: Action::Deny,
            source_zone: (!binding.interface.is_empty()).then(|| binding.interface.clone()),
            ..SecurityPolicy::default()
        })
        .collect();
    Cow::Owned(synthesized)
}

pub(crate) fn is_cisco(vendor: VendorId) -> bool {
    matches!(vendor, VendorId::CiscoAsa | VendorId::CiscoFtd)
}

/// Interface referenced by name, nameif/alias, or zone, in that order.
pub(crate) fn find_interface<'a>(model: &'a ConfigModel, reference: &str) -> Option<&'a Interface> {
    model
        .interface(reference)
        .or_else(|| model.interface_by_alias(reference))
        .or_else(|| {
            model
                .interfaces
                .iter()
                .find(|i| i.zone.as_deref() == Some(reference))
        })
}

/// Escape `\` and `"` for a double-quoted value.
pub(crate) fn escape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Common service names that several dialects predefine.
pub(crate) fn well_known_service(name: &str) -> Option<ServiceRef> {
    let port = |protocol: &str, port: &str| ServiceRef::Port {
        protocol: protocol.to_string(),
        port: port.to_string(),
    };
    let service = match name.to_ascii_lowercase().as_str() {
        "http" | "www" | "service-http" => port("tcp", "80"),
        "https" | "service-https" => port("tcp", "443"),
        "ssh" => port("tcp", "22"),
        "telnet" => port("tcp", "23"),
        "ftp" => port("tcp", "21"),
        "smtp" => port("tcp", "25"),
        "dns" | "domain" => port("udp", "53"),
        "ntp" => port("udp", "123"),
        "snmp" => port("udp", "161"),
        "rdp" => port("tcp", "3389"),
        "ldap" => port("tcp", "389"),
        "ping" | "all_icmp" => ServiceRef::Protocol("icmp".to_string()),
        "all_tcp" => ServiceRef::Protocol("tcp".to_string()),
        "all_udp" => ServiceRef::Protocol("udp".to_string()),
        "all" => ServiceRef::Any,
        _ => return None,
    };
    Some(service)
}

/// `aes256-sha256` → Cisco transform values `aes-256` / `sha-256`. Anything
/// unrecognized takes the default transform values.
pub(crate) fn cisco_transform(proposal: &str) -> (String, String) {
    let (encryption, hash) = proposal.split_once('-').unwrap_or((proposal, ""));
    let encryption = match encryption {
        "aes192" => "aes-192",
        "aes256" | "aes256gcm" => "aes-256",
        "3des" => "3des",
        "des" => "des",
        _ => defaults::TRANSFORM_ENCRYPTION,
    };
    let hash = match hash {
        "sha256" => "sha-256",
        "sha384" => "sha-384",
        "sha512" => "sha-512",
        "md5" => "md5",
        _ => defaults::TRANSFORM_HASH,
    };
    (encryption.to_string(), hash.to_string())
}

/// Cisco `aes-256` / `sha` → FortiGate proposal `aes256-sha1`.
pub(crate) fn forti_proposal(encryption: &str, hash: &str) -> String {
    let encryption = match encryption {
        "aes" => "aes128",
        "aes-192" => "aes192",
        "aes-256" => "aes256",
        other => other,
    };
    let hash = match hash {
        "sha" => "sha1",
        "sha-256" => "sha256",
        "sha-384" => "sha384",
        "sha-512" => "sha512",
        other => other,
    };
    format!("{encryption}-{hash}")
}

#[cfg(test)]
mod tests {
    use super::{
        cisco_transform, effective_policies, escape_quoted, find_interface, forti_proposal,
        well_known_service,
    };
    use crate::model::{AccessGroup, Action, ConfigModel, Interface, SecurityPolicy, ServiceRef};

    #[test]
    fn bindings_become_deny_rules_only_without_policies() {
        let mut model = ConfigModel::default();
        model.access_groups.push(AccessGroup {
            acl: "outside_in".to_string(),
            direction: "in".to_string(),
            interface: "outside".to_string(),
        });
        let policies = effective_policies(&model);
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].name.as_deref(), Some("outside_in"));
        assert_eq!(policies[0].action, Action::Deny);
        assert_eq!(policies[0].source_zone.as_deref(), Some("outside"));

        model.policies.push(SecurityPolicy::default());
        assert_eq!(effective_policies(&model).len(), 1);
        assert!(effective_policies(&model)[0].name.is_none());
    }

    #[test]
    fn interfaces_resolve_by_name_alias_then_zone() {
        let mut model = ConfigModel::default();
        let mut port = Interface::new("port1");
        port.description = Some("wan".to_string());
        port.zone = Some("untrust".to_string());
        model.interfaces.push(port);
        for reference in ["port1", "wan", "untrust"] {
            assert_eq!(
                find_interface(&model, reference).map(|i| i.name.as_str()),
                Some("port1")
            );
        }
        assert!(find_interface(&model, "dmz").is_none());
    }

    #[test]
    fn quoting_and_service_names() {
        assert_eq!(escape_quoted(r#"say "hi" \ bye"#), r#"say \"hi\" \\ bye"#);
        assert_eq!(
            well_known_service("HTTPS"),
            Some(ServiceRef::Port {
                protocol: "tcp".to_string(),
                port: "443".to_string()
            })
        );
        assert_eq!(well_known_service("custom-app"), None);
    }

    #[test]
    fn proposals_translate_both_ways() {
        assert_eq!(
            cisco_transform("aes256-sha256"),
            ("aes-256".to_string(), "sha-256".to_string())
        );
        assert_eq!(cisco_transform("aes128-sha1"), ("aes".to_string(), "sha".to_string()));
        assert_eq!(forti_proposal("aes-256", "sha"), "aes256-sha1");
    }
}
