//! `!`-delimited output shared by the ASA and FTD generators.

use std::fmt::Write;

use super::{
    cisco_transform, effective_policies, find_interface, is_cisco, well_known_service,
    GenerateError,
};
use crate::model::{
    defaults, AccessSetting, AddressKind, AddressObject, ConfigModel, Endpoint, IkePolicy,
    Interface, NatKind, NatRule, SecurityPolicy, ServiceRef, TransformSet, TunnelGroup, VpnTunnel,
};
use crate::netmask;
use crate::vendor::VendorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flavor {
    Asa,
    Ftd,
}

impl Flavor {
    fn title(self) -> &'static str {
        match self {
            Flavor::Asa => "Cisco ASA",
            Flavor::Ftd => "Cisco FTD",
        }
    }

    fn default_hostname(self) -> &'static str {
        match self {
            Flavor::Asa => defaults::ASA_HOSTNAME,
            Flavor::Ftd => defaults::FTD_HOSTNAME,
        }
    }
}

/// Logging destinations that take a severity argument.
const LEVELLED_LOGGING: [&str; 7] = [
    "buffered", "console", "monitor", "trap", "asdm", "history", "mail",
];

pub(crate) fn generate(
    model: &ConfigModel,
    origin: VendorId,
    flavor: Flavor,
) -> Result<String, GenerateError> {
    let mut out = String::new();
    writeln!(out, "! {} Configuration", flavor.title())?;
    writeln!(out, "! Generated from {} configuration", origin.display_name())?;
    writeln!(out, "!")?;
    identity(&mut out, model, flavor)?;
    interfaces(&mut out, model)?;
    address_objects(&mut out, model)?;
    address_groups(&mut out, model)?;
    services(&mut out, model)?;
    policies(&mut out, model, origin)?;
    routes(&mut out, model)?;
    nat(&mut out, model)?;
    match flavor {
        Flavor::Asa => {
            vpn(&mut out, model)?;
            aaa_servers(&mut out, model)?;
        }
        Flavor::Ftd => managed_by_fmc(&mut out, model)?,
    }
    users(&mut out, model)?;
    system(&mut out, model)?;
    security_profiles(&mut out, model)?;
    unmapped(&mut out, model)?;
    Ok(out)
}

fn identity(out: &mut String, model: &ConfigModel, flavor: Flavor) -> Result<(), GenerateError> {
    let hostname = model
        .hostname
        .as_deref()
        .filter(|h| !h.is_empty())
        .unwrap_or(flavor.default_hostname());
    writeln!(out, "hostname {hostname}")?;
    if let Some(domain) = &model.device.domain {
        writeln!(out, "domain-name {domain}")?;
    }
    if flavor == Flavor::Asa {
        if let Some(password) = &model.device.enable_password {
            writeln!(out, "enable password {password}")?;
        }
        if let Some(password) = &model.device.password {
            writeln!(out, "passwd {password}")?;
        }
    }
    if let Some(timezone) = &model.device.timezone {
        writeln!(out, "! not converted: timezone {timezone}")?;
    }
    writeln!(out, "!")?;
    Ok(())
}

/// nameif for an interface: its alias, else a zone it alone carries, else its
/// name with `/` replaced.
fn nameif(model: &ConfigModel, interface: &Interface) -> String {
    if let Some(alias) = interface.description.as_deref().filter(|a| !a.is_empty()) {
        return alias.to_string();
    }
    if let Some(zone) = interface.zone.as_deref() {
        let carriers = model
            .interfaces
            .iter()
            .filter(|i| i.zone.as_deref() == Some(zone))
            .count();
        if carriers == 1 {
            return zone.to_string();
        }
    }
    interface.name.replace('/', "_")
}

fn nameif_for(model: &ConfigModel, reference: &str) -> String {
    find_interface(model, reference)
        .map(|i| nameif(model, i))
        .unwrap_or_else(|| reference.to_string())
}

fn nameif_or(model: &ConfigModel, reference: Option<&str>, fallback: &str) -> String {
    reference
        .map(|r| nameif_for(model, r))
        .unwrap_or_else(|| fallback.to_string())
}

fn security_level(model: &ConfigModel, interface: &Interface) -> Option<u8> {
    interface
        .security_level
        .or_else(|| match nameif(model, interface).as_str() {
            "inside" | "trust" => Some(100),
            "outside" | "untrust" => Some(0),
            _ => None,
        })
}

fn interfaces(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    for interface in &model.interfaces {
        writeln!(out, "interface {}", interface.name)?;
        if let Some(comment) = &interface.comment {
            writeln!(out, " description {comment}")?;
        }
        if let Some(vlan) = interface.vlan {
            writeln!(out, " vlan {vlan}")?;
        }
        writeln!(out, " nameif {}", nameif(model, interface))?;
        if let Some(level) = security_level(model, interface) {
            writeln!(out, " security-level {level}")?;
        }
        match interface.address() {
            Some((ip, mask)) => writeln!(out, " ip address {ip} {mask}")?,
            None => writeln!(out, " no ip address")?,
        }
        if !interface.enabled {
            writeln!(out, " shutdown")?;
        }
        writeln!(out, "!")?;
    }
    Ok(())
}

fn subnet_parts(object: &AddressObject) -> (String, String) {
    match &object.mask {
        Some(mask) => (object.value.clone(), mask.clone()),
        None => netmask::split_address_mask(&object.value)
            .unwrap_or_else(|| (object.value.clone(), "255.255.255.255".to_string())),
    }
}

fn address_objects(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    for object in &model.address_objects {
        writeln!(out, "object network {}", object.name)?;
        match object.kind {
            AddressKind::Host => writeln!(out, " host {}", object.value)?,
            AddressKind::Subnet => {
                let (address, mask) = subnet_parts(object);
                writeln!(out, " subnet {address} {mask}")?;
            }
            AddressKind::Range => {
                let (start, end) = object
                    .value
                    .split_once('-')
                    .unwrap_or((object.value.as_str(), object.value.as_str()));
                writeln!(out, " range {start} {end}")?;
            }
            AddressKind::Fqdn => writeln!(out, " fqdn {}", object.value)?,
        }
        if let Some(description) = &object.description {
            writeln!(out, " description {description}")?;
        }
        writeln!(out, "!")?;
    }
    Ok(())
}

fn address_groups(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    for group in &model.address_groups {
        writeln!(out, "object-group network {}", group.name)?;
        if let Some(description) = &group.description {
            writeln!(out, " description {description}")?;
        }
        for member in &group.members {
            match Endpoint::classify(member) {
                Endpoint::Any => writeln!(out, " network-object 0.0.0.0 0.0.0.0")?,
                Endpoint::Host(address) => writeln!(out, " network-object host {address}")?,
                Endpoint::Network { address, mask } => {
                    writeln!(out, " network-object {address} {mask}")?;
                }
                Endpoint::Named(name) if model.address_group(&name).is_some() => {
                    writeln!(out, " group-object {name}")?;
                }
                Endpoint::Named(name) => writeln!(out, " network-object object {name}")?,
            }
        }
        writeln!(out, "!")?;
    }
    Ok(())
}

/// `1000-2000` → `range 1000 2000`; `443` → `eq 443`.
fn port_operand(port: &str) -> String {
    match port.split_once('-') {
        Some((start, end)) => format!("range {start} {end}"),
        None => format!("eq {port}"),
    }
}

fn services(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    for service in &model.services {
        let protocol = if service.protocol.is_empty() {
            "tcp"
        } else {
            service.protocol.as_str()
        };
        match service.port.as_deref() {
            Some(ports) if ports.contains(',') => {
                writeln!(out, "object-group service {} {protocol}", service.name)?;
                for port in ports.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    writeln!(out, " port-object {}", port_operand(port))?;
                }
            }
            Some(port) => {
                writeln!(out, "object service {}", service.name)?;
                writeln!(out, " service {protocol} destination {}", port_operand(port))?;
            }
            None => {
                writeln!(out, "object service {}", service.name)?;
                writeln!(out, " service {protocol}")?;
            }
        }
        if let Some(description) = &service.description {
            writeln!(out, " description {description}")?;
        }
        writeln!(out, "!")?;
    }
    Ok(())
}

fn endpoint_operand(model: &ConfigModel, text: &str) -> String {
    match Endpoint::classify(text) {
        Endpoint::Any => defaults::ANY.to_string(),
        Endpoint::Host(address) => format!("host {address}"),
        Endpoint::Network { mask, .. } if mask == "0.0.0.0" => defaults::ANY.to_string(),
        Endpoint::Network { address, mask } if mask == "255.255.255.255" => {
            format!("host {address}")
        }
        Endpoint::Network { address, mask } => format!("{address} {mask}"),
        Endpoint::Named(name) if model.address_group(&name).is_some() => {
            format!("object-group {name}")
        }
        Endpoint::Named(name) => format!("object {name}"),
    }
}

/// Protocol operand and optional destination-port operand for one service.
fn service_operands(
    model: &ConfigModel,
    policy: &SecurityPolicy,
    service: &str,
) -> (String, Option<String>) {
    let reference = match ServiceRef::classify(service) {
        ServiceRef::Named(name) => {
            if let Some(object) = model.services.iter().find(|s| s.name == name) {
                return match object.port.as_deref() {
                    Some(ports) if ports.contains(',') => (
                        object.protocol.clone(),
                        Some(format!("object-group {name}")),
                    ),
                    _ => (format!("object {name}"), None),
                };
            }
            match well_known_service(&name) {
                Some(reference) => reference,
                None => return (format!("object {name}"), None),
            }
        }
        other => other,
    };
    match reference {
        ServiceRef::Any => {
            let protocol = match policy.protocol.as_str() {
                p @ ("tcp" | "udp" | "icmp" | "esp" | "gre") => p,
                _ => "ip",
            };
            (protocol.to_string(), None)
        }
        ServiceRef::Protocol(protocol) => (protocol, None),
        ServiceRef::Port { protocol, port } => (protocol, Some(port_operand(&port))),
        ServiceRef::Named(name) => (format!("object {name}"), None),
    }
}

/// ACL a rule lands in, and the interface it binds to when derived from a zone.
fn acl_name(
    model: &ConfigModel,
    policy: &SecurityPolicy,
    origin: VendorId,
) -> (String, Option<String>) {
    let zone = policy.source_zone.as_deref().map(|z| nameif_for(model, z));
    if let Some(name) = policy.name.as_deref() {
        if model.access_groups.iter().any(|g| g.acl == name) {
            return (name.to_string(), zone);
        }
    }
    if let Some(zone) = zone {
        return (format!("{zone}_access_in"), Some(zone));
    }
    match policy.name.as_deref() {
        Some(name) if is_cisco(origin) => (name.to_string(), None),
        _ => (defaults::GLOBAL_ACL.to_string(), None),
    }
}

fn policies(out: &mut String, model: &ConfigModel, origin: VendorId) -> Result<(), GenerateError> {
    let policies = effective_policies(model);
    if policies.is_empty() {
        return Ok(());
    }
    let mut acls: Vec<(String, Option<String>)> = Vec::new();
    for policy in policies.iter() {
        let (acl, zone) = acl_name(model, policy, origin);
        if let Some(description) = &policy.description {
            writeln!(out, "access-list {acl} remark {description}")?;
        }
        if !policy.application.is_empty() {
            writeln!(
                out,
                "access-list {acl} remark applications: {}",
                policy.application.join(", ")
            )?;
        }
        let action = if policy.action.is_permit() {
            "permit"
        } else {
            "deny"
        };
        for source in policy.sources() {
            for destination in policy.destinations() {
                for service in policy.services() {
                    let (protocol, port) = service_operands(model, policy, service);
                    let mut line = format!(
                        "access-list {acl} extended {action} {protocol} {} {}",
                        endpoint_operand(model, source),
                        endpoint_operand(model, destination)
                    );
                    if let Some(port) = port {
                        line.push(' ');
                        line.push_str(&port);
                    }
                    if policy.log {
                        line.push_str(" log");
                    }
                    if !policy.enabled {
                        line.push_str(" inactive");
                    }
                    writeln!(out, "{line}")?;
                }
            }
        }
        if !acls.iter().any(|(name, _)| *name == acl) {
            acls.push((acl, zone));
        }
    }

    if model.access_groups.is_empty() {
        for (acl, zone) in &acls {
            match zone {
                Some(zone) => writeln!(out, "access-group {acl} in interface {zone}")?,
                None if acl == defaults::GLOBAL_ACL => writeln!(out, "access-group {acl} global")?,
                None => {}
            }
        }
    } else {
        for binding in &model.access_groups {
            if binding.direction == "global" || binding.interface.is_empty() {
                writeln!(out, "access-group {} global", binding.acl)?;
            } else {
                writeln!(
                    out,
                    "access-group {} {} interface {}",
                    binding.acl, binding.direction, binding.interface
                )?;
            }
        }
    }
    writeln!(out, "!")?;
    Ok(())
}

fn routes(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    if model.routes.is_empty() {
        return Ok(());
    }
    for route in &model.routes {
        let interface = nameif_or(model, route.interface.as_deref(), defaults::EGRESS_INTERFACE);
        let Some(gateway) = &route.gateway else {
            writeln!(
                out,
                "! not converted: route {} {} via {interface} has no gateway",
                route.network, route.mask
            )?;
            continue;
        };
        match route.distance {
            Some(distance) => writeln!(
                out,
                "route {interface} {} {} {gateway} {distance}",
                route.network, route.mask
            )?,
            None => writeln!(out, "route {interface} {} {} {gateway}", route.network, route.mask)?,
        }
    }
    writeln!(out, "!")?;
    Ok(())
}

fn nat(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    for rule in &model.nat {
        nat_rule(out, model, rule)?;
    }
    Ok(())
}

/// Mapped address of the `global` that shares a legacy `nat` rule's id.
fn paired_global<'a>(model: &'a ConfigModel, rule: &NatRule) -> Option<&'a str> {
    let id = rule.nat_id.as_deref()?;
    model
        .nat
        .iter()
        .find(|r| r.kind == NatKind::Global && r.nat_id.as_deref() == Some(id))
        .and_then(|r| r.translated.as_deref())
}

fn nat_rule(out: &mut String, model: &ConfigModel, rule: &NatRule) -> Result<(), GenerateError> {
    let kind = match rule.kind {
        NatKind::Static => "static",
        NatKind::Dynamic => "dynamic",
        NatKind::Global => {
            let paired = rule.nat_id.is_some()
                && model
                    .nat
                    .iter()
                    .any(|r| r.kind != NatKind::Global && r.nat_id == rule.nat_id);
            if !paired {
                let label = rule
                    .name
                    .as_deref()
                    .or(rule.nat_id.as_deref())
                    .unwrap_or("pool");
                writeln!(
                    out,
                    "! not converted: address pool {label} {}",
                    rule.translated.as_deref().unwrap_or_default()
                )?;
                writeln!(out, "!")?;
            }
            return Ok(());
        }
    };
    let Some(source) = rule.source.as_deref() else {
        writeln!(out, "! not converted: NAT rule without a real address")?;
        writeln!(out, "!")?;
        return Ok(());
    };
    let translated = rule
        .translated
        .as_deref()
        .or_else(|| paired_global(model, rule))
        .unwrap_or("interface");
    let interfaces = format!(
        "({},{})",
        nameif_or(model, rule.source_interface.as_deref(), defaults::ANY),
        nameif_or(model, rule.interface.as_deref(), defaults::EGRESS_INTERFACE)
    );
    let destination = rule
        .destination
        .as_deref()
        .filter(|d| Endpoint::classify(d) != Endpoint::Any);
    if let Some(description) = &rule.description {
        writeln!(out, "! {description}")?;
    }

    let object = match Endpoint::classify(source) {
        Endpoint::Any => {
            writeln!(out, "nat {interfaces} after-auto source {kind} any {translated}")?;
            writeln!(out, "!")?;
            return Ok(());
        }
        Endpoint::Named(name) if !model.declares(&name) => {
            writeln!(
                out,
                "! not converted: nat {interfaces} {kind} {name} {translated}, {name} is not a network object"
            )?;
            writeln!(out, "!")?;
            return Ok(());
        }
        Endpoint::Named(name) => {
            if let Some(destination) = destination {
                writeln!(
                    out,
                    "nat {interfaces} source {kind} {name} {translated} destination static {destination} {destination}"
                )?;
                writeln!(out, "!")?;
                return Ok(());
            }
            writeln!(out, "object network {name}")?;
            name
        }
        Endpoint::Host(address) => {
            let name = format!("nat-{}", rule.name.as_deref().unwrap_or(&address));
            writeln!(out, "object network {name}")?;
            writeln!(out, " host {address}")?;
            name
        }
        Endpoint::Network { address, mask } => {
            let name = match rule.name.as_deref() {
                Some(label) => format!("nat-{label}"),
                None => format!("nat-{address}-{}", netmask::mask_to_prefix(&mask)),
            };
            writeln!(out, "object network {name}")?;
            writeln!(out, " subnet {address} {mask}")?;
            name
        }
    };
    tracing::trace!(object = %object, translated, "writing object nat");
    writeln!(out, " nat {interfaces} {kind} {translated}")?;
    writeln!(out, "!")?;
    Ok(())
}

fn ike_policy(out: &mut String, policy: &IkePolicy) -> Result<(), GenerateError> {
    writeln!(out, "crypto ikev1 policy {}", policy.priority)?;
    writeln!(out, " authentication {}", policy.authentication)?;
    writeln!(out, " encryption {}", policy.encryption)?;
    writeln!(out, " hash {}", policy.hash)?;
    writeln!(out, " group {}", policy.group)?;
    writeln!(out, " lifetime {}", policy.lifetime)?;
    writeln!(out, "!")?;
    Ok(())
}

/// Transform set(s) a tunnel uses, adding one to `sets` when its proposal
/// names no declared set.
fn transform_for(tunnel: &VpnTunnel, sets: &mut Vec<TransformSet>) -> String {
    let proposal = tunnel.proposal.as_deref().unwrap_or_default();
    let declared = |name: &str, sets: &[TransformSet]| sets.iter().any(|s| s.name == name);
    if !proposal.is_empty() && proposal.split_whitespace().all(|name| declared(name, sets)) {
        return proposal.to_string();
    }
    let name = match proposal.split_whitespace().next() {
        Some(first) => first.to_string(),
        None => match sets.first() {
            Some(set) => return set.name.clone(),
            None => defaults::TRANSFORM_SET.to_string(),
        },
    };
    if !declared(&name, sets) {
        let (encryption, hash) = cisco_transform(&name);
        sets.push(TransformSet {
            name: name.clone(),
            protocol: defaults::TRANSFORM_PROTOCOL.to_string(),
            encryption,
            hash,
        });
    }
    name
}

/// `access-list <tunnel>_cryptomap` built from the tunnel's phase-2 selectors.
fn crypto_acl(
    out: &mut String,
    model: &ConfigModel,
    tunnel: &VpnTunnel,
) -> Result<Option<String>, GenerateError> {
    let acl = format!("{}_cryptomap", tunnel.name);
    let mut written = false;
    for selector in model
        .vpn
        .phase2
        .iter()
        .filter(|p| p.phase1_name == tunnel.name)
    {
        let operand = |subnet: Option<&str>| endpoint_operand(model, subnet.unwrap_or_default());
        writeln!(
            out,
            "access-list {acl} extended permit ip {} {}",
            operand(selector.src_subnet.as_deref()),
            operand(selector.dst_subnet.as_deref())
        )?;
        written = true;
    }
    Ok(written.then_some(acl))
}

fn is_encrypted(secret: &str) -> bool {
    secret.starts_with("ENC ")
}

fn tunnel_group(out: &mut String, group: &TunnelGroup) -> Result<(), GenerateError> {
    writeln!(
        out,
        "tunnel-group {} type {}",
        group.name,
        group.kind.as_deref().unwrap_or("ipsec-l2l")
    )?;
    if let Some(policy) = &group.default_group_policy {
        writeln!(out, "tunnel-group {} general-attributes", group.name)?;
        writeln!(out, " default-group-policy {policy}")?;
    }
    match group.pre_shared_key.as_deref() {
        Some(key) if is_encrypted(key) => {
            writeln!(
                out,
                "! not converted: pre-shared key for {} is encrypted in the source",
                group.name
            )?;
        }
        Some(key) => {
            writeln!(out, "tunnel-group {} ipsec-attributes", group.name)?;
            writeln!(out, " ikev1 pre-shared-key {key}")?;
        }
        None => {}
    }
    Ok(())
}

fn vpn(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    let vpn = &model.vpn;
    if vpn.is_empty() {
        return Ok(());
    }
    if vpn.ike_policies.is_empty() && !vpn.tunnels.is_empty() {
        ike_policy(
            out,
            &IkePolicy {
                priority: defaults::IKE_PRIORITY.to_string(),
                authentication: defaults::IKE_AUTHENTICATION.to_string(),
                encryption: defaults::IKE_ENCRYPTION.to_string(),
                hash: defaults::IKE_HASH.to_string(),
                group: defaults::IKE_DH_GROUP.to_string(),
                lifetime: defaults::IKE_LIFETIME.to_string(),
            },
        )?;
    }
    for policy in &vpn.ike_policies {
        ike_policy(out, policy)?;
    }

    let mut sets = vpn.transform_sets.clone();
    let selected: Vec<String> = vpn
        .tunnels
        .iter()
        .map(|t| transform_for(t, &mut sets))
        .collect();
    for set in &sets {
        writeln!(
            out,
            "crypto ipsec ikev1 transform-set {} {protocol}-{} {protocol}-{}-hmac",
            set.name,
            set.encryption,
            set.hash,
            protocol = set.protocol
        )?;
    }

    let mut bindings: Vec<(String, String)> = Vec::new();
    for (idx, (tunnel, set)) in vpn.tunnels.iter().zip(&selected).enumerate() {
        let map = match tunnel.sequence {
            Some(_) => tunnel.name.clone(),
            None => defaults::CRYPTO_MAP.to_string(),
        };
        let sequence = tunnel.sequence.unwrap_or(10 * (idx as u32 + 1));
        if let Some(description) = &tunnel.description {
            writeln!(out, "! {description}")?;
        }
        let acl = match &tunnel.acl {
            Some(acl) => Some(acl.clone()),
            None => crypto_acl(out, model, tunnel)?,
        };
        if let Some(acl) = acl {
            writeln!(out, "crypto map {map} {sequence} match address {acl}")?;
        }
        if let Some(peer) = &tunnel.peer {
            writeln!(out, "crypto map {map} {sequence} set peer {peer}")?;
        }
        writeln!(out, "crypto map {map} {sequence} set ikev1 transform-set {set}")?;
        let interface = nameif_or(model, tunnel.interface.as_deref(), defaults::EGRESS_INTERFACE);
        if !bindings.iter().any(|(m, i)| *m == map && *i == interface) {
            bindings.push((map, interface));
        }
    }
    for (map, interface) in &bindings {
        writeln!(out, "crypto map {map} interface {interface}")?;
    }
    let mut enabled: Vec<&str> = Vec::new();
    for (_, interface) in &bindings {
        if !enabled.contains(&interface.as_str()) {
            writeln!(out, "crypto ikev1 enable {interface}")?;
            enabled.push(interface);
        }
    }

    for group in &vpn.group_policies {
        writeln!(
            out,
            "group-policy {} {}",
            group.name,
            group.kind.as_deref().unwrap_or("internal")
        )?;
        if group.vpn_protocols.is_some() || group.dns_server.is_some() {
            writeln!(out, "group-policy {} attributes", group.name)?;
            if let Some(protocols) = &group.vpn_protocols {
                writeln!(out, " vpn-tunnel-protocol {protocols}")?;
            }
            if let Some(dns) = &group.dns_server {
                writeln!(out, " dns-server value {dns}")?;
            }
        }
    }
    for group in &vpn.tunnel_groups {
        tunnel_group(out, group)?;
    }
    for tunnel in &vpn.tunnels {
        let Some(peer) = tunnel.peer.as_deref() else {
            continue;
        };
        if vpn.tunnel_groups.iter().any(|g| g.name == peer) {
            continue;
        }
        tunnel_group(
            out,
            &TunnelGroup {
                name: peer.to_string(),
                kind: None,
                default_group_policy: None,
                pre_shared_key: tunnel.pre_shared_key.clone(),
            },
        )?;
    }
    writeln!(out, "!")?;
    Ok(())
}

fn aaa_servers(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    for server in &model.aaa_servers {
        writeln!(out, "aaa-server {} protocol {}", server.name, server.protocol)?;
        if let Some(host) = &server.host {
            let interface =
                nameif_or(model, server.interface.as_deref(), defaults::MANAGEMENT_INTERFACE);
            writeln!(out, "aaa-server {} ({interface}) host {host}", server.name)?;
            writeln!(out, " server-port {}", server.port)?;
            if let Some(base_dn) = &server.base_dn {
                writeln!(out, " ldap-base-dn {base_dn}")?;
            }
        }
        writeln!(out, "!")?;
    }
    Ok(())
}

/// FTD leaves site-to-site VPN and AAA realms to the management center.
fn managed_by_fmc(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    let mut written = false;
    for tunnel in &model.vpn.tunnels {
        writeln!(
            out,
            "! not converted: VPN tunnel {} to {} is managed by FMC",
            tunnel.name,
            tunnel.peer.as_deref().unwrap_or("unknown peer")
        )?;
        written = true;
    }
    for server in &model.aaa_servers {
        writeln!(
            out,
            "! not converted: AAA server {} ({}) is managed by FMC",
            server.name, server.protocol
        )?;
        written = true;
    }
    if written {
        writeln!(out, "!")?;
    }
    Ok(())
}

fn users(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    if model.users.is_empty() {
        return Ok(());
    }
    for user in &model.users {
        match user.secret.as_deref() {
            Some(secret) if !is_encrypted(secret) => writeln!(
                out,
                "username {} password {secret} privilege {}",
                user.username, user.privilege
            )?,
            _ => writeln!(
                out,
                "username {} nopassword privilege {}",
                user.username, user.privilege
            )?,
        }
    }
    writeln!(out, "!")?;
    Ok(())
}

fn access_settings(
    out: &mut String,
    command: &str,
    settings: &[AccessSetting],
) -> Result<(), GenerateError> {
    for setting in settings {
        match setting {
            AccessSetting::Allow {
                address,
                mask,
                interface,
            } => writeln!(out, "{command} {address} {mask} {interface}")?,
            AccessSetting::Option { key, value } => {
                writeln!(out, "{}", format!("{command} {key} {value}").trim_end())?;
            }
        }
    }
    Ok(())
}

fn system(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    let system = &model.system;
    if system.is_empty() {
        return Ok(());
    }
    let has_hosts = system.logging.iter().any(|l| l.target == "host");
    if has_hosts && !system.logging.iter().any(|l| l.target == "enable") {
        writeln!(out, "logging enable")?;
    }
    for log in &system.logging {
        match (log.target.as_str(), log.host.as_deref()) {
            ("host", Some(host)) => {
                let interface =
                    nameif_or(model, log.interface.as_deref(), defaults::MANAGEMENT_INTERFACE);
                writeln!(out, "logging host {interface} {host}")?;
            }
            ("host", None) => {}
            (target, _) if LEVELLED_LOGGING.contains(&target) => {
                writeln!(out, "logging {target} {}", log.level)?;
            }
            (target, _) => writeln!(out, "logging {target}")?,
        }
    }
    for snmp in &system.snmp {
        match &snmp.host {
            Some(host) => {
                let interface =
                    nameif_or(model, snmp.interface.as_deref(), defaults::MANAGEMENT_INTERFACE);
                writeln!(
                    out,
                    "snmp-server host {interface} {host} community {} version {}",
                    snmp.community, snmp.version
                )?;
            }
            None => writeln!(out, "snmp-server community {}", snmp.community)?,
        }
    }
    access_settings(out, "ssh", &system.ssh)?;
    access_settings(out, "http", &system.http)?;
    for clock in &system.clock {
        writeln!(out, "clock {} {}", clock.key, clock.value)?;
    }
    writeln!(out, "!")?;
    Ok(())
}

fn security_profiles(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    for profile in &model.security_profiles {
        writeln!(out, "{} {}", profile.kind, profile.name)?;
        for line in &profile.lines {
            writeln!(out, " {line}")?;
        }
        writeln!(out, "!")?;
    }
    Ok(())
}

fn unmapped(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    if model.applications.is_empty() && model.url_categories.is_empty() {
        return Ok(());
    }
    for application in &model.applications {
        match &application.category {
            Some(category) => writeln!(
                out,
                "! not converted: application {} ({category})",
                application.name
            )?,
            None => writeln!(out, "! not converted: application {}", application.name)?,
        }
    }
    for category in &model.url_categories {
        writeln!(
            out,
            "! not converted: URL category {} ({} entries)",
            category.name,
            category.urls.len()
        )?;
    }
    writeln!(out, "!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{generate, port_operand, Flavor};
    use crate::model::{
        AccessGroup, Action, AddressGroup, AddressObject, ConfigModel, Interface, NatKind,
        NatRule, Phase2Selector, SecurityPolicy, VpnTunnel,
    };
    use crate::vendor::VendorId;

    fn forti_like() -> ConfigModel {
        let mut model = ConfigModel::default();
        let mut port1 = Interface::new("port1");
        port1.ip = Some("203.0.113.2".to_string());
        port1.mask = Some("255.255.255.0".to_string());
        port1.description = Some("outside".to_string());
        model.interfaces.push(port1);
        model
            .address_objects
            .push(AddressObject::host("web", "10.0.0.10"));
        model.address_groups.push(AddressGroup {
            name: "servers".to_string(),
            members: vec!["web".to_string(), "10.0.1.0/24".to_string()],
            description: None,
        });
        model.policies.push(SecurityPolicy {
            name: Some("allow-web".to_string()),
            action: Action::Permit,
            source_zone: Some("port1".to_string()),
            destination: vec!["servers".to_string()],
            service: vec!["tcp/443".to_string(), "HTTP".to_string()],
            ..SecurityPolicy::default()
        });
        model
    }

    #[test]
    fn zone_policies_land_in_interface_acls() {
        let text = generate(&forti_like(), VendorId::Fortigate, Flavor::Asa).unwrap();
        assert!(text.starts_with("! Cisco ASA Configuration\n! Generated from FortiGate configuration\n"));
        assert!(text.contains("hostname asa-converted\n"));
        assert!(text.contains(" nameif outside\n security-level 0\n"));
        assert!(text.contains(" network-object object web\n network-object 10.0.1.0 255.255.255.0\n"));
        assert!(text.contains(
            "access-list outside_access_in extended permit tcp any object-group servers eq 443\n"
        ));
        assert!(text.contains(
            "access-list outside_access_in extended permit tcp any object-group servers eq 80\n"
        ));
        assert!(text.contains("access-group outside_access_in in interface outside\n"));
    }

    #[test]
    fn empty_categories_write_nothing() {
        let text = generate(&ConfigModel::default(), VendorId::PaloAlto, Flavor::Asa).unwrap();
        assert_eq!(
            text,
            "! Cisco ASA Configuration\n! Generated from Palo Alto configuration\n!\nhostname asa-converted\n!\n"
        );
    }

    #[test]
    fn bindings_without_rules_yield_deny_entries() {
        let mut model = ConfigModel::default();
        model.access_groups.push(AccessGroup {
            acl: "outside_in".to_string(),
            direction: "in".to_string(),
            interface: "outside".to_string(),
        });
        let text = generate(&model, VendorId::CiscoFtd, Flavor::Asa).unwrap();
        assert!(text.contains("access-list outside_in extended deny ip any any\n"));
        assert!(text.contains("access-group outside_in in interface outside\n"));
    }

    #[test]
    fn literal_nat_sources_get_objects() {
        let mut model = forti_like();
        model.nat.push(NatRule {
            kind: NatKind::Static,
            name: Some("web-vip".to_string()),
            source: Some("10.0.0.10".to_string()),
            translated: Some("203.0.113.10".to_string()),
            interface: Some("port1".to_string()),
            ..NatRule::default()
        });
        model.nat.push(NatRule {
            kind: NatKind::Global,
            name: Some("pool".to_string()),
            translated: Some("203.0.113.20-203.0.113.30".to_string()),
            ..NatRule::default()
        });
        let text = generate(&model, VendorId::Fortigate, Flavor::Asa).unwrap();
        assert!(text.contains(
            "object network nat-web-vip\n host 10.0.0.10\n nat (any,outside) static 203.0.113.10\n!\n"
        ));
        assert!(text.contains("! not converted: address pool pool 203.0.113.20-203.0.113.30\n"));
    }

    #[test]
    fn tunnels_become_crypto_maps_with_synthesized_sets() {
        let mut model = ConfigModel::default();
        model.vpn.tunnels.push(VpnTunnel {
            name: "to-branch".to_string(),
            peer: Some("198.51.100.7".to_string()),
            proposal: Some("aes256-sha256".to_string()),
            pre_shared_key: Some("s3cret".to_string()),
            ..VpnTunnel::default()
        });
        model.vpn.phase2.push(Phase2Selector {
            name: "to-branch-p2".to_string(),
            phase1_name: "to-branch".to_string(),
            src_subnet: Some("10.0.0.0 255.255.255.0".to_string()),
            dst_subnet: Some("10.1.0.0 255.255.255.0".to_string()),
            ..Phase2Selector::default()
        });
        let text = generate(&model, VendorId::Fortigate, Flavor::Asa).unwrap();
        assert!(text.contains("crypto ikev1 policy 10\n authentication pre-share\n"));
        assert!(text.contains("crypto ipsec ikev1 transform-set aes256-sha256 esp-aes-256 esp-sha-256-hmac\n"));
        assert!(text.contains(
            "access-list to-branch_cryptomap extended permit ip 10.0.0.0 255.255.255.0 10.1.0.0 255.255.255.0\n"
        ));
        assert!(text.contains("crypto map outside_map 10 match address to-branch_cryptomap\n"));
        assert!(text.contains("crypto map outside_map 10 set peer 198.51.100.7\n"));
        assert!(text.contains("crypto map outside_map interface outside\n"));
        assert!(text.contains(
            "tunnel-group 198.51.100.7 type ipsec-l2l\ntunnel-group 198.51.100.7 ipsec-attributes\n ikev1 pre-shared-key s3cret\n"
        ));

        let ftd = generate(&model, VendorId::Fortigate, Flavor::Ftd).unwrap();
        assert!(!ftd.contains("crypto map"));
        assert!(ftd.contains("! not converted: VPN tunnel to-branch to 198.51.100.7 is managed by FMC\n"));
    }

    #[test]
    fn port_operands() {
        assert_eq!(port_operand("443"), "eq 443");
        assert_eq!(port_operand("1000-2000"), "range 1000 2000");
    }
}
