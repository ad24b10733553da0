//! FortiOS `config` / `edit` / `set` / `next` / `end` output.
//!
//! FortiGate policies can only reference named addresses and services, so
//! literal endpoints (`10.0.0.0/24`, `tcp/8443`) are turned into implied
//! address and custom-service entries named after the literal.

use std::fmt::Write;

use super::{
    escape_quoted, effective_policies, find_interface, forti_proposal, well_known_service,
    GenerateError,
};
use crate::model::{
    defaults, AccessSetting, AddressKind, ConfigModel, Endpoint, NatKind, NatRule,
    SecurityPolicy, ServiceRef, VpnTunnel,
};
use crate::netmask;
use crate::vendor::VendorId;

const EDIT: &str = "    ";
const SET: &str = "        ";

pub fn generate(model: &ConfigModel, origin: VendorId) -> Result<String, GenerateError> {
    let mut out = String::new();
    writeln!(out, "# FortiGate Configuration")?;
    writeln!(out, "# Generated from {} configuration", origin.display_name())?;
    writeln!(out)?;

    let policies = effective_policies(model);
    let mut implied = Implied::default();
    let groups: Vec<(&str, Vec<String>)> = model
        .address_groups
        .iter()
        .map(|g| {
            let members = g.members.iter().map(|m| implied.address(m)).collect();
            (g.name.as_str(), members)
        })
        .collect();
    let rendered: Vec<Rendered> = policies
        .iter()
        .enumerate()
        .map(|(position, policy)| {
            let shared = policy.name.is_some()
                && policies.iter().filter(|p| p.name == policy.name).count() > 1;
            implied.policy(model, policy, position, shared)
        })
        .collect();

    system_global(&mut out, model)?;
    interfaces(&mut out, model)?;
    zones(&mut out, model)?;
    addresses(&mut out, model, &implied)?;
    address_groups(&mut out, model, &groups)?;
    services(&mut out, model, &implied)?;
    write_policies(&mut out, &rendered)?;
    routes(&mut out, model)?;
    nat(&mut out, model)?;
    vpn(&mut out, model)?;
    users(&mut out, model)?;
    ldap(&mut out, model)?;
    logging(&mut out, model)?;
    snmp(&mut out, model)?;
    unmapped(&mut out, model, &policies)?;
    Ok(out)
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", escape_quoted(value))
}

/// FortiGate's own `ENC <blob>` form stays bare; any other secret is quoted.
fn secret(value: &str) -> String {
    let bare = value.strip_prefix("ENC ").is_some_and(|blob| {
        !blob.is_empty() && !blob.contains(|c: char| c.is_whitespace() || c == '"')
    });
    if bare {
        value.to_string()
    } else {
        quoted(value)
    }
}

fn quoted_list<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| quoted(v.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `10.0.0.0/24` or `10.0.0.0 255.255.255.0` → `10.0.0.0 255.255.255.0`.
fn address_mask(value: &str) -> String {
    match netmask::split_address_mask(value) {
        Some((address, mask)) => format!("{address} {mask}"),
        None => format!("{} 255.255.255.255", value.trim()),
    }
}

#[derive(Debug, Default)]
struct Implied {
    /// name, address, mask
    addresses: Vec<(String, String, String)>,
    /// name, protocol, port
    services: Vec<(String, String, String)>,
}

#[derive(Debug)]
struct Rendered {
    id: usize,
    name: String,
    srcintf: String,
    dstintf: String,
    srcaddr: Vec<String>,
    dstaddr: Vec<String>,
    service: Vec<String>,
    action: &'static str,
    log: bool,
    enabled: bool,
    comments: Option<String>,
}

impl Implied {
    fn address(&mut self, text: &str) -> String {
        match Endpoint::classify(text) {
            Endpoint::Any => "all".to_string(),
            Endpoint::Named(name) => name,
            Endpoint::Network { mask, .. } if mask == "0.0.0.0" => "all".to_string(),
            Endpoint::Host(address) => {
                self.implied_address(format!("{address}/32"), address, "255.255.255.255".to_string())
            }
            Endpoint::Network { address, mask } => {
                self.implied_address(netmask::to_cidr(&address, &mask), address, mask)
            }
        }
    }

    fn implied_address(&mut self, name: String, address: String, mask: String) -> String {
        if !self.addresses.iter().any(|(n, _, _)| *n == name) {
            self.addresses.push((name.clone(), address, mask));
        }
        name
    }

    fn service(&mut self, model: &ConfigModel, text: &str) -> String {
        let reference = match ServiceRef::classify(text) {
            ServiceRef::Named(name) => {
                if model.services.iter().any(|s| s.name == name) {
                    return name;
                }
                match well_known_service(&name) {
                    Some(reference) => reference,
                    None => return name,
                }
            }
            other => other,
        };
        match reference {
            ServiceRef::Any => "ALL".to_string(),
            ServiceRef::Protocol(protocol) => match protocol.as_str() {
                "tcp" => "ALL_TCP".to_string(),
                "udp" => "ALL_UDP".to_string(),
                "icmp" => "ALL_ICMP".to_string(),
                _ => "ALL".to_string(),
            },
            ServiceRef::Port { protocol, port } => {
                if let Some(name) = predefined_service(&protocol, &port) {
                    return name.to_string();
                }
                let name = format!("{protocol}-{port}");
                if !self.services.iter().any(|(n, _, _)| *n == name) {
                    self.services.push((name.clone(), protocol, port));
                }
                name
            }
            ServiceRef::Named(name) => name,
        }
    }

    /// `shared_name` marks rules whose name is not unique (Cisco ACL names).
    fn policy(
        &mut self,
        model: &ConfigModel,
        policy: &SecurityPolicy,
        position: usize,
        shared_name: bool,
    ) -> Rendered {
        let label = policy.label(position);
        let name = if shared_name {
            format!("{label}-{}", position + 1)
        } else {
            label
        };
        Rendered {
            id: position + 1,
            name,
            srcintf: interface_ref(model, policy.source_zone.as_deref()),
            dstintf: interface_ref(model, policy.destination_zone.as_deref()),
            srcaddr: policy.sources().into_iter().map(|s| self.address(s)).collect(),
            dstaddr: policy
                .destinations()
                .into_iter()
                .map(|d| self.address(d))
                .collect(),
            service: policy
                .services()
                .into_iter()
                .map(|s| self.service(model, s))
                .collect(),
            action: if policy.action.is_permit() {
                "accept"
            } else {
                "deny"
            },
            log: policy.log,
            enabled: policy.enabled,
            comments: policy.description.clone(),
        }
    }
}

fn predefined_service(protocol: &str, port: &str) -> Option<&'static str> {
    let name = match (protocol, port) {
        ("tcp", "80") => "HTTP",
        ("tcp", "443") => "HTTPS",
        ("tcp", "22") => "SSH",
        ("tcp", "23") => "TELNET",
        ("tcp", "21") => "FTP",
        ("tcp", "25") => "SMTP",
        ("udp", "53") => "DNS",
        ("udp", "123") => "NTP",
        ("udp", "161") => "SNMP",
        ("tcp", "3389") => "RDP",
        ("tcp", "389") => "LDAP",
        _ => return None,
    };
    Some(name)
}

/// Zone → FortiGate zone of that name, else the interface carrying it, else `any`.
fn interface_ref(model: &ConfigModel, zone: Option<&str>) -> String {
    let Some(zone) = zone else {
        return defaults::ANY.to_string();
    };
    if model.zones.iter().any(|z| z.name == zone) {
        return zone.to_string();
    }
    find_interface(model, zone)
        .map(|i| i.name.clone())
        .unwrap_or_else(|| defaults::ANY.to_string())
}

fn device_ref(model: &ConfigModel, reference: &str) -> String {
    find_interface(model, reference)
        .map(|i| i.name.clone())
        .unwrap_or_else(|| reference.to_string())
}

fn system_global(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    let hostname = model
        .hostname
        .as_deref()
        .filter(|h| !h.is_empty())
        .unwrap_or(defaults::FORTIGATE_HOSTNAME);
    writeln!(out, "config system global")?;
    writeln!(out, "{EDIT}set hostname {}", quoted(hostname))?;
    writeln!(out, "end")?;
    writeln!(out)?;
    Ok(())
}

/// `allowaccess` keywords granted to an interface by ssh/http allow entries.
fn allowaccess(model: &ConfigModel, alias: Option<&str>, name: &str) -> Vec<&'static str> {
    let granted = |settings: &[AccessSetting]| {
        settings.iter().any(|s| match s {
            AccessSetting::Allow { interface, .. } => {
                interface == name || Some(interface.as_str()) == alias
            }
            AccessSetting::Option { .. } => false,
        })
    };
    let mut access = Vec::new();
    if granted(&model.system.http) {
        access.push("https");
    }
    if granted(&model.system.ssh) {
        access.push("ssh");
    }
    access
}

fn interfaces(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    if model.interfaces.is_empty() {
        return Ok(());
    }
    writeln!(out, "config system interface")?;
    for interface in &model.interfaces {
        writeln!(out, "{EDIT}edit {}", quoted(&interface.name))?;
        writeln!(out, "{SET}set vdom \"root\"")?;
        if let Some((ip, mask)) = interface.address() {
            writeln!(out, "{SET}set ip {ip} {mask}")?;
        }
        let access = allowaccess(model, interface.description.as_deref(), &interface.name);
        if !access.is_empty() {
            writeln!(out, "{SET}set allowaccess {}", access.join(" "))?;
        }
        if let Some(alias) = &interface.description {
            writeln!(out, "{SET}set alias {}", quoted(alias))?;
        }
        if let Some(comment) = &interface.comment {
            writeln!(out, "{SET}set description {}", quoted(comment))?;
        }
        if let Some(vlan) = interface.vlan {
            writeln!(out, "{SET}set vlanid {vlan}")?;
        }
        if !interface.enabled {
            writeln!(out, "{SET}set status down")?;
        }
        writeln!(out, "{EDIT}next")?;
    }
    writeln!(out, "end")?;
    writeln!(out)?;
    Ok(())
}

fn zones(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    if model.zones.is_empty() {
        return Ok(());
    }
    writeln!(out, "config system zone")?;
    for zone in &model.zones {
        writeln!(out, "{EDIT}edit {}", quoted(&zone.name))?;
        if !zone.interfaces.is_empty() {
            writeln!(out, "{SET}set interface {}", quoted_list(&zone.interfaces))?;
        }
        if let Some(description) = &zone.description {
            writeln!(out, "{SET}set description {}", quoted(description))?;
        }
        writeln!(out, "{EDIT}next")?;
    }
    writeln!(out, "end")?;
    writeln!(out)?;
    Ok(())
}

fn addresses(out: &mut String, model: &ConfigModel, implied: &Implied) -> Result<(), GenerateError> {
    if model.address_objects.is_empty() && implied.addresses.is_empty() {
        return Ok(());
    }
    writeln!(out, "config firewall address")?;
    for object in &model.address_objects {
        writeln!(out, "{EDIT}edit {}", quoted(&object.name))?;
        match object.kind {
            AddressKind::Host => writeln!(out, "{SET}set subnet {} 255.255.255.255", object.value)?,
            AddressKind::Subnet => {
                let value = match &object.mask {
                    Some(mask) => format!("{} {mask}", object.value),
                    None => address_mask(&object.value),
                };
                writeln!(out, "{SET}set subnet {value}")?;
            }
            AddressKind::Range => {
                let (start, end) = object
                    .value
                    .split_once('-')
                    .unwrap_or((object.value.as_str(), object.value.as_str()));
                writeln!(out, "{SET}set type iprange")?;
                writeln!(out, "{SET}set start-ip {start}")?;
                writeln!(out, "{SET}set end-ip {end}")?;
            }
            AddressKind::Fqdn => {
                writeln!(out, "{SET}set type fqdn")?;
                writeln!(out, "{SET}set fqdn {}", quoted(&object.value))?;
            }
        }
        if let Some(description) = &object.description {
            writeln!(out, "{SET}set comment {}", quoted(description))?;
        }
        writeln!(out, "{EDIT}next")?;
    }
    for (name, address, mask) in &implied.addresses {
        writeln!(out, "{EDIT}edit {}", quoted(name))?;
        writeln!(out, "{SET}set subnet {address} {mask}")?;
        writeln!(out, "{EDIT}next")?;
    }
    writeln!(out, "end")?;
    writeln!(out)?;
    Ok(())
}

fn address_groups(
    out: &mut String,
    model: &ConfigModel,
    groups: &[(&str, Vec<String>)],
) -> Result<(), GenerateError> {
    if groups.is_empty() {
        return Ok(());
    }
    writeln!(out, "config firewall addrgrp")?;
    for ((name, members), group) in groups.iter().zip(&model.address_groups) {
        writeln!(out, "{EDIT}edit {}", quoted(name))?;
        if !members.is_empty() {
            writeln!(out, "{SET}set member {}", quoted_list(members))?;
        }
        if let Some(description) = &group.description {
            writeln!(out, "{SET}set comment {}", quoted(description))?;
        }
        writeln!(out, "{EDIT}next")?;
    }
    writeln!(out, "end")?;
    writeln!(out)?;
    Ok(())
}

fn port_ranges(out: &mut String, protocol: &str, ports: &str) -> Result<(), GenerateError> {
    let ranges = ports
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    match protocol {
        "tcp" => writeln!(out, "{SET}set tcp-portrange {ranges}")?,
        "udp" => writeln!(out, "{SET}set udp-portrange {ranges}")?,
        "sctp" => writeln!(out, "{SET}set sctp-portrange {ranges}")?,
        _ => {
            writeln!(out, "{SET}set tcp-portrange {ranges}")?;
            writeln!(out, "{SET}set udp-portrange {ranges}")?;
        }
    }
    Ok(())
}

fn services(out: &mut String, model: &ConfigModel, implied: &Implied) -> Result<(), GenerateError> {
    if model.services.is_empty() && implied.services.is_empty() {
        return Ok(());
    }
    writeln!(out, "config firewall service custom")?;
    for service in &model.services {
        writeln!(out, "{EDIT}edit {}", quoted(&service.name))?;
        let protocol = service.protocol.to_ascii_lowercase();
        match (protocol.as_str(), service.port.as_deref()) {
            ("icmp", _) => writeln!(out, "{SET}set protocol ICMP")?,
            ("ip" | "", None) => writeln!(out, "{SET}set protocol IP")?,
            (protocol, Some(port)) => port_ranges(out, protocol, port)?,
            (protocol, None) => port_ranges(out, protocol, "1-65535")?,
        }
        if let Some(description) = &service.description {
            writeln!(out, "{SET}set comment {}", quoted(description))?;
        }
        writeln!(out, "{EDIT}next")?;
    }
    for (name, protocol, port) in &implied.services {
        writeln!(out, "{EDIT}edit {}", quoted(name))?;
        port_ranges(out, protocol, port)?;
        writeln!(out, "{EDIT}next")?;
    }
    writeln!(out, "end")?;
    writeln!(out)?;
    Ok(())
}

fn write_policies(out: &mut String, policies: &[Rendered]) -> Result<(), GenerateError> {
    if policies.is_empty() {
        return Ok(());
    }
    writeln!(out, "config firewall policy")?;
    for policy in policies {
        writeln!(out, "{EDIT}edit {}", policy.id)?;
        writeln!(out, "{SET}set name {}", quoted(&policy.name))?;
        writeln!(out, "{SET}set srcintf {}", quoted(&policy.srcintf))?;
        writeln!(out, "{SET}set dstintf {}", quoted(&policy.dstintf))?;
        writeln!(out, "{SET}set srcaddr {}", quoted_list(&policy.srcaddr))?;
        writeln!(out, "{SET}set dstaddr {}", quoted_list(&policy.dstaddr))?;
        writeln!(out, "{SET}set action {}", policy.action)?;
        writeln!(out, "{SET}set schedule \"always\"")?;
        writeln!(out, "{SET}set service {}", quoted_list(&policy.service))?;
        if policy.log {
            writeln!(out, "{SET}set logtraffic all")?;
        }
        if !policy.enabled {
            writeln!(out, "{SET}set status disable")?;
        }
        if let Some(comments) = &policy.comments {
            writeln!(out, "{SET}set comments {}", quoted(comments))?;
        }
        writeln!(out, "{EDIT}next")?;
    }
    writeln!(out, "end")?;
    writeln!(out)?;
    Ok(())
}

fn routes(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    if model.routes.is_empty() {
        return Ok(());
    }
    writeln!(out, "config router static")?;
    for (idx, route) in model.routes.iter().enumerate() {
        writeln!(out, "{EDIT}edit {}", idx + 1)?;
        writeln!(out, "{SET}set dst {} {}", route.network, route.mask)?;
        if let Some(gateway) = &route.gateway {
            writeln!(out, "{SET}set gateway {gateway}")?;
        }
        if let Some(interface) = &route.interface {
            writeln!(out, "{SET}set device {}", quoted(&device_ref(model, interface)))?;
        }
        if let Some(distance) = route.distance {
            writeln!(out, "{SET}set distance {distance}")?;
        }
        if let Some(comment) = route.description.as_ref().or(route.name.as_ref()) {
            writeln!(out, "{SET}set comment {}", quoted(comment))?;
        }
        writeln!(out, "{EDIT}next")?;
    }
    writeln!(out, "end")?;
    writeln!(out)?;
    Ok(())
}

/// Real address a VIP maps to: a literal, or the value of a host object.
fn mapped_ip(model: &ConfigModel, source: &str) -> Option<String> {
    match Endpoint::classify(source) {
        Endpoint::Host(address) => Some(address),
        Endpoint::Named(name) => model
            .address_object(&name)
            .filter(|o| matches!(o.kind, AddressKind::Host | AddressKind::Range))
            .map(|o| o.value.clone()),
        _ => None,
    }
}

fn nat(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    let mut vips: Vec<(String, &NatRule, String)> = Vec::new();
    let mut pools: Vec<(String, &NatRule)> = Vec::new();
    let mut skipped: Vec<String> = Vec::new();
    for (idx, rule) in model.nat.iter().enumerate() {
        let label = rule
            .name
            .clone()
            .or_else(|| rule.nat_id.as_ref().map(|id| format!("nat-{id}")))
            .unwrap_or_else(|| format!("nat-{}", idx + 1));
        match rule.kind {
            NatKind::Static => match (
                rule.source.as_deref().and_then(|s| mapped_ip(model, s)),
                rule.translated.as_deref(),
            ) {
                (Some(mapped), Some(_)) => vips.push((label, rule, mapped)),
                _ => skipped.push(format!(
                    "static NAT {label} ({} -> {})",
                    rule.source.as_deref().unwrap_or("?"),
                    rule.translated.as_deref().unwrap_or("?")
                )),
            },
            NatKind::Global if rule.translated.is_some() => pools.push((label, rule)),
            NatKind::Global => skipped.push(format!("address pool {label} without addresses")),
            NatKind::Dynamic => skipped.push(format!(
                "dynamic NAT {label} ({} -> {}), enable NAT on the matching policy",
                rule.source.as_deref().unwrap_or(defaults::ANY),
                rule.translated.as_deref().unwrap_or("interface")
            )),
        }
    }

    if !vips.is_empty() {
        writeln!(out, "config firewall vip")?;
        for (name, rule, mapped) in &vips {
            writeln!(out, "{EDIT}edit {}", quoted(name))?;
            writeln!(out, "{SET}set extip {}", rule.translated.as_deref().unwrap_or_default())?;
            writeln!(out, "{SET}set mappedip {}", quoted(mapped))?;
            let extintf = rule
                .interface
                .as_deref()
                .map(|i| device_ref(model, i))
                .unwrap_or_else(|| defaults::ANY.to_string());
            writeln!(out, "{SET}set extintf {}", quoted(&extintf))?;
            if let Some(description) = &rule.description {
                writeln!(out, "{SET}set comment {}", quoted(description))?;
            }
            writeln!(out, "{EDIT}next")?;
        }
        writeln!(out, "end")?;
        writeln!(out)?;
    }
    if !pools.is_empty() {
        writeln!(out, "config firewall ippool")?;
        for (name, rule) in &pools {
            let translated = rule.translated.as_deref().unwrap_or_default();
            let (start, end) = translated.split_once('-').unwrap_or((translated, translated));
            writeln!(out, "{EDIT}edit {}", quoted(name))?;
            writeln!(out, "{SET}set startip {start}")?;
            writeln!(out, "{SET}set endip {end}")?;
            writeln!(out, "{EDIT}next")?;
        }
        writeln!(out, "end")?;
        writeln!(out)?;
    }
    for line in &skipped {
        writeln!(out, "# not converted: {line}")?;
    }
    if !skipped.is_empty() {
        writeln!(out)?;
    }
    Ok(())
}

fn phase1_name(tunnel: &VpnTunnel) -> String {
    match tunnel.sequence {
        Some(sequence) => format!("{}-{sequence}", tunnel.name),
        None => tunnel.name.clone(),
    }
}

/// FortiGate proposal for a tunnel: Cisco transform-set names are translated,
/// FortiGate-style proposals kept, everything else takes the default.
fn proposal(model: &ConfigModel, tunnel: &VpnTunnel) -> String {
    let Some(proposal) = tunnel.proposal.as_deref().filter(|p| !p.is_empty()) else {
        return defaults::PROPOSAL.to_string();
    };
    let sets: Vec<String> = proposal
        .split_whitespace()
        .filter_map(|name| model.vpn.transform_sets.iter().find(|s| s.name == name))
        .map(|set| forti_proposal(&set.encryption, &set.hash))
        .collect();
    if !sets.is_empty() {
        return sets.join(" ");
    }
    let forti_style = proposal
        .split_whitespace()
        .all(|p| p.contains('-') && !p.chars().any(|c| c.is_ascii_uppercase()));
    if forti_style {
        proposal.to_string()
    } else {
        defaults::PROPOSAL.to_string()
    }
}

/// Phase-2 selectors for a Cisco tunnel, read from the first rule of its crypto ACL.
fn acl_selectors(model: &ConfigModel, tunnel: &VpnTunnel) -> (String, String) {
    let default = address_mask(defaults::PHASE2_SELECTOR);
    let rule = tunnel
        .acl
        .as_deref()
        .and_then(|acl| model.policies.iter().find(|p| p.name.as_deref() == Some(acl)));
    let selector = |values: &[String]| {
        values
            .first()
            .and_then(|v| match Endpoint::classify(v) {
                Endpoint::Host(address) => Some(format!("{address} 255.255.255.255")),
                Endpoint::Network { address, mask } => Some(format!("{address} {mask}")),
                Endpoint::Named(name) => model.address_object(&name).map(|o| match &o.mask {
                    Some(mask) => format!("{} {mask}", o.value),
                    None => address_mask(&o.value),
                }),
                Endpoint::Any => None,
            })
            .unwrap_or_else(|| default.clone())
    };
    match rule {
        Some(rule) => (selector(&rule.source), selector(&rule.destination)),
        None => (default.clone(), default.clone()),
    }
}

fn vpn(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    let tunnels: Vec<&VpnTunnel> = model.vpn.tunnels.iter().filter(|t| t.peer.is_some()).collect();
    if !tunnels.is_empty() {
        writeln!(out, "config vpn ipsec phase1-interface")?;
        for tunnel in &tunnels {
            writeln!(out, "{EDIT}edit {}", quoted(&phase1_name(tunnel)))?;
            let interface = tunnel
                .interface
                .as_deref()
                .map(|i| device_ref(model, i))
                .unwrap_or_else(|| defaults::PHASE1_INTERFACE.to_string());
            writeln!(out, "{SET}set interface {}", quoted(&interface))?;
            writeln!(out, "{SET}set peertype any")?;
            writeln!(out, "{SET}set proposal {}", proposal(model, tunnel))?;
            writeln!(
                out,
                "{SET}set remote-gw {}",
                tunnel.peer.as_deref().unwrap_or_default()
            )?;
            if let Some(key) = &tunnel.pre_shared_key {
                writeln!(out, "{SET}set psksecret {}", secret(key))?;
            }
            if let Some(description) = &tunnel.description {
                writeln!(out, "{SET}set comments {}", quoted(description))?;
            }
            writeln!(out, "{EDIT}next")?;
        }
        writeln!(out, "end")?;
        writeln!(out)?;
    }

    let mut phase2: Vec<(String, String, String, String, String)> = model
        .vpn
        .phase2
        .iter()
        .map(|p| {
            let selector = |s: Option<&str>| {
                address_mask(s.unwrap_or(defaults::PHASE2_SELECTOR))
            };
            (
                p.name.clone(),
                p.phase1_name.clone(),
                p.proposal.clone().unwrap_or_else(|| defaults::PROPOSAL.to_string()),
                selector(p.src_subnet.as_deref()),
                selector(p.dst_subnet.as_deref()),
            )
        })
        .collect();
    for tunnel in &tunnels {
        let phase1 = phase1_name(tunnel);
        if phase2.iter().any(|(_, p1, _, _, _)| *p1 == phase1 || *p1 == tunnel.name) {
            continue;
        }
        let (source, destination) = acl_selectors(model, tunnel);
        phase2.push((
            format!("{phase1}-p2"),
            phase1,
            proposal(model, tunnel),
            source,
            destination,
        ));
    }
    if !phase2.is_empty() {
        writeln!(out, "config vpn ipsec phase2-interface")?;
        for (name, phase1, proposal, source, destination) in &phase2 {
            writeln!(out, "{EDIT}edit {}", quoted(name))?;
            writeln!(out, "{SET}set phase1name {}", quoted(phase1))?;
            writeln!(out, "{SET}set proposal {proposal}")?;
            writeln!(out, "{SET}set src-subnet {source}")?;
            writeln!(out, "{SET}set dst-subnet {destination}")?;
            writeln!(out, "{EDIT}next")?;
        }
        writeln!(out, "end")?;
        writeln!(out)?;
    }
    Ok(())
}

fn users(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    let (local, admins): (Vec<_>, Vec<_>) = model
        .users
        .iter()
        .partition(|u| u.role.as_deref() == Some("local"));
    if !admins.is_empty() {
        writeln!(out, "config system admin")?;
        for user in &admins {
            writeln!(out, "{EDIT}edit {}", quoted(&user.username))?;
            let profile = match (user.role.as_deref(), user.privilege) {
                (Some(role), _) => role,
                (None, p) if p >= defaults::USER_PRIVILEGE => "super_admin",
                (None, _) => "prof_admin",
            };
            writeln!(out, "{SET}set accprofile {}", quoted(profile))?;
            writeln!(out, "{SET}set vdom \"root\"")?;
            if let Some(value) = &user.secret {
                writeln!(out, "{SET}set password {}", secret(value))?;
            }
            writeln!(out, "{EDIT}next")?;
        }
        writeln!(out, "end")?;
        writeln!(out)?;
    }
    if !local.is_empty() {
        writeln!(out, "config user local")?;
        for user in &local {
            writeln!(out, "{EDIT}edit {}", quoted(&user.username))?;
            writeln!(out, "{SET}set type password")?;
            if let Some(value) = &user.secret {
                writeln!(out, "{SET}set passwd {}", secret(value))?;
            }
            writeln!(out, "{EDIT}next")?;
        }
        writeln!(out, "end")?;
        writeln!(out)?;
    }
    Ok(())
}

fn ldap(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    let servers: Vec<_> = model
        .aaa_servers
        .iter()
        .filter(|s| s.protocol.eq_ignore_ascii_case("ldap"))
        .collect();
    if !servers.is_empty() {
        writeln!(out, "config user ldap")?;
        for server in &servers {
            writeln!(out, "{EDIT}edit {}", quoted(&server.name))?;
            if let Some(host) = &server.host {
                writeln!(out, "{SET}set server {}", quoted(host))?;
            }
            writeln!(out, "{SET}set port {}", server.port)?;
            if let Some(base_dn) = &server.base_dn {
                writeln!(out, "{SET}set dn {}", quoted(base_dn))?;
            }
            writeln!(out, "{EDIT}next")?;
        }
        writeln!(out, "end")?;
        writeln!(out)?;
    }
    for server in model
        .aaa_servers
        .iter()
        .filter(|s| !s.protocol.eq_ignore_ascii_case("ldap"))
    {
        writeln!(
            out,
            "# not converted: {} server {}",
            server.protocol, server.name
        )?;
    }
    Ok(())
}

fn logging(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    let hosts = model
        .system
        .logging
        .iter()
        .filter_map(|l| l.host.as_deref())
        .take(4);
    for (idx, host) in hosts.enumerate() {
        let section = match idx {
            0 => "log syslogd setting".to_string(),
            n => format!("log syslogd{} setting", n + 1),
        };
        writeln!(out, "config {section}")?;
        writeln!(out, "{EDIT}set status enable")?;
        writeln!(out, "{EDIT}set server {}", quoted(host))?;
        writeln!(out, "end")?;
        writeln!(out)?;
    }
    Ok(())
}

fn snmp(out: &mut String, model: &ConfigModel) -> Result<(), GenerateError> {
    let mut communities: Vec<(&str, Vec<&str>)> = Vec::new();
    for setting in &model.system.snmp {
        let idx = match communities.iter().position(|(c, _)| *c == setting.community) {
            Some(idx) => idx,
            None => {
                communities.push((setting.community.as_str(), Vec::new()));
                communities.len() - 1
            }
        };
        if let Some(host) = setting.host.as_deref() {
            communities[idx].1.push(host);
        }
    }
    if communities.is_empty() {
        return Ok(());
    }
    writeln!(out, "config system snmp community")?;
    for (idx, (community, hosts)) in communities.iter().enumerate() {
        writeln!(out, "{EDIT}edit {}", idx + 1)?;
        writeln!(out, "{SET}set name {}", quoted(community))?;
        if !hosts.is_empty() {
            writeln!(out, "{SET}config hosts")?;
            for (host_idx, host) in hosts.iter().enumerate() {
                writeln!(out, "{SET}    edit {}", host_idx + 1)?;
                writeln!(out, "{SET}        set ip {host} 255.255.255.255")?;
                writeln!(out, "{SET}    next")?;
            }
            writeln!(out, "{SET}end")?;
        }
        writeln!(out, "{EDIT}next")?;
    }
    writeln!(out, "end")?;
    writeln!(out)?;
    Ok(())
}

fn unmapped(
    out: &mut String,
    model: &ConfigModel,
    policies: &[SecurityPolicy],
) -> Result<(), GenerateError> {
    let mut lines: Vec<String> = Vec::new();
    if let Some(timezone) = &model.device.timezone {
        lines.push(format!("timezone {timezone}"));
    }
    for (position, policy) in policies.iter().enumerate() {
        if !policy.application.is_empty() {
            lines.push(format!(
                "policy {} applications {}",
                policy.label(position),
                policy.application.join(", ")
            ));
        }
    }
    for (command, settings) in [("ssh", &model.system.ssh), ("http", &model.system.http)] {
        for setting in settings {
            if let AccessSetting::Option { key, value } = setting {
                lines.push(format!("{command} {key} {value}").trim_end().to_string());
            }
        }
    }
    for clock in &model.system.clock {
        lines.push(format!("clock {} {}", clock.key, clock.value));
    }
    for profile in &model.security_profiles {
        lines.push(format!("{} {}", profile.kind, profile.name));
    }
    for application in &model.applications {
        lines.push(format!("application {}", application.name));
    }
    for category in &model.url_categories {
        lines.push(format!(
            "URL category {} ({} entries)",
            category.name,
            category.urls.len()
        ));
    }
    for line in &lines {
        writeln!(out, "# not converted: {line}")?;
    }
    Ok(())
}
