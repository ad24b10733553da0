//! FortiOS `config` / `edit` / `set` / `next` / `end` parser.
//!
//! The text is first folded into a tree of sections and entries, then each
//! recognized section is mapped onto the model. Nested `config` blocks (VDOMs,
//! SNMP hosts) are searched recursively, so a section is found wherever it
//! appears.

use crate::model::defaults;
use crate::model::{
    AaaServer, Action, AddressGroup, AddressKind, AddressObject, ConfigModel, Interface,
    LogSetting, NatKind, NatRule, Phase2Selector, Route, SecurityPolicy, ServiceObject,
    SnmpSetting, User, VpnTunnel,
};
use crate::netmask;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Section {
    path: String,
    settings: Vec<(String, Vec<String>)>,
    entries: Vec<Entry>,
    children: Vec<Section>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    settings: Vec<(String, Vec<String>)>,
    children: Vec<Section>,
}

#[derive(Debug)]
struct Frame {
    section: Section,
    entry: Option<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Directive {
    Config(String),
    Edit(String),
    Set(String, Vec<String>),
    Next,
    End,
    Other,
}

impl Directive {
    fn classify(line: &str) -> Self {
        let words = split_words(line);
        match words.as_slice() {
            [keyword, rest @ ..] if keyword == "config" && !rest.is_empty() => {
                Directive::Config(rest.join(" "))
            }
            [keyword, name, ..] if keyword == "edit" => Directive::Edit(name.clone()),
            [keyword, key, values @ ..] if keyword == "set" => {
                Directive::Set(key.clone(), values.to_vec())
            }
            [keyword] if keyword == "next" => Directive::Next,
            [keyword] if keyword == "end" => Directive::End,
            _ => Directive::Other,
        }
    }
}

pub fn parse(text: &str) -> ConfigModel {
    let roots = fold_sections(text);
    let mut model = ConfigModel::default();

    for section in find(&roots, "system global") {
        model.hostname = setting(&section.settings, "hostname").map(str::to_string);
        if let Some(timezone) = setting(&section.settings, "timezone") {
            model.device.timezone = Some(timezone.to_string());
        }
    }
    for entry in entries(&roots, "system interface") {
        match interface(entry) {
            Some(interface) => model.upsert_interface(interface),
            None => tracing::debug!(interface = %entry.name, "dropping interface without ip"),
        }
    }
    for entry in entries(&roots, "firewall address") {
        match address(entry) {
            Some(object) => model.upsert_address_object(object),
            None => tracing::debug!(address = %entry.name, "dropping address without value"),
        }
    }
    for entry in entries(&roots, "firewall addrgrp") {
        let members = values(&entry.settings, "member");
        if members.is_empty() {
            tracing::debug!(group = %entry.name, "dropping empty address group");
            continue;
        }
        model.address_groups.push(AddressGroup {
            name: entry.name.clone(),
            members: members.iter().map(|m| endpoint(m)).collect(),
            description: setting(&entry.settings, "comment").map(str::to_string),
        });
    }
    for entry in entries(&roots, "firewall service custom") {
        model.services.push(service(entry));
    }
    for entry in entries(&roots, "firewall policy") {
        model.policies.push(policy(entry));
    }
    for entry in entries(&roots, "firewall vip") {
        let (Some(extip), Some(mappedip)) = (
            setting(&entry.settings, "extip"),
            setting(&entry.settings, "mappedip"),
        ) else {
            tracing::debug!(vip = %entry.name, "dropping vip without extip/mappedip");
            continue;
        };
        model.nat.push(NatRule {
            kind: NatKind::Static,
            name: Some(entry.name.clone()),
            source: Some(collapse_range(mappedip)),
            translated: Some(collapse_range(extip)),
            interface: setting(&entry.settings, "extintf").map(str::to_string),
            description: setting(&entry.settings, "comment").map(str::to_string),
            ..NatRule::default()
        });
    }
    for entry in entries(&roots, "firewall ippool") {
        let Some(start) = setting(&entry.settings, "startip") else {
            tracing::debug!(pool = %entry.name, "dropping ippool without startip");
            continue;
        };
        let translated = match setting(&entry.settings, "endip") {
            Some(end) if end != start => format!("{start}-{end}"),
            _ => start.to_string(),
        };
        model.nat.push(NatRule {
            kind: NatKind::Global,
            name: Some(entry.name.clone()),
            translated: Some(translated),
            description: setting(&entry.settings, "comments").map(str::to_string),
            ..NatRule::default()
        });
    }
    for entry in entries(&roots, "router static") {
        match route(entry) {
            Some(route) => model.routes.push(route),
            None => tracing::debug!(route = %entry.name, "dropping route without gateway or device"),
        }
    }
    for entry in entries(&roots, "vpn ipsec phase1-interface") {
        let Some(peer) = setting(&entry.settings, "remote-gw") else {
            tracing::debug!(phase1 = %entry.name, "dropping phase1 without remote-gw");
            continue;
        };
        model.vpn.tunnels.push(VpnTunnel {
            name: entry.name.clone(),
            interface: setting(&entry.settings, "interface").map(str::to_string),
            peer: Some(peer.to_string()),
            proposal: joined(&entry.settings, "proposal"),
            pre_shared_key: joined(&entry.settings, "psksecret"),
            description: setting(&entry.settings, "comments").map(str::to_string),
            ..VpnTunnel::default()
        });
    }
    for entry in entries(&roots, "vpn ipsec phase2-interface") {
        let Some(phase1) = setting(&entry.settings, "phase1name") else {
            tracing::debug!(phase2 = %entry.name, "dropping phase2 without phase1name");
            continue;
        };
        model.vpn.phase2.push(Phase2Selector {
            name: entry.name.clone(),
            phase1_name: phase1.to_string(),
            proposal: joined(&entry.settings, "proposal"),
            src_subnet: joined(&entry.settings, "src-subnet"),
            dst_subnet: joined(&entry.settings, "dst-subnet"),
        });
    }
    for entry in entries(&roots, "system admin") {
        let profile = setting(&entry.settings, "accprofile");
        model.users.push(User {
            username: entry.name.clone(),
            secret: joined(&entry.settings, "password"),
            privilege: match profile {
                Some("super_admin") | None => defaults::USER_PRIVILEGE,
                Some(_) => defaults::READ_ONLY_PRIVILEGE,
            },
            role: profile.map(str::to_string),
        });
    }
    for entry in entries(&roots, "user local") {
        model.users.push(User {
            username: entry.name.clone(),
            secret: joined(&entry.settings, "passwd"),
            privilege: defaults::READ_ONLY_PRIVILEGE,
            role: Some("local".to_string()),
        });
    }
    for entry in entries(&roots, "user ldap") {
        model.aaa_servers.push(AaaServer {
            name: entry.name.clone(),
            protocol: defaults::AAA_PROTOCOL.to_string(),
            host: setting(&entry.settings, "server").map(str::to_string),
            port: setting(&entry.settings, "port")
                .unwrap_or(defaults::AAA_PORT)
                .to_string(),
            base_dn: setting(&entry.settings, "dn").map(str::to_string),
            interface: setting(&entry.settings, "interface").map(str::to_string),
            description: None,
        });
    }
    for section in find(&roots, "log syslogd setting") {
        if setting(&section.settings, "status") == Some("disable") {
            continue;
        }
        let Some(server) = setting(&section.settings, "server") else {
            continue;
        };
        model.system.logging.push(LogSetting {
            target: "host".to_string(),
            level: defaults::LOG_LEVEL.to_string(),
            host: Some(server.to_string()),
            interface: setting(&section.settings, "interface").map(str::to_string),
        });
    }
    for entry in entries(&roots, "system snmp community") {
        let community = setting(&entry.settings, "name").unwrap_or(defaults::SNMP_COMMUNITY);
        let hosts: Vec<&Entry> = entry
            .children
            .iter()
            .filter(|s| s.path == "hosts")
            .flat_map(|s| s.entries.iter())
            .collect();
        if hosts.is_empty() {
            model.system.snmp.push(SnmpSetting {
                community: community.to_string(),
                version: defaults::SNMP_VERSION.to_string(),
                ..SnmpSetting::default()
            });
        }
        for host in hosts {
            let ip = setting(&host.settings, "ip")
                .and_then(|ip| ip.split_whitespace().next())
                .map(str::to_string);
            model.system.snmp.push(SnmpSetting {
                community: community.to_string(),
                version: defaults::SNMP_VERSION.to_string(),
                host: ip,
                interface: setting(&host.settings, "interface").map(str::to_string),
            });
        }
    }

    model
}

/// Stack machine over `config`/`edit`/`set`/`next`/`end`. Unterminated blocks
/// are closed at end of input.
fn fold_sections(text: &str) -> Vec<Section> {
    let mut roots = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match Directive::classify(line) {
            Directive::Config(path) => stack.push(Frame {
                section: Section {
                    path,
                    ..Section::default()
                },
                entry: None,
            }),
            Directive::Edit(name) => {
                if let Some(frame) = stack.last_mut() {
                    close_entry(frame);
                    frame.entry = Some(Entry {
                        name,
                        ..Entry::default()
                    });
                }
            }
            Directive::Set(key, values) => {
                if let Some(frame) = stack.last_mut() {
                    match &mut frame.entry {
                        Some(entry) => entry.settings.push((key, values)),
                        None => frame.section.settings.push((key, values)),
                    }
                }
            }
            Directive::Next => {
                if let Some(frame) = stack.last_mut() {
                    close_entry(frame);
                }
            }
            Directive::End => pop_frame(&mut stack, &mut roots),
            Directive::Other => {}
        }
    }
    while !stack.is_empty() {
        pop_frame(&mut stack, &mut roots);
    }
    roots
}

fn close_entry(frame: &mut Frame) {
    if let Some(entry) = frame.entry.take() {
        frame.section.entries.push(entry);
    }
}

fn pop_frame(stack: &mut Vec<Frame>, roots: &mut Vec<Section>) {
    let Some(mut frame) = stack.pop() else {
        return;
    };
    close_entry(&mut frame);
    match stack.last_mut() {
        Some(parent) => match &mut parent.entry {
            Some(entry) => entry.children.push(frame.section),
            None => parent.section.children.push(frame.section),
        },
        None => roots.push(frame.section),
    }
}

/// Every section with `path`, searched depth-first through entries and
/// nested sections.
fn find<'a>(sections: &'a [Section], path: &str) -> Vec<&'a Section> {
    let mut out = Vec::new();
    for section in sections {
        if section.path == path {
            out.push(section);
        }
        out.extend(find(&section.children, path));
        for entry in &section.entries {
            out.extend(find(&entry.children, path));
        }
    }
    out
}

fn entries<'a>(sections: &'a [Section], path: &str) -> Vec<&'a Entry> {
    find(sections, path)
        .into_iter()
        .flat_map(|s| s.entries.iter())
        .collect()
}

fn values<'a>(settings: &'a [(String, Vec<String>)], key: &str) -> &'a [String] {
    settings
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_slice())
        .unwrap_or(&[])
}

fn setting<'a>(settings: &'a [(String, Vec<String>)], key: &str) -> Option<&'a str> {
    values(settings, key).first().map(String::as_str)
}

/// All values of `key` joined by a space.
fn joined(settings: &[(String, Vec<String>)], key: &str) -> Option<String> {
    let values = values(settings, key);
    (!values.is_empty()).then(|| values.join(" "))
}

fn interface(entry: &Entry) -> Option<Interface> {
    let (ip, mask) = address_mask(values(&entry.settings, "ip"))?;
    let mut interface = Interface::new(entry.name.clone());
    interface.ip = Some(ip);
    interface.mask = Some(mask);
    interface.description = setting(&entry.settings, "alias").map(str::to_string);
    interface.comment = setting(&entry.settings, "description").map(str::to_string);
    interface.vlan = setting(&entry.settings, "vlanid").and_then(|v| v.parse().ok());
    interface.enabled = setting(&entry.settings, "status") != Some("down");
    interface.zone = Some(defaults::FORTIGATE_ZONE.to_string());
    Some(interface)
}

fn address(entry: &Entry) -> Option<AddressObject> {
    let kind = setting(&entry.settings, "type").unwrap_or("ipmask");
    let description = setting(&entry.settings, "comment").map(str::to_string);
    let mut object = match kind {
        "iprange" => {
            let start = setting(&entry.settings, "start-ip")?;
            let end = setting(&entry.settings, "end-ip").unwrap_or(start);
            AddressObject {
                name: entry.name.clone(),
                kind: AddressKind::Range,
                value: format!("{start}-{end}"),
                ..AddressObject::default()
            }
        }
        "fqdn" => AddressObject {
            name: entry.name.clone(),
            kind: AddressKind::Fqdn,
            value: setting(&entry.settings, "fqdn")?.to_string(),
            ..AddressObject::default()
        },
        "ipmask" => {
            let (address, mask) = address_mask(values(&entry.settings, "subnet"))?;
            if mask == "255.255.255.255" {
                AddressObject::host(entry.name.clone(), address)
            } else {
                AddressObject::subnet(entry.name.clone(), address, mask)
            }
        }
        _ => return None,
    };
    object.description = description;
    Some(object)
}

fn service(entry: &Entry) -> ServiceObject {
    let tcp = setting(&entry.settings, "tcp-portrange");
    let udp = setting(&entry.settings, "udp-portrange");
    let (protocol, port) = match (tcp, udp) {
        (Some(range), _) => ("tcp", Some(destination_port(range))),
        (None, Some(range)) => ("udp", Some(destination_port(range))),
        (None, None) => match setting(&entry.settings, "protocol") {
            Some(p) if p.eq_ignore_ascii_case("icmp") => ("icmp", None),
            _ => ("ip", None),
        },
    };
    ServiceObject {
        name: entry.name.clone(),
        protocol: protocol.to_string(),
        port,
        description: setting(&entry.settings, "comment").map(str::to_string),
    }
}

/// `1000-2000:1024-65535` → `1000-2000`; `80` → `80`.
fn destination_port(range: &str) -> String {
    range.split(':').next().unwrap_or(range).to_string()
}

fn policy(entry: &Entry) -> SecurityPolicy {
    let id = entry.name.parse().ok();
    let zone = |key: &str| {
        setting(&entry.settings, key)
            .filter(|z| *z != "any")
            .map(str::to_string)
    };
    SecurityPolicy {
        name: setting(&entry.settings, "name").map(str::to_string),
        id,
        action: Action::parse(setting(&entry.settings, "action").unwrap_or("deny")),
        protocol: "ip".to_string(),
        source: values(&entry.settings, "srcaddr")
            .iter()
            .map(|a| endpoint(a))
            .collect(),
        destination: values(&entry.settings, "dstaddr")
            .iter()
            .map(|a| endpoint(a))
            .collect(),
        service: values(&entry.settings, "service")
            .iter()
            .filter_map(|s| predefined_service(s))
            .collect(),
        source_zone: zone("srcintf"),
        destination_zone: zone("dstintf"),
        application: values(&entry.settings, "application").to_vec(),
        description: setting(&entry.settings, "comments").map(str::to_string),
        enabled: setting(&entry.settings, "status") != Some("disable"),
        log: matches!(setting(&entry.settings, "logtraffic"), Some("all" | "utm")),
    }
}

fn route(entry: &Entry) -> Option<Route> {
    let gateway = setting(&entry.settings, "gateway").map(str::to_string);
    let device = setting(&entry.settings, "device").map(str::to_string);
    if gateway.is_none() && device.is_none() {
        return None;
    }
    let (network, mask) = address_mask(values(&entry.settings, "dst"))
        .unwrap_or_else(|| ("0.0.0.0".to_string(), "0.0.0.0".to_string()));
    Some(Route {
        name: Some(entry.name.clone()),
        network,
        mask,
        gateway,
        interface: device,
        distance: setting(&entry.settings, "distance").and_then(|d| d.parse().ok()),
        description: setting(&entry.settings, "comment").map(str::to_string),
    })
}

/// `set ip 10.0.0.1 255.255.255.0` or `set ip 10.0.0.1/24`.
fn address_mask(values: &[String]) -> Option<(String, String)> {
    match values {
        [address, mask, ..] => Some((address.clone(), mask.clone())),
        [single] => netmask::split_address_mask(single),
        [] => None,
    }
}

/// Built-in FortiOS names map onto the shared endpoint/service conventions.
fn endpoint(name: &str) -> String {
    if name.eq_ignore_ascii_case("all") {
        defaults::ANY.to_string()
    } else {
        name.to_string()
    }
}

fn predefined_service(name: &str) -> Option<String> {
    let mapped = match name.to_ascii_uppercase().as_str() {
        "ALL" => return None,
        "ALL_TCP" => "tcp",
        "ALL_UDP" => "udp",
        "ALL_ICMP" | "PING" => "icmp",
        "HTTP" => "tcp/80",
        "HTTPS" => "tcp/443",
        "SSH" => "tcp/22",
        "TELNET" => "tcp/23",
        "FTP" => "tcp/21",
        "SMTP" => "tcp/25",
        "DNS" => "udp/53",
        "NTP" => "udp/123",
        "SNMP" => "udp/161",
        "RDP" => "tcp/3389",
        "LDAP" => "tcp/389",
        _ => return Some(name.to_string()),
    };
    Some(mapped.to_string())
}

/// `10.0.0.10-10.0.0.10` → `10.0.0.10`.
fn collapse_range(value: &str) -> String {
    match value.split_once('-') {
        Some((start, end)) if start == end => start.to_string(),
        _ => value.to_string(),
    }
}

/// Whitespace-separated words; double quotes group words and `\` escapes the
/// next character inside quotes.
fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if in_quotes => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    words.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() || quoted {
        words.push(current);
    }
    words
}
