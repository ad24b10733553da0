//! PAN-OS XML output.
//!
//! The document is built as an [`XmlNode`] tree (`config` → `devices` →
//! `localhost.localdomain` with `deviceconfig`, `network` and `vsys1`) and
//! serialized by `fwconv-xml`. Constructs with no PAN-OS counterpart are listed
//! in the leading comment.

use fwconv_xml::{write_document, XmlNode};

use super::{effective_policies, find_interface, well_known_service, GenerateError};
use crate::model::{
    defaults, AccessSetting, AddressKind, ConfigModel, Endpoint, Interface, NatKind, NatRule,
    SecurityPolicy, ServiceRef, VpnTunnel,
};
use crate::netmask;
use crate::vendor::VendorId;

pub fn generate(model: &ConfigModel, origin: VendorId) -> Result<String, GenerateError> {
    let mut notes: Vec<String> = Vec::new();
    let zoning = Zoning::build(model);
    let policies = effective_policies(model);

    let mut implied_services: Vec<(String, String, String)> = Vec::new();
    let rules: Vec<XmlNode> = policies
        .iter()
        .enumerate()
        .map(|(position, policy)| {
            security_rule(model, &zoning, &policies, policy, position, &mut implied_services)
        })
        .collect();

    let mut root = XmlNode::new("config").with_attr("version", "10.0");
    if let Some(users) = users(model) {
        root.push(XmlNode::new("mgt-config").with_child(users));
    }
    if let Some(shared) = shared(model) {
        root.push(shared);
    }

    let mut device = entry("localhost.localdomain");
    device.push(deviceconfig(model));
    let network = network(model, &mut notes);
    if !network.is_leaf_empty() {
        device.push(network);
    }

    let mut vsys = entry("vsys1");
    if !zoning.zones.is_empty() {
        let mut zones = XmlNode::new("zone");
        for (name, members) in &zoning.zones {
            let layer3 = member_list("layer3", members);
            zones.push(entry(name).with_child(XmlNode::new("network").with_child(layer3)));
        }
        vsys.push(zones);
    }
    if !model.address_objects.is_empty() {
        let mut addresses = XmlNode::new("address");
        for object in &model.address_objects {
            let value = match object.kind {
                AddressKind::Host => leaf("ip-netmask", &object.value),
                AddressKind::Subnet => leaf("ip-netmask", &object.cidr()),
                AddressKind::Range => leaf("ip-range", &object.value),
                AddressKind::Fqdn => leaf("fqdn", &object.value),
            };
            let mut node = entry(&object.name).with_child(value);
            if let Some(description) = &object.description {
                node.push(leaf("description", description));
            }
            addresses.push(node);
        }
        vsys.push(addresses);
    }
    if !model.address_groups.is_empty() {
        let mut groups = XmlNode::new("address-group");
        for group in &model.address_groups {
            let members: Vec<String> = group
                .members
                .iter()
                .map(|m| Endpoint::classify(m).to_text())
                .collect();
            let mut node = entry(&group.name).with_child(member_list("static", &members));
            if let Some(description) = &group.description {
                node.push(leaf("description", description));
            }
            groups.push(node);
        }
        vsys.push(groups);
    }
    if let Some(services) = services(model, &implied_services, &mut notes) {
        vsys.push(services);
    }
    if !model.applications.is_empty() {
        let mut applications = XmlNode::new("application");
        for application in &model.applications {
            let mut node = entry(&application.name);
            if let Some(category) = &application.category {
                node.push(leaf("category", category));
            }
            if let Some(description) = &application.description {
                node.push(leaf("description", description));
            }
            applications.push(node);
        }
        vsys.push(applications);
    }
    if !model.url_categories.is_empty() {
        let mut categories = XmlNode::new("custom-url-category");
        for category in &model.url_categories {
            let mut node = entry(&category.name)
                .with_child(member_list("list", &category.urls))
                .with_child(leaf("type", "URL List"));
            if let Some(description) = &category.description {
                node.push(leaf("description", description));
            }
            categories.push(node);
        }
        vsys.push(XmlNode::new("profiles").with_child(categories));
    }

    let nat_rules = nat_rules(model, &zoning, &mut notes);
    let mut rulebase = XmlNode::new("rulebase");
    for (kind, entries) in [("security", rules), ("nat", nat_rules)] {
        for rule in entries {
            rulebase.ensure_child(kind).ensure_child("rules").push(rule);
        }
    }
    if !rulebase.is_leaf_empty() {
        vsys.push(rulebase);
    }
    device.push(XmlNode::new("vsys").with_child(vsys));
    root.push(XmlNode::new("devices").with_child(device));

    unmapped(model, &mut notes);
    let mut comment = format!(
        "Palo Alto Configuration, generated from {} configuration",
        origin.display_name()
    );
    for note in &notes {
        comment.push_str("\n  not converted: ");
        comment.push_str(note);
    }
    Ok(write_document(&root, Some(&comment))?)
}

fn entry(name: &str) -> XmlNode {
    XmlNode::new("entry").with_attr("name", name)
}

fn leaf(tag: &str, text: &str) -> XmlNode {
    XmlNode::new(tag).with_text(text)
}

fn member_list<S: AsRef<str>>(tag: &str, values: &[S]) -> XmlNode {
    let mut node = XmlNode::new(tag);
    for value in values {
        node.push(leaf("member", value.as_ref()));
    }
    node
}

/// Zone layout written to `vsys1`: IR zones when present, else the fallback
/// set with every interface placed in one of them.
#[derive(Debug, Default)]
struct Zoning {
    zones: Vec<(String, Vec<String>)>,
}

impl Zoning {
    fn build(model: &ConfigModel) -> Self {
        if !model.zones.is_empty() {
            return Self {
                zones: model
                    .zones
                    .iter()
                    .map(|z| (z.name.clone(), z.interfaces.clone()))
                    .collect(),
            };
        }
        if model.interfaces.is_empty() {
            return Self::default();
        }
        let mut zones: Vec<(String, Vec<String>)> = defaults::FALLBACK_ZONES
            .iter()
            .map(|z| (z.to_string(), Vec::new()))
            .collect();
        for interface in &model.interfaces {
            let zone = fallback_zone(interface);
            if let Some((_, members)) = zones.iter_mut().find(|(name, _)| name == zone) {
                members.push(interface.name.clone());
            }
        }
        Self { zones }
    }

    fn of_interface(&self, name: &str) -> Option<&str> {
        self.zones
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == name))
            .map(|(zone, _)| zone.as_str())
    }

    /// Zone for a policy/NAT zone reference.
    fn resolve(&self, model: &ConfigModel, reference: Option<&str>) -> String {
        let Some(reference) = reference else {
            return defaults::ANY.to_string();
        };
        if self.zones.iter().any(|(name, _)| name == reference) {
            return reference.to_string();
        }
        find_interface(model, reference)
            .and_then(|i| self.of_interface(&i.name))
            .unwrap_or(defaults::ANY)
            .to_string()
    }
}

/// Zone name, then nameif, then security level.
fn fallback_zone(interface: &Interface) -> &'static str {
    let [trust, untrust, dmz] = defaults::FALLBACK_ZONES;
    for hint in [interface.zone.as_deref(), interface.description.as_deref()]
        .into_iter()
        .flatten()
    {
        match hint.to_ascii_lowercase().as_str() {
            "trust" | "inside" => return trust,
            "untrust" | "outside" => return untrust,
            "dmz" => return dmz,
            _ => {}
        }
    }
    match interface.security_level {
        Some(100) => trust,
        Some(0) => untrust,
        _ => dmz,
    }
}

fn deviceconfig(model: &ConfigModel) -> XmlNode {
    let hostname = model
        .hostname
        .as_deref()
        .filter(|h| !h.is_empty())
        .unwrap_or(defaults::PALO_ALTO_HOSTNAME);
    let mut system = XmlNode::new("system").with_child(leaf("hostname", hostname));
    if let Some(domain) = &model.device.domain {
        system.push(leaf("domain", domain));
    }
    if let Some(timezone) = &model.device.timezone {
        system.push(leaf("timezone", timezone));
    }
    if let Some(snmp) = model.system.snmp.first() {
        let version = XmlNode::new("version").with_child(
            XmlNode::new("v2c").with_child(leaf("snmp-community-string", &snmp.community)),
        );
        system.push(
            XmlNode::new("snmp-setting")
                .with_child(XmlNode::new("access-setting").with_child(version)),
        );
    }
    let permitted: Vec<String> = model
        .system
        .ssh
        .iter()
        .chain(&model.system.http)
        .filter_map(|s| match s {
            AccessSetting::Allow { address, mask, .. } => Some(netmask::to_cidr(address, mask)),
            AccessSetting::Option { .. } => None,
        })
        .fold(Vec::new(), |mut acc, cidr| {
            if !acc.contains(&cidr) {
                acc.push(cidr);
            }
            acc
        });
    if !permitted.is_empty() {
        let mut list = XmlNode::new("permitted-ip");
        for cidr in &permitted {
            list.push(entry(cidr));
        }
        system.push(list);
    }
    XmlNode::new("deviceconfig").with_child(system)
}

fn network(model: &ConfigModel, notes: &mut Vec<String>) -> XmlNode {
    let mut network = XmlNode::new("network");
    if !model.interfaces.is_empty() {
        let mut ethernet = XmlNode::new("ethernet");
        for interface in &model.interfaces {
            let mut layer3 = XmlNode::new("layer3");
            if let Some((ip, mask)) = interface.address() {
                layer3.push(XmlNode::new("ip").with_child(entry(&netmask::to_cidr(ip, mask))));
            }
            if let Some(vlan) = interface.vlan {
                layer3.push(leaf("tag", &vlan.to_string()));
            }
            let mut node = entry(&interface.name).with_child(layer3);
            if !interface.enabled {
                node.push(leaf("link-state", "down"));
            }
            if let Some(comment) = interface.description.as_ref().or(interface.comment.as_ref()) {
                node.push(leaf("comment", comment));
            }
            ethernet.push(node);
        }
        network.push(XmlNode::new("interface").with_child(ethernet));
    }

    if !model.routes.is_empty() {
        let mut routes = XmlNode::new("static-route");
        for (idx, route) in model.routes.iter().enumerate() {
            let name = route
                .name
                .clone()
                .unwrap_or_else(|| format!("route-{}", idx + 1));
            let mut node = entry(&name).with_child(leaf(
                "destination",
                &netmask::to_cidr(&route.network, &route.mask),
            ));
            if let Some(gateway) = &route.gateway {
                node.push(XmlNode::new("nexthop").with_child(leaf("ip-address", gateway)));
            }
            if let Some(interface) = route.interface.as_deref() {
                let name = find_interface(model, interface)
                    .map(|i| i.name.as_str())
                    .unwrap_or(interface);
                node.push(leaf("interface", name));
            }
            if let Some(distance) = route.distance {
                node.push(leaf("admin-dist", &distance.to_string()));
            }
            routes.push(node);
        }
        let names: Vec<&str> = model.interfaces.iter().map(|i| i.name.as_str()).collect();
        let mut router = entry(defaults::VIRTUAL_ROUTER);
        if !names.is_empty() {
            router.push(member_list("interface", &names));
        }
        router.push(
            XmlNode::new("routing-table").with_child(XmlNode::new("ip").with_child(routes)),
        );
        network.push(XmlNode::new("virtual-router").with_child(router));
    }

    let tunnels: Vec<&VpnTunnel> = model.vpn.tunnels.iter().filter(|t| t.peer.is_some()).collect();
    if !tunnels.is_empty() {
        let mut gateways = XmlNode::new("gateway");
        let mut ipsec = XmlNode::new("ipsec");
        for (idx, tunnel) in tunnels.iter().enumerate() {
            let name = match tunnel.sequence {
                Some(sequence) => format!("{}-{sequence}", tunnel.name),
                None => tunnel.name.clone(),
            };
            let mut gateway = entry(&name);
            match tunnel.pre_shared_key.as_deref() {
                Some(key) if !key.starts_with("ENC ") => gateway.push(
                    XmlNode::new("authentication").with_child(
                        XmlNode::new("pre-shared-key").with_child(leaf("key", key)),
                    ),
                ),
                Some(_) => notes.push(format!("encrypted pre-shared key for {name}")),
                None => {}
            }
            gateway.push(XmlNode::new("protocol").with_child(
                XmlNode::new("ikev1").with_child(leaf("ike-crypto-profile", "default")),
            ));
            if let Some(interface) = tunnel.interface.as_deref().and_then(|i| find_interface(model, i)) {
                gateway.push(
                    XmlNode::new("local-address").with_child(leaf("interface", &interface.name)),
                );
            }
            gateway.push(
                XmlNode::new("peer-address")
                    .with_child(leaf("ip", tunnel.peer.as_deref().unwrap_or_default())),
            );
            gateways.push(gateway);

            let mut auto_key = XmlNode::new("auto-key")
                .with_child(XmlNode::new("ike-gateway").with_child(entry(&name)))
                .with_child(leaf("ipsec-crypto-profile", "default"));
            let selectors: Vec<XmlNode> = model
                .vpn
                .phase2
                .iter()
                .filter(|p| p.phase1_name == tunnel.name)
                .map(|p| {
                    let cidr = |s: Option<&str>| {
                        netmask::split_address_mask(s.unwrap_or(defaults::PHASE2_SELECTOR))
                            .map(|(a, m)| netmask::to_cidr(&a, &m))
                            .unwrap_or_else(|| "0.0.0.0/0".to_string())
                    };
                    entry(&p.name)
                        .with_child(leaf("local", &cidr(p.src_subnet.as_deref())))
                        .with_child(leaf("remote", &cidr(p.dst_subnet.as_deref())))
                })
                .collect();
            if !selectors.is_empty() {
                let mut proxy = XmlNode::new("proxy-id");
                for selector in selectors {
                    proxy.push(selector);
                }
                auto_key.push(proxy);
            }
            ipsec.push(
                entry(&format!("{name}-tunnel"))
                    .with_child(auto_key)
                    .with_child(leaf("tunnel-interface", &format!("tunnel.{}", idx + 1))),
            );
        }
        network.push(XmlNode::new("ike").with_child(gateways));
        network.push(XmlNode::new("tunnel").with_child(ipsec));
    }
    for tunnel in model.vpn.tunnels.iter().filter(|t| t.peer.is_none()) {
        notes.push(format!("VPN tunnel {} without a peer", tunnel.name));
    }
    network
}

/// Service name for a rule, adding an implied service object for literal ports.
fn rule_service(
    model: &ConfigModel,
    text: &str,
    implied: &mut Vec<(String, String, String)>,
) -> String {
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
        ServiceRef::Port { protocol, port } => match (protocol.as_str(), port.as_str()) {
            ("tcp", "80") => "service-http".to_string(),
            ("tcp", "443") => "service-https".to_string(),
            _ => {
                let name = format!("{protocol}-{port}");
                if !implied.iter().any(|(n, _, _)| *n == name) {
                    implied.push((name.clone(), protocol, port));
                }
                name
            }
        },
        ServiceRef::Named(name) => name,
        ServiceRef::Any | ServiceRef::Protocol(_) => defaults::ANY.to_string(),
    }
}

fn security_rule(
    model: &ConfigModel,
    zoning: &Zoning,
    policies: &[SecurityPolicy],
    policy: &SecurityPolicy,
    position: usize,
    implied: &mut Vec<(String, String, String)>,
) -> XmlNode {
    let label = policy.label(position);
    let shared = policy.name.is_some() && policies.iter().filter(|p| p.name == policy.name).count() > 1;
    let name = if shared {
        format!("{label}-{}", position + 1)
    } else {
        label
    };
    let endpoints = |values: Vec<&str>| -> Vec<String> {
        values
            .into_iter()
            .map(|v| Endpoint::classify(v).to_text())
            .collect()
    };
    let mut services: Vec<String> = Vec::new();
    for service in policy.services() {
        let name = rule_service(model, service, implied);
        if !services.contains(&name) {
            services.push(name);
        }
    }
    let mut applications: Vec<String> = policy.application.clone();
    for service in policy.services() {
        if let ServiceRef::Protocol(protocol) = ServiceRef::classify(service) {
            if protocol == "icmp" && !applications.iter().any(|a| a == "icmp") {
                applications.push("icmp".to_string());
            }
        }
    }
    if applications.is_empty() {
        applications.push(defaults::ANY.to_string());
    }

    let mut node = entry(&name)
        .with_child(member_list(
            "from",
            &[zoning.resolve(model, policy.source_zone.as_deref())],
        ))
        .with_child(member_list(
            "to",
            &[zoning.resolve(model, policy.destination_zone.as_deref())],
        ))
        .with_child(member_list("source", &endpoints(policy.sources())))
        .with_child(member_list("destination", &endpoints(policy.destinations())))
        .with_child(member_list("service", &services))
        .with_child(member_list("application", &applications))
        .with_child(leaf(
            "action",
            if policy.action.is_permit() {
                "allow"
            } else {
                "deny"
            },
        ));
    if policy.log {
        node.push(leaf("log-end", "yes"));
    }
    if !policy.enabled {
        node.push(leaf("disabled", "yes"));
    }
    if let Some(description) = &policy.description {
        node.push(leaf("description", description));
    }
    node
}

fn services(
    model: &ConfigModel,
    implied: &[(String, String, String)],
    notes: &mut Vec<String>,
) -> Option<XmlNode> {
    let mut services = XmlNode::new("service");
    for service in &model.services {
        let protocol = service.protocol.to_ascii_lowercase();
        if !matches!(protocol.as_str(), "tcp" | "udp" | "sctp") {
            notes.push(format!("{} service {}", protocol, service.name));
            continue;
        }
        let port = service.port.as_deref().unwrap_or("1-65535");
        let mut node = entry(&service.name).with_child(
            XmlNode::new("protocol").with_child(XmlNode::new(protocol).with_child(leaf("port", port))),
        );
        if let Some(description) = &service.description {
            node.push(leaf("description", description));
        }
        services.push(node);
    }
    for (name, protocol, port) in implied {
        services.push(entry(name).with_child(
            XmlNode::new("protocol")
                .with_child(XmlNode::new(protocol.as_str()).with_child(leaf("port", port))),
        ));
    }
    (!services.children.is_empty()).then_some(services)
}

fn nat_rules(model: &ConfigModel, zoning: &Zoning, notes: &mut Vec<String>) -> Vec<XmlNode> {
    let mut rules = Vec::new();
    for (idx, rule) in model.nat.iter().enumerate() {
        let label = rule
            .name
            .clone()
            .or_else(|| rule.nat_id.as_ref().map(|id| format!("nat-{id}")))
            .unwrap_or_else(|| format!("nat-{}", idx + 1));
        if rule.kind == NatKind::Global {
            let paired = rule.nat_id.is_some()
                && model
                    .nat
                    .iter()
                    .any(|r| r.kind != NatKind::Global && r.nat_id == rule.nat_id);
            if !paired {
                notes.push(format!(
                    "address pool {label} {}",
                    rule.translated.as_deref().unwrap_or_default()
                ));
            }
            continue;
        }
        let Some(source) = rule.source.as_deref() else {
            notes.push(format!("NAT rule {label} without a real address"));
            continue;
        };
        let translated = rule
            .translated
            .as_deref()
            .or_else(|| paired_global(model, rule))
            .unwrap_or("interface");
        let translation = match rule.kind {
            NatKind::Static => XmlNode::new("static-ip")
                .with_child(leaf("translated-address", translated))
                .with_child(leaf("bi-directional", "yes")),
            _ if translated == "interface" => {
                let egress = rule
                    .interface
                    .as_deref()
                    .and_then(|i| find_interface(model, i))
                    .map(|i| i.name.clone());
                let mut address = XmlNode::new("interface-address");
                if let Some(egress) = egress {
                    address.push(leaf("interface", &egress));
                }
                XmlNode::new("dynamic-ip-and-port").with_child(address)
            }
            _ => XmlNode::new("dynamic-ip-and-port")
                .with_child(member_list("translated-address", &[translated])),
        };
        let destination = rule.destination.as_deref().unwrap_or(defaults::ANY);
        let mut node = entry(&label)
            .with_child(member_list(
                "from",
                &[zoning.resolve(model, rule.source_interface.as_deref())],
            ))
            .with_child(member_list(
                "to",
                &[zoning.resolve(model, rule.interface.as_deref())],
            ))
            .with_child(member_list("source", &[Endpoint::classify(source).to_text()]))
            .with_child(member_list(
                "destination",
                &[Endpoint::classify(destination).to_text()],
            ))
            .with_child(leaf("service", defaults::ANY))
            .with_child(XmlNode::new("source-translation").with_child(translation));
        if let Some(description) = &rule.description {
            node.push(leaf("description", description));
        }
        rules.push(node);
    }
    rules
}

fn paired_global<'a>(model: &'a ConfigModel, rule: &NatRule) -> Option<&'a str> {
    let id = rule.nat_id.as_deref()?;
    model
        .nat
        .iter()
        .find(|r| r.kind == NatKind::Global && r.nat_id.as_deref() == Some(id))
        .and_then(|r| r.translated.as_deref())
}

fn users(model: &ConfigModel) -> Option<XmlNode> {
    if model.users.is_empty() {
        return None;
    }
    let mut users = XmlNode::new("users");
    for user in &model.users {
        let role = match user.role.as_deref() {
            Some(role @ ("superuser" | "superreader" | "deviceadmin" | "devicereader")) => role,
            _ if user.privilege >= defaults::USER_PRIVILEGE => "superuser",
            _ => "superreader",
        };
        let mut node = entry(&user.username);
        if let Some(secret) = &user.secret {
            node.push(leaf("phash", secret));
        }
        node.push(
            XmlNode::new("permissions")
                .with_child(XmlNode::new("role-based").with_child(leaf(role, "yes"))),
        );
        users.push(node);
    }
    Some(users)
}

/// LDAP server profiles and syslog servers under `shared`.
fn shared(model: &ConfigModel) -> Option<XmlNode> {
    let mut shared = XmlNode::new("shared");
    let ldap: Vec<_> = model
        .aaa_servers
        .iter()
        .filter(|s| s.protocol.eq_ignore_ascii_case("ldap"))
        .collect();
    if !ldap.is_empty() {
        let mut profiles = XmlNode::new("ldap");
        for server in ldap {
            let mut node = entry(&server.name);
            if let Some(host) = &server.host {
                node.push(
                    XmlNode::new("server").with_child(
                        entry(host)
                            .with_child(leaf("address", host))
                            .with_child(leaf("port", &server.port)),
                    ),
                );
            }
            if let Some(base_dn) = &server.base_dn {
                node.push(leaf("base", base_dn));
            }
            profiles.push(node);
        }
        shared.push(XmlNode::new("server-profile").with_child(profiles));
    }
    let hosts: Vec<&str> = model
        .system
        .logging
        .iter()
        .filter_map(|l| l.host.as_deref())
        .collect();
    if !hosts.is_empty() {
        let mut servers = XmlNode::new("server");
        for host in hosts {
            servers.push(entry(host).with_child(leaf("server", host)));
        }
        shared.push(XmlNode::new("log-settings").with_child(
            XmlNode::new("syslog").with_child(entry("syslog").with_child(servers)),
        ));
    }
    (!shared.children.is_empty()).then_some(shared)
}

fn unmapped(model: &ConfigModel, notes: &mut Vec<String>) {
    for server in model
        .aaa_servers
        .iter()
        .filter(|s| !s.protocol.eq_ignore_ascii_case("ldap"))
    {
        notes.push(format!("{} server {}", server.protocol, server.name));
    }
    for profile in &model.security_profiles {
        notes.push(format!("{} {}", profile.kind, profile.name));
    }
    for (command, settings) in [("ssh", &model.system.ssh), ("http", &model.system.http)] {
        for setting in settings {
            if let AccessSetting::Option { key, value } = setting {
                notes.push(format!("{command} {key} {value}").trim_end().to_string());
            }
        }
    }
    for clock in &model.system.clock {
        notes.push(format!("clock {} {}", clock.key, clock.value));
    }
    if model.system.snmp.len() > 1 {
        notes.push(format!(
            "{} additional SNMP communities",
            model.system.snmp.len() - 1
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::{fallback_zone, generate};
    use crate::model::{
        ConfigModel, Interface, NatKind, NatRule, SecurityPolicy, SecurityProfile,
    };
    use crate::parse;
    use crate::vendor::VendorId;

    const SCENARIO: &str = "hostname fw1\ninterface Gi0/1\n nameif inside\n ip address 10.0.0.1 255.255.255.0\n security-level 100\n!";

    #[test]
    fn document_layout_and_fallback_zones() {
        let model = parse::asa::parse(SCENARIO);
        let text = generate(&model, VendorId::CiscoAsa).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("generated from Cisco ASA configuration"));

        let root = fwconv_xml::parse(&text).unwrap();
        assert_eq!(root.attr("version"), Some("10.0"));
        let device = root
            .get_child("devices")
            .and_then(|d| d.child_with_attr("entry", "name", "localhost.localdomain"))
            .unwrap();
        assert_eq!(
            device.get_text(&["deviceconfig", "system", "hostname"]),
            Some("fw1")
        );
        let ethernet = device.get_path(&["network", "interface", "ethernet"]).unwrap();
        let gi = ethernet.child_with_attr("entry", "name", "Gi0/1").unwrap();
        assert!(gi
            .get_path(&["layer3", "ip"])
            .and_then(|ip| ip.child_with_attr("entry", "name", "10.0.0.1/24"))
            .is_some());

        let vsys = device
            .get_child("vsys")
            .and_then(|v| v.child_with_attr("entry", "name", "vsys1"))
            .unwrap();
        let zones = vsys.get_child("zone").unwrap();
        assert_eq!(zones.children.len(), 3);
        let trust = zones.child_with_attr("entry", "name", "trust").unwrap();
        assert_eq!(
            trust.get_text(&["network", "layer3", "member"]),
            Some("Gi0/1")
        );
        assert!(vsys.get_child("rulebase").is_none());
        assert!(vsys.get_child("address").is_none());
    }

    #[test]
    fn zone_assignment_order() {
        let mut port = Interface::new("port1");
        port.zone = Some("untrust".to_string());
        port.description = Some("inside".to_string());
        assert_eq!(fallback_zone(&port), "untrust");

        let mut gi = Interface::new("Gi0/2");
        gi.description = Some("inside".to_string());
        assert_eq!(fallback_zone(&gi), "trust");

        gi.description = Some("partners".to_string());
        gi.security_level = Some(0);
        assert_eq!(fallback_zone(&gi), "untrust");
        gi.security_level = Some(50);
        assert_eq!(fallback_zone(&gi), "dmz");
    }

    #[test]
    fn rules_resolve_zones_and_literal_services() {
        let mut model = parse::asa::parse(SCENARIO);
        model.policies.push(SecurityPolicy {
            name: Some("inside_in".to_string()),
            action: crate::model::Action::Permit,
            source_zone: Some("inside".to_string()),
            destination: vec!["192.0.2.0/24".to_string()],
            service: vec!["tcp/8443".to_string(), "tcp/443".to_string(), "icmp".to_string()],
            log: true,
            ..SecurityPolicy::default()
        });
        model.nat.push(NatRule {
            kind: NatKind::Dynamic,
            source: Some("10.0.0.0/24".to_string()),
            translated: Some("interface".to_string()),
            source_interface: Some("inside".to_string()),
            interface: Some("Gi0/1".to_string()),
            ..NatRule::default()
        });
        model.security_profiles.push(SecurityProfile {
            name: "global_policy".to_string(),
            kind: "policy-map".to_string(),
            lines: Vec::new(),
        });
        let text = generate(&model, VendorId::CiscoAsa).unwrap();
        let root = fwconv_xml::parse(&text).unwrap();
        let vsys = root
            .get_path(&["devices", "entry", "vsys", "entry"])
            .unwrap();
        let rule = vsys
            .get_path(&["rulebase", "security", "rules"])
            .and_then(|r| r.child_with_attr("entry", "name", "inside_in"))
            .unwrap();
        assert_eq!(rule.get_text(&["from", "member"]), Some("trust"));
        assert_eq!(rule.get_text(&["to", "member"]), Some("any"));
        assert_eq!(rule.get_text(&["destination", "member"]), Some("192.0.2.0/24"));
        let services: Vec<_> = rule
            .get_child("service")
            .unwrap()
            .children
            .iter()
            .filter_map(|m| m.text.as_deref())
            .collect();
        assert_eq!(services, vec!["tcp-8443", "service-https", "any"]);
        assert_eq!(rule.get_text(&["application", "member"]), Some("icmp"));
        assert_eq!(rule.get_text(&["action"]), Some("allow"));
        assert_eq!(rule.get_text(&["log-end"]), Some("yes"));
        assert!(vsys
            .get_child("service")
            .and_then(|s| s.child_with_attr("entry", "name", "tcp-8443"))
            .is_some());

        let nat = vsys
            .get_path(&["rulebase", "nat", "rules", "entry"])
            .unwrap();
        assert_eq!(
            nat.get_text(&[
                "source-translation",
                "dynamic-ip-and-port",
                "interface-address",
                "interface"
            ]),
            Some("Gi0/1")
        );
        assert!(text.contains("not converted: policy-map global_policy"));
    }

    #[test]
    fn empty_model_has_only_device_identity() {
        let text = generate(&ConfigModel::default(), VendorId::Fortigate).unwrap();
        let root = fwconv_xml::parse(&text).unwrap();
        let device = root.get_path(&["devices", "entry"]).unwrap();
        assert_eq!(
            device.get_text(&["deviceconfig", "system", "hostname"]),
            Some("palo-alto-converted")
        );
        assert!(device.get_child("network").is_none());
        assert!(root.get_child("mgt-config").is_none());
        let vsys = device.get_path(&["vsys", "entry"]).unwrap();
        assert!(vsys.children.is_empty());
    }
}
