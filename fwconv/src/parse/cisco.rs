//! Line-directive grammar shared by the ASA and FTD parsers.
//!
//! Every non-indented line is classified into a [`Directive`]. One-line
//! directives update the model immediately; block directives open an
//! [`State::InBlock`] that collects indented sub-lines until `!`, end of
//! input, or the next recognized top-level directive.

use std::collections::BTreeMap;

use super::{port_number, rest_after};
use crate::model::defaults;
use crate::model::{
    is_ipv4, AaaServer, AccessGroup, AccessSetting, Action, AddressGroup, AddressKind,
    AddressObject, ClockSetting, ConfigModel, IkePolicy, Interface, LogSetting, NatKind, NatRule,
    Route, SecurityPolicy, SecurityProfile, ServiceObject, SnmpSetting, TransformSet, User,
};
use crate::netmask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    Asa,
    Ftd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Bang,
    Hostname,
    DomainName,
    Interface,
    ObjectNetwork,
    ObjectService,
    ObjectGroupNetwork,
    AccessList,
    AccessGroup,
    Route,
    Nat,
    Global,
    Static,
    IkePolicy,
    TransformSet,
    CryptoMap,
    AaaServer,
    GroupPolicy,
    TunnelGroup,
    Username,
    EnablePassword,
    Passwd,
    Logging,
    SnmpServer,
    Ssh,
    Http,
    Clock,
    ClassMap,
    PolicyMap,
    Other,
}

impl Directive {
    fn classify(tokens: &[&str]) -> Self {
        match tokens {
            [] => Directive::Other,
            [first, ..] if first.starts_with('!') => Directive::Bang,
            ["hostname", _, ..] => Directive::Hostname,
            ["domain-name", _, ..] => Directive::DomainName,
            ["interface", _, ..] => Directive::Interface,
            ["object", "network", _, ..] => Directive::ObjectNetwork,
            ["object", "service", _, ..] => Directive::ObjectService,
            ["object-group", "network", _, ..] => Directive::ObjectGroupNetwork,
            ["access-list", _, _, ..] => Directive::AccessList,
            ["access-group", _, ..] => Directive::AccessGroup,
            ["route", _, ..] => Directive::Route,
            ["nat", _, ..] => Directive::Nat,
            ["global", _, ..] => Directive::Global,
            ["static", _, ..] => Directive::Static,
            ["crypto", "isakmp" | "ikev1" | "ikev2", "policy", _, ..] => Directive::IkePolicy,
            ["crypto", "ipsec", rest @ ..] if rest.contains(&"transform-set") => {
                Directive::TransformSet
            }
            ["crypto", "map", _, _, ..] => Directive::CryptoMap,
            ["aaa-server", _, _, ..] => Directive::AaaServer,
            ["group-policy", _, _, ..] => Directive::GroupPolicy,
            ["tunnel-group", _, _, ..] => Directive::TunnelGroup,
            ["username", _, ..] => Directive::Username,
            ["enable", "password", _, ..] => Directive::EnablePassword,
            ["passwd", _, ..] => Directive::Passwd,
            ["logging", _, ..] => Directive::Logging,
            ["snmp-server", _, ..] => Directive::SnmpServer,
            ["ssh", _, ..] => Directive::Ssh,
            ["http", _, ..] => Directive::Http,
            ["clock", _, ..] => Directive::Clock,
            ["class-map", ..] => Directive::ClassMap,
            ["policy-map", ..] => Directive::PolicyMap,
            _ => Directive::Other,
        }
    }
}

impl Dialect {
    fn enables(self, directive: Directive) -> bool {
        match self {
            Dialect::Asa => !matches!(directive, Directive::ClassMap | Directive::PolicyMap),
            Dialect::Ftd => !matches!(
                directive,
                Directive::IkePolicy
                    | Directive::TransformSet
                    | Directive::CryptoMap
                    | Directive::AaaServer
                    | Directive::GroupPolicy
                    | Directive::TunnelGroup
                    | Directive::EnablePassword
                    | Directive::Passwd
                    | Directive::Global
                    | Directive::Static
            ),
        }
    }
}

#[derive(Debug)]
enum Block {
    Interface(Interface),
    Object(AddressObject),
    Service(ServiceObject),
    Group(AddressGroup),
    IkePolicy(IkePolicy),
    CryptoMap { name: String, sequence: Option<u32> },
    AaaServer(String),
    GroupPolicy(String),
    TunnelGroup(String),
    Profile(SecurityProfile),
    Skip,
}

#[derive(Debug)]
enum State {
    Idle,
    InBlock(Block),
}

struct Accumulator {
    dialect: Dialect,
    model: ConfigModel,
    state: State,
    pending_remark: Option<(String, String)>,
    acl_positions: BTreeMap<String, u32>,
    crypto_interfaces: Vec<(String, String)>,
}

pub(crate) fn parse(text: &str, dialect: Dialect) -> ConfigModel {
    text.lines()
        .fold(Accumulator::new(dialect), Accumulator::step)
        .finish()
}

impl Accumulator {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            model: ConfigModel::default(),
            state: State::Idle,
            pending_remark: None,
            acl_positions: BTreeMap::new(),
            crypto_interfaces: Vec::new(),
        }
    }

    fn step(mut self, raw: &str) -> Self {
        let line = raw.trim();
        if line.is_empty() {
            return self;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let indented = raw.starts_with(char::is_whitespace);

        let mut directive = Directive::classify(&tokens);
        // Directives the dialect does not support still end the current block.
        let foreign = !self.dialect.enables(directive);
        if foreign {
            directive = Directive::Other;
        }

        if directive == Directive::Bang {
            self.close_block();
            return self;
        }

        if let State::InBlock(_) = self.state {
            if indented || (directive == Directive::Other && !foreign) {
                self.block_line(line, &tokens);
                return self;
            }
            self.close_block();
        } else if indented {
            return self;
        }

        self.top_level(directive, line, &tokens);
        self
    }

    fn top_level(&mut self, directive: Directive, line: &str, tokens: &[&str]) {
        match directive {
            Directive::Bang => {}
            Directive::Hostname => self.model.hostname = Some(tokens[1].to_string()),
            Directive::DomainName => self.model.device.domain = Some(tokens[1].to_string()),
            Directive::Interface => {
                self.open(Block::Interface(Interface::new(tokens[1])));
            }
            Directive::ObjectNetwork => self.open(Block::Object(AddressObject {
                name: tokens[2].to_string(),
                ..AddressObject::default()
            })),
            Directive::ObjectService => self.open(Block::Service(ServiceObject {
                name: tokens[2].to_string(),
                ..ServiceObject::default()
            })),
            Directive::ObjectGroupNetwork => self.open(Block::Group(AddressGroup {
                name: tokens[2].to_string(),
                ..AddressGroup::default()
            })),
            Directive::AccessList => self.access_list(line, tokens),
            Directive::AccessGroup => self.access_group(tokens),
            Directive::Route => self.route(tokens),
            Directive::Nat => self.nat(tokens, None),
            Directive::Global => self.global(tokens),
            Directive::Static => self.static_nat(tokens),
            Directive::IkePolicy => self.open(Block::IkePolicy(IkePolicy {
                priority: tokens[3].to_string(),
                authentication: defaults::IKE_AUTHENTICATION.to_string(),
                encryption: defaults::IKE_ENCRYPTION.to_string(),
                hash: defaults::IKE_HASH.to_string(),
                group: defaults::IKE_DH_GROUP.to_string(),
                lifetime: defaults::IKE_LIFETIME.to_string(),
            })),
            Directive::TransformSet => self.transform_set(tokens),
            Directive::CryptoMap => self.crypto_map(tokens),
            Directive::AaaServer => self.aaa_server(tokens),
            Directive::GroupPolicy => self.group_policy(tokens),
            Directive::TunnelGroup => self.tunnel_group(tokens),
            Directive::Username => self.username(tokens),
            Directive::EnablePassword => {
                self.model.device.enable_password = Some(tokens[2].to_string());
            }
            Directive::Passwd => self.model.device.password = Some(tokens[1].to_string()),
            Directive::Logging => self.logging(tokens),
            Directive::SnmpServer => self.snmp(tokens),
            Directive::Ssh => {
                let setting = access_setting(&tokens[1..]);
                self.model.system.ssh.push(setting);
            }
            Directive::Http => {
                let setting = access_setting(&tokens[1..]);
                self.model.system.http.push(setting);
            }
            Directive::Clock => self.model.system.clock.push(ClockSetting {
                key: tokens[1].to_string(),
                value: rest_after(line, 2).to_string(),
            }),
            Directive::ClassMap | Directive::PolicyMap => {
                let name = tokens
                    .iter()
                    .skip(1)
                    .find(|t| !matches!(**t, "type" | "match-any" | "match-all" | "inspect"))
                    .copied()
                    .unwrap_or_default();
                self.open(Block::Profile(SecurityProfile {
                    name: name.to_string(),
                    kind: tokens[0].to_string(),
                    lines: Vec::new(),
                }));
            }
            Directive::Other => self.open(Block::Skip),
        }
    }

    fn open(&mut self, block: Block) {
        self.state = State::InBlock(block);
    }

    fn close_block(&mut self) {
        let state = std::mem::replace(&mut self.state, State::Idle);
        let State::InBlock(block) = state else {
            return;
        };
        match block {
            Block::Interface(interface) => self.model.upsert_interface(interface),
            Block::Object(object) => {
                if object.value.is_empty() {
                    tracing::debug!(object = %object.name, "object network without address");
                }
                self.model.upsert_address_object(object);
            }
            Block::Service(service) => self.model.services.push(service),
            Block::Group(group) => self.model.address_groups.push(group),
            Block::IkePolicy(policy) => self.model.vpn.ike_policies.push(policy),
            Block::Profile(profile) => self.model.security_profiles.push(profile),
            Block::CryptoMap { .. }
            | Block::AaaServer(_)
            | Block::GroupPolicy(_)
            | Block::TunnelGroup(_)
            | Block::Skip => {}
        }
    }

    fn block_line(&mut self, line: &str, tokens: &[&str]) {
        let State::InBlock(block) = &mut self.state else {
            return;
        };
        match block {
            Block::Interface(interface) => interface_line(interface, line, tokens),
            Block::Object(object) => {
                if let ["nat", ..] = tokens {
                    let name = object.name.clone();
                    self.nat(tokens, Some(&name));
                } else {
                    object_line(object, line, tokens);
                }
            }
            Block::Service(service) => service_line(service, line, tokens),
            Block::Group(group) => group_line(group, line, tokens),
            Block::IkePolicy(policy) => ike_line(policy, tokens),
            Block::CryptoMap { name, sequence } => {
                let (name, sequence) = (name.clone(), *sequence);
                self.crypto_map_setting(&name, sequence, tokens);
            }
            Block::AaaServer(name) => {
                let name = name.clone();
                self.aaa_line(&name, tokens);
            }
            Block::GroupPolicy(name) => {
                let group = self.model.vpn.group_policy_mut(name);
                match tokens {
                    ["vpn-tunnel-protocol", ..] => {
                        group.vpn_protocols = Some(rest_after(line, 1).to_string());
                    }
                    ["dns-server", "value", server, ..] | ["dns-server", server, ..] => {
                        group.dns_server = Some(server.to_string());
                    }
                    _ => {}
                }
            }
            Block::TunnelGroup(name) => {
                let group = self.model.vpn.tunnel_group_mut(name);
                match tokens {
                    ["default-group-policy", policy, ..] => {
                        group.default_group_policy = Some(policy.to_string());
                    }
                    ["ikev1" | "ikev2", "pre-shared-key", key, ..] | ["pre-shared-key", key, ..] => {
                        group.pre_shared_key = Some(key.to_string());
                    }
                    _ => {}
                }
            }
            Block::Profile(profile) => profile.lines.push(line.to_string()),
            Block::Skip => {}
        }
    }

    fn access_list(&mut self, line: &str, tokens: &[&str]) {
        let acl = tokens[1].to_string();
        let mut rest = &tokens[2..];
        if let ["line", _, tail @ ..] = rest {
            rest = tail;
        }
        match rest {
            ["remark", ..] => {
                let offset = tokens.len() - rest.len() + 1;
                self.pending_remark = Some((acl, rest_after(line, offset).to_string()));
                return;
            }
            ["extended", tail @ ..] => rest = tail,
            ["standard", action, tail @ ..] => {
                if let Some((destination, _)) = read_address(tail) {
                    let policy = SecurityPolicy {
                        action: Action::parse(action),
                        destination: vec![destination],
                        ..SecurityPolicy::default()
                    };
                    self.push_policy(acl, policy);
                }
                return;
            }
            [kind, ..] if matches!(*kind, "webtype" | "ethertype") => return,
            _ => {}
        }

        let Some(policy) = extended_rule(rest) else {
            tracing::debug!(acl = %acl, line, "skipping unrecognized access-list entry");
            return;
        };
        self.push_policy(acl, policy);
    }

    fn push_policy(&mut self, acl: String, mut policy: SecurityPolicy) {
        let position = self.acl_positions.entry(acl.clone()).or_insert(0);
        *position += 1;
        policy.id = Some(*position);
        if let Some((remark_acl, text)) = self.pending_remark.take() {
            if remark_acl == acl {
                policy.description = Some(text);
            }
        }
        policy.name = Some(acl);
        self.model.policies.push(policy);
    }

    fn access_group(&mut self, tokens: &[&str]) {
        match tokens {
            ["access-group", acl, direction, "interface", interface, ..] => {
                self.model.access_groups.push(AccessGroup {
                    acl: acl.to_string(),
                    direction: direction.to_string(),
                    interface: interface.to_string(),
                });
            }
            ["access-group", acl, "global", ..] => self.model.access_groups.push(AccessGroup {
                acl: acl.to_string(),
                direction: "global".to_string(),
                interface: String::new(),
            }),
            _ => {}
        }
    }

    fn route(&mut self, tokens: &[&str]) {
        let route = match tokens {
            // route <network> <mask> <gateway> [interface]
            ["route", network, mask, gateway, rest @ ..] if is_ipv4(network) => Route {
                network: network.to_string(),
                mask: mask.to_string(),
                gateway: Some(gateway.to_string()),
                interface: rest.first().map(|s| s.to_string()),
                ..Route::default()
            },
            // route <interface> <network> <mask> <gateway> [distance]
            ["route", interface, network, mask, gateway, rest @ ..] => Route {
                network: network.to_string(),
                mask: mask.to_string(),
                gateway: Some(gateway.to_string()),
                interface: Some(interface.to_string()),
                distance: rest.first().and_then(|d| d.parse().ok()),
                ..Route::default()
            },
            _ => {
                tracing::debug!(?tokens, "skipping incomplete route");
                return;
            }
        };
        self.model.routes.push(route);
    }

    fn nat(&mut self, tokens: &[&str], object: Option<&str>) {
        let Some((source_interface, interface)) = tokens.get(1).and_then(|t| nat_interfaces(t))
        else {
            return;
        };
        let mut rule = NatRule {
            source_interface,
            interface,
            ..NatRule::default()
        };
        let mut rest = &tokens[2..];
        if let ["after-auto" | "after-object", tail @ ..] = rest {
            rest = tail;
        }
        if let Some(idx) = rest.iter().position(|t| *t == "description") {
            rule.description = Some(rest[idx + 1..].join(" "));
            rest = &rest[..idx];
        }

        match (object, rest) {
            (Some(name), [kind @ ("dynamic" | "static"), mapped, ..]) => {
                rule.kind = nat_kind(kind);
                rule.source = Some(name.to_string());
                rule.translated = Some(mapped.to_string());
            }
            (None, ["source", kind @ ("dynamic" | "static"), real, mapped, tail @ ..]) => {
                rule.kind = nat_kind(kind);
                rule.source = Some(real.to_string());
                rule.translated = Some(mapped.to_string());
                if let ["destination", "static", destination, ..] = tail {
                    rule.destination = Some(destination.to_string());
                }
            }
            (None, [id, "access-list", acl, ..]) => {
                rule.nat_id = Some(id.to_string());
                rule.source = Some(acl.to_string());
            }
            (None, [id, address, mask, ..]) if is_ipv4(address) => {
                rule.nat_id = Some(id.to_string());
                rule.source = Some(legacy_source(address, mask));
            }
            _ => {
                tracing::debug!(?tokens, "skipping unrecognized nat statement");
                return;
            }
        }
        self.model.nat.push(rule);
    }

    fn global(&mut self, tokens: &[&str]) {
        let ["global", interfaces, id, mapped, ..] = tokens else {
            return;
        };
        let Some((interface, _)) = nat_interfaces(interfaces) else {
            return;
        };
        self.model.nat.push(NatRule {
            kind: NatKind::Global,
            translated: Some(mapped.to_string()),
            interface,
            nat_id: Some(id.to_string()),
            ..NatRule::default()
        });
    }

    fn static_nat(&mut self, tokens: &[&str]) {
        let Some((source_interface, interface)) = tokens.get(1).and_then(|t| nat_interfaces(t))
        else {
            return;
        };
        let mut rest = &tokens[2..];
        if let ["tcp" | "udp", tail @ ..] = rest {
            rest = tail;
        }
        let [mapped, real, ..] = rest else {
            return;
        };
        self.model.nat.push(NatRule {
            kind: NatKind::Static,
            source: Some(real.to_string()),
            translated: Some(mapped.to_string()),
            source_interface,
            interface,
            ..NatRule::default()
        });
    }

    fn transform_set(&mut self, tokens: &[&str]) {
        let Some(idx) = tokens.iter().position(|t| *t == "transform-set") else {
            return;
        };
        let Some(name) = tokens.get(idx + 1) else {
            return;
        };
        let transforms = &tokens[idx + 2..];
        let encryption = transforms
            .first()
            .map(|t| strip_esp(t))
            .unwrap_or_else(|| defaults::TRANSFORM_ENCRYPTION.to_string());
        let hash = transforms
            .get(1)
            .map(|t| strip_esp(t))
            .unwrap_or_else(|| defaults::TRANSFORM_HASH.to_string());
        self.model.vpn.transform_sets.push(TransformSet {
            name: name.to_string(),
            protocol: defaults::TRANSFORM_PROTOCOL.to_string(),
            encryption,
            hash,
        });
    }

    fn crypto_map(&mut self, tokens: &[&str]) {
        let name = tokens[2].to_string();
        if let ["interface", interface, ..] = &tokens[3..] {
            self.crypto_interfaces.push((name, interface.to_string()));
            return;
        }
        let Ok(sequence) = tokens[3].parse::<u32>() else {
            return;
        };
        self.model.vpn.tunnel_mut(&name, Some(sequence));
        match &tokens[4..] {
            ["ipsec-isakmp", ..] | [] => self.open(Block::CryptoMap {
                name,
                sequence: Some(sequence),
            }),
            setting => self.crypto_map_setting(&name, Some(sequence), setting),
        }
    }

    fn crypto_map_setting(&mut self, name: &str, sequence: Option<u32>, tokens: &[&str]) {
        let tunnel = self.model.vpn.tunnel_mut(name, sequence);
        match tokens {
            ["match", "address", acl, ..] => tunnel.acl = Some(acl.to_string()),
            ["set", "peer", peers @ ..] if !peers.is_empty() => {
                tunnel.peer = Some(peers.join(" "));
            }
            ["set", "ikev1" | "ikev2", "transform-set" | "ipsec-proposal", sets @ ..]
            | ["set", "transform-set", sets @ ..]
                if !sets.is_empty() =>
            {
                tunnel.proposal = Some(sets.join(" "));
            }
            ["description", ..] => tunnel.description = Some(tokens[1..].join(" ")),
            _ => {}
        }
    }

    fn aaa_server(&mut self, tokens: &[&str]) {
        let name = tokens[1];
        if !self.model.aaa_servers.iter().any(|s| s.name == name) {
            self.model.aaa_servers.push(AaaServer {
                name: name.to_string(),
                protocol: defaults::AAA_PROTOCOL.to_string(),
                port: defaults::AAA_PORT.to_string(),
                ..AaaServer::default()
            });
        }
        let Some(server) = self.model.aaa_servers.iter_mut().find(|s| s.name == name) else {
            return;
        };
        match &tokens[2..] {
            ["protocol", protocol, ..] => server.protocol = protocol.to_string(),
            [interface, "host", host, ..] => {
                server.interface = interface
                    .strip_prefix('(')
                    .and_then(|i| i.strip_suffix(')'))
                    .map(str::to_string);
                server.host = Some(host.to_string());
                self.open(Block::AaaServer(name.to_string()));
            }
            ["host", host, ..] => {
                server.host = Some(host.to_string());
                self.open(Block::AaaServer(name.to_string()));
            }
            _ => {}
        }
    }

    fn aaa_line(&mut self, name: &str, tokens: &[&str]) {
        let Some(server) = self.model.aaa_servers.iter_mut().find(|s| s.name == name) else {
            return;
        };
        match tokens {
            ["ldap-base-dn", dn, ..] => server.base_dn = Some(dn.to_string()),
            ["server-port", port, ..] => server.port = port.to_string(),
            ["description", ..] => server.description = Some(tokens[1..].join(" ")),
            _ => {}
        }
    }

    fn group_policy(&mut self, tokens: &[&str]) {
        let name = tokens[1];
        let group = self.model.vpn.group_policy_mut(name);
        match tokens[2] {
            "attributes" => self.open(Block::GroupPolicy(name.to_string())),
            kind => group.kind = Some(kind.to_string()),
        }
    }

    fn tunnel_group(&mut self, tokens: &[&str]) {
        let name = tokens[1];
        let group = self.model.vpn.tunnel_group_mut(name);
        match &tokens[2..] {
            ["type", kind, ..] => group.kind = Some(kind.to_string()),
            ["general-attributes" | "ipsec-attributes", ..] => {
                self.open(Block::TunnelGroup(name.to_string()));
            }
            _ => {}
        }
    }

    fn username(&mut self, tokens: &[&str]) {
        let mut user = User {
            username: tokens[1].to_string(),
            privilege: defaults::USER_PRIVILEGE,
            ..User::default()
        };
        let rest = &tokens[2..];
        let keyword = rest
            .iter()
            .position(|t| matches!(*t, "password" | "secret" | "privilege" | "nopassword"));
        match keyword {
            Some(_) => {
                for pair in rest.windows(2) {
                    match pair {
                        ["password" | "secret", secret] => user.secret = Some(secret.to_string()),
                        ["privilege", level] => {
                            user.privilege = level.parse().unwrap_or(defaults::USER_PRIVILEGE);
                        }
                        _ => {}
                    }
                }
            }
            // username <name> <secret> [privilege-level]
            None => {
                user.secret = rest.first().map(|s| s.to_string());
                if let Some(level) = rest.get(1).and_then(|l| l.parse().ok()) {
                    user.privilege = level;
                }
            }
        }
        if let ["attributes", ..] = rest {
            return;
        }
        self.model.users.push(user);
    }

    fn logging(&mut self, tokens: &[&str]) {
        let setting = match &tokens[1..] {
            ["host", interface, host, ..] => LogSetting {
                target: "host".to_string(),
                level: defaults::LOG_LEVEL.to_string(),
                host: Some(host.to_string()),
                interface: Some(interface.to_string()),
            },
            [target, level, ..] => LogSetting {
                target: target.to_string(),
                level: level.to_string(),
                ..LogSetting::default()
            },
            [target] => LogSetting {
                target: target.to_string(),
                level: defaults::LOG_LEVEL.to_string(),
                ..LogSetting::default()
            },
            [] => return,
        };
        self.model.system.logging.push(setting);
    }

    fn snmp(&mut self, tokens: &[&str]) {
        let mut setting = SnmpSetting {
            community: defaults::SNMP_COMMUNITY.to_string(),
            version: defaults::SNMP_VERSION.to_string(),
            ..SnmpSetting::default()
        };
        match &tokens[1..] {
            ["host", interface, host, rest @ ..] => {
                setting.host = Some(host.to_string());
                setting.interface = Some(interface.to_string());
                for pair in rest.windows(2) {
                    match pair {
                        ["community", community] => setting.community = community.to_string(),
                        ["version", version] => setting.version = version.to_string(),
                        _ => {}
                    }
                }
            }
            ["community", community, ..] => setting.community = community.to_string(),
            _ => return,
        }
        self.model.system.snmp.push(setting);
    }

    fn finish(mut self) -> ConfigModel {
        self.close_block();
        let mut model = self.model;

        for (map, interface) in &self.crypto_interfaces {
            for tunnel in model.vpn.tunnels.iter_mut().filter(|t| &t.name == map) {
                tunnel.interface = Some(interface.clone());
            }
        }
        let groups = model.vpn.tunnel_groups.clone();
        for tunnel in &mut model.vpn.tunnels {
            if tunnel.pre_shared_key.is_some() {
                continue;
            }
            let Some(peer) = tunnel.peer.as_deref() else {
                continue;
            };
            if let Some(group) = groups.iter().find(|g| g.name == peer) {
                tunnel.pre_shared_key = group.pre_shared_key.clone();
            }
        }
        for binding in model.access_groups.iter().filter(|b| b.direction == "in") {
            for policy in model
                .policies
                .iter_mut()
                .filter(|p| p.name.as_deref() == Some(binding.acl.as_str()))
            {
                policy.source_zone.get_or_insert_with(|| binding.interface.clone());
            }
        }
        model
    }
}

fn interface_line(interface: &mut Interface, line: &str, tokens: &[&str]) {
    match tokens {
        ["nameif", name, ..] => interface.description = Some(name.to_string()),
        ["description", ..] => interface.comment = Some(rest_after(line, 1).to_string()),
        ["ip", "address", ip, mask, ..] if is_ipv4(ip) => {
            interface.ip = Some(ip.to_string());
            interface.mask = Some(mask.to_string());
        }
        ["ip", "address", cidr] => {
            if let Some((ip, mask)) = netmask::split_cidr(cidr) {
                interface.ip = Some(ip);
                interface.mask = Some(mask);
            }
        }
        ["security-level", level, ..] => interface.security_level = level.parse().ok(),
        ["vlan", id, ..] => interface.vlan = id.parse().ok(),
        ["shutdown"] => interface.enabled = false,
        _ => {}
    }
}

fn object_line(object: &mut AddressObject, line: &str, tokens: &[&str]) {
    match tokens {
        ["host", address, ..] => {
            object.kind = AddressKind::Host;
            object.value = address.to_string();
        }
        ["subnet", address, mask, ..] => {
            object.kind = AddressKind::Subnet;
            object.value = address.to_string();
            object.mask = Some(mask.to_string());
        }
        ["range", start, end, ..] => {
            object.kind = AddressKind::Range;
            object.value = format!("{start}-{end}");
        }
        ["fqdn", "v4" | "v6", name, ..] | ["fqdn", name, ..] => {
            object.kind = AddressKind::Fqdn;
            object.value = name.to_string();
        }
        ["description", ..] => object.description = Some(rest_after(line, 1).to_string()),
        _ => {}
    }
}

fn service_line(service: &mut ServiceObject, line: &str, tokens: &[&str]) {
    match tokens {
        ["service", protocol, rest @ ..] => {
            service.protocol = protocol.to_string();
            let ports = match rest.iter().position(|t| *t == "destination") {
                Some(idx) => &rest[idx + 1..],
                None => rest,
            };
            service.port = port_spec(ports).map(|(port, _)| port);
        }
        ["description", ..] => service.description = Some(rest_after(line, 1).to_string()),
        _ => {}
    }
}

fn group_line(group: &mut AddressGroup, line: &str, tokens: &[&str]) {
    match tokens {
        ["group-object", name, ..] => group.members.push(name.to_string()),
        ["network-object", rest @ ..] => {
            if let Some((member, _)) = read_address(rest) {
                group.members.push(member);
            }
        }
        ["description", ..] => group.description = Some(rest_after(line, 1).to_string()),
        _ => {}
    }
}

fn ike_line(policy: &mut IkePolicy, tokens: &[&str]) {
    match tokens {
        ["authentication", value, ..] => policy.authentication = value.to_string(),
        ["encryption", value, ..] => policy.encryption = value.to_string(),
        ["hash", value, ..] | ["integrity", value, ..] => policy.hash = value.to_string(),
        ["group", value, ..] => policy.group = value.to_string(),
        ["lifetime", "seconds", value, ..] | ["lifetime", value, ..] => {
            policy.lifetime = value.to_string();
        }
        _ => {}
    }
}

/// `permit tcp <src> [srcport] <dst> [dstport] [log] [inactive]`.
fn extended_rule(tokens: &[&str]) -> Option<SecurityPolicy> {
    let (action, rest) = tokens.split_first()?;
    if !matches!(*action, "permit" | "deny") {
        return None;
    }
    let mut policy = SecurityPolicy {
        action: Action::parse(action),
        ..SecurityPolicy::default()
    };

    let mut rest = rest;
    match rest {
        ["object" | "object-group", service, tail @ ..] => {
            policy.service.push(service.to_string());
            rest = tail;
        }
        [protocol, tail @ ..] => {
            policy.protocol = protocol.to_ascii_lowercase();
            rest = tail;
        }
        [] => return None,
    }

    let (source, used) = read_address(rest)?;
    rest = &rest[used..];
    if let Some((_, used)) = port_spec(rest) {
        rest = &rest[used..];
    }
    let (destination, used) = read_address(rest)?;
    rest = &rest[used..];

    if let Some((port, used)) = port_spec(rest) {
        policy.service.push(format!("{}/{port}", policy.protocol));
        rest = &rest[used..];
    } else if let ["object-group" | "object", service, tail @ ..] = rest {
        policy.service.push(service.to_string());
        rest = tail;
    } else if policy.service.is_empty() && matches!(policy.protocol.as_str(), "tcp" | "udp" | "icmp") {
        policy.service.push(policy.protocol.clone());
    }

    for token in rest {
        match *token {
            "log" => policy.log = true,
            "inactive" => policy.enabled = false,
            _ => {}
        }
    }
    policy.source.push(source);
    policy.destination.push(destination);
    Some(policy)
}

/// Address operand in endpoint text form plus the number of tokens consumed.
fn read_address(tokens: &[&str]) -> Option<(String, usize)> {
    match tokens {
        [any, ..] if matches!(*any, "any" | "any4" | "any6") => {
            Some((defaults::ANY.to_string(), 1))
        }
        ["host", address, ..] => Some((address.to_string(), 2)),
        ["object" | "object-group" | "interface", name, ..] => Some((name.to_string(), 2)),
        [address, mask, ..] if is_ipv4(address) && is_ipv4(mask) => {
            if *mask == "255.255.255.255" {
                Some((address.to_string(), 2))
            } else {
                Some((netmask::to_cidr(address, mask), 2))
            }
        }
        [cidr, ..] if netmask::split_cidr(cidr).is_some() => Some((cidr.to_string(), 1)),
        [address, ..] if is_ipv4(address) => Some((address.to_string(), 1)),
        _ => None,
    }
}

/// `eq P`, `range A B`, `gt P`, `lt P` → port text and tokens consumed.
fn port_spec(tokens: &[&str]) -> Option<(String, usize)> {
    match tokens {
        ["eq", port, ..] => Some((port_number(port), 2)),
        ["range", start, end, ..] => Some((
            format!("{}-{}", port_number(start), port_number(end)),
            3,
        )),
        ["gt", port, ..] => {
            let port: u16 = port_number(port).parse().ok()?;
            Some((format!("{}-65535", port.saturating_add(1)), 2))
        }
        ["lt", port, ..] => {
            let port: u16 = port_number(port).parse().ok()?;
            Some((format!("1-{}", port.saturating_sub(1)), 2))
        }
        _ => None,
    }
}

/// `(inside,outside)` → real and mapped interface names.
fn nat_interfaces(token: &str) -> Option<(Option<String>, Option<String>)> {
    let inner = token.strip_prefix('(')?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim().to_string());
    let first = parts.next().filter(|p| !p.is_empty());
    let second = parts.next().filter(|p| !p.is_empty());
    Some((first, second))
}

fn nat_kind(keyword: &str) -> NatKind {
    if keyword == "static" {
        NatKind::Static
    } else {
        NatKind::Dynamic
    }
}

fn legacy_source(address: &str, mask: &str) -> String {
    if address == "0.0.0.0" && mask == "0.0.0.0" {
        defaults::ANY.to_string()
    } else if is_ipv4(mask) {
        netmask::to_cidr(address, mask)
    } else {
        address.to_string()
    }
}

/// `esp-aes-256` → `aes-256`, `esp-sha-hmac` → `sha`.
fn strip_esp(transform: &str) -> String {
    let value = transform.strip_prefix("esp-").unwrap_or(transform);
    value.strip_suffix("-hmac").unwrap_or(value).to_string()
}

fn access_setting(tokens: &[&str]) -> AccessSetting {
    match tokens {
        [address, mask, interface, ..] if is_ipv4(address) => AccessSetting::Allow {
            address: address.to_string(),
            mask: mask.to_string(),
            interface: interface.to_string(),
        },
        [key, rest @ ..] => AccessSetting::Option {
            key: key.to_string(),
            value: rest.join(" "),
        },
        [] => AccessSetting::Option {
            key: String::new(),
            value: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{extended_rule, parse, port_spec, read_address, strip_esp, Dialect};

    const SCENARIO: &str = "hostname fw1\ninterface Gi0/1\n nameif inside\n ip address 10.0.0.1 255.255.255.0\n security-level 100\n!";

    #[test]
    fn single_interface_block() {
        let model = parse(SCENARIO, Dialect::Asa);
        assert_eq!(model.hostname.as_deref(), Some("fw1"));
        assert_eq!(model.interfaces.len(), 1);
        let interface = &model.interfaces[0];
        assert_eq!(interface.name, "Gi0/1");
        assert_eq!(interface.description.as_deref(), Some("inside"));
        assert_eq!(interface.ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(interface.mask.as_deref(), Some("255.255.255.0"));
        assert_eq!(interface.security_level, Some(100));
    }

    #[test]
    fn n_interface_blocks_give_n_interfaces() {
        let text: String = (0..5)
            .map(|i| format!("interface Gi0/{i}\n nameif if{i}\n!\n"))
            .collect();
        assert_eq!(parse(&text, Dialect::Ftd).interfaces.len(), 5);
    }

    #[test]
    fn block_closes_on_next_directive_without_bang() {
        let model = parse(
            "interface Gi0/0\n nameif outside\ninterface Gi0/1\n nameif inside\nhostname x\n",
            Dialect::Asa,
        );
        assert_eq!(model.interfaces.len(), 2);
        assert_eq!(model.interfaces[1].description.as_deref(), Some("inside"));
        assert_eq!(model.hostname.as_deref(), Some("x"));
    }

    #[test]
    fn garbage_and_empty_input_yield_empty_model() {
        assert_eq!(parse("", Dialect::Asa), Default::default());
        let model = parse("this is not\n  a firewall\n%%%\n", Dialect::Asa);
        assert!(model.interfaces.is_empty());
        assert!(model.hostname.is_none());
    }

    #[test]
    fn address_operands() {
        assert_eq!(read_address(&["any"]), Some(("any".to_string(), 1)));
        assert_eq!(
            read_address(&["host", "10.0.0.1"]),
            Some(("10.0.0.1".to_string(), 2))
        );
        assert_eq!(
            read_address(&["10.0.0.0", "255.255.0.0"]),
            Some(("10.0.0.0/16".to_string(), 2))
        );
        assert_eq!(read_address(&["eq", "80"]), None);
    }

    #[test]
    fn extended_rule_with_ports() {
        let rule = extended_rule(&[
            "permit", "udp", "any", "range", "1000", "2000", "host", "10.0.0.5", "range", "5000",
            "5100", "inactive",
        ])
        .expect("rule");
        assert_eq!(rule.service, vec!["udp/5000-5100"]);
        assert_eq!(rule.destination, vec!["10.0.0.5"]);
        assert!(!rule.enabled);
        assert!(extended_rule(&["permit", "tcp", "bogus"]).is_none());
        assert_eq!(port_spec(&["gt", "1023"]), Some(("1024-65535".to_string(), 2)));
    }

    #[test]
    fn port_qualifiers_stay_in_range() {
        assert_eq!(port_spec(&["gt", "65535"]), Some(("65535-65535".to_string(), 2)));
        assert_eq!(port_spec(&["gt", "4294967295"]), None);
        assert_eq!(port_spec(&["lt", "70000"]), None);

        let model = parse(
            "access-list A extended permit tcp any any gt 4294967295\n",
            Dialect::Asa,
        );
        assert_eq!(model.policies.len(), 1);
        assert_eq!(model.policies[0].service, vec!["tcp"]);
    }

    #[test]
    fn transform_names() {
        assert_eq!(strip_esp("esp-3des"), "3des");
        assert_eq!(strip_esp("esp-sha-hmac"), "sha");
    }
}
