//! PAN-OS configuration scanner.
//!
//! The XML is read line by line, not as a document tree. While no entry is
//! open, container tags (`<address>`, `<security>`, ...) set the current
//! section. Inside a section every `<entry name="...">` up to its matching
//! `</entry>` is collected and mapped onto the model.
//!
//! Known limits of this approach: one element per line is assumed, member
//! lists are the `<member>` lines directly after their container, an
//! interface address is read from the line after `<ip>`, and zone members
//! from the lines after `<network>`. Re-wrapped XML silently loses those
//! values.

use crate::model::defaults;
use crate::model::{
    is_ipv4, Action, AddressGroup, AddressKind, AddressObject, Application, ConfigModel,
    Interface, NatKind, NatRule, Phase2Selector, Route, SecurityPolicy, ServiceObject,
    UrlCategory, User, VpnTunnel, Zone,
};
use crate::netmask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Interfaces,
    Zones,
    Addresses,
    AddressGroups,
    Services,
    Security,
    Nat,
    Routes,
    IkeGateways,
    IpsecTunnels,
    Admins,
    Applications,
    UrlCategories,
}

impl Section {
    const TAGS: [(&'static str, Section); 13] = [
        ("ethernet", Section::Interfaces),
        ("zone", Section::Zones),
        ("address", Section::Addresses),
        ("address-group", Section::AddressGroups),
        ("service", Section::Services),
        ("security", Section::Security),
        ("nat", Section::Nat),
        ("static-route", Section::Routes),
        ("gateway", Section::IkeGateways),
        ("ipsec", Section::IpsecTunnels),
        ("users", Section::Admins),
        ("application", Section::Applications),
        ("custom-url-category", Section::UrlCategories),
    ];

    fn open(line: &str) -> Option<Section> {
        Self::TAGS
            .iter()
            .find(|(tag, _)| line == format!("<{tag}>"))
            .map(|(_, section)| *section)
    }

    fn closes(self, line: &str) -> bool {
        Self::TAGS
            .iter()
            .any(|(tag, section)| *section == self && line == format!("</{tag}>"))
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    InEntry { start: usize, depth: usize },
}

pub fn parse(text: &str) -> ConfigModel {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut model = ConfigModel::default();
    let mut section: Option<Section> = None;
    let mut state = State::Idle;

    for (idx, line) in lines.iter().enumerate() {
        match state {
            State::Idle => {
                if let Some(opened) = Section::open(line) {
                    section = Some(opened);
                    continue;
                }
                if let Some(current) = section {
                    if current.closes(line) {
                        section = None;
                        continue;
                    }
                    if entry_name(line).is_some() {
                        if line.ends_with("/>") || line.contains("</entry>") {
                            apply(&mut model, current, &lines[idx..=idx]);
                        } else {
                            state = State::InEntry {
                                start: idx,
                                depth: 1,
                            };
                        }
                    }
                    continue;
                }
                if let Some(hostname) = leaf(line, "hostname") {
                    model.hostname = Some(hostname);
                } else if let Some(timezone) = leaf(line, "timezone") {
                    model.device.timezone = Some(timezone);
                } else if let Some(domain) = leaf(line, "domain") {
                    model.device.domain = Some(domain);
                }
            }
            State::InEntry { start, depth } => {
                let depth = (depth + opens(line)).saturating_sub(closes(line));
                if depth == 0 {
                    if let Some(current) = section {
                        apply(&mut model, current, &lines[start..=idx]);
                    }
                    state = State::Idle;
                } else {
                    state = State::InEntry { start, depth };
                }
            }
        }
    }

    assign_zone_members(&mut model);
    model
}

fn apply(model: &mut ConfigModel, section: Section, lines: &[&str]) {
    let entry = EntryView::new(lines);
    let Some(name) = entry.name.clone() else {
        return;
    };
    match section {
        Section::Interfaces => {
            model.upsert_interface(interface(&entry, name));
            for unit in entry.children() {
                if let Some(unit_name) = unit.name.clone() {
                    let mut sub = interface(&unit, unit_name);
                    sub.vlan = unit.leaf("tag").and_then(|t| t.parse().ok());
                    model.upsert_interface(sub);
                }
            }
        }
        Section::Zones => model.zones.push(Zone {
            name,
            interfaces: entry.zone_members(),
            description: None,
        }),
        Section::Addresses => match address(&entry, name.clone()) {
            Some(object) => model.upsert_address_object(object),
            None => tracing::debug!(address = %name, "dropping address without value"),
        },
        Section::AddressGroups => model.address_groups.push(AddressGroup {
            name,
            members: entry.members("static"),
            description: entry.leaf("description"),
        }),
        Section::Services => {
            let protocol = ["tcp", "udp"]
                .into_iter()
                .find(|p| entry.has_tag(p))
                .unwrap_or("ip");
            model.services.push(ServiceObject {
                name,
                protocol: protocol.to_string(),
                port: entry.leaf("port"),
                description: entry.leaf("description"),
            });
        }
        Section::Security => model.policies.push(security_rule(&entry, name)),
        Section::Nat => model.nat.push(nat_rule(&entry, name)),
        Section::Routes => {
            let Some(destination) = entry.leaf("destination") else {
                tracing::debug!(route = %name, "dropping route without destination");
                return;
            };
            let (network, mask) = netmask::split_address_mask(&destination)
                .unwrap_or_else(|| (destination.clone(), "255.255.255.255".to_string()));
            model.routes.push(Route {
                name: Some(name),
                network,
                mask,
                gateway: entry.leaf("ip-address"),
                interface: entry.leaf("interface"),
                distance: entry.leaf("admin-dist").and_then(|d| d.parse().ok()),
                description: None,
            });
        }
        Section::IkeGateways => model.vpn.tunnels.push(VpnTunnel {
            name,
            interface: entry.leaf("interface"),
            peer: entry.leaf("ip").filter(|ip| is_ipv4(ip)),
            proposal: entry.leaf("ike-crypto-profile"),
            pre_shared_key: entry.leaf("key"),
            ..VpnTunnel::default()
        }),
        Section::IpsecTunnels => {
            let Some(gateway) = entry.entry_after("ike-gateway") else {
                tracing::debug!(tunnel = %name, "dropping ipsec tunnel without gateway");
                return;
            };
            let proxy = entry.children().into_iter().next();
            model.vpn.phase2.push(Phase2Selector {
                name,
                phase1_name: gateway,
                proposal: entry.leaf("ipsec-crypto-profile"),
                src_subnet: proxy.as_ref().and_then(|p| p.leaf("local")),
                dst_subnet: proxy.as_ref().and_then(|p| p.leaf("remote")),
            });
        }
        Section::Admins => {
            let role = ["superuser", "superreader", "deviceadmin", "devicereader"]
                .into_iter()
                .find(|r| entry.has_tag(r) || entry.any_leaf(r).is_some());
            model.users.push(User {
                username: name,
                secret: entry.leaf("phash"),
                privilege: if role == Some("superuser") {
                    defaults::USER_PRIVILEGE
                } else {
                    defaults::READ_ONLY_PRIVILEGE
                },
                role: role.map(str::to_string),
            });
        }
        Section::Applications => model.applications.push(Application {
            name,
            category: entry.leaf("category"),
            description: entry.leaf("description"),
        }),
        Section::UrlCategories => model.url_categories.push(UrlCategory {
            name,
            urls: entry.members("list"),
            description: entry.leaf("description"),
        }),
    }
}

fn interface(entry: &EntryView<'_>, name: String) -> Interface {
    let mut interface = Interface::new(name);
    if let Some((ip, mask)) = entry
        .entry_after("ip")
        .and_then(|cidr| netmask::split_address_mask(&cidr))
    {
        interface.ip = Some(ip);
        interface.mask = Some(mask);
    }
    interface.description = entry.leaf("comment");
    interface
}

fn address(entry: &EntryView<'_>, name: String) -> Option<AddressObject> {
    let description = entry.leaf("description");
    let mut object = if let Some(value) = entry.leaf("ip-netmask") {
        match netmask::split_cidr(&value) {
            Some((address, mask)) if mask != "255.255.255.255" => {
                AddressObject::subnet(name, address, mask)
            }
            Some((address, _)) => AddressObject::host(name, address),
            None => AddressObject::host(name, value),
        }
    } else if let Some(value) = entry.leaf("ip-range") {
        AddressObject {
            name,
            kind: AddressKind::Range,
            value,
            ..AddressObject::default()
        }
    } else if let Some(value) = entry.leaf("fqdn") {
        AddressObject {
            name,
            kind: AddressKind::Fqdn,
            value,
            ..AddressObject::default()
        }
    } else {
        return None;
    };
    object.description = description;
    Some(object)
}

fn security_rule(entry: &EntryView<'_>, name: String) -> SecurityPolicy {
    let zone = |tag: &str| {
        entry
            .members(tag)
            .into_iter()
            .find(|z| z != defaults::ANY)
    };
    let services = entry
        .members("service")
        .into_iter()
        .filter(|s| s != defaults::ANY && s != "application-default")
        .collect();
    let applications = entry
        .members("application")
        .into_iter()
        .filter(|a| a != defaults::ANY)
        .collect();
    SecurityPolicy {
        name: Some(name),
        action: Action::parse(&entry.leaf("action").unwrap_or_default()),
        source: entry.members("source"),
        destination: entry.members("destination"),
        service: services,
        source_zone: zone("from"),
        destination_zone: zone("to"),
        application: applications,
        description: entry.leaf("description"),
        enabled: entry.leaf("disabled").as_deref() != Some("yes"),
        log: entry.leaf("log-end").as_deref() == Some("yes"),
        ..SecurityPolicy::default()
    }
}

fn nat_rule(entry: &EntryView<'_>, name: String) -> NatRule {
    let first = |tag: &str| entry.members(tag).into_iter().next();
    let kind = if entry.has_tag("static-ip") || entry.has_tag("destination-translation") {
        NatKind::Static
    } else {
        NatKind::Dynamic
    };
    let translated = entry
        .any_leaf("translated-address")
        .or_else(|| first("translated-address"))
        .or_else(|| {
            entry
                .has_tag("interface-address")
                .then(|| "interface".to_string())
        });
    NatRule {
        kind,
        name: Some(name),
        source: first("source"),
        destination: first("destination"),
        translated,
        source_interface: first("from"),
        interface: first("to"),
        description: entry.leaf("description"),
        ..NatRule::default()
    }
}

/// Fill interface zones from zone member lists.
fn assign_zone_members(model: &mut ConfigModel) {
    for zone in &model.zones {
        for member in &zone.interfaces {
            if let Some(interface) = model.interfaces.iter_mut().find(|i| &i.name == member) {
                interface.zone = Some(zone.name.clone());
            }
        }
    }
}

/// Lines of one `<entry>` block with its own-depth lines marked.
struct EntryView<'a> {
    name: Option<String>,
    lines: &'a [&'a str],
    /// Depth of each line relative to the entry (1 = the entry's own body).
    depths: Vec<usize>,
}

impl<'a> EntryView<'a> {
    fn new(lines: &'a [&'a str]) -> Self {
        let name = lines.first().and_then(|l| entry_name(l));
        let mut depths = Vec::with_capacity(lines.len());
        let mut depth = 0usize;
        for line in lines {
            let before = depth;
            depth += opens(line);
            depth = depth.saturating_sub(closes(line));
            depths.push(before.max(depth));
        }
        Self {
            name,
            lines,
            depths,
        }
    }

    fn own(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(idx, _)| self.depths[*idx] == 1)
            .map(|(idx, line)| (idx, *line))
    }

    /// First own-depth `<tag>value</tag>`.
    fn leaf(&self, tag: &str) -> Option<String> {
        self.own().find_map(|(_, line)| leaf(line, tag))
    }

    /// First `<tag>value</tag>` at any depth.
    fn any_leaf(&self, tag: &str) -> Option<String> {
        self.lines.iter().find_map(|line| leaf(line, tag))
    }

    fn has_tag(&self, tag: &str) -> bool {
        let open = format!("<{tag}>");
        let empty = format!("<{tag}/>");
        self.lines
            .iter()
            .any(|line| line.starts_with(&open) || *line == empty)
    }

    /// Members of the own-depth `<tag>` container: inline on the same line, or
    /// the consecutive `<member>` lines that follow it.
    fn members(&self, tag: &str) -> Vec<String> {
        let open = format!("<{tag}>");
        let Some((idx, line)) = self.own().find(|(_, line)| line.starts_with(&open)) else {
            return Vec::new();
        };
        if line.contains("<member>") {
            return inline_members(line);
        }
        consecutive_members(&self.lines[idx + 1..])
    }

    /// Name of the `<entry name="..."/>` on the line after `<tag>` (or inline).
    fn entry_after(&self, tag: &str) -> Option<String> {
        let open = format!("<{tag}>");
        let (idx, line) = self
            .lines
            .iter()
            .enumerate()
            .find(|(_, line)| line.starts_with(&open))?;
        if let Some(inline) = line.strip_prefix(&open).and_then(entry_name) {
            return Some(inline);
        }
        self.lines.get(idx + 1).and_then(|next| entry_name(next))
    }

    /// Zone members: `<network>` followed by `<layer3>` (or another mode) and
    /// then the member lines.
    fn zone_members(&self) -> Vec<String> {
        let Some(idx) = self.lines.iter().position(|l| *l == "<network>") else {
            return Vec::new();
        };
        let Some(mode) = self.lines.get(idx + 1) else {
            return Vec::new();
        };
        if mode.contains("<member>") {
            return inline_members(mode);
        }
        if ["<layer3>", "<layer2>", "<virtual-wire>", "<tap>"].contains(mode) {
            return consecutive_members(&self.lines[idx + 2..]);
        }
        Vec::new()
    }

    /// Nested `<entry>` blocks directly below this one (depth 2).
    fn children(&self) -> Vec<EntryView<'a>> {
        let mut out = Vec::new();
        let mut idx = 1;
        while idx < self.lines.len() {
            let line = self.lines[idx];
            if self.depths[idx] >= 1 && entry_name(line).is_some() && !line.ends_with("/>") {
                let start = idx;
                let mut depth = 0usize;
                while idx < self.lines.len() {
                    depth += opens(self.lines[idx]);
                    depth = depth.saturating_sub(closes(self.lines[idx]));
                    if depth == 0 {
                        break;
                    }
                    idx += 1;
                }
                let end = idx.min(self.lines.len() - 1);
                out.push(EntryView::new(&self.lines[start..=end]));
            }
            idx += 1;
        }
        out
    }
}

fn opens(line: &str) -> usize {
    line.matches("<entry ")
        .count()
        .saturating_sub(usize::from(line.ends_with("/>") && line.starts_with("<entry ")))
}

fn closes(line: &str) -> usize {
    line.matches("</entry>").count()
}

/// `name` attribute of an `<entry ...>` line.
fn entry_name(line: &str) -> Option<String> {
    let rest = line.trim().strip_prefix("<entry ")?;
    let start = rest.find("name=\"")? + "name=\"".len();
    let len = rest[start..].find('"')?;
    Some(unescape(&rest[start..start + len]))
}

/// `<tag>value</tag>` on a single line.
fn leaf(line: &str, tag: &str) -> Option<String> {
    let value = line
        .strip_prefix(&format!("<{tag}>"))?
        .strip_suffix(&format!("</{tag}>"))?;
    Some(unescape(value))
}

fn inline_members(line: &str) -> Vec<String> {
    line.split("<member>")
        .skip(1)
        .filter_map(|part| part.split_once("</member>"))
        .map(|(value, _)| unescape(value))
        .collect()
}

fn consecutive_members(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .map_while(|line| leaf(line, "member"))
        .collect()
}

fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
