use serde::Serialize;

/// All VPN artifacts. Fields unused by a dialect stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VpnConfig {
    pub tunnels: Vec<VpnTunnel>,
    pub ike_policies: Vec<IkePolicy>,
    pub transform_sets: Vec<TransformSet>,
    pub phase2: Vec<Phase2Selector>,
    pub group_policies: Vec<GroupPolicy>,
    pub tunnel_groups: Vec<TunnelGroup>,
}

impl VpnConfig {
    pub fn is_empty(&self) -> bool {
        self.tunnels.is_empty()
            && self.ike_policies.is_empty()
            && self.transform_sets.is_empty()
            && self.phase2.is_empty()
            && self.group_policies.is_empty()
            && self.tunnel_groups.is_empty()
    }

    /// Tunnel with `name`, created at the end if missing.
    pub(crate) fn tunnel_mut(&mut self, name: &str, sequence: Option<u32>) -> &mut VpnTunnel {
        let idx = match self
            .tunnels
            .iter()
            .position(|t| t.name == name && t.sequence == sequence)
        {
            Some(idx) => idx,
            None => {
                self.tunnels.push(VpnTunnel {
                    name: name.to_string(),
                    sequence,
                    ..VpnTunnel::default()
                });
                self.tunnels.len() - 1
            }
        };
        &mut self.tunnels[idx]
    }

    pub(crate) fn group_policy_mut(&mut self, name: &str) -> &mut GroupPolicy {
        let idx = match self.group_policies.iter().position(|g| g.name == name) {
            Some(idx) => idx,
            None => {
                self.group_policies.push(GroupPolicy {
                    name: name.to_string(),
                    ..GroupPolicy::default()
                });
                self.group_policies.len() - 1
            }
        };
        &mut self.group_policies[idx]
    }

    pub(crate) fn tunnel_group_mut(&mut self, name: &str) -> &mut TunnelGroup {
        let idx = match self.tunnel_groups.iter().position(|g| g.name == name) {
            Some(idx) => idx,
            None => {
                self.tunnel_groups.push(TunnelGroup {
                    name: name.to_string(),
                    ..TunnelGroup::default()
                });
                self.tunnel_groups.len() - 1
            }
        };
        &mut self.tunnel_groups[idx]
    }
}

/// A site-to-site tunnel: Cisco crypto map entry, FortiGate phase1-interface,
/// PAN-OS IKE gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VpnTunnel {
    pub name: String,
    pub sequence: Option<u32>,
    pub interface: Option<String>,
    pub peer: Option<String>,
    /// Transform-set or proposal name(s).
    pub proposal: Option<String>,
    pub pre_shared_key: Option<String>,
    /// Cisco `match address` ACL.
    pub acl: Option<String>,
    pub description: Option<String>,
}

/// IKE phase-1 policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IkePolicy {
    pub priority: String,
    pub authentication: String,
    pub encryption: String,
    pub hash: String,
    pub group: String,
    pub lifetime: String,
}

/// IPsec phase-2 transform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformSet {
    pub name: String,
    pub protocol: String,
    pub encryption: String,
    pub hash: String,
}

/// FortiGate phase2-interface / PAN-OS IPsec tunnel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Phase2Selector {
    pub name: String,
    pub phase1_name: String,
    pub proposal: Option<String>,
    pub src_subnet: Option<String>,
    pub dst_subnet: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupPolicy {
    pub name: String,
    pub kind: Option<String>,
    pub vpn_protocols: Option<String>,
    pub dns_server: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TunnelGroup {
    pub name: String,
    pub kind: Option<String>,
    pub default_group_policy: Option<String>,
    pub pre_shared_key: Option<String>,
}
