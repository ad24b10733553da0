use serde::Serialize;

use crate::model::ConfigModel;

/// Per-category element counts of a parsed configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub interfaces: usize,
    pub objects: usize,
    pub object_groups: usize,
    pub services: usize,
    pub policies: usize,
    pub routes: usize,
    pub users: usize,
    pub nat: usize,
    pub vpns: usize,
    pub ldap: usize,
    pub security_profiles: usize,
    pub applications: usize,
    pub url_categories: usize,
    pub zones: usize,
}

pub fn summarize(model: &ConfigModel) -> ConversionStats {
    ConversionStats {
        interfaces: model.interfaces.len(),
        objects: model.address_objects.len(),
        object_groups: model.address_groups.len(),
        services: model.services.len(),
        policies: model.policies.len(),
        routes: model.routes.len(),
        users: model.users.len(),
        nat: model.nat.len(),
        vpns: model.vpn.tunnels.len(),
        ldap: model.aaa_servers.len(),
        security_profiles: model.security_profiles.len(),
        applications: model.applications.len(),
        url_categories: model.url_categories.len(),
        zones: model.zones.len(),
    }
}

impl ConversionStats {
    /// `(category, count)` pairs in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> {
        [
            ("interfaces", self.interfaces),
            ("objects", self.objects),
            ("object_groups", self.object_groups),
            ("services", self.services),
            ("policies", self.policies),
            ("routes", self.routes),
            ("users", self.users),
            ("nat", self.nat),
            ("vpns", self.vpns),
            ("ldap", self.ldap),
            ("security_profiles", self.security_profiles),
            ("applications", self.applications),
            ("url_categories", self.url_categories),
            ("zones", self.zones),
        ]
        .into_iter()
    }

    pub fn total(&self) -> usize {
        self.iter().map(|(_, count)| count).sum()
    }
}

pub fn render(stats: &ConversionStats) -> String {
    let fields: Vec<String> = stats
        .iter()
        .map(|(category, count)| format!("{category}={count}"))
        .collect();
    format!("convert_summary {}", fields.join(" "))
}

#[cfg(test)]
mod tests {
    use super::{render, summarize, ConversionStats};
    use crate::model::{ConfigModel, Interface, VpnTunnel};

    #[test]
    fn empty_model_has_all_zero_stats() {
        let stats = summarize(&ConfigModel::default());
        assert_eq!(stats, ConversionStats::default());
        assert_eq!(stats.iter().count(), 14);
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn counts_follow_collections() {
        let mut model = ConfigModel::default();
        model.interfaces.push(Interface::new("Gi0/0"));
        model.interfaces.push(Interface::new("Gi0/1"));
        model.vpn.tunnels.push(VpnTunnel::default());
        let stats = summarize(&model);
        assert_eq!(stats.interfaces, 2);
        assert_eq!(stats.vpns, 1);
        assert!(render(&stats).starts_with("convert_summary interfaces=2 objects=0"));
    }
}
