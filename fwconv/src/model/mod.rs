//! Vendor-neutral configuration model.
//!
//! A [`ConfigModel`] is built by one parser for one conversion and handed to
//! one generator. All collections keep source order.

pub mod defaults;
mod network;
mod objects;
mod policy;
mod system;
mod vpn;

use serde::Serialize;

pub use network::{Interface, Route, Zone};
pub use objects::{AddressGroup, AddressKind, AddressObject, Endpoint, ServiceObject, ServiceRef};
pub(crate) use objects::is_ipv4;
pub use policy::{
    AccessGroup, Action, Application, NatKind, NatRule, SecurityPolicy, SecurityProfile,
    UrlCategory,
};
pub use system::{
    AaaServer, AccessSetting, ClockSetting, DeviceSettings, LogSetting, SnmpSetting,
    SystemServices, User,
};
pub use vpn::{GroupPolicy, IkePolicy, Phase2Selector, TransformSet, TunnelGroup, VpnConfig, VpnTunnel};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigModel {
    pub hostname: Option<String>,
    pub device: DeviceSettings,
    pub interfaces: Vec<Interface>,
    pub address_objects: Vec<AddressObject>,
    pub address_groups: Vec<AddressGroup>,
    pub services: Vec<ServiceObject>,
    pub policies: Vec<SecurityPolicy>,
    pub access_groups: Vec<AccessGroup>,
    pub nat: Vec<NatRule>,
    pub routes: Vec<Route>,
    pub vpn: VpnConfig,
    pub users: Vec<User>,
    pub aaa_servers: Vec<AaaServer>,
    pub system: SystemServices,
    pub security_profiles: Vec<SecurityProfile>,
    pub applications: Vec<Application>,
    pub url_categories: Vec<UrlCategory>,
    pub zones: Vec<Zone>,
}

impl ConfigModel {
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Interface whose `description` (nameif / alias) is `alias`.
    pub fn interface_by_alias(&self, alias: &str) -> Option<&Interface> {
        self.interfaces
            .iter()
            .find(|i| i.description.as_deref() == Some(alias))
    }

    pub fn address_object(&self, name: &str) -> Option<&AddressObject> {
        self.address_objects.iter().find(|o| o.name == name)
    }

    pub fn address_group(&self, name: &str) -> Option<&AddressGroup> {
        self.address_groups.iter().find(|g| g.name == name)
    }

    /// True when `name` is a declared address object, address group or service.
    pub fn declares(&self, name: &str) -> bool {
        self.address_object(name).is_some()
            || self.address_group(name).is_some()
            || self.services.iter().any(|s| s.name == name)
    }

    /// Insert or replace by interface name, keeping first-seen position.
    pub(crate) fn upsert_interface(&mut self, interface: Interface) {
        match self.interfaces.iter_mut().find(|i| i.name == interface.name) {
            Some(existing) => *existing = interface,
            None => self.interfaces.push(interface),
        }
    }

    /// Insert or replace by object name, keeping first-seen position.
    pub(crate) fn upsert_address_object(&mut self, object: AddressObject) {
        match self
            .address_objects
            .iter_mut()
            .find(|o| o.name == object.name)
        {
            Some(existing) => *existing = object,
            None => self.address_objects.push(object),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AddressObject, ConfigModel, Interface};

    #[test]
    fn upserts_keep_names_unique() {
        let mut model = ConfigModel::default();
        model.upsert_interface(Interface::new("Gi0/0"));
        model.upsert_interface(Interface::new("Gi0/1"));
        let mut replaced = Interface::new("Gi0/0");
        replaced.ip = Some("10.0.0.1".to_string());
        model.upsert_interface(replaced);
        assert_eq!(model.interfaces.len(), 2);
        assert_eq!(model.interfaces[0].ip.as_deref(), Some("10.0.0.1"));

        model.upsert_address_object(AddressObject::host("web", "10.1.1.1"));
        model.upsert_address_object(AddressObject::host("web", "10.1.1.2"));
        assert_eq!(model.address_objects.len(), 1);
        assert!(model.declares("web"));
        assert!(!model.declares("db"));
    }
}
