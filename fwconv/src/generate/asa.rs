//! Cisco ASA running-config output.

use super::cisco::{self, Flavor};
use super::GenerateError;
use crate::model::ConfigModel;
use crate::vendor::VendorId;

pub fn generate(model: &ConfigModel, origin: VendorId) -> Result<String, GenerateError> {
    cisco::generate(model, origin, Flavor::Asa)
}

#[cfg(test)]
mod tests {
    use super::generate;
    use crate::model::{AaaServer, ConfigModel, DeviceSettings, Interface, User};
    use crate::vendor::VendorId;

    #[test]
    fn device_secrets_and_aaa_are_written() {
        let mut model = ConfigModel {
            hostname: Some("edge".to_string()),
            device: DeviceSettings {
                enable_password: Some("8Ry2YjIyt7RRXU24 encrypted".to_string()),
                ..DeviceSettings::default()
            },
            ..ConfigModel::default()
        };
        let mut inside = Interface::new("GigabitEthernet0/1");
        inside.description = Some("inside".to_string());
        model.interfaces.push(inside);
        model.aaa_servers.push(AaaServer {
            name: "CORP-LDAP".to_string(),
            protocol: "ldap".to_string(),
            host: Some("10.0.0.20".to_string()),
            port: "389".to_string(),
            base_dn: Some("dc=corp,dc=example".to_string()),
            ..AaaServer::default()
        });
        model.users.push(User {
            username: "admin".to_string(),
            secret: Some("ENC AbCd".to_string()),
            privilege: 15,
            role: None,
        });

        let text = generate(&model, VendorId::Fortigate).unwrap();
        assert!(text.contains("hostname edge\nenable password 8Ry2YjIyt7RRXU24 encrypted\n"));
        assert!(text.contains(" nameif inside\n security-level 100\n no ip address\n"));
        assert!(text.contains(
            "aaa-server CORP-LDAP (inside) host 10.0.0.20\n server-port 389\n ldap-base-dn dc=corp,dc=example\n"
        ));
        assert!(text.contains("username admin nopassword privilege 15\n"));
    }
}
