//! Cisco FTD (LINA) output. VPN and AAA realms are left as comments since the
//! management center owns them.

use super::cisco::{self, Flavor};
use super::GenerateError;
use crate::model::ConfigModel;
use crate::vendor::VendorId;

pub fn generate(model: &ConfigModel, origin: VendorId) -> Result<String, GenerateError> {
    cisco::generate(model, origin, Flavor::Ftd)
}

#[cfg(test)]
mod tests {
    use super::generate;
    use crate::model::{AaaServer, ConfigModel, DeviceSettings, SecurityProfile};
    use crate::vendor::VendorId;

    #[test]
    fn profiles_pass_and_device_secrets_stay_out() {
        let model = ConfigModel {
            device: DeviceSettings {
                enable_password: Some("secret".to_string()),
                ..DeviceSettings::default()
            },
            aaa_servers: vec![AaaServer {
                name: "LDAP".to_string(),
                protocol: "ldap".to_string(),
                port: "389".to_string(),
                ..AaaServer::default()
            }],
            security_profiles: vec![SecurityProfile {
                name: "inspection_default".to_string(),
                kind: "class-map".to_string(),
                lines: vec!["match default-inspection-traffic".to_string()],
            }],
            ..ConfigModel::default()
        };
        let text = generate(&model, VendorId::CiscoAsa).unwrap();
        assert!(text.starts_with("! Cisco FTD Configuration\n! Generated from Cisco ASA configuration\n"));
        assert!(text.contains("hostname ftd-converted\n"));
        assert!(!text.contains("enable password"));
        assert!(!text.contains("aaa-server"));
        assert!(text.contains("! not converted: AAA server LDAP (ldap) is managed by FMC\n"));
        assert!(text.contains("class-map inspection_default\n match default-inspection-traffic\n!\n"));
    }
}
