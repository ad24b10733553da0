//! Cisco FTD (LINA CLI) parser.

use super::cisco::{self, Dialect};
use crate::model::ConfigModel;

pub fn parse(text: &str) -> ConfigModel {
    cisco::parse(text, Dialect::Ftd)
}

#[cfg(test)]
mod tests {
    use super::parse;

    #[test]
    fn reads_profiles_and_skips_asa_only_vpn_blocks() {
        let model = parse(
            "hostname ftd1\n\
             interface GigabitEthernet0/1\n nameif inside\n ip address 10.1.0.1 255.255.255.0\n!\n\
             class-map inspection_default\n match default-inspection-traffic\n\
             policy-map global_policy\n class inspection_default\n  inspect dns\n\
             crypto map outside_map 10 set peer 198.51.100.7\n\
             tunnel-group 198.51.100.7 type ipsec-l2l\n",
        );
        assert_eq!(model.hostname.as_deref(), Some("ftd1"));
        assert_eq!(model.interfaces.len(), 1);
        assert_eq!(model.security_profiles.len(), 2);
        assert_eq!(model.security_profiles[0].kind, "class-map");
        assert_eq!(model.security_profiles[1].lines, vec!["class inspection_default", "inspect dns"]);
        assert!(model.vpn.is_empty());
    }
}
