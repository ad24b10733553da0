//! Cisco ASA running-config parser.

use super::cisco::{self, Dialect};
use crate::model::ConfigModel;

pub fn parse(text: &str) -> ConfigModel {
    cisco::parse(text, Dialect::Asa)
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::model::{Action, NatKind};

    const SAMPLE: &str = "\
hostname edge-asa
domain-name example.com
enable password 8Ry2YjIyt7RRXU24 encrypted
passwd 2KFQnbNIdI.2KYOU encrypted
!
interface GigabitEthernet0/0
 nameif outside
 security-level 0
 ip address 203.0.113.2 255.255.255.0
!
interface GigabitEthernet0/1
 description LAN uplink
 nameif inside
 security-level 100
 ip address 10.0.0.1 255.255.255.0
!
object network web-server
 host 10.0.0.10
 description Public web
 nat (inside,outside) static 203.0.113.10
object network lan
 subnet 10.0.0.0 255.255.255.0
 nat (inside,outside) dynamic interface
!
object-group network web-farm
 network-object object web-server
 network-object host 10.0.0.11
 network-object 10.0.1.0 255.255.255.0
!
access-list outside_access_in remark Allow HTTPS to web farm
access-list outside_access_in extended permit tcp any object-group web-farm eq https
access-list outside_access_in extended deny ip any any log
access-group outside_access_in in interface outside
route outside 0.0.0.0 0.0.0.0 203.0.113.1 1
crypto ikev1 policy 10
 authentication pre-share
 encryption aes-256
 hash sha
 group 14
 lifetime 28800
crypto ipsec ikev1 transform-set TS-AES esp-aes-256 esp-sha-hmac
crypto map outside_map 10 match address vpn-acl
crypto map outside_map 10 set peer 198.51.100.7
crypto map outside_map 10 set ikev1 transform-set TS-AES
crypto map outside_map interface outside
tunnel-group 198.51.100.7 type ipsec-l2l
tunnel-group 198.51.100.7 ipsec-attributes
 ikev1 pre-shared-key s3cret
group-policy GP-REMOTE internal
group-policy GP-REMOTE attributes
 vpn-tunnel-protocol ikev1
 dns-server value 10.0.0.53
aaa-server CORP-LDAP protocol ldap
aaa-server CORP-LDAP (inside) host 10.0.0.20
 ldap-base-dn dc=example,dc=com
 server-port 636
username admin password Xyz123 encrypted privilege 15
username auditor password Abc987 encrypted privilege 5
logging enable
logging trap warnings
logging host inside 10.0.0.50
snmp-server host inside 10.0.0.60 community monitor version 2c
ssh 10.0.0.0 255.255.255.0 inside
ssh timeout 30
http server enable
clock timezone EST -5
";

    #[test]
    fn parses_full_asa_sample() {
        let model = parse(SAMPLE);
        assert_eq!(model.hostname.as_deref(), Some("edge-asa"));
        assert_eq!(model.device.domain.as_deref(), Some("example.com"));
        assert_eq!(
            model.device.enable_password.as_deref(),
            Some("8Ry2YjIyt7RRXU24")
        );
        assert_eq!(model.interfaces.len(), 2);
        let inside = &model.interfaces[1];
        assert_eq!(inside.description.as_deref(), Some("inside"));
        assert_eq!(inside.comment.as_deref(), Some("LAN uplink"));
        assert_eq!(inside.security_level, Some(100));

        assert_eq!(model.address_objects.len(), 2);
        assert_eq!(model.address_objects[0].description.as_deref(), Some("Public web"));
        assert_eq!(model.address_groups[0].members, vec!["web-server", "10.0.0.11", "10.0.1.0/24"]);

        assert_eq!(model.policies.len(), 2);
        let first = &model.policies[0];
        assert_eq!(first.action, Action::Permit);
        assert_eq!(first.destination, vec!["web-farm"]);
        assert_eq!(first.service, vec!["tcp/443"]);
        assert_eq!(first.description.as_deref(), Some("Allow HTTPS to web farm"));
        assert_eq!(first.source_zone.as_deref(), Some("outside"));
        assert!(model.policies[1].log);
        assert_eq!(model.policies[1].id, Some(2));

        assert_eq!(model.nat.len(), 2);
        assert_eq!(model.nat[0].kind, NatKind::Static);
        assert_eq!(model.nat[0].source.as_deref(), Some("web-server"));
        assert_eq!(model.nat[1].translated.as_deref(), Some("interface"));

        assert_eq!(model.routes.len(), 1);
        assert_eq!(model.routes[0].interface.as_deref(), Some("outside"));
        assert_eq!(model.routes[0].distance, Some(1));

        let ike = &model.vpn.ike_policies[0];
        assert_eq!((ike.encryption.as_str(), ike.group.as_str()), ("aes-256", "14"));
        let ts = &model.vpn.transform_sets[0];
        assert_eq!((ts.encryption.as_str(), ts.hash.as_str()), ("aes-256", "sha"));
        let tunnel = &model.vpn.tunnels[0];
        assert_eq!(tunnel.peer.as_deref(), Some("198.51.100.7"));
        assert_eq!(tunnel.interface.as_deref(), Some("outside"));
        assert_eq!(tunnel.acl.as_deref(), Some("vpn-acl"));
        assert_eq!(tunnel.pre_shared_key.as_deref(), Some("s3cret"));
        assert_eq!(model.vpn.group_policies[0].dns_server.as_deref(), Some("10.0.0.53"));

        let ldap = &model.aaa_servers[0];
        assert_eq!(ldap.host.as_deref(), Some("10.0.0.20"));
        assert_eq!(ldap.port, "636");
        assert_eq!(ldap.base_dn.as_deref(), Some("dc=example,dc=com"));

        assert_eq!(model.users.len(), 2);
        assert_eq!(model.users[1].privilege, 5);
        assert_eq!(model.system.logging.len(), 3);
        assert_eq!(model.system.snmp[0].community, "monitor");
        assert_eq!(model.system.ssh.len(), 2);
        assert_eq!(model.system.clock[0].value, "EST -5");
    }

    #[test]
    fn legacy_nat_global_static_and_route_layouts() {
        let model = parse(
            "nat (inside) 1 10.0.0.0 255.255.255.0\n\
             global (outside) 1 interface\n\
             static (inside,outside) 203.0.113.5 10.0.0.5 netmask 255.255.255.255\n\
             route 10.2.0.0 255.255.0.0 10.0.0.254 inside\n",
        );
        let kinds: Vec<_> = model.nat.iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NatKind::Dynamic, NatKind::Global, NatKind::Static]);
        assert_eq!(model.nat[0].source.as_deref(), Some("10.0.0.0/24"));
        assert_eq!(model.nat[1].nat_id.as_deref(), Some("1"));
        assert_eq!(model.nat[2].translated.as_deref(), Some("203.0.113.5"));
        assert_eq!(model.routes[0].gateway.as_deref(), Some("10.0.0.254"));
        assert_eq!(model.routes[0].interface.as_deref(), Some("inside"));
    }

    #[test]
    fn ftd_only_blocks_are_ignored() {
        let model = parse("class-map inspection_default\n match default-inspection-traffic\n");
        assert!(model.security_profiles.is_empty());
    }
}
