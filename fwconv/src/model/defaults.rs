//! Values substituted when a field is missing from the source text.
//!
//! Parsers never fail on sparse input; each field they cannot find takes the
//! value listed here (or stays empty / `None` when no constant applies).

/// Hostname written by the ASA generator when the IR has none.
pub const ASA_HOSTNAME: &str = "asa-converted";
/// Hostname written by the FTD generator when the IR has none.
pub const FTD_HOSTNAME: &str = "ftd-converted";
/// Hostname written by the FortiGate generator when the IR has none.
pub const FORTIGATE_HOSTNAME: &str = "fortigate-converted";
/// Hostname written by the PAN-OS generator when the IR has none.
pub const PALO_ALTO_HOSTNAME: &str = "palo-alto-converted";

/// Privilege assigned to a local user without an explicit level.
pub const USER_PRIVILEGE: u8 = 15;
/// Privilege assigned to FortiGate/PAN-OS admins that are not super users.
pub const READ_ONLY_PRIVILEGE: u8 = 1;

/// Logging level when a logging directive names none.
pub const LOG_LEVEL: &str = "informational";
/// SNMP community when none is given.
pub const SNMP_COMMUNITY: &str = "public";
/// SNMP version when none is given.
pub const SNMP_VERSION: &str = "2c";

/// AAA server protocol when none is given.
pub const AAA_PROTOCOL: &str = "ldap";
/// AAA server port when none is given.
pub const AAA_PORT: &str = "389";

/// IKE phase-1 policy defaults.
pub const IKE_ENCRYPTION: &str = "aes";
pub const IKE_HASH: &str = "sha";
pub const IKE_DH_GROUP: &str = "2";
pub const IKE_LIFETIME: &str = "86400";
pub const IKE_AUTHENTICATION: &str = "pre-share";

/// IPsec transform-set defaults.
pub const TRANSFORM_PROTOCOL: &str = "esp";
pub const TRANSFORM_ENCRYPTION: &str = "aes";
pub const TRANSFORM_HASH: &str = "sha";

/// FortiGate phase-1 egress interface when none is set.
pub const PHASE1_INTERFACE: &str = "wan1";
/// FortiGate proposal when none is set.
pub const PROPOSAL: &str = "aes128-sha256";
/// FortiGate phase-2 selector when none is set.
pub const PHASE2_SELECTOR: &str = "0.0.0.0/0.0.0.0";

/// Zone given to FortiGate interfaces.
pub const FORTIGATE_ZONE: &str = "untrust";

/// Fallback zone set used by the PAN-OS generator.
pub const FALLBACK_ZONES: [&str; 3] = ["trust", "untrust", "dmz"];

/// Endpoint / service text meaning "anything".
pub const ANY: &str = "any";

/// ACL name used for Cisco output when a rule has neither zone nor name.
pub const GLOBAL_ACL: &str = "global_access";
/// Crypto map name used for Cisco output when a tunnel has none.
pub const CRYPTO_MAP: &str = "outside_map";

/// Cisco egress interface for routes, NAT and crypto maps that name none.
pub const EGRESS_INTERFACE: &str = "outside";
/// Cisco interface for management hosts (syslog, SNMP, AAA) that name none.
pub const MANAGEMENT_INTERFACE: &str = "inside";
/// Transform set written when a tunnel has no usable proposal.
pub const TRANSFORM_SET: &str = "ESP-AES-SHA";
/// IKE policy priority written when the IR has tunnels but no IKE policy.
pub const IKE_PRIORITY: &str = "10";
/// PAN-OS virtual router that carries static routes.
pub const VIRTUAL_ROUTER: &str = "default";
