use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VendorId {
    #[serde(rename = "cisco-asa")]
    CiscoAsa,
    #[serde(rename = "cisco-ftd")]
    CiscoFtd,
    #[serde(rename = "fortigate")]
    Fortigate,
    #[serde(rename = "palo-alto")]
    PaloAlto,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported vendor: {0}")]
pub struct UnknownVendorId(pub String);

impl VendorId {
    pub const ALL: [VendorId; 4] = [
        VendorId::CiscoAsa,
        VendorId::CiscoFtd,
        VendorId::Fortigate,
        VendorId::PaloAlto,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VendorId::CiscoAsa => "cisco-asa",
            VendorId::CiscoFtd => "cisco-ftd",
            VendorId::Fortigate => "fortigate",
            VendorId::PaloAlto => "palo-alto",
        }
    }

    /// Product name used in generated headers.
    pub fn display_name(self) -> &'static str {
        match self {
            VendorId::CiscoAsa => "Cisco ASA",
            VendorId::CiscoFtd => "Cisco FTD",
            VendorId::Fortigate => "FortiGate",
            VendorId::PaloAlto => "Palo Alto",
        }
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorId {
    type Err = UnknownVendorId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        VendorId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownVendorId(s.to_string()))
    }
}
