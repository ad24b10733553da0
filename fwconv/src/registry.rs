//! Vendor catalogue and directed support matrix.
//!
//! The built-in registry is read from the embedded `mappings/matrix.toml`
//! (falling back to a code table when that file is empty or unparsable) and
//! initialized once per process. [`load_registry`] builds an alternative one
//! from a TOML file with the same layout.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generate::{self, GenerateError};
use crate::model::ConfigModel;
use crate::parse;
use crate::vendor::VendorId;

/// Text → IR. Never fails.
pub type ParseFn = fn(&str) -> ConfigModel;
/// IR + origin vendor → text.
pub type GenerateFn = fn(&ConfigModel, VendorId) -> Result<String, GenerateError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorInfo {
    pub id: VendorId,
    pub name: String,
    pub description: String,
    pub extensions: Vec<String>,
}

#[derive(Clone)]
pub struct VendorEntry {
    pub info: VendorInfo,
    pub parser: ParseFn,
    pub generator: GenerateFn,
}

impl fmt::Debug for VendorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorEntry")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatrixCell {
    pub supported: bool,
    pub complexity: Complexity,
}

/// One row of [`Registry::conversion_options`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionOption {
    pub id: VendorId,
    pub name: String,
    pub description: String,
    pub extensions: Vec<String>,
    pub supported: bool,
    pub complexity: Complexity,
}

#[derive(Debug, Clone)]
pub struct Registry {
    vendors: Vec<VendorEntry>,
    matrix: BTreeMap<(VendorId, VendorId), MatrixCell>,
}

#[derive(Debug, Error)]
pub enum MatrixLoadError {
    #[error("failed to read conversion matrix {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse conversion matrix {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize)]
struct MatrixFile {
    #[serde(default)]
    vendor: Vec<VendorRow>,
    #[serde(default)]
    conversion: Vec<ConversionRow>,
}

#[derive(Debug, Deserialize)]
struct VendorRow {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    extensions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ConversionRow {
    source: String,
    target: String,
    #[serde(default = "default_supported")]
    supported: bool,
    #[serde(default)]
    complexity: Complexity,
}

fn default_supported() -> bool {
    true
}

/// Process-wide registry built from the embedded matrix.
pub fn builtin() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(default_registry)
}

pub fn load_registry(path: &Path) -> Result<Registry, MatrixLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| MatrixLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_registry(&raw, path.display().to_string())
}

pub fn default_registry() -> Registry {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/mappings/matrix.toml"));
    match parse_registry(embedded, "embedded conversion matrix".to_string()) {
        Ok(registry) if !registry.matrix.is_empty() => registry,
        Ok(_) => {
            tracing::warn!("embedded conversion matrix is empty; using built-in table");
            fallback_registry()
        }
        Err(err) => {
            tracing::warn!("{err}; using built-in table");
            fallback_registry()
        }
    }
}

fn parse_registry(raw: &str, path: String) -> Result<Registry, MatrixLoadError> {
    let parsed: MatrixFile =
        toml::from_str(raw).map_err(|source| MatrixLoadError::Parse { path, source })?;

    let mut vendors = Vec::new();
    for row in parsed.vendor {
        let Ok(id) = row.id.parse::<VendorId>() else {
            tracing::warn!(vendor = %row.id, "ignoring vendor without a parser");
            continue;
        };
        if vendors.iter().any(|v: &VendorEntry| v.info.id == id) {
            continue;
        }
        vendors.push(entry(VendorInfo {
            id,
            name: row.name,
            description: row.description,
            extensions: row.extensions,
        }));
    }
    if vendors.is_empty() {
        vendors = fallback_vendors();
    }

    let mut matrix = BTreeMap::new();
    for row in parsed.conversion {
        let (Ok(source), Ok(target)) = (row.source.parse(), row.target.parse()) else {
            tracing::warn!(
                source = %row.source,
                target = %row.target,
                "ignoring conversion with unknown vendor"
            );
            continue;
        };
        matrix.insert(
            (source, target),
            MatrixCell {
                supported: row.supported,
                complexity: row.complexity,
            },
        );
    }

    Ok(Registry { vendors, matrix })
}

fn entry(info: VendorInfo) -> VendorEntry {
    let (parser, generator): (ParseFn, GenerateFn) = match info.id {
        VendorId::CiscoAsa => (parse::asa::parse, generate::asa::generate),
        VendorId::CiscoFtd => (parse::ftd::parse, generate::ftd::generate),
        VendorId::Fortigate => (parse::fortigate::parse, generate::fortigate::generate),
        VendorId::PaloAlto => (parse::paloalto::parse, generate::paloalto::generate),
    };
    VendorEntry {
        info,
        parser,
        generator,
    }
}

fn info(id: VendorId, name: &str, description: &str, extensions: &[&str]) -> VendorInfo {
    VendorInfo {
        id,
        name: name.to_string(),
        description: description.to_string(),
        extensions: extensions.iter().map(|e| e.to_string()).collect(),
    }
}

fn fallback_vendors() -> Vec<VendorEntry> {
    vec![
        entry(info(
            VendorId::CiscoAsa,
            "Cisco ASA",
            "Cisco Adaptive Security Appliance",
            &[".txt", ".cfg"],
        )),
        entry(info(
            VendorId::CiscoFtd,
            "Cisco FTD",
            "Cisco Firepower Threat Defense",
            &[".txt", ".cfg"],
        )),
        entry(info(
            VendorId::Fortigate,
            "FortiGate",
            "FortiGate Next-Generation Firewall",
            &[".conf", ".txt", ".cfg"],
        )),
        entry(info(
            VendorId::PaloAlto,
            "Palo Alto",
            "Palo Alto Networks PAN-OS",
            &[".xml", ".txt"],
        )),
    ]
}

fn fallback_registry() -> Registry {
    use Complexity::{High, Medium};
    use VendorId::{CiscoAsa, CiscoFtd, Fortigate, PaloAlto};

    let pairs = [
        (CiscoAsa, CiscoFtd, Medium),
        (CiscoAsa, Fortigate, High),
        (CiscoAsa, PaloAlto, High),
        (CiscoFtd, CiscoAsa, Medium),
        (CiscoFtd, Fortigate, High),
        (CiscoFtd, PaloAlto, High),
        (Fortigate, CiscoAsa, High),
        (Fortigate, CiscoFtd, High),
        (Fortigate, PaloAlto, High),
        (PaloAlto, CiscoAsa, High),
        (PaloAlto, CiscoFtd, High),
        (PaloAlto, Fortigate, High),
    ];
    let matrix = pairs
        .into_iter()
        .map(|(source, target, complexity)| {
            (
                (source, target),
                MatrixCell {
                    supported: true,
                    complexity,
                },
            )
        })
        .collect();

    Registry {
        vendors: fallback_vendors(),
        matrix,
    }
}

impl Registry {
    /// Entry for a vendor id string, `None` when the id is unknown or not
    /// catalogued.
    pub fn vendor(&self, id: &str) -> Option<&VendorEntry> {
        let id: VendorId = id.parse().ok()?;
        self.vendors.iter().find(|v| v.info.id == id)
    }

    pub fn vendors(&self) -> &[VendorEntry] {
        &self.vendors
    }

    pub fn supported_vendors(&self) -> Vec<VendorInfo> {
        self.vendors.iter().map(|v| v.info.clone()).collect()
    }

    /// Complexity of a supported pair; `None` when the pair is absent or
    /// marked unsupported.
    pub fn conversion(&self, source: VendorId, target: VendorId) -> Option<Complexity> {
        self.matrix
            .get(&(source, target))
            .filter(|cell| cell.supported)
            .map(|cell| cell.complexity)
    }

    /// Every catalogued target listed for `source`, in vendor order. Unknown
    /// sources yield an empty list.
    pub fn conversion_options(&self, source: &str) -> Vec<ConversionOption> {
        let Some(source) = self.vendor(source) else {
            return Vec::new();
        };
        self.vendors
            .iter()
            .filter_map(|target| {
                let cell = self.matrix.get(&(source.info.id, target.info.id))?;
                Some(ConversionOption {
                    id: target.info.id,
                    name: target.info.name.clone(),
                    description: target.info.description.clone(),
                    extensions: target.info.extensions.clone(),
                    supported: cell.supported,
                    complexity: cell.complexity,
                })
            })
            .collect()
    }

    /// All `(source, target)` pairs currently supported.
    pub fn supported_pairs(&self) -> Vec<(VendorId, VendorId, Complexity)> {
        self.matrix
            .iter()
            .filter(|(_, cell)| cell.supported)
            .map(|((source, target), cell)| (*source, *target, cell.complexity))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{builtin, fallback_registry, load_registry, Complexity, MatrixLoadError};
    use crate::vendor::VendorId;

    #[test]
    fn builtin_matrix_matches_fallback_table() {
        let embedded = builtin();
        let fallback = fallback_registry();
        assert_eq!(embedded.supported_pairs(), fallback.supported_pairs());
        assert_eq!(embedded.supported_pairs().len(), 12);
        assert_eq!(embedded.supported_vendors(), fallback.supported_vendors());
    }

    #[test]
    fn self_pairs_are_absent_by_default() {
        for id in VendorId::ALL {
            assert_eq!(builtin().conversion(id, id), None);
        }
    }

    #[test]
    fn cisco_pairs_are_medium_others_high() {
        let registry = builtin();
        assert_eq!(
            registry.conversion(VendorId::CiscoAsa, VendorId::CiscoFtd),
            Some(Complexity::Medium)
        );
        assert_eq!(
            registry.conversion(VendorId::Fortigate, VendorId::PaloAlto),
            Some(Complexity::High)
        );
    }

    #[test]
    fn conversion_options_list_targets_for_source() {
        let options = builtin().conversion_options("cisco-asa");
        let ids: Vec<_> = options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["cisco-ftd", "fortigate", "palo-alto"]);
        assert!(options.iter().all(|o| o.supported));
        assert!(builtin().conversion_options("sonicwall").is_empty());
    }

    #[test]
    fn loads_matrix_from_toml_with_self_pair() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("matrix.toml");
        fs::write(
            &path,
            r#"
[[conversion]]
source = "fortigate"
target = "fortigate"
complexity = "low"

[[conversion]]
source = "fortigate"
target = "palo-alto"
supported = false

[[conversion]]
source = "fortigate"
target = "sonicwall"
"#,
        )
        .expect("write matrix");

        let registry = load_registry(&path).expect("load matrix");
        assert_eq!(
            registry.conversion(VendorId::Fortigate, VendorId::Fortigate),
            Some(Complexity::Low)
        );
        assert_eq!(
            registry.conversion(VendorId::Fortigate, VendorId::PaloAlto),
            None
        );
        assert_eq!(registry.vendors().len(), 4);
        let options = registry.conversion_options("fortigate");
        assert_eq!(options.len(), 2);
        assert!(!options[1].supported);
    }

    #[test]
    fn reports_missing_and_malformed_files() {
        let dir = tempdir().expect("tempdir");
        let missing = load_registry(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, MatrixLoadError::Io { .. }));

        let path = dir.path().join("bad.toml");
        fs::write(&path, "[[conversion]\nsource = ").expect("write");
        let bad = load_registry(&path).unwrap_err();
        assert!(matches!(bad, MatrixLoadError::Parse { .. }));
        assert!(bad.to_string().starts_with("failed to parse conversion matrix"));
    }
}
