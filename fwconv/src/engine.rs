//! Conversion orchestration.
//!
//! [`convert`] resolves both vendor ids against the registry, checks the pair
//! against the support matrix, parses the source text into a fresh
//! [`ConfigModel`], optionally enforces group references, generates the target
//! text and counts every IR category. Nothing is shared between calls except
//! the read-only registry.

use serde::Serialize;
use thiserror::Error;

use crate::generate::GenerateError;
use crate::model::ConfigModel;
use crate::references::group_member_findings;
use crate::registry::{self, Complexity, Registry, VendorEntry};
use crate::stats::{summarize, ConversionStats};
use crate::vendor::VendorId;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unsupported vendor: {0}")]
    UnknownVendor(String),
    #[error("conversion from {from} to {to} is not supported")]
    UnsupportedConversion { from: VendorId, to: VendorId },
    #[error("generation failed: {0}")]
    Generation(#[from] GenerateError),
    #[error("{count} unresolved address group reference(s), first: {first}")]
    UnresolvedReferences { count: usize, first: String },
}

/// A failed conversion with whatever vendor names could be resolved.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ConversionFailure {
    #[source]
    pub error: ConvertError,
    pub source_vendor_name: Option<String>,
    pub target_vendor_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Fail when an address group names something that is neither a literal
    /// nor a declared object or group.
    pub strict_references: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub source: VendorId,
    pub target: VendorId,
    pub source_vendor_name: String,
    pub target_vendor_name: String,
    pub complexity: Complexity,
    pub stats: ConversionStats,
    pub model: ConfigModel,
    pub output: String,
}

pub type ConversionResult = Result<Conversion, ConversionFailure>;

/// Convert with the built-in registry and default options.
pub fn convert(text: &str, source: &str, target: &str) -> ConversionResult {
    convert_with(registry::builtin(), text, source, target, ConvertOptions::default())
}

pub fn convert_with(
    registry: &Registry,
    text: &str,
    source: &str,
    target: &str,
    options: ConvertOptions,
) -> ConversionResult {
    let source_entry = registry.vendor(source);
    let target_entry = registry.vendor(target);
    let fail = |error: ConvertError| ConversionFailure {
        error,
        source_vendor_name: source_entry.map(|e| e.info.name.clone()),
        target_vendor_name: target_entry.map(|e| e.info.name.clone()),
    };

    let Some(source_entry) = source_entry else {
        return Err(fail(ConvertError::UnknownVendor(source.to_string())));
    };
    let Some(target_entry) = target_entry else {
        return Err(fail(ConvertError::UnknownVendor(target.to_string())));
    };
    let (source_id, target_id) = (source_entry.info.id, target_entry.info.id);
    let Some(complexity) = registry.conversion(source_id, target_id) else {
        return Err(fail(ConvertError::UnsupportedConversion {
            from: source_id,
            to: target_id,
        }));
    };

    tracing::debug!(source = %source_id, target = %target_id, "dispatching conversion");
    let model = (source_entry.parser)(text);

    if options.strict_references {
        let findings = group_member_findings(&model);
        if let Some(first) = findings.first() {
            return Err(fail(ConvertError::UnresolvedReferences {
                count: findings.len(),
                first: first.message.clone(),
            }));
        }
    }

    let output = (target_entry.generator)(&model, source_id)
        .map_err(|err| fail(ConvertError::from(err)))?;
    let stats = summarize(&model);
    tracing::debug!(
        source = %source_id,
        target = %target_id,
        total = stats.total(),
        bytes = output.len(),
        "conversion complete"
    );

    Ok(Conversion {
        source: source_id,
        target: target_id,
        source_vendor_name: source_entry.info.name.clone(),
        target_vendor_name: target_entry.info.name.clone(),
        complexity,
        stats,
        model,
        output,
    })
}

/// Parse only: the IR a source vendor's parser builds from `text`.
pub fn parse_with<'a>(
    registry: &'a Registry,
    text: &str,
    source: &str,
) -> Result<(&'a VendorEntry, ConfigModel), ConvertError> {
    let entry = registry
        .vendor(source)
        .ok_or_else(|| ConvertError::UnknownVendor(source.to_string()))?;
    Ok((entry, (entry.parser)(text)))
}

#[cfg(test)]
mod tests {
    use super::{convert, convert_with, parse_with, ConvertError, ConvertOptions};
    use crate::registry::{builtin, Complexity};
    use crate::stats::ConversionStats;
    use crate::vendor::VendorId;

    const ASA: &str = "hostname fw1\ninterface Gi0/1\n nameif inside\n ip address 10.0.0.1 255.255.255.0\n security-level 100\n!";

    #[test]
    fn asa_to_fortigate_carries_stats_and_names() {
        let conversion = convert(ASA, "cisco-asa", "fortigate").unwrap();
        assert_eq!(conversion.source_vendor_name, "Cisco ASA");
        assert_eq!(conversion.target_vendor_name, "FortiGate");
        assert_eq!(conversion.complexity, Complexity::High);
        assert_eq!(conversion.stats.interfaces, 1);
        assert_eq!(conversion.model.hostname.as_deref(), Some("fw1"));
        assert!(conversion.output.contains("edit \"Gi0/1\""));
    }

    #[test]
    fn unknown_vendor_fails_with_resolved_names() {
        let failure = convert(ASA, "cisco-asa", "checkpoint").unwrap_err();
        assert!(matches!(failure.error, ConvertError::UnknownVendor(ref id) if id == "checkpoint"));
        assert_eq!(failure.to_string(), "unsupported vendor: checkpoint");
        assert_eq!(failure.source_vendor_name.as_deref(), Some("Cisco ASA"));
        assert_eq!(failure.target_vendor_name, None);
    }

    #[test]
    fn self_pair_is_unsupported() {
        let failure = convert("", "fortigate", "fortigate").unwrap_err();
        assert_eq!(
            failure.to_string(),
            "conversion from fortigate to fortigate is not supported"
        );
        assert!(matches!(
            failure.error,
            ConvertError::UnsupportedConversion {
                from: VendorId::Fortigate,
                to: VendorId::Fortigate
            }
        ));
    }

    #[test]
    fn empty_input_converts_with_zero_stats() {
        let conversion = convert("", "palo-alto", "cisco-ftd").unwrap();
        assert_eq!(conversion.stats, ConversionStats::default());
        assert!(conversion.output.contains("hostname ftd-converted"));
    }

    #[test]
    fn strict_mode_rejects_dangling_group_members() {
        let text = "object-group network servers\n network-object object web\n!";
        let lenient = convert(text, "cisco-asa", "palo-alto").unwrap();
        assert_eq!(lenient.stats.object_groups, 1);

        let strict = ConvertOptions {
            strict_references: true,
        };
        let failure = convert_with(builtin(), text, "cisco-asa", "palo-alto", strict).unwrap_err();
        assert!(matches!(
            failure.error,
            ConvertError::UnresolvedReferences { count: 1, .. }
        ));
        assert!(failure.to_string().contains("'web'"));
    }

    #[test]
    fn parse_only_resolves_vendor() {
        let (entry, model) = parse_with(builtin(), ASA, "CISCO-ASA").unwrap();
        assert_eq!(entry.info.id, VendorId::CiscoAsa);
        assert_eq!(model.interfaces.len(), 1);
        assert!(matches!(
            parse_with(builtin(), ASA, "junos"),
            Err(ConvertError::UnknownVendor(_))
        ));
    }
}
