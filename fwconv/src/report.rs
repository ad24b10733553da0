//! Terminal and JSON rendering of conversions, vendor listings and reference
//! findings.

use colored::Colorize;
use serde::Serialize;

use crate::engine::{Conversion, ConversionFailure};
use crate::model::ConfigModel;
use crate::references::{FindingSeverity, ReferenceReport};
use crate::registry::{Complexity, ConversionOption, VendorInfo};
use crate::stats::{self, ConversionStats};

/// Flat success/failure record, the shape callers outside Rust consume.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport<'a> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub source_vendor_name: Option<&'a str>,
    pub target_vendor_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ConversionStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a ConfigModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated: Option<&'a str>,
}

impl<'a> ConversionReport<'a> {
    pub fn from_result(result: &'a Result<Conversion, ConversionFailure>) -> Self {
        match result {
            Ok(conversion) => Self {
                success: true,
                error: None,
                source_vendor_name: Some(&conversion.source_vendor_name),
                target_vendor_name: Some(&conversion.target_vendor_name),
                complexity: Some(conversion.complexity),
                stats: Some(conversion.stats),
                model: Some(&conversion.model),
                generated: Some(&conversion.output),
            },
            Err(failure) => Self {
                success: false,
                error: Some(failure.to_string()),
                source_vendor_name: failure.source_vendor_name.as_deref(),
                target_vendor_name: failure.target_vendor_name.as_deref(),
                complexity: None,
                stats: None,
                model: None,
                generated: None,
            },
        }
    }
}

/// One header line plus the `convert_summary k=v ...` line.
pub fn render_conversion(conversion: &Conversion) -> String {
    let header = format!(
        "converted {} -> {} complexity={}",
        conversion.source_vendor_name,
        conversion.target_vendor_name,
        conversion.complexity.as_str()
    );
    format!(
        "{}\n{}",
        header.green(),
        stats::render(&conversion.stats).cyan()
    )
}

pub fn render_vendors(vendors: &[VendorInfo]) -> String {
    let mut out = vec!["vendors".to_string()];
    for vendor in vendors {
        out.push(format!(
            "- {} ({}) extensions={} {}",
            vendor.id.as_str().bold(),
            vendor.name,
            vendor.extensions.join(","),
            vendor.description
        ));
    }
    out.join("\n")
}

pub fn render_targets(source: &str, options: &[ConversionOption]) -> String {
    let mut out = vec![format!("targets source={source}")];
    if options.is_empty() {
        out.push("- none".to_string());
        return out.join("\n");
    }
    for option in options {
        let line = format!(
            "- {} ({}) supported={} complexity={}",
            option.id.as_str(),
            option.name,
            option.supported,
            option.complexity.as_str()
        );
        out.push(if option.supported {
            line
        } else {
            line.dimmed().to_string()
        });
    }
    out.join("\n")
}

/// `inspect` text: hostname and one line per category.
pub fn render_inspect(vendor: &str, model: &ConfigModel, stats: &ConversionStats) -> String {
    let mut out = vec![format!(
        "inspect vendor={vendor} hostname={}",
        model.hostname.as_deref().unwrap_or("none")
    )];
    for (category, count) in stats.iter() {
        let line = format!("- {category}: {count}");
        out.push(if count == 0 {
            line.dimmed().to_string()
        } else {
            line
        });
    }
    out.push(format!("total={}", stats.total()));
    out.join("\n")
}

pub fn render_findings(vendor: &str, report: &ReferenceReport) -> String {
    let mut out = vec![
        format!("check vendor={vendor}"),
        format!(
            "result errors={} warnings={}",
            report.errors, report.warnings
        ),
        "findings".to_string(),
    ];
    if report.findings.is_empty() {
        out.push("- none".to_string());
        return out.join("\n");
    }
    for finding in &report.findings {
        let line = match finding.severity {
            FindingSeverity::Error => {
                format!("- [error] {}: {}", finding.code, finding.message).red()
            }
            FindingSeverity::Warning => {
                format!("- [warning] {}: {}", finding.code, finding.message).yellow()
            }
        };
        out.push(line.to_string());
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{render_findings, render_targets, ConversionReport};
    use crate::engine::convert;
    use crate::references::build_reference_report;
    use crate::model::{AddressGroup, ConfigModel};
    use crate::registry::builtin;

    #[test]
    fn failure_report_omits_payload() {
        let result = convert("", "fortigate", "fortigate");
        let json = serde_json::to_value(ConversionReport::from_result(&result)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(
            json["error"],
            "conversion from fortigate to fortigate is not supported"
        );
        assert_eq!(json["source_vendor_name"], "FortiGate");
        assert!(json.get("stats").is_none());
        assert!(json.get("generated").is_none());
    }

    #[test]
    fn success_report_carries_stats_and_text() {
        let result = convert("hostname edge\n", "cisco-asa", "cisco-ftd");
        let json = serde_json::to_value(ConversionReport::from_result(&result)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["complexity"], "medium");
        assert_eq!(json["stats"]["interfaces"], 0);
        assert_eq!(json["model"]["hostname"], "edge");
        assert!(json["generated"].as_str().unwrap().contains("hostname edge"));
    }

    #[test]
    fn target_listing_and_findings_text() {
        colored::control::set_override(false);
        let text = render_targets("fortigate", &builtin().conversion_options("fortigate"));
        assert!(text.starts_with("targets source=fortigate"));
        assert!(text.contains("- palo-alto (Palo Alto) supported=true complexity=high"));
        assert!(!text.contains("- fortigate ("));
        assert_eq!(render_targets("junos", &[]), "targets source=junos\n- none");

        let mut model = ConfigModel::default();
        model.address_groups.push(AddressGroup {
            name: "servers".to_string(),
            members: vec!["db".to_string()],
            description: None,
        });
        let text = render_findings("cisco-asa", &build_reference_report(&model));
        assert!(text.contains("result errors=1 warnings=0"));
        assert!(text.contains("- [error] missing_group_member:"));
    }
}
