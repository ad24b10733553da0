//! Reference checks between groups, policies and declared objects.
//!
//! Conversions are lenient by default: a dangling name is carried through
//! unchanged. These findings back the strict conversion mode and the `check`
//! command.
//!
//! - **Group members** that are neither literals nor declared names are errors.
//! - **Policy endpoints** naming undeclared objects are warnings, since rules
//!   may legitimately name objects managed elsewhere.

use serde::Serialize;

use crate::model::{ConfigModel, Endpoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: FindingSeverity,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceReport {
    pub errors: usize,
    pub warnings: usize,
    pub findings: Vec<Finding>,
}

/// Names every dialect treats as "anything".
const BUILTIN: [&str; 4] = ["any", "all", "any4", "any6"];

pub fn build_reference_report(model: &ConfigModel) -> ReferenceReport {
    let findings = reference_findings(model);
    let errors = findings
        .iter()
        .filter(|f| f.severity == FindingSeverity::Error)
        .count();
    ReferenceReport {
        errors,
        warnings: findings.len() - errors,
        findings,
    }
}

pub fn reference_findings(model: &ConfigModel) -> Vec<Finding> {
    let mut out = group_member_findings(model);
    out.extend(policy_endpoint_findings(model));
    out
}

/// Group members that resolve to nothing.
pub fn group_member_findings(model: &ConfigModel) -> Vec<Finding> {
    let mut out = Vec::new();
    for group in &model.address_groups {
        for member in &group.members {
            if let Some(name) = unresolved(model, member) {
                out.push(Finding {
                    severity: FindingSeverity::Error,
                    code: "missing_group_member".to_string(),
                    message: format!(
                        "address group '{}' references '{name}' that is not declared",
                        group.name
                    ),
                });
            }
        }
    }
    out
}

fn policy_endpoint_findings(model: &ConfigModel) -> Vec<Finding> {
    let mut out = Vec::new();
    for (idx, policy) in model.policies.iter().enumerate() {
        let label = policy.label(idx);
        for (side, values) in [("source", &policy.source), ("destination", &policy.destination)] {
            for value in values {
                if let Some(name) = unresolved(model, value) {
                    out.push(Finding {
                        severity: FindingSeverity::Warning,
                        code: "missing_policy_reference".to_string(),
                        message: format!(
                            "policy '{label}' {side} references '{name}' that is not declared"
                        ),
                    });
                }
            }
        }
    }
    out
}

fn unresolved<'a>(model: &ConfigModel, text: &'a str) -> Option<&'a str> {
    let text = text.trim();
    if BUILTIN.iter().any(|b| text.eq_ignore_ascii_case(b)) {
        return None;
    }
    match Endpoint::classify(text) {
        Endpoint::Named(_) if !model.declares(text) => Some(text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{build_reference_report, group_member_findings, FindingSeverity};
    use crate::model::{AddressGroup, AddressObject, ConfigModel, SecurityPolicy};

    fn model_with_group(members: &[&str]) -> ConfigModel {
        let mut model = ConfigModel::default();
        model
            .address_objects
            .push(AddressObject::host("web", "10.0.0.10"));
        model.address_groups.push(AddressGroup {
            name: "servers".to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
            description: None,
        });
        model
    }

    #[test]
    fn literals_and_declared_names_resolve() {
        let model = model_with_group(&["web", "10.0.0.5", "10.1.0.0/16", "any"]);
        assert!(group_member_findings(&model).is_empty());
    }

    #[test]
    fn dangling_group_member_is_an_error() {
        let model = model_with_group(&["web", "db"]);
        let findings = group_member_findings(&model);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, FindingSeverity::Error);
        assert!(findings[0].message.contains("'db'"));
    }

    #[test]
    fn dangling_policy_endpoint_is_a_warning() {
        let mut model = model_with_group(&["web"]);
        model.policies.push(SecurityPolicy {
            name: Some("allow-web".to_string()),
            source: vec!["all".to_string()],
            destination: vec!["mail".to_string(), "servers".to_string()],
            ..SecurityPolicy::default()
        });
        let report = build_reference_report(&model);
        assert_eq!(report.errors, 0);
        assert_eq!(report.warnings, 1);
        assert!(report.findings[0].message.contains("allow-web"));
    }
}
