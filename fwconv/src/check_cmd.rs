use std::fs;

use anyhow::{bail, Context, Result};
use fwconv::engine::parse_with;
use fwconv::references::build_reference_report;
use fwconv::registry::builtin;
use fwconv::report::render_findings;

use crate::cli::{CheckArgs, OutputFormat};

pub fn run_check(args: CheckArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let (entry, model) = parse_with(builtin(), &text, &args.from)?;
    let report = build_reference_report(&model);

    match args.format {
        OutputFormat::Text => println!("{}", render_findings(entry.info.id.as_str(), &report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.errors > 0 {
        bail!("check failed: {} errors", report.errors);
    }
    if args.strict && report.warnings > 0 {
        bail!("check failed in strict mode: {} warnings", report.warnings);
    }
    Ok(())
}
