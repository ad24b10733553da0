use anyhow::{bail, Result};
use fwconv::report::{render_targets, render_vendors};

use crate::cli::{OutputFormat, TargetsArgs, VendorsArgs};

pub fn run_vendors(args: VendorsArgs) -> Result<()> {
    let registry = crate::resolve_registry(args.matrix_file.as_deref())?;
    let vendors = registry.supported_vendors();
    match args.format {
        OutputFormat::Text => println!("{}", render_vendors(&vendors)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&vendors)?),
    }
    Ok(())
}

pub fn run_targets(args: TargetsArgs) -> Result<()> {
    let registry = crate::resolve_registry(args.matrix_file.as_deref())?;
    if registry.vendor(&args.source).is_none() {
        bail!("unsupported vendor: {}", args.source);
    }
    let options = registry.conversion_options(&args.source);
    match args.format {
        OutputFormat::Text => println!("{}", render_targets(&args.source, &options)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
    }
    Ok(())
}
