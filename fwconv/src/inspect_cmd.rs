use std::fs;

use anyhow::{Context, Result};
use fwconv::engine::parse_with;
use fwconv::registry::builtin;
use fwconv::report::render_inspect;
use fwconv::stats::summarize;

use crate::cli::{InspectArgs, OutputFormat};

pub fn run_inspect(args: InspectArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let (entry, model) = parse_with(builtin(), &text, &args.from)?;

    match args.format {
        OutputFormat::Text => {
            let stats = summarize(&model);
            println!("{}", render_inspect(entry.info.id.as_str(), &model, &stats));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&model)?),
    }
    Ok(())
}
