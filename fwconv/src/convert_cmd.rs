use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use fwconv::engine::{convert_with, ConvertOptions};
use fwconv::registry::Registry;
use fwconv::report::{render_conversion, ConversionReport};

use crate::cli::{ConvertArgs, OutputFormat};
use crate::path_guard::ensure_output_not_same;

/// Read the input, run the engine, then write or print the generated text.
///
/// With `--output`, the generated text goes to the file and the summary to
/// stdout. Without it, text mode prints the generated config to stdout and the
/// summary to stderr; JSON mode prints one report carrying both.
pub fn run_convert(args: ConvertArgs) -> Result<()> {
    if let Some(output) = &args.output {
        ensure_output_not_same(output, &args.input)?;
    }
    let registry = crate::resolve_registry(args.matrix_file.as_deref())?;
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    warn_on_extension(&registry, &args.from, &args.input);

    let options = ConvertOptions {
        strict_references: args.strict_references,
    };
    let result = convert_with(&registry, &text, &args.from, &args.to, options);

    if let OutputFormat::Json = args.format {
        let report = ConversionReport::from_result(&result);
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    let conversion = match result {
        Ok(conversion) => conversion,
        Err(failure) => bail!("convert failed: {failure}"),
    };

    match (&args.output, args.format) {
        (Some(output), format) => {
            fs::write(output, &conversion.output)
                .with_context(|| format!("failed to write output {}", output.display()))?;
            if let OutputFormat::Text = format {
                println!("{}", render_conversion(&conversion));
                println!("output={}", output.display());
            }
        }
        (None, OutputFormat::Text) => {
            print!("{}", conversion.output);
            eprintln!("{}", render_conversion(&conversion));
        }
        (None, OutputFormat::Json) => {}
    }
    Ok(())
}

fn warn_on_extension(registry: &Registry, source: &str, input: &Path) {
    let Some(entry) = registry.vendor(source) else {
        return;
    };
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()));
    let known = extension
        .as_deref()
        .is_some_and(|e| entry.info.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)));
    if !known && !entry.info.extensions.is_empty() {
        tracing::warn!(
            file = %input.display(),
            expected = %entry.info.extensions.join(","),
            "input extension is unusual for {}",
            entry.info.name
        );
    }
}
