use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

pub fn ensure_output_not_same(output: &Path, input: &Path) -> Result<()> {
    let out_norm = normalize_for_compare(output)
        .with_context(|| format!("failed to normalize output path {}", output.display()))?;
    let in_norm = normalize_for_compare(input)
        .with_context(|| format!("failed to normalize input path {}", input.display()))?;
    if out_norm == in_norm {
        bail!(
            "refusing to overwrite source file: output {} matches input {}",
            output.display(),
            input.display()
        );
    }
    Ok(())
}

fn normalize_for_compare(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }

    // Outputs that do not exist yet are only joined with the cwd; `..` stays unresolved.
    let base = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().context("current_dir")?
    };
    Ok(base.join(path))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::ensure_output_not_same;

    #[test]
    fn same_file_is_refused_and_new_file_allowed() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("asa.cfg");
        fs::write(&input, "hostname fw1\n").unwrap();

        let err = ensure_output_not_same(&input, &input).unwrap_err();
        assert!(err.to_string().contains("refusing to overwrite source file"));

        let dotted = dir.path().join(".").join("asa.cfg");
        assert!(ensure_output_not_same(&dotted, &input).is_err());

        assert!(ensure_output_not_same(&dir.path().join("out.conf"), &input).is_ok());
    }
}
