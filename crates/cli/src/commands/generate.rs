use anyhow::{Context, Result, bail};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use schemegen_core::{
    CustomSchemeInfos, Generator, JsonSchemeRenderer, RenderedScheme, SchemeRenderer,
};

use super::load_inputs;
use crate::cli::InputArgs;

pub fn generate_command(inputs: InputArgs, output_dir: Option<&Path>, compact: bool) -> Result<()> {
    let inputs = load_inputs(inputs)?;

    let renderer = JsonSchemeRenderer { pretty: !compact };
    let extension = renderer.extension();
    let generator = Generator::new(Box::new(CustomSchemeInfos), Box::new(renderer));
    let rendered = generator
        .generate(&inputs)
        .context("Failed to generate custom schemes")?;

    let Some(output_dir) = output_dir else {
        println!("{}", json_array(&rendered, compact));
        return Ok(());
    };

    // Check every name before anything is written
    let file_names = scheme_file_names(&rendered, extension)?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    for (scheme, file_name) in rendered.iter().zip(file_names) {
        let path = output_dir.join(file_name);
        fs::write(&path, &scheme.contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote scheme \"{}\" to {}", scheme.name, path.display());
    }
    println!(
        "Generated {} schemes in {}",
        rendered.len(),
        output_dir.display()
    );

    Ok(())
}

/// Joins the rendered documents into one JSON array
fn json_array(rendered: &[RenderedScheme], compact: bool) -> String {
    if compact {
        let documents: Vec<&str> = rendered.iter().map(|scheme| scheme.contents.as_str()).collect();
        return format!("[{}]", documents.join(","));
    }
    if rendered.is_empty() {
        return "[]".to_string();
    }

    let documents: Vec<String> = rendered
        .iter()
        .map(|scheme| {
            scheme
                .contents
                .lines()
                .map(|line| format!("  {line}"))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect();
    format!("[\n{}\n]", documents.join(",\n"))
}

/// One file name per scheme, in order. Names that would leave the output
/// directory, and names used by more than one scheme, are rejected.
fn scheme_file_names(rendered: &[RenderedScheme], extension: &str) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    rendered
        .iter()
        .map(|scheme| {
            let name = scheme.name.as_str();
            if name.is_empty()
                || name == "."
                || name == ".."
                || name.contains(['/', '\\', '\0'])
            {
                bail!("Scheme name \"{name}\" cannot be used as a file name");
            }
            if !seen.insert(name) {
                bail!("More than one custom scheme is named \"{name}\"");
            }
            Ok(format!("{name}.{extension}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme(name: &str, contents: &str) -> RenderedScheme {
        RenderedScheme {
            name: name.to_string(),
            contents: contents.to_string(),
        }
    }

    #[test]
    fn test_file_names_use_the_extension() {
        let rendered = vec![scheme("App", ""), scheme("App Tests", "")];
        let names = scheme_file_names(&rendered, "json").unwrap();
        assert_eq!(names, vec!["App.json", "App Tests.json"]);
    }

    #[test]
    fn test_path_like_names_are_rejected() {
        for name in ["", ".", "..", "../escape", "nested/App", "win\\App"] {
            let err = scheme_file_names(&[scheme(name, "")], "json").unwrap_err();
            assert!(
                err.to_string().contains("cannot be used as a file name"),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let rendered = vec![scheme("App", ""), scheme("Other", ""), scheme("App", "")];
        let err = scheme_file_names(&rendered, "json").unwrap_err();
        assert_eq!(err.to_string(), "More than one custom scheme is named \"App\"");
    }

    #[test]
    fn test_stdout_output_is_one_json_value() {
        let rendered = vec![
            scheme("A", "{\n  \"name\": \"A\"\n}"),
            scheme("B", "{\n  \"name\": \"B\"\n}"),
        ];

        let pretty: serde_json::Value = serde_json::from_str(&json_array(&rendered, false)).unwrap();
        assert_eq!(pretty[1]["name"], "B");

        let compact = vec![scheme("A", r#"{"name":"A"}"#), scheme("B", r#"{"name":"B"}"#)];
        assert_eq!(json_array(&compact, true), r#"[{"name":"A"},{"name":"B"}]"#);
        assert_eq!(json_array(&[], false), "[]");
    }
}
