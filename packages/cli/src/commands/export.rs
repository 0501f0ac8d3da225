use crate::config::Config;
use crate::formats::{load_document, ExportFormat};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use uibuilder_components::ComponentRegistry;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Document to export (.json or .html)
    pub input: PathBuf,

    /// Target format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Html)]
    pub format: ExportFormat,

    /// Output to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,
}

pub fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let registry = ComponentRegistry::with_builtin_components();

    let input = PathBuf::from(cwd).join(&args.input);
    let document = load_document(&input, &registry)?;
    let output = args.format.render(&document, &registry, &config)?;

    if args.stdout {
        println!("{}", output);
        return Ok(());
    }

    let out_dir = match &args.out_dir {
        Some(out) => PathBuf::from(cwd).join(out),
        None => config.get_out_dir(cwd),
    };
    fs::create_dir_all(&out_dir)?;

    let output_file = out_dir.join(args.format.output_filename(&config));
    fs::write(&output_file, output)?;

    println!(
        "  {} {} → {} {}",
        "✓".green(),
        args.input.display(),
        output_file.display(),
        format!("({})", args.format.mime_type()).dimmed()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_writes_default_filename() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        fs::write(
            dir.path().join("page.html"),
            r#"<p>Hello</p><button data-type="ui-button" data-id="button-4">Buy</button>"#,
        )
        .unwrap();

        export(
            ExportArgs {
                input: PathBuf::from("page.html"),
                format: ExportFormat::Blocks,
                stdout: false,
                out_dir: None,
            },
            &cwd,
        )
        .unwrap();

        let written = fs::read_to_string(dir.path().join("dist/ui-builder.blocks.html")).unwrap();
        assert!(written.starts_with("<!-- block:paragraph -->\n<p>Hello</p>"));
        assert!(written.contains("<!-- block:ui-builder/button {\"text\":\"Buy\""));
    }

    #[test]
    fn test_export_honors_out_dir_override() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        fs::write(
            dir.path().join("page.json"),
            r#"{ "type": "doc", "content": [{ "type": "paragraph" }] }"#,
        )
        .unwrap();

        export(
            ExportArgs {
                input: PathBuf::from("page.json"),
                format: ExportFormat::React,
                stdout: false,
                out_dir: Some("out".to_string()),
            },
            &cwd,
        )
        .unwrap();

        let written = fs::read_to_string(dir.path().join("out/GeneratedComponent.tsx")).unwrap();
        assert!(written.contains("export default function GeneratedComponent(): JSX.Element {"));
    }

    #[test]
    fn test_export_rejects_unknown_input() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        let result = export(
            ExportArgs {
                input: PathBuf::from("missing.json"),
                format: ExportFormat::Json,
                stdout: true,
                out_dir: None,
            },
            &cwd,
        );
        assert!(result.is_err());
    }
}
