use crate::config::{Config, DEFAULT_CONFIG_NAME};
use crate::formats::ExportFormat;
use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use uibuilder_components::ComponentRegistry;
use uibuilder_editor::{Document, EditSession};
use uibuilder_model::Attrs;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Output directory written to the config
    #[arg(short, long, default_value = "dist")]
    pub out_dir: String,

    /// Force overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing UI builder project...".bright_blue().bold());

    let config = Config {
        out_dir: args.out_dir.clone(),
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let document_name = ExportFormat::Json.filename();
    let document_path = PathBuf::from(cwd).join(document_name);
    if !document_path.exists() || args.force {
        fs::write(&document_path, starter_document()?)?;
        println!("  {} Created {}", "✓".green(), document_name);
    }

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}", document_name);
    println!("  2. Run: uibuilder export {} --format html", document_name);
    println!("  3. Check output in {}/", args.out_dir);

    Ok(())
}

/// A document holding one call-to-action button, built through an edit
/// session so ids and attributes are canonical
fn starter_document() -> Result<String> {
    let registry = Arc::new(ComponentRegistry::with_builtin_components());
    let mut session = EditSession::new("init", Document::new(), registry);

    let id = session
        .insert_component("button")
        .context("Failed to insert the starter button")?;
    let mut attrs = Attrs::new();
    attrs.insert("text".to_string(), json!("Get started"));
    if !session.update_attributes(&id, attrs) {
        bail!("Failed to set the text of {}", id);
    }

    Ok(session.document().to_json())
}
