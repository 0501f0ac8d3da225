//! Export targets: what each format is called on disk and how it is
//! rendered from a document.

use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use std::fs;
use std::path::Path;
use uibuilder_compiler_blocks::{to_block_markup, CompileOptions as BlockOptions};
use uibuilder_compiler_html::{from_html, to_html, CompileOptions as HtmlOptions};
use uibuilder_compiler_react::{compile_to_react, CompileOptions as ReactOptions};
use uibuilder_components::ComponentRegistry;
use uibuilder_model::{from_json, to_json, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Html,
    React,
    Blocks,
}

impl ExportFormat {
    /// Default file name of the export
    pub fn filename(self) -> &'static str {
        match self {
            ExportFormat::Json => "ui-builder.json",
            ExportFormat::Html => "ui-builder.html",
            ExportFormat::React => "GeneratedComponent.tsx",
            ExportFormat::Blocks => "ui-builder.blocks.html",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Html | ExportFormat::Blocks => "text/html",
            ExportFormat::React => "text/typescript",
        }
    }

    /// File name honoring the configured component name and language
    pub fn output_filename(self, config: &Config) -> String {
        match self {
            ExportFormat::React => {
                let extension = if config.react.typescript { "tsx" } else { "jsx" };
                format!("{}.{}", config.react.component_name, extension)
            }
            _ => self.filename().to_string(),
        }
    }

    pub fn render(
        self,
        document: &Node,
        registry: &ComponentRegistry,
        config: &Config,
    ) -> Result<String> {
        let output = match self {
            ExportFormat::Json => to_json(document),
            ExportFormat::Html => {
                let mut options = HtmlOptions {
                    pretty: config.html.pretty,
                    standalone: config.html.standalone,
                    ..Default::default()
                };
                if let Some(title) = &config.html.title {
                    options.title = title.clone();
                }
                to_html(document, registry, options)
            }
            ExportFormat::React => {
                let options = ReactOptions {
                    use_typescript: config.react.typescript,
                    component_name: config.react.component_name.clone(),
                    import_module: config.react.import_module.clone(),
                };
                compile_to_react(document, registry, options)?
            }
            ExportFormat::Blocks => {
                let options = BlockOptions {
                    namespace: config.blocks.namespace.clone(),
                };
                to_block_markup(document, registry, options)
            }
        };

        Ok(output)
    }
}

/// Read a document from `.json` or `.html` input
pub fn load_document(path: &Path, registry: &ComponentRegistry) -> Result<Node> {
    let source =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let document = match extension.as_deref() {
        Some("json") => from_json(&source)?,
        Some("html") | Some("htm") => from_html(&source, registry)?,
        _ => {
            return Err(anyhow!(
                "Unsupported input: {} (expected .json or .html)",
                path.display()
            ))
        }
    };

    Ok(document)
}
