use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use uibuilder_components::{ComponentCategory, ComponentDefinition, ComponentRegistry};

#[derive(Debug, Args)]
pub struct ComponentsArgs {
    /// Only list one category (basic, layout, form, media, advanced)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Filter by name or description
    #[arg(short, long)]
    pub search: Option<String>,
}

pub fn components(args: ComponentsArgs) -> Result<()> {
    let registry = ComponentRegistry::with_builtin_components();

    let category = match &args.category {
        Some(value) => Some(
            ComponentCategory::parse(&value.to_lowercase())
                .ok_or_else(|| anyhow!("Unknown category: {}", value))?,
        ),
        None => None,
    };

    let sections = palette(&registry, category, args.search.as_deref().unwrap_or(""));
    if sections.is_empty() {
        println!("{}", "⚠️  No matching components".yellow());
        return Ok(());
    }

    for (category, definitions) in sections {
        println!("{}", category.label().bright_blue().bold());
        for definition in definitions {
            let meta = &definition.metadata;
            println!(
                "  {} {} {}",
                meta.icon.as_deref().unwrap_or("•"),
                meta.id.bright_white(),
                format!("- {}", meta.description).dimmed()
            );
        }
        println!();
    }

    Ok(())
}

/// Matching definitions grouped by category, empty groups dropped
fn palette<'a>(
    registry: &'a ComponentRegistry,
    category: Option<ComponentCategory>,
    query: &str,
) -> Vec<(ComponentCategory, Vec<&'a ComponentDefinition>)> {
    registry
        .categories()
        .into_iter()
        .filter(|c| category.map_or(true, |wanted| wanted == *c))
        .map(|c| (c, registry.search(query, Some(c))))
        .filter(|(_, definitions)| !definitions.is_empty())
        .collect()
}
