use crate::context::{CompileOptions, CompilerContext};
use crate::error::CompileError;
use serde_json::Value;
use std::sync::Arc;
use uibuilder_components::{ComponentDefinition, ComponentRegistry};
use uibuilder_model::{Attrs, Node, ID_ATTR};

/// Compile a document to a React function component using the default
/// options
pub fn to_source_component(document: &Node, registry: &ComponentRegistry) -> String {
    compile(document, registry, &CompileOptions::default())
}

/// Compile a document to a React function component
pub fn compile_to_react(
    document: &Node,
    registry: &ComponentRegistry,
    options: CompileOptions,
) -> Result<String, CompileError> {
    validate_options(&options)?;
    Ok(compile(document, registry, &options))
}

fn compile(document: &Node, registry: &ComponentRegistry, options: &CompileOptions) -> String {
    let ctx = CompilerContext::new(registry, options);

    compile_imports(document, &ctx);
    compile_component(document, &ctx);

    ctx.into_output()
}

fn validate_options(options: &CompileOptions) -> Result<(), CompileError> {
    let name = &options.component_name;
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(first) if first.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if !valid {
        return Err(CompileError::InvalidComponentName(name.clone()));
    }

    match &options.import_module {
        Some(module) if module.trim().is_empty() => Err(CompileError::EmptyImportModule),
        _ => Ok(()),
    }
}

fn compile_imports(document: &Node, ctx: &CompilerContext) {
    ctx.add_line("import React from \"react\";");

    if let Some(module) = &ctx.options.import_module {
        let tags = used_tags(document, ctx);
        if !tags.is_empty() {
            ctx.add_line(&format!(
                "import {{ {} }} from \"{}\";",
                tags.join(", "),
                module
            ));
        }
    }

    ctx.add_line("");
}

/// Tag names of every rendered component, in document order
fn used_tags(document: &Node, ctx: &CompilerContext) -> Vec<String> {
    let mut tags = Vec::new();
    let mut stack: Vec<&Node> = document.content().iter().rev().map(Arc::as_ref).collect();

    while let Some(node) = stack.pop() {
        let Node::Component {
            component_type,
            content,
            ..
        } = node
        else {
            continue;
        };
        // orphans are skipped together with their subtree
        let Some(definition) = ctx.definition(component_type) else {
            continue;
        };

        let tag = tag_name(definition);
        if !tags.contains(&tag) {
            tags.push(tag);
        }
        if !definition.is_atom() {
            stack.extend(content.iter().rev().map(Arc::as_ref));
        }
    }

    tags
}

fn compile_component(document: &Node, ctx: &CompilerContext) {
    let name = &ctx.options.component_name;
    if ctx.options.use_typescript {
        ctx.add_line(&format!("export default function {}(): JSX.Element {{", name));
    } else {
        ctx.add_line(&format!("export default function {}() {{", name));
    }
    ctx.indent();

    ctx.add_line("return (");
    ctx.indent();
    ctx.add_line("<>");
    ctx.indent();
    for block in document.content() {
        compile_block(block, ctx);
    }
    ctx.dedent();
    ctx.add_line("</>");
    ctx.dedent();
    ctx.add_line(");");

    ctx.dedent();
    ctx.add_line("}");
}

fn compile_block(node: &Node, ctx: &CompilerContext) {
    match node {
        Node::Paragraph { .. } => {
            ctx.add_line(&format!("<p>{}</p>", escape_jsx_text(&node.text_content())));
        }
        Node::Component {
            component_type,
            attrs,
            content,
        } => {
            let Some(definition) = ctx.definition(component_type) else {
                tracing::debug!(component = %component_type, "skipping unregistered component");
                return;
            };

            let tag = tag_name(definition);
            let props = compile_props(attrs);
            let children: &[Arc<Node>] = if definition.is_atom() { &[] } else { content };

            if children.is_empty() {
                ctx.add_line(&format!("<{}{} />", tag, props));
                return;
            }

            ctx.add_line(&format!("<{}{}>", tag, props));
            ctx.indent();
            for child in children {
                compile_block(child, ctx);
            }
            ctx.dedent();
            ctx.add_line(&format!("</{}>", tag));
        }
        Node::Text { .. } | Node::Document { .. } => {}
    }
}

fn compile_props(attrs: &Attrs) -> String {
    let mut props = String::new();
    for (name, value) in attrs {
        if name == ID_ATTR {
            continue;
        }
        props.push(' ');
        props.push_str(&compile_prop(name, value));
    }
    props
}

/// One JSX prop. Plain strings become `name="value"`. A JSX attribute
/// string cannot escape `"`, decodes `&` entities, and keeps newlines
/// verbatim, so strings holding any of those are emitted as a JSON string
/// expression `name={"..."}` instead, which reads back as the same value.
fn compile_prop(name: &str, value: &Value) -> String {
    match value {
        Value::String(s) if !s.contains(['"', '&', '\n']) => format!("{}=\"{}\"", name, s),
        Value::Bool(true) => name.to_string(),
        Value::Bool(false) => format!("{}={{false}}", name),
        other => format!("{}={{{}}}", name, other),
    }
}

fn tag_name(definition: &ComponentDefinition) -> String {
    let tag = pascal_case(&definition.metadata.name);
    if tag.starts_with(|c: char| c.is_alphabetic()) {
        tag
    } else {
        pascal_case(definition.id())
    }
}

/// `"icon button"` → `"IconButton"`
pub fn pascal_case(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

fn escape_jsx_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '{' => escaped.push_str("{\"{\"}"),
            '}' => escaped.push_str("{\"}\"}"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
