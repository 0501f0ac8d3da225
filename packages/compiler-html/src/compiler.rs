use std::sync::Arc;
use uibuilder_components::ComponentRegistry;
use uibuilder_model::Node;

/// Options for HTML compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// One block per line, nested content indented
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Wrap the blocks in a full page
    pub standalone: bool,
    /// Page title (standalone only)
    pub title: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
            standalone: false,
            title: "UI Builder".to_string(),
        }
    }
}

struct Context {
    options: CompileOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Render a document to HTML
///
/// Paragraphs become `<p>`, components render through their contract, and
/// components without a registered definition render as nothing.
pub fn to_html(document: &Node, registry: &ComponentRegistry, options: CompileOptions) -> String {
    let mut ctx = Context::new(options);
    let standalone = ctx.options.standalone;

    if standalone {
        ctx.add_line("<!DOCTYPE html>");
        ctx.add_line("<html>");
        ctx.indent();
        compile_head(&mut ctx);
        ctx.add_line("<body>");
        ctx.indent();
    }

    for block in document.content() {
        compile_block(block, registry, &mut ctx);
    }

    if standalone {
        ctx.dedent();
        ctx.add_line("</body>");
        ctx.dedent();
        ctx.add_line("</html>");
    }

    ctx.get_output()
}

fn compile_head(ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    // void tags stay self-closed so the page reads back as well-formed markup
    ctx.add_line("<meta charset=\"UTF-8\" />");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />");
    let title = format!("<title>{}</title>", escape_html(&ctx.options.title));
    ctx.add_line(&title);

    ctx.dedent();
    ctx.add_line("</head>");
}

fn compile_block(node: &Node, registry: &ComponentRegistry, ctx: &mut Context) {
    match node {
        Node::Paragraph { .. } => {
            ctx.add_line(&format!("<p>{}</p>", escape_html(&node.text_content())));
        }
        Node::Component {
            component_type,
            attrs,
            content,
        } => {
            let Some(definition) = registry.get(component_type) else {
                tracing::debug!(component = %component_type, "skipping unregistered component");
                return;
            };

            let rendered = definition.render_external(attrs);
            let mut open = format!("<{}", rendered.tag);
            for (name, value) in &rendered.attributes {
                open.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
            }

            let text = rendered.text.as_deref().map(escape_html).unwrap_or_default();
            let children: &[Arc<Node>] = if definition.is_atom() { &[] } else { content };

            if children.is_empty() {
                if text.is_empty() && is_self_closing(&rendered.tag) {
                    ctx.add_line(&format!("{} />", open));
                } else {
                    ctx.add_line(&format!("{}>{}</{}>", open, text, rendered.tag));
                }
                return;
            }

            ctx.add_line(&format!("{}>{}", open, text));
            ctx.indent();
            for child in children {
                compile_block(child, registry, ctx);
            }
            ctx.dedent();
            ctx.add_line(&format!("</{}>", rendered.tag));
        }
        Node::Text { .. } | Node::Document { .. } => {}
    }
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(
        tag,
        "img"
            | "input"
            | "br"
            | "hr"
            | "meta"
            | "link"
            | "area"
            | "base"
            | "col"
            | "embed"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
