use std::cell::{Cell, RefCell};
use uibuilder_components::{ComponentDefinition, ComponentRegistry};

/// Options for React compilation
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// Annotate the component's return type
    pub use_typescript: bool,
    /// Name of the generated function
    pub component_name: String,
    /// Module the component tags are imported from; `None` skips the import
    pub import_module: Option<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            use_typescript: false,
            component_name: "GeneratedComponent".to_string(),
            import_module: Some("./components".to_string()),
        }
    }
}

/// Output buffer plus the registry the tags are resolved against
pub struct CompilerContext<'a> {
    pub registry: &'a ComponentRegistry,
    pub options: &'a CompileOptions,
    buffer: RefCell<String>,
    indent_level: Cell<usize>,
}

impl<'a> CompilerContext<'a> {
    pub fn new(registry: &'a ComponentRegistry, options: &'a CompileOptions) -> Self {
        Self {
            registry,
            options,
            buffer: RefCell::new(String::new()),
            indent_level: Cell::new(0),
        }
    }

    pub fn add(&self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }

    pub fn add_line(&self, text: &str) {
        let mut buffer = self.buffer.borrow_mut();
        if !text.is_empty() {
            buffer.push_str(&"  ".repeat(self.indent_level.get()));
            buffer.push_str(text);
        }
        buffer.push('\n');
    }

    pub fn indent(&self) {
        self.indent_level.set(self.indent_level.get() + 1);
    }

    pub fn dedent(&self) {
        self.indent_level.set(self.indent_level.get().saturating_sub(1));
    }

    /// Registered definition for a component type, `None` for orphans
    pub fn definition(&self, component_type: &str) -> Option<&'a ComponentDefinition> {
        self.registry.get(component_type)
    }

    pub fn into_output(self) -> String {
        self.buffer.into_inner()
    }
}
