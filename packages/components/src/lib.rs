//! # UI Builder components
//!
//! Component registry and the per-type node contract: schema defaults,
//! value coercion, and the HTML encoding each component type uses.

pub mod button;
pub mod container;
pub mod contract;
pub mod metadata;
pub mod registry;

pub use contract::{
    normalize_with_schema, ComponentKind, HtmlElement, NodeContract, Normalized,
    RenderedElement, SchemaMismatch,
};
pub use metadata::{ComponentCategory, ComponentMetadata, PropKind, PropSpec};
pub use registry::{ComponentDefinition, ComponentRegistry};
