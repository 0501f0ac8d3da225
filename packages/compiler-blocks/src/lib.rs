//! Block-comment markup export
//!
//! ```text
//! Block := "<!-- block:" Name Attrs? (" /-->" | " -->" NL Inner NL "<!-- /block:" Name " -->")
//! ```
//!
//! Paragraphs are `block:paragraph` wrapping a `<p>`; components are
//! `block:<namespace>/<type>` carrying their attributes (minus `id`) as
//! JSON. Blocks are separated by a single newline, nothing is indented.

mod compiler;

pub use compiler::{escape_text, to_block_markup, CompileOptions};
