mod compiler;
mod parser;

pub use compiler::{escape_html, to_html, CompileOptions};
pub use parser::from_html;

#[cfg(test)]
mod tests;
