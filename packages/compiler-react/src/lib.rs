mod compiler;
mod context;
mod error;

pub use compiler::{compile_to_react, pascal_case, to_source_component};
pub use context::{CompileOptions, CompilerContext};
pub use error::CompileError;
