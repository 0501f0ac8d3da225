//! # UI Builder document model
//!
//! The tree shared by the editor and every serializer: documents,
//! paragraphs, text runs and typed component nodes, plus the linear
//! position space used to address them.

pub mod error;
pub mod id_generator;
pub mod json;
pub mod node;
pub mod position;

pub use error::{ParseError, ParseResult};
pub use id_generator::IdGenerator;
pub use json::{from_json, from_value, to_json, to_value};
pub use node::{Attrs, Descendants, Node, ID_ATTR};
pub use position::{resolve, ResolvedPos};
