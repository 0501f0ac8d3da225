pub mod components;
pub mod export;
pub mod init;

pub use components::{components, ComponentsArgs};
pub use export::{export, ExportArgs};
pub use init::{init, InitArgs};
