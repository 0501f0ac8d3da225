//! # UI Builder Editor
//!
//! Document editing engine: snapshots, transactions, selection, and the
//! derived state the palette and property panel read.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ components: registry + node contracts       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document + transactions             │
//! │  - Immutable snapshots, structural sharing  │
//! │  - All-or-nothing transactions of steps     │
//! │  - Selection snapping around atomic nodes   │
//! │  - Selected node + editing mode coordinator │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compilers: JSON, HTML, React, block markup  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is owned by the Document**: everything else reads
//!    snapshots or hands in transactions
//! 2. **Pure transactions**: (snapshot, steps) → new snapshot; dispatch is
//!    just storing the result
//! 3. **Degrade, don't abort**: unknown types and bad positions turn into
//!    no-ops at the session level
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use uibuilder_components::ComponentRegistry;
//! use uibuilder_editor::{Document, EditSession};
//!
//! let registry = Arc::new(ComponentRegistry::with_builtin_components());
//! let mut session = EditSession::new("client-1", Document::new(), registry);
//!
//! let id = session.insert_component("button").unwrap();
//! assert_eq!(session.selected_node_id(), Some(id.as_str()));
//! ```

mod coordinator;
mod document;
mod errors;
mod layout;
mod selection;
mod session;
mod steps;
mod transaction;

pub use coordinator::{selected_node, EditingEvent, EditingState, SelectionCoordinator};
pub use document::{Document, TransactionResult};
pub use errors::{EditorError, StepError};
pub use layout::{Coords, LineLayout, PositionMap};
pub use selection::Selection;
pub use session::{EditSession, EditorEvent};
pub use steps::{EditState, Step, StepMap};
pub use transaction::{Applied, Transaction};
