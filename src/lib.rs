#![warn(clippy::all, rust_2018_idioms)]

pub mod builder;
pub mod command;
pub mod drag;
pub mod error;
pub mod event;
pub mod id;
pub mod schema;
pub mod store;
pub mod template;
pub mod toolbox;

pub use builder::{FormBuilder, SaveCallback};
pub use command::{Command, CommandHistory, HistoryError};
pub use drag::{DragCommit, DragCoordinator, DragOutcome, DragSource, DragState, DropTarget};
pub use error::{StoreError, StoreResult};
pub use id::FieldId;
pub use schema::{
    FieldDef, FieldPatch, FieldType, FieldValue, FormSchema, Layout, RuleKind, ValidationRule,
};
pub use store::{FormStore, SnapshotHandle};
pub use template::{Template, TemplateCatalog, TemplateOptions};
pub use toolbox::{FieldTypeDef, PresetTypeDef, Thumbnail, Toolbox, ToolboxItem};
