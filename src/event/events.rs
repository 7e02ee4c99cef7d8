use std::sync::Arc;

use crate::id::FieldId;
use crate::schema::FormSchema;

/// Events emitted by the store after successful mutations.
///
/// Every mutation emits one fine-grained event followed by exactly one
/// `SnapshotPublished` carrying the new immutable snapshot.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// A new full-schema snapshot is available
    SnapshotPublished(Arc<FormSchema>),
    FieldAdded {
        id: FieldId,
        index: usize,
    },
    FieldRemoved {
        id: FieldId,
        index: usize,
    },
    FieldMoved {
        id: FieldId,
        from: usize,
        to: usize,
    },
    FieldUpdated {
        id: FieldId,
    },
    TemplateApplied {
        template_id: String,
    },
    /// A previous field set was restored (undo of a template apply)
    FieldsRestored,
    /// The host explicitly saved the schema
    SchemaSaved,
}
