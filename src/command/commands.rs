use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::id::FieldId;
use crate::schema::{FieldDef, FieldPatch, Layout};
use crate::store::FormStore;
use crate::template::TemplateOptions;

/// Mutations that can be executed against the form store.
///
/// Commands carry everything needed to apply them, so `AddField` holds the
/// concrete field (id already assigned) rather than the toolbox item that
/// spawned it; that keeps the inverse well defined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Command {
    /// Insert an already-built field at the given index (default: end)
    AddField {
        field: FieldDef,
        at: Option<usize>,
    },

    /// Apply a partial change set to one field
    UpdateField {
        id: FieldId,
        patch: FieldPatch,
    },

    /// Remove a field, closing the ordering gap
    RemoveField {
        id: FieldId,
    },

    /// Move a field to a new final position in render order
    MoveField {
        id: FieldId,
        to: usize,
    },

    /// Atomically replace the field set from a template
    ApplyTemplate {
        template_id: String,
        options: TemplateOptions,
    },

    /// Restore a captured field set wholesale; the inverse of a template
    /// application
    RestoreFields {
        fields: Vec<FieldDef>,
        layout: Layout,
    },
}

impl Command {
    /// Execute the command against the store
    pub fn execute(&self, store: &mut FormStore) -> StoreResult<()> {
        match self {
            Command::AddField { field, at } => {
                store.insert_field(field.clone(), *at).map(|_| ())
            }
            Command::UpdateField { id, patch } => store.update_field(id, patch),
            Command::RemoveField { id } => store.remove_field(id),
            Command::MoveField { id, to } => store.move_field(id, *to),
            Command::ApplyTemplate {
                template_id,
                options,
            } => store.apply_template(template_id, options),
            Command::RestoreFields { fields, layout } => {
                store.restore_fields(fields.clone(), layout.clone())
            }
        }
    }

    /// Create the inverse command for undo, from the store's current
    /// state. `None` when the target no longer exists.
    pub fn inverse(&self, store: &FormStore) -> Option<Command> {
        match self {
            Command::AddField { field, .. } => Some(Command::RemoveField {
                id: field.id.clone(),
            }),

            Command::UpdateField { id, patch } => {
                let current = store.get_field(id)?;
                Some(Command::UpdateField {
                    id: id.clone(),
                    patch: patch.capture_inverse(current),
                })
            }

            Command::RemoveField { id } => {
                let at = store.schema().position_of(id)?;
                let field = store.get_field(id)?.clone();
                Some(Command::AddField {
                    field,
                    at: Some(at),
                })
            }

            Command::MoveField { id, .. } => {
                let from = store.schema().position_of(id)?;
                Some(Command::MoveField {
                    id: id.clone(),
                    to: from,
                })
            }

            // a full swap is undone by restoring the entire current set
            Command::ApplyTemplate { .. } | Command::RestoreFields { .. } => {
                Some(Command::RestoreFields {
                    fields: store.schema().fields.clone(),
                    layout: store.schema().layout.clone(),
                })
            }
        }
    }
}
