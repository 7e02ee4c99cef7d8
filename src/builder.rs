//! Host-facing context object bundling the store, undo history, drag
//! coordinator, and toolbox.
//!
//! The builder is explicit, host-owned state: the host constructs it when
//! the editor mounts, passes it by reference to every consumer, and drops
//! it on unmount. Nothing here is ambient or global.

use crate::command::{Command, CommandHistory, HistoryResult};
use crate::drag::{DragCommit, DragCoordinator, DragOutcome, DragSource, DropTarget};
use crate::error::StoreResult;
use crate::event::StoreEventHandler;
use crate::id::FieldId;
use crate::schema::{FieldDef, FieldPatch, FormSchema};
use crate::store::{FormStore, SnapshotHandle};
use crate::template::{TemplateCatalog, TemplateOptions};
use crate::toolbox::{Toolbox, ToolboxItem};

/// Callback invoked on explicit save, never on individual mutations.
pub type SaveCallback = Box<dyn FnMut(&FormSchema)>;

/// The full editor context: `{ schema, templates, actions }` for the host.
pub struct FormBuilder {
    store: FormStore,
    history: CommandHistory,
    drag: DragCoordinator,
    toolbox: Toolbox,
    on_save: Option<SaveCallback>,
}

impl std::fmt::Debug for FormBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormBuilder")
            .field("store", &self.store)
            .field("dragging", &self.drag.is_dragging())
            .field("on_save", &self.on_save.is_some())
            .finish()
    }
}

impl FormBuilder {
    /// Creates an editor context around a host-supplied initial schema.
    /// Fails when the schema violates the structural invariants.
    pub fn new(
        initial: FormSchema,
        templates: TemplateCatalog,
        toolbox: Toolbox,
    ) -> StoreResult<Self> {
        Ok(Self {
            store: FormStore::new(initial, templates)?,
            history: CommandHistory::new(),
            drag: DragCoordinator::new(),
            toolbox,
            on_save: None,
        })
    }

    /// Registers the callback invoked by [`FormBuilder::save`]
    pub fn with_on_save(mut self, callback: impl FnMut(&FormSchema) + 'static) -> Self {
        self.on_save = Some(Box::new(callback));
        self
    }

    // ---- read surface -------------------------------------------------

    pub fn schema(&self) -> &FormSchema {
        self.store.schema()
    }

    pub fn templates(&self) -> &TemplateCatalog {
        self.store.templates()
    }

    pub fn toolbox(&self) -> &Toolbox {
        &self.toolbox
    }

    pub fn get_field(&self, id: &str) -> Option<&FieldDef> {
        self.store.get_field(id)
    }

    pub fn snapshot_handle(&self) -> SnapshotHandle {
        self.store.snapshot_handle()
    }

    pub fn subscribe(&self, handler: Box<dyn StoreEventHandler>) {
        self.store.subscribe(handler);
    }

    // ---- mutation surface (recorded in the undo history) --------------

    pub fn add_field(&mut self, item: &ToolboxItem, at: Option<usize>) -> StoreResult<FieldId> {
        let field = self.store.spawn_field(item);
        let id = field.id.clone();
        self.history
            .execute(Command::AddField { field, at }, &mut self.store)?;
        Ok(id)
    }

    pub fn update_field(&mut self, id: &str, patch: FieldPatch) -> StoreResult<()> {
        self.history.execute(
            Command::UpdateField {
                id: id.to_string(),
                patch,
            },
            &mut self.store,
        )
    }

    pub fn remove_field(&mut self, id: &str) -> StoreResult<()> {
        self.history
            .execute(Command::RemoveField { id: id.to_string() }, &mut self.store)
    }

    pub fn move_field(&mut self, id: &str, to: usize) -> StoreResult<()> {
        self.history.execute(
            Command::MoveField {
                id: id.to_string(),
                to,
            },
            &mut self.store,
        )
    }

    pub fn apply_template(&mut self, template_id: &str, options: TemplateOptions) -> StoreResult<()> {
        self.history.execute(
            Command::ApplyTemplate {
                template_id: template_id.to_string(),
                options,
            },
            &mut self.store,
        )
    }

    // ---- undo/redo ----------------------------------------------------

    pub fn undo(&mut self) -> HistoryResult {
        self.history.undo(&mut self.store)
    }

    pub fn redo(&mut self) -> HistoryResult {
        self.history.redo(&mut self.store)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---- drag session -------------------------------------------------

    pub fn drag_start(&mut self, source: DragSource) -> bool {
        self.drag.drag_start(source)
    }

    pub fn drag_over(&mut self, target: Option<DropTarget>) {
        self.drag.drag_over(target)
    }

    /// The transient preview target, for the overlay
    pub fn drag_target(&self) -> Option<&DropTarget> {
        self.drag.current_target()
    }

    /// Ends the drag session; a committed drop goes through the undo
    /// history like any explicit mutation
    pub fn drag_end(&mut self) -> DragOutcome {
        let store = &mut self.store;
        let history = &mut self.history;
        self.drag.drag_end_with(|commit| match commit {
            DragCommit::Insert { item, at } => {
                let field = store.spawn_field(&item);
                let id = field.id.clone();
                history.execute(
                    Command::AddField {
                        field,
                        at: Some(at),
                    },
                    store,
                )?;
                Ok(id)
            }
            DragCommit::Move { field_id, to } => {
                history.execute(
                    Command::MoveField {
                        id: field_id.clone(),
                        to,
                    },
                    store,
                )?;
                Ok(field_id)
            }
        })
    }

    pub fn drag_cancel(&mut self) {
        self.drag.cancel()
    }

    // ---- save ---------------------------------------------------------

    /// Invokes the host's save callback with the current schema. This is
    /// the only path that calls it; mutations never do.
    pub fn save(&mut self) {
        if let Some(callback) = &mut self.on_save {
            callback(self.store.schema());
        }
        self.store.notify_saved();
    }
}
