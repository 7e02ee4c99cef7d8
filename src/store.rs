//! The schema store: single source of truth for one [`FormSchema`].
//!
//! All reads and writes pass through the store. Every successful mutation
//! is atomic (apply-or-reject) and publishes exactly one immutable snapshot
//! to all subscribers; no consumer ever observes a partially applied
//! schema.

use log::{debug, info};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{StoreError, StoreResult};
use crate::event::{EventBus, StoreEvent, StoreEventHandler};
use crate::id::{generate_field_id, FieldId};
use crate::schema::{FieldDef, FieldPatch, FormSchema, Layout};
use crate::template::{self, TemplateCatalog, TemplateOptions};
use crate::toolbox::ToolboxItem;

/// Cloneable read handle over the latest published snapshot.
///
/// Consumers that do not subscribe to the bus poll this instead; a read
/// returns either the snapshot before or the snapshot after a mutation,
/// never an interleaving.
#[derive(Clone)]
pub struct SnapshotHandle {
    cell: Arc<RwLock<Arc<FormSchema>>>,
}

impl SnapshotHandle {
    pub fn latest(&self) -> Arc<FormSchema> {
        self.cell.read().clone()
    }
}

impl std::fmt::Debug for SnapshotHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotHandle")
            .field("schema_id", &self.latest().id)
            .finish()
    }
}

/// Owns one `FormSchema` value at a time and the template catalog used to
/// bulk-initialize it.
pub struct FormStore {
    schema: FormSchema,
    /// id -> position index, rebuilt after every mutation; `get_field`
    /// stays constant-time during high-frequency drag reads
    index: HashMap<FieldId, usize>,
    templates: TemplateCatalog,
    bus: EventBus,
    cell: Arc<RwLock<Arc<FormSchema>>>,
}

impl std::fmt::Debug for FormStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormStore")
            .field("schema_id", &self.schema.id)
            .field("fields", &self.schema.fields.len())
            .field("templates", &self.templates.len())
            .finish()
    }
}

impl FormStore {
    /// Creates a store around a host-supplied initial schema.
    ///
    /// The initial value is held to the same invariants as every later
    /// snapshot; a malformed schema (duplicate field ids, zero-column
    /// layout) is rejected before anything is published. Mutations
    /// preserve the invariants from there, so this is the only check.
    pub fn new(schema: FormSchema, templates: TemplateCatalog) -> StoreResult<Self> {
        schema
            .check_invariants()
            .map_err(StoreError::InvalidFieldState)?;
        let cell = Arc::new(RwLock::new(Arc::new(schema.clone())));
        let mut store = Self {
            schema,
            index: HashMap::new(),
            templates,
            bus: EventBus::new(),
            cell,
        };
        store.reindex();
        Ok(store)
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn templates(&self) -> &TemplateCatalog {
        &self.templates
    }

    /// Subscribe a handler to all store events
    pub fn subscribe(&self, handler: Box<dyn StoreEventHandler>) {
        self.bus.subscribe(handler);
    }

    pub fn snapshot_handle(&self) -> SnapshotHandle {
        SnapshotHandle {
            cell: self.cell.clone(),
        }
    }

    /// The latest published snapshot
    pub fn latest_snapshot(&self) -> Arc<FormSchema> {
        self.cell.read().clone()
    }

    /// Constant-time field lookup. Unknown ids return `None`, not an
    /// error.
    pub fn get_field(&self, id: &str) -> Option<&FieldDef> {
        self.index.get(id).map(|&pos| &self.schema.fields[pos])
    }

    /// Builds the concrete field a toolbox item spawns, with a fresh id
    /// and the type's default value. Does not mutate the store.
    pub fn spawn_field(&self, item: &ToolboxItem) -> FieldDef {
        match item {
            ToolboxItem::FieldType(def) => {
                let id = generate_field_id();
                // derive a name from the id suffix so spawned fields get
                // distinct data keys without enforcing uniqueness
                let name = format!("{}_{}", def.kind.as_str(), &id[id.len() - 6..]);
                FieldDef::new(id, name, def.kind, def.label.clone())
            }
            ToolboxItem::Preset(def) => {
                let mut field = def.prototype.clone();
                field.id = generate_field_id();
                field
            }
        }
    }

    /// Spawns a field from a toolbox item and inserts it at `at` (default:
    /// end). Returns the new field's id.
    pub fn add_field(&mut self, item: &ToolboxItem, at: Option<usize>) -> StoreResult<FieldId> {
        self.insert_field(self.spawn_field(item), at)
    }

    /// Inserts an already-built field. Used by `add_field` and by undo of
    /// a removal, where the original id must come back.
    pub fn insert_field(&mut self, field: FieldDef, at: Option<usize>) -> StoreResult<FieldId> {
        let max = self.schema.fields.len();
        let index = at.unwrap_or(max);
        if index > max {
            return Err(StoreError::InvalidInsertionIndex { index, max });
        }
        field.check().map_err(StoreError::InvalidFieldState)?;
        if self.index.contains_key(&field.id) {
            return Err(StoreError::InvalidFieldState(format!(
                "duplicate field id: {}",
                field.id
            )));
        }

        let id = field.id.clone();
        self.schema.fields.insert(index, field);
        self.reindex();
        info!("added field {id} at index {index}");
        self.publish(StoreEvent::FieldAdded {
            id: id.clone(),
            index,
        });
        Ok(id)
    }

    /// Applies a partial change set to one field. The patched field is
    /// validated as a whole before anything is committed.
    pub fn update_field(&mut self, id: &str, patch: &FieldPatch) -> StoreResult<()> {
        let pos = *self
            .index
            .get(id)
            .ok_or_else(|| StoreError::FieldNotFound(id.to_string()))?;

        let mut updated = self.schema.fields[pos].clone();
        patch.apply_to(&mut updated);
        updated.check().map_err(StoreError::InvalidFieldState)?;

        self.schema.fields[pos] = updated;
        debug!("updated field {id}");
        self.publish(StoreEvent::FieldUpdated { id: id.to_string() });
        Ok(())
    }

    /// Removes a field and closes the ordering gap; no tombstones remain
    pub fn remove_field(&mut self, id: &str) -> StoreResult<()> {
        let pos = *self
            .index
            .get(id)
            .ok_or_else(|| StoreError::FieldNotFound(id.to_string()))?;

        self.schema.fields.remove(pos);
        self.reindex();
        info!("removed field {id} from index {pos}");
        self.publish(StoreEvent::FieldRemoved {
            id: id.to_string(),
            index: pos,
        });
        Ok(())
    }

    /// Moves a field to a new final position in render order.
    ///
    /// `to` addresses the position after the move, so the valid range is
    /// `0..len`. Atomic: no observer sees the field missing or doubled.
    /// Moving a field onto its current position is not a mutation: the
    /// schema is unchanged and no event or snapshot is published.
    pub fn move_field(&mut self, id: &str, to: usize) -> StoreResult<()> {
        let from = *self
            .index
            .get(id)
            .ok_or_else(|| StoreError::FieldNotFound(id.to_string()))?;
        let max = self.schema.fields.len() - 1;
        if to > max {
            return Err(StoreError::InvalidInsertionIndex { index: to, max });
        }
        if from == to {
            return Ok(());
        }

        let field = self.schema.fields.remove(from);
        self.schema.fields.insert(to, field);
        self.reindex();
        debug!("moved field {id} from {from} to {to}");
        self.publish(StoreEvent::FieldMoved {
            id: id.to_string(),
            from,
            to,
        });
        Ok(())
    }

    /// Atomically replaces the field set (and optionally layout) with a
    /// template's definition, assigning fresh ids so externally held field
    /// references never collide with the new set.
    pub fn apply_template(
        &mut self,
        template_id: &str,
        options: &TemplateOptions,
    ) -> StoreResult<()> {
        let template = self
            .templates
            .get(template_id)
            .ok_or_else(|| StoreError::TemplateNotFound(template_id.to_string()))?
            .clone();
        template::validate(&template, options)?;

        let fields: Vec<FieldDef> = template
            .fields
            .into_iter()
            .map(|mut field| {
                field.id = generate_field_id();
                field
            })
            .collect();

        if options.replace_layout {
            if let Some(layout) = template.layout {
                self.schema.layout = layout;
            }
        }
        self.schema.fields = fields;
        self.reindex();
        info!(
            "applied template {template_id}: {} fields",
            self.schema.fields.len()
        );
        self.publish(StoreEvent::TemplateApplied {
            template_id: template_id.to_string(),
        });
        Ok(())
    }

    /// Restores a previously captured field set and layout wholesale; the
    /// compensating mutation for a template application.
    pub fn restore_fields(&mut self, fields: Vec<FieldDef>, layout: Layout) -> StoreResult<()> {
        layout.check().map_err(StoreError::InvalidFieldState)?;
        let mut seen = HashSet::new();
        for field in &fields {
            field.check().map_err(StoreError::InvalidFieldState)?;
            if !seen.insert(field.id.as_str()) {
                return Err(StoreError::InvalidFieldState(format!(
                    "duplicate field id: {}",
                    field.id
                )));
            }
        }

        self.schema.layout = layout;
        self.schema.fields = fields;
        self.reindex();
        info!("restored {} fields", self.schema.fields.len());
        self.publish(StoreEvent::FieldsRestored);
        Ok(())
    }

    /// Emits `SchemaSaved` after the host's save callback ran
    pub(crate) fn notify_saved(&self) {
        self.bus.emit(&StoreEvent::SchemaSaved);
    }

    fn reindex(&mut self) {
        self.index = self
            .schema
            .fields
            .iter()
            .enumerate()
            .map(|(pos, field)| (field.id.clone(), pos))
            .collect();
    }

    /// Publishes the fine-grained event and then the new snapshot. Called
    /// exactly once per successful mutation.
    fn publish(&mut self, event: StoreEvent) {
        let snapshot = Arc::new(self.schema.clone());
        *self.cell.write() = snapshot.clone();
        self.bus.emit(&event);
        self.bus.emit(&StoreEvent::SnapshotPublished(snapshot));
    }
}
