//! Drag/drop reorder coordinator.
//!
//! Bridges an external, event-driven drag session to store mutations
//! through a strict state machine:
//!
//! ```text
//! Idle -> Dragging(source, over) -> { Committed | Cancelled } -> Idle
//! ```
//!
//! Drag-over events only update the transient preview target; the store is
//! touched exactly once, at commit. A drag-end with no valid target, an
//! explicit cancellation, or a failing store mutation (stale id after a
//! concurrent removal) all degrade to a silent cancellation.

use log::debug;

use crate::error::StoreResult;
use crate::id::FieldId;
use crate::store::FormStore;
use crate::toolbox::ToolboxItem;

/// Where a drag originated; the payload tag distinguishes spawning a new
/// field from reordering an existing one.
#[derive(Debug, Clone)]
pub enum DragSource {
    /// Dragging a palette item onto the canvas
    Toolbox { item: ToolboxItem },
    /// Dragging an existing canvas field to a new slot
    Canvas {
        field_id: FieldId,
        source_index: usize,
    },
}

/// The container and insertion slot currently under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub container: String,
    /// Insertion slot in `0..=len(fields)`
    pub index: usize,
}

/// The single store mutation a committed drag resolves to.
#[derive(Debug, Clone)]
pub enum DragCommit {
    Insert { item: ToolboxItem, at: usize },
    Move { field_id: FieldId, to: usize },
}

/// The possible states of a drag session.
#[derive(Debug, Clone, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: DragSource,
        /// Live preview target; rendered by the overlay, never by the
        /// store
        over: Option<DropTarget>,
    },
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }
}

/// How a drag session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Exactly one store mutation was applied
    Committed { field_id: FieldId },
    /// No store mutation occurred
    Cancelled,
}

/// Translates drag-start/over/end events into ordered-mutation intents.
///
/// At most one session is active; a drag-start during an active session is
/// rejected and the existing session stays authoritative.
#[derive(Debug, Default)]
pub struct DragCoordinator {
    state: DragState,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// The transient preview target, for the overlay
    pub fn current_target(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Dragging { over, .. } => over.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Begin a drag session. Returns false (and leaves the current
    /// session untouched) when one is already active.
    pub fn drag_start(&mut self, source: DragSource) -> bool {
        if self.state.is_dragging() {
            debug!("drag-start ignored: a session is already active");
            return false;
        }
        debug!("drag session started: {source:?}");
        self.state = DragState::Dragging { source, over: None };
        true
    }

    /// Update the preview target from a drag-over event. No-op while idle.
    pub fn drag_over(&mut self, target: Option<DropTarget>) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = target;
        }
    }

    /// End the session, committing against the store. Store failures are
    /// swallowed into a cancellation.
    pub fn drag_end(&mut self, store: &mut FormStore) -> DragOutcome {
        self.drag_end_with(|commit| match commit {
            DragCommit::Insert { item, at } => store.add_field(&item, Some(at)),
            DragCommit::Move { field_id, to } => {
                store.move_field(&field_id, to).map(|_| field_id)
            }
        })
    }

    /// End the session, handing the resolved mutation intent to `commit`.
    /// Used by hosts that route mutations through an undo history.
    pub fn drag_end_with(
        &mut self,
        commit: impl FnOnce(DragCommit) -> StoreResult<FieldId>,
    ) -> DragOutcome {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { source, over } = state else {
            return DragOutcome::Cancelled;
        };
        let Some(target) = over else {
            debug!("drag ended with no valid target, cancelling");
            return DragOutcome::Cancelled;
        };

        let intent = match source {
            DragSource::Toolbox { item } => DragCommit::Insert {
                item,
                at: target.index,
            },
            DragSource::Canvas {
                field_id,
                source_index,
            } => {
                // the slot index counts a list that still contains the
                // dragged field; account for the gap it leaves behind
                let to = if target.index > source_index {
                    target.index - 1
                } else {
                    target.index
                };
                DragCommit::Move { field_id, to }
            }
        };

        match commit(intent) {
            Ok(field_id) => DragOutcome::Committed { field_id },
            Err(err) => {
                debug!("drag commit failed, cancelling: {err}");
                DragOutcome::Cancelled
            }
        }
    }

    /// Cancel the session without touching the store
    pub fn cancel(&mut self) {
        if self.state.is_dragging() {
            debug!("drag session cancelled");
        }
        self.state = DragState::Idle;
    }
}

/// Resolve the insertion slot whose midpoint is closest to the pointer
/// along the primary axis. On an exact tie the lower slot wins, so the
/// result is deterministic. Returns `None` for an empty slot list.
pub fn resolve_slot(pointer: f32, slot_midpoints: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (slot, &midpoint) in slot_midpoints.iter().enumerate() {
        let distance = (pointer - midpoint).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((slot, distance)),
        }
    }
    best.map(|(slot, _)| slot)
}
