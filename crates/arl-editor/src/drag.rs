//! Drag controller: pointer sequences → discrete position updates.
//!
//! A small state machine (Idle → Dragging → Idle) that converts
//! pointer-down/move/up into typed effects:
//!
//! - `LivePosition` while dragging — the live scene updates immediately,
//!   the annotation store does not.
//! - `Commit` exactly once on pointer-up — the only effect that reaches the
//!   store (and therefore the only one that schedules a persist).
//!
//! Moves with no valid ray–plane intersection, or while the marker is not
//! tracked, are silently skipped; the drag keeps waiting for the next valid
//! sample.

use crate::input::{FrameState, LabelHit, PointerEvent};
use arl_core::LabelId;
use arl_core::geometry::marker_plane;
use glam::Vec3;

/// An effect produced by the drag state machine, consumed by the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEffect {
    /// Move the node in the live scene only. Never persisted.
    LivePosition { id: LabelId, position: Vec3 },
    /// The drag ended; update the store and schedule one persist.
    Commit { id: LabelId, position: Vec3 },
}

/// The transient state between pointer-down on an editable node and the
/// matching pointer-up.
#[derive(Debug, Clone, Copy)]
struct DragSession {
    id: LabelId,
    /// Last-known position: the drag origin until the first valid
    /// intersection replaces it.
    position: Vec3,
}

/// Per-scene drag controller. At most one session is active at a time.
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// The label currently being dragged, if any.
    pub fn active_label(&self) -> Option<LabelId> {
        self.session.map(|s| s.id)
    }

    /// Feed one pointer event through the state machine.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        hit: Option<&LabelHit>,
        frame: &FrameState,
    ) -> Vec<DragEffect> {
        match event {
            PointerEvent::Down { .. } => {
                if let Some(hit) = hit
                    && hit.editable
                {
                    self.session = Some(DragSession {
                        id: hit.id,
                        position: hit.position,
                    });
                }
                vec![]
            }
            PointerEvent::Move { ndc_x, ndc_y } => {
                let Some(session) = self.session.as_mut() else {
                    return vec![];
                };
                if !frame.marker_visible {
                    return vec![];
                }
                let Some(ray) = frame.camera.ray_from_ndc(*ndc_x, *ndc_y) else {
                    return vec![];
                };
                match marker_plane().intersect(&ray) {
                    Some(point) => {
                        session.position = point;
                        vec![DragEffect::LivePosition {
                            id: session.id,
                            position: point,
                        }]
                    }
                    // Geometry miss: not an error, position unchanged.
                    None => vec![],
                }
            }
            PointerEvent::Up { .. } => match self.session.take() {
                Some(session) => vec![DragEffect::Commit {
                    id: session.id,
                    position: session.position,
                }],
                None => vec![],
            },
        }
    }

    /// Discard any active session without emitting a commit. Called on scene
    /// rebuild, edit-mode exit, and session teardown — no partial writes.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("drag of {} cancelled", session.id);
        }
    }
}
