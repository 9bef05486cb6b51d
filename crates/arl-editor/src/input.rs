//! Input abstraction layer.
//!
//! The AR runtime reports raw pointer events in normalized device
//! coordinates plus, per event, a snapshot of the camera transform and the
//! marker's visibility. Everything here is plain data; interpretation
//! belongs to the drag controller.

use arl_core::LabelId;
use arl_core::geometry::CameraTransform;
use glam::Vec3;

/// A normalized pointer event from the AR runtime.
///
/// Coordinates are NDC: x, y in [-1, 1], y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed (mouse down, touch start).
    Down { ndc_x: f32, ndc_y: f32 },

    /// Pointer moved.
    Move { ndc_x: f32, ndc_y: f32 },

    /// Pointer released.
    Up { ndc_x: f32, ndc_y: f32 },
}

/// Per-event snapshot of the AR runtime's tracking state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub camera: CameraTransform,
    /// Whether the fiducial marker is currently detected. Drag moves while
    /// the marker is lost are ignored.
    pub marker_visible: bool,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            camera: CameraTransform::default(),
            marker_visible: true,
        }
    }
}

/// The scene node a pointer-down landed on, resolved by the surrounding
/// layer from the runtime's pick result and the annotation store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelHit {
    pub id: LabelId,
    /// The label's current position — becomes the drag origin.
    pub position: Vec3,
    /// Mirrors the node's editable metadata; non-editable hits never start
    /// a drag.
    pub editable: bool,
}
