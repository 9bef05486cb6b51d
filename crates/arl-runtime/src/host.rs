//! The boundary to the external 3D/AR runtime.
//!
//! The runtime owns marker detection, camera-feed compositing, and
//! rendering; this crate only hands it declarative scene descriptions and
//! reads back tracking state. Readiness is an explicit signal (`is_ready`),
//! not a delay: the reconciler simply no-ops until the host reports ready
//! and the caller retries on the next state change.

use arl_core::LabelId;
use arl_core::geometry::CameraTransform;
use arl_core::scene::SceneDescription;
use glam::Vec3;

pub trait SceneHost {
    /// Whether the runtime has finished initializing and can accept scenes.
    fn is_ready(&self) -> bool;

    /// Whether the fiducial marker is currently detected in the camera feed.
    fn marker_visible(&self) -> bool;

    /// The active camera's view-projection transform.
    fn camera(&self) -> CameraTransform;

    /// Replace the live scene with a freshly built description
    /// (full teardown + rebuild).
    fn install(&mut self, scene: &SceneDescription);

    /// Tear the live scene down without a replacement.
    fn clear(&mut self);

    /// Move one label node in the live scene without a rebuild — used for
    /// per-frame drag feedback, never for committed state.
    fn set_label_position(&mut self, id: LabelId, position: Vec3);
}
