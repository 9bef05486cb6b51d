pub mod geometry;
pub mod id;
pub mod model;
pub mod scene;

pub use geometry::{CameraTransform, Plane, Ray, marker_plane};
pub use id::LabelId;
pub use model::*;
pub use scene::{LabelRef, NodeKind, SceneDescription, SceneNode, build_scene};
