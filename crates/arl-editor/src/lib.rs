pub mod drag;
pub mod input;
pub mod store;

pub use drag::{DragController, DragEffect};
pub use input::{FrameState, LabelHit, PointerEvent};
pub use store::{AnnotationStore, PersistPayload, PersistRequest};
