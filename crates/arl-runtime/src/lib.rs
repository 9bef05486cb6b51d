pub mod api;
pub mod host;
pub mod reconciler;
pub mod session;
pub mod telemetry;

pub use api::{ApiClient, ApiError};
pub use host::SceneHost;
pub use reconciler::SceneReconciler;
pub use session::{SessionError, ViewerSession};
pub use telemetry::SessionTelemetry;
