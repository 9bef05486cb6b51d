//! Session telemetry: view duration, reported once at teardown.

use std::time::{Duration, Instant};

/// Sessions shorter than this are noise (mis-taps, instant back-outs) and
/// are not reported.
pub const MIN_REPORTED_SESSION: Duration = Duration::from_secs(5);

/// Wall-clock span of one viewing session for a content item.
#[derive(Debug, Clone)]
pub struct SessionTelemetry {
    content_id: String,
    started: Instant,
}

impl SessionTelemetry {
    pub fn start(content_id: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            started: Instant::now(),
        }
    }

    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// End the session. Returns the duration in seconds to report, or
    /// `None` when the session was too short to bother the service with.
    pub fn finish(self) -> Option<f64> {
        let elapsed = self.elapsed();
        (elapsed > MIN_REPORTED_SESSION).then(|| elapsed.as_secs_f64())
    }
}
