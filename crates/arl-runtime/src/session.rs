//! Viewer session: glue between the annotation store, drag controller,
//! reconciler, and the remote service.
//!
//! All state transitions run on one logical task; the only suspension
//! points are network calls. Persist writes are fire-and-forget: spawned,
//! logged on failure, never retried and never rolled back — in-memory state
//! is the truth the UI renders, and the remote store catches up on the next
//! successful write. Writes may complete out of order relative to each
//! other; that divergence window is an accepted policy (see DESIGN.md).

use crate::api::{ApiClient, ApiError};
use crate::host::SceneHost;
use crate::reconciler::SceneReconciler;
use crate::telemetry::SessionTelemetry;
use arl_core::LabelId;
use arl_core::model::{ContentItem, DisplayParams};
use arl_editor::drag::{DragController, DragEffect};
use arl_editor::input::{FrameState, LabelHit, PointerEvent};
use arl_editor::store::{AnnotationStore, PersistRequest};
use glam::Vec3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The content fetch failed; no scene is built. The user may navigate
    /// away — nothing else in the session is usable.
    #[error("failed to load content: {0}")]
    Load(#[from] ApiError),
}

/// One user's viewing session for one content item.
///
/// Must run inside a tokio runtime (persist tasks are spawned onto it).
pub struct ViewerSession<H: SceneHost> {
    client: ApiClient,
    reconciler: SceneReconciler<H>,
    drag: DragController,
    content: Option<ContentItem>,
    store: Option<AnnotationStore>,
    params: DisplayParams,
    telemetry: Option<SessionTelemetry>,
}

impl<H: SceneHost> ViewerSession<H> {
    pub fn new(client: ApiClient, host: H) -> Self {
        Self {
            client,
            reconciler: SceneReconciler::new(host),
            drag: DragController::new(),
            content: None,
            store: None,
            params: DisplayParams::default(),
            telemetry: None,
        }
    }

    pub fn params(&self) -> &DisplayParams {
        &self.params
    }

    pub fn content(&self) -> Option<&ContentItem> {
        self.content.as_ref()
    }

    pub fn store(&self) -> Option<&AnnotationStore> {
        self.store.as_ref()
    }

    pub fn host(&self) -> &H {
        self.reconciler.host()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.reconciler.host_mut()
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Fetch the content item and build the initial scene.
    pub async fn load(&mut self, id: &str) -> Result<(), SessionError> {
        let content = self.client.fetch_content(id).await?;
        self.install_content(content);

        // Count the view; failures don't affect the session.
        let client = self.client.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            if let Err(err) = client.record_view(&id).await {
                log::warn!("failed to record view of {id}: {err}");
            }
        });

        Ok(())
    }

    /// Adopt an already-fetched content item: seed the store, start
    /// telemetry, build the initial scene.
    pub fn install_content(&mut self, content: ContentItem) {
        self.store = Some(AnnotationStore::new(&content));
        self.telemetry = Some(SessionTelemetry::start(content.id.clone()));
        self.content = Some(content);
        self.rebuild();
    }

    /// End the session: discard any drag, tear the scene down, report the
    /// view duration.
    pub fn close(&mut self) {
        self.drag.cancel();
        self.reconciler.teardown();

        if let Some(telemetry) = self.telemetry.take() {
            let content_id = telemetry.content_id().to_string();
            if let Some(seconds) = telemetry.finish() {
                let client = self.client.clone();
                tokio::spawn(async move {
                    if let Err(err) = client.record_duration(&content_id, seconds).await {
                        log::warn!("failed to record duration for {content_id}: {err}");
                    }
                });
            }
        }
    }

    // ─── Display controls ────────────────────────────────────────────────

    pub fn set_scale(&mut self, scale: f32) {
        self.params.set_scale(scale);
        self.rebuild();
    }

    pub fn zoom_in(&mut self) {
        self.params.zoom_in();
        self.rebuild();
    }

    pub fn zoom_out(&mut self) {
        self.params.zoom_out();
        self.rebuild();
    }

    pub fn set_rotation_speed(&mut self, speed: f32) {
        self.params.set_rotation_speed(speed);
        self.rebuild();
    }

    pub fn set_show_labels(&mut self, show: bool) {
        self.params.show_labels = show;
        self.rebuild();
    }

    /// Entering or leaving edit mode clears the selection; the rebuild also
    /// discards any drag in progress without committing it.
    pub fn set_edit_mode(&mut self, edit: bool) {
        self.params.edit_mode = edit;
        if let Some(store) = self.store.as_mut() {
            store.clear_selection();
        }
        self.rebuild();
    }

    /// Force a scene rebuild with unchanged state.
    pub fn reset_view(&mut self) {
        self.rebuild();
    }

    // ─── Label operations ────────────────────────────────────────────────

    pub fn add_label(&mut self) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let request = store.add_label();
        self.finish_mutation(Some(request));
    }

    pub fn submit_label_text(&mut self, text: &str) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let request = store.update_label_text(text);
        self.finish_mutation(request);
    }

    pub fn delete_label(&mut self, id: LabelId) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let request = store.delete_label(id);
        self.finish_mutation(request);
    }

    pub fn set_layer_visible(&mut self, index: usize, visible: bool) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let request = store.set_layer_visible(index, visible);
        // Layer visibility doesn't feed the scene; persist without rebuild.
        self.schedule_persist(request);
    }

    /// The user tapped a label (runtime click event routed by id).
    pub fn select_label(&mut self, id: LabelId) {
        if let Some(store) = self.store.as_mut() {
            store.select(id);
        }
    }

    pub fn clear_selection(&mut self) {
        if let Some(store) = self.store.as_mut() {
            store.clear_selection();
        }
    }

    // ─── Pointer routing ─────────────────────────────────────────────────

    /// Pointer pressed; `hit` is the label node the runtime's pick found
    /// under the pointer, if any.
    pub fn pointer_down(&mut self, ndc_x: f32, ndc_y: f32, hit: Option<LabelId>) {
        let hit = hit.and_then(|id| self.resolve_hit(id));
        let frame = self.frame();
        let effects = self
            .drag
            .handle(&PointerEvent::Down { ndc_x, ndc_y }, hit.as_ref(), &frame);
        self.apply_effects(effects);
    }

    pub fn pointer_move(&mut self, ndc_x: f32, ndc_y: f32) {
        let frame = self.frame();
        let effects = self
            .drag
            .handle(&PointerEvent::Move { ndc_x, ndc_y }, None, &frame);
        self.apply_effects(effects);
    }

    pub fn pointer_up(&mut self, ndc_x: f32, ndc_y: f32) {
        let frame = self.frame();
        let effects = self
            .drag
            .handle(&PointerEvent::Up { ndc_x, ndc_y }, None, &frame);
        self.apply_effects(effects);
    }

    fn resolve_hit(&self, id: LabelId) -> Option<LabelHit> {
        let label = self.store.as_ref()?.get(id)?;
        Some(LabelHit {
            id,
            position: label.position,
            editable: self.params.edit_mode,
        })
    }

    fn frame(&self) -> FrameState {
        let host = self.reconciler.host();
        FrameState {
            camera: host.camera(),
            marker_visible: host.marker_visible(),
        }
    }

    fn apply_effects(&mut self, effects: Vec<DragEffect>) {
        for effect in effects {
            match effect {
                DragEffect::LivePosition { id, position } => {
                    // Render feedback only — the store is untouched until
                    // the drag commits.
                    self.reconciler.host_mut().set_label_position(id, position);
                }
                DragEffect::Commit { id, position } => {
                    self.commit_move(id, position);
                }
            }
        }
    }

    fn commit_move(&mut self, id: LabelId, position: Vec3) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let request = store.move_label(id, position);
        self.finish_mutation(request);
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Rebuild after a store mutation and ship the scheduled write.
    fn finish_mutation(&mut self, request: Option<PersistRequest>) {
        if request.is_none() {
            return;
        }
        self.rebuild();
        self.schedule_persist(request);
    }

    /// Fire-and-forget remote write. Failures are logged, not surfaced, not
    /// retried; local state is never rolled back.
    fn schedule_persist(&self, request: Option<PersistRequest>) {
        let Some(request) = request else {
            return;
        };
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(err) = client.persist(&request).await {
                log::warn!("failed to persist {}: {err}", request.content_id);
            }
        });
    }

    /// Tear down and rebuild the live scene from current state. Any drag in
    /// progress is discarded first so a stale session can't write into the
    /// new scene.
    fn rebuild(&mut self) {
        self.drag.cancel();
        let labels = self.store.as_ref().map(|s| s.labels()).unwrap_or(&[]);
        self.reconciler
            .sync(self.content.as_ref(), labels, &self.params);
    }
}
