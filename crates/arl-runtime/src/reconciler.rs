//! Scene reconciler: the only component allowed to mutate the live scene.
//!
//! On every relevant state change the reconciler rebuilds the whole scene
//! from the pure builder's output — rebuild, don't diff. Correctness over
//! efficiency: rebuild cost is bounded by the label count, which is tens,
//! not thousands. Unmet preconditions (host not ready, content not loaded)
//! are silent no-ops; the caller invokes `sync` again on the next change.

use crate::host::SceneHost;
use arl_core::model::{ContentItem, DisplayParams, Label};
use arl_core::scene::build_scene;

pub struct SceneReconciler<H: SceneHost> {
    host: H,
}

impl<H: SceneHost> SceneReconciler<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Rebuild the live scene from current state. Returns whether a scene
    /// was actually installed.
    pub fn sync(
        &mut self,
        content: Option<&ContentItem>,
        labels: &[Label],
        params: &DisplayParams,
    ) -> bool {
        if !self.host.is_ready() {
            log::debug!("scene host not ready; deferring rebuild");
            return false;
        }
        let Some(content) = content else {
            log::debug!("content not loaded; deferring rebuild");
            return false;
        };

        let scene = build_scene(content, labels, params);
        self.host.install(&scene);
        true
    }

    /// Remove the live scene entirely (navigation away, teardown).
    pub fn teardown(&mut self) {
        self.host.clear();
    }
}
