//! Annotation store: the single source of truth for a content item's
//! labels and layers during a viewing session.
//!
//! Every mutation is optimistic: the in-memory list is replaced first, then
//! the whole affected collection is handed back as a [`PersistRequest`] for
//! the caller to ship to the service. The store never waits on, retries, or
//! rolls back a write — a failed persist leaves local and remote state
//! diverged until the next successful one (accepted policy, see DESIGN.md).

use arl_core::model::{ContentItem, Label, Layer};
use arl_core::LabelId;
use glam::Vec3;
use serde::Serialize;

/// Which collection a mutation touched. The service takes partial updates,
/// so each request carries the full new collection, nothing else.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PersistPayload {
    Labels(Vec<Label>),
    Layers(Vec<Layer>),
}

/// One scheduled remote write, keyed by the owning content item.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistRequest {
    pub content_id: String,
    pub payload: PersistPayload,
}

/// In-memory label/layer state for the loaded content item.
pub struct AnnotationStore {
    content_id: String,
    labels: Vec<Label>,
    layers: Vec<Layer>,
    selected: Option<LabelId>,
}

impl AnnotationStore {
    /// Take ownership of the fetched item's annotation state.
    pub fn new(content: &ContentItem) -> Self {
        Self {
            content_id: content.id.clone(),
            labels: content.labels.clone(),
            layers: content.layers.clone(),
            selected: None,
        }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn get(&self, id: LabelId) -> Option<&Label> {
        self.labels.iter().find(|l| l.id == id)
    }

    /// The label currently selected for text editing, if any.
    pub fn selected(&self) -> Option<&Label> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Select a label (e.g. the user tapped it). Unknown ids clear the
    /// selection rather than keeping a dangling one.
    pub fn select(&mut self, id: LabelId) {
        self.selected = self.get(id).map(|l| l.id);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Append a placeholder label and select it for editing.
    pub fn add_label(&mut self) -> PersistRequest {
        let label = Label::placeholder();
        self.selected = Some(label.id);
        self.labels.push(label);
        self.persist_labels()
    }

    /// Replace the selected label's text. Empty text or no selection is a
    /// local no-op (rejected before any network call). Clears the selection
    /// on success.
    pub fn update_label_text(&mut self, text: &str) -> Option<PersistRequest> {
        if text.is_empty() {
            return None;
        }
        let id = self.selected?;
        let label = self.labels.iter_mut().find(|l| l.id == id)?;
        label.text = text.to_string();
        self.selected = None;
        Some(self.persist_labels())
    }

    /// Replace a label's position — the drag controller's terminal commit.
    pub fn move_label(&mut self, id: LabelId, position: Vec3) -> Option<PersistRequest> {
        let label = self.labels.iter_mut().find(|l| l.id == id)?;
        label.position = position;
        Some(self.persist_labels())
    }

    /// Remove a label, clearing the selection if it pointed at it.
    pub fn delete_label(&mut self, id: LabelId) -> Option<PersistRequest> {
        let before = self.labels.len();
        self.labels.retain(|l| l.id != id);
        if self.labels.len() == before {
            return None;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.persist_labels())
    }

    /// Flip one layer's visibility. Out-of-range indices are a no-op.
    pub fn set_layer_visible(&mut self, index: usize, visible: bool) -> Option<PersistRequest> {
        let layer = self.layers.get_mut(index)?;
        layer.visible = visible;
        Some(PersistRequest {
            content_id: self.content_id.clone(),
            payload: PersistPayload::Layers(self.layers.clone()),
        })
    }

    fn persist_labels(&self) -> PersistRequest {
        PersistRequest {
            content_id: self.content_id.clone(),
            payload: PersistPayload::Labels(self.labels.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arl_core::model::ContentSource;
    use pretty_assertions::assert_eq;

    fn content(labels: Vec<Label>, layers: Vec<Layer>) -> ContentItem {
        ContentItem {
            id: "content-1".into(),
            title: "Brain".into(),
            source: ContentSource::Model {
                url: "https://cdn.example/brain.glb".into(),
            },
            labels,
            layers,
        }
    }

    fn label(id: &str, text: &str) -> Label {
        Label {
            id: LabelId::intern(id),
            text: text.into(),
            position: Vec3::ZERO,
            target: None,
        }
    }

    #[test]
    fn add_label_appends_placeholder_and_selects_it() {
        // Scenario: two existing labels, then add.
        let mut store = AnnotationStore::new(&content(
            vec![label("a", "Cortex"), label("b", "Stem")],
            vec![],
        ));

        let request = store.add_label();
        assert_eq!(store.labels().len(), 3);

        let added = &store.labels()[2];
        assert_eq!(added.text, "New Label");
        assert_eq!(added.position, Vec3::new(0.0, 0.5, 0.1));
        assert_eq!(store.selected().map(|l| l.id), Some(added.id));

        // Persist carries the full new list.
        assert_eq!(request.content_id, "content-1");
        match request.payload {
            PersistPayload::Labels(labels) => assert_eq!(labels.len(), 3),
            _ => panic!("expected a labels payload"),
        }
    }

    #[test]
    fn update_text_requires_selection_and_nonempty_text() {
        let mut store = AnnotationStore::new(&content(vec![label("a", "Cortex")], vec![]));

        // No selection → no-op, nothing persisted.
        assert_eq!(store.update_label_text("Motor cortex"), None);

        store.select(LabelId::intern("a"));
        assert_eq!(store.update_label_text(""), None);
        assert_eq!(store.labels()[0].text, "Cortex");

        let request = store.update_label_text("Motor cortex");
        assert!(request.is_some());
        assert_eq!(store.labels()[0].text, "Motor cortex");
        // Selection is consumed by a successful edit.
        assert!(store.selected().is_none());
    }

    #[test]
    fn delete_selected_label_clears_selection() {
        let mut store = AnnotationStore::new(&content(
            vec![label("a", "Cortex"), label("b", "Stem")],
            vec![],
        ));
        let id = LabelId::intern("a");
        store.select(id);

        let request = store.delete_label(id).unwrap();
        assert_eq!(store.labels().len(), 1);
        assert!(store.get(id).is_none());
        assert!(store.selected().is_none());
        match request.payload {
            PersistPayload::Labels(labels) => {
                assert_eq!(labels.len(), 1);
                assert_eq!(labels[0].id, LabelId::intern("b"));
            }
            _ => panic!("expected a labels payload"),
        }
    }

    #[test]
    fn delete_unselected_label_keeps_selection() {
        let mut store = AnnotationStore::new(&content(
            vec![label("a", "Cortex"), label("b", "Stem")],
            vec![],
        ));
        store.select(LabelId::intern("b"));
        store.delete_label(LabelId::intern("a")).unwrap();
        assert_eq!(store.selected().map(|l| l.text.as_str()), Some("Stem"));
    }

    #[test]
    fn move_label_replaces_position() {
        let mut store = AnnotationStore::new(&content(vec![label("a", "Cortex")], vec![]));
        let request = store
            .move_label(LabelId::intern("a"), Vec3::new(1.5, 0.0, 0.2))
            .unwrap();
        assert_eq!(store.labels()[0].position, Vec3::new(1.5, 0.0, 0.2));
        assert!(matches!(request.payload, PersistPayload::Labels(_)));

        // Unknown ids mutate nothing and schedule nothing.
        assert_eq!(store.move_label(LabelId::intern("ghost"), Vec3::ONE), None);
    }

    #[test]
    fn layer_toggle_persists_full_layer_list() {
        let layers = vec![
            Layer {
                name: "Bones".into(),
                visible: true,
            },
            Layer {
                name: "Muscles".into(),
                visible: true,
            },
        ];
        let mut store = AnnotationStore::new(&content(vec![], layers));

        let request = store.set_layer_visible(1, false).unwrap();
        assert!(!store.layers()[1].visible);
        match request.payload {
            PersistPayload::Layers(layers) => {
                assert!(layers[0].visible);
                assert!(!layers[1].visible);
            }
            _ => panic!("expected a layers payload"),
        }

        assert_eq!(store.set_layer_visible(5, true), None);
    }

    #[test]
    fn selecting_unknown_label_clears_selection() {
        let mut store = AnnotationStore::new(&content(vec![label("a", "Cortex")], vec![]));
        store.select(LabelId::intern("a"));
        store.select(LabelId::intern("missing"));
        assert!(store.selected().is_none());
    }
}
