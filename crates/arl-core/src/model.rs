//! Domain model for AR-annotated content.
//!
//! A `ContentItem` is the unit a viewing session operates on: a 2D image or
//! a 3D model placed on a fiducial marker, plus the text labels and layers
//! attached to it. Wire records arriving from the persistence service carry
//! several optional fields; they are resolved exactly once at load time into
//! the sum-typed domain values here, so downstream code never re-checks them.

use crate::id::LabelId;
use glam::Vec3;
use serde::{Deserialize, Serialize};

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
}

// ─── Wire position encoding ──────────────────────────────────────────────

/// Serde adapter: the service encodes positions as `{"x": …, "y": …, "z": …}`
/// objects rather than arrays.
pub(crate) mod vec3_xyz {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Xyz {
        x: f32,
        y: f32,
        z: f32,
    }

    pub fn serialize<S: Serializer>(v: &Vec3, serializer: S) -> Result<S::Ok, S::Error> {
        Xyz {
            x: v.x,
            y: v.y,
            z: v.z,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec3, D::Error> {
        let p = Xyz::deserialize(deserializer)?;
        Ok(Vec3::new(p.x, p.y, p.z))
    }
}

/// Like [`vec3_xyz`] but for optional positions (`targetPosition`).
pub(crate) mod vec3_xyz_opt {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Xyz {
        x: f32,
        y: f32,
        z: f32,
    }

    pub fn serialize<S: Serializer>(v: &Option<Vec3>, serializer: S) -> Result<S::Ok, S::Error> {
        v.map(|v| Xyz {
            x: v.x,
            y: v.y,
            z: v.z,
        })
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec3>, D::Error> {
        let p = Option::<Xyz>::deserialize(deserializer)?;
        Ok(p.map(|p| Vec3::new(p.x, p.y, p.z)))
    }
}

// ─── Labels & layers ─────────────────────────────────────────────────────

/// A positioned text annotation attached to the content.
///
/// `target` is the optional anatomical point a connector line is drawn to;
/// absent means no connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    #[serde(rename = "_id")]
    pub id: LabelId,
    pub text: String,
    #[serde(with = "vec3_xyz")]
    pub position: Vec3,
    #[serde(
        rename = "targetPosition",
        default,
        skip_serializing_if = "Option::is_none",
        with = "vec3_xyz_opt"
    )]
    pub target: Option<Vec3>,
}

impl Label {
    /// The label a user gets when pressing "add": placeholder text, floated
    /// slightly in front of and above the marker origin.
    pub fn placeholder() -> Self {
        Self {
            id: LabelId::fresh(),
            text: "New Label".to_string(),
            position: Vec3::new(0.0, 0.5, 0.1),
            target: None,
        }
    }
}

fn default_visible() -> bool {
    true
}

/// A named layer of the content item. Identified by list index; only its
/// visibility flag is ever mutated. An absent `visible` on the wire means
/// visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

// ─── Content ─────────────────────────────────────────────────────────────

/// The render source of a content item: exactly one of a 3D model or a flat
/// image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentSource {
    Model { url: String },
    Image { url: String },
}

/// A content item as the viewer owns it for the duration of a session:
/// fetched once on entry, afterwards only patched locally and remotely.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub source: ContentSource,
    pub layers: Vec<Layer>,
    pub labels: Vec<Label>,
}

/// Raw content record as the service returns it. `modelUrl` and `url` are
/// both optional on the wire; [`ContentRecord::resolve`] turns them into the
/// sum-typed [`ContentSource`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub model_url: Option<String>,
    #[serde(default)]
    pub labels: Option<Vec<Label>>,
    #[serde(default)]
    pub layers: Option<Vec<Layer>>,
}

impl ContentRecord {
    /// Resolve the wire record's optionals into a [`ContentItem`].
    ///
    /// A model URL takes precedence over an image URL when both are present
    /// (a malformed record — logged). A record with neither is unrenderable
    /// and rejected.
    pub fn resolve(self) -> Result<ContentItem, String> {
        let source = match (self.model_url, self.url) {
            (Some(model), Some(_)) => {
                log::warn!(
                    "content {} has both a model and an image url; using the model",
                    self.id
                );
                ContentSource::Model { url: model }
            }
            (Some(model), None) => ContentSource::Model { url: model },
            (None, Some(image)) => ContentSource::Image { url: image },
            (None, None) => {
                return Err(format!("content {} has no render source", self.id));
            }
        };

        Ok(ContentItem {
            id: self.id,
            title: self.title,
            source,
            layers: self.layers.unwrap_or_default(),
            labels: self.labels.unwrap_or_default(),
        })
    }
}

// ─── Display parameters ──────────────────────────────────────────────────

/// Smallest user-facing adjustment step for speed and scale sliders.
pub const ADJUST_STEP: f32 = 0.1;
pub const SCALE_MIN: f32 = 0.5;
pub const SCALE_MAX: f32 = 3.0;
pub const ROTATION_SPEED_MAX: f32 = 2.0;

/// Process-local display state for the viewer. Not persisted; reset when
/// the user navigates away.
///
/// Clamping happens here, on the setters — the scene builder treats the
/// stored values as already valid and applies them verbatim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayParams {
    pub rotation_speed: f32,
    pub scale: f32,
    pub show_labels: bool,
    pub edit_mode: bool,
}

impl Default for DisplayParams {
    fn default() -> Self {
        Self {
            rotation_speed: 1.0,
            scale: 1.0,
            show_labels: true,
            edit_mode: false,
        }
    }
}

impl DisplayParams {
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.clamp(SCALE_MIN, SCALE_MAX);
    }

    pub fn set_rotation_speed(&mut self, speed: f32) {
        self.rotation_speed = speed.clamp(0.0, ROTATION_SPEED_MAX);
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale + ADJUST_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale - ADJUST_STEP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn record_resolves_model_over_image() {
        let record = ContentRecord {
            id: "c1".into(),
            title: "Skull".into(),
            url: Some("https://cdn.example/skull.png".into()),
            model_url: Some("https://cdn.example/skull.glb".into()),
            labels: None,
            layers: None,
        };
        let item = record.resolve().unwrap();
        assert_eq!(
            item.source,
            ContentSource::Model {
                url: "https://cdn.example/skull.glb".into()
            }
        );
        assert!(item.labels.is_empty());
        assert!(item.layers.is_empty());
    }

    #[test]
    fn record_without_source_is_rejected() {
        let record = ContentRecord {
            id: "c2".into(),
            title: "Empty".into(),
            url: None,
            model_url: None,
            labels: None,
            layers: None,
        };
        assert!(record.resolve().is_err());
    }

    #[test]
    fn label_wire_roundtrip() {
        let json = r#"{
            "_id": "lbl-7",
            "text": "Temporal lobe",
            "position": { "x": 0.4, "y": 0.1, "z": 0.0 },
            "targetPosition": { "x": 0.2, "y": 0.0, "z": 0.0 }
        }"#;
        let label: Label = serde_json::from_str(json).unwrap();
        assert_eq!(label.id, LabelId::intern("lbl-7"));
        assert_eq!(label.position, Vec3::new(0.4, 0.1, 0.0));
        assert_eq!(label.target, Some(Vec3::new(0.2, 0.0, 0.0)));

        let back = serde_json::to_value(&label).unwrap();
        assert_eq!(back["position"]["x"], 0.4);
        assert_eq!(back["targetPosition"]["y"], 0.0);
    }

    #[test]
    fn label_without_target_omits_field() {
        let label = Label {
            id: LabelId::intern("lbl-8"),
            text: "Frontal".into(),
            position: Vec3::ZERO,
            target: None,
        };
        let value = serde_json::to_value(&label).unwrap();
        assert!(value.get("targetPosition").is_none());
    }

    #[test]
    fn layer_visible_defaults_true() {
        let layer: Layer = serde_json::from_str(r#"{ "name": "Muscles" }"#).unwrap();
        assert!(layer.visible);
        let layer: Layer =
            serde_json::from_str(r#"{ "name": "Bones", "visible": false }"#).unwrap();
        assert!(!layer.visible);
    }

    #[test]
    fn params_clamp_on_setters() {
        let mut params = DisplayParams::default();
        params.set_scale(10.0);
        assert_eq!(params.scale, SCALE_MAX);
        params.set_scale(0.0);
        assert_eq!(params.scale, SCALE_MIN);
        params.set_rotation_speed(-1.0);
        assert_eq!(params.rotation_speed, 0.0);
        params.set_rotation_speed(5.0);
        assert_eq!(params.rotation_speed, ROTATION_SPEED_MAX);
    }

    #[test]
    fn zoom_steps_stay_within_bounds() {
        let mut params = DisplayParams::default();
        params.set_scale(SCALE_MAX);
        params.zoom_in();
        assert_eq!(params.scale, SCALE_MAX);
        params.set_scale(SCALE_MIN);
        params.zoom_out();
        assert_eq!(params.scale, SCALE_MIN);
        params.zoom_in();
        assert!((params.scale - (SCALE_MIN + ADJUST_STEP)).abs() < 1e-6);
    }
}
