//! Declarative scene description and the pure builder that produces it.
//!
//! `build_scene` is a pure function from `{content, labels, display params}`
//! to a typed node tree. It never touches the live scene — applying the
//! description (and owning the only mutable handle to the rendered tree) is
//! the reconciler's job. Calling it twice with the same inputs yields
//! structurally identical output, which the reconciler's "rebuild, don't
//! diff" policy relies on.

use crate::id::LabelId;
use crate::model::{Color, ContentItem, ContentSource, DisplayParams, Label};
use glam::Vec3;
use serde::Serialize;

/// One full spin takes 10 s at rotation speed 1.
pub const SPIN_LOOP_MS: u32 = 10_000;

/// Dimensions of the semi-transparent quad behind each label's text.
pub const LABEL_QUAD_WIDTH: f32 = 0.8;
pub const LABEL_QUAD_HEIGHT: f32 = 0.2;
pub const LABEL_QUAD_OPACITY: f32 = 0.7;

/// Wrap width for label text glyphs.
pub const LABEL_TEXT_WIDTH: f32 = 2.0;

/// A continuous looping Y-axis rotation, applied on top of a node's static
/// rotation. `degrees` is the sweep per loop — proportional to the user's
/// rotation-speed setting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpinAnimation {
    pub degrees: f32,
    pub duration_ms: u32,
}

impl SpinAnimation {
    /// Spin for the given speed setting, or `None` when spinning is off.
    fn for_speed(speed: f32) -> Option<Self> {
        (speed > 0.0).then(|| Self {
            degrees: 360.0 * speed,
            duration_ms: SPIN_LOOP_MS,
        })
    }
}

/// Identity metadata carried by a label's group node: routes interaction
/// events back to the annotation store, and tells the drag controller
/// whether the node accepts drags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelRef {
    pub id: LabelId,
    pub editable: bool,
}

/// What a scene node renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    /// The AR camera, driven by the runtime's tracking.
    Camera,
    /// The fiducial marker anchoring the content.
    Marker { preset: String },
    /// A 3D model content node.
    Model { src: String },
    /// A flat image content node, lying on the marker plane.
    ImagePlane { src: String, width: f32, height: f32 },
    /// Grouping node for one label's background/text/connector children.
    LabelGroup,
    /// A flat colored quad (label background).
    Quad {
        width: f32,
        height: f32,
        color: Color,
        opacity: f32,
    },
    /// A text glyph, centered on its node.
    Text {
        value: String,
        color: Color,
        wrap_width: f32,
    },
    /// A line from the node origin to `end` (relative offset).
    Line { end: Vec3, color: Color },
}

/// One node of the declarative scene tree handed to the AR runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub position: Vec3,
    /// Euler rotation in degrees, XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub spin: Option<SpinAnimation>,
    /// Present only on label group nodes.
    pub label: Option<LabelRef>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            spin: None,
            label: None,
            children: Vec::new(),
        }
    }

    fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    fn rotated(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    fn child(mut self, node: SceneNode) -> Self {
        self.children.push(node);
        self
    }
}

/// The root of a built scene: camera plus marker subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneDescription {
    pub camera: SceneNode,
    pub marker: SceneNode,
}

impl SceneDescription {
    /// Iterate over the marker's label group nodes.
    pub fn label_nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.marker
            .children
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::LabelGroup))
    }

    /// The content node (model or image plane).
    pub fn content_node(&self) -> Option<&SceneNode> {
        self.marker
            .children
            .iter()
            .find(|n| matches!(n.kind, NodeKind::Model { .. } | NodeKind::ImagePlane { .. }))
    }
}

/// Build the scene description for a content item.
///
/// `labels` is passed separately from `content` because the annotation
/// store, not the fetched record, is the source of truth once the session
/// is live. `params.scale` is applied verbatim — clamping happened on the
/// setters.
pub fn build_scene(content: &ContentItem, labels: &[Label], params: &DisplayParams) -> SceneDescription {
    let mut marker = SceneNode::new(NodeKind::Marker {
        preset: "hiro".to_string(),
    })
    .child(content_node(content, params));

    if params.show_labels {
        for label in labels {
            marker.children.push(label_node(label, params.edit_mode));
        }
    }

    SceneDescription {
        camera: SceneNode::new(NodeKind::Camera),
        marker,
    }
}

fn content_node(content: &ContentItem, params: &DisplayParams) -> SceneNode {
    match &content.source {
        ContentSource::Model { url } => {
            let mut node = SceneNode::new(NodeKind::Model { src: url.clone() });
            node.scale = Vec3::splat(params.scale);
            node.spin = SpinAnimation::for_speed(params.rotation_speed);
            node
        }
        ContentSource::Image { url } => {
            // Image lies flat on the marker; spinning preserves the tilt.
            let mut node = SceneNode::new(NodeKind::ImagePlane {
                src: url.clone(),
                width: 2.0 * params.scale,
                height: 2.0 * params.scale,
            })
            .rotated(Vec3::new(-90.0, 0.0, 0.0));
            node.spin = SpinAnimation::for_speed(params.rotation_speed);
            node
        }
    }
}

fn label_node(label: &Label, editable: bool) -> SceneNode {
    let mut group = SceneNode::new(NodeKind::LabelGroup).at(label.position);
    group.label = Some(LabelRef {
        id: label.id,
        editable,
    });

    group = group
        .child(
            SceneNode::new(NodeKind::Quad {
                width: LABEL_QUAD_WIDTH,
                height: LABEL_QUAD_HEIGHT,
                color: Color::BLACK,
                opacity: LABEL_QUAD_OPACITY,
            })
            .rotated(Vec3::new(-90.0, 0.0, 0.0)),
        )
        .child(
            SceneNode::new(NodeKind::Text {
                value: label.text.clone(),
                color: Color::WHITE,
                wrap_width: LABEL_TEXT_WIDTH,
            })
            .at(Vec3::new(0.0, 0.01, 0.0))
            .rotated(Vec3::new(-90.0, 0.0, 0.0)),
        );

    if let Some(target) = label.target {
        group = group.child(SceneNode::new(NodeKind::Line {
            end: target - label.position,
            color: Color::WHITE,
        }));
    }

    group
}
