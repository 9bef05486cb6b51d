//! Ray construction and ray–plane intersection.
//!
//! The AR runtime reports pointer positions in normalized device coordinates
//! and a camera view-projection transform; dragging a label means
//! unprojecting the pointer into a world-space ray and intersecting it with
//! the fixed marker plane. A miss is a normal outcome (`None`), never an
//! error — the drag simply waits for the next valid intersection.

use glam::{Mat4, Vec3};

/// A world-space ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

/// An infinite plane `normal · p = d`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    pub const fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    /// Intersect a ray with the plane.
    ///
    /// Returns `None` when the ray is (near-)parallel to the plane or the
    /// intersection lies behind the ray origin.
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let denom = self.normal.dot(ray.dir);
        if denom.abs() <= 1.0e-6 {
            return None;
        }
        let t = (self.d - self.normal.dot(ray.origin)) / denom;
        if t < 0.0 {
            return None;
        }
        Some(ray.origin + ray.dir * t)
    }
}

/// The marker plane: normal along local +Z, passing through the marker
/// origin. Labels are dragged along this plane.
pub const fn marker_plane() -> Plane {
    Plane::new(Vec3::Z, 0.0)
}

/// The active camera as the AR runtime exposes it: a single combined
/// view-projection matrix, sampled per pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    pub view_proj: Mat4,
}

impl CameraTransform {
    pub const fn new(view_proj: Mat4) -> Self {
        Self { view_proj }
    }

    /// Build a world-space ray through the given normalized device
    /// coordinate (x, y in [-1, 1], y up).
    ///
    /// Unprojects the near (z = 0) and far (z = 1) NDC points through the
    /// inverse view-projection. Returns `None` when the two collapse into
    /// one point (degenerate transform).
    pub fn ray_from_ndc(&self, ndc_x: f32, ndc_y: f32) -> Option<Ray> {
        let inv = self.view_proj.inverse();
        let near = inv.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        let dir = (far - near).normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        Some(Ray { origin: near, dir })
    }
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}
