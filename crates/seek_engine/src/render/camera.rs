//! # 3D Camera
//!
//! Perspective camera used to turn pointer positions into world-space rays.
//!
//! ## Conventions
//! - Right-handed, Y-up world space
//! - OpenGL-style clip space: NDC x, y and z all in [-1, 1], +Y up on screen
//!
//! Orbit controls live outside the engine; they only ever move `position` and `target`.

use crate::foundation::math::{utils, Mat4, Point3, Vec3, Vec4};
use crate::scene::Ray;

/// 3D perspective camera
///
/// Matrices are computed on demand rather than cached; picking happens once per click.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a new perspective camera looking at the origin with +Y up
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// # Example
    /// ```rust
    /// use seek_engine::foundation::math::Vec3;
    /// use seek_engine::render::Camera;
    ///
    /// let camera = Camera::perspective(Vec3::new(0.0, 2.0, 7.2), 75.0, 16.0 / 9.0, 0.1, 1000.0);
    /// assert_eq!(camera.target, Vec3::zeros());
    /// ```
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Configure camera to look at a specific point with custom up vector
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - target: {:?}, up: {:?}", target, up);
    }

    /// Update camera aspect ratio for viewport changes
    ///
    /// Only logs changes larger than 0.01 to keep resize storms quiet.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// World-to-camera view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    /// Perspective projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Combined projection × view matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Convert normalized device coordinates to a world-space ray
    ///
    /// The ray starts at the camera position and passes through the point under
    /// `(ndc_x, ndc_y)`. Returns `None` when the view-projection matrix cannot be
    /// inverted (zero aspect, coincident position and target, ...).
    ///
    /// # Mathematical Process
    /// 1. Build NDC points on the near (z = -1) and far (z = +1) planes
    /// 2. Unproject both through the inverse view-projection matrix
    /// 3. Perspective divide, then normalize the far − near direction
    pub fn screen_to_world_ray(&self, ndc_x: f32, ndc_y: f32) -> Option<Ray> {
        let inv_view_proj = self.view_projection_matrix().try_inverse()?;

        let world_near_h = inv_view_proj * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let world_far_h = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if world_near_h.w == 0.0 || world_far_h.w == 0.0 {
            return None;
        }

        let world_near = world_near_h.xyz() / world_near_h.w;
        let world_far = world_far_h.xyz() / world_far_h.w;

        let direction = world_far - world_near;
        if !direction.iter().all(|c| c.is_finite()) || direction.norm_squared() == 0.0 {
            return None;
        }

        Some(Ray::new(self.position, direction))
    }

    /// Project a world-space point to viewport pixels
    ///
    /// Inverse of the pointer conversion: pixel rows grow downwards. Returns `None` for
    /// points behind the camera.
    pub fn world_to_screen(&self, world: Vec3, viewport_width: f32, viewport_height: f32) -> Option<(f32, f32)> {
        let clip = self.view_projection_matrix() * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= 0.0 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        Some(((ndc_x + 1.0) * 0.5 * viewport_width, (1.0 - ndc_y) * 0.5 * viewport_height))
    }
}

impl Default for Camera {
    /// Camera of the default house scene: slightly raised, 7.2 units back, 75° FOV
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 2.0, 7.2), 75.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}
