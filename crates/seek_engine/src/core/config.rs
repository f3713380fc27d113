//! # Game Configuration
//!
//! One document describes a whole playable scene: engine settings, the viewport, the
//! camera, the hidden objects and the placement of every prop.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: Logging and debug features
//! - **Viewport Config**: Canvas size used for pointer conversion
//! - **Scene Config**: Camera, detection radius, object descriptors, prop placement
//!
//! Descriptors are rebuilt from [`ObjectConfig`] on every call to
//! [`SceneConfig::descriptors`], so a new session never inherits found flags from the
//! previous one.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::game::registry::{GameObjectDescriptor, ObjectId, ObjectRegistry, RegistryError};
use crate::render::Camera;
use crate::scene::PropPlacement;

pub use crate::config::{Config, ConfigError};

/// # Engine Configuration
///
/// Logging and debug behavior shared by the whole game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter (`error`, `warn`, `info`, `debug`, `trace`), overridden by `RUST_LOG`
    pub log_level: String,
    /// Whether to print diagnostic detail such as miss reasons
    pub debug_mode: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
        }
    }

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable debug mode
    #[must_use]
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Viewport Configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ViewportConfig {
    /// Width over height
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    /// Validate the viewport size
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "Viewport must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { width: 1280, height: 720 }
    }
}

/// # Camera Configuration
///
/// Initial camera placement. Orbit controls may move the camera at runtime; picking
/// always uses whatever camera the host passes in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position in world space
    pub position: [f32; 3],
    /// Point the camera looks at
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl CameraConfig {
    /// Build a camera for a viewport with the given aspect ratio
    pub fn to_camera(&self, aspect: f32) -> Camera {
        let mut camera = Camera::perspective(
            Vec3::from(self.position),
            self.fov_degrees,
            aspect,
            self.near,
            self.far,
        );
        camera.look_at(Vec3::from(self.target), Vec3::new(0.0, 1.0, 0.0));
        camera
    }

    /// Validate projection parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "Camera field of view must be within (0, 180) degrees, got {}",
                self.fov_degrees
            )));
        }
        if !(self.near > 0.0 && self.far > self.near && self.far.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "Camera clip planes must satisfy 0 < near < far, got near {} far {}",
                self.near, self.far
            )));
        }
        if self.position == self.target {
            return Err(ConfigError::Invalid("Camera position and target coincide".to_string()));
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 2.0, 7.2],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// # Object Configuration
///
/// Source data for one [`GameObjectDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectConfig {
    /// Logical identifier
    pub id: String,
    /// Checklist label
    pub label: String,
    /// Visual-node names that resolve to this object
    pub aliases: Vec<String>,
    /// Visual-node names hidden when found; the aliases when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_on_found: Option<Vec<String>>,
    /// Feedback message when found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl ObjectConfig {
    /// Create an object configuration with default hide targets and feedback
    pub fn new<A, S>(id: impl Into<String>, label: impl Into<String>, aliases: A) -> Self
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            label: label.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
            hide_on_found: None,
            feedback: None,
        }
    }

    /// Set the nodes hidden when found
    #[must_use]
    pub fn with_hide_on_found<H, S>(mut self, targets: H) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hide_on_found = Some(targets.into_iter().map(Into::into).collect());
        self
    }

    /// Build a fresh, unfound descriptor
    pub fn to_descriptor(&self) -> GameObjectDescriptor {
        let mut descriptor =
            GameObjectDescriptor::new(ObjectId::new(self.id.as_str()), self.label.as_str(), &self.aliases);
        if let Some(targets) = &self.hide_on_found {
            descriptor = descriptor.with_hide_on_found(targets);
        }
        if let Some(feedback) = &self.feedback {
            descriptor = descriptor.with_feedback(feedback.as_str());
        }
        descriptor
    }
}

/// # Scene Configuration
///
/// Everything needed to play one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Scene name
    pub name: String,
    /// Maximum distance between a strike and the named node origin for a hit
    pub detection_radius: f32,
    /// Initial camera
    pub camera: CameraConfig,
    /// Hidden objects in checklist order
    pub objects: Vec<ObjectConfig>,
    /// Prop placement, registered objects and scenery alike
    pub props: Vec<PropPlacement>,
}

impl SceneConfig {
    /// Validate the scene
    ///
    /// Duplicate ids, overlapping aliases, objects without aliases and bad radius or
    /// camera values are errors. Alias and hide targets that no placed prop provides
    /// are only warned about: such objects simply cannot be clicked or hidden.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detection_radius.is_nan() || self.detection_radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "Detection radius must be positive, got {}",
                self.detection_radius
            )));
        }
        self.camera.validate()?;

        let mut ids = HashSet::new();
        let mut alias_owner: HashMap<&str, &str> = HashMap::new();
        for object in &self.objects {
            if object.id.is_empty() {
                return Err(ConfigError::Invalid(format!("Object '{}' has an empty id", object.label)));
            }
            if !ids.insert(object.id.as_str()) {
                return Err(ConfigError::Invalid(format!("Duplicate object id '{}'", object.id)));
            }
            if object.aliases.is_empty() {
                return Err(ConfigError::Invalid(format!("Object '{}' has no aliases", object.id)));
            }
            for alias in &object.aliases {
                if let Some(owner) = alias_owner.insert(alias.as_str(), object.id.as_str()) {
                    if owner != object.id {
                        return Err(ConfigError::Invalid(format!(
                            "Alias '{}' is claimed by both '{}' and '{}'",
                            alias, owner, object.id
                        )));
                    }
                }
            }
        }

        self.warn_unplaced_names();
        Ok(())
    }

    fn warn_unplaced_names(&self) {
        let placed: HashSet<&str> = self.props.iter().flat_map(PropPlacement::node_names).collect();
        for object in &self.objects {
            let hide_targets = object.hide_on_found.as_ref().unwrap_or(&object.aliases);
            for name in object.aliases.iter().chain(hide_targets) {
                if !placed.contains(name.as_str()) {
                    log::warn!("'{}' references node '{}', which no prop provides", object.id, name);
                }
            }
        }
    }

    /// Fresh descriptors in checklist order
    pub fn descriptors(&self) -> Vec<GameObjectDescriptor> {
        self.objects.iter().map(ObjectConfig::to_descriptor).collect()
    }

    /// Registry populated with fresh descriptors
    pub fn build_registry(&self) -> Result<ObjectRegistry, RegistryError> {
        ObjectRegistry::from_descriptors(self.descriptors())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: "house".to_string(),
            detection_radius: 9.0,
            camera: CameraConfig::default(),
            objects: Vec::new(),
            props: Vec::new(),
        }
    }
}

/// # Complete Game Configuration
///
/// Top-level document loaded by the game binary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Viewport size
    pub viewport: ViewportConfig,
    /// Playable scene
    pub scene: SceneConfig,
}

impl GameConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.viewport.validate()?;
        self.scene.validate()
    }
}

impl Config for GameConfig {}
