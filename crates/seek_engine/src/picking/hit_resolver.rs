//! Pointer-to-object resolution
//!
//! Orchestrates the picking pipeline: pointer → camera ray → scene intersections →
//! named ancestor → distance gate → registry alias lookup.
//!
//! Resolution is a pure query. It never hides nodes or touches session state; the
//! caller decides what a hit means.

use crate::game::registry::{ObjectId, ObjectRegistry};
use crate::input::PointerEvent;
use crate::render::Camera;
use crate::scene::{NodeHandle, SceneQuery};

/// Why a click did not resolve to a game object
///
/// These are normal gameplay outcomes, kept only for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum MissReason {
    /// Viewport was empty or the camera projection could not be inverted
    DegenerateView,
    /// The ray struck nothing
    NoIntersection,
    /// Something was struck, but too far from the named ancestor's origin
    OutsideRadius {
        /// Name of the ancestor that was struck
        name: String,
        /// Distance from intersection point to the ancestor origin
        distance: f32,
    },
    /// The struck node's name is not an alias of any game object
    Unregistered {
        /// Name of the struck node (may be empty)
        name: String,
    },
}

/// Outcome of resolving one click
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Click landed on a registered game object
    Hit(ObjectId),
    /// Click did not select any game object
    NoHit(MissReason),
}

impl Resolution {
    /// The object hit, if any
    pub fn hit(&self) -> Option<&ObjectId> {
        match self {
            Self::Hit(id) => Some(id),
            Self::NoHit(_) => None,
        }
    }
}

/// Resolves pointer clicks to game objects
///
/// The detection radius bounds how far from a named node's origin a ray may strike and
/// still count. Big or oddly shaped meshes get struck far from their logical center, so
/// scenes tune this value to their object scale; `f32::INFINITY` disables the gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResolver {
    detection_radius: f32,
}

impl HitResolver {
    /// Create a resolver with the given detection radius
    pub fn new(detection_radius: f32) -> Self {
        Self { detection_radius }
    }

    /// Current detection radius
    pub fn detection_radius(&self) -> f32 {
        self.detection_radius
    }

    /// Resolve a click to a game object
    ///
    /// # Arguments
    /// * `pointer` - Click position and viewport size in pixels
    /// * `camera` - Active camera
    /// * `scene` - Loaded scene; nodes not yet loaded simply cannot be hit
    /// * `registry` - Alias table
    pub fn resolve<S>(
        &self,
        pointer: &PointerEvent,
        camera: &Camera,
        scene: &S,
        registry: &ObjectRegistry,
    ) -> Resolution
    where
        S: SceneQuery + ?Sized,
    {
        let Some(ray) = pointer
            .to_ndc()
            .and_then(|(ndc_x, ndc_y)| camera.screen_to_world_ray(ndc_x, ndc_y))
        else {
            log::debug!("Click at ({:.1}, {:.1}) ignored: degenerate view", pointer.x, pointer.y);
            return Resolution::NoHit(MissReason::DegenerateView);
        };

        let Some(nearest) = scene.intersect_ray(&ray).into_iter().next() else {
            log::debug!("Click at ({:.1}, {:.1}): no object struck", pointer.x, pointer.y);
            return Resolution::NoHit(MissReason::NoIntersection);
        };

        let named = named_ancestor(scene, nearest.node);
        let name = scene.name_of(named);

        let distance = (nearest.point - scene.world_position_of(named)).norm();
        log::debug!("Click struck '{}' at distance {:.3} from its origin", name, distance);

        let within_radius = distance < self.detection_radius;
        if !within_radius {
            return Resolution::NoHit(MissReason::OutsideRadius {
                name: name.to_string(),
                distance,
            });
        }

        match registry.resolve_alias(name) {
            Some(id) => Resolution::Hit(id.clone()),
            None => Resolution::NoHit(MissReason::Unregistered { name: name.to_string() }),
        }
    }
}

/// Walk up from `node` past unnamed grouping nodes
///
/// Stops at the first named node, or at the root if every ancestor is unnamed.
pub fn named_ancestor<S>(scene: &S, node: NodeHandle) -> NodeHandle
where
    S: SceneQuery + ?Sized,
{
    let mut current = node;
    while scene.name_of(current).is_empty() {
        match scene.parent_of(current) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    current
}
