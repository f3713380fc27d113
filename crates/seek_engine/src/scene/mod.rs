//! Scene management
//!
//! - [`SceneIndex`]: handle-based node arena, the engine's view of the loaded scene
//! - [`bounds`]: ray and bounding box primitives
//! - [`assembly`]: builds scene nodes from placement data

pub mod assembly;
pub mod bounds;
pub mod scene_index;

pub use crate::foundation::collections::NodeHandle;
pub use assembly::{assemble_prop, assemble_props, PartPlacement, PropPlacement};
pub use bounds::{Ray, AABB};
pub use scene_index::{RayIntersection, SceneError, SceneIndex, SceneNode, SceneQuery, VisibilitySink};
