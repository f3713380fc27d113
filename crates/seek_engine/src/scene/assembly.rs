//! Scene assembly from placement data
//!
//! Stands in for the asset loader: each [`PropPlacement`] becomes a root node carrying the
//! prop's transform, with its [`PartPlacement`]s nested underneath. Parts with non-zero
//! half extents get local bounds and can be struck by rays; empty-named parts model the
//! unnamed transform groups that glTF exports are full of.

use serde::{Deserialize, Serialize};

use crate::foundation::collections::NodeHandle;
use crate::foundation::math::{utils, Transform, Vec3};
use super::bounds::AABB;
use super::scene_index::{SceneError, SceneIndex};

/// Placement of one loaded asset in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropPlacement {
    /// Name given to the prop's root node (may be empty)
    #[serde(default)]
    pub name: String,

    /// Source asset path, informational only
    #[serde(default)]
    pub asset: String,

    /// World position of the root node
    #[serde(default)]
    pub position: [f32; 3],

    /// Scale of the root node
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],

    /// Rotation around the Y axis in degrees
    #[serde(default)]
    pub rotation_y_degrees: f32,

    /// Sub-meshes and groups below the root
    #[serde(default)]
    pub parts: Vec<PartPlacement>,
}

/// A named or unnamed node inside a prop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartPlacement {
    /// Node name; empty for structural groups
    #[serde(default)]
    pub name: String,

    /// Offset from the parent node
    #[serde(default)]
    pub offset: [f32; 3],

    /// Half extents of the part's box; all zero means no geometry
    #[serde(default)]
    pub half_extents: [f32; 3],

    /// Nested parts
    #[serde(default)]
    pub parts: Vec<PartPlacement>,
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl PropPlacement {
    fn transform(&self) -> Transform {
        Transform::from_position(Vec3::from(self.position))
            .with_scale(Vec3::from(self.scale))
            .with_rotation_y(utils::deg_to_rad(self.rotation_y_degrees))
    }

    /// Every non-empty node name this prop provides, root included
    pub fn node_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        if !self.name.is_empty() {
            names.push(self.name.as_str());
        }
        let mut stack: Vec<&PartPlacement> = self.parts.iter().collect();
        while let Some(part) = stack.pop() {
            if !part.name.is_empty() {
                names.push(part.name.as_str());
            }
            stack.extend(part.parts.iter());
        }
        names
    }
}

impl PartPlacement {
    fn bounds(&self) -> Option<AABB> {
        let extents = Vec3::from(self.half_extents);
        (extents.iter().any(|&e| e > 0.0)).then(|| AABB::from_center_extents(Vec3::zeros(), extents))
    }
}

/// Insert one prop and its parts, returning the root handle
pub fn assemble_prop(prop: &PropPlacement, scene: &mut SceneIndex) -> Result<NodeHandle, SceneError> {
    let root = scene.add_node(prop.name.clone(), None, prop.transform(), None)?;

    let mut pending: Vec<(NodeHandle, &PartPlacement)> = prop.parts.iter().map(|p| (root, p)).collect();
    while let Some((parent, part)) = pending.pop() {
        let node = scene.add_node(
            part.name.clone(),
            Some(parent),
            Transform::from_position(Vec3::from(part.offset)),
            part.bounds(),
        )?;
        pending.extend(part.parts.iter().map(|child| (node, child)));
    }

    log::debug!(
        "Placed prop '{}' ({}) at {:?}",
        prop.name,
        if prop.asset.is_empty() { "inline" } else { prop.asset.as_str() },
        prop.position
    );
    Ok(root)
}

/// Insert every prop, returning root handles in placement order
pub fn assemble_props(props: &[PropPlacement], scene: &mut SceneIndex) -> Result<Vec<NodeHandle>, SceneError> {
    let roots = props
        .iter()
        .map(|prop| assemble_prop(prop, scene))
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("Assembled {} props ({} scene nodes)", roots.len(), scene.len());
    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::scene_index::SceneQuery;
    use approx::assert_relative_eq;

    fn camera_prop() -> PropPlacement {
        PropPlacement {
            name: "camera".into(),
            asset: "Camera/Camera.gltf".into(),
            position: [2.0, 0.57, 4.0],
            scale: [1.5, 1.5, 1.5],
            rotation_y_degrees: 0.0,
            parts: vec![PartPlacement {
                name: String::new(),
                offset: [0.0, 0.0, 0.0],
                half_extents: [0.0, 0.0, 0.0],
                parts: vec![
                    PartPlacement {
                        name: "Camera_01".into(),
                        offset: [0.0, 0.1, 0.0],
                        half_extents: [0.1, 0.08, 0.06],
                        parts: Vec::new(),
                    },
                    PartPlacement {
                        name: "Camera_01_strap".into(),
                        offset: [0.0, 0.2, 0.0],
                        half_extents: [0.12, 0.02, 0.02],
                        parts: Vec::new(),
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_prop_hierarchy() {
        let mut scene = SceneIndex::new();
        let root = assemble_prop(&camera_prop(), &mut scene).unwrap();

        assert_eq!(scene.len(), 4);
        let body = scene.node_by_name("Camera_01").unwrap();
        let group = scene.parent_of(body).unwrap();
        assert_eq!(scene.name_of(group), "");
        assert_eq!(scene.parent_of(group), Some(root));
        assert!(scene.get(group).unwrap().bounds.is_none());
        assert!(scene.get(body).unwrap().bounds.is_some());
        assert_relative_eq!(scene.world_position_of(body), Vec3::new(2.0, 0.72, 4.0), epsilon = 1e-5);
    }

    #[test]
    fn test_node_names_skip_empty() {
        let prop = camera_prop();
        let mut names = prop.node_names();
        names.sort_unstable();
        assert_eq!(names, vec!["Camera_01", "Camera_01_strap", "camera"]);
    }
}
