//! Scene index: arena-backed scene graph with name lookup and ray queries
//!
//! Nodes live in a [`SlotMap`] and reference each other through [`NodeHandle`]s, so the
//! ancestor walk used by picking stays well-defined while props are added, swapped or
//! removed. A secondary index maps node names to handles.
//!
//! Two traits describe what the rest of the engine needs from a scene:
//! - [`SceneQuery`]: read-only queries used by hit resolution
//! - [`VisibilitySink`]: the one outbound effect of the game, hiding found objects

use std::collections::HashMap;

use crate::foundation::collections::{HandleMap, NodeHandle};
use crate::foundation::math::{Mat4, Point3, Transform, Vec3};
use super::bounds::{Ray, AABB};

/// Errors from structural scene edits
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Parent handle does not refer to a live node
    #[error("Parent node {0:?} does not exist")]
    UnknownParent(NodeHandle),

    /// Handle does not refer to a live node
    #[error("Node {0:?} does not exist")]
    UnknownNode(NodeHandle),
}

/// One ray/node intersection, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayIntersection {
    /// Node whose bounds were struck
    pub node: NodeHandle,
    /// World-space point where the ray enters the bounds
    pub point: Vec3,
    /// Distance from the ray origin to `point`
    pub distance: f32,
}

/// Read-only scene queries needed by hit resolution
pub trait SceneQuery {
    /// All intersections of `ray` with visible nodes, nearest first
    fn intersect_ray(&self, ray: &Ray) -> Vec<RayIntersection>;

    /// First node registered under `name`
    fn node_by_name(&self, name: &str) -> Option<NodeHandle>;

    /// Name of a node; unnamed grouping nodes return an empty string
    fn name_of(&self, node: NodeHandle) -> &str;

    /// Parent of a node, `None` for roots and stale handles
    fn parent_of(&self, node: NodeHandle) -> Option<NodeHandle>;

    /// World-space origin of a node
    fn world_position_of(&self, node: NodeHandle) -> Vec3;
}

/// Receiver of visibility changes requested by the game
pub trait VisibilitySink {
    /// Show or hide every node named `visual_name`
    fn request_visibility_change(&mut self, visual_name: &str, visible: bool);
}

/// A single node in the scene graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Node name, possibly empty
    pub name: String,
    /// Transform relative to the parent
    pub local: Transform,
    /// Local-space bounds; grouping nodes have none and cannot be struck
    pub bounds: Option<AABB>,
    /// Visibility flag of this node alone (see [`SceneIndex::is_visible`])
    pub visible: bool,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

impl SceneNode {
    /// Parent handle
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Child handles in insertion order
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }
}

/// Arena of scene nodes with a name index
#[derive(Debug, Default)]
pub struct SceneIndex {
    nodes: HandleMap<NodeHandle, SceneNode>,
    by_name: HashMap<String, Vec<NodeHandle>>,
    roots: Vec<NodeHandle>,
}

impl SceneIndex {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `parent` (or as a root)
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeHandle>,
        local: Transform,
        bounds: Option<AABB>,
    ) -> Result<NodeHandle, SceneError> {
        if let Some(parent) = parent {
            if !self.nodes.contains_key(parent) {
                return Err(SceneError::UnknownParent(parent));
            }
        }

        let name = name.into();
        let handle = self.nodes.insert(SceneNode {
            name: name.clone(),
            local,
            bounds,
            visible: true,
            parent,
            children: Vec::new(),
        });

        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent_node) => parent_node.children.push(handle),
            None => self.roots.push(handle),
        }
        if !name.is_empty() {
            self.by_name.entry(name).or_default().push(handle);
        }

        log::trace!("Scene node {:?} added under {:?}", handle, parent);
        Ok(handle)
    }

    /// Remove a node and all of its descendants, returning how many nodes were removed
    pub fn remove_subtree(&mut self, node: NodeHandle) -> Result<usize, SceneError> {
        let parent = self.nodes.get(node).ok_or(SceneError::UnknownNode(node))?.parent;
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent_node) => parent_node.children.retain(|&c| c != node),
            None => self.roots.retain(|&r| r != node),
        }

        let mut removed = 0;
        let mut stack = vec![node];
        while let Some(handle) = stack.pop() {
            if let Some(removed_node) = self.nodes.remove(handle) {
                if let Some(handles) = self.by_name.get_mut(&removed_node.name) {
                    handles.retain(|&h| h != handle);
                    if handles.is_empty() {
                        self.by_name.remove(&removed_node.name);
                    }
                }
                stack.extend(removed_node.children);
                removed += 1;
            }
        }

        Ok(removed)
    }

    /// Look up a node
    pub fn get(&self, node: NodeHandle) -> Option<&SceneNode> {
        self.nodes.get(node)
    }

    /// Root nodes in insertion order
    pub fn roots(&self) -> &[NodeHandle] {
        &self.roots
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.by_name.clear();
        self.roots.clear();
    }

    /// Local-to-world matrix of a node (identity for stale handles)
    pub fn world_matrix(&self, node: NodeHandle) -> Mat4 {
        let mut matrix = Mat4::identity();
        let mut current = self.nodes.get(node);
        while let Some(n) = current {
            matrix = n.local.to_matrix() * matrix;
            current = n.parent.and_then(|p| self.nodes.get(p));
        }
        matrix
    }

    /// Effective visibility: a node is visible when it and all its ancestors are
    pub fn is_visible(&self, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node);
        if current.is_none() {
            return false;
        }
        while let Some(n) = current {
            if !n.visible {
                return false;
            }
            current = n.parent.and_then(|p| self.nodes.get(p));
        }
        true
    }

    /// Set the visibility flag of every node named `name`, returning how many changed
    pub fn set_visible_by_name(&mut self, name: &str, visible: bool) -> usize {
        let Some(handles) = self.by_name.get(name) else {
            return 0;
        };

        let mut changed = 0;
        for &handle in handles {
            if let Some(node) = self.nodes.get_mut(handle) {
                if node.visible != visible {
                    node.visible = visible;
                    changed += 1;
                }
            }
        }
        changed
    }
}

impl SceneQuery for SceneIndex {
    fn intersect_ray(&self, ray: &Ray) -> Vec<RayIntersection> {
        let mut hits: Vec<RayIntersection> = self
            .nodes
            .iter()
            .filter_map(|(handle, node)| {
                let bounds = node.bounds?;
                if !self.is_visible(handle) {
                    return None;
                }
                let world_bounds = bounds.transform(&self.world_matrix(handle));
                let distance = world_bounds.intersect_ray(ray)?;
                Some(RayIntersection {
                    node: handle,
                    point: ray.point_at(distance),
                    distance,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn node_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.by_name.get(name).and_then(|handles| handles.first().copied())
    }

    fn name_of(&self, node: NodeHandle) -> &str {
        self.nodes.get(node).map_or("", |n| n.name.as_str())
    }

    fn parent_of(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    fn world_position_of(&self, node: NodeHandle) -> Vec3 {
        self.world_matrix(node).transform_point(&Point3::origin()).coords
    }
}

impl VisibilitySink for SceneIndex {
    fn request_visibility_change(&mut self, visual_name: &str, visible: bool) {
        let changed = self.set_visible_by_name(visual_name, visible);
        if changed == 0 {
            log::debug!("Visibility request for '{}' matched no loaded node", visual_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cube() -> Option<AABB> {
        Some(AABB::from_center_extents(Vec3::zeros(), Vec3::new(0.5, 0.5, 0.5)))
    }

    fn forward_ray(x: f32) -> Ray {
        Ray::new(Vec3::new(x, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_world_position_composes_parent_transforms() {
        let mut scene = SceneIndex::new();
        let root = scene
            .add_node("camera", None, Transform::from_position(Vec3::new(2.0, 0.57, 4.0)).with_scale(Vec3::new(1.5, 1.5, 1.5)), None)
            .unwrap();
        let strap = scene
            .add_node("Camera_01_strap", Some(root), Transform::from_position(Vec3::new(1.0, 0.0, 0.0)), cube())
            .unwrap();

        assert_relative_eq!(scene.world_position_of(strap), Vec3::new(3.5, 0.57, 4.0), epsilon = 1e-5);
        assert_eq!(scene.parent_of(strap), Some(root));
        assert_eq!(scene.parent_of(root), None);
        assert_eq!(scene.name_of(strap), "Camera_01_strap");
    }

    #[test]
    fn test_intersections_sorted_nearest_first() {
        let mut scene = SceneIndex::new();
        let far = scene.add_node("far", None, Transform::from_position(Vec3::new(0.0, 0.0, -3.0)), cube()).unwrap();
        let near = scene.add_node("near", None, Transform::from_position(Vec3::new(0.0, 0.0, 2.0)), cube()).unwrap();
        scene.add_node("aside", None, Transform::from_position(Vec3::new(5.0, 0.0, 0.0)), cube()).unwrap();

        let hits = scene.intersect_ray(&forward_ray(0.0));
        assert_eq!(hits.iter().map(|h| h.node).collect::<Vec<_>>(), vec![near, far]);
        assert_relative_eq!(hits[0].distance, 7.5, epsilon = 1e-5);
        assert_relative_eq!(hits[0].point, Vec3::new(0.0, 0.0, 2.5), epsilon = 1e-5);
    }

    #[test]
    fn test_grouping_nodes_are_not_struck() {
        let mut scene = SceneIndex::new();
        scene.add_node("group", None, Transform::identity(), None).unwrap();

        assert!(scene.intersect_ray(&forward_ray(0.0)).is_empty());
    }

    #[test]
    fn test_hidden_ancestor_hides_descendants() {
        let mut scene = SceneIndex::new();
        let root = scene.add_node("spray", None, Transform::identity(), None).unwrap();
        let mesh = scene.add_node("", Some(root), Transform::identity(), cube()).unwrap();

        scene.request_visibility_change("spray", false);

        assert!(!scene.is_visible(mesh));
        assert!(scene.intersect_ray(&forward_ray(0.0)).is_empty());
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut scene = SceneIndex::new();
        let node = scene.add_node("tmp", None, Transform::identity(), None).unwrap();
        scene.remove_subtree(node).unwrap();

        assert_eq!(
            scene.add_node("orphan", Some(node), Transform::identity(), None),
            Err(SceneError::UnknownParent(node))
        );
    }

    #[test]
    fn test_remove_subtree_clears_name_index() {
        let mut scene = SceneIndex::new();
        let root = scene.add_node("rat", None, Transform::identity(), None).unwrap();
        scene.add_node("street_rat", Some(root), Transform::identity(), cube()).unwrap();
        scene.add_node("house", None, Transform::identity(), None).unwrap();

        assert_eq!(scene.remove_subtree(root), Ok(2));
        assert_eq!(scene.len(), 1);
        assert!(scene.node_by_name("street_rat").is_none());
        assert!(scene.node_by_name("house").is_some());
        assert_eq!(scene.roots().len(), 1);
    }

    #[test]
    fn test_duplicate_names_resolve_to_first_and_hide_together() {
        let mut scene = SceneIndex::new();
        let first = scene.add_node("decoy", None, Transform::identity(), cube()).unwrap();
        scene.add_node("decoy", None, Transform::from_position(Vec3::new(3.0, 0.0, 0.0)), cube()).unwrap();

        assert_eq!(scene.node_by_name("decoy"), Some(first));
        assert_eq!(scene.set_visible_by_name("decoy", false), 2);
        assert_eq!(scene.set_visible_by_name("decoy", false), 0);
    }
}
