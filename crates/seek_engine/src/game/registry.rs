//! Object registry: visual-node aliases → logical game objects
//!
//! A logical prop is often rendered by several named meshes (a camera body and its strap,
//! a pair of gloves split into cube sub-meshes). The registry maps every such alias to a
//! single [`ObjectId`] with a hash lookup instead of chains of name comparisons, and records
//! which nodes to hide once the object is found.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable logical identifier of a game object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Create an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Registry errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An object with this id is already registered
    #[error("Duplicate object id '{0}'")]
    DuplicateId(ObjectId),

    /// An alias already resolves to another object
    #[error("Alias '{alias}' already maps to '{existing}', cannot map it to '{incoming}'")]
    AliasConflict {
        /// Conflicting visual-node name
        alias: String,
        /// Object currently owning the alias
        existing: ObjectId,
        /// Object that tried to claim it
        incoming: ObjectId,
    },

    /// No object with this id
    #[error("Unknown object id '{0}'")]
    UnknownId(ObjectId),

    /// Object was already marked as found
    #[error("Object '{0}' was already found")]
    AlreadyFound(ObjectId),
}

/// One hidden/interactive prop
#[derive(Debug, Clone, PartialEq)]
pub struct GameObjectDescriptor {
    /// Stable logical identifier
    pub id: ObjectId,
    /// Visual-node names resolving to this object
    pub aliases: Vec<String>,
    /// Checklist label
    pub label: String,
    /// Message shown when the object is found
    pub feedback: String,
    /// Visual-node names to hide once found
    pub hide_on_found: Vec<String>,
    found: bool,
}

impl GameObjectDescriptor {
    /// Create an unfound descriptor
    ///
    /// `hide_on_found` starts out equal to `aliases` and `feedback` to a generic
    /// "You found the ...!" line; override either with the builder methods.
    pub fn new<A, S>(id: impl Into<ObjectId>, label: impl Into<String>, aliases: A) -> Self
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let label = label.into();
        let mut unique: Vec<String> = Vec::new();
        for alias in aliases.into_iter().map(Into::into) {
            if !unique.contains(&alias) {
                unique.push(alias);
            }
        }

        Self {
            id: id.into(),
            feedback: format!("You found the {label}!"),
            hide_on_found: unique.clone(),
            aliases: unique,
            label,
            found: false,
        }
    }

    /// Replace the nodes hidden when found
    #[must_use]
    pub fn with_hide_on_found<H, S>(mut self, targets: H) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hide_on_found = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the feedback message
    #[must_use]
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = feedback.into();
        self
    }

    /// Whether the object has been found this session
    pub fn is_found(&self) -> bool {
        self.found
    }
}

/// Registry of game objects in registration order
#[derive(Debug, Default, Clone)]
pub struct ObjectRegistry {
    descriptors: Vec<GameObjectDescriptor>,
    by_id: HashMap<ObjectId, usize>,
    by_alias: HashMap<String, ObjectId>,
}

impl ObjectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from descriptors, stopping at the first conflict
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = GameObjectDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Add a descriptor
    ///
    /// Fails without modifying the registry when the id is taken or an alias already
    /// belongs to another object.
    pub fn register(&mut self, descriptor: GameObjectDescriptor) -> Result<(), RegistryError> {
        if self.by_id.contains_key(&descriptor.id) {
            return Err(RegistryError::DuplicateId(descriptor.id));
        }
        for alias in &descriptor.aliases {
            if let Some(existing) = self.by_alias.get(alias) {
                return Err(RegistryError::AliasConflict {
                    alias: alias.clone(),
                    existing: existing.clone(),
                    incoming: descriptor.id.clone(),
                });
            }
        }

        for alias in &descriptor.aliases {
            self.by_alias.insert(alias.clone(), descriptor.id.clone());
        }
        self.by_id.insert(descriptor.id.clone(), self.descriptors.len());
        log::debug!("Registered '{}' with aliases {:?}", descriptor.id, descriptor.aliases);
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Object id behind a visual-node name
    pub fn resolve_alias(&self, visual_name: &str) -> Option<&ObjectId> {
        self.by_alias.get(visual_name)
    }

    /// Look up a descriptor
    pub fn get(&self, id: &ObjectId) -> Option<&GameObjectDescriptor> {
        self.by_id.get(id).map(|&index| &self.descriptors[index])
    }

    /// Flag an object as found
    pub fn mark_found(&mut self, id: &ObjectId) -> Result<&GameObjectDescriptor, RegistryError> {
        let index = *self.by_id.get(id).ok_or_else(|| RegistryError::UnknownId(id.clone()))?;
        let descriptor = &mut self.descriptors[index];
        if descriptor.found {
            return Err(RegistryError::AlreadyFound(id.clone()));
        }
        descriptor.found = true;
        Ok(descriptor)
    }

    /// Visual nodes to hide once `id` is found
    pub fn visibility_targets(&self, id: &ObjectId) -> Result<&[String], RegistryError> {
        self.get(id)
            .map(|d| d.hide_on_found.as_slice())
            .ok_or_else(|| RegistryError::UnknownId(id.clone()))
    }

    /// Descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &GameObjectDescriptor> {
        self.descriptors.iter()
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether no objects are registered
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Drop every descriptor and alias
    pub fn clear(&mut self) {
        self.descriptors.clear();
        self.by_id.clear();
        self.by_alias.clear();
    }
}
