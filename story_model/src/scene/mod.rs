//! Scene definitions - units of narrative text and their condition tags.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::story::SceneKey;

/// Unique identifier for scene variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneId(pub Uuid);

impl SceneId {
    /// Create a new random scene ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a nil/empty scene ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for SceneId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One unit of narrative text.
///
/// Before expansion a scene's `description` holds raw conditional-anchor
/// markup; after expansion it is fully resolved text and the scene is one
/// concrete variant of its bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,

    /// Display name as authored. All variants of one authored scene share
    /// a name (and therefore a bucket key).
    pub name: String,

    /// Scene text; holds anchor markup until expansion resolves it.
    pub description: String,

    /// Conditions required for this variant to be shown, in the order
    /// their anchors were discovered.
    ///
    /// `None` means "no prerequisites" - the baseline variant in which
    /// every branch resolved to its failed alternative. This is distinct
    /// from an empty list.
    pub conditions: Option<Vec<String>>,
}

impl Scene {
    /// Create a new scene with no conditions.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: SceneId::new(),
            name: name.into(),
            description: description.into(),
            conditions: None,
        }
    }

    /// Append a required condition (builder form).
    pub fn with_condition(mut self, name: impl Into<String>) -> Self {
        self.push_condition(name);
        self
    }

    /// Append a required condition, preserving discovery order.
    ///
    /// Appending a name that is already present is a no-op, so the list
    /// stays unique.
    pub fn push_condition(&mut self, name: impl Into<String>) {
        let name = name.into();
        let conditions = self.conditions.get_or_insert_with(Vec::new);
        if !conditions.contains(&name) {
            conditions.push(name);
        }
    }

    /// Check whether this variant requires a specific condition.
    pub fn has_condition(&self, name: &str) -> bool {
        self.conditions
            .as_ref()
            .map_or(false, |conditions| conditions.iter().any(|c| c == name))
    }

    /// The bucket key this scene belongs to.
    pub fn key(&self) -> SceneKey {
        SceneKey::new(&self.name)
    }

    /// Clone this scene as a new variant with a fresh identity.
    pub fn fork(&self) -> Scene {
        Scene {
            id: SceneId::new(),
            ..self.clone()
        }
    }
}
