//! Story aggregate - the variant pool and its normalized-name buckets.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::scene::Scene;

/// Normalized scene name, used as the bucket key.
///
/// Derived deterministically from a display name: trimmed, lowercased,
/// with internal whitespace runs collapsed to a single hyphen. All
/// variants of one authored scene share one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneKey(String);

impl SceneKey {
    /// Normalize a display name into a bucket key.
    pub fn new(display_name: &str) -> Self {
        let mut key = String::with_capacity(display_name.len());
        for word in display_name.split_whitespace() {
            if !key.is_empty() {
                key.push('-');
            }
            key.push_str(&word.to_lowercase());
        }
        Self(key)
    }

    /// The normalized key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SceneKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The scene registry: normalized name -> ordered list of variants.
///
/// Bucket insertion order is preserved; the first bucket inserted
/// corresponds to the first authored scene. Within a bucket, variant
/// order is the order scenes were inserted or appended.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScenePool {
    buckets: IndexMap<SceneKey, Vec<Scene>>,
}

impl ScenePool {
    /// Create a new empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a scene into its bucket, creating the bucket on first use.
    ///
    /// Returns the bucket key for reference.
    pub fn insert(&mut self, scene: Scene) -> SceneKey {
        let key = scene.key();
        self.buckets.entry(key.clone()).or_default().push(scene);
        key
    }

    /// Get the variants of a bucket.
    pub fn bucket(&self, key: &SceneKey) -> Option<&[Scene]> {
        self.buckets.get(key).map(|bucket| bucket.as_slice())
    }

    /// Get the variants of a bucket mutably.
    pub fn bucket_mut(&mut self, key: &SceneKey) -> Option<&mut Vec<Scene>> {
        self.buckets.get_mut(key)
    }

    /// Check whether a key resolves to a non-empty bucket.
    pub fn contains(&self, key: &SceneKey) -> bool {
        self.buckets.get(key).map_or(false, |bucket| !bucket.is_empty())
    }

    /// Iterate bucket keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &SceneKey> {
        self.buckets.keys()
    }

    /// Iterate buckets in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&SceneKey, &[Scene])> {
        self.buckets.iter().map(|(key, bucket)| (key, bucket.as_slice()))
    }

    /// Iterate buckets mutably, in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&SceneKey, &mut Vec<Scene>)> {
        self.buckets.iter_mut()
    }

    /// Number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of scene variants across all buckets.
    pub fn variant_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Check whether the pool holds no buckets at all.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// A complete story: metadata, entry point, and the scene pool.
///
/// The pool is populated by a loader with one raw scene per bucket, handed
/// to expansion, and read by a renderer afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub name: String,
    pub description: String,

    /// Key of the scene the story opens with. Empty until the first scene
    /// is added or a key is set explicitly.
    pub first_scene: SceneKey,

    pub scenes: ScenePool,
}

impl Story {
    /// Create a new story with an empty scene pool.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            first_scene: SceneKey::new(""),
            scenes: ScenePool::new(),
        }
    }

    /// Set the opening scene (builder form).
    pub fn with_first_scene(mut self, key: SceneKey) -> Self {
        self.first_scene = key;
        self
    }

    /// Add a scene to the pool.
    ///
    /// The first scene added becomes the opening scene unless one was set
    /// explicitly. Returns the bucket key.
    pub fn add_scene(&mut self, scene: Scene) -> SceneKey {
        let key = self.scenes.insert(scene);
        if self.first_scene.as_str().is_empty() {
            self.first_scene = key.clone();
        }
        key
    }

    /// The variants of the opening scene's bucket.
    pub fn first_bucket(&self) -> Option<&[Scene]> {
        self.scenes.bucket(&self.first_scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_normalization() {
        assert_eq!(SceneKey::new("Test Scene").as_str(), "test-scene");
        assert_eq!(SceneKey::new("  Padded Name  ").as_str(), "padded-name");
        assert_eq!(SceneKey::new("Runs   of\twhitespace").as_str(), "runs-of-whitespace");
        assert_eq!(SceneKey::new("already-normal").as_str(), "already-normal");
        assert_eq!(SceneKey::new("UPPER Case").as_str(), "upper-case");
    }

    #[test]
    fn test_same_key_for_equivalent_names() {
        assert_eq!(SceneKey::new("Test Scene"), SceneKey::new("  test   SCENE "));
    }

    #[test]
    fn test_insert_groups_by_key() {
        let mut pool = ScenePool::new();

        pool.insert(Scene::new("Test Scene", "First."));
        pool.insert(Scene::new("test  scene", "Second."));
        pool.insert(Scene::new("Other Scene", "Third."));

        assert_eq!(pool.bucket_count(), 2);
        assert_eq!(pool.variant_count(), 3);

        let bucket = pool.bucket(&SceneKey::new("Test Scene")).unwrap();
        assert_eq!(bucket.len(), 2);
        assert_eq!(bucket[0].description, "First.");
        assert_eq!(bucket[1].description, "Second.");
    }

    #[test]
    fn test_buckets_keep_insertion_order() {
        let mut pool = ScenePool::new();

        pool.insert(Scene::new("Gamma", "g"));
        pool.insert(Scene::new("Alpha", "a"));
        pool.insert(Scene::new("Beta", "b"));

        let keys: Vec<_> = pool.keys().map(SceneKey::as_str).collect();
        assert_eq!(keys, vec!["gamma", "alpha", "beta"]);
    }

    #[test]
    fn test_contains_requires_non_empty_bucket() {
        let mut pool = ScenePool::new();
        let key = pool.insert(Scene::new("Test Scene", "Text."));

        assert!(pool.contains(&key));
        assert!(!pool.contains(&SceneKey::new("missing")));

        pool.bucket_mut(&key).unwrap().clear();
        assert!(!pool.contains(&key));
    }

    #[test]
    fn test_first_scene_defaults_to_first_added() {
        let mut story = Story::new("Test Story", "Story description.");

        story.add_scene(Scene::new("Opening", "Begin."));
        story.add_scene(Scene::new("Ending", "End."));

        assert_eq!(story.first_scene, SceneKey::new("Opening"));
        assert_eq!(story.first_bucket().unwrap().len(), 1);
    }

    #[test]
    fn test_explicit_first_scene_is_kept() {
        let mut story = Story::new("Test Story", "Story description.")
            .with_first_scene(SceneKey::new("Ending"));

        story.add_scene(Scene::new("Opening", "Begin."));
        story.add_scene(Scene::new("Ending", "End."));

        assert_eq!(story.first_scene, SceneKey::new("Ending"));
    }

    #[test]
    fn test_story_round_trips_through_json() {
        let mut story = Story::new("Test Story", "Story description.");
        story.add_scene(Scene::new("Test Scene", "Resolved text."));
        story.add_scene(
            Scene::new("Test Scene", "Other resolved text.").with_condition("test-condition"),
        );

        let json = serde_json::to_string(&story).unwrap();
        let restored: Story = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.name, story.name);
        assert_eq!(restored.first_scene, story.first_scene);
        assert_eq!(restored.scenes.bucket_count(), 1);

        let bucket = restored.first_bucket().unwrap();
        assert_eq!(bucket.len(), 2);
        assert!(bucket[0].conditions.is_none());
        assert_eq!(bucket[1].conditions, Some(vec!["test-condition".to_string()]));
    }
}
