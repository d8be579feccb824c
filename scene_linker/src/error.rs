//! Error taxonomy for the expansion pass.

use story_model::SceneKey;
use thiserror::Error;

/// Fatal errors raised while expanding a story.
///
/// Every variant aborts the whole compilation pass. The operation is pure
/// and deterministic, so retrying without changing the input cannot change
/// the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkerError {
    /// The story defines no scenes at all.
    #[error("story has no scenes")]
    EmptyStory,

    /// The first-scene key does not resolve to a non-empty bucket.
    #[error("first scene '{key}' does not match any scene")]
    UnknownFirstScene { key: SceneKey },

    /// An anchor's condition capture is empty.
    #[error("scene '{scene}' has an anchor with an empty condition name: {markup}")]
    EmptyConditionName { scene: String, markup: String },

    /// A scene carries more anchors than the configured cap allows.
    #[error("scene '{scene}' has {count} conditional anchors, exceeding the limit of {limit}")]
    TooManyAnchors {
        scene: String,
        count: usize,
        limit: usize,
    },
}

impl LinkerError {
    /// Whether the author can fix this error by editing the story source.
    ///
    /// Everything except the anchor cap is a story definition problem;
    /// the cap is a resource limit.
    pub fn is_definition_error(&self) -> bool {
        !matches!(self, LinkerError::TooManyAnchors { .. })
    }
}
