//! Scene Expander - enumerates every conditional branch of every scene.
//!
//! Expansion works bucket by bucket:
//! 1. **Collect**: gather the bucket's anchor occurrences in
//!    first-appearance order
//! 2. **Split**: for each anchor, walk only the variants that existed
//!    before the anchor started and fork each one still carrying its markup
//! 3. **Tag**: the fork substitutes the passed text and appends the anchor's
//!    condition name; the original substitutes the failed text in place and
//!    keeps its conditions
//! 4. **Verify**: every description must be anchor-free afterwards
//!
//! A scene with k anchors deterministically yields 2^k variants. Because
//! failed branches mutate in place and passed forks append at the tail, the
//! all-failed baseline stays first and each anchor's forks land strictly
//! after every variant derived purely from earlier anchors. Rendering
//! depends on that ordering; it is a contract, not an implementation detail.

use std::collections::HashMap;

use tracing::{debug, trace};

use story_model::{Scene, SceneKey, Story};

use crate::anchor::{contains_anchor, scan_anchors, Anchor};
use crate::error::LinkerError;

/// Configuration for the expansion pass.
#[derive(Debug, Clone)]
pub struct ExpansionConfig {
    /// Maximum number of conditional anchors allowed in one originating
    /// scene.
    ///
    /// Variant count is exponential in the anchor count (2^k), so the cap
    /// bounds every bucket at 2^max variants. A scene over the cap aborts
    /// expansion with [`LinkerError::TooManyAnchors`] before any splitting
    /// happens.
    pub max_anchors_per_scene: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_anchors_per_scene: 12,
        }
    }
}

/// The expander resolves every anchor in every bucket of a story.
pub struct SceneExpander {
    config: ExpansionConfig,
}

impl SceneExpander {
    /// Create a new expander with the given configuration.
    pub fn new(config: ExpansionConfig) -> Self {
        Self { config }
    }

    /// Create an expander with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ExpansionConfig::default())
    }

    /// Expand every bucket of the story in place.
    ///
    /// On success every bucket holds one variant per combination of its
    /// anchors' conditions, with all markup resolved and the all-failed
    /// baseline first. Expanding an already expanded story changes nothing.
    ///
    /// On error the story must be discarded: buckets processed before the
    /// failure keep their expanded state. No variant is ever removed.
    pub fn expand_scenes(&self, story: &mut Story) -> Result<(), LinkerError> {
        if story.scenes.is_empty() {
            return Err(LinkerError::EmptyStory);
        }

        for (key, bucket) in story.scenes.iter_mut() {
            self.expand_bucket(key, bucket)?;
        }

        if !story.scenes.contains(&story.first_scene) {
            return Err(LinkerError::UnknownFirstScene {
                key: story.first_scene.clone(),
            });
        }

        debug!(
            buckets = story.scenes.bucket_count(),
            variants = story.scenes.variant_count(),
            "expanded story"
        );
        Ok(())
    }

    fn expand_bucket(&self, key: &SceneKey, bucket: &mut Vec<Scene>) -> Result<(), LinkerError> {
        let anchors = self.collect_anchors(bucket);
        if anchors.is_empty() {
            return Ok(());
        }

        let scene_name = bucket
            .first()
            .map(|scene| scene.name.clone())
            .unwrap_or_default();

        if let Some(anchor) = anchors.iter().find(|anchor| anchor.condition.is_empty()) {
            return Err(LinkerError::EmptyConditionName {
                scene: scene_name,
                markup: anchor.markup(),
            });
        }
        if anchors.len() > self.config.max_anchors_per_scene {
            return Err(LinkerError::TooManyAnchors {
                scene: scene_name,
                count: anchors.len(),
                limit: self.config.max_anchors_per_scene,
            });
        }

        debug!(bucket = %key, anchors = anchors.len(), "expanding bucket");

        for anchor in &anchors {
            let markup = anchor.markup();
            // Only variants that existed before this anchor started are
            // eligible; forks appended below stay past the bound and are
            // never reprocessed by the same anchor.
            let bound = bucket.len();
            for index in 0..bound {
                if !bucket[index].description.contains(&markup) {
                    continue;
                }

                trace!(bucket = %key, condition = %anchor.condition, index, "splitting variant");

                let mut passed = bucket[index].fork();
                passed.description = passed.description.replacen(&markup, &anchor.passed_text, 1);
                passed.push_condition(anchor.condition.as_str());

                bucket[index].description =
                    bucket[index].description.replacen(&markup, &anchor.failed_text, 1);

                bucket.push(passed);
            }
        }

        debug_assert!(
            bucket.iter().all(|scene| !contains_anchor(&scene.description)),
            "bucket '{key}' still contains anchor markup after expansion"
        );
        Ok(())
    }

    /// Gather anchor occurrences across a bucket's variants in
    /// first-appearance order: variant order, then character offset.
    ///
    /// Identical markup occurring n times within one variant yields n
    /// independent occurrences. The same markup seen again in a later
    /// variant is the same branch point and is not collected twice.
    fn collect_anchors(&self, bucket: &[Scene]) -> Vec<Anchor> {
        let mut anchors = Vec::new();
        let mut collected: HashMap<String, usize> = HashMap::new();

        for scene in bucket {
            let mut in_this_variant: HashMap<String, usize> = HashMap::new();

            for anchor in scan_anchors(&scene.description) {
                let markup = anchor.markup();
                let ordinal = in_this_variant.entry(markup.clone()).or_insert(0);
                *ordinal += 1;

                let known = collected.entry(markup).or_insert(0);
                if *ordinal > *known {
                    *known = *ordinal;
                    anchors.push(anchor);
                }
            }
        }

        anchors
    }
}
