//! Tracks and the image visibility index derived from them.

use crate::ids::{FeatureId, ImageId, TrackId};
use std::collections::{BTreeMap, BTreeSet};

/// A single 2D observation of a reconstructed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Observation {
    pub image: ImageId,
    pub feature: FeatureId,
}

impl Observation {
    pub fn new(image: ImageId, feature: FeatureId) -> Self {
        Self { image, feature }
    }
}

/// The set of observations that correspond to one 3D point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    observations: BTreeSet<Observation>,
}

impl Track {
    /// Insert an observation. Returns `false` if it was already present.
    pub(crate) fn insert(&mut self, observation: Observation) -> bool {
        self.observations.insert(observation)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn contains(&self, observation: &Observation) -> bool {
        self.observations.contains(observation)
    }

    pub fn observations(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }
}

/// Image id to the ids of the tracks seen in that image.
///
/// Lists keep insertion order and are never deduplicated: a track inserted
/// twice for the same image appears twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityIndex {
    by_image: BTreeMap<ImageId, Vec<TrackId>>,
}

impl VisibilityIndex {
    pub(crate) fn push(&mut self, image: ImageId, track: TrackId) {
        self.by_image.entry(image).or_default().push(track);
    }

    /// Tracks visible in `image`, in insertion order. Empty for unknown images.
    pub fn tracks(&self, image: ImageId) -> &[TrackId] {
        self.by_image.get(&image).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of images with at least one visible track.
    pub fn image_count(&self) -> usize {
        self.by_image.len()
    }

    /// Total number of entries over all images.
    pub fn entry_count(&self) -> usize {
        self.by_image.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ImageId, &[TrackId])> {
        self.by_image
            .iter()
            .map(|(image, tracks)| (*image, tracks.as_slice()))
    }
}
