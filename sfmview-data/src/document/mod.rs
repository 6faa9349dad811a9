//! Scene document: everything loaded from one reconstruction directory.

mod loader;
mod tokens;
mod views;
mod visibility;

pub use views::ClipPlanes;

use crate::camera::PinholeCamera;
use crate::error::SceneError;
use crate::ids::{ImageId, TrackId, ViewIndex};
use crate::point_cloud::PointCloud;
use crate::tracks::{Track, VisibilityIndex};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Directory layout of a reconstruction.
///
/// ```text
/// <root>/
///   clouds/visibility.txt
///   views.txt
///   cameras/<name>.bin
/// ```
pub mod layout {
    use std::path::{Path, PathBuf};

    pub const CLOUDS_DIR: &str = "clouds";
    pub const VISIBILITY_FILE: &str = "visibility.txt";
    pub const VIEWS_FILE: &str = "views.txt";
    pub const CAMERAS_DIR: &str = "cameras";

    pub fn visibility_path(root: &Path) -> PathBuf {
        root.join(CLOUDS_DIR).join(VISIBILITY_FILE)
    }

    pub fn views_path(root: &Path) -> PathBuf {
        root.join(VIEWS_FILE)
    }

    pub fn cameras_dir(root: &Path) -> PathBuf {
        root.join(CAMERAS_DIR)
    }
}

/// Point cloud, tracks, visibility and cameras of a reconstruction.
///
/// Built by [`Document::load`]. A failed or partial load leaves whatever was
/// read so far in place; check the returned flag and [`Document::diagnostics`]
/// before relying on completeness.
#[derive(Debug, Default)]
pub struct Document {
    root: PathBuf,
    points: PointCloud,
    tracks: Vec<Track>,
    visibility: VisibilityIndex,
    cameras: BTreeMap<ViewIndex, Option<PinholeCamera>>,
    image_names: Vec<String>,
    image_sizes: BTreeMap<ViewIndex, (u32, u32)>,
    clip_planes: BTreeMap<ViewIndex, ClipPlanes>,
    diagnostics: Vec<SceneError>,
}

/// Counts describing a loaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneSummary {
    pub root: PathBuf,
    pub points: usize,
    pub tracks: usize,
    pub observations: usize,
    pub observed_images: usize,
    pub views: usize,
    pub cameras: usize,
    pub diagnostics: usize,
}

impl Document {
    /// Root directory the document was loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn points(&self) -> &PointCloud {
        &self.points
    }

    /// All tracks; `tracks()[i]` belongs to point `i`.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(id.index())
    }

    pub fn visibility(&self) -> &VisibilityIndex {
        &self.visibility
    }

    /// Tracks seen in `image`, in file order.
    pub fn visible_tracks(&self, image: ImageId) -> &[TrackId] {
        self.visibility.tracks(image)
    }

    /// Camera registry. `None` marks a view whose pose file could not be decoded.
    pub fn cameras(&self) -> &BTreeMap<ViewIndex, Option<PinholeCamera>> {
        &self.cameras
    }

    pub fn camera(&self, view: ViewIndex) -> Option<&PinholeCamera> {
        self.cameras.get(&view).and_then(Option::as_ref)
    }

    /// Number of views with a decoded camera.
    pub fn camera_count(&self) -> usize {
        self.cameras.values().filter(|camera| camera.is_some()).count()
    }

    pub fn image_names(&self) -> &[String] {
        &self.image_names
    }

    pub fn image_name(&self, view: ViewIndex) -> Option<&str> {
        self.image_names.get(view.index()).map(String::as_str)
    }

    /// `(width, height)` of the image of `view`.
    pub fn image_size(&self, view: ViewIndex) -> Option<(u32, u32)> {
        self.image_sizes.get(&view).copied()
    }

    pub fn image_sizes(&self) -> &BTreeMap<ViewIndex, (u32, u32)> {
        &self.image_sizes
    }

    pub fn clip_planes(&self, view: ViewIndex) -> Option<ClipPlanes> {
        self.clip_planes.get(&view).copied()
    }

    pub fn view_count(&self) -> usize {
        self.image_names.len()
    }

    /// Failures recovered from during the last load, in occurrence order.
    pub fn diagnostics(&self) -> &[SceneError] {
        &self.diagnostics
    }

    pub fn summary(&self) -> SceneSummary {
        SceneSummary {
            root: self.root.clone(),
            points: self.points.len(),
            tracks: self.tracks.len(),
            observations: self.tracks.iter().map(Track::len).sum(),
            observed_images: self.visibility.image_count(),
            views: self.view_count(),
            cameras: self.camera_count(),
            diagnostics: self.diagnostics.len(),
        }
    }
}
