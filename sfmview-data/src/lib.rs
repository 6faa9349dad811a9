//! sfmview Data Crate
//!
//! Loading of structure-from-motion scene directories: the reconstructed point
//! cloud, its tracks and visibility, and one decoded pinhole camera per view.
//! This crate is renderer-agnostic and only reads data; a viewer consumes the
//! resulting [`Document`].

pub mod camera;
pub mod document;
pub mod error;
pub mod ids;
pub mod point_cloud;
pub mod tracks;

#[cfg(test)]
pub(crate) mod test_support;

pub use camera::{PinholeCamera, Projection, krt_from_projection, read_camera};
pub use document::{ClipPlanes, Document, SceneSummary};
pub use error::{CameraError, SceneError};
pub use ids::{FeatureId, ImageId, TrackId, ViewIndex};
pub use point_cloud::PointCloud;
pub use tracks::{Observation, Track, VisibilityIndex};
