//! Fixtures shared by the unit tests.

use crate::camera::Projection;
use glam::{DMat3, DVec3};
use std::fs;
use std::path::Path;

pub(crate) fn sample_intrinsics() -> DMat3 {
    DMat3::from_cols(
        DVec3::new(800.0, 0.0, 0.0),
        DVec3::new(0.5, 820.0, 0.0),
        DVec3::new(320.0, 240.0, 1.0),
    )
}

pub(crate) fn sample_rotation() -> DMat3 {
    DMat3::from_axis_angle(DVec3::new(1.0, 2.0, 3.0).normalize(), 0.7)
}

pub(crate) fn write_pose_file(path: &Path, projection: &Projection) {
    let bytes: Vec<u8> = projection
        .to_column_major()
        .iter()
        .flat_map(|v| v.to_ne_bytes())
        .collect();
    fs::write(path, bytes).unwrap();
}

/// Write `contents` to `root/relative`, creating parent directories.
pub(crate) fn write_file(root: &Path, relative: &str, contents: impl AsRef<[u8]>) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}
