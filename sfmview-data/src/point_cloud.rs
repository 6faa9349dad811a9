//! Flat point cloud storage.

use glam::Vec3;

/// Reconstructed 3D points stored as a flat `[x0, y0, z0, x1, ...]` buffer.
///
/// Point `i` lives at offsets `3i..3i+2`. Points are only appended while a
/// document loads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    coords: Vec<f32>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, position: [f32; 3]) {
        self.coords.extend_from_slice(&position);
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.coords.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Position of point `index`, if it exists.
    pub fn point(&self, index: usize) -> Option<Vec3> {
        let start = index.checked_mul(3)?;
        self.coords
            .get(start..start + 3)
            .map(|xyz| Vec3::new(xyz[0], xyz[1], xyz[2]))
    }

    /// Iterate over all positions in index order.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.coords.chunks_exact(3).map(Vec3::from_slice)
    }

    /// The flat coordinate buffer, ready for upload to a vertex buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.coords
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for an empty cloud.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut positions = self.positions();
        let first = positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| {
            (min.min(p), max.max(p))
        }))
    }
}
