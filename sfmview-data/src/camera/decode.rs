//! Binary pose file decoding

use crate::camera::{PinholeCamera, Projection};
use crate::error::CameraError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::trace;

/// File extension of binary pose files.
pub const POSE_EXTENSION: &str = "bin";

const POSE_VALUES: usize = 12;
const POSE_BYTES: usize = POSE_VALUES * size_of::<f64>();

/// Decode a camera from a binary pose file.
///
/// The file holds 12 native-endian `f64` values, a column-major 3×4
/// projection matrix, with no header. Bytes past the 96th are ignored.
#[tracing::instrument(level = "trace", skip_all, fields(path = %path.display()))]
pub fn read_camera(path: &Path) -> Result<PinholeCamera, CameraError> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(POSE_EXTENSION) {
        return Err(CameraError::UnsupportedFormat(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| CameraError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut bytes = Vec::with_capacity(POSE_BYTES);
    BufReader::new(file)
        .take(POSE_BYTES as u64)
        .read_to_end(&mut bytes)
        .map_err(|source| CameraError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    if bytes.len() < POSE_BYTES {
        return Err(CameraError::Truncated {
            path: path.to_path_buf(),
            read: bytes.len(),
        });
    }

    let mut values = [0.0f64; POSE_VALUES];
    for (value, chunk) in values.iter_mut().zip(bytes.chunks_exact(size_of::<f64>())) {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(chunk);
        *value = f64::from_ne_bytes(raw);
    }
    trace!("Projection values: {:?}", values);

    PinholeCamera::from_projection(&Projection::from_column_major(&values))
        .ok_or_else(|| CameraError::Degenerate(path.to_path_buf()))
}
