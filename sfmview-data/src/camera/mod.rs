//! Pinhole cameras and binary pose file decoding

mod decode;
mod pinhole;

pub use decode::{POSE_EXTENSION, read_camera};
pub use pinhole::{PinholeCamera, Projection, krt_from_projection};
