use crate::ids::ViewIndex;
use std::io;
use std::path::PathBuf;

/// Errors produced while decoding a binary camera pose file.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("Unsupported camera format: {} (expected a .bin pose file)", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Failed to open camera file {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("Failed to read camera file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Camera file {} is truncated: read {read} of 96 bytes", .path.display())]
    Truncated { path: PathBuf, read: usize },
    #[error("Camera file {} holds a degenerate projection matrix", .0.display())]
    Degenerate(PathBuf),
}

/// Errors recorded while loading a scene directory.
///
/// None of these abort a load; they are collected as diagnostics on the
/// document.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Required file is missing: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("Cannot open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("Failed reading {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("{}:{line}: {reason}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("Cannot read camera for view {view}: {source}")]
    Camera {
        view: ViewIndex,
        #[source]
        source: CameraError,
    },
}
