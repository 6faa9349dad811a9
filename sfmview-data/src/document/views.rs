//! `views.txt` parsing.

use crate::document::tokens::{Tokens, decode_line};
use crate::error::SceneError;
use serde::Serialize;
use std::io::BufRead;
use std::path::Path;

/// Folder name and comment lines at the top of the file.
const HEADER_LINES: usize = 2;

/// Near and far clipping distances of a view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClipPlanes {
    pub near: f32,
    pub far: f32,
}

/// One `imageName width height cameraFileName znear zfar` record.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ViewRecord {
    pub image_name: String,
    pub width: u32,
    pub height: u32,
    pub camera_file: String,
    pub clip: ClipPlanes,
}

pub(crate) fn parse_view_line(line: &str) -> Result<ViewRecord, String> {
    let mut tokens = Tokens::new(line);
    let image_name = tokens.next_str("image name")?.to_string();
    let width = tokens.next_value("width")?;
    let height = tokens.next_value("height")?;
    let camera_file = tokens.next_str("camera file name")?.to_string();
    let near = tokens.next_finite("near distance")?;
    let far = tokens.next_finite("far distance")?;
    tokens.finish()?;

    Ok(ViewRecord {
        image_name,
        width,
        height,
        camera_file,
        clip: ClipPlanes { near, far },
    })
}

/// Feed every view record to `on_record`.
///
/// A malformed record, including one that is not valid UTF-8, is passed on as
/// an error and parsing continues with the next line. The two header lines are
/// skipped without being decoded. The image count line is advisory: it is
/// returned for comparison but never bounds the loop.
pub(crate) fn read_views<R: BufRead>(
    reader: R,
    path: &Path,
    mut on_record: impl FnMut(Result<ViewRecord, SceneError>),
) -> Result<Option<usize>, SceneError> {
    let parse_error = |line: usize, reason: String| SceneError::Parse {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut declared = None;
    let mut seen_count = false;
    for (index, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes.map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if index < HEADER_LINES {
            continue;
        }
        let line = match decode_line(&bytes) {
            Ok(line) => line,
            Err(reason) => {
                seen_count = true;
                on_record(Err(parse_error(index + 1, reason)));
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        if !seen_count {
            seen_count = true;
            match Tokens::new(line).next_value::<usize>("image count") {
                Ok(count) => declared = Some(count),
                Err(reason) => on_record(Err(parse_error(index + 1, reason))),
            }
            continue;
        }

        on_record(parse_view_line(line).map_err(|reason| parse_error(index + 1, reason)));
    }
    Ok(declared)
}
