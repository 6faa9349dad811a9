//! `clouds/visibility.txt` parsing.
//!
//! One record per line: `x y z count (imageId featId){count}`. Line order is
//! track id order.

use crate::document::tokens::{Tokens, decode_line};
use crate::error::SceneError;
use crate::ids::{FeatureId, ImageId};
use crate::tracks::Observation;
use std::io::BufRead;
use std::path::Path;

/// One fully validated visibility record.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrackRecord {
    pub position: [f32; 3],
    pub observations: Vec<Observation>,
}

/// Parse a single line. Blank lines yield `None`.
pub(crate) fn parse_track_line(line: &str) -> Result<Option<TrackRecord>, String> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut tokens = Tokens::new(line);
    let position = [
        tokens.next_finite("x coordinate")?,
        tokens.next_finite("y coordinate")?,
        tokens.next_finite("z coordinate")?,
    ];
    let count: usize = tokens.next_value("observation count")?;

    let mut observations = Vec::new();
    for i in 0..count {
        let image = tokens
            .next_value("image id")
            .map_err(|err| format!("observation {i}: {err}"))?;
        let feature = tokens
            .next_value("feature id")
            .map_err(|err| format!("observation {i}: {err}"))?;
        observations.push(Observation::new(ImageId(image), FeatureId(feature)));
    }
    tokens.finish()?;

    Ok(Some(TrackRecord {
        position,
        observations,
    }))
}

/// Feed every record of a visibility file to `on_record`, in file order.
///
/// Stops at the first malformed line; records before it have already been
/// delivered. Returns the number of records read.
pub(crate) fn read_tracks<R: BufRead>(
    reader: R,
    path: &Path,
    mut on_record: impl FnMut(TrackRecord),
) -> Result<usize, SceneError> {
    let mut count = 0;
    for (index, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes.map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let record = decode_line(&bytes)
            .and_then(parse_track_line)
            .map_err(|reason| SceneError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                reason,
            })?;
        if let Some(record) = record {
            on_record(record);
            count += 1;
        }
    }
    Ok(count)
}
