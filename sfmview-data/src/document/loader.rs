//! Loading a document from a reconstruction directory.

use crate::camera::read_camera;
use crate::document::views::{self, ViewRecord};
use crate::document::visibility::{self, TrackRecord};
use crate::document::{Document, layout};
use crate::error::SceneError;
use crate::ids::{TrackId, ViewIndex};
use crate::tracks::Track;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

impl Document {
    /// Load the reconstruction under `root` into a new document.
    pub fn from_directory(root: impl AsRef<Path>) -> (Self, bool) {
        let mut document = Self::default();
        let loaded = document.load(root);
        (document, loaded)
    }

    /// Load the reconstruction under `root`, replacing any previous contents.
    ///
    /// The visibility and views files are read independently; a missing or
    /// broken one is recorded in [`Document::diagnostics`] and the other is
    /// still read. Returns `true` iff at least one view has a decoded camera,
    /// even if the point cloud loaded fine.
    #[tracing::instrument(skip_all, fields(path = %root.as_ref().display()))]
    pub fn load(&mut self, root: impl AsRef<Path>) -> bool {
        let root = root.as_ref();
        *self = Self {
            root: root.to_path_buf(),
            ..Self::default()
        };

        let visibility_path = layout::visibility_path(root);
        match open_required(&visibility_path) {
            Ok(reader) => self.load_visibility(reader, &visibility_path),
            Err(err) => self.record(err),
        }

        let views_path = layout::views_path(root);
        match open_required(&views_path) {
            Ok(reader) => self.load_views(reader, &views_path, &layout::cameras_dir(root)),
            Err(err) => self.record(err),
        }

        info!(images = ?self.image_names, "Loaded image names");
        info!(
            "Scene loaded: {} points, {} tracks, {} views, {} cameras, {} diagnostics",
            self.points.len(),
            self.tracks.len(),
            self.view_count(),
            self.camera_count(),
            self.diagnostics.len()
        );

        self.camera_count() > 0
    }

    fn load_visibility<R: BufRead>(&mut self, reader: R, path: &Path) {
        let result = visibility::read_tracks(reader, path, |record| {
            self.push_track(record);
        });
        match result {
            Ok(count) => debug!("Read {} tracks from {}", count, path.display()),
            Err(err) => self.record(err),
        }
    }

    fn load_views<R: BufRead>(&mut self, reader: R, path: &Path, cameras_dir: &Path) {
        let result = views::read_views(reader, path, |entry| match entry {
            Ok(record) => {
                self.push_view(record, cameras_dir);
            }
            Err(err) => self.record(err),
        });
        match result {
            Ok(Some(declared)) if declared != self.view_count() => warn!(
                "{} declares {} images but lists {}",
                path.display(),
                declared,
                self.view_count()
            ),
            Ok(_) => debug!("Read {} views from {}", self.view_count(), path.display()),
            Err(err) => self.record(err),
        }
    }

    fn push_track(&mut self, record: TrackRecord) -> TrackId {
        let id = TrackId(self.tracks.len());
        let mut track = Track::default();
        for observation in record.observations {
            track.insert(observation);
            self.visibility.push(observation.image, id);
        }
        self.points.push(record.position);
        self.tracks.push(track);
        id
    }

    fn push_view(&mut self, record: ViewRecord, cameras_dir: &Path) -> ViewIndex {
        let view = ViewIndex(self.image_names.len());
        let camera = match read_camera(&cameras_dir.join(&record.camera_file)) {
            Ok(camera) => Some(camera),
            Err(source) => {
                self.record(SceneError::Camera { view, source });
                None
            }
        };

        self.cameras.insert(view, camera);
        self.image_names.push(record.image_name);
        self.image_sizes.insert(view, (record.width, record.height));
        self.clip_planes.insert(view, record.clip);
        view
    }

    fn record(&mut self, err: SceneError) {
        warn!("{}", err);
        self.diagnostics.push(err);
    }
}

fn open_required(path: &Path) -> Result<BufReader<File>, SceneError> {
    if !path.is_file() {
        return Err(SceneError::MissingFile(path.to_path_buf()));
    }
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| SceneError::Open {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PinholeCamera;
    use crate::error::CameraError;
    use crate::ids::{FeatureId, ImageId};
    use crate::test_support::{sample_intrinsics, sample_rotation, write_file, write_pose_file};
    use crate::tracks::Observation;
    use glam::{DVec3, Vec3};
    use std::collections::HashMap;

    const VISIBILITY: &str = "\
0 0 0 2 0 5 1 7
1 2 3 3 0 6 2 1 0 6
-1 0.5 4 1 1 9

";

    fn write_camera(root: &Path, name: &str, t: DVec3) -> PinholeCamera {
        let camera = PinholeCamera::new(sample_intrinsics(), sample_rotation(), t);
        let dir = root.join("cameras");
        std::fs::create_dir_all(&dir).unwrap();
        write_pose_file(&dir.join(name), &camera.projection);
        camera
    }

    #[test]
    fn test_load_full_scene() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_file(root, "clouds/visibility.txt", VISIBILITY);
        write_file(
            root,
            "views.txt",
            "images\ncomment\n3\n\
             a.jpg 640 480 a.bin 0.1 50\n\
             b.jpg 800 600 b.bin 0.2 60\n\
             c.jpg 320 240 c.bin 0.3 70\n",
        );
        let a = write_camera(root, "a.bin", DVec3::new(0.0, 0.0, 2.0));
        let c = write_camera(root, "c.bin", DVec3::new(1.0, 0.0, 2.0));

        let (document, loaded) = Document::from_directory(root);
        assert!(loaded);
        assert_eq!(document.root(), root);

        assert_eq!(document.points().len(), 3);
        assert_eq!(document.points().point(1), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(document.tracks().len(), 3);

        assert_eq!(document.view_count(), 3);
        assert_eq!(document.image_name(ViewIndex(1)), Some("b.jpg"));
        assert_eq!(document.image_size(ViewIndex(2)), Some((320, 240)));
        assert_eq!(document.clip_planes(ViewIndex(0)).unwrap().far, 50.0);

        assert!(document.camera(ViewIndex(0)).unwrap().t.abs_diff_eq(a.t, 1e-9));
        assert!(document.camera(ViewIndex(2)).unwrap().t.abs_diff_eq(c.t, 1e-9));
        // b.bin does not exist: the view is kept without a camera.
        assert_eq!(document.cameras().len(), 3);
        assert!(document.cameras()[&ViewIndex(1)].is_none());
        assert_eq!(document.camera_count(), 2);
        assert_eq!(document.diagnostics().len(), 1);
        assert!(matches!(
            document.diagnostics()[0],
            SceneError::Camera {
                view: ViewIndex(1),
                source: CameraError::Open { .. }
            }
        ));

        let summary = document.summary();
        assert_eq!(summary.points, 3);
        assert_eq!(summary.observations, 5);
        assert_eq!(summary.observed_images, 3);
        assert_eq!(summary.cameras, 2);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["views"], 3);
    }

    #[test]
    fn test_visibility_matches_tracks() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "clouds/visibility.txt", VISIBILITY);
        let (document, _) = Document::from_directory(dir.path());

        // Track ids are dense and equal to point indices.
        assert_eq!(document.tracks().len(), document.points().len());

        // The duplicated (0, 6) observation of track 1 is stored once in the
        // track but twice in the visibility list.
        let track = document.track(TrackId(1)).unwrap();
        assert_eq!(track.len(), 2);
        assert!(track.contains(&Observation::new(ImageId(2), FeatureId(1))));
        assert_eq!(
            document.visible_tracks(ImageId(0)),
            &[TrackId(0), TrackId(1), TrackId(1)]
        );
        assert_eq!(document.visible_tracks(ImageId(1)), &[TrackId(0), TrackId(2)]);

        let mut inserted: HashMap<(ImageId, TrackId), usize> = HashMap::new();
        for (track, text) in VISIBILITY.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let values: Vec<usize> = text
                .split_whitespace()
                .skip(4)
                .map(|v| v.parse().unwrap())
                .collect();
            for pair in values.chunks(2) {
                *inserted.entry((ImageId(pair[0]), TrackId(track))).or_default() += 1;
            }
        }
        for ((image, track), count) in inserted {
            let seen = document
                .visible_tracks(image)
                .iter()
                .filter(|id| **id == track)
                .count();
            assert_eq!(seen, count);
        }
        assert_eq!(document.visibility().entry_count(), 6);
    }

    #[test]
    fn test_missing_views_file() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "clouds/visibility.txt", VISIBILITY);

        let (document, loaded) = Document::from_directory(dir.path());
        assert!(!loaded);
        assert_eq!(document.points().len(), 3);
        assert_eq!(document.tracks().len(), 3);
        assert!(document.cameras().is_empty());
        assert!(matches!(document.diagnostics(), [SceneError::MissingFile(_)]));
    }

    #[test]
    fn test_missing_visibility_file_still_loads_views() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_file(root, "views.txt", "images\n\n1\na.jpg 4 3 a.bin 1 2\n");
        write_camera(root, "a.bin", DVec3::Z);

        let (document, loaded) = Document::from_directory(root);
        assert!(loaded);
        assert!(document.points().is_empty());
        assert_eq!(document.camera_count(), 1);
        assert!(matches!(document.diagnostics(), [SceneError::MissingFile(_)]));
    }

    #[test]
    fn test_only_view_with_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_file(root, "clouds/visibility.txt", VISIBILITY);
        write_file(root, "views.txt", "images\ncomment\n1\na.jpg 640 480 a.txt 0.1 50\n");
        write_camera(root, "a.txt", DVec3::Z);

        let (document, loaded) = Document::from_directory(root);
        assert!(!loaded);
        assert_eq!(document.image_names(), &["a.jpg".to_string()]);
        assert_eq!(document.image_size(ViewIndex(0)), Some((640, 480)));
        assert!(document.camera(ViewIndex(0)).is_none());
        assert_eq!(document.camera_count(), 0);
        assert!(matches!(
            document.diagnostics(),
            [SceneError::Camera {
                source: CameraError::UnsupportedFormat(_),
                ..
            }]
        ));
    }

    #[test]
    fn test_view_count_ignores_declared_count() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_file(
            root,
            "views.txt",
            "images\ncomment\n7\na.jpg 1 1 a.bin 0 1\nb.jpg 2 2 a.bin 0 1\n",
        );
        write_camera(root, "a.bin", DVec3::Z);

        let (document, loaded) = Document::from_directory(root);
        assert!(loaded);
        assert_eq!(document.image_names().len(), 2);
        assert_eq!(document.image_sizes().len(), 2);
        assert_eq!(document.camera_count(), 2);
    }

    #[test]
    fn test_malformed_visibility_keeps_earlier_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_file(root, "clouds/visibility.txt", "0 0 0 1 0 0\n1 1 1 2 0 1\n2 2 2 0\n");

        let (document, loaded) = Document::from_directory(root);
        assert!(!loaded);
        assert_eq!(document.points().len(), 1);
        assert_eq!(document.tracks().len(), 1);
        assert_eq!(document.visibility().entry_count(), 1);
        assert!(matches!(
            document.diagnostics(),
            [SceneError::Parse { line: 2, .. }, SceneError::MissingFile(_)]
        ));
    }

    #[test]
    fn test_reload_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "clouds/visibility.txt", VISIBILITY);
        let empty = tempfile::tempdir().unwrap();

        let mut document = Document::default();
        document.load(dir.path());
        assert_eq!(document.points().len(), 3);

        assert!(!document.load(empty.path()));
        assert!(document.points().is_empty());
        assert_eq!(document.root(), empty.path());
        assert_eq!(document.diagnostics().len(), 2);
    }

    #[test]
    fn test_non_utf8_views_text() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_file(
            root,
            "views.txt",
            &b"C:\\Photos\\Ch\xe2teau\ncomment\n3\n\
               a.jpg 640 480 a.bin 0.1 50\n\
               caf\xe9.jpg 640 480 a.bin 0.1 50\n\
               b.jpg 800 600 a.bin 0.1 50\n"[..],
        );
        write_camera(root, "a.bin", DVec3::Z);

        let (document, loaded) = Document::from_directory(root);
        assert!(loaded);
        assert_eq!(document.image_names(), &["a.jpg".to_string(), "b.jpg".to_string()]);
        assert_eq!(document.image_size(ViewIndex(1)), Some((800, 600)));
        assert_eq!(document.camera_count(), 2);
        assert!(matches!(
            document.diagnostics(),
            [SceneError::MissingFile(_), SceneError::Parse { line: 5, .. }]
        ));
    }

    #[test]
    fn test_crlf_scene() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_file(root, "clouds/visibility.txt", "0 0 0 1 0 3\r\n1 2 3 0\r\n\r\n");
        write_file(
            root,
            "views.txt",
            "images\r\ncomment\r\n1\r\na.jpg 640 480 a.bin 0.1 50\r\n",
        );
        write_camera(root, "a.bin", DVec3::Z);

        let (document, loaded) = Document::from_directory(root);
        assert!(loaded);
        assert_eq!(document.points().len(), 2);
        assert_eq!(document.visible_tracks(ImageId(0)), &[TrackId(0)]);
        assert_eq!(document.image_name(ViewIndex(0)), Some("a.jpg"));
        assert_eq!(document.clip_planes(ViewIndex(0)).unwrap().far, 50.0);
        assert!(document.diagnostics().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_visibility_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_file(root, "clouds/visibility.txt", VISIBILITY);
        let path = layout::visibility_path(root);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();
        if File::open(&path).is_ok() {
            // Permission bits are not enforced for this user (e.g. root).
            return;
        }

        let (document, loaded) = Document::from_directory(root);
        assert!(!loaded);
        assert!(document.points().is_empty());
        assert!(matches!(
            document.diagnostics(),
            [SceneError::Open { .. }, SceneError::MissingFile(_)]
        ));
    }
}
