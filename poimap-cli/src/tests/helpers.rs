//! Test helpers for composing temporary datasets and output directories.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Temporary directory addressed through UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn join(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Three gompas around Gangtok, named "Gangtok Gompas".
pub(super) const GANGTOK_DATASET: &str = r#"{
    "name": "Gangtok Gompas",
    "points": [
        {"id": 1, "name": "Enchey", "coordinates": [27.3381, 88.6132], "town": "Gangtok"},
        {"id": 2, "name": "Rumtek", "coordinates": [27.3258, 88.6012], "town": "Rumtek"},
        {"id": 3, "name": "Phodong", "coordinates": [27.428, 88.613], "town": "Phodong"}
    ]
}"#;

/// Write [`GANGTOK_DATASET`] into `workspace` and return its path.
pub(super) fn write_gangtok_dataset(workspace: &Workspace) -> Utf8PathBuf {
    let path = workspace.join("gangtok.json");
    write_utf8(&path, GANGTOK_DATASET.as_bytes());
    path
}
