//! Test helpers for writing request files into a scratch workspace.

use camino::{Utf8Path, Utf8PathBuf};
use carpool_core::Coordinate;
use serde::Serialize;
use std::fs;
use tempfile::TempDir;

/// Belo Horizonte city centre, used as a ride start.
pub(super) const SAVASSI: Coordinate = Coordinate::new(-19.9385, -43.9340);
/// Pampulha, used as a ride end.
pub(super) const PAMPULHA: Coordinate = Coordinate::new(-19.8510, -43.9706);

/// A temporary directory addressed through UTF-8 paths.
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

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

pub(super) fn write_json<T: Serialize>(path: &Utf8Path, value: &T) {
    let payload = serde_json::to_vec_pretty(value).expect("serialise test payload");
    write_utf8(path, &payload);
}
