//! Build slides from a directory of images.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::deck::Slide;
use crate::error::Error;

/// Extensions accepted as slide images (lowercase, without dot).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Return `true` if `path` has an allowed image extension, ignoring case.
#[must_use]
pub fn is_slide_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.iter().any(|e| *e == ext)
        })
}

/// List the images directly inside `dir`, ordered by file name.
///
/// Each slide is named after the file stem and carries the file path as its
/// fullscreen image.
///
/// # Errors
/// Returns [`Error::BadDir`] if `dir` is missing or not a directory.
pub fn scan_slides(dir: &Path) -> Result<Vec<Slide>, Error> {
    if !dir.is_dir() {
        return Err(Error::BadDir(dir.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| match err.into_io_error() {
            Some(io) => Error::Io(io),
            None => Error::BadDir(dir.to_path_buf()),
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && is_slide_image(path) {
            paths.push(path.to_path_buf());
        }
    }

    Ok(paths
        .into_iter()
        .map(|path| {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            Slide::new(name).with_image(path.to_string_lossy())
        })
        .collect())
}
