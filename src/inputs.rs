//! Locating and loading image buffers from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Regular files directly inside `dir`, sorted by path. Subdirectories are
/// not descended into.
pub fn collect_image_paths(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Expand every directory argument into its files; plain files pass through.
pub fn expand_inputs(inputs: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(inputs.len());
    for input in inputs {
        if input.is_dir() {
            paths.extend(collect_image_paths(input)?);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

#[inline]
pub fn read_buffer(path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path)
}
