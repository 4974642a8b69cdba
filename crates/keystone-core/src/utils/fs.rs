use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Find files recursively in a directory that match a predicate
pub fn find_files<P, F>(path: P, predicate: &F) -> io::Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
    F: Fn(&Path) -> bool + ?Sized,
{
    let mut result = Vec::new();

    if !path.as_ref().exists() {
        return Ok(result);
    }

    if path.as_ref().is_file() {
        if predicate(path.as_ref()) {
            result.push(path.as_ref().to_path_buf());
        }
        return Ok(result);
    }

    for entry in fs::read_dir(path)? {
        let entry_path = entry?.path();

        if entry_path.is_file() {
            if predicate(&entry_path) {
                result.push(entry_path);
            }
        } else if entry_path.is_dir() {
            result.append(&mut find_files(&entry_path, predicate)?);
        }
    }

    Ok(result)
}

/// Find files with a specific extension, recursively, sorted by full path
pub fn find_files_with_extension<P: AsRef<Path>>(path: P, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = find_files(path, &|p: &Path| has_extension(p, extension))?;
    sort_paths(&mut files);
    Ok(files)
}

/// Files with a specific extension directly inside `path` (no recursion),
/// sorted. A missing directory yields an empty list.
pub fn list_files_with_extension<P: AsRef<Path>>(path: P, extension: &str) -> io::Result<Vec<PathBuf>> {
    let path = path.as_ref();
    if !path.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry_path = entry?.path();
        if entry_path.is_file() && has_extension(&entry_path, extension) {
            files.push(entry_path);
        }
    }
    sort_paths(&mut files);
    Ok(files)
}

/// File name without its extension, when it is valid UTF-8
pub fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|stem| stem.to_str())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

// Byte-wise ordering of the whole path string, so `a.rs` sorts before `a/b.rs`.
fn sort_paths(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
}
