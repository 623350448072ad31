use crate::resolve::is_supported_image;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// An image file discovered during scanning.
///
/// The path pointed to a regular file with a supported extension
/// (`.jpg`, `.jpeg`, `.png`, case-insensitive) at discovery time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Path to the input image
    pub path: PathBuf,
}

impl ImageFile {
    /// Returns the file name for display purposes.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Expands a mixed list of files and directories into a flat image-file list.
///
/// File roots with a supported extension are included directly; directory
/// roots are walked recursively. Missing paths and unsupported files are
/// silently excluded from the batch. Traversal is depth-first with entries
/// sorted lexicographically per directory level, so the returned order is
/// deterministic for a given tree.
#[must_use]
pub fn scan(roots: &[PathBuf]) -> Vec<ImageFile> {
    let mut files = Vec::new();

    for root in roots {
        match std::fs::metadata(root) {
            Ok(meta) if meta.is_file() => {
                if is_supported_image(root) {
                    files.push(ImageFile { path: root.clone() });
                } else {
                    debug!("Skipping unsupported file: {}", root.display());
                }
            }
            Ok(meta) if meta.is_dir() => scan_directory(root, &mut files),
            Ok(_) => debug!("Skipping non-regular path: {}", root.display()),
            Err(e) => warn!("Cannot access {}: {}", root.display(), e),
        }
    }

    // Overlapping roots (a file passed alongside its own parent directory)
    // must not enqueue the same path twice: two tasks writing one output
    // path would race, and the file would be double-counted in the stats.
    let mut seen = HashSet::new();
    files.retain(|file| seen.insert(file.path.clone()));

    debug!("Scan found {} image files", files.len());
    files
}

/// Recursively collects supported images under `dir`.
///
/// Unreadable subtrees are logged and skipped; a single bad directory never
/// aborts the scan.
fn scan_directory(dir: &Path, files: &mut Vec<ImageFile>) {
    let walker = WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                if is_supported_image(entry.path()) {
                    files.push(ImageFile {
                        path: entry.path().to_path_buf(),
                    });
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Scan error under {}: {}", dir.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_scan_directory_recursive() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.jpg").touch().unwrap();
        temp.child("b.PNG").touch().unwrap();
        temp.child("notes.txt").touch().unwrap();
        temp.child("nested/deep/c.jpeg").touch().unwrap();

        let files = scan(&[temp.path().to_path_buf()]);
        let names: Vec<String> = files.iter().map(ImageFile::file_name).collect();

        assert_eq!(files.len(), 3);
        assert!(names.contains(&"a.jpg".to_string()));
        assert!(names.contains(&"b.PNG".to_string()));
        assert!(names.contains(&"c.jpeg".to_string()));
    }

    #[test]
    fn test_scan_includes_supported_file_roots() {
        let temp = assert_fs::TempDir::new().unwrap();
        let image = temp.child("photo.jpg");
        image.touch().unwrap();

        let files = scan(&[image.path().to_path_buf()]);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, image.path());
    }

    #[test]
    fn test_scan_excludes_unsupported_and_missing_roots() {
        let temp = assert_fs::TempDir::new().unwrap();
        let text = temp.child("notes.txt");
        text.touch().unwrap();

        let files = scan(&[
            text.path().to_path_buf(),
            temp.path().join("does-not-exist.jpg"),
        ]);
        assert!(files.is_empty());
    }

    #[test]
    fn test_overlapping_roots_yield_each_file_once() {
        let temp = assert_fs::TempDir::new().unwrap();
        let image = temp.child("a.jpg");
        image.touch().unwrap();
        temp.child("b.png").touch().unwrap();

        // The same file arrives both as an explicit root and via its
        // parent directory.
        let files = scan(&[
            image.path().to_path_buf(),
            temp.path().to_path_buf(),
        ]);

        assert_eq!(files.len(), 2);
        let duplicates = files.iter().filter(|f| f.path == image.path()).count();
        assert_eq!(duplicates, 1);
        // The explicit file root keeps its first-seen position.
        assert_eq!(files[0].path, image.path());
    }

    #[test]
    fn test_scan_order_is_deterministic() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("z.jpg").touch().unwrap();
        temp.child("a.jpg").touch().unwrap();
        temp.child("m.png").touch().unwrap();

        let first = scan(&[temp.path().to_path_buf()]);
        let second = scan(&[temp.path().to_path_buf()]);
        assert_eq!(first, second);

        let names: Vec<String> = first.iter().map(ImageFile::file_name).collect();
        assert_eq!(names, vec!["a.jpg", "m.png", "z.jpg"]);
    }
}
