//! Directory walking and name grouping

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::constants::scan::MIN_GROUP_SIZE;
use crate::{AnalysisError, Result};

/// Image files sharing one logical name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameGroup {
    /// File stem, upper-cased when grouping case-insensitively
    pub name: String,
    /// Member files in walk order
    pub paths: Vec<PathBuf>,
}

impl NameGroup {
    /// Whether the group has enough members to compare
    pub fn is_comparable(&self) -> bool {
        self.paths.len() >= MIN_GROUP_SIZE
    }
}

/// Collect image files under `root`, sorted by path
///
/// Unreadable entries below the root are logged and skipped.
///
/// # Errors
///
/// Returns `AnalysisError::DirectoryError` if `root` is missing or not a directory
pub fn collect_images(root: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root).map_err(|e| AnalysisError::DirectoryError {
        path: root.to_path_buf(),
        source: e,
    })?;
    if !metadata.is_dir() {
        return Err(AnalysisError::DirectoryError {
            path: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    let max_depth = if config.recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(root).max_depth(max_depth).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && config.accepts(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Logical name of an image: its file stem, optionally folded to upper case
pub fn logical_name(path: &Path, case_sensitive: bool) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if case_sensitive {
        stem
    } else {
        stem.to_uppercase()
    }
}

/// Group files by logical name, groups sorted by name
///
/// Member order follows the order of `files`.
pub fn group_by_name(files: &[PathBuf], case_sensitive: bool) -> Vec<NameGroup> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for path in files {
        groups
            .entry(logical_name(path, case_sensitive))
            .or_default()
            .push(path.clone());
    }

    groups
        .into_iter()
        .map(|(name, paths)| NameGroup { name, paths })
        .collect()
}

/// Two innermost directory names of `path` relative to `root`, joined by `/`
///
/// One name for files one level deep, empty for files directly in `root`.
///
/// # Example
///
/// ```
/// use pod_colors::scan::category_path;
/// use std::path::Path;
///
/// let root = Path::new("/data/PNG");
/// assert_eq!(category_path(root, Path::new("/data/PNG/HOODIE/GILDAN/RED.png")), "HOODIE/GILDAN");
/// assert_eq!(category_path(root, Path::new("/data/PNG/HOODIE/RED.png")), "HOODIE");
/// assert_eq!(category_path(root, Path::new("/data/PNG/RED.png")), "");
/// ```
pub fn category_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let dirs: Vec<String> = relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();

    let start = dirs.len().saturating_sub(2);
    dirs[start..].join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_collect_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "SHIRT/GILDAN/RED.png");
        touch(dir.path(), "HOODIE/RED.JPG");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "BLUE.bmp");

        let files = collect_images(dir.path(), &ScanConfig::default()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["BLUE.bmp", "HOODIE/RED.JPG", "SHIRT/GILDAN/RED.png"]);
    }

    #[test]
    fn test_collect_non_recursive() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "TOP.png");
        touch(dir.path(), "SHIRT/NESTED.png");

        let config = ScanConfig {
            recursive: false,
            ..ScanConfig::default()
        };
        let files = collect_images(dir.path(), &config).unwrap();
        assert_eq!(files, vec![dir.path().join("TOP.png")]);
    }

    #[test]
    fn test_collect_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_images(&dir.path().join("missing"), &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::DirectoryError { .. }));
        assert!(!err.is_recoverable());

        touch(dir.path(), "RED.png");
        let err = collect_images(&dir.path().join("RED.png"), &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::DirectoryError { .. }));
    }

    #[test]
    fn test_grouping_by_stem() {
        let files = vec![
            PathBuf::from("a/RED.png"),
            PathBuf::from("b/RED.jpg"),
            PathBuf::from("b/RED2.png"),
            PathBuf::from("c/red.png"),
        ];

        let groups = group_by_name(&files, true);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["RED", "RED2", "red"]);
        assert_eq!(groups[0].paths, vec![PathBuf::from("a/RED.png"), PathBuf::from("b/RED.jpg")]);
        assert!(groups[0].is_comparable());
        assert!(!groups[1].is_comparable());

        let folded = group_by_name(&files, false);
        assert_eq!(folded.len(), 2);
        assert_eq!(folded[0].name, "RED");
        assert_eq!(folded[0].paths.len(), 3);
    }

    #[test]
    fn test_category_path() {
        let root = Path::new("root");
        assert_eq!(category_path(root, Path::new("root/A/B/C/X.png")), "B/C");
        assert_eq!(category_path(root, Path::new("root/A/B/X.png")), "A/B");
        assert_eq!(category_path(root, Path::new("root/A/X.png")), "A");
        assert_eq!(category_path(root, Path::new("root/X.png")), "");
    }
}
