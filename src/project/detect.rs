use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Marker file name and the project type it implies, checked in order.
pub const PROJECT_MARKERS: [(&str, &str); 8] = [
    ("Cargo.toml", "rust"),
    ("go.mod", "go"),
    ("package.json", "node"),
    ("pyproject.toml", "python"),
    ("requirements.txt", "python"),
    ("pom.xml", "java"),
    ("build.gradle", "java"),
    ("Makefile", "make"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub path: PathBuf,
    pub name: String,
    pub is_git_repo: bool,
    pub project_type: Option<String>,
    pub markers: Vec<String>,
}

impl ProjectInfo {
    /// Metadata for a directory nothing has been detected in.
    pub fn bare(dir: &Path) -> Self {
        Self {
            path: dir.to_path_buf(),
            name: dir_name(dir),
            is_git_repo: false,
            project_type: None,
            markers: Vec::new(),
        }
    }
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

pub trait ProjectDetector {
    fn detect(&self, dir: &Path) -> ProjectInfo;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerDetector;

impl ProjectDetector for MarkerDetector {
    fn detect(&self, dir: &Path) -> ProjectInfo {
        let markers: Vec<String> = PROJECT_MARKERS
            .iter()
            .filter(|(marker, _)| dir.join(marker).is_file())
            .map(|(marker, _)| (*marker).to_string())
            .collect();
        let project_type = PROJECT_MARKERS
            .iter()
            .find(|(marker, _)| markers.iter().any(|found| found == marker))
            .map(|(_, kind)| (*kind).to_string());
        ProjectInfo {
            path: dir.to_path_buf(),
            name: dir_name(dir),
            is_git_repo: dir.join(".git").exists(),
            project_type,
            markers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn detects_markers_in_priority_order() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("Makefile"), "all:\n").expect("write makefile");
        fs::write(temp.path().join("go.mod"), "module demo\n").expect("write go.mod");
        fs::create_dir(temp.path().join(".git")).expect("mkdir .git");

        let info = MarkerDetector.detect(temp.path());
        assert_eq!(info.project_type.as_deref(), Some("go"));
        assert_eq!(info.markers, vec!["go.mod".to_string(), "Makefile".to_string()]);
        assert!(info.is_git_repo);
    }

    #[test]
    fn empty_directory_has_no_type() {
        let temp = tempfile::tempdir().expect("tempdir");
        let info = MarkerDetector.detect(temp.path());
        assert_eq!(info.project_type, None);
        assert!(info.markers.is_empty());
        assert!(!info.is_git_repo);
    }
}
