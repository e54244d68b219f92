use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const MAX_RECENT_PROJECTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentProject {
    pub path: PathBuf,
    pub name: String,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
}

/// Ordered most recent first and capped at `MAX_RECENT_PROJECTS`.
pub trait RecentProjectStore {
    fn list(&self) -> Vec<RecentProject>;

    fn record(&mut self, project: RecentProject);
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRecents {
    entries: Vec<RecentProject>,
}

impl InMemoryRecents {
    pub fn new(seed: Vec<RecentProject>) -> Self {
        let mut store = Self::default();
        for project in seed.into_iter().rev() {
            store.record(project);
        }
        store
    }
}

impl RecentProjectStore for InMemoryRecents {
    fn list(&self) -> Vec<RecentProject> {
        self.entries.clone()
    }

    fn record(&mut self, project: RecentProject) {
        self.entries.retain(|entry| entry.path != project.path);
        self.entries.insert(0, project);
        self.entries.truncate(MAX_RECENT_PROJECTS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(path: &str) -> RecentProject {
        RecentProject {
            path: PathBuf::from(path),
            name: path.trim_start_matches('/').to_string(),
            project_type: None,
            last_used: None,
        }
    }

    #[test]
    fn record_moves_existing_entry_to_front_and_caps_length() {
        let mut store = InMemoryRecents::new(vec![project("/a"), project("/b")]);
        assert_eq!(store.list()[0].path, PathBuf::from("/a"));

        store.record(project("/b"));
        let paths: Vec<_> = store.list().into_iter().map(|p| p.path).collect();
        assert_eq!(paths, vec![PathBuf::from("/b"), PathBuf::from("/a")]);

        for idx in 0..20 {
            store.record(project(&format!("/p{idx}")));
        }
        assert_eq!(store.list().len(), MAX_RECENT_PROJECTS);
        assert_eq!(store.list()[0].path, PathBuf::from("/p19"));
    }
}
