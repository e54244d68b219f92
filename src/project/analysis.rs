use super::detect::ProjectInfo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Readiness {
    pub ready: bool,
    pub command: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    pub project_type: Option<String>,
    pub languages: Vec<String>,
    pub build: Readiness,
    pub test: Readiness,
    pub project_context: String,
}

pub trait ProjectAnalyzer {
    fn analyze(&self, project: &ProjectInfo) -> Result<ProjectAnalysis, String>;
}

/// Derives build/test commands from the detected project type alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerAnalyzer;

fn commands_for(project_type: &str) -> Option<(&'static str, &'static str, &'static str)> {
    match project_type {
        "rust" => Some(("Rust", "cargo build", "cargo test")),
        "go" => Some(("Go", "go build ./...", "go test ./...")),
        "node" => Some(("JavaScript", "npm run build", "npm test")),
        "python" => Some(("Python", "python -m compileall .", "pytest")),
        "java" => Some(("Java", "mvn -q compile", "mvn -q test")),
        "make" => Some(("Make", "make", "make test")),
        _ => None,
    }
}

impl ProjectAnalyzer for MarkerAnalyzer {
    fn analyze(&self, project: &ProjectInfo) -> Result<ProjectAnalysis, String> {
        let Some(project_type) = project.project_type.as_deref() else {
            let reason = "no project marker found".to_string();
            return Ok(ProjectAnalysis {
                project_type: None,
                languages: Vec::new(),
                build: Readiness {
                    ready: false,
                    command: None,
                    reason: reason.clone(),
                },
                test: Readiness {
                    ready: false,
                    command: None,
                    reason,
                },
                project_context: String::new(),
            });
        };
        let Some((language, build, test)) = commands_for(project_type) else {
            return Err(format!("unsupported project type `{project_type}`"));
        };
        let found = format!("detected from {}", project.markers.join(", "));
        Ok(ProjectAnalysis {
            project_type: Some(project_type.to_string()),
            languages: vec![language.to_string()],
            build: Readiness {
                ready: true,
                command: Some(build.to_string()),
                reason: found.clone(),
            },
            test: Readiness {
                ready: true,
                command: Some(test.to_string()),
                reason: found,
            },
            project_context: format!("{} project `{}`", language, project.name),
        })
    }
}
