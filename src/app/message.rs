use crate::project::{ProjectAnalysis, ProjectInfo, Task};
use crossterm::event::KeyEvent;
use std::path::PathBuf;

/// Everything the wizard needs to start the development loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopPlan {
    pub command: String,
    pub project: ProjectInfo,
    pub tasks: Vec<Task>,
    pub analysis: ProjectAnalysis,
    pub model: String,
}

impl LoopPlan {
    /// Environment handed to the loop command.
    pub fn env(&self) -> Vec<(String, String)> {
        let mut env = vec![
            (
                "LOOPWRIGHT_PROJECT".to_string(),
                self.project.path.display().to_string(),
            ),
            ("LOOPWRIGHT_MODEL".to_string(), self.model.clone()),
            (
                "LOOPWRIGHT_TASK_COUNT".to_string(),
                self.tasks.len().to_string(),
            ),
        ];
        if let Some(command) = &self.analysis.build.command {
            env.push(("LOOPWRIGHT_BUILD_CMD".to_string(), command.clone()));
        }
        if let Some(command) = &self.analysis.test.command {
            env.push(("LOOPWRIGHT_TEST_CMD".to_string(), command.clone()));
        }
        env
    }

    /// Human-readable lines describing the plan.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Project: {}", self.project.path.display()),
            format!("Model: {}", self.model),
            format!("Tasks: {}", self.tasks.len()),
        ];
        lines.extend(
            self.tasks
                .iter()
                .map(|task| format!("  - [{}] {}", task.status.as_str(), task.name)),
        );
        for (label, readiness) in [("Build", &self.analysis.build), ("Test", &self.analysis.test)] {
            let command = readiness.command.as_deref().unwrap_or("(none)");
            let state = if readiness.ready { "ready" } else { "not ready" };
            lines.push(format!("{label}: {command} ({state})"));
        }
        if !self.analysis.project_context.is_empty() {
            lines.push(format!("Context: {}", self.analysis.project_context));
        }
        lines
    }
}

/// Messages processed one at a time, in arrival order, by the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMsg {
    Key(KeyEvent),
    Tick,
    AnalysisReady {
        project: PathBuf,
        result: Result<ProjectAnalysis, String>,
    },
    LogChunk(String),
    LoopExited(Option<i32>),
    EditorClosed(Result<(), String>),
}

/// Follow-up work the host executes outside of `Wizard::update`. Results come
/// back as `AppMsg`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Analyze(ProjectInfo),
    StartLoop(LoopPlan),
    OpenInEditor(String),
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Readiness, TaskStatus};
    use std::path::Path;

    fn sample_plan() -> LoopPlan {
        LoopPlan {
            command: "./loop.sh".to_string(),
            project: ProjectInfo::bare(Path::new("/work/demo")),
            tasks: vec![Task {
                id: "task-1".to_string(),
                name: "Add login".to_string(),
                description: String::new(),
                status: TaskStatus::Pending,
            }],
            analysis: ProjectAnalysis {
                build: Readiness {
                    ready: true,
                    command: Some("cargo build".to_string()),
                    reason: String::new(),
                },
                ..ProjectAnalysis::default()
            },
            model: "sonnet".to_string(),
        }
    }

    #[test]
    fn env_skips_missing_commands() {
        let env = sample_plan().env();
        assert!(env.contains(&("LOOPWRIGHT_PROJECT".to_string(), "/work/demo".to_string())));
        assert!(env.contains(&("LOOPWRIGHT_TASK_COUNT".to_string(), "1".to_string())));
        assert!(env.contains(&("LOOPWRIGHT_BUILD_CMD".to_string(), "cargo build".to_string())));
        assert!(!env.iter().any(|(key, _)| key == "LOOPWRIGHT_TEST_CMD"));
    }

    #[test]
    fn summary_lists_tasks_and_readiness() {
        assert_eq!(
            sample_plan().summary(),
            vec![
                "Project: /work/demo",
                "Model: sonnet",
                "Tasks: 1",
                "  - [pending] Add login",
                "Build: cargo build (ready)",
                "Test: (none) (not ready)",
            ]
        );
    }
}
