use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
}

/// Parse failures are plain strings shown in the import preview.
pub trait TaskImporter {
    fn import_text(&self, raw: &str) -> Result<Vec<Task>, String>;

    fn import_file(&self, path: &Path) -> Result<Vec<Task>, String> {
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("failed to read task list {}: {e}", path.display()))?;
        self.import_text(&raw)
    }
}

/// One task per non-indented line; indented lines extend the previous task's
/// description. Bullet, checkbox and numbered prefixes are stripped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainListImporter;

impl TaskImporter for PlainListImporter {
    fn import_text(&self, raw: &str) -> Result<Vec<Task>, String> {
        let mut tasks: Vec<Task> = Vec::new();
        for (line_no, line) in raw.lines().enumerate() {
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            if line.starts_with(' ') || line.starts_with('\t') {
                let Some(task) = tasks.last_mut() else {
                    return Err(format!(
                        "line {}: indented description without a task",
                        line_no + 1
                    ));
                };
                if !task.description.is_empty() {
                    task.description.push(' ');
                }
                task.description.push_str(line.trim());
                continue;
            }
            let (name, status) = strip_list_prefix(line.trim());
            if name.is_empty() {
                return Err(format!("line {}: task name is empty", line_no + 1));
            }
            tasks.push(Task {
                id: format!("task-{}", tasks.len() + 1),
                name: name.to_string(),
                description: String::new(),
                status,
            });
        }
        if tasks.is_empty() {
            return Err("no tasks found".to_string());
        }
        Ok(tasks)
    }
}

fn strip_list_prefix(line: &str) -> (&str, TaskStatus) {
    let rest = match line.strip_prefix('-').or_else(|| line.strip_prefix('*')) {
        Some(rest) => rest.trim_start(),
        None => strip_number_prefix(line),
    };
    if let Some(rest) = rest.strip_prefix("[ ] ") {
        return (rest.trim(), TaskStatus::Pending);
    }
    if let Some(rest) = rest
        .strip_prefix("[x] ")
        .or_else(|| rest.strip_prefix("[X] "))
    {
        return (rest.trim(), TaskStatus::Done);
    }
    (rest.trim(), TaskStatus::Pending)
}

fn strip_number_prefix(line: &str) -> &str {
    let digits = line.chars().take_while(|ch| ch.is_ascii_digit()).count();
    if digits == 0 {
        return line;
    }
    let rest = &line[digits..];
    rest.strip_prefix(". ")
        .or_else(|| rest.strip_prefix(") "))
        .unwrap_or(line)
}
