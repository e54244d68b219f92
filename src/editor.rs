//! Hands buffered log text to an external editor through a temporary file.
//!
//! This is the one blocking operation in the UI. It runs as a dispatched command
//! with the terminal suspended, never inside a screen's key handling. The
//! temporary file is removed when the `NamedTempFile` guard drops, which covers
//! success, a failing editor and a failed launch alike.

use crate::shared::errors::EditorError;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl EditorCommand {
    /// Splits a command line such as `code --wait` on whitespace.
    pub fn parse(raw: &str) -> Result<Self, EditorError> {
        let mut parts = raw.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(EditorError::EmptyCommand)?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOutcome {
    pub temp_path: PathBuf,
}

pub fn open_in_editor(command: &EditorCommand, content: &str) -> Result<EditorOutcome, EditorError> {
    open_in_editor_in(&std::env::temp_dir(), command, content)
}

pub fn open_in_editor_in(
    dir: &Path,
    command: &EditorCommand,
    content: &str,
) -> Result<EditorOutcome, EditorError> {
    let mut file = tempfile::Builder::new()
        .prefix("loopwright-log-")
        .suffix(".log")
        .tempfile_in(dir)
        .map_err(|source| EditorError::TempFile { source })?;
    let temp_path = file.path().to_path_buf();
    file.write_all(content.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|source| EditorError::Write {
            path: temp_path.display().to_string(),
            source,
        })?;

    let status = Command::new(&command.program)
        .args(&command.args)
        .arg(&temp_path)
        .status()
        .map_err(|source| EditorError::Launch {
            program: command.program.clone(),
            source,
        })?;
    if !status.success() {
        return Err(EditorError::ExitStatus {
            program: command.program.clone(),
            code: status.code().unwrap_or(-1),
        });
    }
    drop(file);
    Ok(EditorOutcome { temp_path })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;

    fn entries(dir: &Path) -> usize {
        fs::read_dir(dir).expect("read dir").count()
    }

    #[test]
    fn parse_splits_program_and_args() {
        assert_eq!(
            EditorCommand::parse("code --wait").expect("parse"),
            EditorCommand {
                program: "code".to_string(),
                args: vec!["--wait".to_string()],
            }
        );
        assert!(matches!(
            EditorCommand::parse("   "),
            Err(EditorError::EmptyCommand)
        ));
    }

    #[test]
    fn temp_file_exists_during_edit_and_is_removed_after() {
        let temp = tempfile::tempdir().expect("tempdir");
        let command = EditorCommand::parse("test -s").expect("parse");
        let outcome = open_in_editor_in(temp.path(), &command, "log line\n").expect("edit");
        assert!(!outcome.temp_path.exists());
        assert_eq!(entries(temp.path()), 0);
    }

    #[test]
    fn failing_editor_still_removes_temp_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let command = EditorCommand::parse("false").expect("parse");
        let err = open_in_editor_in(temp.path(), &command, "x").expect_err("editor fails");
        assert!(matches!(err, EditorError::ExitStatus { code: 1, .. }));
        assert_eq!(entries(temp.path()), 0);
    }

    #[test]
    fn launch_failure_still_removes_temp_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let command = EditorCommand::parse("loopwright-no-such-editor").expect("parse");
        let err = open_in_editor_in(temp.path(), &command, "x").expect_err("launch fails");
        assert!(matches!(err, EditorError::Launch { .. }));
        assert_eq!(entries(temp.path()), 0);
    }
}
