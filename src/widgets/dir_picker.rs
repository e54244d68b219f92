use super::field::{Effect, Field};
use super::overlay::{Overlay, OverlayEvent, Visibility};
use super::selection::Selection;
use super::text_field::TextField;
use super::theme::Theme;
use crate::project::{ProjectDetector, ProjectInfo, RecentProject};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};
use std::path::{Path, PathBuf};

pub const MANUAL_ENTRY_LABEL: &str = "Enter a path manually...";
const PATH_MAX_LEN: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirPickerMode {
    List,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedDirectory {
    pub path: PathBuf,
    pub project: Option<ProjectInfo>,
}

/// Expands `~`, makes the path absolute and checks it is an existing directory.
/// The first failing step decides the error.
pub fn resolve_directory(raw: &str) -> Result<PathBuf, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("path must be non-empty".to_string());
    }
    let expanded = expand_tilde(trimmed)?;
    let absolute = std::path::absolute(&expanded)
        .map_err(|e| format!("failed to resolve {}: {e}", expanded.display()))?;
    if !absolute.exists() {
        return Err(format!("path does not exist: {}", absolute.display()));
    }
    if !absolute.is_dir() {
        return Err(format!("not a directory: {}", absolute.display()));
    }
    Ok(absolute)
}

fn expand_tilde(raw: &str) -> Result<PathBuf, String> {
    let rest = if raw == "~" {
        ""
    } else if let Some(rest) = raw.strip_prefix("~/") {
        rest
    } else {
        return Ok(PathBuf::from(raw));
    };
    let home = std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .ok_or_else(|| "failed to resolve home directory".to_string())?;
    let home = PathBuf::from(home);
    if rest.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(rest))
    }
}

/// Recent-project list with a trailing manual-entry item. Choosing that item
/// switches to free-text path entry; Esc returns to the list with its selection kept.
pub struct DirPicker {
    visibility: Visibility,
    mode: DirPickerMode,
    recents: Vec<RecentProject>,
    selection: Selection,
    input: TextField,
    error: Option<String>,
    pending_effect: Option<Effect>,
    detector: Box<dyn ProjectDetector>,
}

impl DirPicker {
    pub fn new(detector: Box<dyn ProjectDetector>) -> Self {
        Self {
            visibility: Visibility::default(),
            mode: DirPickerMode::List,
            recents: Vec::new(),
            selection: Selection::default(),
            input: TextField::new("path", "Path")
                .with_placeholder("~/projects/app")
                .with_max_len(PATH_MAX_LEN),
            error: None,
            pending_effect: None,
            detector,
        }
    }

    pub fn show(&mut self, recents: Vec<RecentProject>) {
        self.recents = recents;
        self.mode = DirPickerMode::List;
        self.error = None;
        self.selection.clamp(self.item_count());
        self.input.blur();
        self.visibility.show();
    }

    pub fn mode(&self) -> DirPickerMode {
        self.mode
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn take_effect(&mut self) -> Option<Effect> {
        self.pending_effect.take()
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.input.set_cursor_visible(visible);
    }

    pub fn selected_index(&self) -> usize {
        self.selection.index()
    }

    pub fn input_text(&self) -> &str {
        self.input.text()
    }

    fn item_count(&self) -> usize {
        self.recents.len() + 1
    }

    fn on_manual_item(&self) -> bool {
        self.selection.index() == self.recents.len()
    }

    fn enter_manual_mode(&mut self) {
        self.mode = DirPickerMode::Manual;
        self.error = None;
        self.pending_effect = self.input.focus();
    }

    fn leave_manual_mode(&mut self) {
        self.mode = DirPickerMode::List;
        self.input.blur();
    }

    fn select_path(&mut self, raw: &str) -> Option<OverlayEvent<SelectedDirectory>> {
        match resolve_directory(raw) {
            Ok(path) => {
                self.error = None;
                let project = Some(self.detector.detect(&path));
                self.leave_manual_mode();
                Some(self.visibility.confirm(SelectedDirectory { path, project }))
            }
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<OverlayEvent<SelectedDirectory>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selection.move_prev();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selection.move_next(self.item_count());
                None
            }
            KeyCode::Enter => {
                if self.on_manual_item() {
                    self.enter_manual_mode();
                    return None;
                }
                let path = self.recents[self.selection.index()].path.clone();
                self.select_path(&path.display().to_string())
            }
            KeyCode::Esc => Some(self.visibility.dismiss()),
            _ => None,
        }
    }

    fn handle_manual_key(&mut self, key: KeyEvent) -> Option<OverlayEvent<SelectedDirectory>> {
        match key.code {
            KeyCode::Esc => {
                self.leave_manual_mode();
                None
            }
            KeyCode::Enter => {
                let raw = self.input.text().to_string();
                self.select_path(&raw)
            }
            _ => {
                self.input.handle_key(key);
                None
            }
        }
    }

    fn render_recent(&self, idx: usize, project: &RecentProject, theme: &Theme) -> Line<'static> {
        let marker = if idx == self.selection.index() { "> " } else { "  " };
        let style = if idx == self.selection.index() {
            theme.selected
        } else {
            theme.text
        };
        let mut spans = vec![Span::styled(format!("{marker}{}", project.name), style)];
        if let Some(kind) = &project.project_type {
            spans.push(Span::styled(format!(" [{kind}]"), theme.accent));
        }
        spans.push(Span::styled(
            format!("  {}", display_path(&project.path)),
            theme.muted,
        ));
        Line::from(spans)
    }
}

fn display_path(path: &Path) -> String {
    let Some(home) = std::env::var_os("HOME").filter(|home| !home.is_empty()) else {
        return path.display().to_string();
    };
    match path.strip_prefix(PathBuf::from(home)) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => path.display().to_string(),
    }
}

impl Overlay for DirPicker {
    type Output = SelectedDirectory;

    fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    fn hide(&mut self) {
        self.leave_manual_mode();
        self.visibility.hide();
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<OverlayEvent<SelectedDirectory>> {
        if !self.visibility.accepts(&key) {
            return None;
        }
        match self.mode {
            DirPickerMode::List => self.handle_list_key(key),
            DirPickerMode::Manual => self.handle_manual_key(key),
        }
    }

    fn render(&self, theme: &Theme) -> Vec<Line<'static>> {
        if !self.is_visible() {
            return Vec::new();
        }
        let mut lines = vec![
            Line::from(Span::styled("Select a project directory", theme.title)),
            Line::raw(""),
        ];
        match self.mode {
            DirPickerMode::List => {
                if self.recents.is_empty() {
                    lines.push(Line::from(Span::styled("no recent projects", theme.muted)));
                }
                for (idx, project) in self.recents.iter().enumerate() {
                    lines.push(self.render_recent(idx, project, theme));
                }
                let style = if self.on_manual_item() {
                    theme.selected
                } else {
                    theme.text
                };
                let marker = if self.on_manual_item() { "> " } else { "  " };
                lines.push(Line::from(Span::styled(
                    format!("{marker}{MANUAL_ENTRY_LABEL}"),
                    style,
                )));
            }
            DirPickerMode::Manual => {
                lines.push(self.input.render(theme));
                lines.push(Line::from(Span::styled(
                    "Enter select | Esc back to list",
                    theme.muted,
                )));
            }
        }
        if let Some(error) = &self.error {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(error.clone(), theme.error)));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::MarkerDetector;
    use crossterm::event::KeyModifiers;
    use std::fs;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(picker: &mut DirPicker, text: &str) {
        for ch in text.chars() {
            picker.handle_key(key(KeyCode::Char(ch)));
        }
    }

    fn recent(path: &Path) -> RecentProject {
        RecentProject {
            path: path.to_path_buf(),
            name: "demo".to_string(),
            project_type: Some("rust".to_string()),
            last_used: None,
        }
    }

    #[test]
    fn resolve_directory_checks_in_order() {
        let temp = tempfile::tempdir().expect("tempdir");
        let file = temp.path().join("notes.txt");
        fs::write(&file, "x").expect("write file");

        assert_eq!(resolve_directory("  "), Err("path must be non-empty".to_string()));
        let missing = temp.path().join("missing");
        assert_eq!(
            resolve_directory(&missing.display().to_string()),
            Err(format!("path does not exist: {}", missing.display()))
        );
        assert_eq!(
            resolve_directory(&file.display().to_string()),
            Err(format!("not a directory: {}", file.display()))
        );
        assert_eq!(
            resolve_directory(&temp.path().display().to_string()),
            Ok(temp.path().to_path_buf())
        );
    }

    #[test]
    fn relative_paths_become_absolute() {
        let resolved = resolve_directory(".").expect("resolve cwd");
        assert!(resolved.is_absolute());
        assert!(resolved.is_dir());
    }

    #[test]
    fn manual_entry_round_trip_keeps_list_state() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut picker = DirPicker::new(Box::new(MarkerDetector));
        picker.show(vec![recent(temp.path())]);

        picker.handle_key(key(KeyCode::Down));
        assert_eq!(picker.selected_index(), 1);
        picker.handle_key(key(KeyCode::Enter));
        assert_eq!(picker.mode(), DirPickerMode::Manual);

        type_str(&mut picker, "/definitely/not/here");
        assert_eq!(picker.handle_key(key(KeyCode::Enter)), None);
        assert!(picker.is_visible());
        assert!(picker
            .error()
            .expect("error shown")
            .starts_with("path does not exist"));

        picker.handle_key(key(KeyCode::Esc));
        assert_eq!(picker.mode(), DirPickerMode::List);
        assert_eq!(picker.selected_index(), 1);
        assert!(picker.is_visible());
    }

    #[test]
    fn selecting_recent_project_emits_detected_metadata() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("Cargo.toml"), "[package]\n").expect("write manifest");
        let mut picker = DirPicker::new(Box::new(MarkerDetector));
        picker.show(vec![recent(temp.path())]);

        let Some(OverlayEvent::Confirmed(selected)) = picker.handle_key(key(KeyCode::Enter))
        else {
            panic!("expected confirmed selection");
        };
        assert_eq!(selected.path, temp.path().to_path_buf());
        let project = selected.project.expect("project metadata");
        assert_eq!(project.project_type.as_deref(), Some("rust"));
        assert!(!picker.is_visible());
    }

    #[test]
    fn escape_in_list_mode_cancels() {
        let mut picker = DirPicker::new(Box::new(MarkerDetector));
        picker.show(Vec::new());
        assert_eq!(picker.handle_key(key(KeyCode::Esc)), Some(OverlayEvent::Closed));
        assert!(picker.render(&Theme::plain()).is_empty());
    }
}
