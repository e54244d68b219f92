use super::{draw_chrome, draw_panel, draw_popup, Chrome};
use crate::project::{Task, TaskImporter, TaskStatus};
use crate::widgets::{
    hint_line, ConfirmDialog, Effect, HelpOverlay, HelpTopic, Overlay, OverlayEvent, Selection, TaskEdit,
    TaskEditor, Theme, Visibility,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::{Line, Span};
use ratatui::Frame;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskListEvent {
    Continue,
    Back,
}

/// Paste-or-type area for bulk task import with a live parse preview. A parse
/// error only changes the preview; typing continues.
pub struct ImportPane {
    visibility: Visibility,
    text: String,
    preview: Result<Vec<Task>, String>,
}

impl Default for ImportPane {
    fn default() -> Self {
        Self {
            visibility: Visibility::default(),
            text: String::new(),
            preview: Err("nothing to import yet".to_string()),
        }
    }
}

impl ImportPane {
    pub fn show(&mut self) {
        self.text.clear();
        self.preview = Err("nothing to import yet".to_string());
        self.visibility.show();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn preview(&self) -> &Result<Vec<Task>, String> {
        &self.preview
    }

    fn refresh(&mut self, importer: &dyn TaskImporter) {
        self.preview = importer.import_text(&self.text);
    }

    fn load_file(&mut self, importer: &dyn TaskImporter) {
        let path = self.text.trim().to_string();
        self.preview = importer.import_file(Path::new(&path));
    }

    fn apply(&mut self) -> Option<OverlayEvent<Vec<Task>>> {
        match &self.preview {
            Ok(tasks) => {
                let tasks = tasks.clone();
                Some(self.visibility.confirm(tasks))
            }
            Err(_) => None,
        }
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        importer: &dyn TaskImporter,
    ) -> Option<OverlayEvent<Vec<Task>>> {
        if !self.visibility.accepts(&key) {
            return None;
        }
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Some(self.visibility.dismiss()),
            KeyCode::Char('s') if control => self.apply(),
            KeyCode::Char('o') if control => {
                self.load_file(importer);
                None
            }
            KeyCode::Enter => {
                self.text.push('\n');
                self.refresh(importer);
                None
            }
            KeyCode::Backspace => {
                self.text.pop();
                self.refresh(importer);
                None
            }
            KeyCode::Char(ch) if !control => {
                self.text.push(ch);
                self.refresh(importer);
                None
            }
            _ => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    pub fn hide(&mut self) {
        self.visibility.hide();
    }

    pub fn render(&self, theme: &Theme) -> Vec<Line<'static>> {
        if !self.is_visible() {
            return Vec::new();
        }
        let mut lines = vec![
            Line::from(Span::styled("Import tasks", theme.title)),
            Line::from(Span::styled(
                "Type or paste a list. Ctrl+S import | Ctrl+O read text as a file path | Esc cancel",
                theme.muted,
            )),
            Line::raw(""),
        ];
        lines.extend(self.text.split('\n').map(|line| Line::raw(format!("  {line}"))));
        lines.push(Line::raw(""));
        match &self.preview {
            Ok(tasks) => {
                lines.push(Line::from(Span::styled(
                    format!("Preview: {} task(s)", tasks.len()),
                    theme.accent,
                )));
                lines.extend(
                    tasks
                        .iter()
                        .map(|task| Line::raw(format!("  - {}", task.name))),
                );
            }
            Err(err) => lines.push(Line::from(Span::styled(
                format!("Preview: {err}"),
                theme.error,
            ))),
        }
        lines
    }
}

pub struct TaskListScreen {
    tasks: Vec<Task>,
    selection: Selection,
    editor: TaskEditor,
    confirm: ConfirmDialog<String>,
    import: ImportPane,
    help: HelpOverlay,
    importer: Box<dyn TaskImporter>,
    next_id: usize,
    status: String,
}

impl TaskListScreen {
    pub fn new(importer: Box<dyn TaskImporter>, text_max_len: usize) -> Self {
        Self {
            tasks: Vec::new(),
            selection: Selection::default(),
            editor: TaskEditor::new(text_max_len),
            confirm: ConfirmDialog::new(),
            import: ImportPane::default(),
            help: HelpOverlay::default(),
            importer,
            next_id: 1,
            status: String::new(),
        }
    }

    pub fn enter(&mut self) {
        self.status = "Add the tasks the loop should work through.".to_string();
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn selected_index(&self) -> usize {
        self.selection.index()
    }

    pub fn take_effect(&mut self) -> Option<Effect> {
        self.editor.take_effect()
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.editor.set_cursor_visible(visible);
    }

    pub fn overlay_visible(&self) -> bool {
        self.editor.is_visible()
            || self.confirm.is_visible()
            || self.import.is_visible()
            || self.help.is_visible()
    }

    fn allocate_id(&mut self) -> String {
        let id = format!("task-{}", self.next_id);
        self.next_id += 1;
        id
    }

    fn apply_edit(&mut self, edit: TaskEdit) {
        match edit.original {
            Some(original) => {
                if let Some(task) = self.tasks.iter_mut().find(|task| task.id == original.id) {
                    task.name = edit.name;
                    task.description = edit.description;
                    self.status = format!("updated `{}`", task.name);
                }
            }
            None => {
                let id = self.allocate_id();
                self.status = format!("added `{}`", edit.name);
                self.tasks.push(Task {
                    id,
                    name: edit.name,
                    description: edit.description,
                    status: TaskStatus::Pending,
                });
                self.selection.select(self.tasks.len() - 1, self.tasks.len());
            }
        }
    }

    fn delete_task(&mut self, id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() < before {
            self.status = "task deleted".to_string();
        }
        self.selection.clamp(self.tasks.len());
    }

    fn import_tasks(&mut self, imported: Vec<Task>) {
        let count = imported.len();
        for task in imported {
            let id = self.allocate_id();
            self.tasks.push(Task { id, ..task });
        }
        self.status = format!("imported {count} task(s)");
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<TaskListEvent> {
        if self.help.is_visible() {
            self.help.handle_key(key);
            return None;
        }
        if self.editor.is_visible() {
            if let Some(OverlayEvent::Confirmed(edit)) = self.editor.handle_key(key) {
                self.apply_edit(edit);
            }
            return None;
        }
        if self.confirm.is_visible() {
            if let Some(OverlayEvent::Confirmed(id)) = self.confirm.handle_key(key) {
                self.delete_task(&id);
            }
            return None;
        }
        if self.import.is_visible() {
            if let Some(OverlayEvent::Confirmed(imported)) =
                self.import.handle_key(key, self.importer.as_ref())
            {
                self.import_tasks(imported);
            }
            return None;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selection.move_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.selection.move_next(self.tasks.len()),
            KeyCode::Char('a') => self.editor.show(None),
            KeyCode::Char('e') => {
                if let Some(task) = self.tasks.get(self.selection.index()).cloned() {
                    self.editor.show(Some(task));
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.tasks.get(self.selection.index()) {
                    let message = format!("Delete `{}`?", task.name);
                    self.confirm.show("Delete task", &message, task.id.clone());
                }
            }
            KeyCode::Char('i') => self.import.show(),
            KeyCode::Char('?') => self.help.show(HelpTopic::Tasks),
            KeyCode::Enter => {
                if self.tasks.is_empty() {
                    self.status = "add at least one task before continuing".to_string();
                } else {
                    return Some(TaskListEvent::Continue);
                }
            }
            KeyCode::Esc => return Some(TaskListEvent::Back),
            _ => {}
        }
        None
    }

    fn task_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        if self.tasks.is_empty() {
            return vec![Line::from(Span::styled(
                "no tasks yet - press `a` to add or `i` to import",
                theme.muted,
            ))];
        }
        self.tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| {
                let selected = idx == self.selection.index();
                let marker = if selected { "> " } else { "  " };
                let style = if selected { theme.selected } else { theme.text };
                let mut spans = vec![
                    Span::styled(format!("{marker}{}", task.name), style),
                    Span::styled(format!("  [{}]", task.status.as_str()), theme.muted),
                ];
                if !task.description.is_empty() {
                    spans.push(Span::styled(format!("  {}", task.description), theme.muted));
                }
                Line::from(spans)
            })
            .collect()
    }

    pub fn draw(&self, frame: &mut Frame<'_>, theme: &Theme) {
        let hint = hint_line(HelpTopic::Tasks);
        let area = draw_chrome(
            frame,
            &Chrome {
                title: "loopwright",
                step: "Step 2/5 - Tasks",
                hint: &hint,
                status: &self.status,
            },
            theme,
        );
        draw_panel(frame, area, self.task_lines(theme));
        draw_popup(frame, self.editor.render(theme), 70, 50);
        draw_popup(frame, self.confirm.render(theme), 50, 30);
        draw_popup(frame, self.import.render(theme), 80, 80);
        draw_popup(frame, self.help.render(theme), 60, 60);
    }
}
