use super::button::Button;
use super::field::{Effect, FieldValue};
use super::form::{Form, FormEvent};
use super::overlay::{Overlay, OverlayEvent, Visibility};
use super::text_field::TextField;
use super::theme::Theme;
use crate::project::Task;
use crossterm::event::KeyEvent;
use ratatui::text::{Line, Span};

const NAME_MAX_LEN: usize = 120;

/// Result of the inline editor. `original` is `None` when a task is being added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    pub name: String,
    pub description: String,
    pub original: Option<Task>,
}

#[derive(Debug)]
pub struct TaskEditor {
    visibility: Visibility,
    form: Form,
    original: Option<Task>,
    error: Option<String>,
}

impl TaskEditor {
    pub fn new(description_max_len: usize) -> Self {
        let form = Form::new("task_editor")
            .with_field(TextField::new("name", "Name").with_max_len(NAME_MAX_LEN))
            .with_field(
                TextField::new("description", "Description")
                    .with_placeholder("optional")
                    .with_max_len(description_max_len),
            )
            .with_field(Button::submit("save", "Save"))
            .with_field(Button::cancel("cancel", "Cancel"));
        Self {
            visibility: Visibility::default(),
            form,
            original: None,
            error: None,
        }
    }

    /// Opens the editor prefilled from `task`, or empty when adding.
    pub fn show(&mut self, task: Option<Task>) {
        let (name, description) = task
            .as_ref()
            .map(|task| (task.name.clone(), task.description.clone()))
            .unwrap_or_default();
        self.form.set_value("name", FieldValue::Text(name));
        self.form
            .set_value("description", FieldValue::Text(description));
        self.form.reset();
        self.original = task;
        self.error = None;
        self.visibility.show();
    }

    pub fn is_adding(&self) -> bool {
        self.original.is_none()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn take_effect(&mut self) -> Option<Effect> {
        self.form.take_effect()
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.form.set_cursor_visible(visible);
    }

    fn submit(&mut self) -> Option<OverlayEvent<TaskEdit>> {
        let name = self.form.text("name").unwrap_or_default();
        if name.trim().is_empty() {
            self.error = Some("task name is required".to_string());
            self.form.reset();
            return None;
        }
        self.error = None;
        let edit = TaskEdit {
            name: name.trim().to_string(),
            description: self
                .form
                .text("description")
                .unwrap_or_default()
                .trim()
                .to_string(),
            original: self.original.take(),
        };
        Some(self.visibility.confirm(edit))
    }
}

impl Overlay for TaskEditor {
    type Output = TaskEdit;

    fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    fn hide(&mut self) {
        self.form.blur();
        self.visibility.hide();
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<OverlayEvent<TaskEdit>> {
        if !self.visibility.accepts(&key) {
            return None;
        }
        match self.form.handle_key(key)? {
            FormEvent::Submitted { .. } => self.submit(),
            FormEvent::Canceled { .. } => {
                self.form.blur();
                self.original = None;
                Some(self.visibility.dismiss())
            }
            FormEvent::Changed { .. } => None,
        }
    }

    fn render(&self, theme: &Theme) -> Vec<Line<'static>> {
        if !self.is_visible() {
            return Vec::new();
        }
        let title = if self.is_adding() {
            "Add task"
        } else {
            "Edit task"
        };
        let mut lines = vec![Line::from(Span::styled(title, theme.title)), Line::raw("")];
        lines.extend(self.form.render(theme));
        if let Some(error) = &self.error {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(error.clone(), theme.error)));
        }
        lines
    }
}
