use super::{draw_chrome, draw_panel, draw_popup, Chrome};
use crate::project::{ProjectAnalysis, Readiness};
use crate::widgets::{
    hint_line, Button, Checkbox, Effect, FieldValue, Form, FormEvent, HelpOverlay, HelpTopic, Overlay,
    TextField, Theme,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::{Line, Span};
use ratatui::Frame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisEvent {
    Continue(ProjectAnalysis),
    Back,
    Reanalyze,
}

/// Review of the build/test analysis. The user can correct commands and
/// readiness before the loop starts.
#[derive(Debug)]
pub struct AnalysisScreen {
    form: Form,
    help: HelpOverlay,
    analysis: ProjectAnalysis,
    pending: bool,
    spinner: usize,
    error: Option<String>,
    status: String,
}

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

impl AnalysisScreen {
    pub fn new(text_max_len: usize) -> Self {
        let form = Form::new("analysis")
            .with_field(Checkbox::new("build_ready", "Build ready", false))
            .with_field(
                TextField::new("build_cmd", "Build command")
                    .with_placeholder("e.g. cargo build")
                    .with_max_len(text_max_len),
            )
            .with_field(Checkbox::new("test_ready", "Tests ready", false))
            .with_field(
                TextField::new("test_cmd", "Test command")
                    .with_placeholder("e.g. cargo test")
                    .with_max_len(text_max_len),
            )
            .with_field(
                TextField::new("context", "Project context")
                    .with_placeholder("notes for the agent")
                    .with_max_len(text_max_len),
            )
            .with_field(Button::submit("continue", "Continue"))
            .with_field(Button::cancel("back", "Back"));
        Self {
            form,
            help: HelpOverlay::default(),
            analysis: ProjectAnalysis::default(),
            pending: false,
            spinner: 0,
            error: None,
            status: String::new(),
        }
    }

    pub fn enter(&mut self) {
        self.help.hide();
        self.error = None;
        self.form.reset();
    }

    pub fn set_pending(&mut self) {
        self.pending = true;
        self.error = None;
        self.status = "analyzing project...".to_string();
    }

    /// Forgets an outstanding request whose result will be ignored.
    pub fn cancel_pending(&mut self) {
        if self.pending {
            self.pending = false;
            self.status.clear();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn tick(&mut self) {
        if self.pending {
            self.spinner = (self.spinner + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn take_effect(&mut self) -> Option<Effect> {
        self.form.take_effect()
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.form.set_cursor_visible(visible);
    }

    /// Fills the form from a finished analysis.
    pub fn load(&mut self, analysis: ProjectAnalysis) {
        self.pending = false;
        self.form
            .set_value("build_ready", FieldValue::Bool(analysis.build.ready));
        self.form.set_value(
            "build_cmd",
            FieldValue::Text(analysis.build.command.clone().unwrap_or_default()),
        );
        self.form
            .set_value("test_ready", FieldValue::Bool(analysis.test.ready));
        self.form.set_value(
            "test_cmd",
            FieldValue::Text(analysis.test.command.clone().unwrap_or_default()),
        );
        self.form.set_value(
            "context",
            FieldValue::Text(analysis.project_context.clone()),
        );
        self.status = match &analysis.project_type {
            Some(kind) => format!("detected a {kind} project"),
            None => "no project type detected; fill in the commands manually".to_string(),
        };
        self.analysis = analysis;
        self.form.reset();
    }

    pub fn load_failed(&mut self, err: String) {
        self.pending = false;
        self.error = Some(format!("analysis failed: {err}"));
        self.status = "press Ctrl+R to retry or fill in the commands manually".to_string();
        self.form.reset();
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AnalysisEvent> {
        if self.help.is_visible() {
            self.help.handle_key(key);
            return None;
        }
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('r') if control => return self.reanalyze(),
            KeyCode::Char('r') if !self.form.focused_captures_text() => return self.reanalyze(),
            KeyCode::Char('?') if !self.form.focused_captures_text() => {
                self.help.show(HelpTopic::Analysis);
                return None;
            }
            _ => {}
        }
        if self.pending {
            return (key.code == KeyCode::Esc).then_some(AnalysisEvent::Back);
        }
        match self.form.handle_key(key)? {
            FormEvent::Submitted { .. } => self.submit(),
            FormEvent::Canceled { .. } => {
                self.form.reset();
                Some(AnalysisEvent::Back)
            }
            FormEvent::Changed { .. } => {
                self.error = None;
                None
            }
        }
    }

    fn reanalyze(&mut self) -> Option<AnalysisEvent> {
        if self.pending {
            return None;
        }
        Some(AnalysisEvent::Reanalyze)
    }

    fn readiness(&self, ready_id: &str, cmd_id: &str, base: &Readiness) -> Readiness {
        let command = self
            .form
            .text(cmd_id)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        Readiness {
            ready: self.form.checked(ready_id).unwrap_or(false),
            command,
            reason: base.reason.clone(),
        }
    }

    fn submit(&mut self) -> Option<AnalysisEvent> {
        let build = self.readiness("build_ready", "build_cmd", &self.analysis.build);
        let test = self.readiness("test_ready", "test_cmd", &self.analysis.test);
        let missing = [("build", &build), ("test", &test)]
            .into_iter()
            .find(|(_, readiness)| readiness.ready && readiness.command.is_none());
        if let Some((label, _)) = missing {
            self.error = Some(format!("{label} is marked ready but has no command"));
            self.form.reset();
            return None;
        }
        self.error = None;
        let analysis = ProjectAnalysis {
            project_type: self.analysis.project_type.clone(),
            languages: self.analysis.languages.clone(),
            build,
            test,
            project_context: self
                .form
                .text("context")
                .unwrap_or_default()
                .trim()
                .to_string(),
        };
        self.form.reset();
        Some(AnalysisEvent::Continue(analysis))
    }

    fn panel_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        if self.pending {
            return vec![Line::from(Span::styled(
                format!("Analyzing project {}", SPINNER_FRAMES[self.spinner]),
                theme.muted,
            ))];
        }
        let mut lines = Vec::new();
        if !self.analysis.languages.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("Languages: {}", self.analysis.languages.join(", ")),
                theme.accent,
            )));
        }
        for (label, readiness) in [("Build", &self.analysis.build), ("Test", &self.analysis.test)] {
            if !readiness.reason.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("{label}: {}", readiness.reason),
                    theme.muted,
                )));
            }
        }
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        lines.extend(self.form.render(theme));
        if let Some(error) = &self.error {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(error.clone(), theme.error)));
        }
        lines
    }

    pub fn draw(&self, frame: &mut Frame<'_>, theme: &Theme) {
        let hint = hint_line(HelpTopic::Analysis);
        let area = draw_chrome(
            frame,
            &Chrome {
                title: "loopwright",
                step: "Step 3/5 - Build & test analysis",
                hint: &hint,
                status: &self.status,
            },
            theme,
        );
        draw_panel(frame, area, self.panel_lines(theme));
        draw_popup(frame, self.help.render(theme), 60, 60);
    }
}
