use super::keys::is_quit_key;
use super::message::{AppMsg, Command, LoopPlan};
use super::screens::{
    AnalysisEvent, AnalysisScreen, DirectoryEvent, DirectoryScreen, ModelEvent, ModelScreen,
    MonitorEvent, MonitorScreen, TaskListEvent, TaskListScreen,
};
use crate::config::Settings;
use crate::project::{
    ProjectAnalysis, ProjectDetector, ProjectInfo, RecentProject, RecentProjectStore,
    TaskImporter,
};
use crate::shared::logging::EventLog;
use crate::widgets::{Effect, SelectedDirectory, Theme};
use crossterm::event::{KeyEvent, KeyEventKind};
use ratatui::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Directory,
    Tasks,
    Analysis,
    Model,
    Monitor,
}

impl WizardStep {
    pub fn as_str(self) -> &'static str {
        match self {
            WizardStep::Directory => "directory",
            WizardStep::Tasks => "tasks",
            WizardStep::Analysis => "analysis",
            WizardStep::Model => "model",
            WizardStep::Monitor => "monitor",
        }
    }
}

/// Wizard options taken from `Settings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardOptions {
    pub models: Vec<String>,
    pub loop_command: Option<String>,
    pub text_max_len: usize,
}

impl WizardOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            models: settings.models.clone(),
            loop_command: settings.loop_command.clone(),
            text_max_len: settings.text_max_len,
        }
    }
}

/// Step machine over the five screens. `update` is the only place state
/// changes; anything blocking or long-running comes back out as a `Command`.
pub struct Wizard {
    step: WizardStep,
    theme: Theme,
    options: WizardOptions,
    directory: DirectoryScreen,
    tasks: TaskListScreen,
    analysis: AnalysisScreen,
    model: ModelScreen,
    monitor: MonitorScreen,
    recents: Box<dyn RecentProjectStore>,
    project: Option<ProjectInfo>,
    analyzed: bool,
    chosen_analysis: Option<ProjectAnalysis>,
    chosen_model: Option<String>,
    cursor_visible: bool,
    finished: bool,
    log: EventLog,
}

impl Wizard {
    pub fn new(
        options: WizardOptions,
        detector: Box<dyn ProjectDetector>,
        recents: Box<dyn RecentProjectStore>,
        importer: Box<dyn TaskImporter>,
        log: EventLog,
    ) -> Self {
        let mut wizard = Self {
            step: WizardStep::Directory,
            theme: Theme::default(),
            directory: DirectoryScreen::new(detector),
            tasks: TaskListScreen::new(importer, options.text_max_len),
            analysis: AnalysisScreen::new(options.text_max_len),
            model: ModelScreen::default(),
            monitor: MonitorScreen::default(),
            options,
            recents,
            project: None,
            analyzed: false,
            chosen_analysis: None,
            chosen_model: None,
            cursor_visible: true,
            finished: false,
            log,
        };
        wizard.directory.enter(wizard.recents.list());
        wizard
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn project(&self) -> Option<&ProjectInfo> {
        self.project.as_ref()
    }

    pub fn recents(&self) -> Vec<RecentProject> {
        self.recents.list()
    }

    pub fn directory(&self) -> &DirectoryScreen {
        &self.directory
    }

    pub fn tasks(&self) -> &TaskListScreen {
        &self.tasks
    }

    pub fn analysis(&self) -> &AnalysisScreen {
        &self.analysis
    }

    pub fn model(&self) -> &ModelScreen {
        &self.model
    }

    pub fn monitor(&self) -> &MonitorScreen {
        &self.monitor
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Processes one message and returns the follow-up commands for the host.
    pub fn update(&mut self, msg: AppMsg) -> Vec<Command> {
        if self.finished {
            return Vec::new();
        }
        match msg {
            AppMsg::Key(key) => self.on_key(key),
            AppMsg::Tick => {
                self.cursor_visible = !self.cursor_visible;
                self.apply_cursor();
                self.analysis.tick();
                Vec::new()
            }
            AppMsg::AnalysisReady { project, result } => {
                let current = self.project.as_ref().map(|info| info.path.as_path());
                if current != Some(project.as_path()) {
                    self.log
                        .info("analysis.stale", &project.display().to_string());
                    return Vec::new();
                }
                self.analyzed = true;
                match result {
                    Ok(analysis) => self.analysis.load(analysis),
                    Err(err) => {
                        self.log.warn("analysis.failed", &err);
                        self.analysis.load_failed(err);
                    }
                }
                Vec::new()
            }
            AppMsg::LogChunk(chunk) => {
                self.monitor.append_chunk(&chunk);
                Vec::new()
            }
            AppMsg::LoopExited(code) => {
                self.log
                    .info("loop.exited", &format!("exit code {code:?}"));
                self.monitor.loop_exited(code);
                Vec::new()
            }
            AppMsg::EditorClosed(result) => {
                if let Err(err) = &result {
                    self.log.warn("editor.failed", err);
                }
                self.monitor.editor_closed(result);
                Vec::new()
            }
        }
    }

    /// Reports a loop command that could not be started.
    pub fn loop_failed(&mut self, err: &str) {
        self.log.error("loop.spawn_failed", err);
        self.monitor.loop_failed(err);
    }

    fn on_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        if is_quit_key(&key) {
            return self.quit();
        }
        let commands = match self.step {
            WizardStep::Directory => match self.directory.handle_key(key) {
                Some(DirectoryEvent::Selected(selected)) => self.on_directory_selected(selected),
                Some(DirectoryEvent::Canceled) => self.quit(),
                None => Vec::new(),
            },
            WizardStep::Tasks => match self.tasks.handle_key(key) {
                Some(TaskListEvent::Continue) => self.enter_analysis(),
                Some(TaskListEvent::Back) => {
                    self.enter_directory();
                    Vec::new()
                }
                None => Vec::new(),
            },
            WizardStep::Analysis => match self.analysis.handle_key(key) {
                Some(AnalysisEvent::Continue(analysis)) => {
                    self.chosen_analysis = Some(analysis);
                    self.enter_model();
                    Vec::new()
                }
                Some(AnalysisEvent::Reanalyze) => self.request_analysis(),
                Some(AnalysisEvent::Back) => {
                    self.go_to(WizardStep::Tasks);
                    self.tasks.enter();
                    Vec::new()
                }
                None => Vec::new(),
            },
            WizardStep::Model => match self.model.handle_key(key) {
                Some(ModelEvent::Selected(model)) => self.on_model_selected(model),
                Some(ModelEvent::Back) => {
                    self.go_to(WizardStep::Analysis);
                    self.analysis.enter();
                    Vec::new()
                }
                None => Vec::new(),
            },
            WizardStep::Monitor => match self.monitor.handle_key(key) {
                Some(MonitorEvent::OpenInEditor(content)) => vec![Command::OpenInEditor(content)],
                Some(MonitorEvent::Quit) => self.quit(),
                None => Vec::new(),
            },
        };
        if self.take_effect() == Some(Effect::BlinkCursor) {
            self.cursor_visible = true;
            self.apply_cursor();
        }
        commands
    }

    fn take_effect(&mut self) -> Option<Effect> {
        match self.step {
            WizardStep::Directory => self.directory.take_effect(),
            WizardStep::Tasks => self.tasks.take_effect(),
            WizardStep::Analysis => self.analysis.take_effect(),
            WizardStep::Model | WizardStep::Monitor => None,
        }
    }

    fn apply_cursor(&mut self) {
        let visible = self.cursor_visible;
        match self.step {
            WizardStep::Directory => self.directory.set_cursor_visible(visible),
            WizardStep::Tasks => self.tasks.set_cursor_visible(visible),
            WizardStep::Analysis => self.analysis.set_cursor_visible(visible),
            WizardStep::Model | WizardStep::Monitor => {}
        }
    }

    fn go_to(&mut self, step: WizardStep) {
        self.log.info(
            "wizard.step",
            &format!("{} -> {}", self.step.as_str(), step.as_str()),
        );
        self.step = step;
    }

    fn quit(&mut self) -> Vec<Command> {
        self.finished = true;
        self.log
            .info("wizard.quit", &format!("quit at step {}", self.step.as_str()));
        vec![Command::Quit]
    }

    fn enter_directory(&mut self) {
        self.go_to(WizardStep::Directory);
        self.directory.enter(self.recents.list());
    }

    fn on_directory_selected(&mut self, selected: SelectedDirectory) -> Vec<Command> {
        let SelectedDirectory { path, project } = selected;
        let project = project.unwrap_or_else(|| ProjectInfo::bare(&path));
        self.recents.record(RecentProject {
            path: project.path.clone(),
            name: project.name.clone(),
            project_type: project.project_type.clone(),
            last_used: Some(chrono::Utc::now()),
        });
        let changed = self
            .project
            .as_ref()
            .map(|current| current.path != project.path)
            .unwrap_or(true);
        if changed {
            self.analyzed = false;
            self.chosen_analysis = None;
            self.analysis.cancel_pending();
        }
        self.log
            .info("wizard.project", &project.path.display().to_string());
        self.project = Some(project);
        self.go_to(WizardStep::Tasks);
        self.tasks.enter();
        Vec::new()
    }

    fn enter_analysis(&mut self) -> Vec<Command> {
        self.go_to(WizardStep::Analysis);
        self.analysis.enter();
        if self.analyzed || self.analysis.is_pending() {
            return Vec::new();
        }
        self.request_analysis()
    }

    fn request_analysis(&mut self) -> Vec<Command> {
        let Some(project) = self.project.clone() else {
            return Vec::new();
        };
        self.analysis.set_pending();
        vec![Command::Analyze(project)]
    }

    fn enter_model(&mut self) {
        self.go_to(WizardStep::Model);
        let summary = self
            .project
            .as_ref()
            .map(|project| {
                vec![
                    format!("Project: {}", project.path.display()),
                    format!("Tasks: {}", self.tasks.tasks().len()),
                ]
            })
            .unwrap_or_default();
        let current = self
            .chosen_model
            .clone()
            .or_else(|| self.options.models.first().cloned());
        self.model
            .enter(self.options.models.clone(), current.as_deref(), summary);
    }

    fn on_model_selected(&mut self, model: String) -> Vec<Command> {
        self.chosen_model = Some(model.clone());
        let (Some(project), Some(analysis)) =
            (self.project.clone(), self.chosen_analysis.clone())
        else {
            return Vec::new();
        };
        self.go_to(WizardStep::Monitor);
        let plan = LoopPlan {
            command: self.options.loop_command.clone().unwrap_or_default(),
            project,
            tasks: self.tasks.tasks().to_vec(),
            analysis,
            model,
        };
        match &self.options.loop_command {
            Some(command) => {
                self.monitor.start(command);
                self.log.info("loop.start", command);
                vec![Command::StartLoop(plan)]
            }
            None => {
                self.monitor.show_plan(&plan.summary());
                Vec::new()
            }
        }
    }

    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        let theme = self.theme;
        match self.step {
            WizardStep::Directory => self.directory.draw(frame, &theme),
            WizardStep::Tasks => self.tasks.draw(frame, &theme),
            WizardStep::Analysis => self.analysis.draw(frame, &theme),
            WizardStep::Model => self.model.draw(frame, &theme),
            WizardStep::Monitor => self.monitor.draw(frame, &theme),
        }
    }
}
