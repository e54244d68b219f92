use super::keys::{parse_scripted_keys, SCRIPT_KEYS_ENV};
use super::loop_process::{spawn_loop_process, LoopHandle};
use super::message::{AppMsg, Command};
use super::screens::LoopState;
use super::wizard::{Wizard, WizardOptions, WizardStep};
use crate::config::Settings;
use crate::editor::{open_in_editor, EditorCommand};
use crate::project::{
    InMemoryRecents, MarkerAnalyzer, MarkerDetector, PlainListImporter, ProjectAnalyzer,
    ProjectDetector, RecentProjectStore, TaskImporter,
};
use crate::shared::errors::RuntimeError;
use crate::shared::logging::EventLog;
use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, IsTerminal, Stdout};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const UI_POLL_INTERVAL: Duration = Duration::from_millis(60);
const CURSOR_BLINK_INTERVAL: Duration = Duration::from_millis(500);
const SCRIPTED_WAIT: Duration = Duration::from_secs(30);

/// Launches the editor for `(editor_command, content)`.
pub type EditorLaunch<'a> = dyn FnMut(&str, &str) -> Result<(), String> + 'a;

/// External collaborators the wizard consumes.
pub struct Collaborators {
    pub detector: Box<dyn ProjectDetector>,
    pub recents: Box<dyn RecentProjectStore>,
    pub importer: Box<dyn TaskImporter>,
    pub analyzer: Arc<dyn ProjectAnalyzer + Send + Sync>,
}

impl Collaborators {
    /// Marker-based built-ins seeded from the configured recent projects.
    pub fn builtin(settings: &Settings) -> Self {
        Self {
            detector: Box::new(MarkerDetector),
            recents: Box::new(InMemoryRecents::new(settings.recent_projects.clone())),
            importer: Box::new(PlainListImporter),
            analyzer: Arc::new(MarkerAnalyzer),
        }
    }
}

/// Where the run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub step: WizardStep,
    pub project: Option<PathBuf>,
    pub loop_state: LoopState,
}

impl RunSummary {
    fn from_wizard(wizard: &Wizard) -> Self {
        Self {
            step: wizard.step(),
            project: wizard.project().map(|project| project.path.clone()),
            loop_state: wizard.monitor().state(),
        }
    }

    pub fn render(&self) -> String {
        let project = self
            .project
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "none".to_string());
        let loop_state = match self.loop_state {
            LoopState::Idle => "idle".to_string(),
            LoopState::Running => "running".to_string(),
            LoopState::Exited(Some(code)) => format!("exited:{code}"),
            LoopState::Exited(None) => "terminated".to_string(),
        };
        format!(
            "step={}\nproject={project}\nloop={loop_state}",
            self.step.as_str()
        )
    }
}

/// Executes wizard commands and feeds their results back as messages.
pub struct Host {
    sender: Sender<AppMsg>,
    receiver: Receiver<AppMsg>,
    analyzer: Arc<dyn ProjectAnalyzer + Send + Sync>,
    editor: String,
    loop_handle: Option<LoopHandle>,
    analyses_in_flight: usize,
    log: EventLog,
}

impl Host {
    pub fn new(
        analyzer: Arc<dyn ProjectAnalyzer + Send + Sync>,
        editor: String,
        log: EventLog,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            analyzer,
            editor,
            loop_handle: None,
            analyses_in_flight: 0,
            log,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.analyses_in_flight == 0 && self.loop_handle.is_none()
    }

    /// Feeds one message to the wizard and runs the resulting commands.
    /// Returns true once the wizard asked to quit.
    pub fn deliver(&mut self, wizard: &mut Wizard, msg: AppMsg, launch: &mut EditorLaunch<'_>) -> bool {
        match &msg {
            AppMsg::AnalysisReady { .. } => {
                self.analyses_in_flight = self.analyses_in_flight.saturating_sub(1);
            }
            AppMsg::LoopExited(_) => {
                if let Some(handle) = self.loop_handle.take() {
                    handle.shutdown();
                }
            }
            _ => {}
        }
        let commands = wizard.update(msg);
        self.dispatch(wizard, commands, launch)
    }

    pub fn dispatch(
        &mut self,
        wizard: &mut Wizard,
        commands: Vec<Command>,
        launch: &mut EditorLaunch<'_>,
    ) -> bool {
        let mut quit = false;
        for command in commands {
            quit |= self.execute(wizard, command, launch);
        }
        quit
    }

    fn execute(&mut self, wizard: &mut Wizard, command: Command, launch: &mut EditorLaunch<'_>) -> bool {
        match command {
            Command::Analyze(project) => {
                self.log
                    .info("analysis.start", &project.path.display().to_string());
                self.analyses_in_flight += 1;
                let analyzer = Arc::clone(&self.analyzer);
                let sender = self.sender.clone();
                thread::spawn(move || {
                    let result = analyzer.analyze(&project);
                    let _ = sender.send(AppMsg::AnalysisReady {
                        project: project.path,
                        result,
                    });
                });
                false
            }
            Command::StartLoop(plan) => {
                if let Some(previous) = self.loop_handle.take() {
                    previous.shutdown();
                }
                match spawn_loop_process(&plan, self.sender.clone()) {
                    Ok(handle) => self.loop_handle = Some(handle),
                    Err(err) => wizard.loop_failed(&err.to_string()),
                }
                false
            }
            Command::OpenInEditor(content) => {
                self.log.info("editor.open", &self.editor);
                let result = launch(&self.editor, &content);
                if result.is_ok() {
                    self.log.info("editor.closed", &self.editor);
                }
                self.deliver(wizard, AppMsg::EditorClosed(result), launch)
            }
            Command::Quit => true,
        }
    }

    /// Delivers every message already queued without blocking.
    pub fn drain(&mut self, wizard: &mut Wizard, launch: &mut EditorLaunch<'_>) -> bool {
        let mut quit = false;
        while let Ok(msg) = self.receiver.try_recv() {
            quit |= self.deliver(wizard, msg, launch);
        }
        quit
    }

    /// Blocks until no analysis or loop process is outstanding.
    pub fn wait_idle(
        &mut self,
        wizard: &mut Wizard,
        launch: &mut EditorLaunch<'_>,
        timeout: Duration,
    ) -> Result<bool, String> {
        let mut quit = self.drain(wizard, launch);
        while !self.is_idle() {
            match self.receiver.recv_timeout(timeout) {
                Ok(msg) => quit |= self.deliver(wizard, msg, launch),
                Err(RecvTimeoutError::Timeout) => {
                    return Err("timed out waiting for background work".to_string());
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err("background work channel disconnected unexpectedly".to_string());
                }
            }
        }
        Ok(quit)
    }

    /// Stops a running loop process.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.loop_handle.take() {
            self.log.warn("loop.killed", "loop stopped on exit");
            handle.shutdown();
        }
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub fn build_wizard(settings: &Settings, collaborators: Collaborators, log: EventLog) -> (Wizard, Host) {
    let Collaborators {
        detector,
        recents,
        importer,
        analyzer,
    } = collaborators;
    let wizard = Wizard::new(
        WizardOptions::from_settings(settings),
        detector,
        recents,
        importer,
        log.clone(),
    );
    let host = Host::new(analyzer, settings.editor_command(), log);
    (wizard, host)
}

/// Runs the editor directly; used where no terminal needs suspending.
pub fn launch_editor(editor: &str, content: &str) -> Result<(), String> {
    let command = EditorCommand::parse(editor).map_err(|err| err.to_string())?;
    open_in_editor(&command, content)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

/// Drives the wizard from a key script. Background work finishes before the
/// next key is fed, so scripts are deterministic.
pub fn run_scripted(
    wizard: &mut Wizard,
    host: &mut Host,
    keys: Vec<crossterm::event::KeyEvent>,
    launch: &mut EditorLaunch<'_>,
) -> Result<RunSummary, String> {
    for key in keys {
        let quit = host.deliver(wizard, AppMsg::Key(key), launch);
        if quit || host.wait_idle(wizard, launch, SCRIPTED_WAIT)? {
            host.shutdown();
            return Ok(RunSummary::from_wizard(wizard));
        }
    }
    host.shutdown();
    Err(format!(
        "scripted run did not terminate; end {SCRIPT_KEYS_ENV} with esc, q or ctrl-c"
    ))
}

fn load_scripted_keys() -> Result<Option<Vec<crossterm::event::KeyEvent>>, RuntimeError> {
    let Ok(raw) = std::env::var(SCRIPT_KEYS_ENV) else {
        return Ok(None);
    };
    parse_scripted_keys(&raw)
        .map(Some)
        .map_err(RuntimeError::Script)
}

/// Entry point used by the binary: scripted when `LOOPWRIGHT_SCRIPT_KEYS` is
/// set, otherwise the interactive terminal UI.
pub fn run(settings: &Settings, collaborators: Collaborators, log: EventLog) -> Result<RunSummary, RuntimeError> {
    let scripted = load_scripted_keys()?;
    let (mut wizard, mut host) = build_wizard(settings, collaborators, log.clone());
    log.info("wizard.start", if scripted.is_some() { "scripted" } else { "interactive" });
    let summary = match scripted {
        Some(keys) => run_scripted(&mut wizard, &mut host, keys, &mut launch_editor)
            .map_err(RuntimeError::Script)?,
        None => {
            if !(io::stdin().is_terminal() && io::stdout().is_terminal()) {
                return Err(RuntimeError::Terminal(io::Error::other(
                    "stdin and stdout must be a terminal",
                )));
            }
            run_tui(&mut wizard, &mut host)?
        }
    };
    log.info("wizard.finish", &summary.render().replace('\n', " "));
    Ok(summary)
}

fn run_tui(wizard: &mut Wizard, host: &mut Host) -> Result<RunSummary, RuntimeError> {
    let mut terminal = setup_terminal()?;
    let result = run_event_loop(&mut terminal, wizard, host);
    host.shutdown();
    teardown_terminal(&mut terminal)?;
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    wizard: &mut Wizard,
    host: &mut Host,
) -> Result<RunSummary, RuntimeError> {
    let mut last_blink = Instant::now();
    loop {
        if host.drain(wizard, &mut |editor, content| {
            run_editor_suspended(terminal, editor, content)
        }) {
            break;
        }
        if last_blink.elapsed() >= CURSOR_BLINK_INTERVAL {
            wizard.update(AppMsg::Tick);
            last_blink = Instant::now();
        }
        terminal
            .draw(|frame| wizard.draw(frame))
            .map_err(RuntimeError::Render)?;

        if !event::poll(UI_POLL_INTERVAL).map_err(RuntimeError::Input)? {
            continue;
        }
        let Event::Key(key) = event::read().map_err(RuntimeError::Input)? else {
            continue;
        };
        let quit = host.deliver(wizard, AppMsg::Key(key), &mut |editor, content| {
            run_editor_suspended(terminal, editor, content)
        });
        if quit {
            break;
        }
        last_blink = Instant::now();
    }
    Ok(RunSummary::from_wizard(wizard))
}

/// Hands the terminal to the editor and takes it back afterwards.
fn run_editor_suspended(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    editor: &str,
    content: &str,
) -> Result<(), String> {
    disable_raw_mode().map_err(|e| format!("failed to disable raw mode: {e}"))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)
        .map_err(|e| format!("failed to leave alternate screen: {e}"))?;
    let result = launch_editor(editor, content);
    enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {e}"))?;
    execute!(terminal.backend_mut(), EnterAlternateScreen, cursor::Hide)
        .map_err(|e| format!("failed to enter alternate screen: {e}"))?;
    terminal
        .clear()
        .map_err(|e| format!("failed to redraw terminal: {e}"))?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, RuntimeError> {
    enable_raw_mode().map_err(RuntimeError::Terminal)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide).map_err(RuntimeError::Terminal)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(RuntimeError::Terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<(), RuntimeError> {
    disable_raw_mode().map_err(RuntimeError::Terminal)?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)
        .map_err(RuntimeError::Terminal)?;
    terminal.show_cursor().map_err(RuntimeError::Terminal)?;
    Ok(())
}
