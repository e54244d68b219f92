#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("editor command is empty")]
    EmptyCommand,
    #[error("failed to create temporary file: {source}")]
    TempFile {
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write temporary file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to launch editor `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("editor `{program}` exited with status {code}")]
    ExitStatus { program: String, code: i32 },
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("terminal setup failed: {0}")]
    Terminal(#[source] std::io::Error),
    #[error("failed to read input: {0}")]
    Input(#[source] std::io::Error),
    #[error("failed to render frame: {0}")]
    Render(#[source] std::io::Error),
    #[error("{0}")]
    Script(String),
    #[error("failed to start loop command `{command}`: {source}")]
    LoopSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
