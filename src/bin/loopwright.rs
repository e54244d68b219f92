use loopwright::app::{self, Collaborators};
use loopwright::config::{default_log_path, load_settings};
use loopwright::shared::logging::EventLog;

fn run() -> Result<(), String> {
    let settings = load_settings().map_err(|err| err.to_string())?;
    let log_path = match &settings.log_path {
        Some(path) => Some(path.clone()),
        None => default_log_path().ok(),
    };
    let log = log_path.map(EventLog::to_file).unwrap_or_default();
    let collaborators = Collaborators::builtin(&settings);
    let summary = app::run(&settings, collaborators, log).map_err(|err| err.to_string())?;
    println!("{}", summary.render());
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
