use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run_with_script_keys(home: &Path, keys: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_loopwright"))
        .env("HOME", home)
        .env("LOOPWRIGHT_SCRIPT_KEYS", keys)
        .env_remove("VISUAL")
        .env_remove("EDITOR")
        .output()
        .expect("run loopwright with scripted keys")
}

fn write_config(home: &Path, body: &str) {
    fs::create_dir_all(home.join(".loopwright")).expect("create config dir");
    fs::write(home.join(".loopwright/config.yaml"), body).expect("write config");
}

#[cfg(unix)]
#[test]
fn scripted_run_walks_wizard_and_streams_loop_output() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();
    let project = home.join("app");
    fs::create_dir_all(&project).expect("create project");
    fs::write(project.join("Cargo.toml"), "[package]\nname = \"app\"\n").expect("write manifest");
    write_config(
        home,
        &format!(
            r#"
loop_command: "printf 'loopwright:progress 1/1\n'; echo \"$LOOPWRIGHT_MODEL $LOOPWRIGHT_TASK_COUNT\""
models: [sonnet, opus]
recent_projects:
  - path: {}
    name: app
"#,
            project.display()
        ),
    );

    let output = run_with_script_keys(
        home,
        "enter,a,t,tab,tab,enter,enter,tab,tab,tab,tab,tab,enter,down,enter,q",
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!("step=monitor\nproject={}\nloop=exited:0", project.display())
    );

    let log = fs::read_to_string(home.join(".loopwright/logs/loopwright.log")).expect("event log");
    assert!(log.contains("\"event\":\"wizard.start\""));
    assert!(log.contains("\"event\":\"loop.start\""));
    assert!(log.contains("\"event\":\"wizard.finish\""));
}

#[test]
fn escape_on_first_screen_quits_cleanly() {
    let dir = tempdir().expect("tempdir");
    let output = run_with_script_keys(dir.path(), "esc");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "step=directory\nproject=none\nloop=idle"
    );
}

#[test]
fn invalid_script_token_is_reported() {
    let dir = tempdir().expect("tempdir");
    let output = run_with_script_keys(dir.path(), "down,jump");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid LOOPWRIGHT_SCRIPT_KEYS token `jump`"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempdir().expect("tempdir");
    write_config(dir.path(), "text_max_len: 0\n");
    let output = run_with_script_keys(dir.path(), "esc");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("text_max_len"));
}
