use loopwright::widgets::resolve_directory;
use std::fs;

#[test]
fn tilde_expands_against_home() {
    let home = tempfile::tempdir().expect("tempdir");
    fs::create_dir(home.path().join("projects")).expect("mkdir");
    std::env::set_var("HOME", home.path());

    assert_eq!(resolve_directory("~"), Ok(home.path().to_path_buf()));
    assert_eq!(
        resolve_directory(" ~/projects "),
        Ok(home.path().join("projects"))
    );
    let err = resolve_directory("~/missing").expect_err("missing");
    assert!(err.starts_with("path does not exist"));
}
