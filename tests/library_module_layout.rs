use std::fs;
use std::path::Path;

#[test]
fn lib_root_exports_only_wizard_modules() {
    let lib_rs = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/lib.rs");
    let source = fs::read_to_string(&lib_rs).expect("read src/lib.rs");
    let modules: Vec<&str> = source
        .lines()
        .filter_map(|line| line.strip_prefix("pub mod "))
        .map(|line| line.trim_end_matches(';'))
        .collect();
    assert_eq!(
        modules,
        vec!["app", "config", "editor", "project", "shared", "widgets"]
    );
}
