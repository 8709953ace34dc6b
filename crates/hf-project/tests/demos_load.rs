use std::path::PathBuf;

#[test]
fn demo_projects_load_and_validate() {
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let root = crate_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root");

    let path = root.join("demos/projects/attack_lines.yaml");
    let project = hf_project::load_yaml(&path)
        .unwrap_or_else(|e| panic!("failed to load {}: {}", path.display(), e));

    let ids: Vec<&str> = project.networks.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["single-line", "two-nozzles", "relay"]);
}
