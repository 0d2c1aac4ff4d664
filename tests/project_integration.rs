//! Integration tests for project configuration and asset staging

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use smoothie_app::assets::copy_configured_images;
use smoothie_app::config::{init_config_dir, load_settings};
use smoothie_assistant::headless::runner::resolve_chat_settings;
use smoothie_assistant::ChatOptions;
use smoothie_core::BuildMode;

/// Helper to write a `.smoothie/config.toml`
fn write_config(path: &Path, content: &str) {
    let dir = path.join(".smoothie");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), content).unwrap();
}

/// Helper to create a menu image directory with the given files
fn create_menu(path: &Path, files: &[&str]) {
    fs::create_dir_all(path).unwrap();
    for file in files {
        fs::write(path.join(file), file.as_bytes()).unwrap();
    }
}

#[test]
fn test_config_file_drives_chat_settings() {
    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        r#"
[api]
base_url = "https://smoothies.example.com"
timeout_ms = 20000

[build]
mode = "production"

[keyboard]
restore_max_attempts = 4
"#,
    );

    let options = ChatOptions {
        project_path: temp.path().to_path_buf(),
        ..Default::default()
    };
    let settings = resolve_chat_settings(&options).unwrap();

    assert_eq!(settings.build.mode, BuildMode::Production);
    assert_eq!(settings.api.timeout_ms, 20_000);
    assert_eq!(settings.keyboard.restore_max_attempts, 4);
    // untouched keys keep their defaults
    assert_eq!(settings.keyboard.restore_max_attempts_ios, 5);
}

#[test]
fn test_broken_config_falls_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "[api\nbase_url = ");

    let settings = load_settings(temp.path());
    assert_eq!(settings.api.base_url, "http://localhost:8000");
    assert_eq!(settings.build.mode, BuildMode::Development);
}

#[test]
fn test_init_then_copy_images_with_default_layout() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("widget");
    fs::create_dir_all(&project).unwrap();
    create_menu(
        &temp.path().join("data/MenuImages"),
        &["BlueMoon.jpg", "MangoTango.jpg"],
    );

    init_config_dir(&project).unwrap();
    let settings = load_settings(&project);
    let report = copy_configured_images(&project, &settings.assets).unwrap();

    assert_eq!(report.copied, vec!["BlueMoon.jpg", "MangoTango.jpg"]);
    assert!(project.join("public/images/BlueMoon.jpg").exists());
}

#[test]
fn test_copy_images_prefers_earlier_candidate() {
    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        r#"
[assets]
sources = ["first", "second"]
dest = "out"
"#,
    );
    create_menu(&temp.path().join("first"), &["KiwiKick.jpg"]);
    create_menu(&temp.path().join("second"), &["BerryBlast.jpg"]);

    let settings = load_settings(temp.path());
    let report = copy_configured_images(temp.path(), &settings.assets).unwrap();

    assert_eq!(report.copied, vec!["KiwiKick.jpg"]);
    assert!(!temp.path().join("out/BerryBlast.jpg").exists());
}
