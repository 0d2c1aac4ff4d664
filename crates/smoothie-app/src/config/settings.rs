//! Settings parser for .smoothie/config.toml

use super::types::Settings;
use smoothie_core::prelude::*;
use smoothie_core::BuildMode;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.toml";
const SMOOTHIE_DIR: &str = ".smoothie";

/// Environment variables consulted for the API base, in priority order
pub const API_BASE_ENV_VARS: [&str; 2] = ["SMOOTHIE_API_BASE", "VITE_API_BASE"];

/// `production` / `development`
pub const BUILD_MODE_ENV_VAR: &str = "SMOOTHIE_BUILD";

/// Load settings from .smoothie/config.toml
pub fn load_settings(project_path: &Path) -> Settings {
    let config_path = project_path.join(SMOOTHIE_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Load settings and apply environment overrides
pub fn resolve_settings(project_path: &Path) -> Settings {
    let mut settings = load_settings(project_path);
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

/// Apply `SMOOTHIE_API_BASE` / `VITE_API_BASE` and `SMOOTHIE_BUILD`.
///
/// `lookup` abstracts the environment so tests need not mutate it.
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some((var, raw)) = API_BASE_ENV_VARS
        .iter()
        .find_map(|var| lookup(var).map(|value| (*var, value)))
    {
        let cleaned = clean_api_base(&raw);
        if cleaned.is_empty() {
            warn!("{} is empty after stripping comments, keeping {}", var, settings.api.base_url);
        } else {
            debug!("API base from {}: {}", var, cleaned);
            settings.api.base_url = cleaned;
        }
    }

    if let Some(raw) = lookup(BUILD_MODE_ENV_VAR) {
        match BuildMode::parse(&raw) {
            Some(mode) => settings.build.mode = mode,
            None => warn!("Ignoring unknown {}={:?}", BUILD_MODE_ENV_VAR, raw),
        }
    }
}

/// Strip a trailing `# comment` and surrounding whitespace
pub fn clean_api_base(raw: &str) -> String {
    raw.split('#').next().unwrap_or_default().trim().to_string()
}

/// Reject settings that cannot work at all
pub fn validate_settings(settings: &Settings) -> Result<()> {
    let base = url::Url::parse(&settings.api.base_url).map_err(|e| {
        Error::config_invalid(format!("api.base_url {:?}: {}", settings.api.base_url, e))
    })?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(Error::config_invalid(format!(
            "api.base_url must be http(s), got {}",
            base.scheme()
        )));
    }
    if settings.api.timeout_ms == 0 {
        return Err(Error::config_invalid("api.timeout_ms must be positive"));
    }
    Ok(())
}

/// Create a default .smoothie/config.toml if none exists
pub fn init_config_dir(project_path: &Path) -> Result<()> {
    let smoothie_dir = project_path.join(SMOOTHIE_DIR);

    if !smoothie_dir.exists() {
        std::fs::create_dir_all(&smoothie_dir)
            .map_err(|e| Error::config(format!("Failed to create .smoothie dir: {}", e)))?;
    }

    let config_path = smoothie_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# Smoothie Assistant Configuration

[api]
base_url = "http://localhost:8000"
timeout_ms = 15000

[build]
mode = "development"    # or "production"

[assets]
sources = ["../data/MenuImages", "data/MenuImages"]
dest = "public/images"
"#;
        std::fs::write(&config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_settings_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(load_settings(dir.path()), Settings::default());
    }

    #[test]
    fn test_load_settings_parses_file() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".smoothie")).unwrap();
        std::fs::write(
            dir.path().join(".smoothie/config.toml"),
            r#"
[api]
base_url = "https://api.example.com"

[build]
mode = "production"
"#,
        )
        .unwrap();

        let settings = load_settings(dir.path());
        assert_eq!(settings.api.base_url, "https://api.example.com");
        assert_eq!(settings.api.timeout_ms, 15_000);
        assert!(settings.build.mode.is_production());
    }

    #[test]
    fn test_load_settings_invalid_toml_falls_back() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".smoothie")).unwrap();
        std::fs::write(dir.path().join(".smoothie/config.toml"), "[api\nbroken").unwrap();
        assert_eq!(load_settings(dir.path()), Settings::default());
    }

    #[test]
    fn test_clean_api_base_strips_comment() {
        assert_eq!(
            clean_api_base("https://api.example.com  # prod backend"),
            "https://api.example.com"
        );
        assert_eq!(clean_api_base("  http://localhost:8000 "), "http://localhost:8000");
        assert_eq!(clean_api_base("# only a comment"), "");
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        apply_env_overrides(
            &mut settings,
            env(&[
                ("VITE_API_BASE", "https://vite.example.com # note"),
                ("SMOOTHIE_BUILD", "prod"),
            ]),
        );
        assert_eq!(settings.api.base_url, "https://vite.example.com");
        assert_eq!(settings.build.mode, BuildMode::Production);
    }

    #[test]
    fn test_smoothie_api_base_wins_over_vite() {
        let mut settings = Settings::default();
        apply_env_overrides(
            &mut settings,
            env(&[
                ("VITE_API_BASE", "https://vite.example.com"),
                ("SMOOTHIE_API_BASE", "https://native.example.com"),
            ]),
        );
        assert_eq!(settings.api.base_url, "https://native.example.com");
    }

    #[test]
    fn test_empty_override_keeps_existing() {
        let mut settings = Settings::default();
        apply_env_overrides(&mut settings, env(&[("VITE_API_BASE", "#nothing")]));
        assert_eq!(settings.api.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_unknown_build_mode_ignored() {
        let mut settings = Settings::default();
        apply_env_overrides(&mut settings, env(&[("SMOOTHIE_BUILD", "staging")]));
        assert_eq!(settings.build.mode, BuildMode::Development);
    }

    #[test]
    #[serial]
    fn test_resolve_settings_reads_process_env() {
        let dir = tempdir().unwrap();
        std::env::set_var("SMOOTHIE_API_BASE", "https://env.example.com");
        let settings = resolve_settings(dir.path());
        std::env::remove_var("SMOOTHIE_API_BASE");
        assert_eq!(settings.api.base_url, "https://env.example.com");
    }

    #[test]
    fn test_validate_settings() {
        let mut settings = Settings::default();
        assert!(validate_settings(&settings).is_ok());

        settings.api.base_url = "not a url".into();
        assert!(validate_settings(&settings).unwrap_err().is_fatal());

        settings.api.base_url = "ftp://files.example.com".into();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_init_config_dir_writes_loadable_default() {
        let dir = tempdir().unwrap();
        init_config_dir(dir.path()).unwrap();
        let settings = load_settings(dir.path());
        assert_eq!(settings.api.base_url, "http://localhost:8000");
        assert_eq!(settings.assets.sources.len(), 2);
    }
}
