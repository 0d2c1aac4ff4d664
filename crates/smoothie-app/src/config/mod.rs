//! Configuration file parsing for the smoothie assistant
//!
//! Supports:
//! - `.smoothie/config.toml` - Global settings
//! - `SMOOTHIE_API_BASE` / `VITE_API_BASE` / `SMOOTHIE_BUILD` - Environment overrides

pub mod settings;
pub mod types;

pub use settings::{
    apply_env_overrides, clean_api_base, init_config_dir, load_settings, resolve_settings,
    validate_settings, API_BASE_ENV_VARS, BUILD_MODE_ENV_VAR,
};
pub use types::*;
