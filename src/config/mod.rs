pub mod schema;

use std::path::{Path, PathBuf};

use crate::error::{Result, TreesmithError};

pub use schema::{default_handlers, BuildConfig, HandlerConfig, SiteConfig};

pub const CONFIG_FILE: &str = "treesmith.toml";

/// Load and validate a SiteConfig from a treesmith.toml file or the directory
/// containing one. Relative build paths are resolved against that directory.
pub fn load_config(path: &Path) -> Result<SiteConfig> {
    let config_path = if path.ends_with(CONFIG_FILE) || path.is_file() {
        path.to_path_buf()
    } else {
        path.join(CONFIG_FILE)
    };

    if !config_path.exists() {
        return Err(TreesmithError::ConfigNotFound { path: config_path });
    }

    let content = std::fs::read_to_string(&config_path).map_err(|e| TreesmithError::Io {
        context: format!("reading {}", config_path.display()),
        source: e,
    })?;

    let mut config: SiteConfig =
        toml::from_str(&content).map_err(|e| TreesmithError::ConfigParse {
            path: config_path.clone(),
            source: e,
        })?;

    config.validate()?;

    let base = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    config.resolve_paths(&base);

    Ok(config)
}

/// Load the explicit config if given, else `treesmith.toml` in `dir` if
/// present, else the built-in defaults.
pub fn discover_config(explicit: Option<&Path>, dir: &Path) -> Result<SiteConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    if dir.join(CONFIG_FILE).exists() {
        return load_config(dir);
    }
    let mut config = SiteConfig::default();
    config.resolve_paths(dir);
    Ok(config)
}
