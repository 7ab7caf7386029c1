// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    error::Error,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use almanac_core::{APP_NAME, Config as CoreConfig};

const ALMANAC_CONFIG_ENV: &str = "ALMANAC_CONFIG";

/// Read the configuration from `path`, else `$ALMANAC_CONFIG`, else the
/// user configuration directory.
#[tracing::instrument]
pub fn parse_config(path: Option<PathBuf>) -> Result<(CoreConfig, Config), Box<dyn Error>> {
    let path = if let Some(path) = path {
        path
    } else if let Ok(env_path) = std::env::var(ALMANAC_CONFIG_ENV) {
        PathBuf::from(env_path)
    } else {
        let config = get_config_dir()?.join(format!("{APP_NAME}/config.toml"));
        if !config.exists() {
            return Err(format!("No config found at: {}", config.display()).into());
        }
        config
    };

    let raw = fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
        .parse::<ConfigRaw>()?;

    let base = path.parent().unwrap_or(Path::new("."));
    let config = Config {
        data: raw.cli.data.map(|p| resolve_path(base, &p)),
        user: raw.cli.user,
    };
    Ok((raw.core, config))
}

/// Settings of the command-line front end, the `[cli]` table.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data file with entries, layers and users.
    pub data: Option<PathBuf>,

    /// Login acting when `--user` is not given.
    pub user: Option<String>,
}

impl Config {
    /// Path of the data file, an error when none is configured.
    pub fn data_path(&self) -> Result<&Path, Box<dyn Error>> {
        self.data
            .as_deref()
            .ok_or_else(|| "Missing 'data' in the [cli] table of the config".into())
    }

    /// The acting login: `explicit`, else the configured user.
    pub fn user(&self, explicit: Option<&String>) -> Result<String, Box<dyn Error>> {
        explicit
            .or(self.user.as_ref())
            .cloned()
            .ok_or_else(|| "No user given, pass --user or set 'user' in the [cli] table".into())
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigRaw {
    core: CoreConfig,
    cli: Config,
}

impl FromStr for ConfigRaw {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

/// Expand a leading `~/` and resolve relative paths against `base`.
fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        match dirs::home_dir() {
            Some(home) => return home.join(stripped),
            None => tracing::warn!("home directory not found"),
        }
    }

    if path.is_absolute() {
        path.to_owned()
    } else {
        base.join(path)
    }
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(windows)]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific config directory not found".into())
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};
    use tempfile::TempDir;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn write_config(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn reads_core_and_cli_tables() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            "config.toml",
            r#"
[core]
timezone = "UTC"
limit_appts = true

[cli]
data = "calendar.toml"
user = "alice"
"#,
        );

        let (core, config) = parse_config(Some(path)).unwrap();
        assert_eq!(core.timezone.as_deref(), Some("UTC"));
        assert!(core.limit_appts);
        assert_eq!(core.conflict_repeat_months, 6);
        assert_eq!(config.data, Some(temp_dir.path().join("calendar.toml")));
        assert_eq!(config.user(None).unwrap(), "alice");
        assert_eq!(config.user(Some(&"bob".to_string())).unwrap(), "bob");
    }

    #[test]
    fn empty_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "config.toml", "");

        let (core, config) = parse_config(Some(path)).unwrap();
        assert_eq!(core.entry_slots, 144);
        assert!(config.data_path().is_err());
        assert!(config.user(None).is_err());
    }

    #[test]
    fn cli_flag_overrides_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let flag = write_config(temp_dir.path(), "flag.toml", "[cli]\nuser = \"flag\"\n");
        let env = write_config(temp_dir.path(), "env.toml", "[cli]\nuser = \"env\"\n");

        let _guard = env_lock().lock().unwrap();
        unsafe {
            std::env::set_var(ALMANAC_CONFIG_ENV, env.to_str().unwrap());
        }

        let (_, from_flag) = parse_config(Some(flag)).unwrap();
        let (_, from_env) = parse_config(None).unwrap();

        unsafe {
            std::env::remove_var(ALMANAC_CONFIG_ENV);
        }
        assert_eq!(from_flag.user.as_deref(), Some("flag"));
        assert_eq!(from_env.user.as_deref(), Some("env"));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "config.toml", "[core\n");
        assert!(parse_config(Some(path)).is_err());
    }

    #[test]
    fn resolves_data_paths() {
        let base = Path::new("/etc/almanac");
        assert_eq!(
            resolve_path(base, Path::new("data.toml")),
            PathBuf::from("/etc/almanac/data.toml")
        );
        assert_eq!(
            resolve_path(base, Path::new("/srv/data.toml")),
            PathBuf::from("/srv/data.toml")
        );
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                resolve_path(base, Path::new("~/data.toml")),
                home.join("data.toml")
            );
        }
    }
}
