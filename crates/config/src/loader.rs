use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    env_subst::substitute_env,
    error::{Error, Result},
    schema::BotConfig,
};

/// Supported config extensions, checked in order.
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json", "json5", "hjson"];

/// File stem used when no deployment mode is set.
const DEFAULT_STEM: &str = "study-together";

/// Where the loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No config file was found; built-in defaults are in use.
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<BotConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&substitute_env(&raw), path)
}

/// Find the config file for `mode`.
///
/// With a mode only `./<mode>_config.<ext>` is considered. Without one the
/// search order is `./study-together.<ext>` then
/// `~/.config/study-together/study-together.<ext>`.
pub fn discover(mode: Option<&str>) -> Option<PathBuf> {
    discover_in(Path::new("."), config_dir().as_deref(), mode)
}

fn discover_in(dir: &Path, user_dir: Option<&Path>, mode: Option<&str>) -> Option<PathBuf> {
    if let Some(mode) = mode {
        return find_with_stem(dir, &format!("{mode}_config"));
    }
    find_with_stem(dir, DEFAULT_STEM)
        .or_else(|| user_dir.and_then(|user| find_with_stem(user, DEFAULT_STEM)))
}

/// Discover, load, and apply environment overrides.
///
/// An explicit path must exist. A discovered file that fails to parse is an
/// error; only a missing file falls back to defaults.
pub fn discover_and_load(
    explicit: Option<&Path>,
    mode: Option<&str>,
) -> Result<(BotConfig, ConfigSource)> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover(mode),
    };

    let (config, source) = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            (load_config(&path)?, ConfigSource::File(path))
        },
        None => {
            info!(?mode, "no config file found, using defaults");
            (BotConfig::default(), ConfigSource::Defaults)
        },
    };

    Ok((apply_env_overrides(config)?, source))
}

/// Returns the user-global config directory (`~/.config/study-together/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", DEFAULT_STEM).map(|d| d.config_dir().to_path_buf())
}

/// The dotenv file that carries credentials for `mode` (`<mode>.env`, or
/// `.env` without a mode).
pub fn env_file_path(mode: Option<&str>) -> PathBuf {
    match mode {
        Some(mode) => PathBuf::from(format!("{mode}.env")),
        None => PathBuf::from(".env"),
    }
}

/// Apply connection settings from the environment.
///
/// Variable names match the deployment's existing env files: `redis_host`,
/// `redis_port`, `redis_password`, `redis_db_num`, plus `DISCORD_TOKEN`.
pub fn apply_env_overrides(config: BotConfig) -> Result<BotConfig> {
    apply_overrides_with(config, |name| std::env::var(name).ok())
}

fn apply_overrides_with(
    mut config: BotConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<BotConfig> {
    if let Some(host) = lookup("redis_host") {
        config.redis.host = host;
    }
    if let Some(port) = lookup("redis_port") {
        config.redis.port = port
            .trim()
            .parse()
            .map_err(|e| Error::invalid_override("redis_port", e))?;
    }
    if let Some(password) = lookup("redis_password") {
        config.redis.password = Some(secrecy::Secret::new(password));
    }
    if let Some(db) = lookup("redis_db_num") {
        config.redis.db = db
            .trim()
            .parse()
            .map_err(|e| Error::invalid_override("redis_db_num", e))?;
    }
    if let Some(token) = lookup("DISCORD_TOKEN") {
        config.discord.token = secrecy::Secret::new(token);
    }
    Ok(config)
}

fn find_with_stem(dir: &Path, stem: &str) -> Option<PathBuf> {
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|p| p.exists())
}

fn parse_config(raw: &str, path: &Path) -> Result<BotConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => toml::from_str(raw).map_err(|e| Error::parse(path, e)),
        "yaml" | "yml" => serde_yaml::from_str(raw).map_err(|e| Error::parse(path, e)),
        "json" => serde_json::from_str(raw).map_err(|e| Error::parse(path, e)),
        "json5" => json5::from_str(raw).map_err(|e| Error::parse(path, e)),
        "hjson" => deser_hjson::from_str(raw).map_err(|e| Error::parse(path, e)),
        other => Err(Error::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}
